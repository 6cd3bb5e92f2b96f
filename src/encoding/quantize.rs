// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-range affine quantization.
//!
//! Maps a float known to lie in `[min, max]` to a small integer via
//! `q = trunc(c1 + x * c0)` with `c0 = modulus / (max - min)` and
//! `c1 = -min * c0`. Truncation toward zero is part of the wire contract;
//! switching to round-to-nearest would silently change every decoded value
//! against an existing decoder. Dequantization returns the center of bin
//! `q`, so the round-trip error stays within half a step even for
//! `x == max` (which truncates to the top bin instead of escaping the
//! modulus).
//!
//! Two output-range policies exist:
//! - [`QuantizePolicy::Unsigned`]: values in `[0, modulus)`, deltas need
//!   modular wraparound handling downstream.
//! - [`QuantizePolicy::Signed`]: values biased into
//!   `[-modulus/2, modulus/2)`, deltas use plain subtraction.

use crate::core::{Result, TelemetryError};

/// Output-range policy for quantized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantizePolicy {
    /// Bias into `[-modulus/2, modulus/2)`; deltas are ordinary signed
    /// differences with no wraparound ambiguity.
    #[default]
    Signed,
    /// Keep `[0, modulus)`; deltas wrap modularly and the decoder must undo
    /// the wrap via modular cumulative sum.
    Unsigned,
}

/// Affine quantizer for one value plane, built per encode from the plane's
/// min/max bounds and a configured bit width.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    c0: f32,
    c1: f32,
    modulus: u32,
    policy: QuantizePolicy,
}

impl Quantizer {
    /// Build a quantizer for values in `[min, max]` with `modulus = 1 << bits`.
    ///
    /// `max <= min` or non-finite bounds are a domain error: the affine
    /// transform would divide by zero or produce garbage. The bit width
    /// flows in from configuration, so it is validated rather than
    /// asserted: anything outside `1..=31` would overflow the u32 modulus.
    pub fn from_range(min: f32, max: f32, bits: u32, policy: QuantizePolicy) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(TelemetryError::invalid_range(min, max));
        }
        if !(1..=31).contains(&bits) {
            return Err(TelemetryError::invalid_bit_width(bits));
        }
        let modulus = 1u32 << bits;
        let c0 = modulus as f32 / (max - min);
        let c1 = -min * c0;
        Ok(Self {
            c0,
            c1,
            modulus,
            policy,
        })
    }

    /// The modulus (`1 << bits`).
    #[must_use]
    pub const fn modulus(&self) -> u32 {
        self.modulus
    }

    /// The quantization step: the worst-case round-trip error bound.
    #[must_use]
    pub fn step(&self) -> f32 {
        1.0 / self.c0
    }

    /// Quantize one value. Truncates toward zero, then clamps into the
    /// policy's output range so that `x == max` cannot escape the modulus.
    #[must_use]
    pub fn quantize(&self, x: f32) -> i64 {
        let raw = (self.c1 + x * self.c0) as i64;
        let clamped = raw.clamp(0, i64::from(self.modulus) - 1);
        match self.policy {
            QuantizePolicy::Unsigned => clamped,
            QuantizePolicy::Signed => clamped - i64::from(self.modulus / 2),
        }
    }

    /// Invert [`Quantizer::quantize`] to the center of bin `q`.
    ///
    /// Truncation puts every `x` of bin `q` in `[q, q + 1)` scaled units,
    /// so the center is within half a [`Quantizer::step`] of any of them.
    /// This only changes the decode side; the wire carries `q` unchanged.
    #[must_use]
    pub fn dequantize(&self, q: i64) -> f32 {
        let unbiased = match self.policy {
            QuantizePolicy::Unsigned => q,
            QuantizePolicy::Signed => q + i64::from(self.modulus / 2),
        };
        (unbiased as f32 + 0.5 - self.c1) / self.c0
    }
}
