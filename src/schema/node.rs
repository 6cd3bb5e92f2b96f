// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message tree nodes.
//!
//! A telemetry message is a fixed tree of typed leaves grouped under
//! category nodes. The tree's shape is decided once at construction; only
//! leaf values change between encode cycles. Children are owned values, so
//! there are no back-references to keep alive and no aliasing questions
//! during an encode pass.
//!
//! A node is a [`MessageNode::Category`] exactly when it has children;
//! categories carry framing only and never payload bytes of their own.

use half::f16;

use crate::core::{Result, TelemetryError};
use crate::encoding::delta::{delta_encode_signed, delta_encode_wrapping};
use crate::encoding::quantize::{QuantizePolicy, Quantizer};
use crate::schema::tags;

/// One node of the message tree.
#[derive(Debug, Clone)]
pub enum MessageNode {
    /// Structural node: a kind tag plus an ordered, fixed set of children.
    /// Child order is serialization order.
    Category {
        /// Kind tag identifying this group to the decoder
        kind: u8,
        /// Ordered children, fixed at construction
        children: Vec<MessageNode>,
    },
    /// Data-bearing node with no children.
    Leaf(LeafValue),
}

impl MessageNode {
    /// Build a category node. Callers must pass a non-empty child list;
    /// a childless category would violate the tree invariant.
    #[must_use]
    pub fn category(kind: u8, children: Vec<MessageNode>) -> Self {
        debug_assert!(!children.is_empty());
        MessageNode::Category { kind, children }
    }

    /// Whether this node is structural.
    #[must_use]
    pub fn is_category(&self) -> bool {
        matches!(self, MessageNode::Category { .. })
    }

    /// Kind tag this node will emit.
    #[must_use]
    pub fn kind_tag(&self) -> u8 {
        match self {
            MessageNode::Category { kind, .. } => *kind,
            MessageNode::Leaf(value) => value.kind_tag(),
        }
    }

    /// Mutable access to a child by position. Panics on a leaf or a bad
    /// index; the concrete schema addresses children by construction-time
    /// constants, so a miss is a schema bug, not runtime input.
    pub(crate) fn child_mut(&mut self, index: usize) -> &mut MessageNode {
        match self {
            MessageNode::Category { children, .. } => &mut children[index],
            MessageNode::Leaf(_) => unreachable!("leaf nodes have no children"),
        }
    }

    /// Mutable access to this node's leaf value. Panics on a category;
    /// same contract as [`MessageNode::child_mut`].
    pub(crate) fn leaf_mut(&mut self) -> &mut LeafValue {
        match self {
            MessageNode::Leaf(value) => value,
            MessageNode::Category { .. } => unreachable!("category nodes carry no value"),
        }
    }
}

/// Payload of a data-bearing node.
#[derive(Debug, Clone)]
pub enum LeafValue {
    /// One logical bit, encoded entirely in the kind tag
    Bool(bool),
    /// Signed 32-bit value, zigzag varint on the wire
    Int32(i32),
    /// Unsigned 32-bit value, varint on the wire
    UInt32(u32),
    /// Raw IEEE-754 32-bit value
    Float32(f32),
    /// Robot pose estimate: x, y, heading as three raw f32s
    Pose {
        /// Field x coordinate
        x: f32,
        /// Field y coordinate
        y: f32,
        /// Heading in radians
        heading: f32,
    },
    /// Particle cloud narrowed to 16-bit floats
    ParticlesF16(ParticlesF16),
    /// Particle cloud quantized and delta-encoded
    ParticlesQuantized(ParticlesQuantized),
}

impl LeafValue {
    /// Kind tag for this value. Booleans encode their value here.
    #[must_use]
    pub fn kind_tag(&self) -> u8 {
        match self {
            LeafValue::Bool(true) => tags::KIND_BOOL_TRUE,
            LeafValue::Bool(false) => tags::KIND_BOOL_FALSE,
            LeafValue::Int32(_) => tags::KIND_INT32,
            LeafValue::UInt32(_) => tags::KIND_UINT32,
            LeafValue::Float32(_) => tags::KIND_FLOAT32,
            LeafValue::Pose { .. } => tags::KIND_POSE,
            LeafValue::ParticlesF16(_) => tags::KIND_PARTICLES_F16,
            LeafValue::ParticlesQuantized(_) => tags::KIND_PARTICLES_QUANTIZED,
        }
    }

    /// Whether this leaf needs the full type-tag + length framing.
    /// Fixed-size scalars skip both: the decoder knows their size from the
    /// kind tag alone.
    #[must_use]
    pub fn is_variable_size(&self) -> bool {
        matches!(
            self,
            LeafValue::ParticlesF16(_) | LeafValue::ParticlesQuantized(_)
        )
    }
}

/// Particle cloud stored as three planes of 16-bit floats.
///
/// The capacity is part of the schema's identity; the payload always covers
/// the full capacity, with unset tail entries staying at zero.
#[derive(Debug, Clone)]
pub struct ParticlesF16 {
    x: Vec<f16>,
    y: Vec<f16>,
    weights: Vec<f16>,
}

impl ParticlesF16 {
    /// Create a zero-filled cloud of the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            x: vec![f16::ZERO; capacity],
            y: vec![f16::ZERO; capacity],
            weights: vec![f16::ZERO; capacity],
        }
    }

    /// Fixed capacity N of the cloud.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.x.len()
    }

    /// Narrow and store a batch of particles starting at `offset`.
    ///
    /// A prefix fill is allowed here (unlike the quantized variant, nothing
    /// depends on seeing the whole array at once), but the batch must fit
    /// inside the capacity.
    pub fn set_particles(
        &mut self,
        x: &[f32],
        y: &[f32],
        weights: &[f32],
        offset: usize,
    ) -> Result<()> {
        let len = x.len();
        if y.len() != len || weights.len() != len {
            return Err(TelemetryError::length_mismatch(len, y.len().min(weights.len())));
        }
        if offset + len > self.capacity() {
            return Err(TelemetryError::length_mismatch(
                self.capacity(),
                offset + len,
            ));
        }
        for i in 0..len {
            self.x[offset + i] = f16::from_f32(x[i]);
            self.y[offset + i] = f16::from_f32(y[i]);
            self.weights[offset + i] = f16::from_f32(weights[i]);
        }
        Ok(())
    }

    /// Store a single particle.
    pub fn set_particle(&mut self, index: usize, x: f32, y: f32, weight: f32) -> Result<()> {
        if index >= self.capacity() {
            return Err(TelemetryError::length_mismatch(self.capacity(), index + 1));
        }
        self.x[index] = f16::from_f32(x);
        self.y[index] = f16::from_f32(y);
        self.weights[index] = f16::from_f32(weight);
        Ok(())
    }

    /// Interleaved plane access for the encoder: (x, y, weight) at `index`.
    #[must_use]
    pub fn particle(&self, index: usize) -> (f16, f16, f16) {
        (self.x[index], self.y[index], self.weights[index])
    }
}

/// Bit widths and delta policy for a quantized particle leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct QuantizedConfig {
    /// Bit width for the spatial x/y planes (`modulus = 1 << bits`)
    pub xy_bits: u32,
    /// Bit width for the weight plane
    pub weight_bits: u32,
    /// Delta polarity on the wire
    #[serde(default)]
    pub policy: WirePolicy,
}

impl Default for QuantizedConfig {
    fn default() -> Self {
        Self {
            xy_bits: 16,
            weight_bits: 16,
            policy: WirePolicy::Signed,
        }
    }
}

/// Delta polarity for quantized particle planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WirePolicy {
    /// Signed quantization, plain differences, zigzag varints
    #[default]
    Signed,
    /// Unsigned quantization, modular wraparound differences, plain varints
    Unsigned,
}

impl WirePolicy {
    pub(crate) fn quantize_policy(self) -> QuantizePolicy {
        match self {
            WirePolicy::Signed => QuantizePolicy::Signed,
            WirePolicy::Unsigned => QuantizePolicy::Unsigned,
        }
    }
}

/// Particle cloud quantized per plane and delta-encoded.
///
/// Quantization happens when the producer hands over the values, not during
/// encode: delta encoding needs the whole plane at once, and doing the work
/// here keeps the encode pass allocation-free.
#[derive(Debug, Clone)]
pub struct ParticlesQuantized {
    config: QuantizedConfig,
    capacity: usize,
    /// x-min, x-max, y-min, y-max, w-min, w-max, as sent on the wire
    bounds: [f32; 6],
    x: Vec<i64>,
    y: Vec<i64>,
    weights: Vec<i64>,
}

impl ParticlesQuantized {
    /// Create an empty cloud of the given capacity.
    #[must_use]
    pub fn new(capacity: usize, config: QuantizedConfig) -> Self {
        Self {
            config,
            capacity,
            bounds: [0.0; 6],
            x: vec![0; capacity],
            y: vec![0; capacity],
            weights: vec![0; capacity],
        }
    }

    /// Fixed capacity N of the cloud.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The configured bit widths and policy.
    #[must_use]
    pub const fn config(&self) -> QuantizedConfig {
        self.config
    }

    /// Per-plane bounds of the last stored batch.
    #[must_use]
    pub const fn bounds(&self) -> [f32; 6] {
        self.bounds
    }

    /// Delta sequences ready for the wire: (x, y, weights).
    #[must_use]
    pub fn deltas(&self) -> (&[i64], &[i64], &[i64]) {
        (&self.x, &self.y, &self.weights)
    }

    /// Quantize and delta-encode a full particle batch.
    ///
    /// All three slices must have exactly the schema capacity: the delta
    /// pass and the per-plane bounds need the whole array at once.
    pub fn set_particles(&mut self, x: &[f32], y: &[f32], weights: &[f32]) -> Result<()> {
        for plane in [x, y, weights] {
            if plane.len() != self.capacity {
                return Err(TelemetryError::length_mismatch(self.capacity, plane.len()));
            }
        }
        let (xb, yb, wb) = (
            Self::compress_plane(x, self.config.xy_bits, self.config.policy, &mut self.x)?,
            Self::compress_plane(y, self.config.xy_bits, self.config.policy, &mut self.y)?,
            Self::compress_plane(
                weights,
                self.config.weight_bits,
                self.config.policy,
                &mut self.weights,
            )?,
        );
        self.bounds = [xb.0, xb.1, yb.0, yb.1, wb.0, wb.1];
        Ok(())
    }

    /// Quantize one plane into `out` and delta-encode it in place.
    /// Returns the (min, max) bounds actually used.
    fn compress_plane(
        data: &[f32],
        bits: u32,
        policy: WirePolicy,
        out: &mut [i64],
    ) -> Result<(f32, f32)> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in data {
            min = min.min(v);
            max = max.max(v);
        }
        // A constant plane (all weights equal after resampling, for
        // instance) gets a padded range so every value quantizes to zero.
        // The pad scales with magnitude: `min + 1.0` rounds back to `min`
        // once |min| outgrows f32 precision.
        if max <= min {
            max = min + min.abs().max(1.0);
        }
        let quantizer = Quantizer::from_range(min, max, bits, policy.quantize_policy())?;
        for (slot, &v) in out.iter_mut().zip(data) {
            *slot = quantizer.quantize(v);
        }
        match policy {
            WirePolicy::Signed => delta_encode_signed(out),
            WirePolicy::Unsigned => delta_encode_wrapping(out, quantizer.modulus()),
        }
        Ok((min, max))
    }
}
