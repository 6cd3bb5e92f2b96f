// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The numeric compression and framing stack.
//!
//! Leaves first:
//! - [`varint`] - variable-length integer codec
//! - [`quantize`] - fixed-range affine quantization
//! - [`delta`] - difference encoding, plain and modular-wrapping
//! - [`buffer`] - fixed-capacity byte sink with backpatch
//! - [`encoder`] - depth-first framing driver over the message tree
//! - [`estimator`] - conservative size bounds for buffer preallocation

pub mod buffer;
pub mod delta;
pub mod encoder;
pub mod estimator;
pub mod quantize;
pub mod varint;

pub use buffer::{LogBuffer, Patch};
pub use encoder::encode;
pub use estimator::estimate_size;
pub use quantize::{QuantizePolicy, Quantizer};
