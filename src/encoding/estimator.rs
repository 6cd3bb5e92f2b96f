// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Size estimation: a parallel tree walk that never writes.
//!
//! Mirrors the encoder's tag and length rules, returning a conservative
//! upper bound on the encoded size of a node. The root's estimate is the
//! minimum safe [`LogBuffer`](crate::encoding::buffer::LogBuffer) capacity;
//! the encoder hitting `CapacityExceeded` on a buffer sized from here is a
//! bug in this module.
//!
//! Scalar bounds are value-independent (a varint int leaf always counts its
//! 5-byte worst case) so a buffer sized once at schema construction stays
//! valid for every later encode cycle.

use crate::schema::node::{LeafValue, MessageNode, WirePolicy};

/// Tag bytes + length field for a framed (category or variable-leaf) node.
const FRAMING_SIZE: usize = 2 + 4;

/// Worst-case varint length of a 32-bit value.
const VARINT32_MAX: usize = 5;

/// Conservative upper bound on the encoded size of `node`.
#[must_use]
pub fn estimate_size(node: &MessageNode) -> usize {
    match node {
        MessageNode::Category { children, .. } => {
            FRAMING_SIZE + children.iter().map(estimate_size).sum::<usize>()
        }
        MessageNode::Leaf(value) => match value {
            LeafValue::Bool(_) => 1,
            LeafValue::Int32(_) | LeafValue::UInt32(_) => 1 + VARINT32_MAX,
            LeafValue::Float32(_) => 1 + 4,
            LeafValue::Pose { .. } => 1 + 12,
            LeafValue::ParticlesF16(cloud) => FRAMING_SIZE + 6 * cloud.capacity(),
            LeafValue::ParticlesQuantized(cloud) => {
                let config = cloud.config();
                let per_particle = 2 * worst_varint_len(config.xy_bits, config.policy)
                    + worst_varint_len(config.weight_bits, config.policy);
                FRAMING_SIZE + 6 * 4 + cloud.capacity() * per_particle
            }
        },
    }
}

/// Worst-case varint length for one quantized delta of the given bit width.
///
/// Unsigned deltas stay in `[0, 1 << bits)`. Signed deltas can span the
/// whole modulus in either direction, and the zigzag map costs one more
/// bit of magnitude.
fn worst_varint_len(bits: u32, policy: WirePolicy) -> usize {
    let value_bits = match policy {
        WirePolicy::Unsigned => bits,
        WirePolicy::Signed => bits + 1,
    } as usize;
    value_bits.max(1).div_ceil(7)
}
