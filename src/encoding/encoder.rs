// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Framing driver: depth-first tree walk emitting the wire format.
//!
//! Per node:
//!
//! | Node class        | Bytes emitted                               |
//! |-------------------|---------------------------------------------|
//! | Category          | `type_tag, kind_tag, len:u32-LE, children`  |
//! | Fixed scalar leaf | `kind_tag, payload`                         |
//! | Variable leaf     | `type_tag, kind_tag, len:u32-LE, payload`   |
//!
//! Fixed-size scalar leaves skip the type tag and length field: the decoder
//! knows their size from the kind tag alone. Length fields count payload
//! bytes only, excluding the two tag bytes and the length field itself, and
//! are backpatched after the children have been written.

use crate::core::Result;
use crate::encoding::buffer::LogBuffer;
use crate::encoding::varint;
use crate::schema::node::{LeafValue, MessageNode, ParticlesF16, ParticlesQuantized, WirePolicy};
use crate::schema::tags;

/// Length-field width on the wire.
const LEN_FIELD_SIZE: usize = 4;

/// Encode a node (and, for categories, its subtree) into the buffer.
///
/// Returns the total number of bytes written for this node, including tags
/// and length field, for parent accumulation.
pub fn encode(node: &MessageNode, buffer: &mut LogBuffer) -> Result<usize> {
    match node {
        MessageNode::Category { kind, children } => {
            let mut framing = 0;
            framing += buffer.write_u8(tags::TYPE_CATEGORY)?;
            framing += buffer.write_u8(*kind)?;
            let patch = buffer.reserve(LEN_FIELD_SIZE)?;
            framing += LEN_FIELD_SIZE;
            let mut payload = 0;
            for child in children {
                payload += encode(child, buffer)?;
            }
            buffer.patch_u32_le(patch, payload as u32)?;
            Ok(framing + payload)
        }
        MessageNode::Leaf(value) => encode_leaf(value, buffer),
    }
}

fn encode_leaf(value: &LeafValue, buffer: &mut LogBuffer) -> Result<usize> {
    match value {
        // The whole value lives in the kind tag
        LeafValue::Bool(_) => buffer.write_u8(value.kind_tag()),
        LeafValue::Int32(v) => {
            let mut written = buffer.write_u8(value.kind_tag())?;
            written += varint::encode_signed(i64::from(*v), buffer)?;
            Ok(written)
        }
        LeafValue::UInt32(v) => {
            let mut written = buffer.write_u8(value.kind_tag())?;
            written += varint::encode_unsigned(u64::from(*v), buffer)?;
            Ok(written)
        }
        LeafValue::Float32(v) => {
            let mut written = buffer.write_u8(value.kind_tag())?;
            written += buffer.write_f32_le(*v)?;
            Ok(written)
        }
        LeafValue::Pose { x, y, heading } => {
            let mut written = buffer.write_u8(value.kind_tag())?;
            written += buffer.write_f32_le(*x)?;
            written += buffer.write_f32_le(*y)?;
            written += buffer.write_f32_le(*heading)?;
            Ok(written)
        }
        LeafValue::ParticlesF16(cloud) => {
            encode_variable_leaf(value.kind_tag(), buffer, |buffer| {
                encode_f16_payload(cloud, buffer)
            })
        }
        LeafValue::ParticlesQuantized(cloud) => {
            encode_variable_leaf(value.kind_tag(), buffer, |buffer| {
                encode_quantized_payload(cloud, buffer)
            })
        }
    }
}

/// Shared framing for variable-size leaves: tags, reserved length,
/// payload, backpatch.
fn encode_variable_leaf(
    kind: u8,
    buffer: &mut LogBuffer,
    payload_fn: impl FnOnce(&mut LogBuffer) -> Result<usize>,
) -> Result<usize> {
    let mut framing = 0;
    framing += buffer.write_u8(tags::TYPE_DATA)?;
    framing += buffer.write_u8(kind)?;
    let patch = buffer.reserve(LEN_FIELD_SIZE)?;
    framing += LEN_FIELD_SIZE;
    let payload = payload_fn(buffer)?;
    buffer.patch_u32_le(patch, payload as u32)?;
    Ok(framing + payload)
}

/// Interleaved 16-bit planes: x, y, weight per particle, 6·N bytes.
fn encode_f16_payload(cloud: &ParticlesF16, buffer: &mut LogBuffer) -> Result<usize> {
    let mut written = 0;
    for i in 0..cloud.capacity() {
        let (x, y, w) = cloud.particle(i);
        written += buffer.write(&x.to_le_bytes())?;
        written += buffer.write(&y.to_le_bytes())?;
        written += buffer.write(&w.to_le_bytes())?;
    }
    Ok(written)
}

/// Six raw f32 bounds, then interleaved varint deltas: x, y, weight per
/// particle.
fn encode_quantized_payload(cloud: &ParticlesQuantized, buffer: &mut LogBuffer) -> Result<usize> {
    let mut written = 0;
    for bound in cloud.bounds() {
        written += buffer.write_f32_le(bound)?;
    }
    let (x, y, w) = cloud.deltas();
    let policy = cloud.config().policy;
    for i in 0..cloud.capacity() {
        for delta in [x[i], y[i], w[i]] {
            written += match policy {
                WirePolicy::Signed => varint::encode_signed(delta, buffer)?,
                WirePolicy::Unsigned => varint::encode_unsigned(delta as u64, buffer)?,
            };
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::estimator::estimate_size;
    use crate::schema::node::QuantizedConfig;

    fn encode_to_vec(node: &MessageNode) -> Vec<u8> {
        let mut buffer = LogBuffer::with_capacity(estimate_size(node));
        encode(node, &mut buffer).unwrap();
        buffer.as_slice().to_vec()
    }

    #[test]
    fn test_bool_is_tag_only() {
        assert_eq!(
            encode_to_vec(&MessageNode::Leaf(LeafValue::Bool(true))),
            vec![tags::KIND_BOOL_TRUE]
        );
        assert_eq!(
            encode_to_vec(&MessageNode::Leaf(LeafValue::Bool(false))),
            vec![tags::KIND_BOOL_FALSE]
        );
    }

    #[test]
    fn test_int32_zigzag_varint() {
        assert_eq!(
            encode_to_vec(&MessageNode::Leaf(LeafValue::Int32(-1))),
            vec![tags::KIND_INT32, 0x01]
        );
        assert_eq!(
            encode_to_vec(&MessageNode::Leaf(LeafValue::Int32(1))),
            vec![tags::KIND_INT32, 0x02]
        );
    }

    #[test]
    fn test_uint32_varint() {
        assert_eq!(
            encode_to_vec(&MessageNode::Leaf(LeafValue::UInt32(10))),
            vec![tags::KIND_UINT32, 0x0A]
        );
        assert_eq!(
            encode_to_vec(&MessageNode::Leaf(LeafValue::UInt32(300))),
            vec![tags::KIND_UINT32, 0xAC, 0x02]
        );
    }

    #[test]
    fn test_float32_raw_bytes() {
        let mut expected = vec![tags::KIND_FLOAT32];
        expected.extend_from_slice(&1.5f32.to_le_bytes());
        assert_eq!(
            encode_to_vec(&MessageNode::Leaf(LeafValue::Float32(1.5))),
            expected
        );
    }

    #[test]
    fn test_pose_three_floats() {
        let node = MessageNode::Leaf(LeafValue::Pose {
            x: 1.0,
            y: 2.0,
            heading: 0.5,
        });
        let bytes = encode_to_vec(&node);
        assert_eq!(bytes.len(), 13);
        assert_eq!(bytes[0], tags::KIND_POSE);
        assert_eq!(&bytes[1..5], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[5..9], &2.0f32.to_le_bytes());
        assert_eq!(&bytes[9..13], &0.5f32.to_le_bytes());
    }

    #[test]
    fn test_category_framing() {
        let node = MessageNode::category(
            tags::KIND_GENERATION_INFO,
            vec![
                MessageNode::Leaf(LeafValue::UInt32(10)),
                MessageNode::Leaf(LeafValue::Bool(true)),
            ],
        );
        let bytes = encode_to_vec(&node);
        assert_eq!(bytes[0], tags::TYPE_CATEGORY);
        assert_eq!(bytes[1], tags::KIND_GENERATION_INFO);
        // Payload: uint32 leaf (2 bytes) + bool leaf (1 byte)
        let len = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        assert_eq!(len, 3);
        assert_eq!(bytes.len(), 6 + 3);
    }

    #[test]
    fn test_nested_category_lengths() {
        let inner = MessageNode::category(
            tags::KIND_DISTANCE_SENSOR,
            vec![MessageNode::Leaf(LeafValue::Bool(false))],
        );
        let outer = MessageNode::category(tags::KIND_ROOT, vec![inner]);
        let bytes = encode_to_vec(&outer);
        // Outer frames the whole inner node: 2 tags + 4 length + 1 payload
        let outer_len = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        assert_eq!(outer_len, 7);
        let inner_len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        assert_eq!(inner_len, 1);
    }

    #[test]
    fn test_f16_leaf_framing() {
        let mut cloud = ParticlesF16::new(2);
        cloud
            .set_particles(&[1.0, 2.0], &[3.0, 4.0], &[0.5, 0.25], 0)
            .unwrap();
        let bytes = encode_to_vec(&MessageNode::Leaf(LeafValue::ParticlesF16(cloud)));
        assert_eq!(bytes[0], tags::TYPE_DATA);
        assert_eq!(bytes[1], tags::KIND_PARTICLES_F16);
        let len = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        assert_eq!(len, 12); // 6 bytes per particle
        assert_eq!(bytes.len(), 18);
        // First particle x narrowed to f16
        assert_eq!(
            &bytes[6..8],
            &half::f16::from_f32(1.0).to_le_bytes()
        );
    }

    #[test]
    fn test_quantized_leaf_framing() {
        let config = QuantizedConfig {
            xy_bits: 6,
            weight_bits: 6,
            policy: WirePolicy::Unsigned,
        };
        let mut cloud = ParticlesQuantized::new(4, config);
        cloud
            .set_particles(
                &[-1.0, 0.0, 1.0, 2.0],
                &[-1.0, 0.0, 1.0, 2.0],
                &[0.1, 0.2, 0.3, 0.4],
            )
            .unwrap();
        let bytes = encode_to_vec(&MessageNode::Leaf(LeafValue::ParticlesQuantized(cloud)));
        assert_eq!(bytes[0], tags::TYPE_DATA);
        assert_eq!(bytes[1], tags::KIND_PARTICLES_QUANTIZED);
        let len = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]) as usize;
        assert_eq!(bytes.len(), 6 + len);
        // Bounds lead the payload
        assert_eq!(&bytes[6..10], &(-1.0f32).to_le_bytes());
        assert_eq!(&bytes[10..14], &2.0f32.to_le_bytes());
    }

    #[test]
    fn test_returned_count_matches_buffer() {
        let node = MessageNode::category(
            tags::KIND_ROOT,
            vec![
                MessageNode::Leaf(LeafValue::Int32(-42)),
                MessageNode::Leaf(LeafValue::Float32(3.25)),
            ],
        );
        let mut buffer = LogBuffer::with_capacity(estimate_size(&node));
        let written = encode(&node, &mut buffer).unwrap();
        assert_eq!(written, buffer.len());
    }

    #[test]
    fn test_undersized_buffer_fails_cleanly() {
        let node = MessageNode::category(
            tags::KIND_ROOT,
            vec![MessageNode::Leaf(LeafValue::Float32(1.0))],
        );
        let mut buffer = LogBuffer::with_capacity(4);
        let err = encode(&node, &mut buffer).unwrap_err();
        assert!(err.is_contract_violation());
    }
}
