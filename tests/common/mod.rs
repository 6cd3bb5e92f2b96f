// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Test-side frame walker.
//!
//! The shipped library has no decoder (that lives off-device); these tests
//! carry their own schema-aware walker so every length field and payload
//! byte gets checked against the wire contract.

// Each integration binary uses a different subset of these helpers
#![allow(dead_code)]

use robotelem::encoding::varint;
use robotelem::schema::tags;

/// One parsed node of an encoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Structural node: framed, children only
    Category { kind: u8, children: Vec<Frame> },
    /// Fixed scalar leaf: kind tag plus raw payload bytes
    Scalar { kind: u8, payload: Vec<u8> },
    /// Variable-size leaf: framed, raw payload bytes
    Variable { kind: u8, payload: Vec<u8> },
}

impl Frame {
    pub fn kind(&self) -> u8 {
        match self {
            Frame::Category { kind, .. }
            | Frame::Scalar { kind, .. }
            | Frame::Variable { kind, .. } => *kind,
        }
    }

    pub fn children(&self) -> &[Frame] {
        match self {
            Frame::Category { children, .. } => children,
            _ => panic!("node {:#04x} is not a category", self.kind()),
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Frame::Scalar { payload, .. } | Frame::Variable { payload, .. } => payload,
            Frame::Category { .. } => panic!("category nodes carry no payload"),
        }
    }
}

/// Parse one node starting at `data[0]`, returning it and the bytes
/// consumed. Panics (failing the test) on any framing violation.
pub fn parse_node(data: &[u8]) -> (Frame, usize) {
    let first = data[0];
    match first {
        tags::TYPE_CATEGORY | tags::TYPE_DATA => {
            let kind = data[1];
            let len =
                u32::from_le_bytes([data[2], data[3], data[4], data[5]]) as usize;
            let payload = &data[6..6 + len];
            let consumed = 6 + len;
            if first == tags::TYPE_CATEGORY {
                let mut children = Vec::new();
                let mut offset = 0;
                while offset < payload.len() {
                    let (child, used) = parse_node(&payload[offset..]);
                    children.push(child);
                    offset += used;
                }
                assert_eq!(
                    offset,
                    payload.len(),
                    "children of {kind:#04x} overran their length field"
                );
                (Frame::Category { kind, children }, consumed)
            } else {
                (
                    Frame::Variable {
                        kind,
                        payload: payload.to_vec(),
                    },
                    consumed,
                )
            }
        }
        kind => {
            let payload_len = match kind {
                tags::KIND_BOOL_TRUE | tags::KIND_BOOL_FALSE => 0,
                tags::KIND_FLOAT32 => 4,
                tags::KIND_POSE => 12,
                tags::KIND_INT32 | tags::KIND_UINT32 => {
                    let (_, len) = varint::decode_unsigned(&data[1..]).expect("scalar varint");
                    len
                }
                other => panic!("unknown scalar kind tag {other:#04x}"),
            };
            (
                Frame::Scalar {
                    kind,
                    payload: data[1..1 + payload_len].to_vec(),
                },
                1 + payload_len,
            )
        }
    }
}

/// Parse a complete frame, asserting nothing trails the root node.
pub fn parse_frame(data: &[u8]) -> Frame {
    let (frame, consumed) = parse_node(data);
    assert_eq!(consumed, data.len(), "trailing bytes after root node");
    frame
}

/// Decode a `u32` scalar leaf.
pub fn read_u32(frame: &Frame) -> u32 {
    assert_eq!(frame.kind(), tags::KIND_UINT32);
    let (value, _) = varint::decode_unsigned(frame.payload()).expect("uint32 varint");
    value as u32
}

/// Decode an `i32` scalar leaf.
pub fn read_i32(frame: &Frame) -> i32 {
    assert_eq!(frame.kind(), tags::KIND_INT32);
    let (value, _) = varint::decode_signed(frame.payload()).expect("int32 varint");
    value as i32
}

/// Decode an `f32` scalar leaf.
pub fn read_f32(frame: &Frame) -> f32 {
    assert_eq!(frame.kind(), tags::KIND_FLOAT32);
    let bytes: [u8; 4] = frame.payload().try_into().expect("f32 payload");
    f32::from_le_bytes(bytes)
}

/// Decode a pose leaf into (x, y, heading).
pub fn read_pose(frame: &Frame) -> (f32, f32, f32) {
    assert_eq!(frame.kind(), tags::KIND_POSE);
    let p = frame.payload();
    (
        f32::from_le_bytes(p[0..4].try_into().unwrap()),
        f32::from_le_bytes(p[4..8].try_into().unwrap()),
        f32::from_le_bytes(p[8..12].try_into().unwrap()),
    )
}

/// Decode a bool leaf.
pub fn read_bool(frame: &Frame) -> bool {
    match frame.kind() {
        tags::KIND_BOOL_TRUE => true,
        tags::KIND_BOOL_FALSE => false,
        other => panic!("not a bool tag: {other:#04x}"),
    }
}

/// Raw contents of a quantized-particle payload: the six bounds and the
/// interleaved (x, y, weight) delta triples, decoded per the given
/// polarity but not yet cumulative-summed.
pub struct QuantizedPayload {
    pub bounds: [f32; 6],
    pub x_deltas: Vec<i64>,
    pub y_deltas: Vec<i64>,
    pub w_deltas: Vec<i64>,
}

/// Split a quantized-particle payload of `n` particles.
pub fn read_quantized_payload(frame: &Frame, n: usize, signed: bool) -> QuantizedPayload {
    assert_eq!(frame.kind(), tags::KIND_PARTICLES_QUANTIZED);
    let payload = frame.payload();
    let mut bounds = [0.0f32; 6];
    for (i, bound) in bounds.iter_mut().enumerate() {
        *bound = f32::from_le_bytes(payload[i * 4..i * 4 + 4].try_into().unwrap());
    }
    let mut offset = 24;
    let mut planes = [Vec::new(), Vec::new(), Vec::new()];
    for _ in 0..n {
        for plane in planes.iter_mut() {
            let (value, used) = if signed {
                varint::decode_signed(&payload[offset..]).expect("delta varint")
            } else {
                let (v, used) = varint::decode_unsigned(&payload[offset..]).expect("delta varint");
                (v as i64, used)
            };
            plane.push(value);
            offset += used;
        }
    }
    assert_eq!(offset, payload.len(), "quantized payload length mismatch");
    let [x_deltas, y_deltas, w_deltas] = planes;
    QuantizedPayload {
        bounds,
        x_deltas,
        y_deltas,
        w_deltas,
    }
}
