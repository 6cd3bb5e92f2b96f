// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire tag table.
//!
//! This is a schema-by-convention protocol: both sides of the serial link
//! know these constants out-of-band, nothing on the wire is self-describing.
//! The enumeration is closed; adding a field means allocating a new kind tag
//! here and teaching the off-device decoder about it.

/// Type tag for structural (category) nodes: framing only, no payload.
pub const TYPE_CATEGORY: u8 = 0x70;

/// Type tag for data-bearing nodes of variable size.
pub const TYPE_DATA: u8 = 0x71;

/// Signed 32-bit integer leaf (zigzag varint payload).
pub const KIND_INT32: u8 = 0x11;

/// IEEE-754 32-bit float leaf (4 raw bytes).
pub const KIND_FLOAT32: u8 = 0x12;

/// Pose leaf: x, y, heading as three raw f32s.
pub const KIND_POSE: u8 = 0x13;

/// Unsigned 32-bit integer leaf (varint payload).
pub const KIND_UINT32: u8 = 0x14;

/// Boolean true. The value is the tag; zero payload bytes.
pub const KIND_BOOL_TRUE: u8 = 0x15;

/// Boolean false. The value is the tag; zero payload bytes.
pub const KIND_BOOL_FALSE: u8 = 0x16;

/// Generation-info category: timestamp, time taken, pose, distance sensors.
pub const KIND_GENERATION_INFO: u8 = 0x40;

/// Particle array leaf, three planes of 16-bit floats.
pub const KIND_PARTICLES_F16: u8 = 0x41;

/// Distance-sensor category: identifier, distance, confidence, size, exit.
pub const KIND_DISTANCE_SENSOR: u8 = 0x42;

/// Particle array leaf, quantized and delta-encoded with varint deltas.
pub const KIND_PARTICLES_QUANTIZED: u8 = 0x49;

/// Root category of a telemetry message.
pub const KIND_ROOT: u8 = 0xAF;
