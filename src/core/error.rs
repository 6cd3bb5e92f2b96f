// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for robotelem.
//!
//! Three failure classes cover the whole encoder:
//! - Domain errors from the producer (bad quantization range, wrong slice
//!   length, bad sensor index) — abort the current build only.
//! - Contract violations in the byte sink (capacity overflow, patching an
//!   unreserved region) — these indicate a sizing bug, not bad input.
//! - Malformed input on the decoding side (varint that never terminates).

use std::fmt;

/// Errors that can occur while building or serializing a telemetry message.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryError {
    /// Quantization range is empty or not finite
    InvalidRange {
        /// Lower bound that was supplied
        min: f32,
        /// Upper bound that was supplied
        max: f32,
    },

    /// Producer slice length does not match the schema's fixed capacity
    LengthMismatch {
        /// Capacity the schema was built with
        expected: usize,
        /// Length the producer supplied
        actual: usize,
    },

    /// Distance-sensor index outside the configured sensor count
    SensorIndexOutOfRange {
        /// Index the producer addressed
        index: usize,
        /// Number of sensors in the schema
        count: usize,
    },

    /// Write would exceed the buffer's preallocated capacity.
    ///
    /// The estimator guarantees this never happens for a correctly sized
    /// buffer, so hitting it means a sizing bug rather than bad input.
    CapacityExceeded {
        /// Bytes the write needed
        requested: usize,
        /// Bytes left before the capacity limit
        available: usize,
        /// Cursor position when the write was attempted
        position: usize,
    },

    /// Backpatch target lies outside the already-written region
    InvalidPatch {
        /// Start of the patch
        position: usize,
        /// Patch length in bytes
        len: usize,
        /// Bytes written so far
        written: usize,
    },

    /// Quantizer bit width outside the supported range
    InvalidBitWidth {
        /// Bit width that was supplied
        bits: u32,
    },

    /// Varint whose continuation bits never terminate within the buffer,
    /// or that runs longer than the 10-byte maximum for 64-bit values
    MalformedVarint,

    /// Transport-layer failure while handing off a finished frame
    TransportError {
        /// Underlying error message
        message: String,
    },
}

impl TelemetryError {
    /// Create an invalid quantization range error.
    pub fn invalid_range(min: f32, max: f32) -> Self {
        TelemetryError::InvalidRange { min, max }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        TelemetryError::LengthMismatch { expected, actual }
    }

    /// Create a sensor index error.
    pub fn sensor_index_out_of_range(index: usize, count: usize) -> Self {
        TelemetryError::SensorIndexOutOfRange { index, count }
    }

    /// Create a capacity exceeded error.
    pub fn capacity_exceeded(requested: usize, available: usize, position: usize) -> Self {
        TelemetryError::CapacityExceeded {
            requested,
            available,
            position,
        }
    }

    /// Create an invalid patch error.
    pub fn invalid_patch(position: usize, len: usize, written: usize) -> Self {
        TelemetryError::InvalidPatch {
            position,
            len,
            written,
        }
    }

    /// Create an invalid bit width error.
    pub fn invalid_bit_width(bits: u32) -> Self {
        TelemetryError::InvalidBitWidth { bits }
    }

    /// Create a malformed varint error.
    pub fn malformed_varint() -> Self {
        TelemetryError::MalformedVarint
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        TelemetryError::TransportError {
            message: message.into(),
        }
    }

    /// Whether this error indicates a broken sizing/backpatch contract
    /// rather than bad producer input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            TelemetryError::CapacityExceeded { .. } | TelemetryError::InvalidPatch { .. }
        )
    }
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidRange { min, max } => {
                write!(f, "Invalid quantization range [{min}, {max}]")
            }
            TelemetryError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Particle slice length {actual} does not match schema capacity {expected}"
                )
            }
            TelemetryError::SensorIndexOutOfRange { index, count } => {
                write!(
                    f,
                    "Distance sensor index {index} out of range (schema has {count} sensors)"
                )
            }
            TelemetryError::CapacityExceeded {
                requested,
                available,
                position,
            } => write!(
                f,
                "Buffer capacity exceeded: requested {requested} bytes at position {position}, but only {available} bytes remain"
            ),
            TelemetryError::InvalidPatch {
                position,
                len,
                written,
            } => write!(
                f,
                "Patch of {len} bytes at position {position} lies outside the written region ({written} bytes)"
            ),
            TelemetryError::InvalidBitWidth { bits } => {
                write!(f, "Quantizer bit width {bits} outside the supported 1..=31 range")
            }
            TelemetryError::MalformedVarint => {
                write!(f, "Malformed varint")
            }
            TelemetryError::TransportError { message } => {
                write!(f, "Transport error: {message}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {}

/// Result type for robotelem operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
