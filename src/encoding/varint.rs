// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variable-length integer codec.
//!
//! Standard base-128 continuation encoding: each byte carries 7 value bits,
//! the high bit flags a continuation. Signed values go through a zigzag map
//! first so that small magnitudes of either sign stay short. A 64-bit value
//! encodes to at most [`MAX_VARINT_LEN`] bytes.
//!
//! Encoding writes into a [`LogBuffer`]; decoding reads from a plain slice
//! and is used by the test-side frame walkers and off-device tooling.

use super::buffer::LogBuffer;
use crate::core::{Result, TelemetryError};

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Zigzag-map a signed value to unsigned.
///
/// `0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...`
#[inline]
#[must_use]
pub const fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag`].
#[inline]
#[must_use]
pub const fn unzigzag(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Number of bytes [`encode_unsigned`] will emit for `value`.
#[must_use]
pub const fn unsigned_len(value: u64) -> usize {
    // 1 byte per started group of 7 bits, minimum 1
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}

/// Number of bytes [`encode_signed`] will emit for `value`.
#[must_use]
pub const fn signed_len(value: i64) -> usize {
    unsigned_len(zigzag(value))
}

/// Encode an unsigned value into the buffer. Returns the bytes written.
pub fn encode_unsigned(mut value: u64, buffer: &mut LogBuffer) -> Result<usize> {
    let mut written = 0;
    while value >= 0x80 {
        written += buffer.write_u8((value as u8 & 0x7F) | 0x80)?;
        value >>= 7;
    }
    written += buffer.write_u8(value as u8)?;
    Ok(written)
}

/// Encode a signed value (zigzag-mapped) into the buffer.
pub fn encode_signed(value: i64, buffer: &mut LogBuffer) -> Result<usize> {
    encode_unsigned(zigzag(value), buffer)
}

/// Decode an unsigned varint starting at `data[0]`.
///
/// Returns the value and the number of bytes consumed. Fails with
/// `MalformedVarint` if the continuation chain runs off the end of the
/// slice or past the 10-byte maximum.
pub fn decode_unsigned(data: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(TelemetryError::malformed_varint());
        }
        value |= u64::from(byte & 0x7F) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(TelemetryError::malformed_varint())
}

/// Decode a signed (zigzag-mapped) varint starting at `data[0]`.
pub fn decode_signed(data: &[u8]) -> Result<(i64, usize)> {
    let (u, len) = decode_unsigned(data)?;
    Ok((unzigzag(u), len))
}
