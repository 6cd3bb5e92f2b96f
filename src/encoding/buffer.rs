// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-capacity byte sink with backpatch support.
//!
//! [`LogBuffer`] is a strictly sequential, single-writer byte store: writes
//! append at a monotonically advancing cursor, and the only random access
//! allowed is patching a region that was previously reserved with
//! [`LogBuffer::reserve`]. The framing driver uses this to backfill length
//! fields after recursing into a node's children.
//!
//! Capacity is fixed at construction (sized by the estimator). A write that
//! would run past capacity fails with `CapacityExceeded` instead of growing
//! the buffer, so a sizing bug surfaces as a hard, checked error rather than
//! a reallocation on the robot's hot path.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{Result, TelemetryError};

/// Position of a reserved region, returned by [`LogBuffer::reserve`].
///
/// Deliberately opaque: the only thing a caller can do with it is hand it
/// back to [`LogBuffer::patch_u32_le`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch(usize);

impl Patch {
    /// Byte offset of the reserved region from the start of the buffer.
    #[must_use]
    pub const fn position(self) -> usize {
        self.0
    }
}

/// Sequential byte writer over a preallocated region.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    /// Backing store, allocated once at construction
    data: Vec<u8>,
    /// Current write cursor
    cursor: usize,
}

impl LogBuffer {
    /// Create a buffer with the given fixed capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            cursor: 0,
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cursor
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Total capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes remaining before the capacity limit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// The written byte range.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// Reset the cursor for the next message, keeping the allocation.
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    fn check_capacity(&self, requested: usize) -> Result<()> {
        if requested > self.remaining() {
            return Err(TelemetryError::capacity_exceeded(
                requested,
                self.remaining(),
                self.cursor,
            ));
        }
        Ok(())
    }

    /// Append bytes at the cursor. Returns the number of bytes written.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.check_capacity(bytes.len())?;
        self.data[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
        Ok(bytes.len())
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<usize> {
        self.check_capacity(1)?;
        self.data[self.cursor] = value;
        self.cursor += 1;
        Ok(1)
    }

    /// Append a little-endian u32.
    pub fn write_u32_le(&mut self, value: u32) -> Result<usize> {
        self.check_capacity(4)?;
        LittleEndian::write_u32(&mut self.data[self.cursor..self.cursor + 4], value);
        self.cursor += 4;
        Ok(4)
    }

    /// Append a little-endian f32.
    pub fn write_f32_le(&mut self, value: f32) -> Result<usize> {
        self.check_capacity(4)?;
        LittleEndian::write_f32(&mut self.data[self.cursor..self.cursor + 4], value);
        self.cursor += 4;
        Ok(4)
    }

    /// Advance the cursor by `n` bytes without writing, returning the
    /// position of the hole for a later [`LogBuffer::patch_u32_le`].
    ///
    /// The reserved bytes stay zeroed until patched.
    pub fn reserve(&mut self, n: usize) -> Result<Patch> {
        self.check_capacity(n)?;
        let patch = Patch(self.cursor);
        self.cursor += n;
        Ok(patch)
    }

    /// Backfill a previously reserved 4-byte region with a little-endian
    /// u32, without moving the cursor.
    ///
    /// The target must lie entirely inside the already-written region;
    /// anything else is a framing-driver bug and fails with `InvalidPatch`.
    pub fn patch_u32_le(&mut self, patch: Patch, value: u32) -> Result<()> {
        let pos = patch.position();
        if pos + 4 > self.cursor {
            return Err(TelemetryError::invalid_patch(pos, 4, self.cursor));
        }
        LittleEndian::write_u32(&mut self.data[pos..pos + 4], value);
        Ok(())
    }
}
