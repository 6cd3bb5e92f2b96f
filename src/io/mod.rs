// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Transport boundary.
//!
//! The core assumes a reliable byte pipe; it hands each finished frame to a
//! [`Transport`] exactly once and never retries or buffers across messages.
//! On the robot this is the serial link; in tests and tooling it is any
//! `std::io::Write`.

use std::io::Write;

use crate::core::{Result, TelemetryError};

/// Sink for finished telemetry frames.
pub trait Transport {
    /// Hand off one complete frame. The call marks the logical
    /// end-of-message; the transport must not split accounting across
    /// calls.
    fn send_frame(&mut self, frame: &[u8]) -> Result<()>;
}

/// Transport over any `std::io::Write`, flushing per frame so the
/// end-of-message actually reaches the pipe.
#[derive(Debug)]
pub struct WriterTransport<W: Write> {
    writer: W,
    frames_sent: u64,
}

impl<W: Write> WriterTransport<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames_sent: 0,
        }
    }

    /// Number of frames handed off so far.
    #[must_use]
    pub const fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for WriterTransport<W> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.writer
            .write_all(frame)
            .and_then(|()| self.writer.flush())
            .map_err(|e| TelemetryError::transport(e.to_string()))?;
        self.frames_sent += 1;
        Ok(())
    }
}
