// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout robotelem.
//!
//! This module provides the foundational types for the library:
//! - [`TelemetryError`] - Error taxonomy for build, encode, and decode paths
//! - [`Result`] - Crate-wide result alias

pub mod error;

pub use error::{Result, TelemetryError};
