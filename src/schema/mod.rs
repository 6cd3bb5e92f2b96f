// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message schema: the declarative tree of typed leaves.
//!
//! - [`tags`] - the closed wire tag table
//! - [`node`] - generic tree nodes and leaf payloads
//! - [`telemetry`] - the concrete particle-filter schema with typed setters

pub mod node;
pub mod tags;
pub mod telemetry;

pub use node::{LeafValue, MessageNode, ParticlesF16, ParticlesQuantized, QuantizedConfig, WirePolicy};
pub use telemetry::{DistanceReading, ParticleCompression, SchemaConfig, TelemetrySchema};
