// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robotelem
//!
//! Compact telemetry encoding for resource-constrained robot controllers.
//!
//! A telemetry message is a fixed tree of typed leaves (pose estimate,
//! distance-sensor readings, particle-filter clouds) serialized into a
//! self-framing byte stream for a narrow serial link. Large particle
//! arrays are shrunk by fixed-range quantization, delta encoding, and a
//! varint codec; everything else is tag-plus-payload with backpatched
//! length fields.
//!
//! The crate is the encoder side of a schema-by-convention protocol:
//! decoding happens off-device against the tag table in [`schema::tags`].
//!
//! ## Architecture
//!
//! - `core/` - error taxonomy
//! - `encoding/` - varint, quantizer, delta codec, byte sink, framing
//!   driver, size estimator
//! - `schema/` - tag table, message tree, the concrete telemetry schema
//! - `io/` - transport boundary
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> robotelem::Result<()> {
//! use robotelem::schema::{SchemaConfig, TelemetrySchema};
//!
//! let mut schema = TelemetrySchema::new(SchemaConfig {
//!     particle_capacity: 4,
//!     distance_sensors: 1,
//!     ..SchemaConfig::default()
//! })?;
//! schema.set_generation(10, 850);
//! schema.set_pose(1.0, 2.0, 0.5);
//! schema.set_particles(&[-1.0, 0.0, 1.0, 2.0], &[0.0; 4], &[0.25; 4])?;
//!
//! let mut buffer = schema.make_buffer();
//! let written = schema.encode_message(&mut buffer)?;
//! assert!(written <= schema.estimated_size());
//! # Ok(())
//! # }
//! ```
//!
//! Encoding is single-threaded and synchronous; a message tree must not be
//! mutated while an encode of it is in flight.

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{Result, TelemetryError};

// Compression and framing
pub mod encoding;

// Message schema
pub mod schema;

// Transport boundary
pub mod io;

pub use encoding::{encode, estimate_size, LogBuffer};
pub use io::{Transport, WriterTransport};
pub use schema::{DistanceReading, SchemaConfig, TelemetrySchema};
