// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The concrete telemetry schema for the particle-filter controller.
//!
//! One message per logging cycle:
//!
//! ```text
//! root (0xAF)
//! ├── generation info (0x40)
//! │   ├── timestamp        u32, ms since boot
//! │   ├── time taken       u32, µs spent on this generation
//! │   ├── pose prediction  x, y, heading
//! │   └── distance sensor (0x42) × sensor count
//! │       ├── identifier, measured distance, confidence, object size
//! │       └── exit flag
//! └── particle cloud (0x41 or 0x49, per config)
//! ```
//!
//! The tree is built once from a [`SchemaConfig`]; producers overwrite leaf
//! values through the typed setters between encode cycles. The tree must
//! not be mutated while an encode of it is in flight; nothing enforces
//! this, it is a caller precondition.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::{Result, TelemetryError};
use crate::encoding::buffer::LogBuffer;
use crate::encoding::{encode, estimate_size};
use crate::schema::node::{
    LeafValue, MessageNode, ParticlesF16, ParticlesQuantized, QuantizedConfig,
};
use crate::schema::tags;

// Child positions inside the root and generation-info categories. The
// setters navigate by these; they are as much a part of the wire contract
// as the tag values.
const ROOT_GENERATION: usize = 0;
const ROOT_PARTICLES: usize = 1;
const GEN_TIMESTAMP: usize = 0;
const GEN_TIME_TAKEN: usize = 1;
const GEN_POSE: usize = 2;
const GEN_FIRST_SENSOR: usize = 3;
const SENSOR_IDENTIFIER: usize = 0;
const SENSOR_DISTANCE: usize = 1;
const SENSOR_CONFIDENCE: usize = 2;
const SENSOR_OBJECT_SIZE: usize = 3;
const SENSOR_EXIT: usize = 4;

/// Particle-cloud representation selected at schema construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ParticleCompression {
    /// Three planes of 16-bit floats, 6 bytes per particle
    Float16,
    /// Affine quantization plus delta-encoded varints
    Quantized(QuantizedConfig),
}

impl Default for ParticleCompression {
    fn default() -> Self {
        ParticleCompression::Quantized(QuantizedConfig::default())
    }
}

/// Construction-time schema parameters. Part of the schema's immutable
/// identity; the decoder must agree on all of them out-of-band.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    /// Fixed particle count N
    pub particle_capacity: usize,
    /// Number of distance-sensor groups
    pub distance_sensors: usize,
    /// Particle-cloud representation
    #[serde(default)]
    pub compression: ParticleCompression,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            particle_capacity: 500,
            distance_sensors: 4,
            compression: ParticleCompression::default(),
        }
    }
}

/// One distance-sensor reading, set as a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceReading {
    /// Which physical sensor produced this reading
    pub identifier: i32,
    /// Measured distance in meters
    pub measured_distance: f32,
    /// Sensor-reported confidence
    pub confidence: i32,
    /// Sensor-reported object size
    pub object_size: i32,
    /// Whether the ray exited the field without a hit
    pub exit: bool,
}

/// The telemetry message tree with typed producer mutators.
#[derive(Debug, Clone)]
pub struct TelemetrySchema {
    root: MessageNode,
    particle_capacity: usize,
    sensor_count: usize,
    buffer_size: usize,
}

impl TelemetrySchema {
    /// Build the message tree from the given configuration.
    ///
    /// Bit widths come from untrusted TOML, so they are validated here
    /// rather than at first encode: anything outside `1..=31` is rejected.
    pub fn new(config: SchemaConfig) -> Result<Self> {
        if let ParticleCompression::Quantized(q) = config.compression {
            for bits in [q.xy_bits, q.weight_bits] {
                if !(1..=31).contains(&bits) {
                    return Err(TelemetryError::invalid_bit_width(bits));
                }
            }
            // Delta aliasing under a small modulus cannot be ruled out
            // without knowing the particle dynamics; flag configs where a
            // single resampling jump could exceed half the representable
            // range.
            if q.xy_bits < 8 {
                warn!(
                    xy_bits = q.xy_bits,
                    "spatial quantization below 8 bits risks delta aliasing"
                );
            }
        }

        let particles = match config.compression {
            ParticleCompression::Float16 => {
                LeafValue::ParticlesF16(ParticlesF16::new(config.particle_capacity))
            }
            ParticleCompression::Quantized(q) => {
                LeafValue::ParticlesQuantized(ParticlesQuantized::new(config.particle_capacity, q))
            }
        };

        let mut generation_children = vec![
            MessageNode::Leaf(LeafValue::UInt32(0)),
            MessageNode::Leaf(LeafValue::UInt32(0)),
            MessageNode::Leaf(LeafValue::Pose {
                x: 0.0,
                y: 0.0,
                heading: 0.0,
            }),
        ];
        for _ in 0..config.distance_sensors {
            generation_children.push(Self::distance_sensor_node());
        }

        let root = MessageNode::category(
            tags::KIND_ROOT,
            vec![
                MessageNode::category(tags::KIND_GENERATION_INFO, generation_children),
                MessageNode::Leaf(particles),
            ],
        );

        let buffer_size = estimate_size(&root);
        Ok(Self {
            root,
            particle_capacity: config.particle_capacity,
            sensor_count: config.distance_sensors,
            buffer_size,
        })
    }

    fn distance_sensor_node() -> MessageNode {
        MessageNode::category(
            tags::KIND_DISTANCE_SENSOR,
            vec![
                MessageNode::Leaf(LeafValue::Int32(0)),
                MessageNode::Leaf(LeafValue::Float32(0.0)),
                MessageNode::Leaf(LeafValue::Int32(0)),
                MessageNode::Leaf(LeafValue::Int32(0)),
                MessageNode::Leaf(LeafValue::Bool(false)),
            ],
        )
    }

    /// The schema's root node.
    #[must_use]
    pub fn root(&self) -> &MessageNode {
        &self.root
    }

    /// Fixed particle capacity N.
    #[must_use]
    pub const fn particle_capacity(&self) -> usize {
        self.particle_capacity
    }

    /// Number of distance-sensor groups.
    #[must_use]
    pub const fn sensor_count(&self) -> usize {
        self.sensor_count
    }

    /// Minimum safe buffer capacity for encoding this schema, computed once
    /// at construction (the bound is value-independent).
    #[must_use]
    pub const fn estimated_size(&self) -> usize {
        self.buffer_size
    }

    /// Allocate a buffer sized for this schema.
    #[must_use]
    pub fn make_buffer(&self) -> LogBuffer {
        LogBuffer::with_capacity(self.buffer_size)
    }

    /// Store the generation timing values.
    pub fn set_generation(&mut self, timestamp_ms: u32, time_taken_us: u32) {
        let gen = self.root.child_mut(ROOT_GENERATION);
        *gen.child_mut(GEN_TIMESTAMP).leaf_mut() = LeafValue::UInt32(timestamp_ms);
        *gen.child_mut(GEN_TIME_TAKEN).leaf_mut() = LeafValue::UInt32(time_taken_us);
    }

    /// Store the pose prediction.
    pub fn set_pose(&mut self, x: f32, y: f32, heading: f32) {
        let gen = self.root.child_mut(ROOT_GENERATION);
        *gen.child_mut(GEN_POSE).leaf_mut() = LeafValue::Pose { x, y, heading };
    }

    /// Store one distance-sensor reading.
    pub fn set_distance_sensor(&mut self, index: usize, reading: DistanceReading) -> Result<()> {
        if index >= self.sensor_count {
            return Err(TelemetryError::sensor_index_out_of_range(
                index,
                self.sensor_count,
            ));
        }
        let sensor = self
            .root
            .child_mut(ROOT_GENERATION)
            .child_mut(GEN_FIRST_SENSOR + index);
        *sensor.child_mut(SENSOR_IDENTIFIER).leaf_mut() = LeafValue::Int32(reading.identifier);
        *sensor.child_mut(SENSOR_DISTANCE).leaf_mut() =
            LeafValue::Float32(reading.measured_distance);
        *sensor.child_mut(SENSOR_CONFIDENCE).leaf_mut() = LeafValue::Int32(reading.confidence);
        *sensor.child_mut(SENSOR_OBJECT_SIZE).leaf_mut() = LeafValue::Int32(reading.object_size);
        *sensor.child_mut(SENSOR_EXIT).leaf_mut() = LeafValue::Bool(reading.exit);
        Ok(())
    }

    /// Store the particle cloud.
    ///
    /// With quantized compression all three slices must have exactly the
    /// schema capacity (bounds and deltas need the whole array at once);
    /// the f16 representation accepts a prefix fill.
    pub fn set_particles(&mut self, x: &[f32], y: &[f32], weights: &[f32]) -> Result<()> {
        match self.root.child_mut(ROOT_PARTICLES).leaf_mut() {
            LeafValue::ParticlesF16(cloud) => cloud.set_particles(x, y, weights, 0),
            LeafValue::ParticlesQuantized(cloud) => cloud.set_particles(x, y, weights),
            _ => unreachable!("particle slot holds a particle leaf by construction"),
        }
    }

    /// Encode the current leaf values into `buffer` as one framed message.
    ///
    /// Clears the buffer first, so one buffer can be reused across cycles.
    pub fn encode_message(&self, buffer: &mut LogBuffer) -> Result<usize> {
        buffer.clear();
        let written = encode(&self.root, buffer)?;
        debug!(bytes = written, capacity = buffer.capacity(), "encoded telemetry frame");
        Ok(written)
    }
}
