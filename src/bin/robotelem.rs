// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robotelem CLI
//!
//! Thin driver around the telemetry encoder: load a schema config, build
//! frames from simulated particle-filter data, and write them to a file
//! for the off-device decoder to chew on.
//!
//! ## Usage
//!
//! ```sh
//! # Print the preallocation bound for a schema
//! robotelem estimate --config schema.toml
//!
//! # Encode 10 simulated logging cycles into frames.bin
//! robotelem encode --config schema.toml --output frames.bin --cycles 10
//! ```
//!
//! The robot firmware links the library directly; this binary exists for
//! bench testing the wire format.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use robotelem::io::{Transport, WriterTransport};
use robotelem::schema::{DistanceReading, SchemaConfig, TelemetrySchema};

/// Robotelem - telemetry frame bench tool
#[derive(Parser)]
#[command(name = "robotelem")]
#[command(about = "Encode robot telemetry frames for bench testing", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the estimated buffer size for a schema config
    Estimate {
        /// Schema config TOML (defaults to the built-in schema)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Encode simulated logging cycles into a frame file
    Encode {
        /// Schema config TOML (defaults to the built-in schema)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file for the concatenated frames
        #[arg(long, short)]
        output: PathBuf,
        /// Number of logging cycles to simulate
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SchemaConfig> {
    match path {
        None => Ok(SchemaConfig::default()),
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
        }
    }
}

/// Deterministic particle cloud for cycle `tick`: a cluster drifting
/// across the field with decaying weights. Good enough to exercise the
/// bounds/delta paths; not a physics model.
fn simulate_particles(n: usize, tick: u32) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let mut state = u64::from(tick).wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1 << 24) as f32 - 0.5
    };
    let drift = tick as f32 * 0.01;
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut w = Vec::with_capacity(n);
    for i in 0..n {
        x.push(drift + next() * 0.2);
        y.push(-drift + next() * 0.2);
        w.push(1.0 / (i as f32 + 1.0));
    }
    (x, y, w)
}

fn run_estimate(config: Option<&PathBuf>) -> Result<()> {
    let schema = TelemetrySchema::new(load_config(config)?)?;
    println!(
        "particles: {}, sensors: {}, buffer bound: {} bytes",
        schema.particle_capacity(),
        schema.sensor_count(),
        schema.estimated_size()
    );
    Ok(())
}

fn run_encode(config: Option<&PathBuf>, output: &PathBuf, cycles: u32) -> Result<()> {
    let mut schema = TelemetrySchema::new(load_config(config)?)?;
    let mut buffer = schema.make_buffer();
    let file = fs::File::create(output)
        .with_context(|| format!("creating output {}", output.display()))?;
    let mut transport = WriterTransport::new(file);

    let mut total = 0usize;
    for tick in 0..cycles {
        let (x, y, w) = simulate_particles(schema.particle_capacity(), tick);
        schema.set_generation(tick * 20, 900 + tick);
        schema.set_pose(x[0], y[0], 0.1 * tick as f32);
        for sensor in 0..schema.sensor_count() {
            schema.set_distance_sensor(
                sensor,
                DistanceReading {
                    identifier: sensor as i32,
                    measured_distance: 0.5 + sensor as f32 * 0.1,
                    confidence: 63,
                    object_size: 200,
                    exit: sensor % 2 == 0,
                },
            )?;
        }
        schema.set_particles(&x, &y, &w)?;
        let written = schema.encode_message(&mut buffer)?;
        transport.send_frame(buffer.as_slice())?;
        total += written;
    }
    info!(
        cycles,
        total_bytes = total,
        output = %output.display(),
        "encoded frames"
    );
    println!("{cycles} frame(s), {total} bytes -> {}", output.display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Estimate { config } => run_estimate(config.as_ref()),
        Commands::Encode {
            config,
            output,
            cycles,
        } => run_encode(config.as_ref(), output, *cycles),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}
