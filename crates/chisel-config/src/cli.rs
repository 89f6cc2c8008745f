//! Command-line argument parsing for the chisel mesher.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Chisel command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "chisel", about = "Greedy-mesh chiselled micro-voxel blocks to OBJ")]
pub struct CliArgs {
    /// Block entity files (RON) to mesh.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Block registry manifest (RON).
    #[arg(long, short)]
    pub registry: PathBuf,

    /// Number of meshing worker threads.
    #[arg(long)]
    pub workers: Option<usize>,

    /// Biome used when an input names none.
    #[arg(long)]
    pub biome: Option<String>,

    /// Block identifier treated as empty space.
    #[arg(long)]
    pub air_id: Option<String>,

    /// Output OBJ path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Uniform scale for exported positions.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(workers) = args.workers {
            self.mesh.workers = workers;
        }
        if let Some(ref biome) = args.biome {
            self.mesh.default_biome = biome.clone();
        }
        if let Some(ref air) = args.air_id {
            self.mesh.air_id = air.clone();
        }
        if let Some(ref output) = args.output {
            self.export.output = output.clone();
        }
        if let Some(scale) = args.scale {
            self.export.scale = scale;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
