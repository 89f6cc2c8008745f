//! Configuration for the chisel mesher.
//!
//! Settings persist to disk as `config.ron`; missing fields fall back to their
//! defaults and command-line flags override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, ExportConfig, MeshConfig};
pub use error::ConfigError;
