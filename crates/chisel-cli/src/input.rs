//! Input files: one or more placed bits blocks per RON file.
//!
//! ```ron
//! (
//!     blocks: [
//!         (
//!             origin: (10, 64, -3),
//!             biome: Some("minecraft:desert"),
//!             entity: (palette: Some([(name: "minecraft:air")]), bits_v2: Some([0, 0, /* ... */])),
//!         ),
//!     ],
//! )
//! ```

use std::path::{Path, PathBuf};

use chisel_voxel::BitsBlockEntity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading an input file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid block list.
    #[error("failed to parse {path}: {source}")]
    Ron {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// A bits block placed in the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    /// Integer block position.
    pub origin: (i32, i32, i32),
    /// Biome for material lookup; the configured default when absent.
    #[serde(default)]
    pub biome: Option<String>,
    /// The block entity record.
    pub entity: BitsBlockEntity,
}

/// Contents of one input file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockFile {
    #[serde(default)]
    pub blocks: Vec<PlacedBlock>,
}

impl BlockFile {
    pub fn from_ron_str(path: &Path, src: &str) -> Result<Self, InputError> {
        ron::from_str(src).map_err(|source| InputError::Ron {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, InputError> {
        let src = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_ron_str(path, &src)?;
        tracing::debug!(path = %path.display(), blocks = file.blocks.len(), "loaded block file");
        Ok(file)
    }
}
