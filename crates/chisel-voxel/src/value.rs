//! Block values stored in a micro-voxel palette.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the empty block. Air occupies no face and blocks nothing.
pub const AIR_ID: &str = "minecraft:air";

/// Property name → property value pairs describing a block state
/// (e.g. `facing=north`, `half=top`).
pub type BlockState = BTreeMap<String, String>;

/// A namespaced block identifier plus its block state.
///
/// `PartialEq` compares content. Meshing never uses it to decide whether two
/// cells may merge; that uses palette-slot identity (see
/// [`crate::PaletteSlot`]). Content comparison is only used to recognise air.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelValue {
    /// Namespaced identifier, e.g. `"minecraft:stone"`.
    pub id: String,
    /// Block state properties.
    #[serde(default)]
    pub state: BlockState,
}

impl VoxelValue {
    /// Creates a value with an empty block state.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: BlockState::new(),
        }
    }

    /// Creates a value with the given properties.
    pub fn with_state<K, V>(id: impl Into<String>, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id: id.into(),
            state: props
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The default air value.
    pub fn air() -> Self {
        Self::new(AIR_ID)
    }

    /// Returns `true` if this value's identifier equals `air_id`.
    ///
    /// Only the identifier is compared; an air entry with properties is still air.
    pub fn is_air_with(&self, air_id: &str) -> bool {
        self.id == air_id
    }

    /// Returns `true` if this value is `minecraft:air`.
    pub fn is_air(&self) -> bool {
        self.is_air_with(AIR_ID)
    }
}

impl fmt::Display for VoxelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)?;
        if !self.state.is_empty() {
            f.write_str("[")?;
            for (i, (k, v)) in self.state.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{k}={v}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}
