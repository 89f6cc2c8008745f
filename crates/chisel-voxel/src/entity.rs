//! The block-entity record a chiselled block is stored as: a palette list plus
//! a `bits_v2` index array.

use serde::{Deserialize, Serialize};

use crate::grid::VoxelGrid;
use crate::palette::{DecodeError, Palette, decode_grid};
use crate::value::{BlockState, VoxelValue};

/// One palette entry as stored on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Namespaced block identifier.
    #[serde(alias = "Name")]
    pub name: String,
    /// Block state, absent for blocks without properties.
    #[serde(default, alias = "Properties", skip_serializing_if = "Option::is_none")]
    pub properties: Option<BlockState>,
}

impl From<&PaletteEntry> for VoxelValue {
    fn from(entry: &PaletteEntry) -> Self {
        Self {
            id: entry.name.clone(),
            state: entry.properties.clone().unwrap_or_default(),
        }
    }
}

impl From<&VoxelValue> for PaletteEntry {
    fn from(value: &VoxelValue) -> Self {
        Self {
            name: value.id.clone(),
            properties: (!value.state.is_empty()).then(|| value.state.clone()),
        }
    }
}

/// Raw micro-voxel block entity. Either field may be missing in damaged data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitsBlockEntity {
    /// Palette entries in slot order.
    #[serde(default)]
    pub palette: Option<Vec<PaletteEntry>>,
    /// Little-endian `u16` palette index per cell.
    #[serde(default)]
    pub bits_v2: Option<Vec<u8>>,
}

impl BitsBlockEntity {
    /// Decodes this entity into a grid.
    ///
    /// # Errors
    ///
    /// See [`decode_grid`].
    pub fn decode(&self) -> Result<VoxelGrid, DecodeError> {
        let palette = self
            .palette
            .as_ref()
            .map(|entries| entries.iter().map(VoxelValue::from).collect::<Palette>());
        decode_grid(palette, self.bits_v2.as_deref())
    }

    /// Encodes a grid back into block-entity form.
    pub fn from_grid(grid: &VoxelGrid) -> Self {
        let palette = grid.palette().entries().iter().map(PaletteEntry::from).collect();
        let mut bits = Vec::with_capacity(crate::palette::BITS_LEN);
        for (_, slot) in grid.iter() {
            bits.extend_from_slice(&slot.0.to_le_bytes());
        }
        Self {
            palette: Some(palette),
            bits_v2: Some(bits),
        }
    }
}
