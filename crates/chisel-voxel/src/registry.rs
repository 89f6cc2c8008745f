//! Block registry: occlusion class and render materials per block value.
//!
//! Meshing only depends on the [`BlockRegistry`] trait. [`BlockTable`] is a
//! data-driven implementation loaded from a RON manifest.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::{BlockState, VoxelValue};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How much of an adjacent face a block hides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occlusion {
    /// Hides any face touching it, whatever the neighbour is.
    Full,
    /// Hides faces of identical neighbours only (glass, leaves).
    Partial,
    /// Hides nothing by itself.
    None,
}

/// Render material identifier, e.g. `"minecraft:stone"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub String);

impl MaterialId {
    /// Creates a material identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised when a block value cannot be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryLookupError {
    /// The identifier is not registered.
    #[error("unknown block: {0}")]
    UnknownBlock(String),
    /// The block resolved to an empty material list.
    #[error("block {0} has no materials")]
    NoMaterials(String),
}

/// Errors raised while building a [`BlockTable`].
#[derive(Debug, Error)]
pub enum RegistryLoadError {
    /// I/O error reading the manifest file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// RON deserialization error.
    #[error("ron parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Two definitions share a name.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
}

/// Resolves block values to their occlusion class and materials.
///
/// Implementations must be deterministic: the mesher may ask for the same
/// value many times and expects the same answer.
pub trait BlockRegistry {
    /// Occlusion class of `value`.
    fn occlusion_of(&self, value: &VoxelValue) -> Result<Occlusion, RegistryLookupError>;

    /// Materials for `value` in `biome`: either one per box side, or a
    /// shorter `[top, side, bottom]` style list the mesher expands.
    fn materials_of(
        &self,
        value: &VoxelValue,
        biome: &str,
    ) -> Result<Vec<MaterialId>, RegistryLookupError>;
}

// ---------------------------------------------------------------------------
// Data-driven registry
// ---------------------------------------------------------------------------

/// Materials that replace the defaults when every `when` property matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateVariant {
    /// Properties that must all be present with these values.
    pub when: BlockState,
    /// Materials used for matching states.
    pub materials: Vec<MaterialId>,
}

impl StateVariant {
    fn matches(&self, state: &BlockState) -> bool {
        self.when
            .iter()
            .all(|(k, v)| state.get(k).is_some_and(|sv| sv == v))
    }
}

/// A single block definition in the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Namespaced block identifier.
    pub name: String,
    /// Occlusion class shared by every state of the block.
    pub occlusion: Occlusion,
    /// Default materials.
    pub materials: Vec<MaterialId>,
    /// State-specific overrides, first match wins.
    #[serde(default)]
    pub variants: Vec<StateVariant>,
    /// Biome-specific overrides (tinted foliage, grass tops).
    #[serde(default)]
    pub biome_materials: BTreeMap<String, Vec<MaterialId>>,
}

impl BlockDef {
    /// Creates a definition with a single material and no overrides.
    pub fn simple(name: impl Into<String>, occlusion: Occlusion, material: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            occlusion,
            materials: vec![MaterialId::new(material)],
            variants: Vec::new(),
            biome_materials: BTreeMap::new(),
        }
    }

    fn resolve(&self, state: &BlockState, biome: &str) -> &[MaterialId] {
        if let Some(variant) = self.variants.iter().find(|v| v.matches(state)) {
            return &variant.materials;
        }
        self.biome_materials
            .get(biome)
            .map_or(&self.materials, |mats| mats)
    }
}

/// Top-level RON manifest.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BlockManifest {
    /// Block definitions.
    pub blocks: Vec<BlockDef>,
}

/// In-memory [`BlockRegistry`] keyed by block identifier.
#[derive(Debug, Default, Clone)]
pub struct BlockTable {
    blocks: FxHashMap<String, BlockDef>,
}

impl BlockTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryLoadError::DuplicateName`] if the name is taken.
    pub fn register(&mut self, def: BlockDef) -> Result<(), RegistryLoadError> {
        if self.blocks.contains_key(&def.name) {
            return Err(RegistryLoadError::DuplicateName(def.name));
        }
        self.blocks.insert(def.name.clone(), def);
        Ok(())
    }

    /// Builds a table from a RON manifest string.
    pub fn from_ron_str(source: &str) -> Result<Self, RegistryLoadError> {
        let manifest: BlockManifest = ron::from_str(source)?;
        let mut table = Self::new();
        for def in manifest.blocks {
            table.register(def)?;
        }
        Ok(table)
    }

    /// Loads a table from a RON manifest file.
    pub fn load(path: &Path) -> Result<Self, RegistryLoadError> {
        let source = std::fs::read_to_string(path)?;
        let table = Self::from_ron_str(&source)?;
        tracing::info!(blocks = table.len(), "loaded block registry from {}", path.display());
        Ok(table)
    }

    /// Looks up a definition by identifier.
    pub fn get(&self, name: &str) -> Option<&BlockDef> {
        self.blocks.get(name)
    }

    /// Number of registered blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn def_for(&self, value: &VoxelValue) -> Result<&BlockDef, RegistryLookupError> {
        self.blocks
            .get(&value.id)
            .ok_or_else(|| RegistryLookupError::UnknownBlock(value.id.clone()))
    }
}

impl BlockRegistry for BlockTable {
    fn occlusion_of(&self, value: &VoxelValue) -> Result<Occlusion, RegistryLookupError> {
        Ok(self.def_for(value)?.occlusion)
    }

    fn materials_of(
        &self,
        value: &VoxelValue,
        biome: &str,
    ) -> Result<Vec<MaterialId>, RegistryLookupError> {
        let mats = self.def_for(value)?.resolve(&value.state, biome);
        if mats.is_empty() {
            return Err(RegistryLookupError::NoMaterials(value.id.clone()));
        }
        Ok(mats.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
