//! Micro-voxel storage for chiselled blocks: block values, palettes, the
//! decoded 16×16×16 grid, and the block registry consulted while meshing.

pub mod entity;
pub mod grid;
pub mod palette;
pub mod registry;
pub mod value;

pub use entity::{BitsBlockEntity, PaletteEntry};
pub use grid::{GRID_SIZE, GRID_VOLUME, VoxelGrid};
pub use palette::{BITS_LEN, DecodeError, MAX_PALETTE_LEN, Palette, PaletteSlot, decode_grid};
pub use registry::{
    BlockDef, BlockManifest, BlockRegistry, BlockTable, MaterialId, Occlusion, RegistryLoadError,
    RegistryLookupError, StateVariant,
};
pub use value::{AIR_ID, BlockState, VoxelValue};
