//! Face visibility: decides whether a micro-voxel face is exposed.
//!
//! Occlusion classes are resolved once per palette slot before meshing, so the
//! per-face query is a table lookup and cannot fail.

use chisel_voxel::{
    BlockRegistry, GRID_SIZE, GRID_VOLUME, Occlusion, PaletteSlot, RegistryLookupError, VoxelGrid,
};

use crate::face_direction::Direction;

/// What the mesher needs to know about one palette slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotClass {
    /// The slot holds air.
    Air,
    /// A solid value with its occlusion class.
    Block(Occlusion),
}

/// Per-slot [`SlotClass`] table for one grid.
#[derive(Clone, Debug)]
pub struct SlotClasses {
    classes: Vec<SlotClass>,
}

impl SlotClasses {
    /// Classifies every slot that appears in `grid`.
    ///
    /// Air is recognised by identifier and never looked up. Slots that no cell
    /// references are not looked up either.
    ///
    /// # Errors
    ///
    /// Propagates the registry's error for the first referenced, non-air slot
    /// it cannot resolve.
    pub fn resolve<R: BlockRegistry + ?Sized>(
        grid: &VoxelGrid,
        registry: &R,
        air_id: &str,
    ) -> Result<Self, RegistryLookupError> {
        let palette = grid.palette();
        let mut referenced = vec![false; palette.len()];
        for (_, slot) in grid.iter() {
            referenced[slot.index()] = true;
        }

        let mut classes = Vec::with_capacity(palette.len());
        for (index, value) in palette.entries().iter().enumerate() {
            let class = if value.is_air_with(air_id) {
                SlotClass::Air
            } else if referenced[index] {
                SlotClass::Block(registry.occlusion_of(value)?)
            } else {
                // Never read: no cell holds this slot.
                SlotClass::Block(Occlusion::None)
            };
            classes.push(class);
        }
        Ok(Self { classes })
    }

    /// Class of `slot`.
    #[inline]
    pub fn get(&self, slot: PaletteSlot) -> SlotClass {
        self.classes[slot.index()]
    }

    /// Returns `true` if `slot` holds air.
    #[inline]
    pub fn is_air(&self, slot: PaletteSlot) -> bool {
        self.get(slot) == SlotClass::Air
    }
}

/// Returns `true` if the face of cell `(x, y, z)` pointing in `direction` is
/// visible.
///
/// Only meaningful for non-air cells. Faces on the grid boundary are always
/// visible. Otherwise the face is visible when the neighbour is air, or when
/// the neighbour is not fully occluding and sits in a different palette slot.
/// A fully occluding neighbour hides the face even if it is a different block.
#[inline]
pub fn face_visible(
    grid: &VoxelGrid,
    classes: &SlotClasses,
    direction: Direction,
    x: usize,
    y: usize,
    z: usize,
) -> bool {
    let Some((nx, ny, nz)) = direction.step(x, y, z, GRID_SIZE) else {
        return true;
    };
    let neighbor = grid.slot(nx, ny, nz);
    match classes.get(neighbor) {
        SlotClass::Air => true,
        SlotClass::Block(Occlusion::Full) => false,
        SlotClass::Block(_) => neighbor != grid.slot(x, y, z),
    }
}

/// Visible faces of one cell, indexed by [`Direction::index`].
pub type CellFaces = [bool; 6];

/// Computes the visible faces of every cell, indexed like
/// [`VoxelGrid::linear_index`]. Air cells have no visible faces.
pub fn compute_visible_faces(grid: &VoxelGrid, classes: &SlotClasses) -> Vec<CellFaces> {
    let mut result = vec![[false; 6]; GRID_VOLUME];
    for ((x, y, z), slot) in grid.iter() {
        if classes.is_air(slot) {
            continue;
        }
        result[VoxelGrid::linear_index(x, y, z)] =
            Direction::ALL.map(|dir| face_visible(grid, classes, dir, x, y, z));
    }
    result
}

/// Total number of visible faces across all cells.
pub fn count_visible_faces(faces: &[CellFaces]) -> usize {
    faces.iter().flatten().filter(|visible| **visible).count()
}
