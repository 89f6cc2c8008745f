//! Dense 16×16×16 micro-voxel grid.

use crate::palette::{Palette, PaletteSlot};
use crate::value::VoxelValue;

/// Side length of a micro-voxel grid.
pub const GRID_SIZE: usize = 16;

/// Number of cells in a micro-voxel grid (16³).
pub const GRID_VOLUME: usize = GRID_SIZE * GRID_SIZE * GRID_SIZE;

/// Immutable 16³ grid of palette slots together with the palette they index.
///
/// Every cell holds a slot that is valid for the palette; this is checked once
/// at construction so lookups never fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    palette: Palette,
    /// Indexed `x * 256 + y * 16 + z`.
    cells: Box<[PaletteSlot]>,
}

impl VoxelGrid {
    /// Builds a grid by calling `f(x, y, z)` for every cell.
    ///
    /// # Panics
    ///
    /// Panics if `f` returns a slot outside the palette. Use
    /// [`crate::decode_grid`] for untrusted input.
    pub fn from_fn(palette: Palette, mut f: impl FnMut(usize, usize, usize) -> PaletteSlot) -> Self {
        let mut cells = Vec::with_capacity(GRID_VOLUME);
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                for z in 0..GRID_SIZE {
                    let slot = f(x, y, z);
                    assert!(
                        slot.index() < palette.len(),
                        "slot {} out of range for palette of {}",
                        slot.0,
                        palette.len()
                    );
                    cells.push(slot);
                }
            }
        }
        Self::from_raw_parts(palette, cells.into_boxed_slice())
    }

    /// Builds a grid where every cell holds `slot`.
    pub fn filled(palette: Palette, slot: PaletteSlot) -> Self {
        Self::from_fn(palette, |_, _, _| slot)
    }

    /// Constructs a grid from pre-validated parts (used by the decoder).
    pub(crate) fn from_raw_parts(palette: Palette, cells: Box<[PaletteSlot]>) -> Self {
        debug_assert_eq!(cells.len(), GRID_VOLUME);
        Self { palette, cells }
    }

    /// Linear cell index for `(x, y, z)`, each in `0..16`.
    #[inline]
    pub fn linear_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < GRID_SIZE && y < GRID_SIZE && z < GRID_SIZE);
        (x * GRID_SIZE + y) * GRID_SIZE + z
    }

    /// Palette slot held by the cell at `(x, y, z)`.
    #[inline]
    pub fn slot(&self, x: usize, y: usize, z: usize) -> PaletteSlot {
        self.cells[Self::linear_index(x, y, z)]
    }

    /// Value held by the cell at `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> &VoxelValue {
        &self.palette.entries()[self.slot(x, y, z).index()]
    }

    /// The palette backing this grid.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Iterates every cell as `((x, y, z), slot)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), PaletteSlot)> + '_ {
        self.cells.iter().enumerate().map(|(i, &slot)| {
            let x = i / (GRID_SIZE * GRID_SIZE);
            let y = (i / GRID_SIZE) % GRID_SIZE;
            let z = i % GRID_SIZE;
            ((x, y, z), slot)
        })
    }
}
