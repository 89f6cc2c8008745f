//! Greedy meshing: merges coplanar faces of the same palette slot into
//! maximal rectangles.
//!
//! For each direction the grid is swept one layer at a time along the face
//! normal. Within a layer, cells are scanned row-major; a start cell is
//! extended along the row axis as far as possible, then the whole band of rows
//! is extended column by column. Covered cells are marked in a per-layer
//! [`UsedMask`] so no face is emitted twice.

use std::convert::Infallible;

use chisel_voxel::{GRID_SIZE, PaletteSlot, VoxelGrid};
use glam::DAffine3;

use crate::face_direction::{AXIS_PASSES, Direction};
use crate::occlusion::{SlotClasses, face_visible};
use crate::quad::Quad;

/// Converts sweep coordinates back to `[x, y, z]`.
///
/// `layer_axis`, `row_axis`, `col_axis` are 0=X, 1=Y, 2=Z.
fn axes_to_xyz(
    (layer_axis, row_axis, col_axis): (usize, usize, usize),
    layer: usize,
    row: usize,
    col: usize,
) -> [usize; 3] {
    let mut coords = [0usize; 3];
    coords[layer_axis] = layer;
    coords[row_axis] = row;
    coords[col_axis] = col;
    coords
}

/// Cells of the current layer already folded into an emitted quad.
#[derive(Clone, Debug, Default)]
pub struct UsedMask {
    cells: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl UsedMask {
    /// Unmarks every cell.
    pub fn clear(&mut self) {
        self.cells = [[false; GRID_SIZE]; GRID_SIZE];
    }

    /// Returns `true` if `(row, col)` is marked.
    #[inline]
    pub fn is_used(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Marks every cell in `rows × cols` (both inclusive).
    pub fn mark(&mut self, rows: (usize, usize), cols: (usize, usize)) {
        for row in &mut self.cells[rows.0..=rows.1] {
            row[cols.0..=cols.1].fill(true);
        }
    }
}

/// State for sweeping one direction.
struct Sweep<'a> {
    grid: &'a VoxelGrid,
    classes: &'a SlotClasses,
    direction: Direction,
    axes: (usize, usize, usize),
}

impl<'a> Sweep<'a> {
    /// A cell may join a rectangle started from `slot` when it holds the same
    /// slot, is not yet used, and its face is visible.
    #[inline]
    fn mergeable(&self, used: &UsedMask, slot: PaletteSlot, layer: usize, row: usize, col: usize) -> bool {
        let [x, y, z] = axes_to_xyz(self.axes, layer, row, col);
        self.grid.slot(x, y, z) == slot
            && !used.is_used(row, col)
            && face_visible(self.grid, self.classes, self.direction, x, y, z)
    }

    fn run<E>(
        &self,
        used: &mut UsedMask,
        transform: DAffine3,
        biome: &'a str,
        emit: &mut impl FnMut(Quad<'a>) -> Result<(), E>,
    ) -> Result<(), E> {
        let grid: &'a VoxelGrid = self.grid;
        for layer in 0..GRID_SIZE {
            used.clear();
            for row in 0..GRID_SIZE {
                for col in 0..GRID_SIZE {
                    let [x, y, z] = axes_to_xyz(self.axes, layer, row, col);
                    let slot = self.grid.slot(x, y, z);
                    if self.classes.is_air(slot)
                        || used.is_used(row, col)
                        || !face_visible(self.grid, self.classes, self.direction, x, y, z)
                    {
                        continue;
                    }

                    let mut row_end = row;
                    while row_end + 1 < GRID_SIZE
                        && self.mergeable(used, slot, layer, row_end + 1, col)
                    {
                        row_end += 1;
                    }

                    let mut col_end = col;
                    while col_end + 1 < GRID_SIZE
                        && (row..=row_end).all(|r| self.mergeable(used, slot, layer, r, col_end + 1))
                    {
                        col_end += 1;
                    }

                    used.mark((row, row_end), (col, col_end));

                    emit(Quad {
                        direction: self.direction,
                        start: [x, y, z],
                        end: axes_to_xyz(self.axes, layer, row_end, col_end),
                        slot,
                        value: &grid.palette().entries()[slot.index()],
                        transform,
                        biome,
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// Sweeps all six directions over `grid`, handing each maximal rectangle to
/// `emit` as soon as it is found.
///
/// Directions are processed East, West, Up, Down, South, North. The output
/// order is fully determined by the grid, so identical input yields identical
/// quads in identical order.
///
/// # Errors
///
/// Stops at and returns the first error produced by `emit`.
pub fn greedy_mesh<'a, E>(
    grid: &'a VoxelGrid,
    classes: &'a SlotClasses,
    transform: DAffine3,
    biome: &'a str,
    mut emit: impl FnMut(Quad<'a>) -> Result<(), E>,
) -> Result<(), E> {
    let mut used = UsedMask::default();
    for pass in AXIS_PASSES {
        for direction in pass {
            let sweep = Sweep {
                grid,
                classes,
                direction,
                axes: direction.sweep_axes(),
            };
            sweep.run(&mut used, transform, biome, &mut emit)?;
        }
    }
    Ok(())
}

/// Collects every quad of [`greedy_mesh`] into a `Vec`.
pub fn greedy_quads<'a>(
    grid: &'a VoxelGrid,
    classes: &'a SlotClasses,
    transform: DAffine3,
    biome: &'a str,
) -> Vec<Quad<'a>> {
    let mut quads = Vec::new();
    let result = greedy_mesh(grid, classes, transform, biome, |quad| {
        quads.push(quad);
        Ok::<(), Infallible>(())
    });
    match result {
        Ok(()) => quads,
        Err(never) => match never {},
    }
}
