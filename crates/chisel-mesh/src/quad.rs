//! Merged rectangles produced by the greedy mesher.

use chisel_voxel::{PaletteSlot, VoxelValue};
use glam::{DAffine3, DVec3};

/// Converts a block position to the transform that places its micro-voxels.
///
/// The unit box of a block at `(x, y, z)` spans `x - 0.5 ..= x + 0.5` on each
/// axis.
pub fn placement_transform(x: i32, y: i32, z: i32) -> DAffine3 {
    DAffine3::from_translation(DVec3::new(
        f64::from(x) - 0.5,
        f64::from(y) - 0.5,
        f64::from(z) - 0.5,
    ))
}

/// One merged face rectangle.
///
/// `start` and `end` are inclusive cell coordinates `[x, y, z]`; they are equal
/// on the axis the face points along.
#[derive(Clone, Debug, PartialEq)]
pub struct Quad<'a> {
    /// Face direction.
    pub direction: crate::Direction,
    /// First cell of the rectangle.
    pub start: [usize; 3],
    /// Last cell of the rectangle (inclusive).
    pub end: [usize; 3],
    /// Palette slot shared by every cell of the rectangle.
    pub slot: PaletteSlot,
    /// Value whose materials the quad carries.
    pub value: &'a VoxelValue,
    /// Placement of the owning block.
    pub transform: DAffine3,
    /// Biome used for material lookup.
    pub biome: &'a str,
}
