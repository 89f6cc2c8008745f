//! Mesh sink: where emitted boxes go.
//!
//! A sink receives one [`BoxFaces`] per quad. Sinks take `&mut self`, so
//! concurrent meshing needs one sink per worker or external locking.

use chisel_voxel::MaterialId;
use glam::{DAffine3, DVec2, DVec3};

use crate::face_direction::Direction;

/// Box corner selection per side: for each of the four corners, whether the
/// x, y and z coordinates come from the box maximum (`true`) or minimum.
///
/// Corner order matches the UV order of the same side and winds
/// counter-clockwise when seen from outside the box.
const SIDE_CORNERS: [[[bool; 3]; 4]; 6] = [
    // Up
    [[false, true, true], [true, true, true], [true, true, false], [false, true, false]],
    // North
    [[true, false, false], [false, false, false], [false, true, false], [true, true, false]],
    // South
    [[false, false, true], [true, false, true], [true, true, true], [false, true, true]],
    // West
    [[false, false, false], [false, false, true], [false, true, true], [false, true, false]],
    // East
    [[true, false, true], [true, false, false], [true, true, false], [true, true, true]],
    // Down
    [[true, false, true], [false, false, true], [false, false, false], [true, false, false]],
];

/// A placed, partially drawn box handed to a [`MeshSink`].
///
/// All per-side arrays are in box-side order (see [`Direction::ALL`]).
#[derive(Clone, Debug, PartialEq)]
pub struct BoxFaces {
    /// Minimum corner in block-local units (0..1).
    pub min: DVec3,
    /// Maximum corner in block-local units (0..1).
    pub max: DVec3,
    /// Placement of the owning block.
    pub transform: DAffine3,
    /// Material per side.
    pub materials: [MaterialId; 6],
    /// Texture coordinates per side, four corners each.
    pub uvs: [[DVec2; 4]; 6],
    /// Which sides to build.
    pub draw: [bool; 6],
}

impl BoxFaces {
    /// Sides that should be built.
    pub fn drawn_sides(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.draw[d.index()])
    }

    /// The four corners of `side`, transformed into world space.
    pub fn side_corners(&self, side: Direction) -> [DVec3; 4] {
        SIDE_CORNERS[side.index()].map(|[mx, my, mz]| {
            let local = DVec3::new(
                if mx { self.max.x } else { self.min.x },
                if my { self.max.y } else { self.min.y },
                if mz { self.max.z } else { self.min.z },
            );
            self.transform.transform_point3(local)
        })
    }
}

/// Destination for emitted boxes.
pub trait MeshSink {
    /// Adds a box. The mesher never reads anything back.
    fn add_box(&mut self, faces: BoxFaces);
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
    fn add_box(&mut self, faces: BoxFaces) {
        (**self).add_box(faces);
    }
}

/// A [`MeshSink`] that keeps every box in memory.
#[derive(Clone, Debug, Default)]
pub struct BoxCollector {
    /// Boxes in emission order.
    pub boxes: Vec<BoxFaces>,
}

impl BoxCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of boxes collected.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl MeshSink for BoxCollector {
    fn add_box(&mut self, faces: BoxFaces) {
        self.boxes.push(faces);
    }
}
