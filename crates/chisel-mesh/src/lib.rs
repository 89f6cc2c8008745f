//! Greedy meshing of chiselled 16×16×16 micro-voxel blocks into textured
//! quads, plus the batch pipeline that meshes many blocks on worker threads.

pub mod emitter;
pub mod face_direction;
pub mod greedy;
pub mod occlusion;
pub mod pipeline;
pub mod quad;
pub mod sink;

use chisel_voxel::{AIR_ID, BitsBlockEntity, BlockRegistry, DecodeError, RegistryLookupError, VoxelGrid};
use glam::IVec3;
use thiserror::Error;

pub use emitter::{ONE_PIXEL, emit_quad, scaled_bounds, side_materials, side_uvs};
pub use face_direction::{AXIS_PASSES, DRAW_SIDES, Direction};
pub use greedy::{UsedMask, greedy_mesh, greedy_quads};
pub use occlusion::{
    CellFaces, SlotClass, SlotClasses, compute_visible_faces, count_visible_faces, face_visible,
};
pub use pipeline::{MeshingPipeline, MeshingResult, MeshingTask};
pub use quad::{Quad, placement_transform};
pub use sink::{BoxCollector, BoxFaces, MeshSink};

/// Why meshing one block failed. Other blocks are unaffected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The block entity could not be decoded.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    /// A value could not be resolved by the registry.
    #[error("registry lookup failed: {0}")]
    Registry(#[from] RegistryLookupError),
}

/// Meshes micro-voxel blocks against a block registry.
#[derive(Debug)]
pub struct BitsMesher<'r, R: ?Sized> {
    registry: &'r R,
    air_id: String,
}

impl<'r, R: BlockRegistry + ?Sized> BitsMesher<'r, R> {
    /// Creates a mesher that treats `minecraft:air` as empty.
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            air_id: AIR_ID.to_string(),
        }
    }

    /// Overrides the identifier treated as empty.
    pub fn with_air_id(mut self, air_id: impl Into<String>) -> Self {
        self.air_id = air_id.into();
        self
    }

    /// Meshes `grid` for the block at `origin` and adds one box per quad to
    /// `sink`. Returns the number of quads emitted.
    ///
    /// Output is all-or-nothing: on error, nothing reaches `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Registry`] if a value in the grid is unknown to
    /// the registry or has no materials.
    pub fn mesh_grid<S: MeshSink + ?Sized>(
        &self,
        grid: &VoxelGrid,
        origin: IVec3,
        biome: &str,
        sink: &mut S,
    ) -> Result<usize, MeshError> {
        let classes = SlotClasses::resolve(grid, self.registry, &self.air_id)?;
        let transform = placement_transform(origin.x, origin.y, origin.z);

        let mut staged = BoxCollector::new();
        greedy_mesh(grid, &classes, transform, biome, |quad| {
            emit_quad(&quad, self.registry, &mut staged)
        })?;

        let count = staged.len();
        for faces in staged.boxes {
            sink.add_box(faces);
        }
        tracing::debug!(quads = count, ?origin, biome, "meshed micro-voxel block");
        Ok(count)
    }

    /// Decodes `entity` and meshes it; see [`Self::mesh_grid`].
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Decode`] for malformed entities, otherwise as
    /// [`Self::mesh_grid`].
    pub fn mesh_entity<S: MeshSink + ?Sized>(
        &self,
        entity: &BitsBlockEntity,
        origin: IVec3,
        biome: &str,
        sink: &mut S,
    ) -> Result<usize, MeshError> {
        let grid = entity.decode()?;
        self.mesh_grid(&grid, origin, biome, sink)
    }
}

#[cfg(test)]
mod tests {
    use chisel_voxel::{BlockDef, BlockTable, Occlusion, Palette, PaletteSlot, VoxelValue};

    use super::*;

    fn registry() -> BlockTable {
        let mut reg = BlockTable::new();
        reg.register(BlockDef::simple("minecraft:stone", Occlusion::Full, "minecraft:stone"))
            .expect("register stone");
        reg
    }

    #[test]
    fn test_mesh_grid_places_boxes_at_origin() {
        let palette = Palette::new(vec![VoxelValue::air(), VoxelValue::new("minecraft:stone")]);
        let grid = VoxelGrid::filled(palette, PaletteSlot(1));
        let reg = registry();
        let mut sink = BoxCollector::new();
        let count = BitsMesher::new(&reg)
            .mesh_grid(&grid, IVec3::new(10, 64, -3), "minecraft:plains", &mut sink)
            .unwrap();
        assert_eq!(count, 6);
        let up = sink.boxes.iter().find(|b| b.draw[Direction::Up.index()]).unwrap();
        let corners = up.side_corners(Direction::Up);
        assert!(corners.iter().all(|c| c.y == 64.5));
        assert!(corners.iter().all(|c| (9.5..=10.5).contains(&c.x)));
    }

    #[test]
    fn test_failed_mesh_leaves_sink_untouched() {
        let palette = Palette::new(vec![
            VoxelValue::new("minecraft:stone"),
            VoxelValue::new("mod:unknown"),
        ]);
        let grid = VoxelGrid::from_fn(palette, |x, y, z| PaletteSlot(((x, y, z) == (15, 15, 15)) as u16));
        let reg = registry();
        let mut sink = BoxCollector::new();
        let err = BitsMesher::new(&reg)
            .mesh_grid(&grid, IVec3::ZERO, "minecraft:plains", &mut sink)
            .unwrap_err();
        assert!(matches!(err, MeshError::Registry(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_custom_air_id() {
        let palette = Palette::new(vec![VoxelValue::new("mod:void"), VoxelValue::new("minecraft:stone")]);
        let grid = VoxelGrid::from_fn(palette, |x, y, z| PaletteSlot(((x, y, z) == (1, 1, 1)) as u16));
        let reg = registry();
        let mut sink = BoxCollector::new();
        let count = BitsMesher::new(&reg)
            .with_air_id("mod:void")
            .mesh_grid(&grid, IVec3::ZERO, "minecraft:plains", &mut sink)
            .unwrap();
        assert_eq!(count, 6);
    }

    #[test]
    fn test_mesh_entity_reports_decode_errors() {
        let reg = registry();
        let mut sink = BoxCollector::new();
        let err = BitsMesher::new(&reg)
            .mesh_entity(&BitsBlockEntity::default(), IVec3::ZERO, "b", &mut sink)
            .unwrap_err();
        assert_eq!(err, MeshError::Decode(DecodeError::MissingPalette));
    }
}
