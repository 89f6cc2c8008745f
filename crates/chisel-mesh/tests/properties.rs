//! Whole-block properties of the mesher: face coverage, quad counts for
//! canonical shapes, determinism and decoding.

use chisel_mesh::{
    BitsMesher, BoxCollector, Direction, SlotClasses, compute_visible_faces, count_visible_faces,
    greedy_quads,
};
use chisel_voxel::{
    AIR_ID, BITS_LEN, BitsBlockEntity, BlockDef, BlockTable, GRID_SIZE, Occlusion, Palette,
    PaletteEntry, PaletteSlot, VoxelGrid, VoxelValue,
};
use glam::{DAffine3, IVec3};

const AIR: PaletteSlot = PaletteSlot(0);
const STONE: PaletteSlot = PaletteSlot(1);
const GLASS: PaletteSlot = PaletteSlot(2);
const DIRT: PaletteSlot = PaletteSlot(3);
const GLASS_TWIN: PaletteSlot = PaletteSlot(4);

fn registry() -> BlockTable {
    let mut reg = BlockTable::new();
    for def in [
        BlockDef::simple("minecraft:stone", Occlusion::Full, "minecraft:stone"),
        BlockDef::simple("minecraft:glass", Occlusion::Partial, "minecraft:glass"),
        BlockDef::simple("minecraft:dirt", Occlusion::Full, "minecraft:dirt"),
    ] {
        reg.register(def).expect("register");
    }
    reg
}

fn palette() -> Palette {
    Palette::new(vec![
        VoxelValue::air(),
        VoxelValue::new("minecraft:stone"),
        VoxelValue::new("minecraft:glass"),
        VoxelValue::new("minecraft:dirt"),
        VoxelValue::new("minecraft:glass"),
    ])
}

/// Small deterministic generator so the coverage check sees irregular shapes.
fn scrambled_grid(seed: u32) -> VoxelGrid {
    let mut state = seed;
    VoxelGrid::from_fn(palette(), |_, _, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        match state % 7 {
            0 | 1 | 2 => AIR,
            3 | 4 => STONE,
            5 => GLASS,
            _ => if state % 2 == 0 { DIRT } else { GLASS_TWIN },
        }
    })
}

fn quads_of(grid: &VoxelGrid) -> Vec<(Direction, [usize; 3], [usize; 3], PaletteSlot)> {
    let classes = SlotClasses::resolve(grid, &registry(), AIR_ID).expect("classes");
    greedy_quads(grid, &classes, DAffine3::IDENTITY, "minecraft:plains")
        .into_iter()
        .map(|q| (q.direction, q.start, q.end, q.slot))
        .collect()
}

/// Every visible face is covered by exactly one quad, and quads cover nothing else.
fn assert_partition(grid: &VoxelGrid) {
    let classes = SlotClasses::resolve(grid, &registry(), AIR_ID).expect("classes");
    let visible = compute_visible_faces(grid, &classes);
    let mut covered = vec![[0u8; 6]; visible.len()];

    for (dir, start, end, slot) in quads_of(grid) {
        for x in start[0]..=end[0] {
            for y in start[1]..=end[1] {
                for z in start[2]..=end[2] {
                    assert_eq!(grid.slot(x, y, z), slot, "quad mixes slots at {x},{y},{z}");
                    covered[VoxelGrid::linear_index(x, y, z)][dir.index()] += 1;
                }
            }
        }
    }

    let mut total = 0;
    for (i, faces) in visible.iter().enumerate() {
        for dir in Direction::ALL {
            let expected = u8::from(faces[dir.index()]);
            assert_eq!(covered[i][dir.index()], expected, "cell {i} {dir:?}");
            total += usize::from(expected);
        }
    }
    assert_eq!(total, count_visible_faces(&visible));
}

#[test]
fn test_quads_partition_visible_faces() {
    for seed in [1, 7, 42, 1234, 99_991] {
        assert_partition(&scrambled_grid(seed));
    }
}

#[test]
fn test_quads_partition_layered_shapes() {
    let grid = VoxelGrid::from_fn(palette(), |x, y, z| {
        if y < 4 {
            STONE
        } else if y < 8 && x > 3 && z < 12 {
            GLASS
        } else if (x + y) % 5 == 0 {
            DIRT
        } else {
            AIR
        }
    });
    assert_partition(&grid);
}

#[test]
fn test_all_air_produces_zero_quads() {
    let grid = VoxelGrid::filled(palette(), AIR);
    assert!(quads_of(&grid).is_empty());
}

#[test]
fn test_air_slots_are_interchangeable() {
    let mut entries = palette().entries().to_vec();
    entries.push(VoxelValue::with_state(AIR_ID, [("waterlogged", "false")]));
    let second_air = PaletteSlot(entries.len() as u16 - 1);

    let shape = |x: usize, y: usize, z: usize| (x * 3 + y * 5 + z) % 4 == 0;
    let a = VoxelGrid::from_fn(Palette::new(entries.clone()), |x, y, z| {
        if shape(x, y, z) { STONE } else { AIR }
    });
    let b = VoxelGrid::from_fn(Palette::new(entries), |x, y, z| {
        if shape(x, y, z) {
            STONE
        } else if (x + z) % 2 == 0 {
            second_air
        } else {
            AIR
        }
    });
    assert_eq!(quads_of(&a), quads_of(&b));
}

#[test]
fn test_uniform_fill_produces_six_full_quads() {
    let grid = VoxelGrid::filled(palette(), STONE);
    let quads = quads_of(&grid);
    assert_eq!(quads.len(), 6);
    for (dir, start, end, _) in quads {
        let (axis, sign) = dir.normal_axis();
        let plane = if sign > 0 { GRID_SIZE - 1 } else { 0 };
        assert_eq!(start[axis], plane, "{dir:?}");
        assert_eq!(end[axis], plane, "{dir:?}");
        for other in (0..3).filter(|a| *a != axis) {
            assert_eq!((start[other], end[other]), (0, GRID_SIZE - 1), "{dir:?}");
        }
    }
}

#[test]
fn test_single_voxel_produces_six_unit_quads() {
    let grid = VoxelGrid::from_fn(palette(), |x, y, z| {
        if (x, y, z) == (0, 0, 0) { STONE } else { AIR }
    });
    let quads = quads_of(&grid);
    assert_eq!(quads.len(), 6);
    for (_, start, end, slot) in &quads {
        assert_eq!(*start, [0, 0, 0]);
        assert_eq!(*end, [0, 0, 0]);
        assert_eq!(*slot, STONE);
    }
    let mut dirs: Vec<_> = quads.iter().map(|q| q.0).collect();
    dirs.sort();
    assert_eq!(dirs, Direction::ALL.to_vec());
}

#[test]
fn test_planar_slab_merges_to_one_quad() {
    let grid = VoxelGrid::from_fn(palette(), |_, _, z| if z == 6 { STONE } else { AIR });
    let quads = quads_of(&grid);
    for dir in [Direction::South, Direction::North] {
        let facing: Vec<_> = quads.iter().filter(|q| q.0 == dir).collect();
        assert_eq!(facing.len(), 1, "{dir:?}");
        assert_eq!(facing[0].1, [0, 0, 6]);
        assert_eq!(facing[0].2, [15, 15, 6]);
    }
}

#[test]
fn test_same_content_in_two_slots_never_merges() {
    let grid = VoxelGrid::from_fn(palette(), |x, y, z| match (y, z) {
        (0, 0) if x % 2 == 0 => GLASS,
        (0, 0) => GLASS_TWIN,
        _ => AIR,
    });
    let quads = quads_of(&grid);
    let up = quads.iter().filter(|q| q.0 == Direction::Up).count();
    assert_eq!(up, GRID_SIZE);
    // Shared faces between the two glass slots stay visible.
    let east = quads.iter().filter(|q| q.0 == Direction::East).count();
    assert_eq!(east, GRID_SIZE);
}

#[test]
fn test_meshing_is_deterministic() {
    let grid = scrambled_grid(2024);
    assert_eq!(quads_of(&grid), quads_of(&grid));

    let reg = registry();
    let mesher = BitsMesher::new(&reg);
    let mut a = BoxCollector::new();
    let mut b = BoxCollector::new();
    mesher.mesh_grid(&grid, IVec3::new(1, 2, 3), "minecraft:plains", &mut a).unwrap();
    mesher.mesh_grid(&grid, IVec3::new(1, 2, 3), "minecraft:plains", &mut b).unwrap();
    assert_eq!(a.boxes, b.boxes);
}

#[test]
fn test_decode_places_every_index() {
    let entries: Vec<PaletteEntry> = palette().entries().iter().map(PaletteEntry::from).collect();
    let expected = |p: usize| ((p * 31 + p / 7) % entries.len()) as u16;

    let mut bits = vec![0u8; BITS_LEN];
    for p in 0..BITS_LEN / 2 {
        let [lo, hi] = expected(p).to_le_bytes();
        bits[2 * p] = lo;
        bits[2 * p + 1] = hi;
    }
    let entity = BitsBlockEntity {
        palette: Some(entries.clone()),
        bits_v2: Some(bits),
    };
    let grid = entity.decode().expect("decode");

    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            for z in 0..GRID_SIZE {
                let p = x * 256 + y * 16 + z;
                let slot = PaletteSlot(expected(p));
                assert_eq!(grid.slot(x, y, z), slot);
                assert_eq!(*grid.get(x, y, z), VoxelValue::from(&entries[slot.index()]));
            }
        }
    }
}

#[test]
fn test_end_to_end_quad_count_matches_boxes() {
    let grid = scrambled_grid(5);
    let reg = registry();
    let mut sink = BoxCollector::new();
    let count = BitsMesher::new(&reg)
        .mesh_entity(&BitsBlockEntity::from_grid(&grid), IVec3::ZERO, "minecraft:plains", &mut sink)
        .unwrap();
    assert_eq!(count, quads_of(&grid).len());
    assert_eq!(sink.len(), count);
    for faces in &sink.boxes {
        assert_eq!(faces.drawn_sides().count(), 1);
    }
}
