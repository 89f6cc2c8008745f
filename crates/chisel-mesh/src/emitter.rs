//! Quad emitter: turns a merged [`Quad`] into a placed [`BoxFaces`] with
//! texture coordinates and per-side materials, and hands it to a sink.

use chisel_voxel::{BlockRegistry, MaterialId, RegistryLookupError};
use glam::{DVec2, DVec3};

use crate::face_direction::Direction;
use crate::quad::Quad;
use crate::sink::{BoxFaces, MeshSink};

/// Edge length of one micro-voxel in block units.
pub const ONE_PIXEL: f64 = 1.0 / 16.0;

/// A scaled box bound: start or end along one axis.
#[derive(Clone, Copy, Debug)]
enum Bound {
    Xs,
    Xe,
    Ys,
    Ye,
    Zs,
    Ze,
}

/// One texture coordinate component: a bound, optionally mirrored as `1 - b`.
#[derive(Clone, Copy, Debug)]
struct UvTerm {
    bound: Bound,
    mirrored: bool,
}

const fn b(bound: Bound) -> UvTerm {
    UvTerm { bound, mirrored: false }
}

const fn m(bound: Bound) -> UvTerm {
    UvTerm { bound, mirrored: true }
}

use Bound::{Xe, Xs, Ye, Ys, Ze, Zs};

/// Texture coordinates per side (box-side order), four `(u, v)` corners each.
const UV_TABLE: [[(UvTerm, UvTerm); 4]; 6] = [
    // Up
    [(b(Xs), m(Ze)), (b(Xe), m(Ze)), (b(Xe), m(Zs)), (b(Xs), m(Zs))],
    // North
    [(m(Xe), b(Ys)), (m(Xs), b(Ys)), (m(Xs), b(Ye)), (m(Xe), b(Ye))],
    // South
    [(b(Xs), b(Ys)), (b(Xe), b(Ys)), (b(Xe), b(Ye)), (b(Xs), b(Ye))],
    // West
    [(b(Zs), b(Ys)), (b(Ze), b(Ys)), (b(Ze), b(Ye)), (b(Zs), b(Ye))],
    // East
    [(m(Ze), b(Ys)), (m(Zs), b(Ys)), (m(Zs), b(Ye)), (m(Ze), b(Ye))],
    // Down
    [(b(Xe), b(Ze)), (b(Xs), b(Ze)), (b(Xs), b(Zs)), (b(Xe), b(Zs))],
];

impl UvTerm {
    fn eval(self, min: DVec3, max: DVec3) -> f64 {
        let v = match self.bound {
            Xs => min.x,
            Xe => max.x,
            Ys => min.y,
            Ye => max.y,
            Zs => min.z,
            Ze => max.z,
        };
        if self.mirrored { 1.0 - v } else { v }
    }
}

/// Texture coordinates of every side of the box `min..max`.
pub fn side_uvs(min: DVec3, max: DVec3) -> [[DVec2; 4]; 6] {
    UV_TABLE.map(|corners| corners.map(|(u, v)| DVec2::new(u.eval(min, max), v.eval(min, max))))
}

/// Scales inclusive cell bounds to block units: the end is pushed one cell
/// further so a single cell spans exactly one sixteenth.
pub fn scaled_bounds(start: [usize; 3], end: [usize; 3]) -> (DVec3, DVec3) {
    let min = DVec3::new(start[0] as f64, start[1] as f64, start[2] as f64) * ONE_PIXEL;
    let max = DVec3::new(
        (end[0] + 1) as f64,
        (end[1] + 1) as f64,
        (end[2] + 1) as f64,
    ) * ONE_PIXEL;
    (min, max)
}

/// Expands a block's material list to one material per box side.
///
/// One material covers every side. With two, the first is top and bottom and
/// the second the four sides. With three to five, the third is the bottom.
/// Six or more are taken in box-side order. Returns `None` for an empty list.
pub fn side_materials(mats: &[MaterialId]) -> Option<[MaterialId; 6]> {
    let top = mats.first()?;
    if mats.len() >= 6 {
        return Some(std::array::from_fn(|i| mats[i].clone()));
    }
    let side = mats.get(1).unwrap_or(top);
    let bottom = mats.get(2).unwrap_or(top);
    let pick = |dir: Direction| match dir {
        Direction::Up => top.clone(),
        Direction::Down => bottom.clone(),
        _ => side.clone(),
    };
    Some(Direction::ALL.map(pick))
}

/// Builds the box for `quad` and adds it to `sink`.
///
/// # Errors
///
/// Returns the registry's error unchanged if the quad's value cannot be
/// resolved, or [`RegistryLookupError::NoMaterials`] if it resolves to an empty
/// list. Nothing is added to the sink in either case.
pub fn emit_quad<R, S>(quad: &Quad<'_>, registry: &R, sink: &mut S) -> Result<(), RegistryLookupError>
where
    R: BlockRegistry + ?Sized,
    S: MeshSink + ?Sized,
{
    let (min, max) = scaled_bounds(quad.start, quad.end);

    let mats = registry.materials_of(quad.value, quad.biome)?;
    let materials =
        side_materials(&mats).ok_or_else(|| RegistryLookupError::NoMaterials(quad.value.id.clone()))?;

    tracing::trace!(
        direction = ?quad.direction,
        start = ?quad.start,
        end = ?quad.end,
        value = %quad.value,
        "emitting quad"
    );

    sink.add_box(BoxFaces {
        min,
        max,
        transform: quad.transform,
        materials,
        uvs: side_uvs(min, max),
        draw: quad.direction.draw_sides(),
    });
    Ok(())
}
