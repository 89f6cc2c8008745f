//! Wavefront OBJ output for emitted boxes.
//!
//! Each drawn box side becomes one quad face with four positions and four
//! texture coordinates. `usemtl` is written whenever the material changes.

use std::io::{self, Write};

use chisel_mesh::BoxFaces;
use chisel_voxel::MaterialId;

/// Streams boxes to an OBJ writer.
pub struct ObjWriter<W: Write> {
    out: W,
    scale: f64,
    /// Vertices written so far; OBJ indices are 1-based.
    vertices: usize,
    faces: usize,
    material: Option<MaterialId>,
}

impl<W: Write> ObjWriter<W> {
    pub fn new(mut out: W, scale: f64) -> io::Result<Self> {
        writeln!(out, "# chisel {}", env!("CARGO_PKG_VERSION"))?;
        Ok(Self {
            out,
            scale,
            vertices: 0,
            faces: 0,
            material: None,
        })
    }

    /// Starts a named object group.
    pub fn object(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "o {name}")
    }

    /// Writes every drawn side of `faces`.
    pub fn write_box(&mut self, faces: &BoxFaces) -> io::Result<()> {
        for side in faces.drawn_sides() {
            let material = &faces.materials[side.index()];
            if self.material.as_ref() != Some(material) {
                writeln!(self.out, "usemtl {material}")?;
                self.material = Some(material.clone());
            }

            for corner in faces.side_corners(side) {
                let p = corner * self.scale;
                writeln!(self.out, "v {} {} {}", p.x, p.y, p.z)?;
            }
            for uv in faces.uvs[side.index()] {
                writeln!(self.out, "vt {} {}", uv.x, uv.y)?;
            }

            let base = self.vertices + 1;
            writeln!(
                self.out,
                "f {0}/{0} {1}/{1} {2}/{2} {3}/{3}",
                base,
                base + 1,
                base + 2,
                base + 3
            )?;
            self.vertices += 4;
            self.faces += 1;
        }
        Ok(())
    }

    /// Number of quad faces written.
    pub fn face_count(&self) -> usize {
        self.faces
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
