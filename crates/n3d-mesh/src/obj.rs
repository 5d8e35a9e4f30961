//! Wavefront OBJ output.

use std::fmt;
use std::io;

use crate::DecodedMesh;

/// OBJ view of a [`DecodedMesh`], created by [`DecodedMesh::obj`].
///
/// Sections are written in a fixed order: all `v` lines, then all `vt`
/// lines, then all `f` lines. Floats use the shortest representation that
/// round-trips, so no precision is lost.
pub struct Obj<'a>(&'a DecodedMesh);

impl fmt::Display for Obj<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for [x, y, z] in &self.0.vertices {
            writeln!(f, "v  {x:?} {y:?} {z:?}")?;
        }
        for [u, v] in &self.0.uvs {
            writeln!(f, "vt  {u:?} {v:?}")?;
        }
        for [a, b, c] in &self.0.faces {
            writeln!(f, "f  {a}/{a} {b}/{b} {c}/{c}")?;
        }
        Ok(())
    }
}

impl DecodedMesh {
    /// Borrow the mesh as an OBJ document.
    pub fn obj(&self) -> Obj<'_> {
        Obj(self)
    }

    /// Render the mesh as an OBJ document.
    pub fn to_obj(&self) -> String {
        self.obj().to_string()
    }

    /// Write the mesh as an OBJ document.
    pub fn write_obj<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", self.obj())
    }
}
