//! Face-list surface (`.obj`) writer.
//!
//! Emits the mesh as a Wavefront-style face list: one `v` line per
//! vertex, one `vn` line per normal, and one `f a//a b//b c//c` line per
//! face with 1-based indices. The vertex and normal tables are parallel,
//! so each corner references the same index for both.

use std::io::Write;

use crate::error::Result;
use crate::mesh::HalfEdgeMesh;

/// Write the mesh as a face-list surface.
pub fn write<W: Write>(mesh: &HalfEdgeMesh, mut writer: W) -> Result<()> {
    writeln!(
        writer,
        "#\n# Surface vertices={} faces={}\n#",
        mesh.num_vertices(),
        mesh.num_faces()
    )?;

    for vertex in mesh.positions() {
        writeln!(writer, "v {} {} {}", vertex.x, vertex.y, vertex.z)?;
    }

    for normal in mesh.normals() {
        writeln!(writer, "vn {} {} {}", normal.x, normal.y, normal.z)?;
    }

    for face in 0..mesh.num_faces() {
        let corners = &mesh.face_vertices()[3 * face..3 * face + 3];
        let (a, b, c) = (
            corners[0].index() + 1,
            corners[1].index() + 1,
            corners[2].index() + 1,
        );
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    Ok(())
}
