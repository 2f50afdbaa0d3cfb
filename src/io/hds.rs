//! Half-edge dump (`.halfedge` / `.hds`) reader and writer.
//!
//! The dump is a line-oriented symbolic serialization of the whole
//! half-edge structure. Each record is a keyword, a dense sequential
//! index, and a payload:
//!
//! ```text
//! # comment
//! Vertex 0 0.000000 0.000000 0.000000
//! Normal 0 -0.577350 -0.577350 -0.577350
//! FirstDirectedEdge 0 0
//! Face 0 0 1 2
//! OtherHalf 0 5
//! ```
//!
//! The reader trusts the connectivity and the normals as written and only
//! recomputes the barycenter and bounding radius. A record whose declared
//! index disagrees with the array built so far is malformed; the rest of
//! that line is skipped and reading continues.

use std::io::{BufRead, Write};
use std::str::FromStr;

use nalgebra::Vector3;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeId, HalfEdgeMesh, VertexId};

/// Read a half-edge dump into a new mesh.
///
/// Reads to end of stream. Indices inside records are not validated
/// against each other beyond the sequential-index check; the dump is
/// assumed to describe a consistent mesh.
pub fn read<R: BufRead>(reader: R) -> Result<HalfEdgeMesh> {
    let mut mesh = HalfEdgeMesh::new();

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();

        let Some(keyword) = tokens.next() else {
            continue;
        };
        if keyword.starts_with('#') {
            continue;
        }

        match keyword {
            "Vertex" => {
                if next_token::<_, usize>(&mut tokens, "vertex index")? != mesh.vertices.len() {
                    continue;
                }
                mesh.vertices.push(read_triple(&mut tokens)?.into());
            }
            "Normal" => {
                if next_token::<_, usize>(&mut tokens, "normal index")? != mesh.normals.len() {
                    continue;
                }
                mesh.normals.push(read_triple(&mut tokens)?.into());
            }
            "FirstDirectedEdge" => {
                if next_token::<_, usize>(&mut tokens, "FDE index")?
                    != mesh.first_directed_edge.len()
                {
                    continue;
                }
                let edge: usize = next_token(&mut tokens, "first directed edge")?;
                mesh.first_directed_edge.push(HalfEdgeId::new(edge));
            }
            "Face" => {
                if next_token::<_, usize>(&mut tokens, "face index")? != mesh.num_faces() {
                    continue;
                }
                for _ in 0..3 {
                    let vertex: usize = next_token(&mut tokens, "face vertex")?;
                    mesh.face_vertices.push(VertexId::new(vertex));
                }
            }
            "OtherHalf" => {
                if next_token::<_, usize>(&mut tokens, "half-edge index")? != mesh.twins.len() {
                    continue;
                }
                let twin: usize = next_token(&mut tokens, "other half")?;
                mesh.twins.push(HalfEdgeId::new(twin));
            }
            // Unknown record kind: skip the line
            _ => continue,
        }
    }

    mesh.compute_bounds();

    Ok(mesh)
}

/// Write the mesh as a half-edge dump.
///
/// Records are emitted in the fixed order `Vertex`, `Normal`,
/// `FirstDirectedEdge`, `Face`, `OtherHalf`, each with a dense sequential
/// index and fixed six-decimal floats.
pub fn write<W: Write>(mesh: &HalfEdgeMesh, mut writer: W) -> Result<()> {
    writeln!(
        writer,
        "#\n# Surface vertices={} faces={}\n#",
        mesh.num_vertices(),
        mesh.num_faces()
    )?;

    for (index, vertex) in mesh.positions().iter().enumerate() {
        writeln!(
            writer,
            "Vertex {} {:.6} {:.6} {:.6}",
            index, vertex.x, vertex.y, vertex.z
        )?;
    }

    for (index, normal) in mesh.normals().iter().enumerate() {
        writeln!(
            writer,
            "Normal {} {:.6} {:.6} {:.6}",
            index, normal.x, normal.y, normal.z
        )?;
    }

    for (index, fde) in mesh.first_directed_edges().iter().enumerate() {
        writeln!(writer, "FirstDirectedEdge {} {}", index, fde.index())?;
    }

    for face in 0..mesh.num_faces() {
        let corners = &mesh.face_vertices()[3 * face..3 * face + 3];
        writeln!(
            writer,
            "Face {} {} {} {}",
            face,
            corners[0].index(),
            corners[1].index(),
            corners[2].index()
        )?;
    }

    for (index, twin) in mesh.twins().iter().enumerate() {
        writeln!(writer, "OtherHalf {} {}", index, twin.index())?;
    }

    Ok(())
}

fn next_token<'a, I, T>(tokens: &mut I, what: &str) -> Result<T>
where
    I: Iterator<Item = &'a str>,
    T: FromStr,
{
    let token = tokens
        .next()
        .ok_or_else(|| MeshError::Read(format!("record ended before {what}")))?;
    token
        .parse()
        .map_err(|_| MeshError::Read(format!("malformed {what}: {token:?}")))
}

fn read_triple<'a, I>(tokens: &mut I) -> Result<Vector3<f32>>
where
    I: Iterator<Item = &'a str>,
{
    let x = next_token(tokens, "coordinate")?;
    let y = next_token(tokens, "coordinate")?;
    let z = next_token(tokens, "coordinate")?;
    Ok(Vector3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn tetrahedron() -> HalfEdgeMesh {
        let soup = "4\n\
            0 0 0  1 0 0  0 1 0\n\
            0 0 0  0 0 1  1 0 0\n\
            0 0 0  0 1 0  0 0 1\n\
            1 0 0  0 0 1  0 1 0\n";
        crate::io::tri::read(soup.as_bytes()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let mesh = tetrahedron();

        let mut dump = Vec::new();
        write(&mesh, &mut dump).unwrap();
        let restored = read(dump.as_slice()).unwrap();

        assert_eq!(restored.num_vertices(), mesh.num_vertices());
        assert_eq!(restored.face_vertices(), mesh.face_vertices());
        assert_eq!(restored.first_directed_edges(), mesh.first_directed_edges());
        assert_eq!(restored.twins(), mesh.twins());

        for (restored_p, original_p) in restored.positions().iter().zip(mesh.positions()) {
            assert!((restored_p - original_p).norm() < 1e-6);
        }
        for (restored_n, original_n) in restored.normals().iter().zip(mesh.normals()) {
            assert!((restored_n - original_n).norm() < 1e-6);
        }

        assert!(
            (restored.centre_of_gravity() - mesh.centre_of_gravity()).norm() < 1e-6
        );
        assert!((restored.object_size() - mesh.object_size()).abs() < 1e-6);
        assert!(restored.is_valid());
    }

    #[test]
    fn test_comments_skipped() {
        let dump = "# a comment\n#\nVertex 0 1 2 3\n# trailing comment\n";
        let mesh = read(dump.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 1);
        assert_eq!(mesh.positions()[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_malformed_record_skipped() {
        // The declared index 5 disagrees with the empty vertex array, so
        // the record is dropped; the following one is fine.
        let dump = "Vertex 5 9 9 9\nVertex 0 1 2 3\n";
        let mesh = read(dump.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 1);
        assert_eq!(mesh.positions()[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_unknown_keyword_skipped() {
        let dump = "Banana 0 1\nVertex 0 1 2 3\n";
        let mesh = read(dump.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 1);
    }

    #[test]
    fn test_malformed_number_fails() {
        let dump = "Vertex 0 1 two 3\n";
        assert!(matches!(read(dump.as_bytes()), Err(MeshError::Read(_))));
    }

    #[test]
    fn test_bounds_recomputed() {
        let dump = "Vertex 0 0 0 0\nVertex 1 2 0 0\n";
        let mesh = read(dump.as_bytes()).unwrap();
        assert_eq!(mesh.centre_of_gravity(), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.object_size(), 1.0);
    }
}
