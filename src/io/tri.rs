//! Triangle-soup (`.tri`) importer.
//!
//! A triangle soup lists every triangle's three corner positions
//! independently, with no shared-vertex table:
//!
//! ```text
//! <T>
//! <x0> <y0> <z0>
//! <x1> <y1> <z1>
//! ...
//! ```
//!
//! The importer coalesces repeated positions into single vertices and
//! pairs every half-edge with its twin, producing a fully-connected
//! [`HalfEdgeMesh`]. Coalescing compares positions for exact equality:
//! two positions that differ in the last ULP stay distinct vertices and
//! later fail twin pairing. This matches the `.tri` assets the format was
//! made for; tolerance-based welding would silently change which vertices
//! exist.

use std::io::BufRead;
use std::str::FromStr;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, VertexId};

/// Read a triangle soup into a new mesh.
///
/// Both the vertex dedup and the twin pairing are linear scans, so the
/// whole build is quadratic in the number of half-edges. Fails with
/// [`MeshError::Read`] on a truncated or malformed stream and
/// [`MeshError::OtherHalfNotFound`] when the soup does not describe a
/// closed, consistently-wound surface.
pub fn read<R: BufRead>(mut reader: R) -> Result<HalfEdgeMesh> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    let mut tokens = contents.split_whitespace();

    let triangle_count: usize = next_token(&mut tokens, "triangle count")?;
    let position_count = triangle_count * 3;

    let mut mesh = HalfEdgeMesh::new();

    for _ in 0..position_count {
        let x = next_token(&mut tokens, "coordinate")?;
        let y = next_token(&mut tokens, "coordinate")?;
        let z = next_token(&mut tokens, "coordinate")?;
        let position = Point3::new(x, y, z);

        // Coalesce: reuse the index of a bit-identical position if one
        // has been seen before, otherwise append a new vertex.
        let vertex = match mesh.vertices.iter().position(|&v| v == position) {
            Some(index) => VertexId::new(index),
            None => {
                mesh.vertices.push(position);
                VertexId::new(mesh.vertices.len() - 1)
            }
        };

        mesh.face_vertices.push(vertex);
    }

    mesh.rebuild_connectivity()?;
    mesh.compute_normals();
    mesh.compute_bounds();

    Ok(mesh)
}

fn next_token<'a, I, T>(tokens: &mut I, what: &str) -> Result<T>
where
    I: Iterator<Item = &'a str>,
    T: FromStr,
{
    let token = tokens
        .next()
        .ok_or_else(|| MeshError::Read(format!("stream ended before {what}")))?;
    token
        .parse()
        .map_err(|_| MeshError::Read(format!("malformed {what}: {token:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit tetrahedron A=(0,0,0), B=(1,0,0), C=(0,1,0), D=(0,0,1) as raw
    /// triangles (A,B,C), (A,D,B), (A,C,D), (B,D,C).
    const TETRAHEDRON: &str = "4\n\
        0 0 0  1 0 0  0 1 0\n\
        0 0 0  0 0 1  1 0 0\n\
        0 0 0  0 1 0  0 0 1\n\
        1 0 0  0 0 1  0 1 0\n";

    #[test]
    fn test_tetrahedron() {
        let mesh = read(TETRAHEDRON.as_bytes()).unwrap();

        // 12 soup positions coalesce to 4 vertices
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.is_valid());

        // V - E + F = 2
        let euler = mesh.num_vertices() as i64 - mesh.num_edges() as i64
            + mesh.num_faces() as i64;
        assert_eq!(euler, 2);

        let centre = mesh.centre_of_gravity();
        assert!((centre - Point3::new(0.25, 0.25, 0.25)).norm() < 1e-6);
        assert!((mesh.object_size() - 0.433_012_7).abs() < 1e-6);
    }

    #[test]
    fn test_coalescing_is_exact() {
        // The perturbed copy of A must stay a separate vertex, which
        // leaves the surface open and fails twin pairing.
        let soup = "4\n\
            0 0 0  1 0 0  0 1 0\n\
            0.00000001 0 0  0 0 1  1 0 0\n\
            0 0 0  0 1 0  0 0 1\n\
            1 0 0  0 0 1  0 1 0\n";
        assert!(matches!(
            read(soup.as_bytes()),
            Err(MeshError::OtherHalfNotFound { .. })
        ));
    }

    #[test]
    fn test_open_surface() {
        // Two triangles sharing the edge AB only
        let soup = "2\n\
            0 0 0  1 0 0  0 1 0\n\
            1 0 0  0 0 0  0 0 -1\n";
        assert!(matches!(
            read(soup.as_bytes()),
            Err(MeshError::OtherHalfNotFound { .. })
        ));
    }

    #[test]
    fn test_inconsistent_winding() {
        // The directed edge A->B appears in both faces, so it can never
        // be paired.
        let soup = "2\n\
            0 0 0  1 0 0  0 1 0\n\
            0 0 0  1 0 0  0 0 -1\n";
        let err = read(soup.as_bytes());
        assert!(matches!(err, Err(MeshError::OtherHalfNotFound { edge, .. }) if edge.index() == 0));
    }

    #[test]
    fn test_truncated_stream() {
        let soup = "2\n0 0 0  1 0 0\n";
        assert!(matches!(read(soup.as_bytes()), Err(MeshError::Read(_))));
    }

    #[test]
    fn test_malformed_token() {
        let soup = "1\n0 0 zero  1 0 0  0 1 0\n";
        assert!(matches!(read(soup.as_bytes()), Err(MeshError::Read(_))));
    }

    #[test]
    fn test_empty_soup() {
        let mesh = read("0\n".as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.object_size(), 0.0);
    }
}
