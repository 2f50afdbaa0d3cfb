//! Loop subdivision for closed triangle meshes.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{EdgeId, FaceId, HalfEdgeId, HalfEdgeMesh, VertexId};

use super::SubdivideOptions;

// Loop's edge stencil: 3/8 on the shared edge's endpoints, 1/8 on the two
// corners opposite it.
const NEAR_NEIGHBOUR_WEIGHT: f32 = 0.375;
const FAR_NEIGHBOUR_WEIGHT: f32 = 0.125;

/// Perform Loop subdivision, producing a new mesh.
///
/// Each iteration splits every face into four and repositions all
/// vertices by Loop's stencils; the input mesh is never modified. Zero
/// iterations return a copy.
///
/// # Algorithm
///
/// One iteration:
/// 1. Index full edges: each `{h, twin(h)}` pair gets one new edge vertex
/// 2. Emit the refined faces, all central sub-faces first, then the three
///    corner sub-faces of each face
/// 3. Rebuild the twin pairing and first directed edges of the result
/// 4. Position edge vertices as `3/8 (a + b) + 1/8 (c + d)` from the old
///    edge endpoints and the two opposite corners
/// 5. Reposition old vertices as `(1 - nα) v + α Σ(neighbors)` over the
///    old one-ring, `α = 3/16` for valence 3 and
///    `(5/8 - (3/8 + cos(2π/n)/4)²)/n` otherwise
/// 6. Refresh the barycenter, bounding radius and vertex normals
pub fn loop_subdivide(mesh: &HalfEdgeMesh, options: &SubdivideOptions) -> Result<HalfEdgeMesh> {
    loop_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Loop subdivision with progress reporting.
pub fn loop_subdivide_with_progress(
    mesh: &HalfEdgeMesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<HalfEdgeMesh> {
    let mut current = mesh.clone();
    for iteration in 0..options.iterations {
        progress.report(iteration, options.iterations, "Loop subdivision");
        current = subdivide_step(&current, options.parallel)?;
    }
    progress.report(options.iterations, options.iterations, "Loop subdivision");
    Ok(current)
}

/// One Loop subdivision step; backs [`HalfEdgeMesh::subdivide`].
pub fn subdivide_once(mesh: &HalfEdgeMesh) -> Result<HalfEdgeMesh> {
    subdivide_step(mesh, true)
}

fn subdivide_step(mesh: &HalfEdgeMesh, parallel: bool) -> Result<HalfEdgeMesh> {
    let halfedge_count = mesh.num_halfedges();
    let old_vertex_count = mesh.num_vertices();

    // Index full edges: walk half-edges in ascending order and give each
    // unassigned one a fresh full-edge id shared with its twin. The
    // representative (the lower half-edge) is kept for the edge stencil.
    let mut full_edge_of = vec![EdgeId::invalid(); halfedge_count];
    let mut representatives: Vec<HalfEdgeId> = Vec::with_capacity(halfedge_count / 2);

    for h in 0..halfedge_count {
        if full_edge_of[h].is_valid() {
            continue;
        }
        let he = HalfEdgeId::new(h);
        let full_edge = EdgeId::new(representatives.len());
        full_edge_of[h] = full_edge;
        full_edge_of[mesh.twin(he).index()] = full_edge;
        representatives.push(he);
    }

    // Full edge k becomes vertex |V| + k of the refined mesh; old
    // vertices keep their ids.
    let edge_vertex =
        |he: HalfEdgeId| VertexId::new(old_vertex_count + full_edge_of[he.index()].index());

    // Emit refined faces: all central sub-faces first, then the corner
    // sub-faces, three per original face. This order fixes the half-edge
    // ids of the result and is relied upon by consumers.
    let face_count = mesh.num_faces();
    let mut refined = HalfEdgeMesh::new();
    refined.face_vertices = Vec::with_capacity(4 * halfedge_count);

    for f in 0..face_count {
        let [h0, h1, h2] = FaceId::new(f).half_edges();
        refined
            .face_vertices
            .extend([edge_vertex(h0), edge_vertex(h1), edge_vertex(h2)]);
    }

    for f in 0..face_count {
        let face = FaceId::new(f);
        let [h0, h1, h2] = face.half_edges();
        let [v0, v1, v2] = mesh.face_triangle(face);
        // Each corner keeps its vertex and takes the midpoints of its two
        // incident edges, winding with the parent face.
        refined
            .face_vertices
            .extend([v0, edge_vertex(h0), edge_vertex(h2)]);
        refined
            .face_vertices
            .extend([v1, edge_vertex(h1), edge_vertex(h0)]);
        refined
            .face_vertices
            .extend([v2, edge_vertex(h2), edge_vertex(h1)]);
    }

    // Both stencils read the OLD mesh only, so old-vertex smoothing uses
    // the neighbourhood as it was before refinement.
    let smoothed: Result<Vec<Point3<f32>>> = if parallel {
        (0..old_vertex_count)
            .into_par_iter()
            .map(|v| smoothed_position(mesh, VertexId::new(v)))
            .collect()
    } else {
        (0..old_vertex_count)
            .map(|v| smoothed_position(mesh, VertexId::new(v)))
            .collect()
    };
    refined.vertices = smoothed?;

    let edge_positions: Vec<Point3<f32>> = if parallel {
        representatives
            .par_iter()
            .map(|&he| edge_vertex_position(mesh, he))
            .collect()
    } else {
        representatives
            .iter()
            .map(|&he| edge_vertex_position(mesh, he))
            .collect()
    };
    refined.vertices.extend(edge_positions);

    refined.rebuild_connectivity()?;
    refined.compute_bounds();
    refined.compute_normals();

    Ok(refined)
}

/// Loop's edge stencil, evaluated on the unrefined mesh.
fn edge_vertex_position(mesh: &HalfEdgeMesh, he: HalfEdgeId) -> Point3<f32> {
    let twin = mesh.twin(he);
    let (near_a, near_b) = mesh.endpoints(he);
    // The corners opposite the shared edge, one per incident face
    let far_a = mesh.tail(he.prev_in_face());
    let far_b = mesh.tail(twin.prev_in_face());

    let near = mesh.position(near_a).coords + mesh.position(near_b).coords;
    let far = mesh.position(far_a).coords + mesh.position(far_b).coords;

    Point3::from(near * NEAR_NEIGHBOUR_WEIGHT + far * FAR_NEIGHBOUR_WEIGHT)
}

/// Loop's vertex stencil, evaluated on the unrefined mesh.
fn smoothed_position(mesh: &HalfEdgeMesh, v: VertexId) -> Result<Point3<f32>> {
    let mut neighbour_sum = Vector3::zeros();
    let mut valence = 0usize;

    for he in mesh.vertex_halfedges(v)? {
        neighbour_sum += mesh.position(mesh.head(he)).coords;
        valence += 1;
    }

    if valence == 0 {
        return Ok(*mesh.position(v));
    }

    let alpha = loop_alpha(valence);
    Ok(Point3::from(
        mesh.position(v).coords * (1.0 - valence as f32 * alpha) + neighbour_sum * alpha,
    ))
}

/// The Loop vertex coefficient α for valence n.
fn loop_alpha(n: usize) -> f32 {
    if n == 3 {
        3.0 / 16.0
    } else {
        let n_f = n as f32;
        let inner = 0.375 + 0.25 * (2.0 * std::f32::consts::PI / n_f).cos();
        (0.625 - inner * inner) / n_f
    }
}
