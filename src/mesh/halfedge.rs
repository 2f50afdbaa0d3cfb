//! Half-edge mesh data structure.
//!
//! This module provides a half-edge representation for closed 2-manifold
//! triangle meshes, stored as parallel arrays rather than a pointer graph.
//!
//! # Structure
//!
//! - Face `f` owns half-edge slots `[3f, 3f+1, 3f+2]` in cyclic order, so
//!   next/previous within a face are index arithmetic (see
//!   [`HalfEdgeId::next_in_face`]).
//! - `face_vertices[h]` is the **tail** vertex of half-edge `h`; its head
//!   is the tail of the next half-edge in the face.
//! - `twins[h]` is the oppositely-directed half-edge on the neighbouring
//!   face. On a closed manifold every half-edge has exactly one twin.
//! - `first_directed_edge[v]` is one outgoing half-edge of `v`, the anchor
//!   for one-ring traversal.
//!
//! # Geometry summary
//!
//! The mesh carries derived geometry alongside the topology: per-vertex
//! area-weighted unit normals, the barycenter, and the bounding radius
//! about it. [`HalfEdgeMesh::compute_normals`] and
//! [`HalfEdgeMesh::compute_bounds`] refresh these after structural change.

use std::io::{BufRead, Write};

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{MeshError, Result};

/// A triangle mesh backed by the half-edge structure.
///
/// The five arrays are parallel: `face_vertices` and `twins` are indexed
/// by half-edge id, `vertices`, `normals` and `first_directed_edge` by
/// vertex id. Non-library code reads them through the slice accessors and
/// must not mutate them.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    /// Spatial position of each vertex.
    pub(crate) vertices: Vec<Point3<f32>>,

    /// Unit normal of each vertex (zero when degenerate).
    pub(crate) normals: Vec<Vector3<f32>>,

    /// Tail vertex of each half-edge; three consecutive entries per face.
    pub(crate) face_vertices: Vec<VertexId>,

    /// One outgoing half-edge per vertex.
    pub(crate) first_directed_edge: Vec<HalfEdgeId>,

    /// The opposite half-edge of each half-edge.
    pub(crate) twins: Vec<HalfEdgeId>,

    /// Barycenter of the vertex positions.
    pub(crate) centre_of_gravity: Point3<f32>,

    /// Radius of the sphere centred at the barycenter containing all vertices.
    pub(crate) object_size: f32,
}

impl Default for HalfEdgeMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfEdgeMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            face_vertices: Vec::new(),
            first_directed_edge: Vec::new(),
            twins: Vec::new(),
            centre_of_gravity: Point3::origin(),
            object_size: 0.0,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.face_vertices.len()
    }

    /// Get the number of full edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.face_vertices.len() / 2
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.face_vertices.len() / 3
    }

    /// Vertex positions, indexed by [`VertexId`].
    #[inline]
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Vertex normals, indexed by [`VertexId`].
    #[inline]
    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    /// Tail vertices, indexed by [`HalfEdgeId`].
    #[inline]
    pub fn face_vertices(&self) -> &[VertexId] {
        &self.face_vertices
    }

    /// First directed edges, indexed by [`VertexId`].
    #[inline]
    pub fn first_directed_edges(&self) -> &[HalfEdgeId] {
        &self.first_directed_edge
    }

    /// Twin half-edges, indexed by [`HalfEdgeId`].
    #[inline]
    pub fn twins(&self) -> &[HalfEdgeId] {
        &self.twins
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f32> {
        &self.vertices[v.index()]
    }

    /// Barycenter of the mesh; the origin for an empty mesh.
    #[inline]
    pub fn centre_of_gravity(&self) -> Point3<f32> {
        self.centre_of_gravity
    }

    /// Radius from the barycenter to the farthest vertex.
    #[inline]
    pub fn object_size(&self) -> f32 {
        self.object_size
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.twins[he.index()]
    }

    /// Get the tail vertex of a half-edge.
    #[inline]
    pub fn tail(&self, he: HalfEdgeId) -> VertexId {
        self.face_vertices[he.index()]
    }

    /// Get the head vertex of a half-edge.
    #[inline]
    pub fn head(&self, he: HalfEdgeId) -> VertexId {
        self.face_vertices[he.next_in_face().index()]
    }

    /// Get the `(tail, head)` endpoints of a half-edge.
    #[inline]
    pub fn endpoints(&self, he: HalfEdgeId) -> (VertexId, VertexId) {
        (self.tail(he), self.head(he))
    }

    /// Get the three corner vertices of a face, in cyclic order.
    pub fn face_triangle(&self, f: FaceId) -> [VertexId; 3] {
        let [h0, h1, h2] = f.half_edges();
        [self.tail(h0), self.tail(h1), self.tail(h2)]
    }

    /// Find the half-edge directed `from -> to` by linear scan.
    ///
    /// O(|H|); only construction uses this. Once twins are paired,
    /// adjacency goes through [`Self::twin`] instead.
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.halfedge_ids().find(|&he| self.endpoints(he) == (from, to))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.face_vertices.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.num_faces()).map(FaceId::new)
    }

    /// Iterate over the outgoing half-edges of a vertex (its one-ring).
    ///
    /// The walk starts at `first_directed_edge[v]` and steps with
    /// `next_in_face(twin(h))`, which on a closed manifold visits every
    /// outgoing half-edge of `v` exactly once before returning to the
    /// start. Fails with [`MeshError::InvalidVertex`] when `v` is out of
    /// range.
    pub fn vertex_halfedges(&self, v: VertexId) -> Result<VertexRingIter<'_>> {
        if v.index() >= self.vertices.len() {
            return Err(MeshError::InvalidVertex(v));
        }
        Ok(VertexRingIter::new(self, v))
    }

    /// Iterate over the vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId) -> Result<impl Iterator<Item = VertexId> + '_> {
        Ok(self.vertex_halfedges(v)?.map(move |he| self.head(he)))
    }

    /// Visit the one-ring of a vertex.
    ///
    /// The visitor receives each outgoing half-edge together with its tail
    /// (always `v`) and head (the neighbour).
    pub fn visit_one_ring<F>(&self, v: VertexId, mut visitor: F) -> Result<()>
    where
        F: FnMut(HalfEdgeId, VertexId, VertexId),
    {
        for he in self.vertex_halfedges(v)? {
            let (tail, head) = self.endpoints(he);
            visitor(he, tail, head);
        }
        Ok(())
    }

    /// Compute the valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId) -> Result<usize> {
        Ok(self.vertex_halfedges(v)?.count())
    }

    // ==================== Construction ====================

    /// Rebuild `first_directed_edge` and `twins` from `face_vertices`.
    ///
    /// Walks the half-edges in ascending order: the first outgoing
    /// half-edge of each vertex becomes its FDE, and every half-edge is
    /// paired with its reversed counterpart by linear scan. Fails with
    /// [`MeshError::OtherHalfNotFound`] when a half-edge has no reverse,
    /// which means the surface is not a closed, consistently-wound
    /// 2-manifold.
    pub(crate) fn rebuild_connectivity(&mut self) -> Result<()> {
        let halfedge_count = self.face_vertices.len();
        self.first_directed_edge = vec![HalfEdgeId::invalid(); self.vertices.len()];
        self.twins = vec![HalfEdgeId::invalid(); halfedge_count];

        for h in 0..halfedge_count {
            let he = HalfEdgeId::new(h);
            let (from, to) = self.endpoints(he);

            if !self.first_directed_edge[from.index()].is_valid() {
                self.first_directed_edge[from.index()] = he;
            }

            if self.twins[h].is_valid() {
                continue;
            }

            match self.find_half_edge(to, from) {
                Some(other) if other != he => {
                    self.twins[h] = other;
                    self.twins[other.index()] = he;
                }
                _ => {
                    return Err(MeshError::OtherHalfNotFound {
                        edge: he,
                        from: self.vertices[from.index()],
                        to: self.vertices[to.index()],
                    })
                }
            }
        }

        Ok(())
    }

    // ==================== Geometry ====================

    /// Recompute per-vertex normals.
    ///
    /// Each face's unnormalized cross product `(q-p) × (r-p)` accumulates
    /// onto its three corners, weighting larger faces more, and the sums
    /// are normalized at the end. A degenerate accumulation stays the zero
    /// vector.
    pub fn compute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.vertices.len(), Vector3::zeros());

        for f in 0..self.num_faces() {
            let [p_id, q_id, r_id] = self.face_triangle(FaceId::new(f));
            let p = self.vertices[p_id.index()];
            let q = self.vertices[q_id.index()];
            let r = self.vertices[r_id.index()];

            let cross = (q - p).cross(&(r - p));

            self.normals[p_id.index()] += cross;
            self.normals[q_id.index()] += cross;
            self.normals[r_id.index()] += cross;
        }

        for normal in &mut self.normals {
            *normal = normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros);
        }
    }

    /// Recompute the barycenter and bounding radius.
    ///
    /// An empty mesh keeps the origin and zero radius.
    pub fn compute_bounds(&mut self) {
        self.centre_of_gravity = Point3::origin();
        self.object_size = 0.0;

        if self.vertices.is_empty() {
            return;
        }

        let sum: Vector3<f32> = self.vertices.iter().map(|v| v.coords).sum();
        self.centre_of_gravity = Point3::from(sum / self.vertices.len() as f32);

        self.object_size = self
            .vertices
            .iter()
            .map(|v| (v - self.centre_of_gravity).norm())
            .fold(0.0, f32::max);
    }

    // ==================== Loaders / writers / subdivision ====================

    /// Build this mesh from a triangle-soup stream.
    ///
    /// On failure the mesh is left untouched; the fraction read is
    /// discarded.
    pub fn load_triangle_soup<R: BufRead>(&mut self, reader: R) -> Result<()> {
        *self = crate::io::tri::read(reader)?;
        Ok(())
    }

    /// Build this mesh from a half-edge dump stream.
    ///
    /// Connectivity and normals are trusted from the dump; only the
    /// barycenter and bounding radius are recomputed.
    pub fn load_half_edge_dump<R: BufRead>(&mut self, reader: R) -> Result<()> {
        *self = crate::io::hds::read(reader)?;
        Ok(())
    }

    /// Serialize the mesh as a half-edge dump.
    pub fn write_half_edge_dump<W: Write>(&self, writer: W) -> Result<()> {
        crate::io::hds::write(self, writer)
    }

    /// Serialize the mesh as a face-list surface.
    pub fn write_surface<W: Write>(&self, writer: W) -> Result<()> {
        crate::io::obj::write(self, writer)
    }

    /// Produce one Loop subdivision of this mesh.
    ///
    /// Returns a new mesh with each face split into four and every vertex
    /// repositioned by Loop's stencils; `self` is not modified.
    pub fn subdivide(&self) -> Result<HalfEdgeMesh> {
        crate::algo::subdivide::subdivide_once(self)
    }

    // ==================== Validation ====================

    /// Check that the connectivity invariants hold.
    ///
    /// Verifies array lengths, twin involution with reversed endpoints,
    /// FDE tails, pairwise-distinct vertex positions, and that every
    /// one-ring walk closes after exactly the vertex's outdegree steps.
    pub fn is_valid(&self) -> bool {
        let vertex_count = self.vertices.len();
        let halfedge_count = self.face_vertices.len();

        if halfedge_count % 3 != 0
            || self.twins.len() != halfedge_count
            || self.first_directed_edge.len() != vertex_count
            || (!self.normals.is_empty() && self.normals.len() != vertex_count)
        {
            return false;
        }

        for &fv in &self.face_vertices {
            if !fv.is_valid() || fv.index() >= vertex_count {
                return false;
            }
        }

        // Twin involution and reversed endpoints
        for he in self.halfedge_ids() {
            let twin = self.twin(he);
            if !twin.is_valid() || twin == he || twin.index() >= halfedge_count {
                return false;
            }
            if self.twin(twin) != he {
                return false;
            }
            let (from, to) = self.endpoints(he);
            if self.endpoints(twin) != (to, from) {
                return false;
            }
        }

        // FDE tails
        for v in self.vertex_ids() {
            let fde = self.first_directed_edge[v.index()];
            if !fde.is_valid() || fde.index() >= halfedge_count || self.tail(fde) != v {
                return false;
            }
        }

        // Vertex positions must be pairwise distinct
        for i in 0..vertex_count {
            for j in (i + 1)..vertex_count {
                if self.vertices[i] == self.vertices[j] {
                    return false;
                }
            }
        }

        // Each ring must close in exactly outdegree steps
        let mut outdegree = vec![0usize; vertex_count];
        for &fv in &self.face_vertices {
            outdegree[fv.index()] += 1;
        }

        for v in self.vertex_ids() {
            let start = self.first_directed_edge[v.index()];
            let mut current = start;
            let mut steps = 0usize;
            loop {
                if self.tail(current) != v || steps > halfedge_count {
                    return false;
                }
                steps += 1;
                current = self.twin(current).next_in_face();
                if current == start {
                    break;
                }
            }
            if steps != outdegree[v.index()] {
                return false;
            }
        }

        true
    }
}

/// Iterator over the outgoing half-edges of a vertex, in ring order.
pub struct VertexRingIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> VertexRingIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, v: VertexId) -> Self {
        let start = mesh.first_directed_edge[v.index()];
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for VertexRingIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // If h goes v -> w, twin(h) goes w -> v, and the half-edge after
        // twin(h) in its face starts at v again.
        let twin = self.mesh.twin(self.current);
        if !twin.is_valid() {
            self.done = true;
            return Some(result);
        }
        self.current = twin.next_in_face();

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The unit tetrahedron of corners A, B, C, D with consistent winding.
    fn tetrahedron() -> HalfEdgeMesh {
        let mut mesh = HalfEdgeMesh::new();
        mesh.vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        mesh.face_vertices = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]]
            .iter()
            .flatten()
            .map(|&v| VertexId::new(v))
            .collect();
        mesh.rebuild_connectivity().unwrap();
        mesh.compute_normals();
        mesh.compute_bounds();
        mesh
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.centre_of_gravity(), Point3::origin());
        assert_eq!(mesh.object_size(), 0.0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_tetrahedron_counts() {
        let mesh = tetrahedron();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_edges(), 6);
        // V - E + F = 2 for a genus-0 surface
        let euler = mesh.num_vertices() as i64 - mesh.num_edges() as i64
            + mesh.num_faces() as i64;
        assert_eq!(euler, 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_twin_involution() {
        let mesh = tetrahedron();
        for he in mesh.halfedge_ids() {
            let twin = mesh.twin(he);
            assert_eq!(mesh.twin(twin), he);
            let (from, to) = mesh.endpoints(he);
            assert_eq!(mesh.endpoints(twin), (to, from));
        }
    }

    #[test]
    fn test_fde_tails() {
        let mesh = tetrahedron();
        for v in mesh.vertex_ids() {
            let fde = mesh.first_directed_edges()[v.index()];
            assert_eq!(mesh.tail(fde), v);
        }
    }

    #[test]
    fn test_one_ring() {
        let mesh = tetrahedron();
        // Every tetrahedron vertex has the other three as neighbours
        for v in mesh.vertex_ids() {
            assert_eq!(mesh.valence(v).unwrap(), 3);
            let mut neighbors: Vec<usize> =
                mesh.vertex_neighbors(v).unwrap().map(|n| n.index()).collect();
            neighbors.sort_unstable();
            let expected: Vec<usize> = (0..4).filter(|&i| i != v.index()).collect();
            assert_eq!(neighbors, expected);
        }
    }

    #[test]
    fn test_visit_one_ring() {
        let mesh = tetrahedron();
        let v = VertexId::new(0);
        let mut visited = 0;
        mesh.visit_one_ring(v, |he, tail, head| {
            assert_eq!(tail, v);
            assert_eq!(mesh.endpoints(he), (tail, head));
            visited += 1;
        })
        .unwrap();
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_invalid_vertex() {
        let mesh = tetrahedron();
        let out_of_range = VertexId::new(17);
        assert!(matches!(
            mesh.vertex_halfedges(out_of_range),
            Err(MeshError::InvalidVertex(v)) if v == out_of_range
        ));
    }

    #[test]
    fn test_find_half_edge() {
        let mesh = tetrahedron();
        let he = mesh
            .find_half_edge(VertexId::new(0), VertexId::new(1))
            .unwrap();
        assert_eq!(
            mesh.endpoints(he),
            (VertexId::new(0), VertexId::new(1))
        );
        assert!(mesh
            .find_half_edge(VertexId::new(0), VertexId::new(0))
            .is_none());
    }

    #[test]
    fn test_bounds() {
        let mesh = tetrahedron();
        let centre = mesh.centre_of_gravity();
        assert!((centre - Point3::new(0.25, 0.25, 0.25)).norm() < 1e-6);
        // Distance from the barycenter to corner A = sqrt(3 * 0.25^2)
        assert!((mesh.object_size() - 0.1875_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_normals_unit_length() {
        let mesh = tetrahedron();
        assert_eq!(mesh.normals().len(), 4);
        for normal in mesh.normals() {
            assert!((normal.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_geometry_summary_idempotent() {
        let mut mesh = tetrahedron();
        let normals = mesh.normals().to_vec();
        let centre = mesh.centre_of_gravity();
        let size = mesh.object_size();

        mesh.compute_normals();
        mesh.compute_bounds();

        assert_eq!(mesh.normals(), normals.as_slice());
        assert_eq!(mesh.centre_of_gravity(), centre);
        assert_eq!(mesh.object_size(), size);
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let mut mesh = HalfEdgeMesh::new();
        // Three collinear points: the face has zero area
        mesh.vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        mesh.face_vertices = vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)];
        mesh.compute_normals();
        for normal in mesh.normals() {
            assert_eq!(*normal, Vector3::zeros());
        }
    }
}
