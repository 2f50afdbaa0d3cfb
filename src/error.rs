//! Error types for sliver.
//!
//! This module defines all error types used throughout the library.

use nalgebra::Point3;
use thiserror::Error;

use crate::mesh::{HalfEdgeId, VertexId};

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A stream ended unexpectedly or contained a malformed numeric token.
    #[error("read error: {0}")]
    Read(String),

    /// Twin pairing failed: a half-edge has no oppositely-directed partner.
    ///
    /// The surface is required to be a closed 2-manifold, so every directed
    /// edge must be mirrored by one on the neighbouring face. When it is
    /// not, the mesh is malformed: the edge sits on an open boundary, the
    /// winding of adjacent faces disagrees, or floating-point noise kept
    /// two copies of a position from coalescing into one vertex.
    #[error(
        "no other half for half-edge {edge:?}\n\
         \tfrom = ({}, {}, {})\n\
         \tto = ({}, {}, {})\n\
         the edge is open, the winding of adjacent faces is inconsistent, \
         or the endpoint positions do not match bit-for-bit",
        .from.x, .from.y, .from.z, .to.x, .to.y, .to.z
    )]
    OtherHalfNotFound {
        /// The half-edge that could not be paired.
        edge: HalfEdgeId,
        /// Position of the half-edge's tail vertex.
        from: Point3<f32>,
        /// Position of the half-edge's head vertex.
        to: Point3<f32>,
    },

    /// A one-ring traversal was requested for an out-of-range vertex.
    #[error("vertex {0:?} is out of range")]
    InvalidVertex(VertexId),

    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file extension that no loader claims.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The offending file extension.
        extension: String,
    },
}
