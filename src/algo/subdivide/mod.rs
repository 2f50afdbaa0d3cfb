//! Mesh subdivision.
//!
//! # Loop Subdivision
//!
//! Loop subdivision (Loop, 1987) is an approximating subdivision scheme
//! for triangle meshes. Each iteration:
//!
//! 1. Inserts a new vertex on every full edge at a weighted position
//! 2. Moves every original vertex toward the average of its old one-ring
//! 3. Splits each triangle into 4 smaller triangles
//!
//! The result converges to a C² continuous surface (C¹ at extraordinary
//! vertices). The input must be a closed 2-manifold: every edge has two
//! incident faces, so no boundary rules are applied.
//!
//! # Example
//!
//! ```
//! use sliver::algo::subdivide::{loop_subdivide, SubdivideOptions};
//! use sliver::mesh::HalfEdgeMesh;
//!
//! let soup = "4\n\
//!     0 0 0  1 0 0  0 1 0\n\
//!     0 0 0  0 0 1  1 0 0\n\
//!     0 0 0  0 1 0  0 0 1\n\
//!     1 0 0  0 0 1  0 1 0\n";
//! let mesh = sliver::io::tri::read(soup.as_bytes()).unwrap();
//!
//! let refined = loop_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(refined.num_faces(), 64);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.

mod loop_subdivision;

pub use loop_subdivision::{loop_subdivide, loop_subdivide_with_progress, subdivide_once};

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Whether to evaluate the stencils in parallel (default: true).
    ///
    /// The parallel path produces bit-identical results to the
    /// sequential one; this flag exists for benchmarking.
    pub parallel: bool,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set whether to evaluate the stencils in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
