//! Mesh processing algorithms.
//!
//! This module contains the refinement algorithms operating on
//! [`HalfEdgeMesh`](crate::mesh::HalfEdgeMesh):
//!
//! - **Subdivision**: Loop subdivision for closed triangle meshes
//!
//! Long-running operations report through [`Progress`].

mod progress;
pub mod subdivide;

pub use progress::Progress;
