//! Mesh stream I/O.
//!
//! This module serializes and deserializes meshes over caller-supplied
//! byte streams; the library never opens, closes, or names files.
//!
//! # Supported Formats
//!
//! | Format | Extension | Read | Write | Notes |
//! |--------|-----------|------|-------|-------|
//! | Half-edge dump | `.halfedge`, `.hds` | ✓ | ✓ | Full symbolic topology |
//! | Triangle soup | `.tri` | ✓ | ✗ | Vertex-duplicating input |
//! | Face-list surface | `.obj` | ✗ | ✓ | `v`/`vn`/`f` output |
//!
//! # Usage
//!
//! ```
//! use sliver::mesh::HalfEdgeMesh;
//!
//! let soup = "1\n0 0 0  1 0 0  0 1 0\n";
//! let mesh = sliver::io::tri::read(soup.as_bytes());
//! // A single triangle is an open surface, so twin pairing fails.
//! assert!(mesh.is_err());
//! ```
//!
//! Callers that dispatch on a file path use [`Format`]:
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use sliver::io::Format;
//!
//! let path = "meshes/cube.tri";
//! let format = Format::from_path(path).unwrap();
//! let reader = BufReader::new(File::open(path).unwrap());
//! let mesh = sliver::io::read(format, reader).unwrap();
//! ```

pub mod hds;
pub mod obj;
pub mod tri;

use std::io::BufRead;
use std::path::Path;

use crate::error::Result;
use crate::mesh::HalfEdgeMesh;

/// Supported mesh input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Symbolic half-edge dump (`.halfedge`, `.hds`).
    HalfEdgeDump,
    /// Triangle soup (`.tri`).
    TriangleSoup,
}

impl Format {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "halfedge" | "hds" => Some(Format::HalfEdgeDump),
            "tri" => Some(Format::TriangleSoup),
            _ => None,
        }
    }

    /// Detect format from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Read a mesh from a stream in the given format.
pub fn read<R: BufRead>(format: Format, reader: R) -> Result<HalfEdgeMesh> {
    match format {
        Format::HalfEdgeDump => hds::read(reader),
        Format::TriangleSoup => tri::read(reader),
    }
}
