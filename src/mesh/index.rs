//! Index types for mesh elements.
//!
//! Vertices, half-edges, faces and full edges each get their own `u32`
//! newtype so the three index spaces cannot be mixed up. `u32::MAX` is
//! reserved as the "absent" sentinel used while connectivity is being
//! built; it must never be used to index the mesh arrays.

use std::fmt::{self, Debug};

const INVALID: u32 = u32::MAX;

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

/// A type-safe full-edge index (the unordered pair of a half-edge and its twin).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} overflows u32", index);
                Self(index as u32)
            }

            /// Create the absent/sentinel index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-sentinel) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");
impl_index_type!(EdgeId, "E");

impl HalfEdgeId {
    /// The next half-edge around the same face.
    ///
    /// Faces occupy three consecutive half-edge slots, so this is pure
    /// index arithmetic: `3⌊h/3⌋ + (h+1) mod 3`.
    #[inline]
    pub fn next_in_face(self) -> HalfEdgeId {
        let h = self.index();
        HalfEdgeId::new(3 * (h / 3) + (h + 1) % 3)
    }

    /// The previous half-edge around the same face: `3⌊h/3⌋ + (h+2) mod 3`.
    #[inline]
    pub fn prev_in_face(self) -> HalfEdgeId {
        let h = self.index();
        HalfEdgeId::new(3 * (h / 3) + (h + 2) % 3)
    }

    /// The face owning this half-edge's slot.
    #[inline]
    pub fn face(self) -> FaceId {
        FaceId::new(self.index() / 3)
    }
}

impl FaceId {
    /// The three half-edge slots of this face, in cyclic order.
    #[inline]
    pub fn half_edges(self) -> [HalfEdgeId; 3] {
        let base = 3 * self.index();
        [
            HalfEdgeId::new(base),
            HalfEdgeId::new(base + 1),
            HalfEdgeId::new(base + 2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());

        let invalid = VertexId::invalid();
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_type_safety() {
        // Same raw value, distinct types
        let v = VertexId::new(0);
        let he = HalfEdgeId::new(0);
        let f = FaceId::new(0);

        assert_eq!(v.index(), he.index());
        assert_eq!(he.index(), f.index());
    }

    #[test]
    fn test_debug_format() {
        let v = VertexId::new(42);
        assert_eq!(format!("{:?}", v), "V(42)");

        let invalid = VertexId::invalid();
        assert_eq!(format!("{:?}", invalid), "V(INVALID)");
    }

    #[test]
    fn test_face_cycle() {
        // Half-edges 3, 4, 5 form face 1 and cycle in order
        let h = HalfEdgeId::new(3);
        assert_eq!(h.next_in_face(), HalfEdgeId::new(4));
        assert_eq!(h.next_in_face().next_in_face(), HalfEdgeId::new(5));
        assert_eq!(h.next_in_face().next_in_face().next_in_face(), h);
        assert_eq!(h.prev_in_face(), HalfEdgeId::new(5));
        assert_eq!(h.face(), FaceId::new(1));
    }

    #[test]
    fn test_face_half_edges() {
        let f = FaceId::new(2);
        assert_eq!(
            f.half_edges(),
            [HalfEdgeId::new(6), HalfEdgeId::new(7), HalfEdgeId::new(8)]
        );
    }
}
