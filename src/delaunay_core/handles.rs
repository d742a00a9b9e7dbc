use std::convert::TryInto;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A handle referring to a face of a triangulation.
///
/// Fixed handles are small `Copy` values that do not borrow the triangulation. A handle stays
/// valid until its face is removed from the mesh (by an edge flip or a vertex removal). Face
/// slots are reused afterwards, but every reuse increments the slot's generation so that an
/// outdated handle is never confused with the face that replaced it.
///
/// Use [DelaunayTriangulation::face](crate::DelaunayTriangulation::face) to check if a handle
/// is still valid.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct FixedFaceHandle {
    index: u32,
    generation: u32,
}

impl FixedFaceHandle {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index
                .try_into()
                .expect("Index too big - at most 2^32 faces supported"),
            generation,
        }
    }

    /// The slot index of this handle.
    ///
    /// Indices are dense: they range from zero to the number of face slots ever allocated.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Debug for FixedFaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedFaceHandle")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}
