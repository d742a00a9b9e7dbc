use std::ops::{Index, IndexMut};

use super::face::{Face, AB, BC, CA};
use super::math::{classify, distance_2_to_segment};
use super::FixedFaceHandle;
use crate::Point2;

#[derive(Debug, Clone)]
struct FaceEntry {
    generation: u32,
    face: Option<Face>,
}

/// Owns all faces of a triangulation.
///
/// Removed faces leave an empty slot behind that is reused by the next insertion. Every reuse
/// bumps the slot's generation, handles of removed faces can thus be detected with
/// [Mesh::get].
#[derive(Debug, Clone, Default)]
pub(crate) struct Mesh {
    entries: Vec<FaceEntry>,
    free_list: Vec<usize>,
    num_faces: usize,
}

impl Mesh {
    pub fn len(&self) -> usize {
        self.num_faces
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_list.clear();
        self.num_faces = 0;
    }

    pub fn insert(&mut self, face: Face) -> FixedFaceHandle {
        self.num_faces += 1;
        if let Some(index) = self.free_list.pop() {
            let entry = &mut self.entries[index];
            entry.face = Some(face);
            FixedFaceHandle::new(index, entry.generation)
        } else {
            self.entries.push(FaceEntry {
                generation: 0,
                face: Some(face),
            });
            FixedFaceHandle::new(self.entries.len() - 1, 0)
        }
    }

    pub fn remove(&mut self, handle: FixedFaceHandle) -> Face {
        let entry = &mut self.entries[handle.index()];
        assert_eq!(
            entry.generation,
            handle.generation(),
            "Removing an outdated face handle. This is a bug."
        );
        let face = entry
            .face
            .take()
            .expect("Removing an empty face slot. This is a bug.");
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(handle.index());
        self.num_faces -= 1;
        face
    }

    pub fn get(&self, handle: FixedFaceHandle) -> Option<&Face> {
        self.entries
            .get(handle.index())
            .filter(|entry| entry.generation == handle.generation())
            .and_then(|entry| entry.face.as_ref())
    }

    pub fn contains(&self, handle: FixedFaceHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FixedFaceHandle, &Face)> + '_ {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .face
                .as_ref()
                .map(|face| (FixedFaceHandle::new(index, entry.generation), face))
        })
    }

    /// Collects the faces around `corner`, starting with `start`.
    ///
    /// Ghost faces are part of the fan. The faces are returned in counterclockwise order
    /// for real start faces.
    pub fn fan(&self, corner: Point2<f64>, start: FixedFaceHandle) -> Vec<FixedFaceHandle> {
        let mut result = vec![start];
        let mut prev = None;
        let mut current = start;
        loop {
            let next = self[current].next_neighbor(corner, prev);
            if next == start {
                return result;
            }
            assert!(
                result.len() <= self.num_faces,
                "Fan around a vertex does not close. This is a bug."
            );
            result.push(next);
            prev = Some(current);
            current = next;
        }
    }

    /// Walks from `start` towards `p`.
    ///
    /// Returns a real face containing `p` (boundary included) or, if `p` lies outside of the
    /// convex hull, the ghost face reached by crossing a hull edge.
    pub fn walk(&self, p: Point2<f64>, start: FixedFaceHandle) -> FixedFaceHandle {
        let mut current = start;
        if self[current].ghost {
            match self.find_next(p, current) {
                Some(next) if !self[next].ghost => current = next,
                _ => return current,
            }
        }

        // A visibility walk may cycle if the mesh is not Delaunay.
        let mut budget = self.num_faces + 2;
        while budget > 0 {
            budget -= 1;
            match self.find_next(p, current) {
                None => return current,
                Some(next) if self[next].ghost => return next,
                Some(next) => current = next,
            }
        }

        tracing::warn!(
            x = p.x,
            y = p.y,
            "Location walk exceeded its step budget, falling back to a linear scan"
        );
        self.scan(p).unwrap_or(current)
    }

    fn find_next(&self, p: Point2<f64>, handle: FixedFaceHandle) -> Option<FixedFaceHandle> {
        let face = &self[handle];
        let neighbors = face.neighbors();
        if face.ghost {
            return neighbors
                .iter()
                .flatten()
                .copied()
                .find(|neighbor| !self[*neighbor].ghost);
        }

        // Prefer stepping into real faces, hull edges are only crossed as a last resort.
        let mut hull_crossing = None;
        for slot in [AB, BC, CA] {
            let (from, to) = face.edge(slot);
            if classify(p, from, to).is_on_right_side() {
                let neighbor = face.neighbor(slot);
                if !self[neighbor].ghost {
                    return Some(neighbor);
                }
                hull_crossing.get_or_insert(neighbor);
            }
        }
        hull_crossing
    }

    /// Locates `p` by checking every face.
    pub fn scan(&self, p: Point2<f64>) -> Option<FixedFaceHandle> {
        if let Some((handle, _)) = self.iter().find(|(_, face)| face.contains_point(p)) {
            return Some(handle);
        }

        self.iter()
            .filter(|(_, face)| face.ghost && classify(p, face.a, face.b).is_left_or_on_segment())
            .map(|(handle, face)| (handle, distance_2_to_segment(face.a, face.b, p)))
            .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
            .map(|(handle, _)| handle)
    }
}

impl Index<FixedFaceHandle> for Mesh {
    type Output = Face;

    fn index(&self, handle: FixedFaceHandle) -> &Face {
        self.get(handle)
            .expect("Accessing a removed face. This is a bug.")
    }
}

impl IndexMut<FixedFaceHandle> for Mesh {
    fn index_mut(&mut self, handle: FixedFaceHandle) -> &mut Face {
        self.entries
            .get_mut(handle.index())
            .filter(|entry| entry.generation == handle.generation())
            .and_then(|entry| entry.face.as_mut())
            .expect("Accessing a removed face. This is a bug.")
    }
}
