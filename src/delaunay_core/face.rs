use smallvec::SmallVec;

use super::math::{classify, Circle};
use super::FixedFaceHandle;
use crate::{LineSideInfo, Point2};

/// Neighbor slot across edge `a - b`.
pub const AB: usize = 0;
/// Neighbor slot across edge `b - c`.
pub const BC: usize = 1;
/// Neighbor slot across edge `c - a`.
pub const CA: usize = 2;

/// A face of the mesh.
///
/// A *real* face is a triangle `a, b, c` in counterclockwise order. A *ghost* face represents
/// the unbounded region on the left side of the directed convex hull edge `a -> b`, its `c`
/// corner is meaningless.
///
/// Neighbor slots of a real face refer to the faces across the edges `a-b`, `b-c` and `c-a`.
/// For a ghost face, slot [AB] refers to the face across the hull edge, slot [BC] to the
/// ghost face sharing corner `b` and slot [CA] to the ghost face sharing corner `a`.
#[derive(Debug, Clone)]
pub(crate) struct Face {
    pub a: Point2<f64>,
    pub b: Point2<f64>,
    pub c: Point2<f64>,
    pub ghost: bool,
    neighbors: [Option<FixedFaceHandle>; 3],
    circumcircle: Circle,
}

impl Face {
    /// Creates a ghost face for the hull edge `a -> b`.
    pub fn new_ghost(a: Point2<f64>, b: Point2<f64>) -> Self {
        Face {
            a,
            b,
            c: a,
            ghost: true,
            neighbors: [None; 3],
            circumcircle: Circle::new(a, f64::INFINITY),
        }
    }

    /// Creates a real face, swapping `b` and `c` if required to obtain ccw order.
    pub fn new_triangle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Self {
        if classify(c, a, b).is_on_right_side() {
            Self::from_ccw(a, c, b)
        } else {
            Self::from_ccw(a, b, c)
        }
    }

    /// Creates a real face from corners that are known to be in ccw order.
    pub fn from_ccw(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Self {
        Face {
            a,
            b,
            c,
            ghost: false,
            neighbors: [None; 3],
            circumcircle: Circle::circumcircle(a, b, c),
        }
    }

    /// Turns a ghost face into the real face `a, b, apex`.
    pub fn make_real(&mut self, apex: Point2<f64>) {
        self.ghost = false;
        self.c = apex;
        self.init_circumcircle();
    }

    pub fn init_circumcircle(&mut self) {
        self.circumcircle = Circle::circumcircle(self.a, self.b, self.c);
    }

    pub fn circumcircle(&self) -> &Circle {
        &self.circumcircle
    }

    pub fn corners(&self) -> SmallVec<[Point2<f64>; 3]> {
        if self.ghost {
            smallvec::smallvec![self.a, self.b]
        } else {
            smallvec::smallvec![self.a, self.b, self.c]
        }
    }

    /// Returns corner `a`, `b` or `c` for `index` 0, 1 or 2.
    pub fn corner(&self, index: usize) -> Point2<f64> {
        match index % 3 {
            0 => self.a,
            1 => self.b,
            _ => self.c,
        }
    }

    /// Returns the index of corner `p` as used by [Face::corner].
    pub fn corner_index(&self, p: Point2<f64>) -> Option<usize> {
        if p.approx_eq(self.a) {
            Some(0)
        } else if p.approx_eq(self.b) {
            Some(1)
        } else if !self.ghost && p.approx_eq(self.c) {
            Some(2)
        } else {
            None
        }
    }

    pub fn neighbors(&self) -> [Option<FixedFaceHandle>; 3] {
        self.neighbors
    }

    pub fn neighbor(&self, slot: usize) -> FixedFaceHandle {
        self.neighbors[slot].expect("Face is missing a neighbor. This is a bug.")
    }

    pub fn ab(&self) -> FixedFaceHandle {
        self.neighbor(AB)
    }

    pub fn bc(&self) -> FixedFaceHandle {
        self.neighbor(BC)
    }

    pub fn ca(&self) -> FixedFaceHandle {
        self.neighbor(CA)
    }

    pub fn set_neighbor(&mut self, slot: usize, neighbor: FixedFaceHandle) {
        self.neighbors[slot] = Some(neighbor);
    }

    pub fn set_ab(&mut self, neighbor: FixedFaceHandle) {
        self.set_neighbor(AB, neighbor);
    }

    pub fn set_bc(&mut self, neighbor: FixedFaceHandle) {
        self.set_neighbor(BC, neighbor);
    }

    pub fn set_ca(&mut self, neighbor: FixedFaceHandle) {
        self.set_neighbor(CA, neighbor);
    }

    /// Checks if `p` is a corner of this face.
    pub fn is_corner(&self, p: Point2<f64>) -> bool {
        p.approx_eq(self.a) || p.approx_eq(self.b) || (!self.ghost && p.approx_eq(self.c))
    }

    /// Checks if this real face contains `p`. The boundary counts as inside.
    pub fn contains_point(&self, p: Point2<f64>) -> bool {
        if self.ghost {
            return false;
        }
        if self.is_corner(p) {
            return true;
        }

        let sides = self.edge_sides(p);
        sides.iter().all(|side| *side == LineSideInfo::Left)
            || sides.iter().all(|side| *side == LineSideInfo::Right)
            || sides.iter().any(|side| side.is_on_segment())
    }

    /// Checks if `p` lies on the boundary of this real face.
    pub fn on_boundary(&self, p: Point2<f64>) -> bool {
        if self.ghost {
            return false;
        }
        if self.is_corner(p) {
            return true;
        }
        self.edge_sides(p).iter().any(|side| side.is_on_segment())
    }

    fn edge_sides(&self, p: Point2<f64>) -> [LineSideInfo; 3] {
        [
            classify(p, self.a, self.b),
            classify(p, self.b, self.c),
            classify(p, self.c, self.a),
        ]
    }

    /// Checks if any of the given points (except this face's corners) lies strictly within
    /// the circumcircle.
    pub fn inside_circumcircle(&self, points: &[Point2<f64>]) -> bool {
        points
            .iter()
            .any(|p| !self.is_corner(*p) && self.circumcircle.contains(*p))
    }

    /// Replaces the neighbor reference `old` with `new`.
    pub fn switch_neighbor(&mut self, old: FixedFaceHandle, new: FixedFaceHandle) {
        let slot = self
            .neighbors
            .iter()
            .position(|neighbor| *neighbor == Some(old))
            .expect("Face to replace is not a neighbor. This is a bug.");
        self.neighbors[slot] = Some(new);
    }

    /// Returns the neighbor sharing `corner` that is different from `prev`.
    ///
    /// Calling this repeatedly walks around `corner`. Starting with `prev == None`, the walk
    /// first leaves through the edge ending in `corner`.
    pub fn next_neighbor(
        &self,
        corner: Point2<f64>,
        prev: Option<FixedFaceHandle>,
    ) -> FixedFaceHandle {
        let (first, second) = if corner.approx_eq(self.a) {
            (CA, AB)
        } else if corner.approx_eq(self.b) {
            (AB, BC)
        } else if !self.ghost && corner.approx_eq(self.c) {
            (BC, CA)
        } else {
            panic!("Walking around a point that is not a corner. This is a bug.");
        };

        let neighbor = self.neighbor(first);
        if Some(neighbor) == prev {
            self.neighbor(second)
        } else {
            neighbor
        }
    }

    /// Returns the neighbor slot of the edge connecting `u` and `v`, if any.
    pub fn edge_slot(&self, u: Point2<f64>, v: Point2<f64>) -> Option<usize> {
        let connects = |p: Point2<f64>, q: Point2<f64>| {
            (p.approx_eq(u) && q.approx_eq(v)) || (p.approx_eq(v) && q.approx_eq(u))
        };

        if connects(self.a, self.b) {
            Some(AB)
        } else if self.ghost {
            None
        } else if connects(self.b, self.c) {
            Some(BC)
        } else if connects(self.c, self.a) {
            Some(CA)
        } else {
            None
        }
    }

    /// Returns the end points of the edge belonging to a neighbor slot of a real face.
    pub fn edge(&self, slot: usize) -> (Point2<f64>, Point2<f64>) {
        match slot {
            AB => (self.a, self.b),
            BC => (self.b, self.c),
            _ => (self.c, self.a),
        }
    }
}
