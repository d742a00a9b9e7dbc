use std::collections::VecDeque;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::delaunay_core::mesh_operations::{self, CollinearChain};
use crate::delaunay_core::removal;
use crate::delaunay_core::{
    classify, Circle, FixedFaceHandle, GridIndex, LineSideInfo, Mesh, VertexSet,
    VORONOI_RAY_LENGTH_FACTOR,
};
use crate::{Point2, Rectangle, RemovalError, Segment};

/// A two dimensional [Delaunay triangulation](https://en.wikipedia.org/wiki/Delaunay_triangulation)
/// of a dynamic point set.
///
/// A Delaunay triangulation fulfills the *Delaunay Property*: No vertex of the triangulation
/// lies strictly inside the [circumcircle](https://en.wikipedia.org/wiki/Circumscribed_circle)
/// of any triangle. Vertices can be inserted and (unless they lie on the convex hull) removed
/// at any time.
///
/// The unbounded region outside of the convex hull is covered by *ghost faces*, one for each
/// hull edge. Point location therefore always yields a face, either a triangle containing the
/// point or the ghost face of the hull edge that separates the point from the triangulation.
///
/// All geometric predicates use the fixed tolerance [EPS](crate::EPS). Points closer than
/// that to an existing vertex are considered duplicates and ignored.
///
/// # Basic Usage
/// ```
/// use dyntri::{DelaunayTriangulation, Point2};
///
/// let mut triangulation = DelaunayTriangulation::new();
///
/// // Insert three vertices that span one triangle
/// triangulation.insert(Point2::new(0.0, 1.0));
/// triangulation.insert(Point2::new(1.0, 1.0));
/// triangulation.insert(Point2::new(0.5, -1.0));
///
/// assert_eq!(triangulation.num_vertices(), 3);
/// assert_eq!(triangulation.triangles().count(), 1);
/// assert_eq!(triangulation.segments().len(), 3);
///
/// // An inner vertex can be removed again
/// triangulation.insert(Point2::new(0.5, 0.5));
/// assert_eq!(triangulation.triangles().count(), 3);
/// triangulation.remove(Point2::new(0.5, 0.5)).unwrap();
/// assert_eq!(triangulation.triangles().count(), 1);
/// ```
///
/// # Collinear vertices
/// As long as all vertices lie on a single line, the triangulation contains no triangles, only
/// a chain of ghost faces along the line. The first vertex off the line turns the chain into
/// triangles. Use [all_vertices_on_line](DelaunayTriangulation::all_vertices_on_line) to check
/// for this state.
///
/// # Speeding up point location
/// Point location walks through the triangulation, starting from the most recently created
/// face. For larger triangulations, a [GridIndex] with better starting faces can be attached
/// with [build_index](DelaunayTriangulation::build_index). The index is kept up to date
/// automatically. It never changes the result of a query.
///
/// ```
/// use dyntri::{DelaunayTriangulation, Point2};
///
/// let points = (0..100).map(|i| {
///     let angle = i as f64 * 0.1;
///     Point2::new(angle.cos() * i as f64, angle.sin() * i as f64)
/// });
/// let mut triangulation: DelaunayTriangulation = points.collect();
/// triangulation.build_default_index();
/// assert!(triangulation.has_index());
///
/// let nearest = triangulation.nearest_neighbor(Point2::new(0.1, 0.1));
/// assert_eq!(nearest, Some(Point2::new(0.0, 0.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DelaunayTriangulation {
    mesh: Mesh,
    vertices: VertexSet,
    // Default start of a location walk, None for less than two vertices
    anchor: Option<FixedFaceHandle>,
    // Some while all (at least two) vertices lie on one line
    chain: Option<CollinearChain>,
    bounding_box: Option<Rectangle>,
    index: Option<GridIndex>,
}

impl DelaunayTriangulation {
    /// Creates an empty triangulation.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a triangulation by inserting all points in the given order.
    ///
    /// Duplicate points are ignored.
    pub fn from_points(points: impl IntoIterator<Item = Point2<f64>>) -> Self {
        let mut result = Self::new();
        result.extend(points);
        result
    }

    /// Removes all vertices. An attached index is removed as well.
    pub fn clear(&mut self) {
        self.mesh.clear();
        self.vertices.clear();
        self.anchor = None;
        self.chain = None;
        self.bounding_box = None;
        self.index = None;
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Iterates over all vertices in no particular order.
    pub fn vertices(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.vertices.iter()
    }

    /// Returns `true` if `point` is a vertex, up to [EPS](crate::EPS).
    pub fn contains_vertex(&self, point: Point2<f64>) -> bool {
        self.vertices.contains(point)
    }

    /// Returns `true` if the triangulation contains no triangle.
    ///
    /// This is the case while all vertices lie on one line.
    pub fn all_vertices_on_line(&self) -> bool {
        self.anchor.is_none() || self.chain.is_some()
    }

    /// The smallest rectangle containing all vertices. `None` if the triangulation is empty.
    pub fn bounding_box(&self) -> Option<Rectangle> {
        self.bounding_box
    }

    /// Returns a face for a fixed handle, or `None` if the face has been removed.
    pub fn face(&self, handle: FixedFaceHandle) -> Option<FaceHandle<'_>> {
        self.mesh.get(handle).map(|_| FaceHandle::new(&self.mesh, handle))
    }

    /// Inserts a point.
    ///
    /// Inserting a point equal to an existing vertex (see [EPS](crate::EPS)) does nothing.
    /// Points with non finite coordinates are ignored.
    pub fn insert(&mut self, point: Point2<f64>) {
        if !point.is_finite() {
            tracing::warn!("Ignoring point ({}, {}) with non finite coordinates", point.x, point.y);
            return;
        }
        if !self.vertices.insert(point) {
            return;
        }

        self.bounding_box = Some(match self.bounding_box {
            Some(mut bounding_box) => {
                bounding_box.add_point(point);
                bounding_box
            }
            None => Rectangle::from_point(point),
        });

        let start = match self.insert_into_mesh(point) {
            Some(start) => start,
            None => return,
        };

        let mut changed = Vec::new();
        let flips = mesh_operations::legalize_fan(&mut self.mesh, start, &mut changed);
        tracing::trace!(flips, "Inserted vertex ({}, {})", point.x, point.y);

        if let (Some(index), Some(anchor)) = (self.index.as_mut(), self.anchor) {
            index.update(&self.mesh, anchor, &changed);
        }
    }

    // Returns a face incident to `point` if the flip restoration must run.
    fn insert_into_mesh(&mut self, point: Point2<f64>) -> Option<FixedFaceHandle> {
        if self.anchor.is_none() {
            if self.vertices.len() == 2 {
                let first = self.vertices.as_slice()[0];
                let chain = mesh_operations::create_slab(&mut self.mesh, first, point);
                self.anchor = Some(chain.first_face);
                self.chain = Some(chain);
            }
            return None;
        }

        let start = if let Some(chain) = self.chain.as_mut() {
            let start = match classify(point, chain.first_point, chain.last_point) {
                LineSideInfo::Left => {
                    let upper = self.mesh[chain.first_face].ab();
                    mesh_operations::extend_outside(&mut self.mesh, upper, point)
                }
                LineSideInfo::Right => {
                    mesh_operations::extend_outside(&mut self.mesh, chain.first_face, point)
                }
                side => {
                    mesh_operations::insert_collinear(&mut self.mesh, chain, point, side);
                    return None;
                }
            };
            self.chain = None;
            start
        } else {
            let walk_start = self.walk_start(point)?;
            let located = self.mesh.walk(point, walk_start);
            if self.mesh[located].ghost {
                mesh_operations::extend_outside(&mut self.mesh, located, point)
            } else {
                mesh_operations::extend_inside(&mut self.mesh, located, point)
            }
        };
        self.anchor = Some(start);
        Some(start)
    }

    /// Removes a vertex.
    ///
    /// The hole is re-triangulated. Vertices on the convex hull cannot be removed, this also
    /// applies to all vertices while they lie on one line. A failed removal does not change
    /// the triangulation.
    pub fn remove(&mut self, point: Point2<f64>) -> Result<(), RemovalError> {
        let vertex = self.vertices.find(point).ok_or(RemovalError::NotAVertex {
            x: point.x,
            y: point.y,
        })?;
        let hull_error = RemovalError::OnConvexHull {
            x: vertex.x,
            y: vertex.y,
        };

        if self.all_vertices_on_line() {
            tracing::warn!("Cannot remove ({}, {}): all vertices lie on one line", vertex.x, vertex.y);
            return Err(hull_error);
        }

        let start = self.vertex_face(vertex);
        if removal::is_on_hull(&self.mesh, vertex, start) {
            tracing::warn!("Cannot remove ({}, {}): vertex lies on the convex hull", vertex.x, vertex.y);
            return Err(hull_error);
        }

        let result = removal::remove_inner_vertex(&mut self.mesh, vertex, start);
        if let Some(anchor) = self.anchor {
            if result.removed_faces.contains(&anchor) {
                self.anchor = result.added_faces.first().copied();
            }
        }
        self.vertices.remove(vertex);

        if let (Some(index), Some(anchor)) = (self.index.as_mut(), self.anchor) {
            index.update(&self.mesh, anchor, &result.added_faces);
        }
        Ok(())
    }

    // A face with corner `vertex`. Ghost faces are only returned if no real face exists.
    fn vertex_face(&self, vertex: Point2<f64>) -> FixedFaceHandle {
        let located = self
            .locate_fixed(vertex)
            .expect("Locating a vertex failed. This is a bug.");
        let face = &self.mesh[located];
        if face.is_corner(vertex) {
            return located;
        }

        face.neighbors()
            .iter()
            .flatten()
            .copied()
            .find(|neighbor| self.mesh[*neighbor].is_corner(vertex))
            .or_else(|| {
                self.mesh
                    .iter()
                    .find(|(_, face)| face.is_corner(vertex))
                    .map(|(handle, _)| handle)
            })
            .expect("Vertex is not part of any face. This is a bug.")
    }

    fn walk_start(&self, point: Point2<f64>) -> Option<FixedFaceHandle> {
        let anchor = self.anchor?;
        Some(
            self.index
                .as_ref()
                .map(|index| index.find_cell_face(point))
                .filter(|handle| self.mesh.contains(*handle))
                .unwrap_or(anchor),
        )
    }

    fn locate_fixed(&self, point: Point2<f64>) -> Option<FixedFaceHandle> {
        if self.chain.is_some() {
            return self.locate_on_line(point);
        }
        let start = self.walk_start(point)?;
        Some(self.mesh.walk(point, start))
    }

    // Picks the ghost face closest to `point`, preferring faces whose edge sees the point.
    fn locate_on_line(&self, point: Point2<f64>) -> Option<FixedFaceHandle> {
        self.mesh
            .iter()
            .filter(|(_, face)| face.ghost)
            .map(|(handle, face)| {
                let hidden = !classify(point, face.a, face.b).is_left_or_on_segment();
                let distance = crate::delaunay_core::math::distance_2_to_segment(
                    face.a, face.b, point,
                );
                (handle, hidden, distance)
            })
            .min_by(|(_, hidden1, d1), (_, hidden2, d2)| {
                hidden1.cmp(hidden2).then(d1.total_cmp(d2))
            })
            .map(|(handle, _, _)| handle)
    }

    /// Locates the face containing `point`.
    ///
    /// Returns a triangle containing the point (points on edges or corners count as
    /// contained) or the ghost face of a hull edge separating the point from the
    /// triangulation. While all vertices lie on one line, the ghost face of the closest
    /// chain edge is returned.
    ///
    /// Returns `None` if the triangulation has less than two vertices.
    pub fn locate(&self, point: Point2<f64>) -> Option<FaceHandle<'_>> {
        self.locate_fixed(point)
            .map(|handle| FaceHandle::new(&self.mesh, handle))
    }

    /// Returns the vertex closest to `point`.
    ///
    /// Returns `None` if the triangulation is empty.
    pub fn nearest_neighbor(&self, point: Point2<f64>) -> Option<Point2<f64>> {
        if self.num_vertices() == 1 {
            return self.vertices().next();
        }

        let located = self.locate_fixed(point)?;
        let mut current = self.mesh[located]
            .corners()
            .into_iter()
            .min_by(|p1, p2| p1.distance_2(point).total_cmp(&p2.distance_2(point)))?;
        let mut current_face = located;
        let mut current_distance = current.distance_2(point);

        // Greedy walk along vertex neighbors. Exact on Delaunay triangulations.
        while let Some((next, next_face, next_distance)) = self
            .mesh
            .fan(current, current_face)
            .into_iter()
            .flat_map(|handle| {
                self.mesh[handle]
                    .corners()
                    .into_iter()
                    .map(move |corner| (corner, handle))
            })
            .map(|(corner, handle)| (corner, handle, corner.distance_2(point)))
            .find(|(_, _, distance)| *distance < current_distance)
        {
            current = next;
            current_face = next_face;
            current_distance = next_distance;
        }
        Some(current)
    }

    /// Returns the Voronoi cell of a vertex.
    ///
    /// For an inner vertex the result is the closed cell polygon in counterclockwise order,
    /// given by the circumcenters of the triangles around the vertex. The cell of a vertex on
    /// the convex hull is unbounded, the result then consists of two points: the circumcenter
    /// of the triangle at the hull edge starting at the vertex, and a far point on the edge's
    /// outward perpendicular.
    ///
    /// Returns `None` if `point` is not a vertex or all vertices lie on one line.
    pub fn voronoi_cell(&self, point: Point2<f64>) -> Option<Vec<Point2<f64>>> {
        if self.all_vertices_on_line() {
            return None;
        }
        let vertex = self.vertices.find(point)?;
        let mut fan = self.mesh.fan(vertex, self.vertex_face(vertex));

        let hull_ghost = fan.iter().copied().find(|handle| {
            let face = &self.mesh[*handle];
            face.ghost && face.a.approx_eq(vertex)
        });
        if let Some(ghost) = hull_ghost {
            let ghost = &self.mesh[ghost];
            let center = self.mesh[ghost.ab()].circumcircle().center();
            let direction = ghost.b.sub(ghost.a);
            let outward = Point2::new(-direction.y, direction.x).normalized();
            let extent = self
                .bounding_box
                .map(|bounding_box| bounding_box.width() + bounding_box.height())
                .unwrap_or_default()
                .max(1.0);
            let far = center.add(outward.mul(VORONOI_RAY_LENGTH_FACTOR * extent));
            return Some(vec![center, far]);
        }

        let first = fan
            .iter()
            .enumerate()
            .min_by_key(|(_, handle)| **handle)
            .map(|(position, _)| position)?;
        fan.rotate_left(first);
        Some(
            fan.iter()
                .map(|handle| self.mesh[*handle].circumcircle().center())
                .collect(),
        )
    }

    /// Collects all faces, ghost faces included, by a breadth first search from the anchor.
    fn collect_faces(&self) -> Vec<FixedFaceHandle> {
        let anchor = match self.anchor {
            Some(anchor) => anchor,
            None => return Vec::new(),
        };

        let mut result = Vec::with_capacity(self.mesh.len());
        let mut visited = HashSet::with_capacity(self.mesh.len());
        let mut queue = VecDeque::new();
        visited.insert(anchor);
        queue.push_back(anchor);

        while let Some(handle) = queue.pop_front() {
            result.push(handle);
            for neighbor in self.mesh[handle].neighbors().iter().flatten() {
                if visited.insert(*neighbor) {
                    queue.push_back(*neighbor);
                }
            }
        }
        result
    }

    /// Iterates over all faces, including ghost faces, in breadth first order.
    pub fn faces(&self) -> impl Iterator<Item = FaceHandle<'_>> + '_ {
        self.collect_faces()
            .into_iter()
            .map(move |handle| FaceHandle::new(&self.mesh, handle))
    }

    /// Iterates over all triangles (real faces) in breadth first order.
    pub fn triangles(&self) -> impl Iterator<Item = FaceHandle<'_>> + '_ {
        self.faces().filter(|face| !face.is_ghost())
    }

    /// Returns all edges of the triangulation.
    ///
    /// While all vertices lie on one line, these are the edges between adjacent vertices.
    pub fn segments(&self) -> HashSet<Segment> {
        let mut result = HashSet::new();
        for face in self.faces() {
            let corners = face.corners();
            if face.is_ghost() {
                result.insert(Segment::new(corners[0], corners[1]));
            } else {
                result.insert(Segment::new(corners[0], corners[1]));
                result.insert(Segment::new(corners[1], corners[2]));
                result.insert(Segment::new(corners[2], corners[0]));
            }
        }
        result
    }

    /// Attaches a grid index with `x_cells * y_cells` cells covering the bounding box.
    ///
    /// Replaces any existing index. Ignored while all vertices lie on one line.
    pub fn build_index(&mut self, x_cells: usize, y_cells: usize) {
        let (anchor, region) = match (self.anchor, self.bounding_box) {
            (Some(anchor), Some(region)) if self.chain.is_none() => (anchor, region),
            _ => {
                tracing::debug!("Ignoring index request, the triangulation has no triangles");
                return;
            }
        };
        self.index = Some(GridIndex::new(&self.mesh, anchor, x_cells, y_cells, region));
        tracing::debug!(x_cells, y_cells, "Built grid index");
    }

    /// Attaches a grid index with `floor(sqrt(n)) + 1` cells along each axis.
    pub fn build_default_index(&mut self) {
        let cells = (self.num_vertices() as f64).sqrt() as usize + 1;
        self.build_index(cells, cells);
    }

    /// Detaches the grid index.
    pub fn remove_index(&mut self) {
        self.index = None;
    }

    /// Returns `true` if a grid index is attached.
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// The attached grid index, if any.
    pub fn index(&self) -> Option<&GridIndex> {
        self.index.as_ref()
    }
}

impl FromIterator<Point2<f64>> for DelaunayTriangulation {
    fn from_iter<T: IntoIterator<Item = Point2<f64>>>(iter: T) -> Self {
        Self::from_points(iter)
    }
}

impl Extend<Point2<f64>> for DelaunayTriangulation {
    fn extend<T: IntoIterator<Item = Point2<f64>>>(&mut self, iter: T) {
        for point in iter {
            self.insert(point);
        }
    }
}

/// A face of a [DelaunayTriangulation].
///
/// Either a triangle (a *real* face) or a *ghost face*, the unbounded region on the outer side
/// of a convex hull edge. This handle borrows the triangulation, use [FaceHandle::fix] to
/// obtain a handle that can be stored.
#[derive(Clone, Copy)]
pub struct FaceHandle<'a> {
    mesh: &'a Mesh,
    handle: FixedFaceHandle,
}

impl<'a> FaceHandle<'a> {
    fn new(mesh: &'a Mesh, handle: FixedFaceHandle) -> Self {
        FaceHandle { mesh, handle }
    }

    /// Converts this handle into a fixed handle.
    pub fn fix(&self) -> FixedFaceHandle {
        self.handle
    }

    /// Returns `true` for ghost faces.
    pub fn is_ghost(&self) -> bool {
        self.mesh[self.handle].ghost
    }

    /// The face's corners.
    ///
    /// Three corners in counterclockwise order for triangles. A ghost face returns the two
    /// end points of its hull edge, the outer side lies on the left of the directed edge
    /// from the first to the second point.
    pub fn corners(&self) -> SmallVec<[Point2<f64>; 3]> {
        self.mesh[self.handle].corners()
    }

    /// The circumcircle of a triangle, `None` for ghost faces.
    pub fn circumcircle(&self) -> Option<Circle> {
        let face = &self.mesh[self.handle];
        if face.ghost {
            None
        } else {
            Some(*face.circumcircle())
        }
    }

    /// The three adjacent faces.
    ///
    /// For a triangle `a, b, c` these are the faces across the edges `a-b`, `b-c` and
    /// `c-a`. For a ghost face with hull edge `a -> b`, the first entry is the triangle
    /// across the hull edge, followed by the ghost faces at `b` and at `a`.
    pub fn neighbors(&self) -> [FaceHandle<'a>; 3] {
        let face = &self.mesh[self.handle];
        [face.ab(), face.bc(), face.ca()].map(|handle| FaceHandle::new(self.mesh, handle))
    }

    /// Returns `true` if a triangle contains `point`. Points on the boundary count as
    /// contained, ghost faces contain nothing.
    pub fn contains_point(&self, point: Point2<f64>) -> bool {
        self.mesh[self.handle].contains_point(point)
    }

    /// Returns `true` if `point` lies on the boundary of a triangle.
    pub fn on_boundary(&self, point: Point2<f64>) -> bool {
        self.mesh[self.handle].on_boundary(point)
    }

    /// Returns `true` if `point` equals one of the corners, up to [EPS](crate::EPS).
    pub fn is_corner(&self, point: Point2<f64>) -> bool {
        self.mesh[self.handle].is_corner(point)
    }
}

impl std::fmt::Debug for FaceHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceHandle")
            .field("handle", &self.handle)
            .field("ghost", &self.is_ghost())
            .field("corners", &self.corners())
            .finish()
    }
}

impl PartialEq for FaceHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.mesh, other.mesh) && self.handle == other.handle
    }
}

impl Eq for FaceHandle<'_> {}

#[cfg(test)]
impl DelaunayTriangulation {
    /// Checks all invariants of the mesh. Panics if one is violated.
    pub(crate) fn sanity_check(&self) {
        let mut num_ghosts = 0;
        let mut num_triangles = 0;
        for (handle, face) in self.mesh.iter() {
            for neighbor in face.neighbors() {
                let neighbor = neighbor.expect("Missing neighbor");
                assert!(self.mesh.contains(neighbor), "Dangling neighbor");
                assert!(
                    self.mesh[neighbor].neighbors().contains(&Some(handle)),
                    "Asymmetric neighbor link"
                );
            }

            for corner in face.corners() {
                assert!(self.vertices.contains(corner));
            }

            if face.ghost {
                num_ghosts += 1;
                assert_eq!(self.mesh[face.bc()].ca(), handle);
                assert_eq!(self.mesh[face.ca()].bc(), handle);
                assert!(self.mesh[face.ab()].is_corner(face.a));
                assert!(self.mesh[face.ab()].is_corner(face.b));
                continue;
            }

            num_triangles += 1;
            assert!(
                face.b.sub(face.a).cross(face.c.sub(face.a)) > 0.0,
                "Face is not counterclockwise"
            );
            // Faces thinner than the tolerance are checked from their neighbors' side only
            let circle = face.circumcircle();
            if circle.is_degenerate() {
                continue;
            }
            for neighbor in face.neighbors().iter().flatten() {
                let neighbor = &self.mesh[*neighbor];
                if neighbor.ghost {
                    continue;
                }
                for corner in neighbor.corners() {
                    assert!(
                        !circle.contains(corner),
                        "Local Delaunay property violated"
                    );
                }
            }
        }

        assert_eq!(self.collect_faces().len(), self.mesh.len());
        if self.all_vertices_on_line() {
            assert_eq!(num_triangles, 0);
            if self.num_vertices() >= 2 {
                assert_eq!(num_ghosts, 2 * (self.num_vertices() - 1));
            }
        } else {
            assert_eq!(num_triangles, 2 * self.num_vertices() - 2 - num_ghosts);
            if let Some(anchor) = self.anchor {
                assert!(self.mesh.contains(anchor));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use rand::seq::SliceRandom;

    use super::DelaunayTriangulation;
    use crate::test_utilities::*;
    use crate::{classify, Point2, RemovalError, Segment};

    fn unit_square_with_center() -> DelaunayTriangulation {
        DelaunayTriangulation::from_points(square_with_center())
    }

    fn num_ghosts(d: &DelaunayTriangulation) -> usize {
        d.faces().filter(|face| face.is_ghost()).count()
    }

    fn sorted(mut points: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
        points.sort_by(|p1, p2| p1.approx_cmp(*p2));
        points
    }

    fn hull_vertices(d: &DelaunayTriangulation) -> Vec<Point2<f64>> {
        let mut result: Vec<_> = d
            .faces()
            .filter(|face| face.is_ghost())
            .map(|face| face.corners()[0])
            .collect();
        result = sorted(result);
        result.dedup();
        result
    }

    #[test]
    fn test_empty() {
        let d = DelaunayTriangulation::new();
        assert_eq!(d.num_vertices(), 0);
        assert_eq!(d.faces().count(), 0);
        assert!(d.segments().is_empty());
        assert!(d.all_vertices_on_line());
        assert!(d.locate(Point2::new(0.0, 0.0)).is_none());
        assert!(d.nearest_neighbor(Point2::new(0.0, 0.0)).is_none());
        assert!(d.bounding_box().is_none());
        assert_eq!(
            d.clone().remove(Point2::new(0.0, 0.0)),
            Err(RemovalError::NotAVertex { x: 0.0, y: 0.0 })
        );
    }

    #[test]
    fn test_single_vertex() {
        let mut d = DelaunayTriangulation::new();
        d.insert(Point2::new(1.0, 2.0));
        assert_eq!(d.num_vertices(), 1);
        assert_eq!(d.faces().count(), 0);
        assert!(d.locate(Point2::new(1.0, 2.0)).is_none());
        assert_eq!(
            d.nearest_neighbor(Point2::new(5.0, 5.0)),
            Some(Point2::new(1.0, 2.0))
        );
        assert!(d.contains_vertex(Point2::new(1.0, 2.0)));
        d.sanity_check();
    }

    #[test]
    fn test_two_vertices() {
        let mut d = DelaunayTriangulation::new();
        d.insert(Point2::new(1.0, 0.0));
        d.insert(Point2::new(0.0, 1.0));
        assert_eq!(d.faces().count(), 2);
        assert_eq!(d.triangles().count(), 0);
        assert_eq!(d.segments().len(), 1);
        assert!(d.locate(Point2::new(3.0, 3.0)).unwrap().is_ghost());
        assert_eq!(
            d.nearest_neighbor(Point2::new(0.9, -0.5)),
            Some(Point2::new(1.0, 0.0))
        );
        d.sanity_check();
    }

    #[test]
    fn test_single_triangle() {
        let d = DelaunayTriangulation::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        d.sanity_check();
        assert!(!d.all_vertices_on_line());

        let triangles: Vec<_> = d.triangles().collect();
        assert_eq!(triangles.len(), 1);
        let corners = triangles[0].corners();
        assert!(classify(corners[2], corners[0], corners[1]).is_on_left_side());
        assert_eq!(num_ghosts(&d), 3);
        assert_eq!(d.segments().len(), 3);

        for neighbor in triangles[0].neighbors() {
            assert!(neighbor.is_ghost());
            assert_eq!(neighbor.neighbors()[0], triangles[0]);
        }
    }

    #[test]
    fn test_square_with_center() {
        let mut d = unit_square_with_center();
        d.sanity_check();
        let center = Point2::new(0.5, 0.5);

        let triangles: Vec<_> = d.triangles().collect();
        assert_eq!(triangles.len(), 4);
        for triangle in &triangles {
            assert!(triangle.is_corner(center));
        }

        let hull_before = hull_vertices(&d);
        d.remove(center).unwrap();
        d.sanity_check();
        assert_eq!(d.triangles().count(), 2);
        assert_eq!(d.num_vertices(), 4);
        assert!(!d.contains_vertex(center));
        assert_eq!(hull_vertices(&d), hull_before);
        assert_eq!(d.segments().len(), 5);
    }

    #[test]
    fn test_collinear_points() {
        let mut d = DelaunayTriangulation::new();
        for point in line_points(Point2::new(1.0, 0.0)) {
            d.insert(point);
            d.sanity_check();
        }

        assert!(d.all_vertices_on_line());
        assert_eq!(d.triangles().count(), 0);

        let expected: hashbrown::HashSet<_> = (0..4)
            .map(|x| Segment::new(Point2::new(x as f64, 0.0), Point2::new(x as f64 + 1.0, 0.0)))
            .collect();
        assert_eq!(d.segments(), expected);

        let located = d.locate(Point2::new(2.5, 1.0)).unwrap();
        assert!(located.is_ghost());
        assert!(located.is_corner(Point2::new(2.0, 0.0)));
        assert!(located.is_corner(Point2::new(3.0, 0.0)));

        assert_eq!(
            d.nearest_neighbor(Point2::new(3.4, -2.0)),
            Some(Point2::new(3.0, 0.0))
        );
        assert_eq!(
            d.nearest_neighbor(Point2::new(-7.0, 0.0)),
            Some(Point2::new(0.0, 0.0))
        );
        assert!(d.voronoi_cell(Point2::new(1.0, 0.0)).is_none());
        assert_eq!(
            d.remove(Point2::new(1.0, 0.0)),
            Err(RemovalError::OnConvexHull { x: 1.0, y: 0.0 })
        );
    }

    #[test]
    fn test_leaving_the_line() {
        let mut d = DelaunayTriangulation::from_points(line_points(Point2::new(1.0, 1.0)));
        d.insert(Point2::new(0.0, 3.0));
        d.sanity_check();
        assert_eq!(d.triangles().count(), 4);
        assert_eq!(num_ghosts(&d), 6);

        // All of the line becomes inner edges
        d.insert(Point2::new(5.0, -1.0));
        d.sanity_check();
        assert_eq!(num_ghosts(&d), 4);
        assert_eq!(d.triangles().count(), 8);
    }

    #[test]
    fn test_extend_hull_along_edge_line() {
        let mut d = DelaunayTriangulation::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        let before: Vec<_> = d.triangles().map(|face| face.corners()).collect();

        d.insert(Point2::new(2.0, 0.0));
        d.sanity_check();
        assert_eq!(d.triangles().count(), 2);
        assert_eq!(num_ghosts(&d), 4);

        // The old triangle is untouched, no flip happened
        let after: Vec<_> = d.triangles().map(|face| face.corners()).collect();
        assert!(after.contains(&before[0]));
    }

    #[test]
    fn test_insert_just_past_hull_vertex() {
        let mut d = DelaunayTriangulation::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 0.5),
        ]);
        // Closer than the tolerance to both hull edge lines meeting at (1, 0)
        let p = Point2::new(1.0 + 1.5e-8, 0.0);
        d.insert(p);
        d.sanity_check();
        assert_eq!(d.num_vertices(), 4);
        assert_eq!(d.triangles().count(), 2);
        assert_eq!(num_ghosts(&d), 4);
        for triangle in d.triangles() {
            assert!(!(triangle.is_corner(Point2::new(0.0, 0.0)) && triangle.is_corner(p)));
        }
        assert!(d.locate(Point2::new(1.5, 0.0)).unwrap().is_ghost());
    }

    #[test]
    fn test_insert_on_hull_edge() {
        let mut d = DelaunayTriangulation::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 2.0),
        ]);
        d.insert(Point2::new(1.0, 0.0));
        d.sanity_check();
        assert_eq!(d.triangles().count(), 2);
        assert_eq!(num_ghosts(&d), 4);
        for triangle in d.triangles() {
            let circle = triangle.circumcircle().unwrap();
            assert!(!circle.is_degenerate());
        }
    }

    #[test]
    fn test_insert_on_inner_edge() {
        let mut d = DelaunayTriangulation::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        d.insert(Point2::new(1.0, 1.0));
        d.sanity_check();
        assert_eq!(d.triangles().count(), 4);
        for triangle in d.triangles() {
            assert!(!triangle.circumcircle().unwrap().is_degenerate());
        }
    }

    #[test]
    fn test_remove_hull_vertex_fails() {
        let mut d = unit_square_with_center();
        let segments = d.segments();
        let corner = Point2::new(1.0, 1.0);
        assert_eq!(
            d.remove(corner),
            Err(RemovalError::OnConvexHull { x: 1.0, y: 1.0 })
        );
        assert!(d.contains_vertex(corner));
        assert_eq!(d.segments(), segments);
        assert_eq!(
            d.remove(Point2::new(0.25, 0.5)),
            Err(RemovalError::NotAVertex { x: 0.25, y: 0.5 })
        );
        d.sanity_check();
    }

    #[test]
    fn test_duplicate_insert_is_ignored() {
        let points = random_points(1.0, 200, VERTEX_SEED);
        let mut d = DelaunayTriangulation::from_points(points.clone());
        let vertices = sorted(d.vertices().collect());
        let segments = d.segments();
        let num_triangles = d.triangles().count();

        for point in points.iter().take(50) {
            d.insert(*point);
            d.insert(Point2::new(point.x + 1e-9, point.y - 1e-9));
        }
        assert_eq!(sorted(d.vertices().collect()), vertices);
        assert_eq!(d.segments(), segments);
        assert_eq!(d.triangles().count(), num_triangles);

        d.insert(Point2::new(f64::NAN, 0.0));
        d.insert(Point2::new(0.0, f64::INFINITY));
        assert_eq!(d.num_vertices(), 200);
    }

    #[test]
    fn test_insert_many_points() {
        let points = random_points(1.0, 2000, VERTEX_SEED);
        let d = DelaunayTriangulation::from_points(points);
        assert_eq!(d.num_vertices(), 2000);
        d.sanity_check();
    }

    #[test]
    fn test_delaunay_property() {
        let points = random_points(10.0, 150, QUERY_SEED);
        let d: DelaunayTriangulation = points.iter().copied().collect();
        for triangle in d.triangles() {
            let circle = triangle.circumcircle().unwrap();
            for vertex in &points {
                if !triangle.is_corner(*vertex) {
                    assert!(!circle.contains(*vertex));
                }
            }
        }
    }

    #[test]
    fn test_insert_points_on_grid() {
        let points = grid_points(10, 10);
        let d = DelaunayTriangulation::from_points(points.clone());
        d.sanity_check();
        assert_eq!(num_ghosts(&d), 36);
        assert_eq!(d.triangles().count(), 162);

        let d = DelaunayTriangulation::from_points(shuffled(points, VERTEX_SEED));
        d.sanity_check();
        assert_eq!(d.triangles().count(), 162);
    }

    #[test]
    fn test_insert_outside_convex_hull() {
        let mut d = DelaunayTriangulation::new();
        for point in circle_points(100) {
            d.insert(point);
        }
        d.sanity_check();
        assert_eq!(num_ghosts(&d), d.num_vertices());
    }

    #[test]
    fn test_remove_inner_vertices() {
        let points = random_points(1.0, 300, VERTEX_SEED);
        let mut d = DelaunayTriangulation::from_points(points.clone());
        let hull = hull_vertices(&d);

        for (i, point) in points.iter().enumerate() {
            let result = d.remove(*point);
            if hull.contains(point) {
                assert_eq!(
                    result,
                    Err(RemovalError::OnConvexHull {
                        x: point.x,
                        y: point.y
                    })
                );
            } else {
                assert_eq!(result, Ok(()));
            }
            if i % 20 == 0 {
                d.sanity_check();
            }
        }

        d.sanity_check();
        assert_eq!(d.num_vertices(), hull.len());
        assert_eq!(d.triangles().count(), hull.len() - 2);
        assert_eq!(hull_vertices(&d), hull);
    }

    #[test]
    fn test_insert_remove_inverse() {
        let points = random_points(1.0, 100, VERTEX_SEED);
        let mut d = DelaunayTriangulation::from_points(points);
        let vertices = sorted(d.vertices().collect());

        for point in random_points(0.5, 20, QUERY_SEED) {
            d.insert(point);
            d.sanity_check();
            d.remove(point).unwrap();
            d.sanity_check();
            assert_eq!(sorted(d.vertices().collect()), vertices);
        }
    }

    #[test]
    fn test_removal_and_insertion() {
        let points = random_points(1.0, 500, VERTEX_SEED);
        let mut d = DelaunayTriangulation::from_points(points.clone());
        d.build_default_index();

        let mut choices = rng(QUERY_SEED);
        for _ in 0..1000 {
            let point = *points.choose(&mut choices).unwrap();
            if d.contains_vertex(point) {
                let _ = d.remove(point);
            } else {
                d.insert(point);
            }
        }
        d.sanity_check();
    }

    #[test]
    fn test_locate_vertices() {
        let points = random_points(1.0, 500, VERTEX_SEED);
        let d = DelaunayTriangulation::from_points(points.clone());
        for point in points {
            let face = d.locate(point).unwrap();
            assert!(face.is_corner(point));
        }

        for point in [
            Point2::new(5.0, 0.0),
            Point2::new(-3.0, 4.0),
            Point2::new(0.0, -2.0),
        ] {
            let face = d.locate(point).unwrap();
            assert!(face.is_ghost());
            let corners = face.corners();
            assert!(classify(point, corners[0], corners[1]).is_on_left_side());
        }
    }

    #[test]
    fn test_locate_inner_points() {
        let points = random_points(1.0, 500, VERTEX_SEED);
        let d = DelaunayTriangulation::from_points(points);
        for point in random_points(0.9, 200, QUERY_SEED) {
            let face = d.locate(point).unwrap();
            if !face.is_ghost() {
                assert!(face.contains_point(point));
            }
        }
    }

    #[test]
    fn test_nearest_neighbor() {
        let points = random_points(1.0, 400, VERTEX_SEED);
        let d = DelaunayTriangulation::from_points(points.clone());

        for query in random_points(1.5, 300, QUERY_SEED) {
            let expected = points
                .iter()
                .copied()
                .min_by(|p1, p2| p1.distance_2(query).total_cmp(&p2.distance_2(query)))
                .unwrap();
            assert_eq!(d.nearest_neighbor(query), Some(expected));
        }
    }

    #[test]
    fn test_index_does_not_change_results() {
        let points = random_points(1.0, 600, VERTEX_SEED);
        let mut with_index = DelaunayTriangulation::from_points(points.clone());
        with_index.build_index(7, 13);
        assert!(with_index.has_index());

        // Mutate while the index is attached
        for point in random_points(2.0, 100, QUERY_SEED) {
            with_index.insert(point);
        }
        for point in points.iter().take(100) {
            let _ = with_index.remove(*point);
        }
        with_index.sanity_check();

        let mut without_index = with_index.clone();
        without_index.remove_index();
        assert!(!without_index.has_index());

        for query in random_points(2.5, 300, QUERY_SEED + 1) {
            assert_eq!(
                with_index.nearest_neighbor(query),
                without_index.nearest_neighbor(query)
            );

            let located = without_index.locate(query).unwrap();
            if !located.is_ghost() && !located.on_boundary(query) {
                assert_eq!(with_index.locate(query).unwrap().fix(), located.fix());
            }
        }

        for vertex in with_index.vertices() {
            assert_eq!(
                with_index.voronoi_cell(vertex),
                without_index.voronoi_cell(vertex)
            );
        }
    }

    #[test]
    fn test_index_grows_with_triangulation() {
        let mut d = unit_square_with_center();
        d.build_index(4, 4);
        let index = d.index().unwrap();
        assert_eq!((index.x_cells(), index.y_cells()), (4, 4));
        assert_relative_eq!(index.cell_size().0, 0.25);

        d.insert(Point2::new(3.0, -1.0));
        d.sanity_check();
        let index = d.index().unwrap();
        assert!(index.region().contains_point(Point2::new(3.0, -1.0)));
        assert_eq!((index.x_cells(), index.y_cells()), (4, 4));
        assert_relative_eq!(index.cell_size().0, 0.75);
        assert_relative_eq!(index.cell_size().1, 0.5);
    }

    #[test]
    fn test_build_index_requires_triangles() {
        let mut d = DelaunayTriangulation::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
        ]);
        d.build_default_index();
        assert!(!d.has_index());

        d.insert(Point2::new(1.0, 0.0));
        d.build_default_index();
        assert!(d.has_index());
        assert_eq!(d.index().unwrap().x_cells(), 2);
    }

    #[test]
    fn test_voronoi_cell_of_inner_vertex() {
        let d = unit_square_with_center();
        let cell = d.voronoi_cell(Point2::new(0.5, 0.5)).unwrap();
        assert_eq!(cell.len(), 4);

        let expected = [
            Point2::new(0.5, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(0.5, 1.0),
            Point2::new(0.0, 0.5),
        ];
        for point in expected {
            assert!(cell.iter().any(|p| p.approx_eq(point)));
        }

        // Counterclockwise: positive signed area
        let area: f64 = (0..cell.len())
            .map(|i| cell[i].cross(cell[(i + 1) % cell.len()]))
            .sum();
        assert!(area > 0.0);
    }

    #[test]
    fn test_voronoi_cell_of_hull_vertex() {
        let d = DelaunayTriangulation::from_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        let cell = d.voronoi_cell(Point2::new(0.0, 0.0)).unwrap();
        assert_eq!(cell.len(), 2);
        assert_relative_eq!(cell[0].x, 0.5);
        assert_relative_eq!(cell[0].y, 0.5);
        // Hull edge (0, 0) -> (0, 1), the cell extends to the left
        assert_relative_eq!(cell[1].x, -3.5);
        assert_relative_eq!(cell[1].y, 0.5);

        assert!(d.voronoi_cell(Point2::new(0.3, 0.3)).is_none());
    }

    #[test]
    fn test_faces_are_reachable() {
        let points = random_points(1.0, 100, VERTEX_SEED);
        let d = DelaunayTriangulation::from_points(points);
        let faces: Vec<_> = d.faces().collect();
        for face in &faces {
            assert_eq!(d.face(face.fix()), Some(*face));
        }
        assert_eq!(
            faces.iter().filter(|face| !face.is_ghost()).count(),
            d.triangles().count()
        );
    }

    #[test]
    fn test_clear() {
        let mut d = unit_square_with_center();
        d.build_default_index();
        d.clear();
        assert_eq!(d.num_vertices(), 0);
        assert_eq!(d.faces().count(), 0);
        assert!(!d.has_index());
        assert!(d.bounding_box().is_none());

        d.extend(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        assert_eq!(d.triangles().count(), 1);
        d.sanity_check();
    }

    #[test]
    fn test_bounding_box() {
        let d = unit_square_with_center();
        let bounding_box = d.bounding_box().unwrap();
        assert_eq!(bounding_box.lower(), Point2::new(0.0, 0.0));
        assert_eq!(bounding_box.upper(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_extend() {
        let mut d: DelaunayTriangulation = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]
            .into_iter()
            .collect();
        d.extend(vec![Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)]);
        assert_eq!(d.num_vertices(), 4);
        assert_eq!(d.triangles().count(), 2);
        d.sanity_check();
    }
}
