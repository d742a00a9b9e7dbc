use std::cmp::Ordering;

use crate::{LineSideInfo, Point2};

/// The tolerance used by every geometric predicate of this crate.
///
/// Two coordinates are considered equal if they differ by at most `EPS`. Orientation tests
/// treat a cross product within `EPS` of zero as "on the line". This is a fixed absolute
/// tolerance, inputs should therefore be scaled to a reasonable range (roughly `1e-3` to
/// `1e6`).
pub const EPS: f64 = 1e-8;

/// The far point of an unbounded Voronoi cell is placed this many times the bounding box's
/// half perimeter away from the cell's finite vertex.
pub const VORONOI_RAY_LENGTH_FACTOR: f64 = 2.0;

#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

#[inline]
pub fn approx_less(a: f64, b: f64) -> bool {
    !approx_equal(a, b) && a < b
}

#[inline]
pub fn approx_greater(a: f64, b: f64) -> bool {
    !approx_equal(a, b) && a > b
}

pub fn approx_cmp_f64(a: f64, b: f64) -> Ordering {
    if approx_equal(a, b) {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Classifies `point` relative to the directed edge `from -> to`.
///
/// This is the only orientation predicate used by the triangulation. The signed cross
/// product is compared against zero with [EPS] tolerance; points on the line are further
/// classified by their projection along the edge's dominant axis.
///
/// # Example
/// ```
/// use dyntri::{classify, LineSideInfo, Point2};
///
/// let from = Point2::new(0.0, 0.0);
/// let to = Point2::new(2.0, 0.0);
/// assert_eq!(classify(Point2::new(1.0, 1.0), from, to), LineSideInfo::Left);
/// assert_eq!(classify(Point2::new(1.0, -1.0), from, to), LineSideInfo::Right);
/// assert_eq!(classify(Point2::new(1.0, 0.0), from, to), LineSideInfo::OnSegment);
/// assert_eq!(classify(Point2::new(-1.0, 0.0), from, to), LineSideInfo::BeforeStart);
/// assert_eq!(classify(Point2::new(3.0, 0.0), from, to), LineSideInfo::AfterEnd);
/// ```
pub fn classify(point: Point2<f64>, from: Point2<f64>, to: Point2<f64>) -> LineSideInfo {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let res = dy * (point.x - from.x) - dx * (point.y - from.y);

    if approx_less(res, 0.0) {
        return LineSideInfo::Left;
    }
    if approx_greater(res, 0.0) {
        return LineSideInfo::Right;
    }

    if approx_greater(dx, 0.0) {
        project_on_axis(point.x, from.x, to.x)
    } else if approx_less(dx, 0.0) {
        project_on_axis(-point.x, -from.x, -to.x)
    } else if approx_greater(dy, 0.0) {
        project_on_axis(point.y, from.y, to.y)
    } else if approx_less(dy, 0.0) {
        project_on_axis(-point.y, -from.y, -to.y)
    } else {
        debug_assert!(false, "Cannot classify a point against a zero length edge");
        LineSideInfo::OnSegment
    }
}

// Expects `from < to`.
fn project_on_axis(point: f64, from: f64, to: f64) -> LineSideInfo {
    if approx_less(point, from) {
        LineSideInfo::BeforeStart
    } else if approx_less(to, point) {
        LineSideInfo::AfterEnd
    } else {
        LineSideInfo::OnSegment
    }
}

/// Returns `true` if `p1, p2, p3` form a counterclockwise (or degenerate) turn.
pub fn is_convex(p1: Point2<f64>, p2: Point2<f64>, p3: Point2<f64>) -> bool {
    let det = p1.x * (p2.y - p3.y) - p1.y * (p2.x - p3.x) + (p2.x * p3.y - p2.y * p3.x);
    det >= 0.0
}

/// A circle given by its center and squared radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point2<f64>,
    radius_2: f64,
}

impl Circle {
    /// Creates a new circle.
    pub fn new(center: Point2<f64>, radius_2: f64) -> Self {
        Circle { center, radius_2 }
    }

    /// Computes the circumcircle of a triangle.
    ///
    /// If the three points are (nearly) collinear, a circle with infinite radius centered at
    /// `a` is returned. Every finite point is contained in such a circle.
    pub fn circumcircle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Self {
        let u = ((a.x - b.x) * (a.x + b.x) + (a.y - b.y) * (a.y + b.y)) / 2.0;
        let v = ((b.x - c.x) * (b.x + c.x) + (b.y - c.y) * (b.y + c.y)) / 2.0;
        let den = (a.x - b.x) * (b.y - c.y) - (b.x - c.x) * (a.y - b.y);

        if den.abs() < EPS {
            return Circle::new(a, f64::INFINITY);
        }

        let center = Point2::new(
            (u * (b.y - c.y) - v * (a.y - b.y)) / den,
            (v * (a.x - b.x) - u * (b.x - c.x)) / den,
        );
        Circle::new(center, center.distance_2(a))
    }

    /// The circle's center.
    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    /// The circle's squared radius. May be infinite for degenerate triangles.
    pub fn radius_2(&self) -> f64 {
        self.radius_2
    }

    /// Returns `true` if the circle has infinite radius.
    pub fn is_degenerate(&self) -> bool {
        self.radius_2.is_infinite()
    }

    /// Returns `true` if `point` lies inside the circle by more than [EPS].
    ///
    /// The tolerance is applied to squared distances and scales with radii larger than one.
    /// Points on or near the circle are not contained. A degenerate circle contains every
    /// point.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        if self.is_degenerate() {
            return true;
        }
        self.radius_2 - self.center.distance_2(point) > EPS * self.radius_2.max(1.0)
    }
}

/// Returns the squared distance between `query_point` and the segment `p1 - p2`.
pub fn distance_2_to_segment(p1: Point2<f64>, p2: Point2<f64>, query_point: Point2<f64>) -> f64 {
    let dir = p2.sub(p1);
    let length_2 = dir.length2();
    if length_2 == 0.0 {
        return query_point.distance_2(p1);
    }
    let factor = (query_point.sub(p1).dot(dir) / length_2).clamp(0.0, 1.0);
    query_point.distance_2(p1.add(dir.mul(factor)))
}
