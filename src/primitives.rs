//! Segments and axis aligned rectangles.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Point2;

/// An undirected line segment.
///
/// The end points are stored in canonical order: `first` is lexicographically smaller than
/// `second` (see [Point2::approx_cmp]). Two segments created from the same end points in
/// different order are therefore identical.
///
/// Equality and hashing are exact on the stored coordinates. Segments returned from a
/// triangulation always copy the triangulation's vertex positions, so exact comparison is
/// sufficient to deduplicate them.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Segment {
    first: Point2<f64>,
    second: Point2<f64>,
}

impl Segment {
    /// Creates a new segment from two end points in any order.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> Self {
        if p1.approx_cmp(p2) == Ordering::Greater {
            Segment {
                first: p2,
                second: p1,
            }
        } else {
            Segment {
                first: p1,
                second: p2,
            }
        }
    }

    /// The lexicographically smaller end point.
    pub fn first(&self) -> Point2<f64> {
        self.first
    }

    /// The lexicographically greater end point.
    pub fn second(&self) -> Point2<f64> {
        self.second
    }

    /// Returns both end points.
    pub fn vertices(&self) -> [Point2<f64>; 2] {
        [self.first, self.second]
    }
}

fn coordinate_bits(value: f64) -> u64 {
    // +0.0 and -0.0 compare equal and must hash equally
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.second == other.second
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for point in self.vertices() {
            coordinate_bits(point.x).hash(state);
            coordinate_bits(point.y).hash(state);
        }
    }
}

/// An axis aligned rectangle.
///
/// Created from a single point or a point set and grown by calling
/// [Rectangle::add_point] or [Rectangle::add_rectangle].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Rectangle {
    lower: Point2<f64>,
    upper: Point2<f64>,
}

impl Rectangle {
    /// Creates a rectangle that contains exactly one point.
    pub fn from_point(point: Point2<f64>) -> Self {
        Rectangle {
            lower: point,
            upper: point,
        }
    }

    /// Creates the smallest rectangle containing all given points.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = Point2<f64>>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut result = Rectangle::from_point(points.next()?);
        for point in points {
            result.add_point(point);
        }
        Some(result)
    }

    /// The corner with the smallest coordinates.
    pub fn lower(&self) -> Point2<f64> {
        self.lower
    }

    /// The corner with the largest coordinates.
    pub fn upper(&self) -> Point2<f64> {
        self.upper
    }

    /// Extent along the x axis.
    pub fn width(&self) -> f64 {
        self.upper.x - self.lower.x
    }

    /// Extent along the y axis.
    pub fn height(&self) -> f64 {
        self.upper.y - self.lower.y
    }

    /// Grows the rectangle to contain `point`.
    pub fn add_point(&mut self, point: Point2<f64>) {
        self.lower = Point2::new(self.lower.x.min(point.x), self.lower.y.min(point.y));
        self.upper = Point2::new(self.upper.x.max(point.x), self.upper.y.max(point.y));
    }

    /// Grows the rectangle to contain another rectangle.
    pub fn add_rectangle(&mut self, other: &Rectangle) {
        self.add_point(other.lower);
        self.add_point(other.upper);
    }

    /// Checks if a point is contained. Points on the border are contained.
    pub fn contains_point(&self, point: Point2<f64>) -> bool {
        self.lower.x <= point.x
            && point.x <= self.upper.x
            && self.lower.y <= point.y
            && point.y <= self.upper.y
    }

    /// Checks if another rectangle lies completely within this rectangle.
    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        self.contains_point(other.lower) && self.contains_point(other.upper)
    }
}
