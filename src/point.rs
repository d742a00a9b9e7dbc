use std::cmp::Ordering;

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::delaunay_core::math::{approx_cmp_f64, approx_equal, EPS};

/// A two dimensional point.
///
/// This is the basic type used for defining positions. Vector arithmetic is available for any
/// float coordinate type. The triangulation and all tolerance based comparisons use
/// `Point2<f64>`.
///
/// `PartialEq` compares coordinates exactly. Use [Point2::approx_eq] for the tolerance based
/// equality that the triangulation uses to detect duplicate vertices.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct Point2<S> {
    /// The point's x coordinate
    pub x: S,
    /// The point's y coordinate
    pub y: S,
}

impl<S> Point2<S> {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: S, y: S) -> Self {
        Point2 { x, y }
    }
}

impl<S: Float> Point2<S> {
    /// Returns the squared distance of this point and another point.
    #[inline]
    pub fn distance_2(&self, other: Self) -> S {
        self.sub(other).length2()
    }

    pub(crate) fn mul(&self, factor: S) -> Self {
        Point2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub(crate) fn add(&self, other: Self) -> Self {
        Point2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub(crate) fn length2(&self) -> S {
        self.x * self.x + self.y * self.y
    }

    pub(crate) fn sub(&self, other: Self) -> Self {
        Point2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the dot product of two vectors.
    pub fn dot(&self, other: Self) -> S {
        self.x * other.x + self.y * other.y
    }

    /// Returns the z component of the cross product of two vectors.
    pub fn cross(&self, other: Self) -> S {
        self.x * other.y - self.y * other.x
    }

    /// Returns the euclidean distance of this point and another point.
    pub fn distance(&self, other: Self) -> S {
        self.distance_2(other).sqrt()
    }

    /// Returns the length of this point interpreted as vector.
    pub fn length(&self) -> S {
        self.length2().sqrt()
    }
}

impl Point2<f64> {
    /// Returns `true` if both coordinates differ by at most [EPS].
    ///
    /// This is the equality used to reject duplicate vertices.
    #[inline]
    pub fn approx_eq(&self, other: Self) -> bool {
        approx_equal(self.x, other.x) && approx_equal(self.y, other.y)
    }

    /// Lexicographic order (x first, then y) with [EPS] tolerance.
    ///
    /// Only used to canonicalize construction order, never as a geometric predicate.
    pub fn approx_cmp(&self, other: Self) -> Ordering {
        match approx_cmp_f64(self.x, other.x) {
            Ordering::Equal => approx_cmp_f64(self.y, other.y),
            ordering => ordering,
        }
    }

    /// Returns `true` if `self` is lexicographically greater than `other`.
    pub(crate) fn approx_greater(&self, other: Self) -> bool {
        self.approx_cmp(other) == Ordering::Greater
    }

    /// Returns this vector scaled to unit length, or `self` if its length is below [EPS].
    pub fn normalized(&self) -> Self {
        let length = self.length();
        if length > EPS {
            self.mul(1.0 / length)
        } else {
            *self
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<S> From<Point2<S>> for [S; 2] {
    #[inline]
    fn from(point: Point2<S>) -> Self {
        [point.x, point.y]
    }
}

impl<S> From<Point2<S>> for (S, S) {
    #[inline]
    fn from(point: Point2<S>) -> (S, S) {
        (point.x, point.y)
    }
}

impl<S> From<[S; 2]> for Point2<S> {
    #[inline]
    fn from(source: [S; 2]) -> Self {
        let [x, y] = source;
        Self::new(x, y)
    }
}

impl<S> From<(S, S)> for Point2<S> {
    #[inline]
    fn from(source: (S, S)) -> Self {
        Self::new(source.0, source.1)
    }
}
