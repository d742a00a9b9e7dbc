//! # dyntri
//! Dynamic two dimensional Delaunay triangulations.
//!
//! # Features
//! * Incremental insertion of vertices, including degenerate input (duplicates, collinear and
//!   cocircular points)
//! * Removal of inner vertices
//! * Point location, nearest neighbor queries and Voronoi cells
//! * An optional grid index that speeds up point location on large triangulations
//!
//! The convex hull is surrounded by *ghost faces*, one for each hull edge. Locating a point
//! outside of the hull yields the ghost face of the hull edge it lies behind. See
//! [DelaunayTriangulation] for an overview.
//!
//! # Example
//! ```
//! use dyntri::{DelaunayTriangulation, Point2};
//!
//! let mut triangulation = DelaunayTriangulation::new();
//! triangulation.insert(Point2::new(0.0, 0.0));
//! triangulation.insert(Point2::new(1.0, 0.0));
//! triangulation.insert(Point2::new(0.0, 1.0));
//! triangulation.insert(Point2::new(1.0, 1.0));
//!
//! assert_eq!(triangulation.triangles().count(), 2);
//!
//! let face = triangulation.locate(Point2::new(0.25, 0.25)).unwrap();
//! assert!(!face.is_ghost());
//!
//! let outside = triangulation.locate(Point2::new(5.0, 0.5)).unwrap();
//! assert!(outside.is_ghost());
//! ```
//!
//! # Numerical precision
//! All geometric predicates use the absolute tolerance [EPS]. Points closer than `EPS` to a
//! line count as lying on it, points closer than `EPS` to each other are considered equal.
//! Input coordinates should be scaled accordingly.

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(missing_docs)]

mod delaunay_core;
mod delaunay_triangulation;
mod error;
mod point;
mod primitives;

#[cfg(test)]
mod test_utilities;

pub use crate::delaunay_core::{
    classify, Circle, FixedFaceHandle, GridIndex, LineSideInfo, EPS, VORONOI_RAY_LENGTH_FACTOR,
};
pub use crate::delaunay_triangulation::{DelaunayTriangulation, FaceHandle};
pub use crate::error::RemovalError;
pub use crate::point::Point2;
pub use crate::primitives::{Rectangle, Segment};
