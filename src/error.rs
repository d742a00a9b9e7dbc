use thiserror::Error;

/// Errors returned by [DelaunayTriangulation::remove](crate::DelaunayTriangulation::remove).
///
/// A failed removal leaves the triangulation untouched.
///
/// # Example
/// ```
/// use dyntri::{DelaunayTriangulation, Point2, RemovalError};
///
/// let mut triangulation = DelaunayTriangulation::from_points(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ]);
///
/// assert_eq!(
///     triangulation.remove(Point2::new(1.0, 0.0)),
///     Err(RemovalError::OnConvexHull { x: 1.0, y: 0.0 })
/// );
/// assert_eq!(triangulation.num_vertices(), 3);
/// ```
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RemovalError {
    /// The point is not a vertex of the triangulation.
    #[error("({x}, {y}) is not a vertex of the triangulation")]
    NotAVertex {
        /// The point's x coordinate.
        x: f64,
        /// The point's y coordinate.
        y: f64,
    },
    /// The vertex lies on the convex hull. Hull vertices cannot be removed.
    #[error("({x}, {y}) lies on the convex hull and cannot be removed")]
    OnConvexHull {
        /// The vertex' x coordinate.
        x: f64,
        /// The vertex' y coordinate.
        y: f64,
    },
}
