//! Point sets shared by the unit tests.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::Point2;

/// Seed for vertex sets.
pub(crate) const VERTEX_SEED: u64 = 0x6479_6e74_7269;
/// Seed for query points and operation sequences, independent of [VERTEX_SEED].
pub(crate) const QUERY_SEED: u64 = 0x7175_6572_7921;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

pub(crate) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `count` points drawn uniformly from the square `[-range, range]²`.
pub(crate) fn random_points(range: f64, count: usize, seed: u64) -> Vec<Point2<f64>> {
    let mut rng = rng(seed);
    let coordinate = Uniform::new(-range, range);
    (0..count)
        .map(|_| Point2::new(coordinate.sample(&mut rng), coordinate.sample(&mut rng)))
        .collect()
}

/// All integer points `(x, y)` with `0 <= x < columns` and `0 <= y < rows`.
///
/// Every grid cell has four cocircular corners.
pub(crate) fn grid_points(columns: usize, rows: usize) -> Vec<Point2<f64>> {
    (0..columns)
        .flat_map(|x| (0..rows).map(move |y| Point2::new(x as f64, y as f64)))
        .collect()
}

pub(crate) fn shuffled(mut points: Vec<Point2<f64>>, seed: u64) -> Vec<Point2<f64>> {
    points.shuffle(&mut rng(seed));
    points
}

/// Five equally spaced points `t * direction` for `t` in `0..=4`.
///
/// The order alternates between extending the line at both ends and filling gaps.
pub(crate) fn line_points(direction: Point2<f64>) -> Vec<Point2<f64>> {
    [2.0, 0.0, 4.0, 1.0, 3.0]
        .into_iter()
        .map(|t| direction.mul(t))
        .collect()
}

/// `count` points on the unit circle. Each point lies outside of the hull of its predecessors.
pub(crate) fn circle_points(count: usize) -> Vec<Point2<f64>> {
    (0..count)
        .map(|i| {
            let angle = i as f64 * GOLDEN_ANGLE;
            Point2::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// The corners of the unit square followed by its center.
pub(crate) fn square_with_center() -> Vec<Point2<f64>> {
    vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
        Point2::new(0.5, 0.5),
    ]
}
