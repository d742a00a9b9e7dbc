use hashbrown::HashMap;
use smallvec::SmallVec;

use super::math::EPS;
use crate::Point2;

type Bucket = (i64, i64);

/// A set of distinct points.
///
/// Points are distinct if they differ by more than [EPS] in at least one coordinate. The set
/// hashes points into buckets of size `EPS x EPS`. Two points considered equal always lie in
/// the same or in adjacent buckets.
#[derive(Debug, Clone, Default)]
pub(crate) struct VertexSet {
    points: Vec<Point2<f64>>,
    buckets: HashMap<Bucket, SmallVec<[usize; 2]>>,
}

fn bucket(point: Point2<f64>) -> Bucket {
    (
        (point.x / EPS).floor() as i64,
        (point.y / EPS).floor() as i64,
    )
}

impl VertexSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.points.iter().copied()
    }

    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Returns the stored point equal to `point`, if any.
    pub fn find(&self, point: Point2<f64>) -> Option<Point2<f64>> {
        self.position(point).map(|index| self.points[index])
    }

    pub fn contains(&self, point: Point2<f64>) -> bool {
        self.position(point).is_some()
    }

    fn position(&self, point: Point2<f64>) -> Option<usize> {
        let (x, y) = bucket(point);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let candidates = match self.buckets.get(&(x + dx, y + dy)) {
                    Some(candidates) => candidates,
                    None => continue,
                };
                if let Some(index) = candidates
                    .iter()
                    .copied()
                    .find(|index| self.points[*index].approx_eq(point))
                {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Inserts a point. Returns `false` if an equal point was already present.
    pub fn insert(&mut self, point: Point2<f64>) -> bool {
        if self.contains(point) {
            return false;
        }
        self.buckets
            .entry(bucket(point))
            .or_default()
            .push(self.points.len());
        self.points.push(point);
        true
    }

    /// Removes a point. Returns the removed point if an equal point was present.
    pub fn remove(&mut self, point: Point2<f64>) -> Option<Point2<f64>> {
        let index = self.position(point)?;
        let removed = self.points.swap_remove(index);
        self.unlink(removed, index);

        if index < self.points.len() {
            // The last point moved into `index`
            let moved = self.points[index];
            let old_index = self.points.len();
            if let Some(entries) = self.buckets.get_mut(&bucket(moved)) {
                for entry in entries.iter_mut() {
                    if *entry == old_index {
                        *entry = index;
                    }
                }
            }
        }
        Some(removed)
    }

    fn unlink(&mut self, point: Point2<f64>, index: usize) {
        let key = bucket(point);
        if let Some(entries) = self.buckets.get_mut(&key) {
            entries.retain(|entry| *entry != index);
            if entries.is_empty() {
                self.buckets.remove(&key);
            }
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.buckets.clear();
    }
}
