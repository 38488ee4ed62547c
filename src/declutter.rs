//! Finds points drawn too close to a focused point.
//!
//! Both entry points are stateless. Restoring whatever was dimmed is the
//! caller's job.

use std::collections::{BTreeSet, HashMap};

use crate::model::{ItemId, ViewPoint};

pub const DEFAULT_DECLUTTER_THRESHOLD: f64 = 60.0;

/// Ids of every point other than `focus` whose rounded center distance is
/// strictly below `threshold`.
pub fn neighbors_within(
    focus: &ViewPoint,
    points: &[ViewPoint],
    threshold: f64,
) -> BTreeSet<ItemId> {
    if !usable_threshold(threshold) || !focus.has_finite_center() {
        return BTreeSet::new();
    }

    points
        .iter()
        .filter(|point| is_neighbor(focus, point, threshold))
        .map(|point| point.item.id.clone())
        .collect()
}

fn usable_threshold(threshold: f64) -> bool {
    threshold.is_finite() && threshold > 0.0
}

fn is_neighbor(focus: &ViewPoint, point: &ViewPoint, threshold: f64) -> bool {
    point.id() != focus.id() && focus.distance_to(point) < threshold
}

/// Bucket index over view-space centers for large point sets.
///
/// Cells are one pixel wider than the threshold so that every point passing
/// the rounded-distance test sits in the focus cell or one of its eight
/// neighbors.
#[derive(Debug)]
pub struct ProximityGrid<'a> {
    points: &'a [ViewPoint],
    threshold: f64,
    cell_size: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> ProximityGrid<'a> {
    pub fn build(points: &'a [ViewPoint], threshold: f64) -> Self {
        let cell_size = threshold + 1.0;
        let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();

        if usable_threshold(threshold) {
            for (index, point) in points.iter().enumerate() {
                if point.has_finite_center() {
                    buckets
                        .entry(cell_of(point, cell_size))
                        .or_default()
                        .push(index);
                }
            }
        }

        Self {
            points,
            threshold,
            cell_size,
            buckets,
        }
    }

    pub fn neighbors_of(&self, focus: &ViewPoint) -> BTreeSet<ItemId> {
        if !usable_threshold(self.threshold) || !focus.has_finite_center() {
            return BTreeSet::new();
        }

        let (cell_x, cell_y) = cell_of(focus, self.cell_size);
        let mut neighbors = BTreeSet::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(cell_x + dx, cell_y + dy)) else {
                    continue;
                };

                for &index in bucket {
                    let point = &self.points[index];
                    if is_neighbor(focus, point, self.threshold) {
                        neighbors.insert(point.item.id.clone());
                    }
                }
            }
        }
        neighbors
    }
}

fn cell_of(point: &ViewPoint, cell_size: f64) -> (i64, i64) {
    (
        (point.x / cell_size).floor() as i64,
        (point.y / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Item, SizeTier};

    fn point(id: &str, x: f64, y: f64) -> ViewPoint {
        ViewPoint {
            item: Arc::new(Item::new(id, "Elapidae", id, 1.0, 1.0, 50.0)),
            x,
            y,
            tier: SizeTier::Small,
            extent: 25.0,
        }
    }

    #[test]
    fn distance_is_rounded_before_comparison() {
        let points = vec![point("a", 0.0, 0.0), point("b", 59.4, 0.0), point("c", 59.6, 0.0)];
        let neighbors = neighbors_within(&points[0], &points, 60.0);
        assert_eq!(neighbors, BTreeSet::from(["b".to_owned()]));
    }

    #[test]
    fn focus_is_never_its_own_neighbor() {
        let points = vec![point("a", 0.0, 0.0), point("b", 0.0, 0.0)];
        let neighbors = neighbors_within(&points[0], &points, 60.0);
        assert_eq!(neighbors, BTreeSet::from(["b".to_owned()]));
    }

    #[test]
    fn degenerate_inputs_yield_empty_sets() {
        let points = vec![point("a", 0.0, 0.0), point("b", f64::NAN, 0.0)];
        assert!(neighbors_within(&points[0], &points, 60.0).is_empty());
        assert!(neighbors_within(&points[1], &points, 60.0).is_empty());
        assert!(neighbors_within(&points[0], &points, 0.0).is_empty());
        assert!(neighbors_within(&points[0], &[], 60.0).is_empty());
    }

    #[test]
    fn grid_matches_linear_scan() {
        let points = (0..400)
            .map(|index| {
                let x = ((index * 37) % 800) as f64 + (index % 7) as f64 * 0.3;
                let y = ((index * 53) % 350) as f64 + (index % 5) as f64 * 0.7;
                point(&format!("p{index}"), x, y)
            })
            .collect::<Vec<_>>();

        for threshold in [15.0, 60.0, 60.3] {
            let grid = ProximityGrid::build(&points, threshold);
            for focus in &points {
                assert_eq!(
                    grid.neighbors_of(focus),
                    neighbors_within(focus, &points, threshold),
                    "threshold {threshold}, focus {}",
                    focus.id()
                );
            }
        }
    }

    #[test]
    fn grid_skips_non_finite_centers() {
        let points = vec![point("a", 0.0, 0.0), point("b", f64::INFINITY, 0.0)];
        let grid = ProximityGrid::build(&points, 60.0);
        assert!(grid.neighbors_of(&points[0]).is_empty());
        assert!(grid.neighbors_of(&points[1]).is_empty());
    }
}
