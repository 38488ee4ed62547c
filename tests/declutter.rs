use std::collections::BTreeSet;
use std::sync::Arc;

use venom_atlas::{Item, ProximityGrid, SizeTier, ViewPoint, neighbors_within};

fn point(id: &str, x: f64, y: f64) -> ViewPoint {
    ViewPoint {
        item: Arc::new(Item::new(id, "Elapidae", id, 1.0, 1.0, 50.0)),
        x,
        y,
        tier: SizeTier::Small,
        extent: 25.0,
    }
}

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[test]
fn neighbors_are_symmetric_and_repeatable() {
    let points = vec![
        point("A", 0.0, 0.0),
        point("B", 10.0, 0.0),
        point("C", 1000.0, 1000.0),
    ];

    assert_eq!(neighbors_within(&points[0], &points, 60.0), ids(&["B"]));
    assert_eq!(neighbors_within(&points[1], &points, 60.0), ids(&["A"]));
    assert!(neighbors_within(&points[2], &points, 60.0).is_empty());

    let first = neighbors_within(&points[0], &points, 60.0);
    for _ in 0..3 {
        assert_eq!(neighbors_within(&points[0], &points, 60.0), first);
    }
}

#[test]
fn grid_agrees_with_the_linear_scan() {
    let points = vec![
        point("A", 0.0, 0.0),
        point("B", 10.0, 0.0),
        point("C", 1000.0, 1000.0),
        point("D", 60.4, 0.0),
        point("E", -42.0, 42.0),
    ];
    let grid = ProximityGrid::build(&points, 60.0);

    for focus in &points {
        assert_eq!(
            grid.neighbors_of(focus),
            neighbors_within(focus, &points, 60.0)
        );
    }
    assert_eq!(grid.neighbors_of(&points[0]), ids(&["B", "E"]));
}
