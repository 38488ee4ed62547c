use std::sync::Arc;

use approx::assert_relative_eq;
use venom_atlas::mapper::{AxisConfig, DomainMode, TooltipSide, compute_domain, place_tooltip};
use venom_atlas::{ChartConfig, Item, SizeTier};

fn items_with_metric_a(values: &[f64]) -> Vec<Item> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Item::new(format!("s{index}"), "Elapidae", "Snake", *value, 1.0, 50.0))
        .collect()
}

#[test]
fn auto_domain_is_padded_and_order_independent() {
    let config = AxisConfig::horizontal(800.0).with_mode(DomainMode::Auto);

    let forward = compute_domain(&items_with_metric_a(&[0.0, 10.0, 20.0]), &config);
    let shuffled = compute_domain(&items_with_metric_a(&[20.0, 0.0, 10.0]), &config);

    assert_relative_eq!(forward.min, -2.0);
    assert_relative_eq!(forward.max, 22.0);
    assert_eq!(forward, shuffled);
    assert_eq!(
        forward,
        compute_domain(&items_with_metric_a(&[0.0, 10.0, 20.0]), &config)
    );
}

#[test]
fn vertical_axis_doubles_the_lower_pad() {
    let config = AxisConfig::vertical(330.0, 40.0).with_mode(DomainMode::Fixed { max: 100.0 });
    let domain = compute_domain(&[] as &[Item], &config);

    assert_relative_eq!(domain.min, -20.0);
    assert_relative_eq!(domain.max, 110.0);
}

#[test]
fn size_tiers_step_up_at_the_boundaries() {
    assert_eq!(SizeTier::classify(99.0), SizeTier::Small);
    assert_eq!(SizeTier::classify(100.0), SizeTier::Medium);
    assert_eq!(SizeTier::classify(199.0), SizeTier::Medium);
    assert_eq!(SizeTier::classify(200.0), SizeTier::Large);

    let mut previous = SizeTier::Small;
    for size in (0..400).map(|step| step as f64 * 0.75) {
        let tier = SizeTier::classify(size);
        assert!(tier >= previous, "tier dropped at size {size}");
        previous = tier;
    }
}

#[test]
fn projection_puts_potent_venom_right_and_large_yield_high() {
    let mapper = ChartConfig::default().mapper();
    let items = vec![
        Arc::new(Item::new("weak", "Elapidae", "Weak", 0.9, 10.0, 50.0)),
        Arc::new(Item::new("strong", "Elapidae", "Strong", 0.1, 90.0, 250.0)),
    ];
    let domains = mapper.compute_domains(&items);
    let points = mapper.view_points(&items, &domains);

    assert!(points[1].x > points[0].x);
    assert!(points[1].y < points[0].y);
    assert_eq!(points[1].tier, SizeTier::Large);
    assert_relative_eq!(points[1].extent, 40.0);
    assert_relative_eq!(points[0].extent, 25.0);
}

#[test]
fn tooltip_flips_right_near_the_left_edge() {
    let mapper = ChartConfig::default().mapper();
    let items = vec![
        Arc::new(Item::new("far", "Elapidae", "Far", 0.95, 50.0, 50.0)),
        Arc::new(Item::new("near", "Elapidae", "Near", 0.05, 50.0, 50.0)),
    ];
    let domains = mapper.compute_domains(&items);
    let points = mapper.view_points(&items, &domains);

    let left_edge = place_tooltip(&points[0], 150.0, 100.0, 10.0);
    assert_eq!(left_edge.side, TooltipSide::Right);
    assert_relative_eq!(left_edge.x, points[0].left() + 25.0 + 10.0);

    let right_side = place_tooltip(&points[1], 150.0, 100.0, 10.0);
    assert_eq!(right_side.side, TooltipSide::Left);
    assert_relative_eq!(right_side.x, points[1].left() - 160.0);
    assert_relative_eq!(right_side.y, points[1].top() - 37.5);
}
