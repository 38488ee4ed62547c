//! Data-to-view coordinate mapping.
//!
//! Domains are recomputed from scratch on every render pass. Nothing in here
//! panics or loops on NaN input; degenerate values collapse onto the middle
//! of the pixel range instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{Axis, Item, SizeTier, ViewPoint};

pub const DEFAULT_PADDING_FRACTION: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DomainMode {
    /// Derived from the observed min/max of the item set.
    Auto,
    /// Externally supplied max with min fixed at zero.
    Fixed { max: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub const UNIT: Domain = Domain { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(self) -> f64 {
        self.max - self.min
    }

    fn padded(self, fraction: f64, lower_factor: f64) -> Self {
        let pad = self.span() * fraction;
        Self {
            min: self.min - pad * lower_factor,
            max: self.max + pad,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisConfig {
    pub axis: Axis,
    pub mode: DomainMode,
    pub padding_fraction: f64,
    /// Multiplier applied to the padding below the domain minimum.
    pub lower_pad_factor: f64,
    /// Pixel coordinates the domain minimum and maximum land on.
    pub pixel_range: (f64, f64),
    /// Swaps the pixel range ends.
    pub reversed: bool,
}

impl AxisConfig {
    /// Toxicity axis: left to right across `width`, reversed.
    pub fn horizontal(width: f64) -> Self {
        Self {
            axis: Axis::MetricA,
            mode: DomainMode::Auto,
            padding_fraction: DEFAULT_PADDING_FRACTION,
            lower_pad_factor: 1.0,
            pixel_range: (0.0, width),
            reversed: true,
        }
    }

    /// Yield axis: from the baseline up to `top`, with a doubled lower pad.
    pub fn vertical(baseline: f64, top: f64) -> Self {
        Self {
            axis: Axis::MetricB,
            mode: DomainMode::Auto,
            padding_fraction: DEFAULT_PADDING_FRACTION,
            lower_pad_factor: 2.0,
            pixel_range: (baseline, top),
            reversed: false,
        }
    }

    pub fn with_mode(mut self, mode: DomainMode) -> Self {
        self.mode = mode;
        self
    }
}

pub fn compute_domain<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    config: &AxisConfig,
) -> Domain {
    let raw = match config.mode {
        DomainMode::Fixed { max } => {
            let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
            Domain::new(0.0, max)
        }
        DomainMode::Auto => {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for value in items.into_iter().map(|item| item.metric(config.axis)) {
                if value.is_finite() {
                    min = min.min(value);
                    max = max.max(value);
                }
            }

            if !min.is_finite() || !max.is_finite() {
                Domain::UNIT
            } else if max - min <= 0.0 {
                Domain::new(min - 0.5, max + 0.5)
            } else {
                Domain::new(min, max)
            }
        }
    };

    raw.padded(config.padding_fraction, config.lower_pad_factor)
}

/// Linear map from a data domain onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub domain: Domain,
    pub range: (f64, f64),
}

impl Scale {
    pub fn new(domain: Domain, config: &AxisConfig) -> Self {
        let (start, end) = config.pixel_range;
        let range = if config.reversed {
            (end, start)
        } else {
            (start, end)
        };
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (start, end) = self.range;
        let mut t = (value - self.domain.min) / self.domain.span();
        if !t.is_finite() {
            t = 0.5;
        }
        start + t * (end - start)
    }

    /// Round-numbered tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let Domain { min, max } = self.domain;
        if count == 0 || !min.is_finite() || !max.is_finite() || max <= min {
            return Vec::new();
        }

        let raw_step = (max - min) / count as f64;
        let power = raw_step.log10().floor();
        let error = raw_step / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        // Small steps are kept as an inverse so the ticks stay exact decimals.
        let small = power < 0.0;
        let unit = if small {
            10f64.powf(-power) / factor
        } else {
            factor * 10f64.powf(power)
        };
        let to_tick = |index: f64| if small { index / unit } else { index * unit };
        let (first, last) = if small {
            ((min * unit).ceil(), (max * unit).floor())
        } else {
            ((min / unit).ceil(), (max / unit).floor())
        };
        if !first.is_finite() || !last.is_finite() || last < first {
            return Vec::new();
        }

        let limit = count.saturating_mul(10);
        let mut ticks = Vec::new();
        let mut index = first;
        while index <= last && ticks.len() < limit {
            let tick = to_tick(index);
            if !tick.is_finite() {
                break;
            }
            ticks.push(tick);
            index += 1.0;
        }
        ticks
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domains {
    pub metric_a: Domain,
    pub metric_b: Domain,
}

impl Domains {
    pub fn get(&self, axis: Axis) -> Domain {
        match axis {
            Axis::MetricA => self.metric_a,
            Axis::MetricB => self.metric_b,
        }
    }

    fn set(&mut self, axis: Axis, domain: Domain) {
        match axis {
            Axis::MetricA => self.metric_a = domain,
            Axis::MetricB => self.metric_b = domain,
        }
    }
}

impl Default for Domains {
    fn default() -> Self {
        Self {
            metric_a: Domain::UNIT,
            metric_b: Domain::UNIT,
        }
    }
}

/// Square pixel side per size tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierExtents {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for TierExtents {
    fn default() -> Self {
        Self {
            small: 25.0,
            medium: 30.0,
            large: 40.0,
        }
    }
}

impl TierExtents {
    pub fn extent(&self, tier: SizeTier) -> f64 {
        match tier {
            SizeTier::Small => self.small,
            SizeTier::Medium => self.medium,
            SizeTier::Large => self.large,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateMapper {
    horizontal: AxisConfig,
    vertical: AxisConfig,
    extents: TierExtents,
}

impl CoordinateMapper {
    pub fn new(horizontal: AxisConfig, vertical: AxisConfig, extents: TierExtents) -> Self {
        Self {
            horizontal,
            vertical,
            extents,
        }
    }

    pub fn set_mode(&mut self, axis: Axis, mode: DomainMode) {
        if self.horizontal.axis == axis {
            self.horizontal.mode = mode;
        } else {
            self.vertical.mode = mode;
        }
    }

    pub fn extents(&self) -> &TierExtents {
        &self.extents
    }

    pub fn compute_domains(&self, items: &[Arc<Item>]) -> Domains {
        let mut domains = Domains::default();
        for config in [&self.horizontal, &self.vertical] {
            let domain = compute_domain(items.iter().map(Arc::as_ref), config);
            domains.set(config.axis, domain);
        }
        domains
    }

    pub fn horizontal_scale(&self, domains: &Domains) -> Scale {
        Scale::new(domains.get(self.horizontal.axis), &self.horizontal)
    }

    pub fn vertical_scale(&self, domains: &Domains) -> Scale {
        Scale::new(domains.get(self.vertical.axis), &self.vertical)
    }

    pub fn project(&self, item: &Item, domains: &Domains) -> (f64, f64) {
        let x = self
            .horizontal_scale(domains)
            .apply(item.metric(self.horizontal.axis));
        let y = self
            .vertical_scale(domains)
            .apply(item.metric(self.vertical.axis));
        (x, y)
    }

    pub fn size_tier(&self, item: &Item) -> SizeTier {
        SizeTier::classify(item.size_class)
    }

    pub fn view_points(&self, items: &[Arc<Item>], domains: &Domains) -> Vec<ViewPoint> {
        let horizontal = self.horizontal_scale(domains);
        let vertical = self.vertical_scale(domains);

        items
            .iter()
            .map(|item| {
                let tier = self.size_tier(item);
                ViewPoint {
                    item: Arc::clone(item),
                    x: horizontal.apply(item.metric(self.horizontal.axis)),
                    y: vertical.apply(item.metric(self.vertical.axis)),
                    tier,
                    extent: self.extents.extent(tier),
                }
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
    pub side: TooltipSide,
}

/// Places a `width` x `height` tooltip beside `point`, preferring the left.
pub fn place_tooltip(
    point: &ViewPoint,
    width: f64,
    height: f64,
    offset: f64,
) -> TooltipPlacement {
    let y = point.top() - (height - point.extent) / 2.0;
    let left = point.left() - width - offset;
    if left < 0.0 {
        TooltipPlacement {
            x: point.left() + point.extent + offset,
            y,
            side: TooltipSide::Right,
        }
    } else {
        TooltipPlacement {
            x: left,
            y,
            side: TooltipSide::Left,
        }
    }
}
