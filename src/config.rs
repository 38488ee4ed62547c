//! Chart tunables, loadable from a JSON file.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::declutter::DEFAULT_DECLUTTER_THRESHOLD;
use crate::error::{Error, Result};
use crate::filter::EmptyOrPolicy;
use crate::mapper::{
    AxisConfig, CoordinateMapper, DEFAULT_PADDING_FRACTION, DomainMode, TierExtents,
};
use crate::model::Axis;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSource {
    /// Axis maxima follow the limit sliders.
    #[default]
    Limits,
    /// Axis extents follow the visible items.
    Data,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacityConfig {
    pub normal: f32,
    pub focused: f32,
    pub dimmed: f32,
}

impl Default for OpacityConfig {
    fn default() -> Self {
        Self {
            normal: 0.8,
            focused: 1.0,
            dimmed: 0.1,
        }
    }
}

/// Per-axis pair of values, keyed the same way as [`Axis`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerAxis<T> {
    pub metric_a: T,
    pub metric_b: T,
}

impl<T: Copy> PerAxis<T> {
    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::MetricA => self.metric_a,
            Axis::MetricB => self.metric_b,
        }
    }

    pub fn set(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::MetricA => self.metric_a = value,
            Axis::MetricB => self.metric_b = value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    /// Vertical pixel position of the horizontal axis.
    pub baseline: f64,
    /// Vertical pixel position the largest yield maps to.
    pub top: f64,
    pub padding_fraction: f64,
    pub domain_source: DomainSource,
    pub tier_extents: TierExtents,
    pub declutter_threshold: f64,
    /// Point count at which hover lookups switch to the bucket grid.
    pub grid_min_points: usize,
    pub opacity: OpacityConfig,
    pub focus_scale: f32,
    pub transition_secs: f32,
    pub empty_or_group: EmptyOrPolicy,
    pub initial_limits: PerAxis<f64>,
    pub limit_ranges: PerAxis<(f64, f64)>,
    pub categories: Vec<String>,
    pub initial_categories: Vec<String>,
    pub suggestion_limit: usize,
    pub tooltip_size: (f64, f64),
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 350.0,
            baseline: 330.0,
            top: 40.0,
            padding_fraction: DEFAULT_PADDING_FRACTION,
            domain_source: DomainSource::Limits,
            tier_extents: TierExtents::default(),
            declutter_threshold: DEFAULT_DECLUTTER_THRESHOLD,
            grid_min_points: 512,
            opacity: OpacityConfig::default(),
            focus_scale: 1.2,
            transition_secs: 0.2,
            empty_or_group: EmptyOrPolicy::RejectAll,
            initial_limits: PerAxis {
                metric_a: 1.0,
                metric_b: 100.0,
            },
            limit_ranges: PerAxis {
                metric_a: (1.0, 12.0),
                metric_b: (10.0, 2500.0),
            },
            categories: ["Elapidae", "Viperidae", "Colubridae", "Atractaspididae"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            initial_categories: vec!["Elapidae".to_owned()],
            suggestion_limit: 12,
            tooltip_size: (150.0, 100.0),
        }
    }
}

impl ChartConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "chart size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.top < self.baseline && self.baseline <= self.height && self.top >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "expected 0 <= top < baseline <= height, got top={} baseline={} height={}",
                self.top, self.baseline, self.height
            )));
        }
        if !(self.padding_fraction >= 0.0 && self.padding_fraction.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "padding_fraction must be finite and non-negative, got {}",
                self.padding_fraction
            )));
        }
        if !(self.declutter_threshold > 0.0 && self.declutter_threshold.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "declutter_threshold must be finite and positive, got {}",
                self.declutter_threshold
            )));
        }
        for axis in Axis::ALL {
            let (low, high) = self.limit_ranges.get(axis);
            if !(low > 0.0 && low < high && high.is_finite()) {
                return Err(Error::InvalidConfig(format!(
                    "limit range for {} must satisfy 0 < low < high, got {low}..{high}",
                    axis.label()
                )));
            }
            let limit = self.initial_limits.get(axis);
            if !(low..=high).contains(&limit) {
                return Err(Error::InvalidConfig(format!(
                    "initial limit for {} must lie in {low}..{high}, got {limit}",
                    axis.label()
                )));
            }
        }
        let (tooltip_width, tooltip_height) = self.tooltip_size;
        if !(tooltip_width > 0.0
            && tooltip_height > 0.0
            && tooltip_width.is_finite()
            && tooltip_height.is_finite())
        {
            return Err(Error::InvalidConfig(format!(
                "tooltip_size must be finite and positive, got {tooltip_width}x{tooltip_height}"
            )));
        }
        if let Some(unknown) = self
            .initial_categories
            .iter()
            .find(|category| !self.categories.contains(category))
        {
            return Err(Error::InvalidConfig(format!(
                "initial category `{unknown}` is not in the category list"
            )));
        }

        Ok(())
    }

    pub fn axis_config(&self, axis: Axis) -> AxisConfig {
        let base = match axis {
            Axis::MetricA => AxisConfig::horizontal(self.width),
            Axis::MetricB => AxisConfig::vertical(self.baseline, self.top),
        };
        let mode = match self.domain_source {
            DomainSource::Limits => DomainMode::Fixed {
                max: self.initial_limits.get(axis),
            },
            DomainSource::Data => DomainMode::Auto,
        };

        AxisConfig {
            padding_fraction: self.padding_fraction,
            ..base.with_mode(mode)
        }
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(
            self.axis_config(Axis::MetricA),
            self.axis_config(Axis::MetricB),
            self.tier_extents,
        )
    }
}
