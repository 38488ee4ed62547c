use std::sync::Arc;

pub type ItemId = String;

pub const MEDIUM_SIZE_CLASS: f64 = 100.0;
pub const LARGE_SIZE_CLASS: f64 = 200.0;

/// One of the two continuous attributes an item is plotted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// Toxicity (LD50, mg/kg), plotted horizontally.
    MetricA,
    /// Venom yield (mg), plotted vertically.
    MetricB,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::MetricA, Axis::MetricB];

    pub fn label(self) -> &'static str {
        match self {
            Self::MetricA => "LD50",
            Self::MetricB => "venom yield",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::MetricA => "mg/kg",
            Self::MetricB => "mg",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemDetails {
    pub method: String,
    pub injection: String,
    pub tested_on: String,
    pub dentition: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub category: String,
    pub display_name: String,
    pub metric_a: f64,
    pub metric_b: f64,
    pub size_class: f64,
    pub details: ItemDetails,
}

impl Item {
    pub fn new(
        id: impl Into<ItemId>,
        category: impl Into<String>,
        display_name: impl Into<String>,
        metric_a: f64,
        metric_b: f64,
        size_class: f64,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            display_name: display_name.into(),
            metric_a,
            metric_b,
            size_class,
            details: ItemDetails::default(),
        }
    }

    pub fn metric(&self, axis: Axis) -> f64 {
        match axis {
            Axis::MetricA => self.metric_a,
            Axis::MetricB => self.metric_b,
        }
    }

    /// First numeric field that is not a finite non-negative value, with the reason.
    pub fn invalid_field(&self) -> Option<(&'static str, &'static str)> {
        [
            ("metric_a", self.metric_a),
            ("metric_b", self.metric_b),
            ("size_class", self.size_class),
        ]
        .into_iter()
        .find_map(|(field, value)| {
            if value.is_nan() {
                Some((field, "is not a number"))
            } else if value.is_infinite() {
                Some((field, "is not finite"))
            } else if value < 0.0 {
                Some((field, "is negative"))
            } else {
                None
            }
        })
    }
}

/// Discrete visual size bucket. Boundaries belong to the upper tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub fn classify(size_class: f64) -> Self {
        if size_class >= LARGE_SIZE_CLASS {
            Self::Large
        } else if size_class >= MEDIUM_SIZE_CLASS {
            Self::Medium
        } else {
            Self::Small
        }
    }

    pub fn legend(self) -> &'static str {
        match self {
            Self::Small => "< 100cm",
            Self::Medium => "< 200cm",
            Self::Large => ">= 200cm",
        }
    }
}

/// Screen-space placement of an item for a single render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewPoint {
    pub item: Arc<Item>,
    pub x: f64,
    pub y: f64,
    pub tier: SizeTier,
    pub extent: f64,
}

impl ViewPoint {
    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn left(&self) -> f64 {
        self.x - self.extent / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.extent / 2.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left()
            && x <= self.left() + self.extent
            && y >= self.top()
            && y <= self.top() + self.extent
    }

    pub fn has_finite_center(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Center-to-center distance rounded to whole pixels.
    pub fn distance_to(&self, other: &ViewPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y).round()
    }
}
