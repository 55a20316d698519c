use crate::model::Category;

/// Range a value must fall in before any bucket is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `0 <= v <= 100`
    Percent,
    /// `v >= 0`
    NonNegative,
}

impl Bound {
    pub fn contains(self, value: f64) -> bool {
        match self {
            Bound::Percent => (0.0..=100.0).contains(&value),
            Bound::NonNegative => value >= 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub threshold: f64,
    /// `true` for `>=`, `false` for a strict `>`.
    pub inclusive: bool,
    pub category: Category,
}

impl Bucket {
    const fn at_least(threshold: f64, category: Category) -> Self {
        Self { threshold, inclusive: true, category }
    }

    const fn above(threshold: f64, category: Category) -> Self {
        Self { threshold, inclusive: false, category }
    }

    fn admits(&self, value: f64) -> bool {
        if self.inclusive {
            value >= self.threshold
        } else {
            value > self.threshold
        }
    }
}

/// Buckets are ordered from the highest threshold down; the first admitting one wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub bound: Bound,
    pub buckets: &'static [Bucket],
    pub fallback: Category,
}

impl Thresholds {
    /// `None` when the value fails the bound check.
    pub fn categorize(&self, value: f64) -> Option<Category> {
        if !self.bound.contains(value) {
            return None;
        }
        let category = self
            .buckets
            .iter()
            .find(|b| b.admits(value))
            .map_or(self.fallback, |b| b.category);
        Some(category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind {
    Percentage(Thresholds),
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerRule {
    pub token: &'static str,
    pub kind: RuleKind,
}

const fn percentage(
    token: &'static str,
    bound: Bound,
    buckets: &'static [Bucket],
    fallback: Category,
) -> MarkerRule {
    MarkerRule {
        token,
        kind: RuleKind::Percentage(Thresholds { bound, buckets, fallback }),
    }
}

pub const TREND_TOKEN: &str = "rise_fall";

const GREEN_YELLOW_ORANGE_60_40_20: &[Bucket] = &[
    Bucket::at_least(60.0, Category::Green),
    Bucket::at_least(40.0, Category::LightGreen),
    Bucket::at_least(20.0, Category::Yellow),
];
const GREEN_YELLOW_90_75: &[Bucket] = &[
    Bucket::at_least(90.0, Category::Green),
    Bucket::at_least(75.0, Category::Yellow),
];
const GREEN_YELLOW_90_80: &[Bucket] = &[
    Bucket::at_least(90.0, Category::Green),
    Bucket::at_least(80.0, Category::Yellow),
];
const GREEN_YELLOW_60_50: &[Bucket] = &[
    Bucket::at_least(60.0, Category::Green),
    Bucket::at_least(50.0, Category::Yellow),
];
const GREEN_71: &[Bucket] = &[Bucket::at_least(71.0, Category::Green)];
const GREEN_80: &[Bucket] = &[Bucket::at_least(80.0, Category::Green)];
const RED_ABOVE_HALF: &[Bucket] = &[Bucket::above(0.5, Category::Red)];

/// Marker rules in priority order. An element is handled by the first rule whose
/// token is in its class list.
pub static MARKER_RULES: [MarkerRule; 10] = [
    percentage(
        "green_yellow_orange_60_40_25_unbounded",
        Bound::NonNegative,
        GREEN_YELLOW_ORANGE_60_40_20,
        Category::Orange,
    ),
    percentage("traffic_light_90_75_unbounded", Bound::NonNegative, GREEN_YELLOW_90_75, Category::Red),
    percentage("traffic_light_90_80", Bound::Percent, GREEN_YELLOW_90_80, Category::Red),
    percentage("traffic_light_60_50", Bound::Percent, GREEN_YELLOW_60_50, Category::Red),
    percentage("traffic_light_71_unbounded", Bound::NonNegative, GREEN_71, Category::Yellow),
    percentage("traffic_light_71", Bound::Percent, GREEN_71, Category::Yellow),
    percentage("unary_good_80_unbounded", Bound::NonNegative, GREEN_80, Category::None),
    percentage("unary_good_80", Bound::Percent, GREEN_80, Category::None),
    percentage("unary_bad_half_percent", Bound::Percent, RED_ABOVE_HALF, Category::None),
    MarkerRule { token: TREND_TOKEN, kind: RuleKind::Trend },
];

pub fn find_rule(token: &str) -> Option<&'static MarkerRule> {
    MARKER_RULES.iter().find(|r| r.token == token)
}

/// First rule in table order whose token appears in `classes`.
pub fn first_matching_rule(classes: &[String]) -> Option<&'static MarkerRule> {
    MARKER_RULES
        .iter()
        .find(|rule| classes.iter().any(|c| c == rule.token))
}
