#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter, KPI and dashboard view types for the mall analytics engine.
//!
//! These are the engine's input and output contracts: a [`Filter`] goes
//! in, and one record per dashboard view comes out. Every record
//! serializes with camelCase field names so the presentation layer can
//! consume it directly.

pub mod views;

use chrono::{Datelike as _, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use views::*;

/// Selects either every value of a dimension or exactly one.
///
/// Serialized as a plain string: `"all"` for [`Selector::All`], the
/// selected value otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    /// Parses a selector value. `"all"` and `"todas"` (any case) select
    /// every value.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("todas") {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The selected value, if this selector narrows the dimension.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::All => "all".to_string(),
            Selector::Only(value) => value,
        }
    }
}

/// An inclusive calendar date range. `from` never follows `to`, including
/// when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDateRange")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = String;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.from, raw.to).ok_or_else(|| {
            format!(
                "date range starts on {} after it ends on {}",
                raw.from, raw.to
            )
        })
    }
}

impl DateRange {
    /// Builds a range, or `None` when `from` is after `to`.
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Whether any day of the calendar month starting at `month_start`
    /// falls within this range.
    #[must_use]
    pub fn overlaps_month(&self, month_start: NaiveDate) -> bool {
        let month_end = month_start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        month_start <= self.to && self.from <= month_end
    }
}

/// Preset date ranges offered next to the custom range picker.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum QuickPeriod {
    Last7Days,
    Last30Days,
    Last90Days,
    #[default]
    CurrentMonth,
    YearToDate,
    /// An explicitly chosen range.
    Custom,
}

impl QuickPeriod {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Last7Days,
            Self::Last30Days,
            Self::Last90Days,
            Self::CurrentMonth,
            Self::YearToDate,
            Self::Custom,
        ]
    }

    /// The range this preset denotes relative to `today`. `Custom` has no
    /// preset range.
    #[must_use]
    pub fn date_range(self, today: NaiveDate) -> Option<DateRange> {
        let days_back = |days: u64| today.checked_sub_days(Days::new(days));
        let from = match self {
            Self::Last7Days => days_back(7)?,
            Self::Last30Days => days_back(30)?,
            Self::Last90Days => days_back(90)?,
            Self::CurrentMonth => today.with_day(1)?,
            Self::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            Self::Custom => return None,
        };
        let to = match self {
            Self::CurrentMonth => from
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())?,
            _ => today,
        };
        DateRange::new(from, to)
    }
}

/// The active dashboard filters, combined with logical AND.
///
/// The default filter selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub category: Selector,
    #[serde(default)]
    pub zone: Selector,
    #[serde(default)]
    pub store: Selector,
    /// Restricts time series only; stores carry no timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Informational tag describing how `date_range` was chosen.
    #[serde(default)]
    pub quick_period: QuickPeriod,
}

impl Filter {
    #[must_use]
    pub fn with_category(mut self, category: impl Into<Selector>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<Selector>) -> Self {
        self.zone = zone.into();
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: impl Into<Selector>) -> Self {
        self.store = store.into();
        self
    }

    /// Sets an explicit range and marks the period as custom.
    #[must_use]
    pub const fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self.quick_period = QuickPeriod::Custom;
        self
    }

    /// Applies a preset period relative to `today`.
    #[must_use]
    pub fn with_quick_period(mut self, period: QuickPeriod, today: NaiveDate) -> Self {
        self.quick_period = period;
        if let Some(range) = period.date_range(today) {
            self.date_range = Some(range);
        }
        self
    }

    /// Whether every store passes the dimensional selectors.
    #[must_use]
    pub const fn is_dimensional_identity(&self) -> bool {
        self.category.is_all() && self.zone.is_all() && self.store.is_all()
    }

    /// Number of dimensional selectors narrowing the subset.
    #[must_use]
    pub fn active_count(&self) -> usize {
        [&self.category, &self.zone, &self.store]
            .into_iter()
            .filter(|selector| !selector.is_all())
            .count()
    }
}

/// Direction indicator shown next to a KPI value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// How a metric's trend is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Sums and ratios; the trend follows the sign of the change.
    Rate,
    /// Ratios centered on 1.0; the trend follows the value itself.
    Index,
}

/// One KPI card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    /// Computed from the current filtered subset.
    pub value: f64,
    /// Period-over-period change in percent.
    pub change_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<f64>,
    /// Chronological history; its length is fixed per metric.
    pub history: Vec<f64>,
    pub trend: Trend,
}

/// Scalar aggregates over one filtered store subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsetSummary {
    pub store_count: usize,
    /// Stores in the whole catalog, used for goal scaling.
    pub catalog_store_count: usize,
    pub total_sales: f64,
    pub total_traffic: f64,
    pub total_area: f64,
    /// Arithmetic mean over stores, not traffic weighted.
    pub avg_ticket: f64,
    pub avg_conversion: f64,
    pub sales_per_area: f64,
    pub sales_per_visitor: f64,
    /// Mean over stores with a positive index.
    pub attraction_index_avg: f64,
    /// Global goal scaled by the subset's share of the store count.
    pub scaled_goal: f64,
    /// Sales over the scaled goal, in percent.
    pub goal_attainment: f64,
}

/// Density thresholds for the operational bucket counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DensityThresholds {
    /// Densities above this are high.
    pub high: f64,
    /// Densities below this are low.
    pub low: f64,
}

impl Default for DensityThresholds {
    fn default() -> Self {
        Self {
            high: 0.8,
            low: 0.4,
        }
    }
}

/// Ratio bounds for the efficiency benchmark badges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenchmarkThresholds {
    pub above: f64,
    pub below: f64,
}

impl Default for BenchmarkThresholds {
    fn default() -> Self {
        Self {
            above: 1.0,
            below: 0.8,
        }
    }
}

/// Marketing view behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketingSettings {
    /// Scale campaign and attribution figures by the filtered subset's
    /// sales share. Off by default: those figures are mall-wide.
    pub follows_filter: bool,
    /// Per-store digital conversion is `conversion * factor + uplift`.
    pub digital_conversion_factor: f64,
    pub digital_conversion_uplift: f64,
}

impl Default for MarketingSettings {
    fn default() -> Self {
        Self {
            follows_filter: false,
            digital_conversion_factor: 0.8,
            digital_conversion_uplift: 1.0,
        }
    }
}

/// Tunable engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Mall-wide sales goal for one month, the period store figures
    /// cover.
    pub global_sales_goal: f64,
    pub density: DensityThresholds,
    /// Hours above this fraction of the busiest hour are peak hours.
    pub peak_hour_ratio: f64,
    pub top_stores: usize,
    pub top_zones: usize,
    pub top_campaigns: usize,
    pub benchmark: BenchmarkThresholds,
    pub marketing: MarketingSettings,
    /// Most dashboards the engine memoizes; `0` disables the memo.
    pub dashboard_cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global_sales_goal: 8_100_000.0,
            density: DensityThresholds::default(),
            peak_hour_ratio: 0.8,
            top_stores: 10,
            top_zones: 10,
            top_campaigns: 5,
            benchmark: BenchmarkThresholds::default(),
            marketing: MarketingSettings::default(),
            dashboard_cache_size: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn selector_parses_all_aliases() {
        assert_eq!(Selector::parse("all"), Selector::All);
        assert_eq!(Selector::parse("Todas"), Selector::All);
        assert_eq!(
            Selector::parse("Moda"),
            Selector::Only("Moda".to_string())
        );
    }

    #[test]
    fn filter_deserializes_from_presentation_shape() {
        let json = r#"{
            "category": "Moda",
            "zone": "all",
            "store": "all",
            "dateRange": { "from": "2025-03-01", "to": "2025-05-31" },
            "quickPeriod": "custom"
        }"#;
        let filter: Filter = serde_json::from_str(json).unwrap();
        assert_eq!(filter.category, Selector::Only("Moda".to_string()));
        assert!(filter.zone.is_all());
        assert_eq!(filter.quick_period, QuickPeriod::Custom);
        assert_eq!(filter.active_count(), 1);
        assert!(!filter.is_dimensional_identity());

        let back = serde_json::to_value(&filter).unwrap();
        assert_eq!(back["zone"], "all");
        assert_eq!(back["dateRange"]["to"], "2025-05-31");
    }

    #[test]
    fn default_filter_is_identity() {
        let filter = Filter::default();
        assert!(filter.is_dimensional_identity());
        assert_eq!(filter.active_count(), 0);
        assert_eq!(filter.quick_period, QuickPeriod::CurrentMonth);
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2025, 5, 2), date(2025, 5, 1)).is_none());
        assert!(DateRange::new(date(2025, 5, 1), date(2025, 5, 1)).is_some());
    }

    #[test]
    fn inverted_date_range_fails_to_deserialize() {
        let json = r#"{
            "category": "all",
            "zone": "all",
            "store": "all",
            "dateRange": { "from": "2025-12-31", "to": "2025-01-01" },
            "quickPeriod": "custom"
        }"#;
        let err = serde_json::from_str::<Filter>(json).unwrap_err();
        assert!(err.to_string().contains("after it ends"), "unexpected error: {err}");

        let single_day: DateRange =
            serde_json::from_str(r#"{ "from": "2025-05-01", "to": "2025-05-01" }"#).unwrap();
        assert_eq!(single_day.from, single_day.to);
    }

    #[test]
    fn month_overlap_includes_partial_months() {
        let range = DateRange::new(date(2025, 3, 15), date(2025, 4, 2)).unwrap();
        assert!(!range.overlaps_month(date(2025, 2, 1)));
        assert!(range.overlaps_month(date(2025, 3, 1)));
        assert!(range.overlaps_month(date(2025, 4, 1)));
        assert!(!range.overlaps_month(date(2025, 5, 1)));
    }

    #[test]
    fn quick_periods_resolve_relative_to_today() {
        let today = date(2025, 2, 14);
        let month = QuickPeriod::CurrentMonth.date_range(today).unwrap();
        assert_eq!(month.from, date(2025, 2, 1));
        assert_eq!(month.to, date(2025, 2, 28));

        let week = QuickPeriod::Last7Days.date_range(today).unwrap();
        assert_eq!(week.from, date(2025, 2, 7));
        assert_eq!(week.to, today);

        let ytd = QuickPeriod::YearToDate.date_range(today).unwrap();
        assert_eq!(ytd.from, date(2025, 1, 1));

        assert!(QuickPeriod::Custom.date_range(today).is_none());
    }

    #[test]
    fn explicit_range_marks_filter_custom() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        let filter = Filter::default().with_date_range(range);
        assert_eq!(filter.quick_period, QuickPeriod::Custom);
        assert_eq!(filter.date_range, Some(range));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "topStores": 3, "density": { "high": 0.9 } }"#).unwrap();
        assert_eq!(config.top_stores, 3);
        assert!((config.density.high - 0.9).abs() < f64::EPSILON);
        assert!((config.density.low - 0.4).abs() < f64::EPSILON);
        assert!(!config.marketing.follows_filter);
    }
}
