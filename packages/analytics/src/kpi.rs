//! Turns fresh subset values into KPI cards.
//!
//! The value of a card always comes from the filtered subset. For the
//! unfiltered mall the history and change come from the catalog
//! baseline. For any narrower filter the baseline history is rescaled by
//! the subset's share of the metric. Stores carry no previous-period
//! figures, so a non-empty subset reports the mall's period-over-period
//! change and an empty one reports none. Identical inputs always produce
//! identical cards.

use mall_analytics_analytics_models::{Filter, Kpi, MetricKind, SubsetSummary, Trend};
use mall_analytics_catalog_models::KpiBaseline;

use crate::aggregate::ratio;

/// Percent change from `previous` to `current`, or `0.0` without a
/// previous value.
#[must_use]
pub fn change_percent(current: f64, previous: f64) -> f64 {
    ratio(current - previous, previous.abs()) * 100.0
}

/// Classifies the direction of a metric.
///
/// Rate metrics follow the sign of `change`. Index metrics compare
/// `value` with 1.0. An empty subset is always neutral.
#[must_use]
pub fn classify_trend(kind: MetricKind, value: f64, change: f64, empty: bool) -> Trend {
    if empty {
        return Trend::Neutral;
    }
    let (measure, boundary) = match kind {
        MetricKind::Rate => (change, 0.0),
        MetricKind::Index => (value, 1.0),
    };
    if measure > boundary {
        Trend::Up
    } else if measure < boundary {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// How the current filter relates to the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiScope {
    /// No dimensional selector is narrowing the subset.
    pub identity: bool,
    /// The subset has no stores.
    pub empty: bool,
    /// Subset store count over catalog store count.
    pub store_share: f64,
}

impl KpiScope {
    #[must_use]
    pub fn new(filter: &Filter, summary: &SubsetSummary) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let store_share = ratio(
            summary.store_count as f64,
            summary.catalog_store_count as f64,
        );
        Self {
            identity: filter.is_dimensional_identity(),
            empty: summary.store_count == 0,
            store_share,
        }
    }

    /// Scope for figures that are mall-wide regardless of the filter.
    #[must_use]
    pub const fn mall_wide() -> Self {
        Self {
            identity: true,
            empty: false,
            store_share: 1.0,
        }
    }
}

/// Builds a card for an intensive metric (a ratio or average). The goal
/// is kept as is.
///
/// `reference` is the same metric computed over the whole catalog.
#[must_use]
pub fn derive_kpi(
    baseline: &KpiBaseline,
    value: f64,
    reference: f64,
    kind: MetricKind,
    scope: KpiScope,
) -> Kpi {
    let history = if scope.identity {
        baseline.history.clone()
    } else {
        let scale = ratio(value, reference);
        baseline.history.iter().map(|point| point * scale).collect()
    };
    let change = if scope.empty { 0.0 } else { baseline.change };

    Kpi {
        value,
        change_percent: change,
        goal: baseline.goal,
        trend: classify_trend(kind, value, change, scope.empty),
        history,
    }
}

/// Builds a card for an extensive metric (a sum over stores). The goal is
/// scaled by the subset's share of the store count.
#[must_use]
pub fn derive_extensive_kpi(
    baseline: &KpiBaseline,
    value: f64,
    reference: f64,
    scope: KpiScope,
) -> Kpi {
    let mut kpi = derive_kpi(baseline, value, reference, MetricKind::Rate, scope);
    kpi.goal = kpi.goal.map(|goal| goal * scope.store_share);
    kpi
}
