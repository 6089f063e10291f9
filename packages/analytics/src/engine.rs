//! The engine facade the presentation layer talks to.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use mall_analytics_analytics_models::{
    Dashboard, EfficiencyView, EngineConfig, FinancialView, Filter, MarketingView,
    OperationalView, Selector, SubsetSummary,
};
use mall_analytics_catalog::{Catalog, reference_catalog};
use mall_analytics_catalog_models::Store;

use crate::{
    AnalyticsError, config,
    filter::filtered_subset,
    views::{ViewInput, efficiency, financial, marketing, operational},
};

/// Selectors match case-insensitively, so the memo keys on their folded
/// form.
fn memo_key(filter: &Filter) -> Filter {
    let fold = |selector: &Selector| match selector {
        Selector::All => Selector::All,
        Selector::Only(value) => Selector::Only(value.to_lowercase()),
    };
    Filter {
        category: fold(&filter.category),
        zone: fold(&filter.zone),
        store: fold(&filter.store),
        date_range: filter.date_range,
        quick_period: filter.quick_period,
    }
}

/// Computes dashboard views over an immutable catalog.
///
/// Every method is a pure function of the catalog, the configuration and
/// the filter. [`Engine::dashboard`] additionally memoizes up to
/// `dashboard_cache_size` results; the memo is guarded by a `Mutex` so an
/// `Engine` can be shared across threads.
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    config: EngineConfig,
    dashboards: Mutex<BTreeMap<Filter, Arc<Dashboard>>>,
}

impl Engine {
    #[must_use]
    pub const fn new(catalog: Catalog, config: EngineConfig) -> Self {
        Self {
            catalog,
            config,
            dashboards: Mutex::new(BTreeMap::new()),
        }
    }

    /// Builds an engine over the embedded reference catalog and the
    /// embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] if either embedded document fails to
    /// load.
    pub fn with_reference_catalog() -> Result<Self, AnalyticsError> {
        Ok(Self::new(reference_catalog()?, config::embedded()?))
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn input<'a>(&'a self, filter: &'a Filter) -> ViewInput<'a> {
        ViewInput::new(&self.catalog, &self.config, filter)
    }

    /// Stores passing `filter`, in catalog order.
    #[must_use]
    pub fn subset(&self, filter: &Filter) -> Vec<&Store> {
        filtered_subset(&self.catalog, filter)
    }

    /// Scalar aggregates over the stores passing `filter`.
    #[must_use]
    pub fn summary(&self, filter: &Filter) -> SubsetSummary {
        self.input(filter).summary
    }

    #[must_use]
    pub fn financial(&self, filter: &Filter) -> FinancialView {
        financial::project(&self.input(filter))
    }

    #[must_use]
    pub fn efficiency(&self, filter: &Filter) -> EfficiencyView {
        efficiency::project(&self.input(filter))
    }

    #[must_use]
    pub fn operational(&self, filter: &Filter) -> OperationalView {
        operational::project(&self.input(filter))
    }

    #[must_use]
    pub fn marketing(&self, filter: &Filter) -> MarketingView {
        marketing::project(&self.input(filter))
    }

    fn memo(&self) -> MutexGuard<'_, BTreeMap<Filter, Arc<Dashboard>>> {
        // The map only ever holds complete entries, so a poisoned lock
        // still guards consistent data.
        self.dashboards
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// All four views for `filter`, computed once per distinct filter while
    /// the memo has room.
    #[must_use]
    pub fn dashboard(&self, filter: &Filter) -> Arc<Dashboard> {
        let key = memo_key(filter);
        if let Some(cached) = self.memo().get(&key) {
            log::trace!("Dashboard cache hit for {filter:?}");
            return Arc::clone(cached);
        }

        let input = self.input(filter);
        let dashboard = Arc::new(Dashboard {
            financial: financial::project(&input),
            efficiency: efficiency::project(&input),
            operational: operational::project(&input),
            marketing: marketing::project(&input),
        });

        let mut memo = self.memo();
        if !memo.contains_key(&key) && memo.len() >= self.config.dashboard_cache_size {
            log::debug!(
                "Dashboard memo is full ({} entries), not caching {filter:?}",
                memo.len()
            );
            return dashboard;
        }
        Arc::clone(memo.entry(key).or_insert(dashboard))
    }

    /// Drops every memoized dashboard.
    pub fn clear_cache(&self) {
        let mut memo = self.memo();
        log::debug!("Clearing {} memoized dashboards", memo.len());
        memo.clear();
    }

    /// Number of memoized dashboards.
    #[must_use]
    pub fn cached_dashboards(&self) -> usize {
        self.memo().len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mall_analytics_analytics_models::DateRange;

    use super::*;

    fn engine() -> Engine {
        Engine::with_reference_catalog().unwrap()
    }

    #[test]
    fn reference_scenario_totals() {
        let engine = engine();
        let summary = engine.summary(&Filter::default());
        assert_eq!(summary.store_count, 20);
        assert!((summary.total_sales - 7_872_000.0).abs() < 1e-6);

        let fashion = Filter::default().with_category("Moda");
        assert_eq!(engine.subset(&fashion).len(), 6);
        let summary = engine.summary(&fashion);
        assert!((summary.sales_per_area - 3_173_000.0 / 5_630.0).abs() < 1e-9);
    }

    #[test]
    fn nonexistent_category_zeroes_every_ratio() {
        let engine = engine();
        let filter = Filter::default().with_category("NonExistent");
        let dashboard = engine.dashboard(&filter);
        let financial = &dashboard.financial;
        for value in [
            financial.total_sales.value,
            financial.avg_ticket.value,
            financial.sales_per_visitor.value,
            financial.conversion.value,
            financial.sales_per_area.value,
            financial.goal_attainment.value,
            dashboard.efficiency.attraction_index.value,
        ] {
            assert!(value.is_finite());
            assert!(value.abs() < f64::EPSILON);
        }
        let json = serde_json::to_string(&*dashboard).unwrap();
        assert!(!json.contains("NaN"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let engine = engine();
        let filter = Filter::default()
            .with_zone("Primer Piso - Norte")
            .with_category("Moda");
        let first = engine.dashboard(&filter);
        engine.clear_cache();
        let second = engine.dashboard(&filter);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&*first).unwrap(),
            serde_json::to_string(&*second).unwrap()
        );
    }

    #[test]
    fn dashboards_are_memoized_per_filter() {
        let engine = engine();
        let filter = Filter::default().with_store("Zara");
        let first = engine.dashboard(&filter);
        let second = engine.dashboard(&filter);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.cached_dashboards(), 1);

        let _unfiltered = engine.dashboard(&Filter::default());
        assert_eq!(engine.cached_dashboards(), 2);

        engine.clear_cache();
        assert_eq!(engine.cached_dashboards(), 0);
    }

    #[test]
    fn selector_case_variants_share_a_memo_entry() {
        let engine = engine();
        let first = engine.dashboard(&Filter::default().with_category("Moda"));
        let second = engine.dashboard(&Filter::default().with_category("MODA"));
        let third = engine.dashboard(&Filter::default().with_category("moda"));
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(engine.cached_dashboards(), 1);
    }

    #[test]
    fn memo_stops_growing_at_its_capacity() {
        let catalog = reference_catalog().unwrap();
        let config = EngineConfig {
            dashboard_cache_size: 2,
            ..EngineConfig::default()
        };
        let engine = Engine::new(catalog, config);
        for store in ["Zara", "H&M", "Ripley", "Unknown 1", "Unknown 2"] {
            let _dashboard = engine.dashboard(&Filter::default().with_store(store));
        }
        assert_eq!(engine.cached_dashboards(), 2);

        let zara = Filter::default().with_store("Zara");
        assert!(Arc::ptr_eq(&engine.dashboard(&zara), &engine.dashboard(&zara)));

        let ripley = Filter::default().with_store("Ripley");
        let fresh = engine.dashboard(&ripley);
        assert!(!Arc::ptr_eq(&fresh, &engine.dashboard(&ripley)));
        assert_eq!(*fresh, *engine.dashboard(&ripley));
    }

    #[test]
    fn memoized_dashboard_matches_individual_views() {
        let engine = engine();
        let filter = Filter::default().with_category("Restaurantes");
        let dashboard = engine.dashboard(&filter);
        assert_eq!(dashboard.financial, engine.financial(&filter));
        assert_eq!(dashboard.efficiency, engine.efficiency(&filter));
        assert_eq!(dashboard.operational, engine.operational(&filter));
        assert_eq!(dashboard.marketing, engine.marketing(&filter));
    }

    #[test]
    fn date_range_changes_series_but_not_subset() {
        let engine = engine();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
        .unwrap();
        let ranged = Filter::default().with_date_range(range);
        assert_eq!(engine.subset(&ranged).len(), 20);
        assert_eq!(engine.financial(&ranged).sales_trend.len(), 2);
        assert_eq!(
            engine.summary(&ranged),
            engine.summary(&Filter::default())
        );
    }

    #[test]
    fn filtered_kpis_are_deterministic_and_fixed_length() {
        let engine = engine();
        let filter = Filter::default().with_category("Electrónica");
        let view = engine.financial(&filter);
        assert_eq!(view.total_sales.history.len(), 12);
        assert_eq!(view, engine.financial(&filter));
    }

    #[test]
    fn applying_a_filter_keeps_the_reported_change() {
        let engine = engine();
        let identity = engine.financial(&Filter::default()).total_sales;
        for filter in [
            Filter::default().with_category("Moda"),
            Filter::default().with_store("Zara"),
            Filter::default().with_category("Hogar"),
        ] {
            let kpi = engine.financial(&filter).total_sales;
            assert!(
                (kpi.change_percent - identity.change_percent).abs() < f64::EPSILON,
                "{filter:?} reported {}",
                kpi.change_percent
            );
            assert_eq!(kpi.trend, identity.trend);
        }

        let empty = engine
            .financial(&Filter::default().with_category("NonExistent"))
            .total_sales;
        assert!(empty.change_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = Arc::new(engine());
        let handles: Vec<_> = ["Moda", "Hogar", "Belleza"]
            .into_iter()
            .map(|category| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    engine
                        .dashboard(&Filter::default().with_category(category))
                        .financial
                        .store_count
                })
            })
            .collect();
        let counts: Vec<usize> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(counts, vec![6, 2, 2]);
        assert_eq!(engine.cached_dashboards(), 3);
    }
}
