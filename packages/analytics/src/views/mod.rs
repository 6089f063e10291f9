//! Projectors from a filtered subset to the record each dashboard needs.
//!
//! All four projectors read the same [`ViewInput`], so the predicate and
//! the aggregates are computed once per filter and shared.

pub mod efficiency;
pub mod financial;
pub mod marketing;
pub mod operational;

use mall_analytics_analytics_models::{EngineConfig, Filter, SubsetSummary};
use mall_analytics_catalog::Catalog;
use mall_analytics_catalog_models::Store;

use crate::{
    aggregate::{ratio, summarize},
    filter::filtered_subset,
    kpi::KpiScope,
};

/// Everything a projector reads for one filter.
#[derive(Debug)]
pub struct ViewInput<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a EngineConfig,
    pub filter: &'a Filter,
    /// Stores passing the filter, in catalog order.
    pub subset: Vec<&'a Store>,
    pub summary: SubsetSummary,
    /// The same aggregates over the whole catalog.
    pub reference: SubsetSummary,
}

impl<'a> ViewInput<'a> {
    /// Filters `catalog` and aggregates both the subset and the whole
    /// catalog.
    #[must_use]
    pub fn new(catalog: &'a Catalog, config: &'a EngineConfig, filter: &'a Filter) -> Self {
        let subset = filtered_subset(catalog, filter);
        let all: Vec<&Store> = catalog.stores().iter().collect();
        let catalog_len = all.len();
        let summary = summarize(&subset, catalog_len, config.global_sales_goal);
        let reference = summarize(&all, catalog_len, config.global_sales_goal);

        Self {
            catalog,
            config,
            filter,
            subset,
            summary,
            reference,
        }
    }

    #[must_use]
    pub fn scope(&self) -> KpiScope {
        KpiScope::new(self.filter, &self.summary)
    }

    /// Subset sales over catalog sales.
    #[must_use]
    pub fn sales_share(&self) -> f64 {
        if self.filter.is_dimensional_identity() {
            1.0
        } else {
            ratio(self.summary.total_sales, self.reference.total_sales)
        }
    }

    /// Subset traffic over catalog traffic.
    #[must_use]
    pub fn traffic_share(&self) -> f64 {
        if self.filter.is_dimensional_identity() {
            1.0
        } else {
            ratio(self.summary.total_traffic, self.reference.total_traffic)
        }
    }
}

#[cfg(test)]
mod tests {
    use mall_analytics_catalog::reference_catalog;

    use super::*;

    #[test]
    fn identity_shares_are_exactly_one() {
        let catalog = reference_catalog().unwrap();
        let config = EngineConfig::default();
        let filter = Filter::default();
        let input = ViewInput::new(&catalog, &config, &filter);
        assert!((input.sales_share() - 1.0).abs() < f64::EPSILON);
        assert!((input.traffic_share() - 1.0).abs() < f64::EPSILON);
        assert_eq!(input.summary, input.reference);
    }

    #[test]
    fn shares_follow_the_subset() {
        let catalog = reference_catalog().unwrap();
        let config = EngineConfig::default();
        let filter = Filter::default().with_category("Moda");
        let input = ViewInput::new(&catalog, &config, &filter);
        assert!((input.sales_share() - 3_173_000.0 / 7_872_000.0).abs() < 1e-12);
        assert!(!input.scope().identity);
        assert!((input.scope().store_share - 0.3).abs() < 1e-12);
    }
}
