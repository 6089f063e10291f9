//! The single store predicate shared by every view.
//!
//! Selectors compare case-insensitively against the store's category
//! name, zone name and store name. A selector naming a value that does
//! not exist simply matches nothing. The date range never removes
//! stores; it only restricts time series.

use mall_analytics_analytics_models::{DateRange, Filter, Selector};
use mall_analytics_catalog::{Catalog, eq_folded};
use mall_analytics_catalog_models::{MonthlySales, Store};

fn selects(selector: &Selector, value: &str) -> bool {
    selector
        .value()
        .is_none_or(|wanted| eq_folded(wanted, value))
}

/// Whether `store` passes every dimensional selector of `filter`.
#[must_use]
pub fn matches(store: &Store, filter: &Filter) -> bool {
    selects(&filter.category, store.category.as_ref())
        && selects(&filter.zone, store.zone.as_ref())
        && selects(&filter.store, &store.name)
}

/// Selector values in `filter` that name nothing in `catalog`, as
/// `(dimension, value)` pairs.
#[must_use]
pub fn unknown_selectors<'a>(
    catalog: &Catalog,
    filter: &'a Filter,
) -> Vec<(&'static str, &'a str)> {
    let mut unknown = Vec::new();
    if let Some(category) = filter.category.value()
        && Catalog::category_named(category).is_none()
    {
        unknown.push(("category", category));
    }
    if let Some(zone) = filter.zone.value()
        && Catalog::zone_named(zone).is_none()
    {
        unknown.push(("zone", zone));
    }
    if let Some(store) = filter.store.value()
        && !catalog.has_store_named(store)
    {
        unknown.push(("store", store));
    }
    unknown
}

/// The stores of `catalog` that match `filter`, in catalog order.
#[must_use]
pub fn filtered_subset<'a>(catalog: &'a Catalog, filter: &Filter) -> Vec<&'a Store> {
    for (dimension, value) in unknown_selectors(catalog, filter) {
        log::warn!("Filter {dimension} '{value}' matches nothing in the catalog");
    }

    catalog
        .stores()
        .iter()
        .filter(|store| matches(store, filter))
        .collect()
}

/// Months whose calendar span overlaps `range`; every month when there is
/// no range.
pub fn months_in_range(
    months: &[MonthlySales],
    range: Option<DateRange>,
) -> impl Iterator<Item = &MonthlySales> {
    months
        .iter()
        .filter(move |month| range.is_none_or(|range| range.overlaps_month(month.month)))
}
