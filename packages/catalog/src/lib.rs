#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only catalog of mall stores and the auxiliary series the
//! analytics engine reads.
//!
//! A [`Catalog`] is built once (normally from the TOML files embedded by
//! [`registry`]), validated, and then shared immutably by every
//! computation. Nothing in this crate mutates a catalog after
//! construction.

pub mod registry;
mod validate;

use mall_analytics_catalog_models::{
    HeatZone, HourlyTraffic, MallZone, MarketingData, MonthlySales, Store, StoreCategory,
    StoreKpiBaselines,
};
use thiserror::Error;

pub use registry::reference_catalog;

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog file is not valid TOML or does not match the schema.
    #[error("Failed to parse catalog file '{name}': {source}")]
    Toml {
        /// Which catalog file failed.
        name: String,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The catalog parsed but violates a data invariant.
    #[error("Invalid catalog: {message}")]
    Validation {
        /// Description of the violated invariant.
        message: String,
    },
}

/// Raw parts of a catalog before validation.
#[derive(Debug, Clone, Default)]
pub struct CatalogParts {
    pub stores: Vec<Store>,
    pub months: Vec<MonthlySales>,
    pub heat_zones: Vec<HeatZone>,
    pub hourly: Vec<HourlyTraffic>,
    pub store_kpis: StoreKpiBaselines,
    pub marketing: MarketingData,
}

/// The validated, immutable mall catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    stores: Vec<Store>,
    months: Vec<MonthlySales>,
    heat_zones: Vec<HeatZone>,
    hourly: Vec<HourlyTraffic>,
    store_kpis: StoreKpiBaselines,
    marketing: MarketingData,
}

impl Catalog {
    /// Validates `parts` and builds a catalog from them.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if any store, series or
    /// baseline violates a catalog invariant.
    pub fn new(parts: CatalogParts) -> Result<Self, CatalogError> {
        validate::validate(&parts)?;

        log::info!(
            "Loaded catalog: {} stores, {} months, {} heat-map zones, {} hourly samples, {} campaigns",
            parts.stores.len(),
            parts.months.len(),
            parts.heat_zones.len(),
            parts.hourly.len(),
            parts.marketing.campaigns.len(),
        );

        Ok(Self {
            stores: parts.stores,
            months: parts.months,
            heat_zones: parts.heat_zones,
            hourly: parts.hourly,
            store_kpis: parts.store_kpis,
            marketing: parts.marketing,
        })
    }

    /// All stores, in catalog order.
    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Monthly mall-wide sales, oldest first.
    #[must_use]
    pub fn months(&self) -> &[MonthlySales] {
        &self.months
    }

    /// Heat-map density samples.
    #[must_use]
    pub fn heat_zones(&self) -> &[HeatZone] {
        &self.heat_zones
    }

    /// Visitors per opening hour, earliest first.
    #[must_use]
    pub fn hourly(&self) -> &[HourlyTraffic] {
        &self.hourly
    }

    #[must_use]
    pub const fn store_kpis(&self) -> &StoreKpiBaselines {
        &self.store_kpis
    }

    #[must_use]
    pub const fn marketing(&self) -> &MarketingData {
        &self.marketing
    }

    /// Heat-map zones declared as covering `zone`.
    pub fn heat_zones_covering(&self, zone: MallZone) -> impl Iterator<Item = &HeatZone> {
        self.heat_zones
            .iter()
            .filter(move |heat| heat.covers.contains(&zone))
    }

    /// Resolves a zone display name, ignoring case.
    #[must_use]
    pub fn zone_named(name: &str) -> Option<MallZone> {
        MallZone::all()
            .iter()
            .copied()
            .find(|zone| eq_folded(zone.as_ref(), name))
    }

    /// Resolves a category display name, ignoring case.
    #[must_use]
    pub fn category_named(name: &str) -> Option<StoreCategory> {
        StoreCategory::all()
            .iter()
            .copied()
            .find(|category| eq_folded(category.as_ref(), name))
    }

    /// Whether a store with this name (ignoring case) is in the catalog.
    #[must_use]
    pub fn has_store_named(&self, name: &str) -> bool {
        self.stores.iter().any(|store| eq_folded(&store.name, name))
    }
}

/// Case-insensitive equality that also folds non-ASCII letters
/// (`"ELECTRÓNICA"` equals `"electrónica"`).
#[must_use]
pub fn eq_folded(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
