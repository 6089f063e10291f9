//! Compile-time registry of the reference catalog.
//!
//! Each catalog file is a `(name, toml_content)` pair embedded via
//! `include_str!`. [`parse_catalog`] accepts the same four documents from
//! anywhere, so callers can load an alternative catalog from disk.

use mall_analytics_catalog_models::{
    HeatZone, HourlyTraffic, MarketingData, MonthlySales, Store, StoreKpiBaselines,
};
use serde::Deserialize;

use crate::{Catalog, CatalogError, CatalogParts};

const STORES_TOML: (&str, &str) = ("stores", include_str!("../data/stores.toml"));
const SERIES_TOML: (&str, &str) = ("series", include_str!("../data/series.toml"));
const BASELINES_TOML: (&str, &str) = ("baselines", include_str!("../data/baselines.toml"));
const MARKETING_TOML: (&str, &str) = ("marketing", include_str!("../data/marketing.toml"));

#[derive(Debug, Deserialize)]
struct StoresFile {
    stores: Vec<Store>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesFile {
    months: Vec<MonthlySales>,
    #[serde(default)]
    heat_zones: Vec<HeatZone>,
    #[serde(default)]
    hourly: Vec<HourlyTraffic>,
}

/// The four TOML documents that make up a catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSources<'a> {
    /// `[[stores]]` roster.
    pub stores: &'a str,
    /// `[[months]]`, `[[heatZones]]` and `[[hourly]]` series.
    pub series: &'a str,
    /// Financial and efficiency KPI baselines.
    pub baselines: &'a str,
    /// Marketing KPI baselines, attribution series and campaigns.
    pub marketing: &'a str,
}

impl CatalogSources<'static> {
    /// The documents embedded in this crate.
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            stores: STORES_TOML.1,
            series: SERIES_TOML.1,
            baselines: BASELINES_TOML.1,
            marketing: MARKETING_TOML.1,
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(name: &str, toml_str: &str) -> Result<T, CatalogError> {
    toml::de::from_str(toml_str).map_err(|source| CatalogError::Toml {
        name: name.to_string(),
        source,
    })
}

/// Parses and validates a catalog from its four TOML documents.
///
/// # Errors
///
/// Returns [`CatalogError::Toml`] if a document fails to parse and
/// [`CatalogError::Validation`] if the parsed data is inconsistent.
pub fn parse_catalog(sources: CatalogSources<'_>) -> Result<Catalog, CatalogError> {
    let stores: StoresFile = parse(STORES_TOML.0, sources.stores)?;
    let series: SeriesFile = parse(SERIES_TOML.0, sources.series)?;
    let store_kpis: StoreKpiBaselines = parse(BASELINES_TOML.0, sources.baselines)?;
    let marketing: MarketingData = parse(MARKETING_TOML.0, sources.marketing)?;

    Catalog::new(CatalogParts {
        stores: stores.stores,
        months: series.months,
        heat_zones: series.heat_zones,
        hourly: series.hourly,
        store_kpis,
        marketing,
    })
}

/// Loads the reference catalog embedded at compile time.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the embedded files are malformed, which
/// indicates a development error caught by this crate's tests.
pub fn reference_catalog() -> Result<Catalog, CatalogError> {
    parse_catalog(CatalogSources::embedded())
}
