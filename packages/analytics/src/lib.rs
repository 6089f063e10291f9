#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter-and-aggregate engine behind the mall analytics dashboards.
//!
//! Data flows one way: the [`filter`] predicate selects a store subset
//! from the catalog, [`aggregate`] reduces it to scalar figures, [`kpi`]
//! turns those into KPI cards, and the [`views`] projectors assemble one
//! record per dashboard. [`Engine`] ties the steps together and memoizes
//! whole dashboards by filter.
//!
//! Every computation is pure over the immutable catalog. Degenerate
//! arithmetic (empty subsets, zero denominators) resolves to `0.0`; only
//! loading a catalog or configuration can fail.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod filter;
pub mod kpi;
pub mod views;

use mall_analytics_catalog::CatalogError;
use thiserror::Error;

pub use engine::Engine;

/// Errors raised while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid TOML or does not match the schema.
    #[error("Failed to parse engine config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A parameter is out of range.
    #[error("Invalid engine config: {message}")]
    Invalid {
        /// Which parameter is wrong and why.
        message: String,
    },
}

/// Errors that can occur while constructing an [`Engine`].
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The catalog failed to load.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The engine configuration failed to load.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
