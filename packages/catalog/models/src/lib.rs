#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Store, zone and time-series record types for the mall catalog.
//!
//! This crate defines the tenant-mix taxonomy (categories and zones) and
//! the read-only records the analytics engine aggregates over. Nothing
//! here performs any computation beyond trivial per-record accessors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Tenant-mix category of a store.
///
/// The display form (`"Moda"`, `"Electrónica"`, ...) is the value the
/// presentation layer puts into category filters.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum StoreCategory {
    /// Apparel and department stores
    #[serde(rename = "Moda")]
    #[strum(serialize = "Moda")]
    Fashion,
    /// Restaurants, cafes and food-court counters
    #[serde(rename = "Restaurantes")]
    #[strum(serialize = "Restaurantes")]
    Restaurants,
    /// Consumer electronics
    #[serde(rename = "Electrónica")]
    #[strum(serialize = "Electrónica")]
    Electronics,
    /// Cinemas and leisure
    #[serde(rename = "Entretenimiento")]
    #[strum(serialize = "Entretenimiento")]
    Entertainment,
    /// Home improvement and furnishing
    #[serde(rename = "Hogar")]
    #[strum(serialize = "Hogar")]
    Home,
    /// Banks, telecom and other service counters
    #[serde(rename = "Servicios")]
    #[strum(serialize = "Servicios")]
    Services,
    /// Cosmetics and personal care
    #[serde(rename = "Belleza")]
    #[strum(serialize = "Belleza")]
    Beauty,
    /// Sportswear and equipment
    #[serde(rename = "Deportes")]
    #[strum(serialize = "Deportes")]
    Sports,
}

impl StoreCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fashion,
            Self::Restaurants,
            Self::Electronics,
            Self::Entertainment,
            Self::Home,
            Self::Services,
            Self::Beauty,
            Self::Sports,
        ]
    }
}

/// Leasing zone of the mall a store is located in.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum MallZone {
    #[serde(rename = "Primer Piso - Norte")]
    #[strum(serialize = "Primer Piso - Norte")]
    FirstFloorNorth,
    #[serde(rename = "Primer Piso - Sur")]
    #[strum(serialize = "Primer Piso - Sur")]
    FirstFloorSouth,
    #[serde(rename = "Primer Piso - Central")]
    #[strum(serialize = "Primer Piso - Central")]
    FirstFloorCentral,
    #[serde(rename = "Segundo Piso - Norte")]
    #[strum(serialize = "Segundo Piso - Norte")]
    SecondFloorNorth,
    #[serde(rename = "Segundo Piso - Sur")]
    #[strum(serialize = "Segundo Piso - Sur")]
    SecondFloorSouth,
    #[serde(rename = "Segundo Piso - Central")]
    #[strum(serialize = "Segundo Piso - Central")]
    SecondFloorCentral,
    #[serde(rename = "Tercer Piso - Norte")]
    #[strum(serialize = "Tercer Piso - Norte")]
    ThirdFloorNorth,
    #[serde(rename = "Tercer Piso - Sur")]
    #[strum(serialize = "Tercer Piso - Sur")]
    ThirdFloorSouth,
    #[serde(rename = "Food Court")]
    #[strum(serialize = "Food Court")]
    FoodCourt,
    /// Large-format anchor tenants
    #[serde(rename = "Zona Ancla")]
    #[strum(serialize = "Zona Ancla")]
    AnchorZone,
}

impl MallZone {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::FirstFloorNorth,
            Self::FirstFloorSouth,
            Self::FirstFloorCentral,
            Self::SecondFloorNorth,
            Self::SecondFloorSouth,
            Self::SecondFloorCentral,
            Self::ThirdFloorNorth,
            Self::ThirdFloorSouth,
            Self::FoodCourt,
            Self::AnchorZone,
        ]
    }
}

/// One leasable retail unit and its metrics for the reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Unique store id.
    pub id: u32,
    /// Store name (the value used by store filters).
    pub name: String,
    /// Tenant-mix category.
    pub category: StoreCategory,
    /// Leasing zone.
    pub zone: MallZone,
    /// Leased area in square meters. Always positive.
    pub area_m2: f64,
    /// Period sales in soles.
    pub sales: f64,
    /// Period foot traffic (visitors counted at the store entrance).
    pub traffic: u64,
    /// Conversion rate in percent (0-100).
    pub conversion: f64,
    /// Average ticket in soles.
    pub avg_ticket: f64,
    /// Store traffic over the average traffic of its category peers.
    /// Zero when the store has no category baseline.
    pub attraction_index: f64,
}

impl Store {
    /// Sales per leased square meter, or `0.0` for a zero-area record.
    #[must_use]
    pub fn sales_per_area(&self) -> f64 {
        if self.area_m2 > 0.0 {
            self.sales / self.area_m2
        } else {
            0.0
        }
    }

    /// Whether the store records any sales at all. Service counters such
    /// as bank kiosks report traffic but no transactions.
    #[must_use]
    pub fn is_transacting(&self) -> bool {
        self.sales > 0.0
    }
}

/// Mall-wide sales for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// First day of the month.
    pub month: NaiveDate,
    /// Short label (e.g. `"Ene 2025"`).
    pub label: String,
    /// Realized sales.
    pub sales: f64,
    /// Sales goal for the month.
    pub goal: f64,
    /// Visitors counted at the mall entrances.
    pub visitors: u64,
}

/// A density sample for one area of the heat map.
///
/// Heat-map areas are not leasing zones; `covers` is the declared
/// relation between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatZone {
    /// Area label (e.g. `"Pasillo Central P1"`).
    pub label: String,
    /// Horizontal position on the floor plan, in percent.
    pub x: f64,
    /// Vertical position on the floor plan, in percent.
    pub y: f64,
    /// Occupancy density (0-1).
    pub density: f64,
    /// Average dwell time in minutes.
    pub avg_dwell_minutes: f64,
    /// Leasing zones this area belongs to.
    #[serde(default)]
    pub covers: Vec<MallZone>,
}

/// Visitors counted during one opening hour of a typical day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyTraffic {
    /// Hour of day (24h clock) the sample starts at.
    pub hour: u8,
    /// Visitors in that hour.
    pub traffic: u64,
}

impl HourlyTraffic {
    /// Label in `HH:00` form.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Static reference figures for one KPI card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiBaseline {
    /// Reference value for the unfiltered mall.
    pub value: f64,
    /// Reference period-over-period change in percent.
    pub change: f64,
    /// Target, if the KPI has one.
    #[serde(default)]
    pub goal: Option<f64>,
    /// Chronological history. Length is fixed per KPI.
    #[serde(default)]
    pub history: Vec<f64>,
}

/// Baselines for the financial and efficiency KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreKpiBaselines {
    pub total_sales: KpiBaseline,
    pub avg_ticket: KpiBaseline,
    pub sales_per_visitor: KpiBaseline,
    pub total_traffic: KpiBaseline,
    pub sales_per_area: KpiBaseline,
    pub conversion: KpiBaseline,
    pub attraction_index: KpiBaseline,
}

/// Baselines for the marketing KPI cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingKpiBaselines {
    /// Share of engaged customers that purchased, in percent.
    pub omnichannel_conversion: KpiBaseline,
    pub digital_visits: KpiBaseline,
    /// Digital engagement over zone traffic.
    pub digital_attraction_index: KpiBaseline,
    /// Tickets preceded by a social "like" within seven days.
    pub attributed_sales: KpiBaseline,
    pub digital_ticket: KpiBaseline,
    pub organic_ticket: KpiBaseline,
}

/// One day of social engagement and the sales attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionPoint {
    pub day: NaiveDate,
    pub likes: u64,
    pub attributed_sales: f64,
}

/// A marketing campaign and its return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u32,
    pub name: String,
    /// Return on investment, in percent.
    pub roi: f64,
    pub attributed_sales: f64,
}

/// Marketing figures that are not tied to individual stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingData {
    pub kpis: MarketingKpiBaselines,
    /// Daily series, oldest first.
    #[serde(default)]
    pub attribution: Vec<AttributionPoint>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}
