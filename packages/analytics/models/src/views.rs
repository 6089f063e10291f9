//! Result records for the four dashboard views.

use chrono::NaiveDate;
use mall_analytics_catalog_models::{MallZone, StoreCategory};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::Kpi;

/// A store in the financial top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSales {
    pub store_id: u32,
    pub name: String,
    pub category: StoreCategory,
    pub sales: f64,
}

/// Sales of the filtered stores located in one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSales {
    pub zone: MallZone,
    pub sales: f64,
    pub store_count: usize,
}

/// One month of the sales trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub label: String,
    pub sales: f64,
    pub goal: f64,
    pub visitors: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialView {
    pub store_count: usize,
    pub total_sales: Kpi,
    pub avg_ticket: Kpi,
    pub sales_per_visitor: Kpi,
    pub total_traffic: Kpi,
    pub conversion: Kpi,
    pub sales_per_area: Kpi,
    /// Sales over the subset-scaled goal, in percent.
    pub goal_attainment: Kpi,
    pub top_stores: Vec<StoreSales>,
    pub sales_by_zone: Vec<ZoneSales>,
    pub sales_trend: Vec<MonthlyPoint>,
    /// Mean monthly goal over `sales_trend`, drawn as a reference line.
    pub average_goal: f64,
}

/// Position of a store relative to the subset's mean traffic and sales.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Quadrant {
    /// High traffic, high sales.
    Anchor,
    /// High traffic that does not convert into sales.
    Inefficient,
    /// Low traffic, high sales.
    Niche,
    /// Low traffic, low sales.
    Underperforming,
}

impl Quadrant {
    /// Classifies a store against subset means. Anchor and inefficient
    /// require traffic strictly above the mean and sales strictly above
    /// or below it respectively.
    #[must_use]
    pub fn classify(traffic: f64, sales: f64, mean_traffic: f64, mean_sales: f64) -> Self {
        if traffic > mean_traffic {
            if sales > mean_sales {
                Self::Anchor
            } else if sales < mean_sales {
                Self::Inefficient
            } else {
                Self::Underperforming
            }
        } else if sales > mean_sales {
            Self::Niche
        } else {
            Self::Underperforming
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub store_id: u32,
    pub name: String,
    pub category: StoreCategory,
    pub traffic: f64,
    pub sales: f64,
    pub area_m2: f64,
    pub quadrant: Quadrant,
}

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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum BenchmarkBadge {
    Above,
    Average,
    Below,
}

/// One store metric compared with the subset average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub value: f64,
    /// `value` over the subset average, or 0 when the average is 0.
    pub ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<BenchmarkBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreBenchmark {
    pub store_id: u32,
    pub name: String,
    pub category: StoreCategory,
    pub sales: f64,
    pub sales_per_area: Benchmark,
    pub conversion: Benchmark,
    pub attraction_index: Benchmark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyView {
    pub store_count: usize,
    /// Stores with sales above zero.
    pub active_store_count: usize,
    pub sales_per_area: Kpi,
    pub conversion: Kpi,
    pub attraction_index: Kpi,
    pub total_traffic: Kpi,
    pub anchor_count: usize,
    pub inefficient_count: usize,
    pub mean_traffic: f64,
    pub mean_sales: f64,
    pub scatter: Vec<ScatterPoint>,
    pub benchmarks: Vec<StoreBenchmark>,
}

/// Which operational bucket a density falls in.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DensityBucket {
    High,
    Medium,
    Low,
}

/// Finer-grained density label shown on the heat map.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DensityLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl DensityLevel {
    #[must_use]
    pub fn of(density: f64) -> Self {
        if density > 0.8 {
            Self::VeryHigh
        } else if density > 0.6 {
            Self::High
        } else if density > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDensity {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub density: f64,
    pub avg_dwell_minutes: f64,
    pub bucket: DensityBucket,
    pub level: DensityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourPoint {
    pub hour: u8,
    /// `HH:00`.
    pub label: String,
    pub traffic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalView {
    pub store_count: usize,
    pub high_density_zones: usize,
    pub medium_density_zones: usize,
    pub low_density_zones: usize,
    /// Heat-map zones covering the selected leasing zone.
    pub zones: Vec<ZoneDensity>,
    /// The densest high-bucket zones, densest first.
    pub saturation_alerts: Vec<ZoneDensity>,
    pub avg_dwell_minutes: f64,
    pub peak_hour_count: usize,
    /// `None` when the hourly series is empty.
    pub peak_hour: Option<HourPoint>,
    pub quietest_hour: Option<HourPoint>,
    pub hourly: Vec<HourPoint>,
    pub morning_traffic: f64,
    pub afternoon_traffic: f64,
    pub evening_traffic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMarketing {
    pub store_id: u32,
    pub name: String,
    pub category: StoreCategory,
    pub zone: MallZone,
    /// Conversion of digitally engaged visitors, in percent.
    pub digital_conversion: f64,
    pub attraction_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRoi {
    pub id: u32,
    pub name: String,
    pub roi: f64,
    pub attributed_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionDay {
    pub day: NaiveDate,
    pub likes: f64,
    pub attributed_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingView {
    pub store_count: usize,
    /// Whether the figures below were scaled to the filtered subset.
    pub follows_filter: bool,
    pub omnichannel_conversion: Kpi,
    pub digital_visits: Kpi,
    pub digital_attraction_index: Kpi,
    pub attributed_sales: Kpi,
    pub digital_ticket: Kpi,
    pub organic_ticket: Kpi,
    /// Digital ticket over organic ticket, as a percent increase.
    pub digital_ticket_uplift: f64,
    pub stores: Vec<StoreMarketing>,
    pub top_campaigns: Vec<CampaignRoi>,
    pub attribution: Vec<AttributionDay>,
    pub total_attributed_sales: f64,
    /// Pearson correlation between daily likes and attributed sales.
    pub engagement_correlation: f64,
}

/// All four views computed for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub financial: FinancialView,
    pub efficiency: EfficiencyView,
    pub operational: OperationalView,
    pub marketing: MarketingView,
}
