//! Foot-traffic density and opening-hours dashboard.

use std::ops::RangeInclusive;

use mall_analytics_analytics_models::{
    DensityBucket, DensityLevel, DensityThresholds, HourPoint, OperationalView, ZoneDensity,
};
use mall_analytics_catalog::Catalog;
use mall_analytics_catalog_models::HeatZone;

use super::ViewInput;
use crate::aggregate::mean;

const SATURATION_ALERTS: usize = 3;
const MORNING: RangeInclusive<u8> = 10..=13;
const AFTERNOON: RangeInclusive<u8> = 14..=18;
const EVENING: RangeInclusive<u8> = 19..=22;

fn bucket(density: f64, thresholds: DensityThresholds) -> DensityBucket {
    if density > thresholds.high {
        DensityBucket::High
    } else if density < thresholds.low {
        DensityBucket::Low
    } else {
        DensityBucket::Medium
    }
}

/// Heat-map zones for the zone selector: all of them when unrestricted,
/// otherwise those declared as covering the selected leasing zone.
fn matched_zones<'a>(input: &ViewInput<'a>) -> Vec<&'a HeatZone> {
    let catalog = input.catalog;
    match input.filter.zone.value() {
        None => catalog.heat_zones().iter().collect(),
        Some(name) => Catalog::zone_named(name)
            .map(|zone| catalog.heat_zones_covering(zone).collect())
            .unwrap_or_default(),
    }
}

fn zone_density(heat: &HeatZone, thresholds: DensityThresholds) -> ZoneDensity {
    ZoneDensity {
        label: heat.label.clone(),
        x: heat.x,
        y: heat.y,
        density: heat.density,
        avg_dwell_minutes: heat.avg_dwell_minutes,
        bucket: bucket(heat.density, thresholds),
        level: DensityLevel::of(heat.density),
    }
}

fn traffic_between(hourly: &[HourPoint], hours: &RangeInclusive<u8>) -> f64 {
    hourly
        .iter()
        .filter(|point| hours.contains(&point.hour))
        .map(|point| point.traffic)
        .sum()
}

/// Projects the operational dashboard.
///
/// The hourly series is mall-wide; a narrower filter scales it by the
/// subset's share of store traffic, which leaves the peak-hour count
/// unchanged for any non-empty subset.
#[must_use]
pub fn project(input: &ViewInput<'_>) -> OperationalView {
    log::debug!(
        "Projecting operational view over {} stores",
        input.summary.store_count
    );

    let thresholds = input.config.density;
    let zones: Vec<ZoneDensity> = matched_zones(input)
        .into_iter()
        .map(|heat| zone_density(heat, thresholds))
        .collect();
    let count_bucket =
        |wanted: DensityBucket| zones.iter().filter(|zone| zone.bucket == wanted).count();

    let mut saturation_alerts: Vec<ZoneDensity> = zones
        .iter()
        .filter(|zone| zone.bucket == DensityBucket::High)
        .cloned()
        .collect();
    saturation_alerts.sort_by(|a, b| b.density.total_cmp(&a.density));
    saturation_alerts.truncate(SATURATION_ALERTS);

    let traffic_share = input.traffic_share();
    #[allow(clippy::cast_precision_loss)]
    let hourly: Vec<HourPoint> = input
        .catalog
        .hourly()
        .iter()
        .map(|sample| HourPoint {
            hour: sample.hour,
            label: sample.label(),
            traffic: sample.traffic as f64 * traffic_share,
        })
        .collect();

    // First maximum and first minimum win ties.
    let peak_hour = hourly
        .iter()
        .reduce(|best, point| if point.traffic > best.traffic { point } else { best })
        .cloned();
    let quietest_hour = hourly
        .iter()
        .reduce(|best, point| if point.traffic < best.traffic { point } else { best })
        .cloned();

    let peak_threshold = peak_hour
        .as_ref()
        .map_or(0.0, |peak| peak.traffic * input.config.peak_hour_ratio);
    let peak_hour_count = hourly
        .iter()
        .filter(|point| point.traffic > peak_threshold)
        .count();

    OperationalView {
        store_count: input.summary.store_count,
        high_density_zones: count_bucket(DensityBucket::High),
        medium_density_zones: count_bucket(DensityBucket::Medium),
        low_density_zones: count_bucket(DensityBucket::Low),
        avg_dwell_minutes: mean(zones.iter().map(|zone| zone.avg_dwell_minutes)),
        saturation_alerts,
        peak_hour_count,
        peak_hour,
        quietest_hour,
        morning_traffic: traffic_between(&hourly, &MORNING),
        afternoon_traffic: traffic_between(&hourly, &AFTERNOON),
        evening_traffic: traffic_between(&hourly, &EVENING),
        hourly,
        zones,
    }
}
