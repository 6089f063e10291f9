//! Sales, ticket and goal-attainment dashboard.

use std::collections::BTreeMap;

use mall_analytics_analytics_models::{
    FinancialView, Kpi, MetricKind, MonthlyPoint, StoreSales, ZoneSales,
};
use mall_analytics_catalog_models::{MallZone, MonthlySales};

use super::ViewInput;
use crate::{
    aggregate::{goal_attainment, mean},
    filter::months_in_range,
    kpi::{change_percent, classify_trend, derive_extensive_kpi, derive_kpi},
};

fn top_stores(input: &ViewInput<'_>) -> Vec<StoreSales> {
    let mut ranked = input.subset.clone();
    ranked.sort_by(|a, b| b.sales.total_cmp(&a.sales).then(a.id.cmp(&b.id)));
    ranked
        .into_iter()
        .take(input.config.top_stores)
        .map(|store| StoreSales {
            store_id: store.id,
            name: store.name.clone(),
            category: store.category,
            sales: store.sales,
        })
        .collect()
}

fn sales_by_zone(input: &ViewInput<'_>) -> Vec<ZoneSales> {
    let mut by_zone: BTreeMap<MallZone, (f64, usize)> = BTreeMap::new();
    for store in &input.subset {
        let entry = by_zone.entry(store.zone).or_default();
        entry.0 += store.sales;
        entry.1 += 1;
    }

    let mut zones: Vec<ZoneSales> = by_zone
        .into_iter()
        .map(|(zone, (sales, store_count))| ZoneSales {
            zone,
            sales,
            store_count,
        })
        .collect();
    zones.sort_by(|a, b| b.sales.total_cmp(&a.sales).then(a.zone.cmp(&b.zone)));
    zones.truncate(input.config.top_zones);
    zones
}

fn monthly_point(
    month: &MonthlySales,
    sales_share: f64,
    store_share: f64,
    traffic_share: f64,
) -> MonthlyPoint {
    #[allow(clippy::cast_precision_loss)]
    let visitors = month.visitors as f64 * traffic_share;
    MonthlyPoint {
        month: month.month,
        label: month.label.clone(),
        sales: month.sales * sales_share,
        goal: month.goal * store_share,
        visitors,
    }
}

/// Goal attainment of the reporting month against the monthly series.
///
/// The value compares subset sales with the scaled monthly goal. The
/// history is each recorded month's attainment on the same basis, over
/// the whole year so the card keeps a fixed length regardless of the date
/// range. The change compares the value with the latest recorded month.
fn goal_attainment_kpi(input: &ViewInput<'_>, sales_share: f64) -> Kpi {
    let scope = input.scope();
    let value = input.summary.goal_attainment;
    let history: Vec<f64> = input
        .catalog
        .months()
        .iter()
        .map(|month| {
            goal_attainment(month.sales * sales_share, month.goal * scope.store_share)
        })
        .collect();
    let change = if scope.empty {
        0.0
    } else {
        history
            .last()
            .map_or(0.0, |latest| change_percent(value, *latest))
    };

    Kpi {
        value,
        change_percent: change,
        goal: Some(100.0),
        trend: classify_trend(MetricKind::Rate, value, change, scope.empty),
        history,
    }
}

/// Projects the financial dashboard.
#[must_use]
pub fn project(input: &ViewInput<'_>) -> FinancialView {
    log::debug!(
        "Projecting financial view over {} stores",
        input.summary.store_count
    );

    let baselines = input.catalog.store_kpis();
    let summary = &input.summary;
    let reference = &input.reference;
    let scope = input.scope();
    let sales_share = input.sales_share();
    let traffic_share = input.traffic_share();

    let sales_trend: Vec<MonthlyPoint> =
        months_in_range(input.catalog.months(), input.filter.date_range)
            .map(|month| monthly_point(month, sales_share, scope.store_share, traffic_share))
            .collect();
    let average_goal = mean(sales_trend.iter().map(|point| point.goal));

    FinancialView {
        store_count: summary.store_count,
        total_sales: derive_extensive_kpi(
            &baselines.total_sales,
            summary.total_sales,
            reference.total_sales,
            scope,
        ),
        avg_ticket: derive_kpi(
            &baselines.avg_ticket,
            summary.avg_ticket,
            reference.avg_ticket,
            MetricKind::Rate,
            scope,
        ),
        sales_per_visitor: derive_kpi(
            &baselines.sales_per_visitor,
            summary.sales_per_visitor,
            reference.sales_per_visitor,
            MetricKind::Rate,
            scope,
        ),
        total_traffic: derive_extensive_kpi(
            &baselines.total_traffic,
            summary.total_traffic,
            reference.total_traffic,
            scope,
        ),
        conversion: derive_kpi(
            &baselines.conversion,
            summary.avg_conversion,
            reference.avg_conversion,
            MetricKind::Rate,
            scope,
        ),
        sales_per_area: derive_kpi(
            &baselines.sales_per_area,
            summary.sales_per_area,
            reference.sales_per_area,
            MetricKind::Rate,
            scope,
        ),
        goal_attainment: goal_attainment_kpi(input, sales_share),
        top_stores: top_stores(input),
        sales_by_zone: sales_by_zone(input),
        sales_trend,
        average_goal,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mall_analytics_analytics_models::{DateRange, EngineConfig, Filter, Trend};
    use mall_analytics_catalog::reference_catalog;

    use super::*;

    fn view(filter: &Filter) -> FinancialView {
        let catalog = reference_catalog().unwrap();
        let config = EngineConfig::default();
        project(&ViewInput::new(&catalog, &config, filter))
    }

    #[test]
    fn unfiltered_view_reports_catalog_totals() {
        let view = view(&Filter::default());
        assert_eq!(view.store_count, 20);
        assert!((view.total_sales.value - 7_872_000.0).abs() < 1e-6);
        assert!((view.total_sales.change_percent - 12.5).abs() < f64::EPSILON);
        assert_eq!(view.total_sales.goal, Some(95_000_000.0));
        assert_eq!(view.total_sales.history.len(), 12);
        assert_eq!(view.total_sales.trend, Trend::Up);
        assert_eq!(view.sales_trend.len(), 12);
        assert_eq!(view.goal_attainment.history.len(), 12);
    }

    #[test]
    fn top_stores_are_sorted_and_capped() {
        let view = view(&Filter::default());
        assert_eq!(view.top_stores.len(), 10);
        assert_eq!(view.top_stores[0].name, "Saga Falabella");
        assert!(
            view.top_stores
                .windows(2)
                .all(|pair| pair[0].sales >= pair[1].sales)
        );
    }

    #[test]
    fn zone_sales_cover_the_subset() {
        let view = view(&Filter::default().with_category("Moda"));
        let total: f64 = view.sales_by_zone.iter().map(|zone| zone.sales).sum();
        assert!((total - 3_173_000.0).abs() < 1e-6);
        assert_eq!(view.sales_by_zone[0].zone, MallZone::AnchorZone);
        assert_eq!(view.sales_by_zone[0].store_count, 2);
    }

    #[test]
    fn filtered_goal_is_scaled_by_store_share() {
        let view = view(&Filter::default().with_category("Moda"));
        let goal = view.total_sales.goal.unwrap();
        assert!((goal - 95_000_000.0 * 0.3).abs() < 1e-3);
        assert!(
            (view.goal_attainment.value - 3_173_000.0 / (8_100_000.0 * 0.3) * 100.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn goal_attainment_value_and_history_share_a_basis() {
        let view = view(&Filter::default());
        let kpi = &view.goal_attainment;
        let latest = *kpi.history.last().unwrap();
        assert!((kpi.value - 7_872_000.0 / 8_100_000.0 * 100.0).abs() < 1e-9);
        assert!((latest - 12_450_000.0 / 12_000_000.0 * 100.0).abs() < 1e-9);
        assert!((kpi.value - latest).abs() < 10.0, "{} vs {latest}", kpi.value);
        assert!(kpi.history.iter().all(|point| (90.0..=115.0).contains(point)));
        assert!((kpi.change_percent - change_percent(kpi.value, latest)).abs() < 1e-9);
        assert_eq!(kpi.trend, Trend::Down);
    }

    #[test]
    fn date_range_limits_the_trend() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        )
        .unwrap();
        let view = view(&Filter::default().with_date_range(range));
        let labels: Vec<&str> = view.sales_trend.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jun 2025", "Jul 2025", "Ago 2025"]);
        assert!((view.average_goal - (7_800_000.0 + 8_500_000.0 + 8_000_000.0) / 3.0).abs() < 1e-6);
        assert_eq!(view.store_count, 20);
    }

    #[test]
    fn empty_subset_yields_zeroed_view() {
        let view = view(&Filter::default().with_category("NonExistent"));
        assert_eq!(view.store_count, 0);
        for kpi in [
            &view.total_sales,
            &view.avg_ticket,
            &view.sales_per_visitor,
            &view.conversion,
            &view.sales_per_area,
            &view.goal_attainment,
        ] {
            assert!(kpi.value.abs() < f64::EPSILON);
            assert_eq!(kpi.trend, Trend::Neutral);
        }
        assert!(view.top_stores.is_empty());
        assert!(view.sales_trend.iter().all(|p| p.sales.abs() < f64::EPSILON));
    }

    #[test]
    fn output_uses_camel_case_keys() {
        let json = serde_json::to_value(view(&Filter::default())).unwrap();
        assert!(json.get("totalSales").is_some());
        assert!(json["totalSales"].get("changePercent").is_some());
        assert!(json.get("salesByZone").is_some());
    }
}
