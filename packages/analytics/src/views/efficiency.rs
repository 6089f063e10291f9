//! Space productivity and traffic-conversion dashboard.

use mall_analytics_analytics_models::{
    Benchmark, BenchmarkBadge, BenchmarkThresholds, EfficiencyView, MetricKind, Quadrant,
    ScatterPoint, StoreBenchmark,
};
use mall_analytics_catalog_models::Store;

use super::ViewInput;
use crate::{
    aggregate::{mean, ratio},
    kpi::{derive_extensive_kpi, derive_kpi},
};

#[allow(clippy::cast_precision_loss)]
fn traffic(store: &Store) -> f64 {
    store.traffic as f64
}

fn benchmark(value: f64, average: f64, thresholds: BenchmarkThresholds) -> Benchmark {
    let ratio = ratio(value, average);
    let badge = (average > 0.0).then(|| {
        if ratio > thresholds.above {
            BenchmarkBadge::Above
        } else if ratio < thresholds.below {
            BenchmarkBadge::Below
        } else {
            BenchmarkBadge::Average
        }
    });
    Benchmark {
        value,
        ratio,
        badge,
    }
}

/// Compares every transacting store with the transacting-store averages,
/// highest sales first.
fn benchmarks(active: &[&Store], thresholds: BenchmarkThresholds) -> Vec<StoreBenchmark> {
    let avg_sales_per_area = mean(active.iter().map(|store| store.sales_per_area()));
    let avg_conversion = mean(active.iter().map(|store| store.conversion));
    let avg_attraction = mean(active.iter().map(|store| store.attraction_index));

    let mut rows: Vec<StoreBenchmark> = active
        .iter()
        .map(|store| StoreBenchmark {
            store_id: store.id,
            name: store.name.clone(),
            category: store.category,
            sales: store.sales,
            sales_per_area: benchmark(store.sales_per_area(), avg_sales_per_area, thresholds),
            conversion: benchmark(store.conversion, avg_conversion, thresholds),
            attraction_index: benchmark(store.attraction_index, avg_attraction, thresholds),
        })
        .collect();
    rows.sort_by(|a, b| b.sales.total_cmp(&a.sales).then(a.store_id.cmp(&b.store_id)));
    rows
}

/// Projects the efficiency dashboard.
///
/// Anchor and inefficient counts use the means of the filtered subset
/// itself, never the mall-wide means.
#[must_use]
pub fn project(input: &ViewInput<'_>) -> EfficiencyView {
    log::debug!(
        "Projecting efficiency view over {} stores",
        input.summary.store_count
    );

    let baselines = input.catalog.store_kpis();
    let summary = &input.summary;
    let reference = &input.reference;
    let scope = input.scope();

    let mean_traffic = mean(input.subset.iter().map(|store| traffic(store)));
    let mean_sales = mean(input.subset.iter().map(|store| store.sales));
    let quadrant =
        |store: &Store| Quadrant::classify(traffic(store), store.sales, mean_traffic, mean_sales);

    let anchor_count = input
        .subset
        .iter()
        .filter(|store| quadrant(store) == Quadrant::Anchor)
        .count();
    let inefficient_count = input
        .subset
        .iter()
        .filter(|store| quadrant(store) == Quadrant::Inefficient)
        .count();

    let active: Vec<&Store> = input
        .subset
        .iter()
        .copied()
        .filter(|store| store.is_transacting())
        .collect();

    let scatter = active
        .iter()
        .map(|store| ScatterPoint {
            store_id: store.id,
            name: store.name.clone(),
            category: store.category,
            traffic: traffic(store),
            sales: store.sales,
            area_m2: store.area_m2,
            quadrant: quadrant(store),
        })
        .collect();

    EfficiencyView {
        store_count: summary.store_count,
        active_store_count: active.len(),
        sales_per_area: derive_kpi(
            &baselines.sales_per_area,
            summary.sales_per_area,
            reference.sales_per_area,
            MetricKind::Rate,
            scope,
        ),
        conversion: derive_kpi(
            &baselines.conversion,
            summary.avg_conversion,
            reference.avg_conversion,
            MetricKind::Rate,
            scope,
        ),
        attraction_index: derive_kpi(
            &baselines.attraction_index,
            summary.attraction_index_avg,
            reference.attraction_index_avg,
            MetricKind::Index,
            scope,
        ),
        total_traffic: derive_extensive_kpi(
            &baselines.total_traffic,
            summary.total_traffic,
            reference.total_traffic,
            scope,
        ),
        anchor_count,
        inefficient_count,
        mean_traffic,
        mean_sales,
        scatter,
        benchmarks: benchmarks(&active, input.config.benchmark),
    }
}
