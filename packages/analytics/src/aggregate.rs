//! Reductions over a filtered store subset.
//!
//! Every function here is total: empty inputs and zero denominators
//! produce `0.0`, never `NaN` or an infinity.

use mall_analytics_analytics_models::SubsetSummary;
use mall_analytics_catalog_models::Store;

/// `numerator / denominator`, or `0.0` when the quotient is undefined.
#[must_use]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    let value = numerator / denominator;
    if value.is_finite() { value } else { 0.0 }
}

/// Arithmetic mean, or `0.0` for no values.
#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
    #[allow(clippy::cast_precision_loss)]
    let count = count as f64;
    ratio(sum, count)
}

/// The global goal scaled by the subset's share of the store count.
#[must_use]
pub fn scaled_goal(global_goal: f64, subset_len: usize, catalog_len: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let share = ratio(subset_len as f64, catalog_len as f64);
    global_goal * share
}

/// Sales as a percentage of the (scaled) goal.
#[must_use]
pub fn goal_attainment(total_sales: f64, scaled_goal: f64) -> f64 {
    if scaled_goal > 0.0 {
        ratio(total_sales, scaled_goal) * 100.0
    } else {
        0.0
    }
}

/// Pearson correlation coefficient of two equally long series.
///
/// Returns `0.0` when there are fewer than two pairs or either series
/// has zero variance.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = mean(xs.iter().copied());
    let mean_y = mean(ys.iter().copied());

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    ratio(covariance, (variance_x * variance_y).sqrt())
}

/// Reduces `subset` to the scalar figures every view starts from.
///
/// `catalog_len` is the size of the unfiltered catalog; the global goal
/// is scaled by `subset.len() / catalog_len`.
#[must_use]
pub fn summarize(subset: &[&Store], catalog_len: usize, global_goal: f64) -> SubsetSummary {
    let total_sales: f64 = subset.iter().map(|store| store.sales).sum();
    #[allow(clippy::cast_precision_loss)]
    let total_traffic: f64 = subset.iter().map(|store| store.traffic as f64).sum();
    let total_area: f64 = subset.iter().map(|store| store.area_m2).sum();
    let scaled_goal = scaled_goal(global_goal, subset.len(), catalog_len);

    SubsetSummary {
        store_count: subset.len(),
        catalog_store_count: catalog_len,
        total_sales,
        total_traffic,
        total_area,
        avg_ticket: mean(subset.iter().map(|store| store.avg_ticket)),
        avg_conversion: mean(subset.iter().map(|store| store.conversion)),
        sales_per_area: ratio(total_sales, total_area),
        sales_per_visitor: ratio(total_sales, total_traffic),
        attraction_index_avg: mean(
            subset
                .iter()
                .map(|store| store.attraction_index)
                .filter(|index| *index > 0.0),
        ),
        scaled_goal,
        goal_attainment: goal_attainment(total_sales, scaled_goal),
    }
}
