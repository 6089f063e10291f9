//! Digital engagement and campaign dashboard.
//!
//! Campaigns and the attribution series are mall-wide figures. Unless
//! `marketing.followsFilter` is set they are reported unchanged for every
//! filter; with it set, attributed amounts are scaled by the filtered
//! subset's share of sales.

use mall_analytics_analytics_models::{
    AttributionDay, CampaignRoi, Kpi, MarketingSettings, MarketingView, MetricKind, StoreMarketing,
};
use mall_analytics_catalog_models::{KpiBaseline, Store};

use super::ViewInput;
use crate::{
    aggregate::pearson,
    kpi::{KpiScope, change_percent, derive_kpi},
};

fn store_row(store: &Store, settings: MarketingSettings) -> StoreMarketing {
    StoreMarketing {
        store_id: store.id,
        name: store.name.clone(),
        category: store.category,
        zone: store.zone,
        digital_conversion: store
            .conversion
            .mul_add(settings.digital_conversion_factor, settings.digital_conversion_uplift),
        attraction_index: store.attraction_index,
    }
}

fn static_kpi(baseline: &KpiBaseline, kind: MetricKind) -> Kpi {
    derive_kpi(baseline, baseline.value, baseline.value, kind, KpiScope::mall_wide())
}

/// Projects the marketing dashboard.
#[must_use]
pub fn project(input: &ViewInput<'_>) -> MarketingView {
    log::debug!(
        "Projecting marketing view over {} stores",
        input.summary.store_count
    );

    let settings = input.config.marketing;
    let data = input.catalog.marketing();
    let kpis = &data.kpis;

    let (share, attributed_scope) = if settings.follows_filter {
        (input.sales_share(), input.scope())
    } else {
        (1.0, KpiScope::mall_wide())
    };

    let mut stores: Vec<StoreMarketing> = input
        .subset
        .iter()
        .map(|store| store_row(store, settings))
        .collect();
    stores.sort_by(|a, b| {
        b.digital_conversion
            .total_cmp(&a.digital_conversion)
            .then(a.store_id.cmp(&b.store_id))
    });

    let mut top_campaigns: Vec<CampaignRoi> = data
        .campaigns
        .iter()
        .map(|campaign| CampaignRoi {
            id: campaign.id,
            name: campaign.name.clone(),
            roi: campaign.roi,
            attributed_sales: campaign.attributed_sales * share,
        })
        .collect();
    top_campaigns.sort_by(|a, b| b.roi.total_cmp(&a.roi).then(a.id.cmp(&b.id)));
    top_campaigns.truncate(input.config.top_campaigns);

    #[allow(clippy::cast_precision_loss)]
    let attribution: Vec<AttributionDay> = data
        .attribution
        .iter()
        .map(|point| AttributionDay {
            day: point.day,
            likes: point.likes as f64,
            attributed_sales: point.attributed_sales * share,
        })
        .collect();
    let likes: Vec<f64> = attribution.iter().map(|day| day.likes).collect();
    let sales: Vec<f64> = attribution.iter().map(|day| day.attributed_sales).collect();

    let digital_ticket = static_kpi(&kpis.digital_ticket, MetricKind::Rate);
    let organic_ticket = static_kpi(&kpis.organic_ticket, MetricKind::Rate);

    MarketingView {
        store_count: input.summary.store_count,
        follows_filter: settings.follows_filter,
        omnichannel_conversion: static_kpi(&kpis.omnichannel_conversion, MetricKind::Rate),
        digital_visits: static_kpi(&kpis.digital_visits, MetricKind::Rate),
        digital_attraction_index: static_kpi(&kpis.digital_attraction_index, MetricKind::Index),
        attributed_sales: derive_kpi(
            &kpis.attributed_sales,
            kpis.attributed_sales.value * share,
            kpis.attributed_sales.value,
            MetricKind::Rate,
            attributed_scope,
        ),
        digital_ticket_uplift: change_percent(digital_ticket.value, organic_ticket.value),
        digital_ticket,
        organic_ticket,
        stores,
        top_campaigns,
        total_attributed_sales: sales.iter().sum(),
        engagement_correlation: pearson(&likes, &sales),
        attribution,
    }
}

#[cfg(test)]
mod tests {
    use mall_analytics_analytics_models::{EngineConfig, Filter, Trend};
    use mall_analytics_catalog::reference_catalog;

    use super::*;

    fn view_with(filter: &Filter, follows_filter: bool) -> MarketingView {
        let catalog = reference_catalog().unwrap();
        let mut config = EngineConfig::default();
        config.marketing.follows_filter = follows_filter;
        project(&ViewInput::new(&catalog, &config, filter))
    }

    #[test]
    fn campaigns_are_ranked_by_roi() {
        let view = view_with(&Filter::default(), false);
        let names: Vec<&str> = view
            .top_campaigns
            .iter()
            .map(|campaign| campaign.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Verano Fashion 2025",
                "Promo Cyber Days",
                "Día de la Madre",
                "Back to School",
                "Liquidación Invierno",
            ]
        );
    }

    #[test]
    fn mall_wide_figures_ignore_the_filter_by_default() {
        let all = view_with(&Filter::default(), false);
        let fashion = view_with(&Filter::default().with_category("Moda"), false);
        assert_eq!(all.top_campaigns, fashion.top_campaigns);
        assert_eq!(all.attribution, fashion.attribution);
        assert_eq!(all.attributed_sales, fashion.attributed_sales);
        assert!(!fashion.follows_filter);
        assert_eq!(fashion.stores.len(), 6);
    }

    #[test]
    fn following_the_filter_scales_attributed_sales() {
        let all = view_with(&Filter::default(), true);
        let fashion = view_with(&Filter::default().with_category("Moda"), true);
        let share = 3_173_000.0 / 7_872_000.0;
        assert!(
            (fashion.total_attributed_sales - all.total_attributed_sales * share).abs() < 1e-6
        );
        assert!(
            (fashion.attributed_sales.value - all.attributed_sales.value * share).abs() < 1e-6
        );
        assert!((fashion.engagement_correlation - all.engagement_correlation).abs() < 1e-9);
        assert_eq!(
            fashion.top_campaigns.first().map(|c| c.id),
            all.top_campaigns.first().map(|c| c.id)
        );
    }

    #[test]
    fn following_the_filter_with_no_stores_is_neutral() {
        let view = view_with(&Filter::default().with_category("NonExistent"), true);
        assert!(view.total_attributed_sales.abs() < f64::EPSILON);
        assert!(view.engagement_correlation.abs() < f64::EPSILON);
        assert_eq!(view.attributed_sales.trend, Trend::Neutral);
        assert!(view.stores.is_empty());
    }

    #[test]
    fn digital_conversion_is_deterministic() {
        let view = view_with(&Filter::default().with_store("Zara"), false);
        let zara = &view.stores[0];
        assert!((zara.digital_conversion - (4.5 * 0.8 + 1.0)).abs() < 1e-9);
        assert_eq!(view, view_with(&Filter::default().with_store("Zara"), false));
    }

    #[test]
    fn stores_are_sorted_by_digital_conversion() {
        let view = view_with(&Filter::default(), false);
        assert_eq!(view.stores[0].name, "MAC Cosmetics");
        assert!(
            view.stores
                .windows(2)
                .all(|pair| pair[0].digital_conversion >= pair[1].digital_conversion)
        );
    }

    #[test]
    fn ticket_uplift_and_correlation() {
        let view = view_with(&Filter::default(), false);
        assert!((view.digital_ticket_uplift - (245.0 - 185.0) / 185.0 * 100.0).abs() < 1e-9);
        assert!(view.engagement_correlation > 0.0);
        assert!(view.engagement_correlation <= 1.0);
        assert_eq!(view.attribution.len(), 31);
    }
}
