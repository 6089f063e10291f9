//! Invariant checks run once when a catalog is built.

use std::collections::BTreeSet;

use chrono::Datelike as _;
use mall_analytics_catalog_models::Store;

use crate::{CatalogError, CatalogParts};

fn invalid(message: impl Into<String>) -> CatalogError {
    CatalogError::Validation {
        message: message.into(),
    }
}

fn non_negative(store: &Store, field: &str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!(
            "store {} ({}) has invalid {field}: {value}",
            store.id, store.name
        )))
    }
}

fn validate_store(store: &Store) -> Result<(), CatalogError> {
    if !(store.area_m2.is_finite() && store.area_m2 > 0.0) {
        return Err(invalid(format!(
            "store {} ({}) must have a positive area, got {}",
            store.id, store.name, store.area_m2
        )));
    }
    if !(0.0..=100.0).contains(&store.conversion) {
        return Err(invalid(format!(
            "store {} ({}) has conversion {} outside 0-100",
            store.id, store.name, store.conversion
        )));
    }
    non_negative(store, "sales", store.sales)?;
    non_negative(store, "average ticket", store.avg_ticket)?;
    non_negative(store, "attraction index", store.attraction_index)?;
    Ok(())
}

pub fn validate(parts: &CatalogParts) -> Result<(), CatalogError> {
    let mut ids = BTreeSet::new();
    let mut names = BTreeSet::new();
    for store in &parts.stores {
        validate_store(store)?;
        if !ids.insert(store.id) {
            return Err(invalid(format!("duplicate store id {}", store.id)));
        }
        // The store selector compares folded names.
        if !names.insert(store.name.to_lowercase()) {
            return Err(invalid(format!("duplicate store name '{}'", store.name)));
        }
    }

    for month in &parts.months {
        if month.month.day() != 1 {
            return Err(invalid(format!(
                "month '{}' must start on the first day, got {}",
                month.label, month.month
            )));
        }
    }
    if parts.months.windows(2).any(|w| w[0].month >= w[1].month) {
        return Err(invalid("months must be strictly ascending"));
    }

    let mut labels = BTreeSet::new();
    for heat in &parts.heat_zones {
        if !(0.0..=1.0).contains(&heat.density) {
            return Err(invalid(format!(
                "heat-map zone '{}' has density {} outside 0-1",
                heat.label, heat.density
            )));
        }
        if !labels.insert(heat.label.as_str()) {
            return Err(invalid(format!(
                "duplicate heat-map zone '{}'",
                heat.label
            )));
        }
    }

    if parts.hourly.iter().any(|sample| sample.hour > 23) {
        return Err(invalid("hourly samples must use hours 0-23"));
    }
    if parts.hourly.windows(2).any(|w| w[0].hour >= w[1].hour) {
        return Err(invalid("hourly samples must be strictly ascending"));
    }

    if parts
        .marketing
        .attribution
        .windows(2)
        .any(|w| w[0].day >= w[1].day)
    {
        return Err(invalid("attribution days must be strictly ascending"));
    }

    let mut campaign_ids = BTreeSet::new();
    for campaign in &parts.marketing.campaigns {
        if !campaign_ids.insert(campaign.id) {
            return Err(invalid(format!("duplicate campaign id {}", campaign.id)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use mall_analytics_catalog_models::{HourlyTraffic, MallZone, StoreCategory};

    use super::*;

    fn store(id: u32) -> Store {
        Store {
            id,
            name: format!("Store {id}"),
            category: StoreCategory::Fashion,
            zone: MallZone::FoodCourt,
            area_m2: 100.0,
            sales: 1000.0,
            traffic: 100,
            conversion: 10.0,
            avg_ticket: 50.0,
            attraction_index: 1.0,
        }
    }

    #[test]
    fn accepts_non_transacting_store() {
        let mut kiosk = store(1);
        kiosk.sales = 0.0;
        kiosk.conversion = 0.0;
        kiosk.avg_ticket = 0.0;
        let parts = CatalogParts {
            stores: vec![kiosk],
            ..CatalogParts::default()
        };
        assert!(validate(&parts).is_ok());
    }

    #[test]
    fn rejects_zero_area() {
        let mut bad = store(1);
        bad.area_m2 = 0.0;
        let parts = CatalogParts {
            stores: vec![bad],
            ..CatalogParts::default()
        };
        assert!(matches!(
            validate(&parts),
            Err(CatalogError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_conversion_over_one_hundred() {
        let mut bad = store(1);
        bad.conversion = 120.0;
        let parts = CatalogParts {
            stores: vec![bad],
            ..CatalogParts::default()
        };
        assert!(validate(&parts).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let parts = CatalogParts {
            stores: vec![store(7), store(7)],
            ..CatalogParts::default()
        };
        let err = validate(&parts).unwrap_err();
        assert!(err.to_string().contains("duplicate store id 7"));
    }

    #[test]
    fn rejects_store_names_differing_only_in_case() {
        let mut twin = store(8);
        twin.name = "STORE 7".to_string();
        let parts = CatalogParts {
            stores: vec![store(7), twin],
            ..CatalogParts::default()
        };
        let err = validate(&parts).unwrap_err();
        assert!(err.to_string().contains("duplicate store name 'STORE 7'"));
    }

    #[test]
    fn rejects_unordered_hours() {
        let parts = CatalogParts {
            hourly: vec![
                HourlyTraffic {
                    hour: 12,
                    traffic: 1,
                },
                HourlyTraffic {
                    hour: 11,
                    traffic: 1,
                },
            ],
            ..CatalogParts::default()
        };
        assert!(validate(&parts).is_err());
    }
}
