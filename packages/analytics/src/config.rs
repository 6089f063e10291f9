//! Engine configuration loading.
//!
//! Defaults live in `config/engine.toml`, embedded at compile time. Any
//! key may be omitted from a caller-supplied document; missing keys take
//! the built-in defaults.

use mall_analytics_analytics_models::EngineConfig;

use crate::ConfigError;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/engine.toml");

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        message: message.into(),
    }
}

/// Checks that every parameter is usable.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] naming the first parameter out of
/// range.
pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    if !(config.global_sales_goal.is_finite() && config.global_sales_goal >= 0.0) {
        return Err(invalid(format!(
            "globalSalesGoal must be a non-negative number, got {}",
            config.global_sales_goal
        )));
    }

    let density = config.density;
    if !(0.0..=1.0).contains(&density.low) || !(0.0..=1.0).contains(&density.high) {
        return Err(invalid("density thresholds must lie within 0-1"));
    }
    if density.low > density.high {
        return Err(invalid(format!(
            "density.low ({}) is above density.high ({})",
            density.low, density.high
        )));
    }

    if !(config.peak_hour_ratio > 0.0 && config.peak_hour_ratio <= 1.0) {
        return Err(invalid(format!(
            "peakHourRatio must be within (0, 1], got {}",
            config.peak_hour_ratio
        )));
    }

    for (name, value) in [
        ("topStores", config.top_stores),
        ("topZones", config.top_zones),
        ("topCampaigns", config.top_campaigns),
    ] {
        if value == 0 {
            return Err(invalid(format!("{name} must be at least 1")));
        }
    }

    let benchmark = config.benchmark;
    if !(benchmark.below > 0.0 && benchmark.below <= benchmark.above) {
        return Err(invalid(format!(
            "benchmark bounds must satisfy 0 < below <= above, got below {} above {}",
            benchmark.below, benchmark.above
        )));
    }

    let marketing = config.marketing;
    if !(marketing.digital_conversion_factor.is_finite()
        && marketing.digital_conversion_uplift.is_finite())
    {
        return Err(invalid("marketing digital conversion terms must be finite"));
    }

    Ok(())
}

/// Parses and validates an engine configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the document does not parse and
/// [`ConfigError::Invalid`] if a parameter is out of range.
pub fn from_toml_str(toml_str: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = toml::de::from_str(toml_str)?;
    validate(&config)?;
    Ok(config)
}

/// The configuration embedded in this crate.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the embedded file is malformed, which
/// this crate's tests rule out.
pub fn embedded() -> Result<EngineConfig, ConfigError> {
    from_toml_str(DEFAULT_CONFIG_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        assert_eq!(embedded().unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = from_toml_str(
            r"
            topCampaigns = 3

            [marketing]
            followsFilter = true
            ",
        )
        .unwrap();
        assert_eq!(config.top_campaigns, 3);
        assert!(config.marketing.follows_filter);
        assert!((config.marketing.digital_conversion_factor - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.top_stores, 10);
    }

    #[test]
    fn inverted_density_thresholds_are_rejected() {
        let err = from_toml_str("[density]\nhigh = 0.3\nlow = 0.5").unwrap_err();
        assert!(
            matches!(&err, ConfigError::Invalid { message } if message.contains("density.low")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn zero_top_n_is_rejected() {
        assert!(matches!(
            from_toml_str("topStores = 0"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn peak_ratio_must_be_positive() {
        assert!(from_toml_str("peakHourRatio = 0.0").is_err());
        assert!(from_toml_str("peakHourRatio = 1.0").is_ok());
    }

    #[test]
    fn malformed_document_is_a_toml_error() {
        assert!(matches!(
            from_toml_str("topStores = \"ten\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
