//! Quote CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopcart_core::{Money, PricingPolicy, DELIVERY_RATE_PER_KM, MIN_DELIVERY_CHARGE};

/// Log level used when neither `RUST_LOG` nor `SHOPCART_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// JSON output is pretty-printed unless `SHOPCART_PRETTY_JSON=false`.
pub const DEFAULT_PRETTY_JSON: bool = true;

/// Quote CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Minimum delivery charge
    pub min_delivery_charge: Money,

    /// Delivery charge per kilometre
    pub delivery_rate_per_km: Decimal,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,

    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl QuoteConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = QuoteConfig {
            min_delivery_charge: Money::new(decimal_var(
                &lookup,
                "SHOPCART_MIN_DELIVERY_CHARGE",
                Decimal::from(MIN_DELIVERY_CHARGE),
            )?),

            delivery_rate_per_km: decimal_var(
                &lookup,
                "SHOPCART_DELIVERY_RATE_PER_KM",
                Decimal::from(DELIVERY_RATE_PER_KM),
            )?,

            log_level: lookup("SHOPCART_LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),

            pretty_json: match lookup("SHOPCART_PRETTY_JSON") {
                None => DEFAULT_PRETTY_JSON,
                Some(raw) => raw.parse().map_err(|_| {
                    ConfigError::InvalidValue("SHOPCART_PRETTY_JSON".to_string())
                })?,
            },
        };

        if config.min_delivery_charge.is_negative() {
            return Err(ConfigError::NegativeAmount(
                "SHOPCART_MIN_DELIVERY_CHARGE".to_string(),
            ));
        }
        if config.delivery_rate_per_km.is_sign_negative() && !config.delivery_rate_per_km.is_zero()
        {
            return Err(ConfigError::NegativeAmount(
                "SHOPCART_DELIVERY_RATE_PER_KM".to_string(),
            ));
        }

        Ok(config)
    }

    /// The delivery tariff described by this configuration.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy::new(self.min_delivery_charge, self.delivery_rate_per_km)
    }
}

fn decimal_var<F>(lookup: &F, key: &str, default: Decimal) -> Result<Decimal, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => {
            Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidValue(key.to_string()))
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{0} must not be negative")]
    NegativeAmount(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = QuoteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.min_delivery_charge.to_string(), "20.00");
        assert_eq!(config.delivery_rate_per_km, dec!(10));
        assert_eq!(config.log_level, "info");
        assert!(config.pretty_json);
        assert_eq!(config.pricing_policy(), PricingPolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = QuoteConfig::from_lookup(lookup(&[
            ("SHOPCART_MIN_DELIVERY_CHARGE", "15.5"),
            ("SHOPCART_DELIVERY_RATE_PER_KM", " 7.25 "),
            ("SHOPCART_LOG_LEVEL", "debug"),
            ("SHOPCART_PRETTY_JSON", "false"),
        ]))
        .unwrap();

        assert_eq!(config.min_delivery_charge.to_string(), "15.50");
        assert_eq!(config.delivery_rate_per_km, dec!(7.25));
        assert_eq!(config.log_level, "debug");
        assert!(!config.pretty_json);
    }

    #[test]
    fn test_invalid_values() {
        let err = QuoteConfig::from_lookup(lookup(&[("SHOPCART_DELIVERY_RATE_PER_KM", "ten")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for SHOPCART_DELIVERY_RATE_PER_KM");

        let err = QuoteConfig::from_lookup(lookup(&[("SHOPCART_PRETTY_JSON", "yes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let err = QuoteConfig::from_lookup(lookup(&[("SHOPCART_MIN_DELIVERY_CHARGE", "-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NegativeAmount(_)));
    }
}
