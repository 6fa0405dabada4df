//! Shop configuration loaded from environment variables.
//!
//! | variable                  | default    |
//! |---------------------------|------------|
//! | `CARTFLOW_USER_ID`        | `user_123` |
//! | `CARTFLOW_TAX_RATE_BPS`   | `1000`     |
//! | `CARTFLOW_FEATURED_LIMIT` | `5`        |
//! | `CARTFLOW_CATALOG_SIZE`   | `100`      |
//! | `CARTFLOW_CATALOG_SEED`   | `42`       |
//! | `CARTFLOW_LATENCY_MS`     | `0`        |

use crate::error::ConfigError;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Basis points in 100%
const FULL_RATE_BPS: u32 = 10_000;

/// Shop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Shopper placing orders
    pub user_id: UserId,
    /// Tax shown on the checkout summary, in basis points (1000 = 10%)
    pub tax_rate_bps: u32,
    /// Featured products fetched for the home screen
    pub featured_limit: usize,
    /// Products in the in-memory catalog
    pub catalog_size: usize,
    /// Seed of the generated catalog
    pub catalog_seed: u64,
    /// Simulated latency of every repository call
    pub latency: Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            user_id: UserId::new("user_123"),
            tax_rate_bps: 1_000,
            featured_limit: 5,
            catalog_size: 100,
            catalog_seed: 42,
            latency: Duration::ZERO,
        }
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value,
        reason: e.to_string(),
    })
}

impl ShopConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable does not parse or the result
    /// fails [`ShopConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// # Errors
    ///
    /// Same as [`ShopConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            user_id: lookup("CARTFLOW_USER_ID")
                .filter(|id| !id.trim().is_empty())
                .map_or(defaults.user_id, UserId::new),
            tax_rate_bps: parse(&lookup, "CARTFLOW_TAX_RATE_BPS", defaults.tax_rate_bps)?,
            featured_limit: parse(&lookup, "CARTFLOW_FEATURED_LIMIT", defaults.featured_limit)?,
            catalog_size: parse(&lookup, "CARTFLOW_CATALOG_SIZE", defaults.catalog_size)?,
            catalog_seed: parse(&lookup, "CARTFLOW_CATALOG_SEED", defaults.catalog_seed)?,
            latency: Duration::from_millis(parse(&lookup, "CARTFLOW_LATENCY_MS", 0)?),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for an empty catalog or a tax rate
    /// above 100%.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_size == 0 {
            return Err(ConfigError::OutOfRange(
                "catalog_size must be at least 1".to_string(),
            ));
        }
        if self.tax_rate_bps > FULL_RATE_BPS {
            return Err(ConfigError::OutOfRange(format!(
                "tax_rate_bps must be at most {FULL_RATE_BPS}, got {}",
                self.tax_rate_bps
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(
            ShopConfig::from_lookup(lookup(&[])).unwrap(),
            ShopConfig::default()
        );
    }

    #[test]
    fn values_are_parsed() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("CARTFLOW_USER_ID", "user_9"),
            ("CARTFLOW_TAX_RATE_BPS", " 825 "),
            ("CARTFLOW_CATALOG_SIZE", "12"),
            ("CARTFLOW_LATENCY_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.user_id, UserId::new("user_9"));
        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.catalog_size, 12);
        assert_eq!(config.latency, Duration::from_millis(250));
        assert_eq!(config.featured_limit, 5);
    }

    #[test]
    fn invalid_values_are_reported() {
        let error =
            ShopConfig::from_lookup(lookup(&[("CARTFLOW_FEATURED_LIMIT", "many")])).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                key: "CARTFLOW_FEATURED_LIMIT",
                ..
            }
        ));

        let error =
            ShopConfig::from_lookup(lookup(&[("CARTFLOW_CATALOG_SIZE", "0")])).unwrap_err();
        assert!(matches!(error, ConfigError::OutOfRange(_)));
    }
}
