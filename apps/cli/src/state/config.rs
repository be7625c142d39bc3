//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--data-dir`)
//! 2. Environment variables (`BREW_*`)
//! 3. Platform data directory (via `directories`)
//! 4. Defaults (this file)
//!
//! Configuration is read-only after initialization.

use std::path::PathBuf;

use brew_core::loyalty::{
    DEFAULT_MIN_REDEEM_POINTS, DEFAULT_POINTS_PER_UNIT, DEFAULT_POINT_VALUE,
};
use brew_core::{LoyaltyPolicy, Money};
use brew_store::{StoreConfig, DEFAULT_DATA_DIR};
use directories::ProjectDirs;
use serde::Serialize;
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Directory holding the record files
    pub data_dir: PathBuf,

    /// Store name (printed on receipts)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Spend per loyalty point earned, in whole currency units
    pub points_per_unit: i64,

    /// Discount per point redeemed, in whole currency units
    pub point_value: i64,

    /// Smallest redemption accepted
    pub min_redeem_points: i64,
}

impl Default for ConfigState {
    /// Returns the configuration the shop ships with.
    ///
    /// ## Default Values
    /// - Store: "Brew Coffee House"
    /// - Currency: Rp
    /// - Loyalty: 1 point per 1000 spent, 1 point = 100 off, redeem ≥ 10
    /// - Data: `./data`
    fn default() -> Self {
        ConfigState {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            store_name: "Brew Coffee House".to_string(),
            currency_symbol: "Rp".to_string(),
            points_per_unit: DEFAULT_POINTS_PER_UNIT,
            point_value: DEFAULT_POINT_VALUE,
            min_redeem_points: DEFAULT_MIN_REDEEM_POINTS,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BREW_DATA_DIR`: data directory (otherwise the platform data dir)
    /// - `BREW_STORE_NAME`: store name
    /// - `BREW_CURRENCY_SYMBOL`: currency symbol
    /// - `BREW_POINTS_PER_UNIT`, `BREW_POINT_VALUE`, `BREW_MIN_REDEEM_POINTS`:
    ///   loyalty program numbers (positive integers)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        config.data_dir = match lookup("BREW_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => platform_data_dir().unwrap_or(config.data_dir),
        };

        if let Some(store_name) = lookup("BREW_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("BREW_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        let positive = |key: &str, current: i64| -> i64 {
            match lookup(key).map(|raw| raw.trim().parse::<i64>()) {
                Some(Ok(value)) if value > 0 => value,
                Some(_) => {
                    warn!(key, "Ignoring invalid loyalty setting, keeping {}", current);
                    current
                }
                None => current,
            }
        };
        // Amounts must also fit once converted to hundredths.
        let amount = |key: &str, current: i64| -> i64 {
            let value = positive(key, current);
            if Money::checked_from_major(value).is_none() {
                warn!(key, value, "Loyalty amount too large, keeping {}", current);
                return current;
            }
            value
        };
        config.points_per_unit = amount("BREW_POINTS_PER_UNIT", config.points_per_unit);
        config.point_value = amount("BREW_POINT_VALUE", config.point_value);
        config.min_redeem_points = positive("BREW_MIN_REDEEM_POINTS", config.min_redeem_points);

        config
    }

    /// Overrides the data directory (the `--data-dir` flag).
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    /// Loyalty program numbers as a policy.
    ///
    /// A non-positive value, or an amount too large to express in
    /// hundredths, falls back to its default with a warning.
    pub fn loyalty_policy(&self) -> LoyaltyPolicy {
        let defaults = LoyaltyPolicy::default();
        let amount = |name: &str, major: i64, default: Money| -> Money {
            match Money::checked_from_major(major) {
                Some(money) if money.is_positive() => money,
                _ => {
                    warn!(setting = name, value = major, "Invalid loyalty amount, using default");
                    default
                }
            }
        };

        LoyaltyPolicy {
            points_per_unit: amount("points_per_unit", self.points_per_unit, defaults.points_per_unit),
            point_value: amount("point_value", self.point_value, defaults.point_value),
            min_redeem_points: if self.min_redeem_points > 0 {
                self.min_redeem_points
            } else {
                warn!(value = self.min_redeem_points, "Invalid minimum redemption, using default");
                defaults.min_redeem_points
            },
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.data_dir).with_policy(self.loyalty_policy())
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_major(15000)), "Rp15000");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let text = amount.to_string();
        match text.strip_prefix('-') {
            Some(abs) => format!("-{}{}", self.currency_symbol, abs),
            None => format!("{}{}", self.currency_symbol, text),
        }
    }
}

/// Determines the data directory based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.brew.pos`
/// - **Windows**: `%APPDATA%\brew\pos\data`
/// - **Linux**: `~/.local/share/brew-pos`
fn platform_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "brew", "pos").map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> ConfigState {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigState::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_major(15000)), "Rp15000");
        assert_eq!(config.format_currency(Money::from_minor(1_250)), "Rp12.50");
        assert_eq!(config.format_currency(Money::zero()), "Rp0");
        assert_eq!(config.format_currency(Money::from_major(-5)), "-Rp5");
    }

    #[test]
    fn test_env_overrides() {
        let config = from_map(&[
            ("BREW_DATA_DIR", "/tmp/brew"),
            ("BREW_STORE_NAME", "Kopi Kita"),
            ("BREW_CURRENCY_SYMBOL", "$"),
            ("BREW_POINTS_PER_UNIT", "500"),
            ("BREW_MIN_REDEEM_POINTS", "20"),
        ]);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/brew"));
        assert_eq!(config.store_name, "Kopi Kita");
        assert_eq!(config.currency_symbol, "$");

        let policy = config.loyalty_policy();
        assert_eq!(policy.points_per_unit, Money::from_major(500));
        assert_eq!(policy.point_value, Money::from_major(100));
        assert_eq!(policy.min_redeem_points, 20);
    }

    #[test]
    fn test_invalid_loyalty_settings_keep_defaults() {
        let config = from_map(&[("BREW_POINT_VALUE", "-3"), ("BREW_POINTS_PER_UNIT", "lots")]);
        assert_eq!(config.loyalty_policy(), LoyaltyPolicy::default());
    }

    #[test]
    fn test_oversized_loyalty_amounts_are_rejected() {
        let huge = i64::MAX.to_string();
        let config = from_map(&[("BREW_POINT_VALUE", huge.as_str()), ("BREW_POINTS_PER_UNIT", "92233720368547759")]);
        assert_eq!(config.point_value, DEFAULT_POINT_VALUE);
        assert_eq!(config.points_per_unit, DEFAULT_POINTS_PER_UNIT);

        let config = ConfigState {
            point_value: i64::MAX,
            points_per_unit: 0,
            min_redeem_points: -1,
            ..Default::default()
        };
        assert_eq!(config.loyalty_policy(), LoyaltyPolicy::default());
    }

    #[test]
    fn test_flag_overrides_env() {
        let config = from_map(&[("BREW_DATA_DIR", "/tmp/env")])
            .with_data_dir(Some(PathBuf::from("/tmp/flag")));
        assert_eq!(config.store_config().data_dir, PathBuf::from("/tmp/flag"));

        let config = from_map(&[("BREW_DATA_DIR", "/tmp/env")]).with_data_dir(None);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/env"));
    }
}
