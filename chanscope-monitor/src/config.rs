//! Monitor configuration.
//!
//! Everything is overridable at initialization and loadable from TOML:
//!
//! ```toml
//! dedup_window_ms = 300000
//! store_capacity = 500
//! toast_capacity = 5
//! toast_lifetime_ms = 8000
//!
//! [markets.crypto]
//! min_bi_kbars = 4
//! min_bi_move_atr = 0.8
//! breakout_atr = 0.4
//! pullback_tolerance_atr = 0.4
//! confirm_rule = "break_pullback_high"
//! ```
//!
//! Markets without an override use `ChanlunParams::for_market`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use chanscope_core::chanlun::{ChanlunParams, ConfigError};
use chanscope_core::domain::Market;

pub const DEFAULT_DEDUP_WINDOW_MS: i64 = 5 * 60 * 1000;
pub const DEFAULT_STORE_CAPACITY: usize = 500;
pub const DEFAULT_TOAST_CAPACITY: usize = 5;
pub const DEFAULT_TOAST_LIFETIME_MS: u64 = 8_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub dedup_window_ms: i64,
    pub store_capacity: usize,
    pub toast_capacity: usize,
    pub toast_lifetime_ms: u64,
    /// Per-market Chanlun parameter overrides.
    pub markets: HashMap<Market, ChanlunParams>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: DEFAULT_DEDUP_WINDOW_MS,
            store_capacity: DEFAULT_STORE_CAPACITY,
            toast_capacity: DEFAULT_TOAST_CAPACITY,
            toast_lifetime_ms: DEFAULT_TOAST_LIFETIME_MS,
            markets: HashMap::new(),
        }
    }
}

/// Parse or validation failure when loading a config.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl MonitorConfig {
    /// Chanlun parameters for a market: the override if present, else the
    /// built-in defaults.
    pub fn params_for(&self, market: Market) -> ChanlunParams {
        self.markets
            .get(&market)
            .copied()
            .unwrap_or_else(|| ChanlunParams::for_market(market))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dedup_window_ms <= 0 {
            return Err(ConfigError::NonPositive {
                name: "dedup_window_ms",
            });
        }
        if self.store_capacity == 0 {
            return Err(ConfigError::NonPositive {
                name: "store_capacity",
            });
        }
        if self.toast_capacity == 0 {
            return Err(ConfigError::NonPositive {
                name: "toast_capacity",
            });
        }
        if self.toast_lifetime_ms == 0 {
            return Err(ConfigError::NonPositive {
                name: "toast_lifetime_ms",
            });
        }
        for params in self.markets.values() {
            params.validate()?;
        }
        Ok(())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}
