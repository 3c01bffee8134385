//! Application configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Delays driving debounced quote regeneration, in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteTimings {
    /// Quiet period after a sell/buy amount keystroke
    pub debounce_ms: u64,
    /// Delay after a slippage change before re-quoting
    pub slippage_debounce_ms: u64,
    /// Delay after a token or chain selector change
    pub selector_debounce_ms: u64,
    /// Simulated network latency before a route set is applied
    pub quote_latency_ms: u64,
}

impl Default for QuoteTimings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            slippage_debounce_ms: 300,
            selector_debounce_ms: 100,
            quote_latency_ms: 300,
        }
    }
}

/// Behaviour of route regeneration triggered by buy-field edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyEditMode {
    /// Only the top route is computed and shown while the user types
    /// into the buy field
    SingleRoutePreview,
    /// Buy-field edits re-rank the full route set
    FullRegeneration,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_chain: String,
    pub default_sell_token: String,
    pub default_slippage_pct: f64,
    pub buy_edit_mode: BuyEditMode,
    pub timings: QuoteTimings,
    /// Optional path for the JSON preference store; in-memory when unset
    pub preferences_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_chain: "ethereum".to_string(),
            default_sell_token: "ETH".to_string(),
            default_slippage_pct: 0.3,
            buy_edit_mode: BuyEditMode::SingleRoutePreview,
            timings: QuoteTimings::default(),
            preferences_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse config file")?;
        Ok(cfg)
    }
}
