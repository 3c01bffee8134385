//! Common types used across the application

use serde::{Deserialize, Serialize};

/// Token representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub decimals: u8,
    /// Demo wallet balance backing the MAX shortcut
    pub balance: f64,
}

/// Chain representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: String,
    pub name: String,
    pub chain_id: u64,
}

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Route list rendering mode preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Simple,
    Advanced,
}

/// Persisted UI preference scalars. These belong to the presentation
/// layer and never feed back into quote ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPreferences {
    pub slippage_pct: f64,
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub hide_ip: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            slippage_pct: 0.5,
            theme: Theme::Dark,
            view_mode: ViewMode::Simple,
            hide_ip: false,
        }
    }
}
