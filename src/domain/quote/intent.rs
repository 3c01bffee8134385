//! Swap intent - the user's declared desire to swap

use serde::{Deserialize, Serialize};

/// Which amount field the user most recently drove. Governs derivation
/// direction and the regeneration mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditFocus {
    None,
    Sell,
    Buy,
}

/// User-entered swap parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapIntent {
    pub chain_id: String,
    pub from_token: Option<String>,
    pub to_token: Option<String>,
    pub sell_amount: f64,
    pub slippage_pct: f64,
}

impl SwapIntent {
    pub fn new(chain_id: &str, from_token: &str, slippage_pct: f64) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            from_token: Some(from_token.to_string()),
            to_token: None,
            sell_amount: 0.0,
            slippage_pct,
        }
    }

    /// An intent can be quoted once both tokens are set, they differ,
    /// and the sell amount is a positive finite number.
    pub fn is_quotable(&self) -> bool {
        match (&self.from_token, &self.to_token) {
            (Some(from), Some(to)) => {
                from != to && self.sell_amount.is_finite() && self.sell_amount > 0.0
            }
            _ => false,
        }
    }
}
