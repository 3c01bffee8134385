//! Simulated aggregator routes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Route quality markers shown on route cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteBadge {
    Best,
    LowGas,
    Fast,
    MevProtected,
}

impl RouteBadge {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteBadge::Best => "BEST",
            RouteBadge::LowGas => "LOW_GAS",
            RouteBadge::Fast => "FAST",
            RouteBadge::MevProtected => "MEV_PROTECTED",
        }
    }
}

/// One simulated path for executing the swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub aggregator: String,
    /// Output in to-token units, after source decay
    pub output_amount: f64,
    /// Output valued in USD net of gas; the ranking key
    pub output_fiat: f64,
    pub gas_usd: f64,
    pub price_impact_pct: f64,
    pub hops: u8,
    pub success_rate_pct: f64,
    pub reliability_stars: u8,
    pub badges: Vec<RouteBadge>,
    pub description: String,
}

impl Route {
    /// Minimum amount received under the slippage tolerance; feeds the
    /// confirmation step only, never the ranking.
    pub fn min_received(&self, slippage_pct: f64) -> f64 {
        self.output_amount * (1.0 - slippage_pct / 100.0)
    }

    pub fn is_best(&self) -> bool {
        self.badges.contains(&RouteBadge::Best)
    }
}

/// Ranked set of routes for one intent snapshot. Replaced wholesale on
/// every regeneration; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSet {
    pub routes: Vec<Route>,
    pub generated_at: DateTime<Utc>,
}

impl RouteSet {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            generated_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// The best route is always ranked first
    pub fn best(&self) -> Option<&Route> {
        self.routes.first()
    }

    pub fn get(&self, route_id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == route_id)
    }

    pub fn contains(&self, route_id: &str) -> bool {
        self.get(route_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, output: f64) -> Route {
        Route {
            id: id.to_string(),
            aggregator: "ParaSwap".to_string(),
            output_amount: output,
            output_fiat: output,
            gas_usd: 1.32,
            price_impact_pct: 0.08,
            hops: 1,
            success_rate_pct: 99.2,
            reliability_stars: 5,
            badges: vec![RouteBadge::Best],
            description: String::new(),
        }
    }

    #[test]
    fn test_min_received() {
        let r = route("paraswap", 1000.0);
        assert!((r.min_received(0.5) - 995.0).abs() < 1e-9);
        assert!((r.min_received(0.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_route_set_lookup() {
        let set = RouteSet::new(vec![route("paraswap", 1000.0), route("matcha", 990.0)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.best().unwrap().id, "paraswap");
        assert!(set.contains("matcha"));
        assert!(!set.contains("odos"));
    }
}
