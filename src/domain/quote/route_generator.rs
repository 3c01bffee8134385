//! Simulated route generation over a fixed table of liquidity sources

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::domain::quote::intent::SwapIntent;
use crate::domain::quote::route::{Route, RouteBadge, RouteSet};
use crate::domain::registry::TokenRegistry;

/// Options controlling a single generation request
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Compute only the top route (buy-field preview mode)
    pub limit_to_one: bool,
}

/// Awaitable source of route quotes. The mock implementation is a pure
/// local computation; a real implementation would wrap a network call.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn generate(&self, intent: &SwapIntent, opts: GenerateOptions) -> RouteSet;
}

/// One simulated aggregator venue with fixed quoting characteristics
struct LiquiditySource {
    name: &'static str,
    /// Output decay off the reference rate, in basis points
    decay_bps: f64,
    gas_multiplier: f64,
    price_impact_pct: f64,
    hops: u8,
    success_rate_pct: f64,
    reliability_stars: u8,
    badges: &'static [RouteBadge],
    description: &'static str,
}

/// Reference gas cost of a single-hop swap in USD
const BASE_GAS_USD: f64 = 0.5256;

const SOURCES: &[LiquiditySource] = &[
    LiquiditySource {
        name: "ParaSwap",
        decay_bps: 18.0,
        gas_multiplier: 2.5,
        price_impact_pct: 0.08,
        hops: 1,
        success_rate_pct: 99.2,
        reliability_stars: 5,
        badges: &[],
        description: "Best net output after gas; single hop with excellent success rate.",
    },
    LiquiditySource {
        name: "Matcha",
        decay_bps: 21.0,
        gas_multiplier: 6.1,
        price_impact_pct: 0.09,
        hops: 2,
        success_rate_pct: 97.8,
        reliability_stars: 4,
        badges: &[],
        description: "Slightly lower output; higher gas due to multiple hops.",
    },
    LiquiditySource {
        name: "KyberSwap",
        decay_bps: 25.0,
        gas_multiplier: 3.55,
        price_impact_pct: 0.12,
        hops: 1,
        success_rate_pct: 98.5,
        reliability_stars: 4,
        badges: &[],
        description: "Better price impact, slightly lower net after gas.",
    },
    LiquiditySource {
        name: "Odos",
        decay_bps: 32.0,
        gas_multiplier: 8.95,
        price_impact_pct: 0.15,
        hops: 3,
        success_rate_pct: 96.2,
        reliability_stars: 4,
        badges: &[],
        description: "More hops for better rate discovery; higher gas cost.",
    },
    LiquiditySource {
        name: "0x",
        decay_bps: 28.0,
        gas_multiplier: 1.65,
        price_impact_pct: 0.11,
        hops: 1,
        success_rate_pct: 99.8,
        reliability_stars: 5,
        badges: &[RouteBadge::LowGas, RouteBadge::Fast],
        description: "Cheapest gas, slightly lower output.",
    },
    LiquiditySource {
        name: "CowSwap",
        decay_bps: 35.0,
        gas_multiplier: 0.0,
        price_impact_pct: 0.18,
        hops: 1,
        success_rate_pct: 94.5,
        reliability_stars: 3,
        badges: &[RouteBadge::MevProtected],
        description: "MEV-protected gasless trade; lower success rate.",
    },
];

/// Deterministic route generator backed by the registry price table.
/// For a fixed intent snapshot it always yields the same routes in the
/// same order, so repeated calls are interchangeable.
pub struct MockRouteGenerator {
    registry: Arc<TokenRegistry>,
}

impl MockRouteGenerator {
    pub fn new(registry: Arc<TokenRegistry>) -> Self {
        Self { registry }
    }

    fn build_routes(&self, intent: &SwapIntent) -> Vec<Route> {
        if !intent.is_quotable() {
            return Vec::new();
        }

        // is_quotable guarantees both tokens are present
        let from = intent.from_token.as_deref().unwrap_or_default();
        let to = intent.to_token.as_deref().unwrap_or_default();

        let (from_price, to_price) = match (self.registry.price_of(from), self.registry.price_of(to)) {
            (Some(f), Some(t)) if f > 0.0 && t > 0.0 => (f, t),
            _ => {
                debug!(from, to, "price resolution failed, returning no routes");
                return Vec::new();
            }
        };

        let base_output = intent.sell_amount * from_price / to_price;

        let mut routes: Vec<Route> = SOURCES
            .iter()
            .map(|source| {
                let output_amount = base_output * (1.0 - source.decay_bps / 10_000.0);
                let gas_usd = BASE_GAS_USD * source.gas_multiplier;
                Route {
                    id: source.name.to_lowercase(),
                    aggregator: source.name.to_string(),
                    output_amount,
                    // Net value after gas is the ranking key, not raw output
                    output_fiat: output_amount * to_price - gas_usd,
                    gas_usd,
                    price_impact_pct: source.price_impact_pct,
                    hops: source.hops,
                    success_rate_pct: source.success_rate_pct,
                    reliability_stars: source.reliability_stars,
                    badges: source.badges.to_vec(),
                    description: source.description.to_string(),
                }
            })
            .collect();

        routes.sort_by(|a, b| {
            b.output_fiat
                .partial_cmp(&a.output_fiat)
                .unwrap_or(Ordering::Equal)
        });

        // Exactly one BEST per set, always the head of the ranking
        if let Some(best) = routes.first_mut() {
            best.badges.insert(0, RouteBadge::Best);
        }

        routes
    }
}

#[async_trait]
impl RouteSource for MockRouteGenerator {
    async fn generate(&self, intent: &SwapIntent, opts: GenerateOptions) -> RouteSet {
        let mut routes = self.build_routes(intent);
        if opts.limit_to_one {
            routes.truncate(1);
        }
        debug!(
            from = intent.from_token.as_deref().unwrap_or("-"),
            to = intent.to_token.as_deref().unwrap_or("-"),
            count = routes.len(),
            "generated route set"
        );
        RouteSet::new(routes)
    }
}
