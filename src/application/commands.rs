//! CLI commands and handlers

use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::orchestrator::{OrchestratorConfig, QuoteOrchestrator};
use crate::domain::quote::{GenerateOptions, MockRouteGenerator, Route, RouteSource, SwapIntent};
use crate::domain::registry::TokenRegistry;
use crate::infrastructure::preferences::{JsonFileStore, MemoryStore, Preferences, PreferenceStore};
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppError, IntentError};
use crate::shared::utils::format_amount;

#[derive(Parser)]
#[command(name = "alpacaswap")]
#[command(version, about = "AlpacaSwap quote core - simulated swap-route aggregation")]
pub struct Cli {
    /// Path to config file (optional)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported tokens and chains
    Tokens,

    /// Generate ranked route quotes for a swap intent
    Quote {
        /// Token to sell
        #[arg(long, default_value = "ETH")]
        from: String,

        /// Token to buy
        #[arg(long, default_value = "USDC")]
        to: String,

        /// Amount to sell, in from-token units
        #[arg(short, long)]
        amount: f64,

        /// Chain to quote on
        #[arg(long, default_value = "ethereum")]
        chain: String,

        /// Slippage tolerance in percent
        #[arg(short, long, default_value_t = 0.5)]
        slippage: f64,

        /// Compute only the best route
        #[arg(long)]
        limit_one: bool,
    },

    /// Run a scripted orchestrator session end to end
    Demo {
        /// Milliseconds to pause between scripted steps
        #[arg(long, default_value_t = 1000)]
        step_ms: u64,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, config: AppConfig) -> Result<(), AppError> {
        match command {
            Commands::Tokens => Self::execute_tokens_command().await,
            Commands::Quote {
                from,
                to,
                amount,
                chain,
                slippage,
                limit_one,
            } => Self::execute_quote_command(&from, &to, amount, &chain, slippage, limit_one).await,
            Commands::Demo { step_ms } => Self::execute_demo_command(config, step_ms).await,
        }
    }

    /// Execute tokens command
    async fn execute_tokens_command() -> Result<(), AppError> {
        let registry = TokenRegistry::mainnet();

        info!("🪙 Supported tokens:");
        for token in registry.list_tokens() {
            info!(
                "   {} ({}) - {} decimals, ${}",
                token.symbol,
                token.name,
                token.decimals,
                registry.price_of(&token.symbol).unwrap_or(0.0)
            );
        }

        info!("⛓️  Supported chains:");
        for chain in registry.list_chains() {
            info!("   {} (chain id {})", chain.name, chain.chain_id);
        }

        Ok(())
    }

    /// Execute quote command
    async fn execute_quote_command(
        from: &str,
        to: &str,
        amount: f64,
        chain: &str,
        slippage: f64,
        limit_one: bool,
    ) -> Result<(), AppError> {
        let registry = Arc::new(TokenRegistry::mainnet());

        if registry.chain(chain).is_none() {
            return Err(IntentError::UnknownChain(chain.to_string()).into());
        }
        if !registry.is_listed(from) {
            return Err(IntentError::UnknownToken(from.to_string()).into());
        }
        if !registry.is_listed(to) {
            return Err(IntentError::UnknownToken(to.to_string()).into());
        }
        if from == to {
            return Err(IntentError::SameTokenPair(from.to_string()).into());
        }

        let intent = SwapIntent {
            chain_id: chain.to_string(),
            from_token: Some(from.to_string()),
            to_token: Some(to.to_string()),
            sell_amount: amount,
            slippage_pct: slippage,
        };

        if !intent.is_quotable() {
            info!("⏳ Nothing to quote: enter an amount greater than zero");
            return Ok(());
        }

        info!("🔍 Quoting {} {} -> {} on {}...", amount, from, to, chain);

        let generator = MockRouteGenerator::new(registry);
        let set = generator
            .generate(&intent, GenerateOptions { limit_to_one: limit_one })
            .await;

        if set.is_empty() {
            info!("❌ No routes available");
            return Ok(());
        }

        info!("💱 {} route(s), best first:", set.len());
        for (i, route) in set.routes.iter().enumerate() {
            Self::print_route(i + 1, route, to, slippage);
        }

        Ok(())
    }

    fn print_route(rank: usize, route: &Route, to: &str, slippage_pct: f64) {
        let badges = route
            .badges
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        info!(
            "   {}. {} -> {} {} (${} net, gas ${})",
            rank,
            route.aggregator,
            format_amount(route.output_amount, 4),
            to,
            format_amount(route.output_fiat, 2),
            format_amount(route.gas_usd, 2)
        );
        info!(
            "      impact {:.2}%, {} hop(s), {:.1}% success, {}★{}",
            route.price_impact_pct,
            route.hops,
            route.success_rate_pct,
            route.reliability_stars,
            if badges.is_empty() {
                String::new()
            } else {
                format!(", [{}]", badges)
            }
        );
        info!(
            "      min received at {:.2}% slippage: {} {}",
            slippage_pct,
            format_amount(route.min_received(slippage_pct), 4),
            to
        );
    }

    /// Execute demo command - a scripted session against the live
    /// orchestrator, showing debounce, selection, and reset
    async fn execute_demo_command(config: AppConfig, step_ms: u64) -> Result<(), AppError> {
        let registry = Arc::new(TokenRegistry::mainnet());
        let source = Arc::new(MockRouteGenerator::new(Arc::clone(&registry)));

        let store: Arc<dyn PreferenceStore> = match &config.preferences_path {
            Some(path) => Arc::new(JsonFileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let preferences = Preferences::new(store);

        let ui = preferences.load();
        info!(
            "⚙️  Preferences: slippage {:.2}%, theme {:?}, view {:?}, hide IP {}",
            ui.slippage_pct, ui.theme, ui.view_mode, ui.hide_ip
        );

        // Edits settle after the debounce quiet period plus the simulated
        // quoting latency
        let settle = Duration::from_millis(
            config.timings.debounce_ms + config.timings.quote_latency_ms + step_ms,
        );

        let orch = QuoteOrchestrator::new(
            OrchestratorConfig::from(&config),
            registry,
            source,
            preferences,
        );

        info!("🚀 Starting scripted swap session");

        info!("👉 Selecting pair ETH -> USDC");
        orch.set_token_pair("ETH", "USDC").await?;

        info!("👉 Typing sell amount: 1.0 ETH");
        orch.set_sell_amount("1.0").await;
        tokio::time::sleep(settle).await;
        Self::print_read_model(&orch).await;

        let second_route = {
            let rm = orch.read_model().await;
            rm.routes.routes.get(1).map(|r| r.id.clone())
        };
        if let Some(route_id) = second_route {
            info!("👉 Picking an alternative route: {}", route_id);
            orch.select_route(&route_id).await;
            Self::print_read_model(&orch).await;
        }

        info!("👉 Raising slippage to 1.0%");
        orch.set_slippage(1.0).await?;
        tokio::time::sleep(settle).await;
        Self::print_read_model(&orch).await;

        info!("👉 Typing buy amount: 500 USDC");
        orch.set_buy_amount("500").await;
        tokio::time::sleep(settle).await;
        Self::print_read_model(&orch).await;

        info!("👉 Refreshing quotes");
        orch.refresh().await;
        tokio::time::sleep(settle).await;
        Self::print_read_model(&orch).await;

        info!("👉 Resetting the session");
        orch.reset().await;
        Self::print_read_model(&orch).await;

        info!("✅ Demo finished");
        Ok(())
    }

    async fn print_read_model(orch: &QuoteOrchestrator) {
        let rm = orch.read_model().await;
        let pair = format!(
            "{} -> {}",
            rm.intent.from_token.as_deref().unwrap_or("-"),
            rm.intent.to_token.as_deref().unwrap_or("-")
        );

        info!("📊 State:");
        info!(
            "   pair: {} on {}, sell {}, slippage {:.2}%",
            pair, rm.intent.chain_id, rm.sell_amount_raw, rm.intent.slippage_pct
        );
        info!(
            "   focus: {:?}, loading: {}, routes: {}",
            rm.edit_focus,
            rm.is_loading,
            rm.routes.len()
        );

        match (&rm.selected_route_id, rm.routes.best()) {
            (Some(selected), _) => {
                if let Some(route) = rm.routes.get(selected) {
                    info!(
                        "   selected: {} ({} out, ${} net)",
                        route.aggregator,
                        format_amount(route.output_amount, 4),
                        format_amount(route.output_fiat, 2)
                    );
                } else {
                    warn!("   selected route {} missing from set", selected);
                }
            }
            (None, Some(_)) => warn!("   routes present but nothing selected"),
            (None, None) => info!("   no routes"),
        }
    }
}
