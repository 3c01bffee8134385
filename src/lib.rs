//! AlpacaSwap quote core
//! Built with Domain-Driven Design principles

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use application::orchestrator::{QuoteOrchestrator, OrchestratorConfig, SwapReadModel};
pub use domain::quote::{MockRouteGenerator, RouteSource};
pub use domain::registry::TokenRegistry;
pub use infrastructure::preferences::Preferences;
