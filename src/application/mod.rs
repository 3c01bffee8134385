//! Application layer - orchestration and CLI commands

pub mod commands;
pub mod orchestrator;

pub use commands::{Cli, CommandExecutor, Commands};
pub use orchestrator::{OrchestratorConfig, QuoteOrchestrator, SwapReadModel};
