use anyhow::Result;
use clap::Parser;

use alpacaswap::application::{Cli, CommandExecutor};
use alpacaswap::shared::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    // Config file is optional; CLI flags on subcommands take precedence
    // over its contents
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    CommandExecutor::execute(cli.command, config).await?;
    Ok(())
}
