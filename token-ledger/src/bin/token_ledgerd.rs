//! Token ledger daemon
//!
//! Constructs the ledger from configuration, publishes its identity in
//! the logs, and serves until interrupted.

use token_ledger::{Config, Token};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting token ledger");

    // Config file if given, environment overrides otherwise
    let config = match std::env::var("TOKEN_LEDGER_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env()?,
    };

    let token = Token::open(config).await?;
    tracing::info!(
        ledger = %token.id(),
        supply = %token.total_supply().await?,
        "ledger ready"
    );

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down token ledger");
    token.shutdown().await?;
    Ok(())
}
