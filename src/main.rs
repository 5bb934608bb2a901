use anyhow::{bail, Context, Result};
use config_manager::SystemConfig;
use persistence_layer::PostgresClient;
use streak_core::analyze_transfers;
use tracker_client::SolanaTrackerClient;
use tracing::info;

/// One-shot pipeline for a single wallet: fetch trades, compute the streak,
/// print the result, and store it when the database is enabled.
///
/// The long-running service entrypoint is `cargo run -p api_server`.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let wallet = match std::env::args().nth(1) {
        Some(wallet) => wallet,
        None => bail!("Usage: streak_tracker <wallet-address>"),
    };

    let config = SystemConfig::load().context("Failed to load configuration")?;
    config
        .solanatracker
        .validate()
        .context("SolanaTracker configuration is invalid")?;

    let tracker = SolanaTrackerClient::new(config.solanatracker.clone())?;
    let transfers = tracker
        .get_wallet_trades_paginated(&wallet)
        .await
        .context("Failed to fetch trade history")?;

    info!("Fetched {} transfers for wallet {}", transfers.len(), wallet);

    let report = analyze_transfers(&wallet, transfers);

    println!("Wallet:       {}", report.wallet_address);
    println!("Max streak:   {}", report.max_streak);
    println!("Win rate:     {:.2}%", report.win_rate);
    println!(
        "Cycles:       {} closed, {} wins",
        report.total_trades, report.total_wins
    );

    if config.database.enabled {
        let store = PostgresClient::new(&config.database.postgres_url)
            .await
            .context("Failed to connect to the leaderboard database")?;
        store.init_schema().await?;
        store.upsert_report(&report).await?;

        if let Some(entry) = store.get_wallet_entry(&wallet).await? {
            println!("Leaderboard:  rank #{}", entry.rank);
        }
    }

    Ok(())
}
