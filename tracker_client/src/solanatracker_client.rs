use anyhow::Result;
use config_manager::SolanaTrackerConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use streak_core::Transfer;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Authentication error")]
    Auth,
}

/// Wallet trades response from SolanaTracker (/wallet/{address}/trades)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTradesResponse {
    /// Raw swap records; missing in the payload means no trades
    #[serde(default)]
    pub trades: Vec<Transfer>,

    #[serde(rename = "nextCursor", default)]
    pub next_cursor: Option<i64>,

    #[serde(rename = "hasNextPage", default)]
    pub has_next_page: bool,
}

/// SolanaTracker HTTP client for wallet trade history
pub struct SolanaTrackerClient {
    config: SolanaTrackerConfig,
    http_client: Client,
}

impl SolanaTrackerClient {
    pub fn new(config: SolanaTrackerConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &SolanaTrackerConfig {
        &self.config
    }

    /// Fetch a single page of trades for a wallet
    pub async fn get_wallet_trades(&self, wallet: &str) -> Result<Vec<Transfer>, TrackerError> {
        let page = self.fetch_trades_page(wallet, None).await?;
        info!(
            "Retrieved {} trades from SolanaTracker for wallet {}",
            page.trades.len(),
            wallet
        );
        Ok(page.trades)
    }

    /// Fetch a wallet's trade history, following the cursor until the API
    /// reports no further pages or the configured page cap is reached
    pub async fn get_wallet_trades_paginated(
        &self,
        wallet: &str,
    ) -> Result<Vec<Transfer>, TrackerError> {
        let mut all_trades = Vec::new();
        let mut cursor: Option<i64> = None;

        for page_num in 1..=self.config.max_pages {
            let page = self.fetch_trades_page(wallet, cursor).await?;

            debug!(
                "Page {}: {} trades for wallet {} (has_next={})",
                page_num,
                page.trades.len(),
                wallet,
                page.has_next_page
            );

            all_trades.extend(page.trades);

            if !page.has_next_page {
                break;
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    warn!(
                        "SolanaTracker reported another page for {} but sent no cursor, stopping",
                        wallet
                    );
                    break;
                }
            }
        }

        info!(
            "Retrieved {} trades from SolanaTracker for wallet {}",
            all_trades.len(),
            wallet
        );
        Ok(all_trades)
    }

    async fn fetch_trades_page(
        &self,
        wallet: &str,
        cursor: Option<i64>,
    ) -> Result<WalletTradesResponse, TrackerError> {
        let url = format!("{}/wallet/{}/trades", self.config.api_base_url, wallet);

        debug!("Fetching trades from SolanaTracker: {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .header("x-api-key", &self.config.api_key);

        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request.send().await?;

        match response.status().as_u16() {
            401 | 403 => return Err(TrackerError::Auth),
            429 => return Err(TrackerError::RateLimit),
            status if !response.status().is_success() => {
                return Err(TrackerError::Api(format!("HTTP {}", status)));
            }
            _ => {}
        }

        response
            .json::<WalletTradesResponse>()
            .await
            .map_err(|e| TrackerError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trades_response() {
        let payload = r#"{
            "trades": [
                {
                    "from": {"address": "So11111111111111111111111111111111111111112", "amount": 1.5},
                    "to": {"address": "Mint11111111111111111111111111111111111111A", "amount": 1000},
                    "time": 1700000000
                }
            ],
            "nextCursor": 1700000000,
            "hasNextPage": true
        }"#;

        let parsed: WalletTradesResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.trades.len(), 1);
        assert_eq!(parsed.trades[0].time, 1700000000);
        assert!(parsed.has_next_page);
        assert_eq!(parsed.next_cursor, Some(1700000000));
    }

    #[test]
    fn missing_trades_field_means_empty() {
        let parsed: WalletTradesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.trades.is_empty());
        assert!(!parsed.has_next_page);
        assert!(parsed.next_cursor.is_none());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let payload = r#"{
            "trades": [
                {
                    "tx": "signature",
                    "from": {"address": "MintA", "amount": 10, "token": {"symbol": "A"}},
                    "to": {"address": "MintB", "amount": 20},
                    "time": 42,
                    "program": "jupiter"
                }
            ]
        }"#;

        let parsed: WalletTradesResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.trades[0].from.address, "MintA");
        assert_eq!(parsed.trades[0].to.address, "MintB");
    }
}
