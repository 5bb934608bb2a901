pub mod postgres_client;

pub use postgres_client::PostgresClient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One stored leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Wallet address (primary key)
    pub wallet: String,

    /// Longest consecutive-win streak for this wallet
    pub streak: u32,

    /// Win rate percentage across closed cycles
    pub win_rate: f64,

    /// When this row was last upserted
    pub updated_at: DateTime<Utc>,
}

/// A leaderboard row together with its 1-based position in the
/// streak-descending ordering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedLeaderboardEntry {
    pub rank: u32,

    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Pool creation error: {0}")]
    PoolCreation(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
