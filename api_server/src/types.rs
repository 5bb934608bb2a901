use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use streak_core::StreakReport;

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Standard API success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query parameters for leaderboard reads
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Maximum rows to return (capped by configuration)
    pub limit: Option<u32>,
}

/// Request body for a direct leaderboard upsert
#[derive(Debug, Deserialize)]
pub struct UpsertLeaderboardRequest {
    pub wallet: String,

    /// Missing values default to zero, matching the upstream contract
    #[serde(default)]
    pub streak: u32,

    #[serde(default, alias = "winRate")]
    pub win_rate: f64,
}

/// Response for a full wallet analysis run
#[derive(Debug, Serialize)]
pub struct WalletStreakResponse {
    /// Computed analysis result
    pub report: StreakReport,

    /// The wallet's leaderboard position after the run, when stored
    pub rank: Option<u32>,
}
