use rust_decimal::prelude::ToPrimitive;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use streak_core::StreakReport;
use tracing::{debug, info};

use crate::{LeaderboardEntry, PersistenceError, RankedLeaderboardEntry, Result};

/// PostgreSQL client for the leaderboard table
#[derive(Debug, Clone)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with pooled connections
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| {
                PersistenceError::PoolCreation(format!("PostgreSQL connection error: {}", e))
            })?;

        info!("PostgreSQL pool initialized: max_connections=20");
        Ok(Self { pool })
    }

    /// Create the leaderboard table if it does not exist yet
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leaderboard (
                wallet      TEXT PRIMARY KEY,
                streak      INTEGER NOT NULL DEFAULT 0,
                win_rate    DOUBLE PRECISION NOT NULL DEFAULT 0,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Leaderboard table ready");
        Ok(())
    }

    /// Insert or update a wallet's leaderboard row
    pub async fn upsert_entry(&self, wallet: &str, streak: u32, win_rate: f64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO leaderboard (wallet, streak, win_rate, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (wallet) DO UPDATE
                SET streak = EXCLUDED.streak,
                    win_rate = EXCLUDED.win_rate,
                    updated_at = now()
            "#,
        )
        .bind(wallet)
        .bind(streak as i32)
        .bind(win_rate)
        .execute(&self.pool)
        .await?;

        debug!(
            "Upserted leaderboard row: wallet={}, streak={}",
            wallet, streak
        );
        Ok(())
    }

    /// Upsert a wallet's row straight from an analysis report
    pub async fn upsert_report(&self, report: &StreakReport) -> Result<()> {
        let win_rate = report.win_rate.to_f64().unwrap_or(0.0);
        self.upsert_entry(&report.wallet_address, report.max_streak, win_rate)
            .await
    }

    /// Top leaderboard rows, ranked by streak descending (ties broken by most
    /// recently updated)
    pub async fn get_leaderboard(&self, limit: u32) -> Result<Vec<RankedLeaderboardEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT wallet, streak, win_rate, updated_at
            FROM leaderboard
            ORDER BY streak DESC, updated_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| RankedLeaderboardEntry {
                rank: index as u32 + 1,
                entry: LeaderboardEntry {
                    wallet: row.get("wallet"),
                    streak: row.get::<i32, _>("streak") as u32,
                    win_rate: row.get("win_rate"),
                    updated_at: row.get("updated_at"),
                },
            })
            .collect::<Vec<_>>();

        debug!("Returning {} leaderboard rows", entries.len());
        Ok(entries)
    }

    /// A single wallet's row with its rank over the whole table, or `None`
    /// when the wallet has never been stored
    pub async fn get_wallet_entry(&self, wallet: &str) -> Result<Option<RankedLeaderboardEntry>> {
        let row = sqlx::query(
            r#"
            SELECT rank, wallet, streak, win_rate, updated_at
            FROM (
                SELECT *,
                       ROW_NUMBER() OVER (ORDER BY streak DESC, updated_at DESC) AS rank
                FROM leaderboard
            ) ranked
            WHERE wallet = $1
            "#,
        )
        .bind(wallet)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| RankedLeaderboardEntry {
            rank: row.get::<i64, _>("rank") as u32,
            entry: LeaderboardEntry {
                wallet: row.get("wallet"),
                streak: row.get::<i32, _>("streak") as u32,
                win_rate: row.get("win_rate"),
                updated_at: row.get("updated_at"),
            },
        }))
    }
}
