use crate::types::*;
use crate::{ApiError, AppState};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use streak_core::analyze_transfers;
use tracing::info;

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(SuccessResponse::new(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Ranked leaderboard rows, streak descending
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let cap = state.config.leaderboard.max_rows;
    let limit = query.limit.unwrap_or(cap).min(cap);

    let entries = state.store.get_leaderboard(limit).await?;
    Ok(Json(SuccessResponse::new(entries)))
}

/// Upsert a wallet's leaderboard row directly
pub async fn upsert_leaderboard(
    State(state): State<AppState>,
    Json(request): Json<UpsertLeaderboardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.wallet.trim().is_empty() {
        return Err(ApiError::Validation("Missing wallet".to_string()));
    }

    state
        .store
        .upsert_entry(&request.wallet, request.streak, request.win_rate)
        .await?;

    info!(
        "Leaderboard upsert: wallet={}, streak={}, win_rate={}",
        request.wallet, request.streak, request.win_rate
    );

    // Echo the stored row, rank included
    let entry = state
        .store
        .get_wallet_entry(&request.wallet)
        .await?
        .ok_or_else(|| ApiError::Internal("Upserted row not found".to_string()))?;

    Ok(Json(SuccessResponse::new(entry)))
}

/// A single wallet's leaderboard row and rank
pub async fn get_wallet_rank(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .store
        .get_wallet_entry(&wallet)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Wallet not found: {}", wallet)))?;

    Ok(Json(SuccessResponse::new(entry)))
}

/// Full pipeline: fetch a wallet's trades, compute its streak, store the
/// result, and return the report with the wallet's new rank
pub async fn analyze_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if address.trim().is_empty() {
        return Err(ApiError::Validation("Missing wallet address".to_string()));
    }

    let transfers = state.tracker.get_wallet_trades_paginated(&address).await?;
    info!("Analyzing {} transfers for wallet {}", transfers.len(), address);

    let report = analyze_transfers(&address, transfers);

    state.store.upsert_report(&report).await?;
    let rank = state
        .store
        .get_wallet_entry(&address)
        .await?
        .map(|entry| entry.rank);

    Ok(Json(SuccessResponse::new(WalletStreakResponse {
        report,
        rank,
    })))
}
