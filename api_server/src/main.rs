use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use config_manager::{ConfigurationError, SystemConfig};
use persistence_layer::{PersistenceError, PostgresClient};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracker_client::{SolanaTrackerClient, TrackerError};
use tracing::info;

mod handlers;
mod types;

use handlers::*;
use types::ErrorResponse;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: SystemConfig,
    pub tracker: Arc<SolanaTrackerClient>,
    pub store: Arc<PostgresClient>,
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),
    #[error("Trade history error: {0}")]
    Tracker(#[from] TrackerError),
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::Tracker(TrackerError::RateLimit) => {
                (StatusCode::TOO_MANY_REQUESTS, self.to_string())
            }
            ApiError::Tracker(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            ApiError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            timestamp: chrono::Utc::now(),
        });

        (status, body).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_server=debug".into()),
        )
        .init();

    info!("Starting Streak Tracker API Server...");

    // Load configuration
    let config = SystemConfig::load()?;
    config.validate()?;
    info!("Configuration loaded successfully");

    // Initialize the leaderboard store and bootstrap the schema
    let store = Arc::new(PostgresClient::new(&config.database.postgres_url).await?);
    store.init_schema().await?;
    info!("Leaderboard store initialized");

    // Initialize the trade history client
    let tracker = Arc::new(SolanaTrackerClient::new(config.solanatracker.clone())?);
    info!("SolanaTracker client initialized");

    let app_state = AppState {
        config: config.clone(),
        tracker,
        store,
    };

    let app = create_router(app_state);

    info!("Available endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /leaderboard - Ranked leaderboard rows");
    info!("   POST /leaderboard - Upsert a wallet's row");
    info!("   GET  /leaderboard/:wallet - One wallet's row and rank");
    info!("   GET  /wallets/:address/streak - Fetch, analyze, and store a wallet");

    // Bind and serve
    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/leaderboard", get(get_leaderboard))
        .route("/leaderboard", post(upsert_leaderboard))
        .route("/leaderboard/:wallet", get(get_wallet_rank))
        .route("/wallets/:address/streak", get(analyze_wallet))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(state)
}
