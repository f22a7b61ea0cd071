//! Read-only REST API over one simulated household day.
//!
//! Provides three GET endpoints:
//! - `/summary`: totals, peak hour and currency
//! - `/hourly`: hourly series with optional inclusive hour range
//! - `/savings`: load-shift suggestions

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::simulate;
use crate::sim::types::{HouseholdConfig, SimulationResult};

pub use types::{ErrorResponse, HourlyQuery, HourlyRecord, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once from a configuration and wrapped in `Arc`; nothing is
/// recomputed per request.
pub struct AppState {
    /// Household that was simulated.
    pub config: HouseholdConfig,
    /// Outcome of simulating `config`.
    pub result: SimulationResult,
}

impl AppState {
    /// Simulates `config` and keeps both for serving.
    pub fn new(config: HouseholdConfig) -> Self {
        let result = simulate(&config);
        Self { config, result }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/hourly", get(handlers::get_hourly))
        .route("/savings", get(handlers::get_savings))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
