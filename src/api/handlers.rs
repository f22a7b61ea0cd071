//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::sim::series::HOURS_PER_DAY;
use crate::sim::types::SavingsAction;

use super::AppState;
use super::types::{ErrorResponse, HourlyQuery, HourlyRecord, SummaryResponse};

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse::new(&state.config, &state.result))
}

/// Returns hourly records, optionally filtered by hour range.
///
/// `GET /hourly` → 200 + 24 `HourlyRecord`s
/// `GET /hourly?from=N&to=M` → filtered range (inclusive)
/// `GET /hourly?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_hourly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HourlyQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(HOURS_PER_DAY - 1);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<HourlyRecord> = (from..=to.min(HOURS_PER_DAY - 1))
        .map(|hour| HourlyRecord::from_result(&state.result, hour))
        .collect();

    Ok(Json(records))
}

/// `GET /savings` → 200 + `Vec<SavingsAction>` JSON
pub async fn get_savings(State(state): State<Arc<AppState>>) -> Json<Vec<SavingsAction>> {
    Json(state.result.savings_actions.clone())
}
