//! Health API endpoint.

use std::sync::Arc;

use axum::extract::State;
use flatpage_response::{Response, StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/health.
#[derive(Serialize)]
struct HealthResponse {
    /// Always "ok" when the server answers at all.
    status: &'static str,
    /// Application version.
    version: String,
}

/// Handle GET /api/health.
pub(crate) async fn get_health(State(state): State<Arc<AppState>>) -> Response {
    Response::json(
        StatusCode::OK,
        &HealthResponse {
            status: "ok",
            version: state.version.clone(),
        },
    )
}
