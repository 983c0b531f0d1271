//! Liveness endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process is serving.
    pub status: &'static str,
    /// Configured service name.
    pub service: String,
    /// Configured service version.
    pub version: String,
}

/// Report that the server is up, with its configured name and version.
///
/// Does not touch the database.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.settings.api_title.clone(),
        version: state.settings.api_version.clone(),
    })
}
