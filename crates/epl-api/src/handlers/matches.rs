//! Match endpoints, including the status and result transitions.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/v1/matches` | List matches (`season`, `gameweek`, `team_id`, `status`) |
//! | `POST` | `/api/v1/matches` | Create a match |
//! | `GET` | `/api/v1/matches/{id}` | Get one match |
//! | `PATCH` | `/api/v1/matches/{id}` | Update fixture details |
//! | `DELETE` | `/api/v1/matches/{id}` | Delete a match with its predictions and statistics |
//! | `PUT` | `/api/v1/matches/{id}/status` | Move to `ongoing` |
//! | `PUT` | `/api/v1/matches/{id}/result` | Record the final score |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use epl_db::MatchFilter;
use epl_types::{FinalScore, Match, MatchId, MatchStatus, MatchUpdate, NewMatch};
use serde::Deserialize;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `PUT /api/v1/matches/{id}/status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusChange {
    /// Target status.
    pub status: MatchStatus,
}

/// List matches in kick-off order, optionally filtered.
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MatchFilter>, QueryRejection>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let Query(filter) = query?;

    let mut session = state.session().await?;
    let matches = session.matches().list(&filter).await?;
    Ok(Json(matches))
}

/// Create a match between two existing teams.
pub async fn create_match(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewMatch>, JsonRejection>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let Json(new) = body?;

    let mut session = state.session().await?;
    let created = session.matches().create(&new).await?;
    session.commit().await?;

    tracing::info!(
        match_id = %created.id,
        season = created.season,
        gameweek = created.gameweek,
        "Match created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get one match.
pub async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Match>, ApiError> {
    let id: MatchId = parse_id(&id)?;

    let mut session = state.session().await?;
    let found = session
        .matches()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("match", id.into_inner()))?;
    Ok(Json(found))
}

/// Apply a partial update to the fixture details.
pub async fn update_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<MatchUpdate>, JsonRejection>,
) -> Result<Json<Match>, ApiError> {
    let id: MatchId = parse_id(&id)?;
    let Json(update) = body?;

    let mut session = state.session().await?;
    let updated = session.matches().update(id, &update).await?;
    session.commit().await?;
    Ok(Json(updated))
}

/// Delete a match. Its predictions and statistics go with it.
pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: MatchId = parse_id(&id)?;

    let mut session = state.session().await?;
    if !session.matches().delete(id).await? {
        return Err(ApiError::not_found("match", id.into_inner()));
    }
    session.commit().await?;

    tracing::info!(match_id = %id, "Match deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Change a match's status. Completing a match goes through
/// [`record_result`] instead.
pub async fn set_match_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<StatusChange>, JsonRejection>,
) -> Result<Json<Match>, ApiError> {
    let id: MatchId = parse_id(&id)?;
    let Json(change) = body?;

    let mut session = state.session().await?;
    let updated = session.matches().set_status(id, change.status).await?;
    session.commit().await?;
    Ok(Json(updated))
}

/// Record the final score, complete the match, and settle its predictions.
pub async fn record_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<FinalScore>, JsonRejection>,
) -> Result<Json<Match>, ApiError> {
    let id: MatchId = parse_id(&id)?;
    let Json(score) = body?;

    let mut session = state.session().await?;
    let completed = session.matches().record_result(id, score).await?;
    session.commit().await?;
    Ok(Json(completed))
}
