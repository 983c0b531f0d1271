//! Match statistics endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/v1/matches/{id}/statistics` | Statistics for a match |
//! | `POST` | `/api/v1/matches/{id}/statistics` | Record statistics |
//! | `GET` | `/api/v1/statistics/{id}` | Get one statistics row |
//! | `DELETE` | `/api/v1/statistics/{id}` | Delete a statistics row |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use epl_types::{MatchId, MatchStatistic, NewMatchStatistic, StatisticId};

use super::parse_id;
use super::predictions::ensure_match;
use crate::error::ApiError;
use crate::state::AppState;

/// List the statistics recorded for a match.
pub async fn list_match_statistics(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<MatchStatistic>>, ApiError> {
    let match_id: MatchId = parse_id(&match_id)?;

    let mut session = state.session().await?;
    ensure_match(&mut session, match_id).await?;
    let stats = session.statistics().list_for_match(match_id).await?;
    Ok(Json(stats))
}

/// Record statistics for a match. Missing shot totals are derived from
/// the per-side numbers.
pub async fn create_statistic(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
    body: Result<Json<NewMatchStatistic>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchStatistic>), ApiError> {
    let match_id: MatchId = parse_id(&match_id)?;
    let Json(new) = body?;

    let mut session = state.session().await?;
    ensure_match(&mut session, match_id).await?;
    let stat = session.statistics().create(match_id, &new).await?;
    session.commit().await?;
    Ok((StatusCode::CREATED, Json(stat)))
}

/// Get one statistics row.
pub async fn get_statistic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MatchStatistic>, ApiError> {
    let id: StatisticId = parse_id(&id)?;

    let mut session = state.session().await?;
    let stat = session
        .statistics()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("statistics", id.into_inner()))?;
    Ok(Json(stat))
}

/// Delete a statistics row.
pub async fn delete_statistic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: StatisticId = parse_id(&id)?;

    let mut session = state.session().await?;
    if !session.statistics().delete(id).await? {
        return Err(ApiError::not_found("statistics", id.into_inner()));
    }
    session.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
