//! Team endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/v1/teams` | List all teams |
//! | `POST` | `/api/v1/teams` | Create a team |
//! | `GET` | `/api/v1/teams/{id}` | Get one team |
//! | `PATCH` | `/api/v1/teams/{id}` | Update a team |
//! | `DELETE` | `/api/v1/teams/{id}` | Delete a team and its matches |
//! | `GET` | `/api/v1/teams/{id}/matches` | Home and away matches of a team |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use epl_types::{Match, NewTeam, Team, TeamId, TeamUpdate};

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// List all teams ordered by name.
pub async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Team>>, ApiError> {
    let mut session = state.session().await?;
    let teams = session.teams().list().await?;
    Ok(Json(teams))
}

/// Create a team.
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewTeam>, JsonRejection>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let Json(new) = body?;

    let mut session = state.session().await?;
    let team = session.teams().create(&new).await?;
    session.commit().await?;

    tracing::info!(team_id = %team.id, code = %team.code, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}

/// Get one team.
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Team>, ApiError> {
    let id: TeamId = parse_id(&id)?;

    let mut session = state.session().await?;
    let team = session
        .teams()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("team", id.into_inner()))?;
    Ok(Json(team))
}

/// Apply a partial update to a team.
pub async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<TeamUpdate>, JsonRejection>,
) -> Result<Json<Team>, ApiError> {
    let id: TeamId = parse_id(&id)?;
    let Json(update) = body?;

    let mut session = state.session().await?;
    let team = session.teams().update(id, &update).await?;
    session.commit().await?;
    Ok(Json(team))
}

/// Delete a team. Its home and away matches go with it.
pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: TeamId = parse_id(&id)?;

    let mut session = state.session().await?;
    if !session.teams().delete(id).await? {
        return Err(ApiError::not_found("team", id.into_inner()));
    }
    session.commit().await?;

    tracing::info!(team_id = %id, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// List every match a team plays in, in kick-off order.
pub async fn list_team_matches(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let id: TeamId = parse_id(&id)?;

    let mut session = state.session().await?;
    if session.teams().get(id).await?.is_none() {
        return Err(ApiError::not_found("team", id.into_inner()));
    }
    let matches = session.matches().list_for_team(id).await?;
    Ok(Json(matches))
}
