//! Prediction endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/v1/matches/{id}/predictions` | Predictions for a match |
//! | `POST` | `/api/v1/matches/{id}/predictions` | Predict a match |
//! | `GET` | `/api/v1/predictions/{id}` | Get one prediction |
//! | `DELETE` | `/api/v1/predictions/{id}` | Delete a prediction |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use epl_db::Session;
use epl_types::{MatchId, NewPrediction, Prediction, PredictionId};

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// List the predictions for a match, oldest first.
pub async fn list_match_predictions(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<Prediction>>, ApiError> {
    let match_id: MatchId = parse_id(&match_id)?;

    let mut session = state.session().await?;
    ensure_match(&mut session, match_id).await?;
    let predictions = session.predictions().list_for_match(match_id).await?;
    Ok(Json(predictions))
}

/// Add a prediction to a match.
pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
    body: Result<Json<NewPrediction>, JsonRejection>,
) -> Result<(StatusCode, Json<Prediction>), ApiError> {
    let match_id: MatchId = parse_id(&match_id)?;
    let Json(new) = body?;

    let mut session = state.session().await?;
    ensure_match(&mut session, match_id).await?;
    let prediction = session.predictions().create(match_id, &new).await?;
    session.commit().await?;

    tracing::info!(
        prediction_id = %prediction.id,
        match_id = %match_id,
        outcome = %prediction.predicted_outcome,
        "Prediction created"
    );
    Ok((StatusCode::CREATED, Json(prediction)))
}

/// Get one prediction.
pub async fn get_prediction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Prediction>, ApiError> {
    let id: PredictionId = parse_id(&id)?;

    let mut session = state.session().await?;
    let prediction = session
        .predictions()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("prediction", id.into_inner()))?;
    Ok(Json(prediction))
}

/// Delete a prediction.
pub async fn delete_prediction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: PredictionId = parse_id(&id)?;

    let mut session = state.session().await?;
    if !session.predictions().delete(id).await? {
        return Err(ApiError::not_found("prediction", id.into_inner()));
    }
    session.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fail with 404 unless the match exists.
pub(super) async fn ensure_match(session: &mut Session, id: MatchId) -> Result<(), ApiError> {
    if session.matches().get(id).await?.is_none() {
        return Err(ApiError::not_found("match", id.into_inner()));
    }
    Ok(())
}
