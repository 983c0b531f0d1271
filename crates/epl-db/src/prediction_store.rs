//! Prediction persistence.
//!
//! A prediction's correctness is never written by callers. It stays unset
//! until the match result is recorded, at which point
//! [`PredictionStore::settle_for_match`] marks every prediction on the
//! match in one statement.

use chrono::{DateTime, Utc};
use epl_types::{MatchId, MatchOutcome, NewPrediction, Prediction, PredictionId};
use sqlx::PgConnection;
use validator::Validate;

use crate::error::DbError;

macro_rules! prediction_columns {
    () => {
        "id, match_id, predicted_outcome::TEXT AS predicted_outcome, confidence,
         predicted_home_score, predicted_away_score, model_version, is_correct, notes,
         created_at, updated_at"
    };
}

/// Operations on the `predictions` table within a session.
pub struct PredictionStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PredictionStore<'a> {
    /// Create a new prediction store bound to a session connection.
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a prediction for `match_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if confidence is outside `0.0..=1.0`
    /// or a score is negative.
    /// Returns [`DbError::ForeignKeyViolation`] if the match does not exist.
    pub async fn create(
        &mut self,
        match_id: MatchId,
        new: &NewPrediction,
    ) -> Result<Prediction, DbError> {
        new.validate()?;

        let row = sqlx::query_as::<_, PredictionRow>(concat!(
            "INSERT INTO predictions
                 (match_id, predicted_outcome, confidence, predicted_home_score,
                  predicted_away_score, model_version, notes)
             VALUES ($1, $2::match_outcome, $3, $4, $5, $6, $7)
             RETURNING ",
            prediction_columns!()
        ))
        .bind(match_id.into_inner())
        .bind(new.predicted_outcome.as_str())
        .bind(new.confidence)
        .bind(new.predicted_home_score)
        .bind(new.predicted_away_score)
        .bind(new.model_version.as_deref())
        .bind(new.notes.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(
            prediction_id = row.id,
            match_id = row.match_id,
            outcome = %row.predicted_outcome,
            "Created prediction"
        );
        row.try_into()
    }

    /// Fetch a prediction by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: PredictionId) -> Result<Option<Prediction>, DbError> {
        let row = sqlx::query_as::<_, PredictionRow>(concat!(
            "SELECT ",
            prediction_columns!(),
            " FROM predictions WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Prediction::try_from).transpose()
    }

    /// List the predictions for a match, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_for_match(&mut self, match_id: MatchId) -> Result<Vec<Prediction>, DbError> {
        let rows = sqlx::query_as::<_, PredictionRow>(concat!(
            "SELECT ",
            prediction_columns!(),
            " FROM predictions WHERE match_id = $1 ORDER BY created_at, id"
        ))
        .bind(match_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Prediction::try_from).collect()
    }

    /// Mark every prediction on `match_id` correct or incorrect against
    /// `result`. Returns the number of predictions settled.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn settle_for_match(
        &mut self,
        match_id: MatchId,
        result: MatchOutcome,
    ) -> Result<u64, DbError> {
        let done = sqlx::query(
            "UPDATE predictions
             SET is_correct = (predicted_outcome = $2::match_outcome)
             WHERE match_id = $1",
        )
        .bind(match_id.into_inner())
        .bind(result.as_str())
        .execute(&mut *self.conn)
        .await?;

        Ok(done.rows_affected())
    }

    /// Delete a prediction. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&mut self, id: PredictionId) -> Result<bool, DbError> {
        let done = sqlx::query("DELETE FROM predictions WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.conn)
            .await?;

        Ok(done.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct PredictionRow {
    id: i64,
    match_id: i64,
    predicted_outcome: String,
    confidence: f64,
    predicted_home_score: Option<i32>,
    predicted_away_score: Option<i32>,
    model_version: Option<String>,
    is_correct: Option<bool>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PredictionRow> for Prediction {
    type Error = DbError;

    fn try_from(row: PredictionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PredictionId(row.id),
            match_id: MatchId(row.match_id),
            predicted_outcome: row.predicted_outcome.parse()?,
            confidence: row.confidence,
            predicted_home_score: row.predicted_home_score,
            predicted_away_score: row.predicted_away_score,
            model_version: row.model_version,
            is_correct: row.is_correct,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(outcome: &str) -> PredictionRow {
        let now = Utc::now();
        PredictionRow {
            id: 1,
            match_id: 7,
            predicted_outcome: outcome.to_owned(),
            confidence: 0.65,
            predicted_home_score: Some(2),
            predicted_away_score: Some(1),
            model_version: Some("v1.0".to_owned()),
            is_correct: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_decodes_outcome_label() {
        let prediction = Prediction::try_from(row("H")).ok();
        assert_eq!(
            prediction.as_ref().map(|p| p.predicted_outcome),
            Some(MatchOutcome::HomeWin)
        );
        assert_eq!(prediction.and_then(|p| p.is_correct), None);
    }

    #[test]
    fn unknown_outcome_label_is_a_decode_error() {
        assert!(matches!(Prediction::try_from(row("X")), Err(DbError::Decode(_))));
    }
}
