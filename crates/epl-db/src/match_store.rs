//! Match persistence and the match lifecycle.
//!
//! Fixture details are edited freely. Status changes and final scores go
//! through [`MatchStore::set_status`] and [`MatchStore::record_result`],
//! which lock the row, check the transition table on
//! [`MatchStatus`], and keep `result` consistent with the score.

use chrono::{DateTime, Utc};
use epl_types::{
    FinalScore, Match, MatchId, MatchOutcome, MatchStatus, MatchUpdate, NewMatch, TeamId,
};
use serde::Deserialize;
use sqlx::PgConnection;
use validator::Validate;

use crate::error::DbError;
use crate::prediction_store::PredictionStore;

/// Column list shared by every query returning a full match row.
///
/// `result` is a `match_outcome` enum in the database and is read back as
/// text.
macro_rules! match_columns {
    () => {
        "id, home_team_id, away_team_id, kickoff_time, season, gameweek, status,
         home_score, away_score, result::TEXT AS result, notes, created_at, updated_at"
    };
}

/// Optional filters for listing matches. All present filters must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatchFilter {
    /// Only matches of this season.
    pub season: Option<i32>,
    /// Only matches of this gameweek.
    pub gameweek: Option<i32>,
    /// Only matches this team plays in, home or away.
    pub team_id: Option<TeamId>,
    /// Only matches in this state.
    pub status: Option<MatchStatus>,
}

impl MatchFilter {
    /// Filter on one team's fixtures.
    pub const fn for_team(team_id: TeamId) -> Self {
        Self {
            season: None,
            gameweek: None,
            team_id: Some(team_id),
            status: None,
        }
    }
}

/// Operations on the `matches` table within a session.
pub struct MatchStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> MatchStore<'a> {
    /// Create a new match store bound to a session connection.
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a match.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the payload is malformed.
    /// Returns [`DbError::ForeignKeyViolation`] if either team does not exist.
    pub async fn create(&mut self, new: &NewMatch) -> Result<Match, DbError> {
        new.validate()?;

        let row = sqlx::query_as::<_, MatchRow>(concat!(
            "INSERT INTO matches (home_team_id, away_team_id, kickoff_time, season, gameweek, status, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING ",
            match_columns!()
        ))
        .bind(new.home_team_id.into_inner())
        .bind(new.away_team_id.into_inner())
        .bind(new.kickoff_time)
        .bind(new.season)
        .bind(new.gameweek)
        .bind(new.status.as_str())
        .bind(new.notes.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(
            match_id = row.id,
            home_team_id = row.home_team_id,
            away_team_id = row.away_team_id,
            "Created match"
        );
        row.try_into()
    }

    /// Fetch a match by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if a stored label is unknown.
    pub async fn get(&mut self, id: MatchId) -> Result<Option<Match>, DbError> {
        let row = sqlx::query_as::<_, MatchRow>(concat!(
            "SELECT ",
            match_columns!(),
            " FROM matches WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Match::try_from).transpose()
    }

    /// List matches in kick-off order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    /// Returns [`DbError::Decode`] if a stored label is unknown.
    pub async fn list(&mut self, filter: &MatchFilter) -> Result<Vec<Match>, DbError> {
        let rows = sqlx::query_as::<_, MatchRow>(concat!(
            "SELECT ",
            match_columns!(),
            " FROM matches
              WHERE ($1::INTEGER IS NULL OR season = $1)
                AND ($2::INTEGER IS NULL OR gameweek = $2)
                AND ($3::BIGINT IS NULL OR home_team_id = $3 OR away_team_id = $3)
                AND ($4::TEXT IS NULL OR status = $4)
              ORDER BY kickoff_time, id"
        ))
        .bind(filter.season)
        .bind(filter.gameweek)
        .bind(filter.team_id.map(TeamId::into_inner))
        .bind(filter.status.map(MatchStatus::as_str))
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Match::try_from).collect()
    }

    /// List every match a team plays in, home or away.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_for_team(&mut self, team_id: TeamId) -> Result<Vec<Match>, DbError> {
        self.list(&MatchFilter::for_team(team_id)).await
    }

    /// Apply a partial update to the fixture details. `notes` set to
    /// `Some(None)` is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the payload is malformed.
    /// Returns [`DbError::NotFound`] if the match does not exist.
    pub async fn update(&mut self, id: MatchId, update: &MatchUpdate) -> Result<Match, DbError> {
        update.validate()?;

        let row = sqlx::query_as::<_, MatchRow>(concat!(
            "UPDATE matches SET
                 kickoff_time = COALESCE($2, kickoff_time),
                 season = COALESCE($3, season),
                 gameweek = COALESCE($4, gameweek),
                 notes = CASE WHEN $5 THEN $6::TEXT ELSE notes END
             WHERE id = $1
             RETURNING ",
            match_columns!()
        ))
        .bind(id.into_inner())
        .bind(update.kickoff_time)
        .bind(update.season)
        .bind(update.gameweek)
        .bind(update.notes.is_some())
        .bind(update.notes.as_ref().and_then(Option::as_deref))
        .fetch_optional(&mut *self.conn)
        .await?;

        row.ok_or_else(|| not_found(id))?.try_into()
    }

    /// Move a match to `next`, which must not be `completed`.
    ///
    /// Completing a match requires a score; use
    /// [`record_result`](Self::record_result).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the match does not exist.
    /// Returns [`DbError::InvalidTransition`] if the move is not allowed.
    pub async fn set_status(&mut self, id: MatchId, next: MatchStatus) -> Result<Match, DbError> {
        let current = self.lock(id).await?;
        if next.is_terminal() || !current.status.can_transition_to(next) {
            return Err(DbError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let row = sqlx::query_as::<_, MatchRow>(concat!(
            "UPDATE matches SET status = $2 WHERE id = $1 RETURNING ",
            match_columns!()
        ))
        .bind(id.into_inner())
        .bind(next.as_str())
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::info!(match_id = %id, from = %current.status, to = %next, "Match status changed");
        row.try_into()
    }

    /// Record the final score, derive the result, and mark the match
    /// completed. Every prediction on the match is then settled.
    ///
    /// A completed match may be re-recorded to correct its score; the
    /// predictions are settled again against the corrected result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if a score is negative.
    /// Returns [`DbError::NotFound`] if the match does not exist.
    pub async fn record_result(&mut self, id: MatchId, score: FinalScore) -> Result<Match, DbError> {
        score.validate()?;

        let current = self.lock(id).await?;
        let next = MatchStatus::Completed;
        if !(current.status.can_transition_to(next) || current.status == next) {
            return Err(DbError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let outcome = score.outcome();
        let row = sqlx::query_as::<_, MatchRow>(concat!(
            "UPDATE matches SET
                 home_score = $2,
                 away_score = $3,
                 result = $4::match_outcome,
                 status = $5
             WHERE id = $1
             RETURNING ",
            match_columns!()
        ))
        .bind(id.into_inner())
        .bind(score.home_score)
        .bind(score.away_score)
        .bind(outcome.as_str())
        .bind(next.as_str())
        .fetch_one(&mut *self.conn)
        .await?;

        let settled = PredictionStore::new(&mut *self.conn)
            .settle_for_match(id, outcome)
            .await?;

        tracing::info!(
            match_id = %id,
            home_score = score.home_score,
            away_score = score.away_score,
            result = %outcome,
            predictions_settled = settled,
            "Match result recorded"
        );
        row.try_into()
    }

    /// Delete a match and, by cascade, its predictions and statistics.
    ///
    /// Returns `false` if no such match existed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&mut self, id: MatchId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.conn)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(match_id = %id, "Deleted match");
        }
        Ok(deleted)
    }

    /// Fetch a match and hold a row lock until the session ends.
    async fn lock(&mut self, id: MatchId) -> Result<Match, DbError> {
        let row = sqlx::query_as::<_, MatchRow>(concat!(
            "SELECT ",
            match_columns!(),
            " FROM matches WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        row.ok_or_else(|| not_found(id))?.try_into()
    }
}

const fn not_found(id: MatchId) -> DbError {
    DbError::NotFound {
        entity: "match",
        id: id.into_inner(),
    }
}

/// A row from the `matches` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct MatchRow {
    id: i64,
    home_team_id: i64,
    away_team_id: i64,
    kickoff_time: DateTime<Utc>,
    season: i32,
    gameweek: i32,
    status: String,
    home_score: Option<i32>,
    away_score: Option<i32>,
    result: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for Match {
    type Error = DbError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MatchId(row.id),
            home_team_id: TeamId(row.home_team_id),
            away_team_id: TeamId(row.away_team_id),
            kickoff_time: row.kickoff_time,
            season: row.season,
            gameweek: row.gameweek,
            status: row.status.parse()?,
            home_score: row.home_score,
            away_score: row.away_score,
            result: row
                .result
                .as_deref()
                .map(str::parse::<MatchOutcome>)
                .transpose()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
