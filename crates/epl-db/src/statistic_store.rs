//! Match statistics persistence.
//!
//! Each side's [`StatLine`] is stored flat as `home_*` and `away_*`
//! columns. Combined shot totals are derived from the sides on insert
//! unless the caller supplies them.

use chrono::{DateTime, Utc};
use epl_types::{MatchId, MatchStatistic, NewMatchStatistic, StatLine, StatisticId};
use sqlx::PgConnection;
use validator::Validate;

use crate::error::DbError;

macro_rules! statistic_columns {
    () => {
        "id, match_id,
         home_possession, home_shots, home_shots_on_target, home_corners, home_fouls,
         home_yellow_cards, home_red_cards, home_passes, home_pass_accuracy, home_tackles,
         home_interceptions,
         away_possession, away_shots, away_shots_on_target, away_corners, away_fouls,
         away_yellow_cards, away_red_cards, away_passes, away_pass_accuracy, away_tackles,
         away_interceptions,
         total_shots, total_shots_on_target, expected_goals_home, expected_goals_away,
         created_at, updated_at"
    };
}

/// Operations on the `match_statistics` table within a session.
pub struct StatisticStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> StatisticStore<'a> {
    /// Create a new statistic store bound to a session connection.
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Record statistics for `match_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if a percentage is outside
    /// `0.0..=100.0` or a count is negative.
    /// Returns [`DbError::ForeignKeyViolation`] if the match does not exist.
    pub async fn create(
        &mut self,
        match_id: MatchId,
        new: &NewMatchStatistic,
    ) -> Result<MatchStatistic, DbError> {
        new.validate()?;
        let stats = new.clone().with_derived_totals();
        let (home, away) = (&stats.home, &stats.away);

        let row = sqlx::query_as::<_, StatisticRow>(concat!(
            "INSERT INTO match_statistics (
                 match_id,
                 home_possession, home_shots, home_shots_on_target, home_corners, home_fouls,
                 home_yellow_cards, home_red_cards, home_passes, home_pass_accuracy,
                 home_tackles, home_interceptions,
                 away_possession, away_shots, away_shots_on_target, away_corners, away_fouls,
                 away_yellow_cards, away_red_cards, away_passes, away_pass_accuracy,
                 away_tackles, away_interceptions,
                 total_shots, total_shots_on_target, expected_goals_home, expected_goals_away)
             VALUES ($1,
                     $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23,
                     $24, $25, $26, $27)
             RETURNING ",
            statistic_columns!()
        ))
        .bind(match_id.into_inner())
        .bind(home.possession)
        .bind(home.shots)
        .bind(home.shots_on_target)
        .bind(home.corners)
        .bind(home.fouls)
        .bind(home.yellow_cards)
        .bind(home.red_cards)
        .bind(home.passes)
        .bind(home.pass_accuracy)
        .bind(home.tackles)
        .bind(home.interceptions)
        .bind(away.possession)
        .bind(away.shots)
        .bind(away.shots_on_target)
        .bind(away.corners)
        .bind(away.fouls)
        .bind(away.yellow_cards)
        .bind(away.red_cards)
        .bind(away.passes)
        .bind(away.pass_accuracy)
        .bind(away.tackles)
        .bind(away.interceptions)
        .bind(stats.total_shots)
        .bind(stats.total_shots_on_target)
        .bind(stats.expected_goals_home)
        .bind(stats.expected_goals_away)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(statistic_id = row.id, match_id = row.match_id, "Recorded match statistics");
        Ok(row.into())
    }

    /// Fetch a statistics row by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: StatisticId) -> Result<Option<MatchStatistic>, DbError> {
        let row = sqlx::query_as::<_, StatisticRow>(concat!(
            "SELECT ",
            statistic_columns!(),
            " FROM match_statistics WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(MatchStatistic::from))
    }

    /// List the statistics recorded for a match, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_for_match(
        &mut self,
        match_id: MatchId,
    ) -> Result<Vec<MatchStatistic>, DbError> {
        let rows = sqlx::query_as::<_, StatisticRow>(concat!(
            "SELECT ",
            statistic_columns!(),
            " FROM match_statistics WHERE match_id = $1 ORDER BY created_at, id"
        ))
        .bind(match_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(MatchStatistic::from).collect())
    }

    /// Delete a statistics row. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&mut self, id: StatisticId) -> Result<bool, DbError> {
        let done = sqlx::query("DELETE FROM match_statistics WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.conn)
            .await?;

        Ok(done.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Default, sqlx::FromRow)]
struct StatisticRow {
    id: i64,
    match_id: i64,
    home_possession: Option<f64>,
    home_shots: Option<i32>,
    home_shots_on_target: Option<i32>,
    home_corners: Option<i32>,
    home_fouls: Option<i32>,
    home_yellow_cards: Option<i32>,
    home_red_cards: Option<i32>,
    home_passes: Option<i32>,
    home_pass_accuracy: Option<f64>,
    home_tackles: Option<i32>,
    home_interceptions: Option<i32>,
    away_possession: Option<f64>,
    away_shots: Option<i32>,
    away_shots_on_target: Option<i32>,
    away_corners: Option<i32>,
    away_fouls: Option<i32>,
    away_yellow_cards: Option<i32>,
    away_red_cards: Option<i32>,
    away_passes: Option<i32>,
    away_pass_accuracy: Option<f64>,
    away_tackles: Option<i32>,
    away_interceptions: Option<i32>,
    total_shots: Option<i32>,
    total_shots_on_target: Option<i32>,
    expected_goals_home: Option<f64>,
    expected_goals_away: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StatisticRow> for MatchStatistic {
    fn from(row: StatisticRow) -> Self {
        Self {
            id: StatisticId(row.id),
            match_id: MatchId(row.match_id),
            home: StatLine {
                possession: row.home_possession,
                shots: row.home_shots,
                shots_on_target: row.home_shots_on_target,
                corners: row.home_corners,
                fouls: row.home_fouls,
                yellow_cards: row.home_yellow_cards,
                red_cards: row.home_red_cards,
                passes: row.home_passes,
                pass_accuracy: row.home_pass_accuracy,
                tackles: row.home_tackles,
                interceptions: row.home_interceptions,
            },
            away: StatLine {
                possession: row.away_possession,
                shots: row.away_shots,
                shots_on_target: row.away_shots_on_target,
                corners: row.away_corners,
                fouls: row.away_fouls,
                yellow_cards: row.away_yellow_cards,
                red_cards: row.away_red_cards,
                passes: row.away_passes,
                pass_accuracy: row.away_pass_accuracy,
                tackles: row.away_tackles,
                interceptions: row.away_interceptions,
            },
            total_shots: row.total_shots,
            total_shots_on_target: row.total_shots_on_target,
            expected_goals_home: row.expected_goals_home,
            expected_goals_away: row.expected_goals_away,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_row_splits_into_sides() {
        let row = StatisticRow {
            id: 4,
            match_id: 9,
            home_possession: Some(58.5),
            home_shots: Some(14),
            away_possession: Some(41.5),
            away_shots: Some(6),
            total_shots: Some(20),
            ..StatisticRow::default()
        };
        let stat = MatchStatistic::from(row);
        assert_eq!(stat.id, StatisticId(4));
        assert_eq!(stat.match_id, MatchId(9));
        assert_eq!(stat.home.possession, Some(58.5));
        assert_eq!(stat.home.shots, Some(14));
        assert_eq!(stat.away.possession, Some(41.5));
        assert_eq!(stat.away.shots, Some(6));
        assert_eq!(stat.total_shots, Some(20));
        assert_eq!(stat.away.red_cards, None);
    }
}
