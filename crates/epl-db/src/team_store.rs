//! Team persistence.
//!
//! Name, short name, and code are each unique. A duplicate surfaces as
//! [`DbError::UniqueViolation`] naming the violated constraint
//! (`teams_name_key`, `teams_short_name_key`, or `teams_code_key`).
//! Deleting a team removes every match it plays in, home or away, and
//! through those every prediction and statistic row.

use chrono::{DateTime, Utc};
use epl_types::{NewTeam, Team, TeamId, TeamUpdate};
use sqlx::PgConnection;
use validator::Validate;

use crate::error::DbError;

/// Column list shared by every query returning a full team row.
macro_rules! team_columns {
    () => {
        "id, name, short_name, code, founded_year, stadium, manager, logo_url, created_at, updated_at"
    };
}

/// Operations on the `teams` table within a session.
pub struct TeamStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> TeamStore<'a> {
    /// Create a new team store bound to a session connection.
    pub const fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a team.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the payload is malformed.
    /// Returns [`DbError::UniqueViolation`] if the name, short name, or
    /// code is taken.
    pub async fn create(&mut self, new: &NewTeam) -> Result<Team, DbError> {
        new.validate()?;

        let row = sqlx::query_as::<_, TeamRow>(concat!(
            "INSERT INTO teams (name, short_name, code, founded_year, stadium, manager, logo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING ",
            team_columns!()
        ))
        .bind(&new.name)
        .bind(&new.short_name)
        .bind(&new.code)
        .bind(new.founded_year)
        .bind(new.stadium.as_deref())
        .bind(new.manager.as_deref())
        .bind(new.logo_url.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(team_id = row.id, code = %row.code, "Created team");
        Ok(row.into())
    }

    /// Fetch a team by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: TeamId) -> Result<Option<Team>, DbError> {
        let row = sqlx::query_as::<_, TeamRow>(concat!(
            "SELECT ",
            team_columns!(),
            " FROM teams WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Team::from))
    }

    /// Fetch a team by its three-letter code.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_by_code(&mut self, code: &str) -> Result<Option<Team>, DbError> {
        let row = sqlx::query_as::<_, TeamRow>(concat!(
            "SELECT ",
            team_columns!(),
            " FROM teams WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Team::from))
    }

    /// List all teams ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&mut self) -> Result<Vec<Team>, DbError> {
        let rows = sqlx::query_as::<_, TeamRow>(concat!(
            "SELECT ",
            team_columns!(),
            " FROM teams ORDER BY name"
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    /// Apply a partial update. Absent fields keep their current value;
    /// nullable fields set to `Some(None)` are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the payload is malformed.
    /// Returns [`DbError::NotFound`] if the team does not exist.
    /// Returns [`DbError::UniqueViolation`] if a new name or code is taken.
    pub async fn update(&mut self, id: TeamId, update: &TeamUpdate) -> Result<Team, DbError> {
        update.validate()?;

        let row = sqlx::query_as::<_, TeamRow>(concat!(
            "UPDATE teams SET
                 name = COALESCE($2, name),
                 short_name = COALESCE($3, short_name),
                 code = COALESCE($4, code),
                 founded_year = CASE WHEN $5 THEN $6::INTEGER ELSE founded_year END,
                 stadium = CASE WHEN $7 THEN $8::VARCHAR ELSE stadium END,
                 manager = CASE WHEN $9 THEN $10::VARCHAR ELSE manager END,
                 logo_url = CASE WHEN $11 THEN $12::VARCHAR ELSE logo_url END
             WHERE id = $1
             RETURNING ",
            team_columns!()
        ))
        .bind(id.into_inner())
        .bind(update.name.as_deref())
        .bind(update.short_name.as_deref())
        .bind(update.code.as_deref())
        .bind(update.founded_year.is_some())
        .bind(update.founded_year.flatten())
        .bind(update.stadium.is_some())
        .bind(update.stadium.as_ref().and_then(Option::as_deref))
        .bind(update.manager.is_some())
        .bind(update.manager.as_ref().and_then(Option::as_deref))
        .bind(update.logo_url.is_some())
        .bind(update.logo_url.as_ref().and_then(Option::as_deref))
        .fetch_optional(&mut *self.conn)
        .await?;

        row.map(Team::from).ok_or(DbError::NotFound {
            entity: "team",
            id: id.into_inner(),
        })
    }

    /// Delete a team and, by cascade, all of its matches.
    ///
    /// Returns `false` if no such team existed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&mut self, id: TeamId) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.conn)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(team_id = %id, "Deleted team");
        }
        Ok(deleted)
    }
}

/// A row from the `teams` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    short_name: String,
    code: String,
    founded_year: Option<i32>,
    stadium: Option<String>,
    manager: Option<String>,
    logo_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: TeamId(row.id),
            name: row.name,
            short_name: row.short_name,
            code: row.code,
            founded_year: row.founded_year,
            stadium: row.stadium,
            manager: row.manager,
            logo_url: row.logo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
