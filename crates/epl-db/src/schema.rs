//! Table definitions for the four entities.
//!
//! The schema is created and dropped as a unit inside a single transaction.
//! Concurrent callers (several server instances starting at once, parallel
//! test binaries) are serialized on a transaction-scoped advisory lock so
//! the `IF NOT EXISTS` checks never race.
//!
//! # Tables
//!
//! ```text
//! teams 1---* matches (home_team_id, away_team_id)   ON DELETE CASCADE
//! matches 1---* predictions (match_id)               ON DELETE CASCADE
//! matches 1---* match_statistics (match_id)          ON DELETE CASCADE
//! ```
//!
//! Every table carries `created_at` and `updated_at`. A `BEFORE UPDATE`
//! trigger refreshes `updated_at` on every mutation and pins `created_at`
//! to its inserted value. `clock_timestamp()` is used rather than `now()`
//! so updates inside a long transaction still move forward.

use sqlx::PgConnection;
use sqlx::postgres::PgPool;

use crate::error::DbError;

/// Advisory lock key held while the schema is created or dropped.
const SCHEMA_LOCK_KEY: i64 = 0x0045_504C_5343_4845;

/// Tables managed by this module, parents first.
pub const TABLES: [&str; 4] = ["teams", "matches", "predictions", "match_statistics"];

/// Statements that create the schema, in dependency order.
const CREATE_STATEMENTS: &[&str] = &[
    r"CREATE OR REPLACE FUNCTION touch_updated_at() RETURNS trigger AS $$
      BEGIN
          NEW.created_at := OLD.created_at;
          NEW.updated_at := clock_timestamp();
          RETURN NEW;
      END;
      $$ LANGUAGE plpgsql",
    r"DO $$ BEGIN
          CREATE TYPE match_outcome AS ENUM ('H', 'D', 'A');
      EXCEPTION
          WHEN duplicate_object THEN NULL;
      END $$",
    r"CREATE TABLE IF NOT EXISTS teams (
          id           BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
          name         VARCHAR(100) NOT NULL,
          short_name   VARCHAR(10)  NOT NULL,
          code         VARCHAR(3)   NOT NULL,
          founded_year INTEGER,
          stadium      VARCHAR(100),
          manager      VARCHAR(100),
          logo_url     VARCHAR(255),
          created_at   TIMESTAMPTZ  NOT NULL DEFAULT clock_timestamp(),
          updated_at   TIMESTAMPTZ  NOT NULL DEFAULT clock_timestamp(),
          CONSTRAINT teams_name_key UNIQUE (name),
          CONSTRAINT teams_short_name_key UNIQUE (short_name),
          CONSTRAINT teams_code_key UNIQUE (code)
      )",
    r"CREATE TABLE IF NOT EXISTS matches (
          id           BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
          home_team_id BIGINT      NOT NULL
                       CONSTRAINT matches_home_team_id_fkey REFERENCES teams (id) ON DELETE CASCADE,
          away_team_id BIGINT      NOT NULL
                       CONSTRAINT matches_away_team_id_fkey REFERENCES teams (id) ON DELETE CASCADE,
          kickoff_time TIMESTAMPTZ NOT NULL,
          season       INTEGER     NOT NULL,
          gameweek     INTEGER     NOT NULL,
          status       VARCHAR(20) NOT NULL DEFAULT 'scheduled'
                       CONSTRAINT matches_status_check
                       CHECK (status IN ('scheduled', 'ongoing', 'completed')),
          home_score   INTEGER,
          away_score   INTEGER,
          result       match_outcome,
          notes        TEXT,
          created_at   TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
          updated_at   TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
      )",
    "CREATE INDEX IF NOT EXISTS matches_kickoff_time_idx ON matches (kickoff_time)",
    "CREATE INDEX IF NOT EXISTS matches_home_team_id_idx ON matches (home_team_id)",
    "CREATE INDEX IF NOT EXISTS matches_away_team_id_idx ON matches (away_team_id)",
    r"CREATE TABLE IF NOT EXISTS predictions (
          id                   BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
          match_id             BIGINT        NOT NULL
                               CONSTRAINT predictions_match_id_fkey REFERENCES matches (id) ON DELETE CASCADE,
          predicted_outcome    match_outcome NOT NULL,
          confidence           DOUBLE PRECISION NOT NULL,
          predicted_home_score INTEGER,
          predicted_away_score INTEGER,
          model_version        VARCHAR(50),
          is_correct           BOOLEAN,
          notes                TEXT,
          created_at           TIMESTAMPTZ   NOT NULL DEFAULT clock_timestamp(),
          updated_at           TIMESTAMPTZ   NOT NULL DEFAULT clock_timestamp()
      )",
    "CREATE INDEX IF NOT EXISTS predictions_match_id_idx ON predictions (match_id)",
    r"CREATE TABLE IF NOT EXISTS match_statistics (
          id                    BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
          match_id              BIGINT NOT NULL
                                CONSTRAINT match_statistics_match_id_fkey REFERENCES matches (id) ON DELETE CASCADE,
          home_possession       DOUBLE PRECISION,
          home_shots            INTEGER,
          home_shots_on_target  INTEGER,
          home_corners          INTEGER,
          home_fouls            INTEGER,
          home_yellow_cards     INTEGER,
          home_red_cards        INTEGER,
          home_passes           INTEGER,
          home_pass_accuracy    DOUBLE PRECISION,
          home_tackles          INTEGER,
          home_interceptions    INTEGER,
          away_possession       DOUBLE PRECISION,
          away_shots            INTEGER,
          away_shots_on_target  INTEGER,
          away_corners          INTEGER,
          away_fouls            INTEGER,
          away_yellow_cards     INTEGER,
          away_red_cards        INTEGER,
          away_passes           INTEGER,
          away_pass_accuracy    DOUBLE PRECISION,
          away_tackles          INTEGER,
          away_interceptions    INTEGER,
          total_shots           INTEGER,
          total_shots_on_target INTEGER,
          expected_goals_home   DOUBLE PRECISION,
          expected_goals_away   DOUBLE PRECISION,
          created_at            TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
          updated_at            TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
      )",
    "CREATE INDEX IF NOT EXISTS match_statistics_match_id_idx ON match_statistics (match_id)",
    r"CREATE OR REPLACE TRIGGER teams_touch_updated_at
      BEFORE UPDATE ON teams
      FOR EACH ROW EXECUTE FUNCTION touch_updated_at()",
    r"CREATE OR REPLACE TRIGGER matches_touch_updated_at
      BEFORE UPDATE ON matches
      FOR EACH ROW EXECUTE FUNCTION touch_updated_at()",
    r"CREATE OR REPLACE TRIGGER predictions_touch_updated_at
      BEFORE UPDATE ON predictions
      FOR EACH ROW EXECUTE FUNCTION touch_updated_at()",
    r"CREATE OR REPLACE TRIGGER match_statistics_touch_updated_at
      BEFORE UPDATE ON match_statistics
      FOR EACH ROW EXECUTE FUNCTION touch_updated_at()",
];

/// Statements that drop the schema, children first.
const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS match_statistics, predictions, matches, teams CASCADE",
    "DROP TYPE IF EXISTS match_outcome",
    "DROP FUNCTION IF EXISTS touch_updated_at()",
];

/// Create every table, index, type, and trigger that does not exist yet.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if any statement fails. Nothing is
/// created in that case.
pub async fn create_all(pool: &PgPool) -> Result<(), DbError> {
    run_locked(pool, CREATE_STATEMENTS).await?;
    tracing::info!(tables = TABLES.len(), "Database schema created");
    Ok(())
}

/// Drop every table along with all data, the outcome type, and the trigger
/// function.
///
/// Destructive. Intended for development and tests.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if any statement fails. Nothing is
/// dropped in that case.
pub async fn drop_all(pool: &PgPool) -> Result<(), DbError> {
    run_locked(pool, DROP_STATEMENTS).await?;
    tracing::warn!(tables = TABLES.len(), "Database schema dropped");
    Ok(())
}

/// List which of the managed tables currently exist in the search path.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the catalog query fails.
pub async fn existing_tables(conn: &mut PgConnection) -> Result<Vec<String>, DbError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r"SELECT table_name::TEXT
          FROM information_schema.tables
          WHERE table_schema = current_schema()
            AND table_name::TEXT = ANY($1)
          ORDER BY table_name",
    )
    .bind(TABLES.as_slice())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

async fn run_locked(pool: &PgPool, statements: &[&str]) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for &statement in statements {
        sqlx::query(statement)
            .persistent(false)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
