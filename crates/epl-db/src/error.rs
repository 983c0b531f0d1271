//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`]. Constraint violations reported
//! by `PostgreSQL` are classified into their own variants so callers can
//! tell a duplicate team code from a dropped connection without string
//! matching.

use epl_types::{MatchStatus, ParseEnumError};
use sqlx::error::ErrorKind;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: String,
    },

    /// A foreign key constraint rejected the write.
    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation {
        /// Name of the violated constraint.
        constraint: String,
    },

    /// A check constraint rejected the write.
    #[error("check constraint violated: {constraint}")]
    CheckViolation {
        /// Name of the violated constraint.
        constraint: String,
    },

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A session or schema operation was requested before initialization
    /// or after shutdown.
    #[error("database not initialized; call initialize() first")]
    Uninitialized,

    /// Initialization was requested while a pool is already open.
    #[error("database already initialized")]
    AlreadyInitialized,

    /// The addressed row does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity looked up.
        entity: &'static str,
        /// The missing identity.
        id: i64,
    },

    /// A payload failed validation before reaching the database.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A match status change is not allowed from the current state.
    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: MatchStatus,
        /// Requested status.
        to: MatchStatus,
    },

    /// A stored label could not be decoded into its enum.
    #[error("invalid stored value: {0}")]
    Decode(#[from] ParseEnumError),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let classified = match &err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => Some(Self::UniqueViolation { constraint }),
                    ErrorKind::ForeignKeyViolation => {
                        Some(Self::ForeignKeyViolation { constraint })
                    }
                    ErrorKind::CheckViolation => Some(Self::CheckViolation { constraint }),
                    _ => None,
                }
            }
            _ => None,
        };
        classified.unwrap_or(Self::Postgres(err))
    }
}

impl DbError {
    /// Whether the database could not be reached at all: not initialized,
    /// pool closed, or no connection freed up within the acquire timeout.
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Uninitialized
                | Self::Postgres(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed)
        )
    }
}
