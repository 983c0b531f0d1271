//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies all failure modes of a request into a single enum
//! that converts into an Axum response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the same shape:
//!
//! ```json
//! { "error": "team 7 not found", "status": 404 }
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use epl_db::DbError;

/// Errors that can occur while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The data layer rejected the operation.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The requested resource was not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A path segment could not be parsed as an id.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// The query string could not be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The request body was not valid JSON for the endpoint.
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl ApiError {
    /// Shorthand for a missing entity.
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidId(_) | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Db(err) if err.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Db(err) => match err {
                DbError::NotFound { .. } => StatusCode::NOT_FOUND,
                DbError::Validation(_)
                | DbError::ForeignKeyViolation { .. }
                | DbError::CheckViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                DbError::UniqueViolation { .. } | DbError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
                DbError::Uninitialized => StatusCode::SERVICE_UNAVAILABLE,
                DbError::Postgres(_)
                | DbError::Config(_)
                | DbError::AlreadyInitialized
                | DbError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full and reported generically.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
            if status == StatusCode::SERVICE_UNAVAILABLE {
                String::from("database unavailable")
            } else {
                String::from("internal server error")
            }
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use epl_types::MatchStatus;

    use super::*;

    #[test]
    fn data_layer_errors_map_to_statuses() {
        let cases = [
            (
                DbError::NotFound {
                    entity: "team",
                    id: 1,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DbError::UniqueViolation {
                    constraint: String::from("teams_code_key"),
                },
                StatusCode::CONFLICT,
            ),
            (
                DbError::ForeignKeyViolation {
                    constraint: String::from("matches_home_team_id_fkey"),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DbError::InvalidTransition {
                    from: MatchStatus::Completed,
                    to: MatchStatus::Scheduled,
                },
                StatusCode::CONFLICT,
            ),
            (DbError::Uninitialized, StatusCode::SERVICE_UNAVAILABLE),
            (DbError::AlreadyInitialized, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn client_errors_keep_their_message() {
        let err = ApiError::not_found("match", 42);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "match 42 not found");
        assert_eq!(
            ApiError::InvalidId(String::from("abc")).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
