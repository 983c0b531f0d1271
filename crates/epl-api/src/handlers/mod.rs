//! REST endpoint handlers.
//!
//! One module per resource. Every handler opens its own [`Session`] from
//! the shared [`AppState`]; handlers that write commit it before
//! responding, read-only handlers let it roll back on drop.
//!
//! [`Session`]: epl_db::Session
//! [`AppState`]: crate::state::AppState

pub mod health;
pub mod matches;
pub mod predictions;
pub mod statistics;
pub mod teams;

use crate::error::ApiError;

/// Parse a numeric id from a path segment.
fn parse_id<T: From<i64>>(raw: &str) -> Result<T, ApiError> {
    raw.parse::<i64>()
        .map(T::from)
        .map_err(|e| ApiError::InvalidId(format!("{raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use epl_types::TeamId;

    use super::*;

    #[test]
    fn numeric_segments_parse_into_ids() {
        assert_eq!(parse_id::<TeamId>("17").ok(), Some(TeamId(17)));
    }

    #[test]
    fn non_numeric_segment_is_invalid() {
        assert!(matches!(parse_id::<TeamId>("arsenal"), Err(ApiError::InvalidId(_))));
    }
}
