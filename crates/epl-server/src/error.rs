//! Error types for the server binary.
//!
//! [`StartupError`] is the top-level error type that wraps every failure
//! mode between process start and a clean shutdown.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Settings could not be loaded from the environment.
    #[error("settings error: {source}")]
    Settings {
        /// The underlying settings error.
        #[from]
        source: epl_api::SettingsError,
    },

    /// The database pool or schema could not be set up.
    #[error("database error: {source}")]
    Database {
        /// The underlying data layer error.
        #[from]
        source: epl_db::DbError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: epl_api::ServerError,
    },
}
