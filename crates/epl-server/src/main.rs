//! Server binary for the EPL predictions service.
//!
//! Loads settings, opens the database pool, makes sure the schema exists,
//! and serves the HTTP API until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load an optional `.env` file
//! 2. Load settings from the environment
//! 3. Initialize structured logging (tracing)
//! 4. Initialize the database pool
//! 5. Create any missing tables
//! 6. Serve until `Ctrl-C`, letting in-flight requests finish
//! 7. Close the pool

mod error;

use std::sync::Arc;

use epl_api::{AppState, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::StartupError;

/// Directive enabling per-statement SQL logging at
/// [`epl_db::postgres::ECHO_LEVEL`].
const SQL_ECHO_DIRECTIVE: &str = "sqlx::query=info";

/// Application entry point for the API server.
///
/// # Errors
///
/// Returns an error if settings are invalid, the database cannot be set
/// up, or the server cannot bind its address.
#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // 1. A missing .env file is not an error.
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // 2. Load settings.
    let settings = Settings::from_env()?;

    // 3. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&settings))
        .with_target(true)
        .init();

    info!(
        service = settings.api_title,
        version = settings.api_version,
        environment = settings.environment,
        debug = settings.is_debug(),
        dotenv_loaded,
        "Starting up"
    );

    let state = Arc::new(AppState::new(settings));

    // 4. Open the pool.
    state.db.initialize(&state.settings.postgres_config()).await?;

    // 5. Create missing tables. A failure here is fatal, but the pool
    //    is closed first.
    if let Err(e) = state.db.create_schema().await {
        state.db.shutdown().await;
        return Err(e.into());
    }
    info!("Database initialized");

    // 6. Serve.
    let server_config = state.settings.server_config();
    let served = epl_api::start_server(&server_config, Arc::clone(&state), epl_api::ctrl_c()).await;

    // 7. Close the pool whether or not serving succeeded.
    info!("Shutting down");
    state.db.shutdown().await;

    served?;
    Ok(())
}

/// Log filter: `RUST_LOG` wins, else `LOG_LEVEL`. With `DATABASE_ECHO`
/// every SQL statement is logged as well.
fn log_filter(settings: &Settings) -> EnvFilter {
    let base = std::env::var(EnvFilter::DEFAULT_ENV)
        .unwrap_or_else(|_| settings.log_level.to_ascii_lowercase());
    if settings.database_echo {
        EnvFilter::new(format!("{base},{SQL_ECHO_DIRECTIVE}"))
    } else {
        EnvFilter::new(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_setting_becomes_the_default_filter() {
        let settings = Settings {
            log_level: String::from("WARN"),
            ..Settings::default()
        };
        // RUST_LOG is not set under `cargo test` unless the caller sets it.
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(log_filter(&settings).to_string(), "warn");
        }
    }

    #[test]
    fn echo_adds_sqlx_directive() {
        let settings = Settings {
            database_echo: true,
            ..Settings::default()
        };
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(log_filter(&settings).to_string().contains("sqlx::query=info"));
        }
    }

    #[test]
    fn echo_directive_admits_statement_level() {
        let level = epl_db::postgres::ECHO_LEVEL.as_str().to_ascii_lowercase();
        assert_eq!(SQL_ECHO_DIRECTIVE, format!("sqlx::query={level}"));
    }
}
