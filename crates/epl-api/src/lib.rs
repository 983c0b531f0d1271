//! HTTP API for the EPL predictions service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Health check** (`GET /health`) reporting the configured service
//!   name and version
//! - **REST endpoints** under `/api/v1` for teams, matches, predictions,
//!   and match statistics, including match status changes and result
//!   recording
//! - **Settings** loaded from environment variables, covering the
//!   database pool, CORS policy, and bind address
//!
//! # Architecture
//!
//! Handlers share one [`AppState`] holding the process-wide
//! [`DatabaseManager`](epl_db::DatabaseManager). Each request opens its own
//! session, so a request is one transaction: committed when the handler
//! succeeds, rolled back on any error or if the client disconnects.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod settings;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, ctrl_c, start_server};
pub use settings::{Settings, SettingsError};
pub use state::AppState;
