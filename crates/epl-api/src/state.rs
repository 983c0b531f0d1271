//! Shared application state for the API server.
//!
//! [`AppState`] is created once at startup, wrapped in an
//! [`Arc`](std::sync::Arc), and handed to every handler through Axum's
//! `State` extractor. It holds the process-wide [`DatabaseManager`] and the
//! loaded [`Settings`]. There is no other shared mutable state: each
//! request opens its own session.

use epl_db::{DatabaseManager, Session};

use crate::error::ApiError;
use crate::settings::Settings;

/// State shared by all request handlers.
#[derive(Debug)]
pub struct AppState {
    /// Connection pool owner. Initialized by the binary before serving.
    pub db: DatabaseManager,
    /// Settings the server was started with.
    pub settings: Settings,
}

impl AppState {
    /// Create state with an uninitialized database manager.
    pub fn new(settings: Settings) -> Self {
        Self {
            db: DatabaseManager::new(),
            settings,
        }
    }

    /// Open a session for one request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Db`] if the database is not initialized or no
    /// connection is available.
    pub async fn session(&self) -> Result<Session, ApiError> {
        Ok(self.db.session().await?)
    }
}
