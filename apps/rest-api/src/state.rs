//! Shared application state for HTTP handlers.
//!
//! The state is just the database handle (which is itself a cheap clone
//! around a connection pool). No cross-request in-memory state exists:
//! everything shared lives in the database.

use stockpilot_db::Database;

/// State injected into every handler via `axum::extract::State`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle providing repository access.
    pub db: Database,
}

impl AppState {
    /// Creates the application state.
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
