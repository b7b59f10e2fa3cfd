//! Shared application state.
//!
//! [`AppState`] owns the single SQLite connection behind
//! `Arc<tokio::sync::Mutex<>>`. `rusqlite::Connection` is `!Sync`, so every
//! request takes the lock for exactly one store operation and the guard is
//! dropped on every exit path.

use std::path::Path;
use std::sync::Arc;

use curriculum_core::db::{open_db, open_db_in_memory};
use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Opens (and migrates) the database file at `db_path`.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ApiError> {
        Ok(Self::from_connection(open_db(db_path)?))
    }

    /// State backed by a private in-memory database.
    pub fn in_memory() -> Result<Self, ApiError> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` with exclusive access to the connection.
    pub async fn with_conn<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError>,
    {
        let conn = self.db.lock().await;
        op(&*conn)
    }
}
