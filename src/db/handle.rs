//! Long-lived database handle with lazy connection reuse.

use std::sync::{Arc, Mutex};

use diesel::prelude::*;
use tracing::{debug, warn};

use crate::db::DbError;

/// Process-wide SQLite handle owned by the level source's backing store.
///
/// Connects lazily on first use and keeps the connection for reuse across
/// calls. Before each reuse the connection is probed with `SELECT 1`; a
/// stale connection is invalidated and reopened once.
#[derive(Clone)]
pub struct DbHandle {
    path: String,
    conn: Arc<Mutex<Option<SqliteConnection>>>,
}

impl std::fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbHandle").field("path", &self.path).finish()
    }
}

impl DbHandle {
    /// Creates a handle for the database at `path`. No connection is opened
    /// until the first [`DbHandle::run`] call.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs `op` against the live connection, connecting or reconnecting as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if no connection can be established, or whatever
    /// `op` itself returns.
    pub fn run<T>(
        &self,
        op: impl FnOnce(&mut SqliteConnection) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| DbError::new("connection lock poisoned"))?;

        if let Some(conn) = guard.as_mut() {
            if is_live(conn) {
                debug!(path = %self.path, "Reusing existing database connection");
                return op(conn);
            }
            warn!(path = %self.path, "Connection failed liveness probe, reconnecting");
            *guard = None;
        }

        debug!(path = %self.path, "Opening database connection");
        let mut conn = SqliteConnection::establish(&self.path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.path, e)))?;
        let result = op(&mut conn);
        *guard = Some(conn);
        result
    }
}

fn is_live(conn: &mut SqliteConnection) -> bool {
    diesel::sql_query("SELECT 1").execute(conn).is_ok()
}
