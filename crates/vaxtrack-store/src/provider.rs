//! Connection acquisition for the relational store.
//!
//! Every logical store operation opens exactly one connection through a
//! [`ConnectionProvider`] and owns it for the duration of that operation;
//! dropping the connection at the end of the operation scope releases it on
//! every exit path. There is no pooling and no retry: a failed acquisition
//! propagates immediately.
//!
//! The provider is an injected capability. Tests substitute a provider
//! pointing at a scratch database file instead of touching any process-wide
//! state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::error::ConnectionError;

/// Default busy timeout applied to every opened connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Capability to open a connection to the relational store.
pub trait ConnectionProvider: Send + Sync {
    /// Open a new connection for one logical operation.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if the store is unreachable or rejects
    /// the open.
    fn acquire(&self) -> Result<Connection, ConnectionError>;
}

/// Opens one `SQLite` connection per call against a database file.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteProvider {
    /// Create a provider for the given database file.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Create a provider with an explicit busy timeout.
    #[must_use]
    pub fn with_busy_timeout<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout,
        }
    }

    /// Path of the database file this provider opens.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for SqliteProvider {
    fn acquire(&self) -> Result<Connection, ConnectionError> {
        let conn = Connection::open(&self.path)
            .map_err(|e| ConnectionError::new(e.to_string()))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| ConnectionError::new(e.to_string()))?;
        // Referential integrity is enforced by the store, not in-process.
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|e| ConnectionError::new(e.to_string()))?;
        Ok(conn)
    }
}
