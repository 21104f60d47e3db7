//! Record store.
//!
//! SQLite holds every facility, doctor, patient and note. Each submodule owns the queries for
//! one table and takes a plain `&Connection`; [`Store`] wraps the shared connection for
//! services.
//!
//! Every statement binds user-supplied values as parameters. No query text is ever built from
//! request input.

pub mod doctor;
pub mod facility;
pub mod note;
pub mod patient;
pub mod sqlite;

pub use sqlite::{open_database, open_memory_database, run_migrations};

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

/// Maps SQLite constraint failures onto [`DatabaseError::ConstraintViolation`] with a readable
/// message; other errors pass through.
pub(crate) fn constraint_error(err: rusqlite::Error, what: &str) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            DatabaseError::ConstraintViolation(what.to_string())
        }
        _ => DatabaseError::Sqlite(err),
    }
}

/// Shared handle to the record store.
///
/// Cloning is cheap; all clones use the same connection. The lock is only held for the
/// duration of one closure passed to [`Store::with_conn`].
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) the database file at `path` and brings its schema up to date.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = open_database(path)?;
        tracing::info!("opened record store at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Opens a private in-memory database. Used by tests and one-off tooling.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// A panic inside an earlier closure does not take the store down: SQLite rolls back any
    /// transaction it left open, so the connection is reused as is.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
