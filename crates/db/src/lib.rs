//! SQLite access for the bookshelf.
//!
//! Every unit of work opens its own connection on a blocking thread and drops
//! it when the closure returns, whatever the outcome. Nothing is pooled and no
//! connection outlives the request that acquired it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use rusqlite::{Connection, OpenFlags};
use shelf_kernel::{settings::DatabaseSettings, Schema};
use thiserror::Error;

/// Failures of the storage plumbing itself, as opposed to statement errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database task failed: {0}")]
    Task(String),
}

/// Cheap, cloneable handle describing where and how to connect.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    pub fn new(settings: &DatabaseSettings) -> Self {
        Self {
            path: PathBuf::from(&settings.path),
            busy_timeout: Duration::from_millis(settings.busy_timeout_ms),
        }
    }

    /// Handle for a database file at `path` with default timeouts.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection. The caller owns it; dropping it closes it.
    pub fn connect(&self) -> Result<Connection, DbError> {
        let open_error = |source| DbError::Open {
            path: self.path.display().to_string(),
            source,
        };

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_error)?;
        conn.busy_timeout(self.busy_timeout).map_err(open_error)?;

        Ok(conn)
    }

    /// Run `work` against a connection acquired for this call only.
    ///
    /// The closure executes on the blocking pool. The connection is released
    /// when the closure returns or unwinds.
    pub async fn run<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DbError> + Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || -> Result<T, E> {
            let conn = db.connect()?;
            let outcome = work(&conn);
            drop(conn);
            outcome
        })
        .await
        .map_err(|err| E::from(DbError::Task(err.to_string())))?
    }

    /// Apply schema bootstrap statements in the given order.
    pub fn ensure_schema(&self, statements: &[(String, Schema)]) -> anyhow::Result<()> {
        let conn = self.connect()?;

        for (module, schema) in statements {
            tracing::info!(module = %module, schema = schema.id, "applying schema");
            conn.execute_batch(schema.ddl).with_context(|| {
                format!("failed to apply schema '{}' for module '{}'", schema.id, module)
            })?;
        }

        Ok(())
    }
}
