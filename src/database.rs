// database.rs - The database handle handed to test suites
//
// A `Database` wraps a single-connection SQLite pool bound to one file.
// It only reads: `select_single_row` and `select_multiple_rows` pass the
// query text to SQLite verbatim and decode whatever comes back.
//
// Usage:
//   let db = Database::from_existing("06", "07").await?;
//   let row = db.select_single_row("SELECT COUNT(*) AS count FROM movies;").await?;
//   db.close().await?;

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::{CleanupPolicy, HarnessConfig};
use crate::error::{Error, Result};
use crate::loader::FixtureLoader;
use crate::row::{decode_row, Row};
use crate::snapshot::{ensure_exists, label_of, remove_database};
use crate::timing::with_timeout;

#[derive(Debug)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
    query_timeout: Duration,
    cleanup: CleanupPolicy,
}

impl Database {
    /// Copy snapshot `source` to `target` and open the copy, using the
    /// configuration from the environment
    pub async fn from_existing(source: &str, target: &str) -> Result<Self> {
        FixtureLoader::from_env()?.load(source, target).await
    }

    /// Open an existing database file directly. The file is never removed
    /// on close and its journal mode is left as it is on disk.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = HarnessConfig::default();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false);
        Self::connect(path, options, config.query_timeout, CleanupPolicy::Keep).await
    }

    /// Open a working copy produced by the loader
    pub(crate) async fn open_working_copy(
        path: &Path,
        query_timeout: Duration,
        cleanup: CleanupPolicy,
    ) -> Result<Self> {
        // Rollback journal keeps every closed working copy a single self-contained file
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .journal_mode(SqliteJournalMode::Delete);
        Self::connect(path, options, query_timeout, cleanup).await
    }

    async fn connect(
        path: &Path,
        options: SqliteConnectOptions,
        query_timeout: Duration,
        cleanup: CleanupPolicy,
    ) -> Result<Self> {
        ensure_exists(&label_of(path), path).await?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(query_timeout)
            .connect_with(options)
            .await
            .map_err(|e| Error::io_failure(path, e))?;

        tracing::info!(path = %path.display(), %cleanup, "opened database");

        Ok(Self {
            pool,
            path: path.to_path_buf(),
            query_timeout,
            cleanup,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `query` and return its only row.
    ///
    /// Fails with [`Error::Cardinality`] when the query yields no row or
    /// more than one.
    pub async fn select_single_row(&self, query: &str) -> Result<Row> {
        let mut rows = self.fetch(query).await?;
        if rows.len() != 1 {
            return Err(Error::Cardinality { actual: rows.len() });
        }
        Ok(rows.remove(0))
    }

    /// Run `query` and return all rows in the order SQLite produced them
    pub async fn select_multiple_rows(&self, query: &str) -> Result<Vec<Row>> {
        self.fetch(query).await
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Row>> {
        with_timeout("query", self.query_timeout, async {
            let rows = sqlx::query(query)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| Error::from_query(query, &self.path, e))?;

            tracing::debug!(path = %self.path.display(), rows = rows.len(), "query finished");
            rows.iter().map(decode_row).collect()
        })
        .await
    }

    /// Release the connection, then apply the cleanup policy
    pub async fn close(self) -> Result<()> {
        self.pool.close().await;

        match self.cleanup {
            CleanupPolicy::Keep => {
                tracing::info!(path = %self.path.display(), "closed database, keeping file");
            }
            CleanupPolicy::Delete => {
                if let Err(e) = remove_database(&self.path).await {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to remove working copy");
                    return Err(e);
                }
                tracing::info!(path = %self.path.display(), "closed database, removed working copy");
            }
        }
        Ok(())
    }
}
