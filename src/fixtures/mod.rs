// fixtures/mod.rs - Snapshot chain builder
//
// A dataset is a linear chain of steps. Each step is a list of SQL
// statements; step N is built from a copy of step N-1's snapshot, so
// `06.snapshot` holds everything steps 01..06 created.
//
// The builder is the only code in the crate that writes to a database:
// suites read from working copies made by the loader.

pub mod movies;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tokio::fs;

use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::snapshot::{copy_database, remove_database, SnapshotLabel};

pub use movies::MoviesDataset;

pub const MANIFEST_FILE: &str = "manifest.json";

/// One population step of a dataset
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub label: &'static str,
    pub description: &'static str,
    /// Statements executed in order inside a single transaction
    pub setup_sql: &'static [&'static str],
}

/// A dataset is an ordered chain of steps
pub trait Dataset {
    const NAME: &'static str;

    fn steps() -> &'static [Step];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub label: String,
    pub description: String,
    pub file: String,
}

/// Written next to the snapshots as `manifest.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub dataset: String,
    pub snapshots: Vec<ManifestEntry>,
}

impl SnapshotManifest {
    pub async fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    label: MANIFEST_FILE.to_string(),
                    path,
                })
            }
            Err(e) => return Err(Error::io_failure(&path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| Error::io_failure(&path, e))
    }

    async fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_vec_pretty(self).map_err(|e| Error::io_failure(&path, e))?;
        fs::write(&path, json)
            .await
            .map_err(|e| Error::io_failure(&path, e))?;
        Ok(path)
    }
}

/// Build every snapshot of `D` into `config.snapshot_dir`, replacing
/// existing files, and write the manifest.
pub async fn build_snapshots<D: Dataset>(config: &HarnessConfig) -> Result<SnapshotManifest> {
    let dir = config.snapshot_dir.as_path();
    fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io_failure(dir, e))?;

    let mut previous: Option<PathBuf> = None;
    let mut entries = Vec::with_capacity(D::steps().len());

    for step in D::steps() {
        let label = SnapshotLabel::parse(step.label)?;
        let path = label.path_in(dir, &config.extension);

        match &previous {
            Some(previous) => {
                copy_database(previous, &path).await?;
            }
            None => remove_database(&path).await?,
        }

        apply_step(&path, step).await?;
        tracing::info!(
            dataset = D::NAME,
            label = step.label,
            statements = step.setup_sql.len(),
            "built snapshot"
        );

        entries.push(ManifestEntry {
            label: step.label.to_string(),
            description: step.description.to_string(),
            file: format!("{}.{}", step.label, config.extension),
        });
        previous = Some(path);
    }

    let manifest = SnapshotManifest {
        dataset: D::NAME.to_string(),
        snapshots: entries,
    };
    manifest.write(dir).await?;
    Ok(manifest)
}

async fn apply_step(path: &Path, step: &Step) -> Result<()> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| Error::io_failure(path, e))?;

    let result = run_in_transaction(&pool, path, step).await;
    pool.close().await;
    result
}

async fn run_in_transaction(pool: &SqlitePool, path: &Path, step: &Step) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::from_query("BEGIN", path, e))?;

    for sql in step.setup_sql {
        let result = sqlx::query(sql).execute(&mut *tx).await;
        if let Err(e) = result {
            tx.rollback()
                .await
                .map_err(|e| Error::from_query("ROLLBACK", path, e))?;
            return Err(Error::from_query(sql, path, e));
        }
    }

    tx.commit()
        .await
        .map_err(|e| Error::from_query("COMMIT", path, e))
}
