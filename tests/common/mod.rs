// common/mod.rs - Shared setup and teardown for the exercise suites
//
// Every suite builds the snapshot chain into its own temporary directory,
// copies a snapshot to a working copy and opens it. Setup and teardown are
// plain functions: the handle is passed in and out explicitly.
//
//   let suite = setup_suite("06", "07").await?;
//   let result = suite.db.select_multiple_rows(QUERY).await;
//   teardown_suite(suite).await?;
//   assert_eq!(as_json(result?), json!([...]));

#![allow(dead_code)]

use serde_json::Value;
use sql_movies::fixtures::{build_snapshots, MoviesDataset};
use sql_movies::{CleanupPolicy, Database, FixtureLoader, HarnessConfig, Row};
use tempfile::TempDir;

pub struct Suite {
    pub db: Database,
    pub loader: FixtureLoader,
    // Dropped last; removes the snapshots and working copies
    pub dir: TempDir,
}

/// A temporary directory holding freshly built snapshots `01`..`06`
pub async fn snapshot_dir() -> anyhow::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    build_snapshots::<MoviesDataset>(&HarnessConfig::for_dir(dir.path())).await?;
    Ok(dir)
}

pub fn loader_for(dir: &TempDir, cleanup: CleanupPolicy) -> FixtureLoader {
    FixtureLoader::new(HarnessConfig::for_dir(dir.path()).with_cleanup(cleanup))
}

/// Build snapshots, then load `source` as `target`
pub async fn setup_suite(source: &str, target: &str) -> anyhow::Result<Suite> {
    let dir = snapshot_dir().await?;
    let loader = loader_for(&dir, CleanupPolicy::Delete);
    let db = loader.load(source, target).await?;
    Ok(Suite { db, loader, dir })
}

pub async fn teardown_suite(suite: Suite) -> anyhow::Result<()> {
    suite.db.close().await?;
    Ok(())
}

/// Rows as a JSON array, for comparing against `json!` literals
pub fn as_json(rows: Vec<Row>) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}
