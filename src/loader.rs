// loader.rs - Fixture loader
//
// Copies a snapshot to a working copy under a new label and opens it, so
// every suite starts from the same state and never touches the snapshot.

use std::path::PathBuf;

use crate::config::HarnessConfig;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::snapshot::{copy_database, ensure_exists, SnapshotLabel};
use crate::timing::with_timeout;

#[derive(Clone, Debug)]
pub struct FixtureLoader {
    config: HarnessConfig,
}

impl FixtureLoader {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(HarnessConfig::from_env()?))
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Where the file for `label` lives (snapshot or working copy)
    pub fn snapshot_path(&self, label: &SnapshotLabel) -> PathBuf {
        label.path_in(&self.config.snapshot_dir, &self.config.extension)
    }

    /// Copy snapshot `source` to `target` (replacing any stale copy) and
    /// open the result.
    ///
    /// Two suites running at the same time must use different targets;
    /// see [`FixtureLoader::load_isolated`].
    pub async fn load(&self, source: &str, target: &str) -> Result<Database> {
        let source = SnapshotLabel::parse(source)?;
        let target = SnapshotLabel::parse(target)?;
        if source == target {
            return Err(Error::InvalidLabel {
                label: target.to_string(),
                reason: "target must differ from the source snapshot",
            });
        }

        with_timeout("setup", self.config.setup_timeout, self.copy_and_open(&source, &target)).await
    }

    /// Like [`FixtureLoader::load`] with a generated `<prefix>-xxxxxxxx`
    /// target, for suites that may run concurrently
    pub async fn load_isolated(&self, source: &str, prefix: &str) -> Result<Database> {
        let target = SnapshotLabel::unique(prefix)?;
        self.load(source, target.as_str()).await
    }

    async fn copy_and_open(&self, source: &SnapshotLabel, target: &SnapshotLabel) -> Result<Database> {
        let source_path = self.snapshot_path(source);
        let target_path = self.snapshot_path(target);

        ensure_exists(source.as_str(), &source_path).await?;
        let bytes = copy_database(&source_path, &target_path).await?;

        tracing::info!(
            source = %source,
            target = %target,
            bytes,
            "created working copy from snapshot"
        );

        Database::open_working_copy(&target_path, self.config.query_timeout, self.config.cleanup).await
    }
}
