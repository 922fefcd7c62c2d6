// snapshot.rs - Snapshot labels and file copies
//
// A snapshot is a plain SQLite file named `<label>.<extension>` inside the
// snapshot directory. Working copies live next to the snapshots under their
// own label.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::fs;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Suffixes SQLite appends for rollback journals and WAL mode
const SIDECAR_SUFFIXES: &[&str] = &["-journal", "-wal", "-shm"];

/// A validated snapshot label such as `06` or `07-a1b2c3d4`.
///
/// Only ASCII letters, digits, `-` and `_` are accepted, so a label always
/// names a file directly inside the snapshot directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotLabel(String);

impl SnapshotLabel {
    pub fn parse(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(Error::InvalidLabel {
                label,
                reason: "label must not be empty",
            });
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::InvalidLabel {
                label,
                reason: "only ASCII letters, digits, '-' and '_' are allowed",
            });
        }
        Ok(Self(label))
    }

    /// A fresh label `<prefix>-<8 hex chars>` for suites that must not
    /// collide with each other
    pub fn unique(prefix: &str) -> Result<Self> {
        let suffix = Uuid::new_v4().simple().to_string();
        Self::parse(format!("{}-{}", prefix, &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File backing this label inside `dir`
    pub fn path_in(&self, dir: &Path, extension: &str) -> PathBuf {
        dir.join(format!("{}.{}", self.0, extension))
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `path` plus SQLite's `-journal`, `-wal` and `-shm` companions
pub fn sidecar_paths(path: &Path) -> Vec<PathBuf> {
    SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = path.as_os_str().to_os_string();
            name.push(suffix);
            PathBuf::from(name)
        })
        .collect()
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io_failure(path, e)),
    }
}

/// Remove a database file together with any journal/WAL leftovers
pub async fn remove_database(path: &Path) -> Result<()> {
    for sidecar in sidecar_paths(path) {
        remove_if_exists(&sidecar).await?;
    }
    remove_if_exists(path).await
}

/// Make sure `source` is an existing regular file
pub async fn ensure_exists(label: &str, source: &Path) -> Result<()> {
    match fs::metadata(source).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(Error::NotFound {
            label: label.to_string(),
            path: source.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound {
            label: label.to_string(),
            path: source.to_path_buf(),
        }),
        Err(e) => Err(Error::io_failure(source, e)),
    }
}

/// Copy `source` over `target`, returning the number of bytes copied.
///
/// The bytes go to a staging file next to `target` which is then renamed
/// into place, so `target` is either the old file or a complete copy.
/// Stale sidecars of `target` are removed first; a leftover hot journal
/// would otherwise be rolled back into the fresh copy on open.
///
/// The copy runs on a blocking thread that outlives a dropped future. If
/// the caller stops waiting (a setup timeout, say), the thread discards its
/// staging file instead of renaming it, so no `.partial-` file survives.
pub async fn copy_database(source: &Path, target: &Path) -> Result<u64> {
    let abandoned = Arc::new(AtomicBool::new(false));
    let _guard = AbandonOnDrop(Arc::clone(&abandoned));

    let (from, to) = (source.to_path_buf(), target.to_path_buf());
    let bytes = tokio::task::spawn_blocking(move || copy_blocking(&from, &to, &abandoned))
        .await
        .map_err(|e| Error::io_failure(target, e))??;

    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        bytes,
        "copied database file"
    );
    Ok(bytes)
}

/// Flags the blocking copy as abandoned when the awaiting future goes away
struct AbandonOnDrop(Arc<AtomicBool>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(format!(".partial-{}", Uuid::new_v4().simple()));
    PathBuf::from(name)
}

fn copy_blocking(source: &Path, target: &Path, abandoned: &AtomicBool) -> Result<u64> {
    let staging = staging_path(target);
    let discard = |err: Error| {
        let _ = std::fs::remove_file(&staging);
        Err(err)
    };

    let bytes = match std::fs::copy(source, &staging) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !source.is_file() => {
            return discard(Error::NotFound {
                label: label_of(source),
                path: source.to_path_buf(),
            });
        }
        Err(e) => return discard(Error::io_failure(&staging, e)),
    };

    if abandoned.load(Ordering::SeqCst) {
        return discard(Error::io_failure(
            &staging,
            io::Error::new(io::ErrorKind::Interrupted, "copy abandoned by caller"),
        ));
    }

    for sidecar in sidecar_paths(target) {
        match std::fs::remove_file(&sidecar) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return discard(Error::io_failure(&sidecar, e)),
        }
    }

    if let Err(e) = std::fs::rename(&staging, target) {
        return discard(Error::io_failure(target, e));
    }
    Ok(bytes)
}

/// Best-effort label for a path: its file stem
pub fn label_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_validation() {
        assert_eq!(SnapshotLabel::parse("06").unwrap().as_str(), "06");
        assert!(SnapshotLabel::parse("07_queries-a").is_ok());

        for bad in ["", "../06", "06.snapshot", "a b", "dir/07"] {
            let err = SnapshotLabel::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidLabel { .. }),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn test_unique_labels_differ() {
        let a = SnapshotLabel::unique("07").unwrap();
        let b = SnapshotLabel::unique("07").unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("07-"));
        assert_eq!(a.as_str().len(), "07-".len() + 8);
    }

    #[test]
    fn test_paths() {
        let label = SnapshotLabel::parse("06").unwrap();
        let path = label.path_in(Path::new("/tmp/snaps"), "snapshot");
        assert_eq!(path, PathBuf::from("/tmp/snaps/06.snapshot"));
        assert_eq!(label_of(&path), "06");

        let sidecars = sidecar_paths(&path);
        assert_eq!(
            sidecars,
            vec![
                PathBuf::from("/tmp/snaps/06.snapshot-journal"),
                PathBuf::from("/tmp/snaps/06.snapshot-wal"),
                PathBuf::from("/tmp/snaps/06.snapshot-shm"),
            ]
        );
    }

    #[tokio::test]
    async fn test_copy_overwrites_and_clears_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("06.snapshot");
        let target = dir.path().join("07.snapshot");
        let stale_journal = dir.path().join("07.snapshot-journal");

        fs::write(&source, b"fresh bytes").await.unwrap();
        fs::write(&target, b"a much longer stale working copy").await.unwrap();
        fs::write(&stale_journal, b"hot journal").await.unwrap();

        let copied = copy_database(&source, &target).await.unwrap();

        assert_eq!(copied, 11);
        assert_eq!(fs::read(&target).await.unwrap(), b"fresh bytes");
        assert!(fs::metadata(&stale_journal).await.is_err());

        // No staging files left behind
        assert_eq!(file_names(dir.path()).await, vec!["06.snapshot", "07.snapshot"]);
    }

    async fn file_names(dir: &Path) -> Vec<String> {
        let mut entries = fs::read_dir(dir).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        names
    }

    #[test]
    fn test_abandoned_copy_discards_staging() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("06.snapshot");
        let target = dir.path().join("07.snapshot");
        std::fs::write(&source, b"fresh bytes").unwrap();
        std::fs::write(&target, b"previous working copy").unwrap();

        let err = copy_blocking(&source, &target, &AtomicBool::new(true)).unwrap_err();

        assert!(matches!(err, Error::IoFailure { .. }));
        assert_eq!(std::fs::read(&target).unwrap(), b"previous working copy");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(
            names.iter().all(|name| !name.contains(".partial-")),
            "staging file left behind: {names:?}"
        );
    }

    #[tokio::test]
    async fn test_dropped_copy_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("06.snapshot");
        let target = dir.path().join("07.snapshot");
        std::fs::write(&source, vec![0xA5u8; 64 * 1024 * 1024]).unwrap();

        let copy = copy_database(&source, &target);
        let _ = tokio::time::timeout(std::time::Duration::from_millis(1), copy).await;

        // The blocking thread finishes on its own; wait for it to settle
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(30);
        loop {
            let names = file_names(dir.path()).await;
            if names.iter().all(|name| !name.contains(".partial-")) {
                break;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "staging file never removed: {names:?}"
            );
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
    }

    #[tokio::test]
    async fn test_copy_missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_database(&dir.path().join("05.snapshot"), &dir.path().join("07.snapshot"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { ref label, .. } if label == "05"));
    }

    #[tokio::test]
    async fn test_remove_database_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("07.snapshot");
        fs::write(&path, b"x").await.unwrap();
        fs::write(dir.path().join("07.snapshot-wal"), b"x").await.unwrap();

        remove_database(&path).await.unwrap();
        remove_database(&path).await.unwrap();

        assert!(fs::metadata(&path).await.is_err());
        assert!(fs::metadata(dir.path().join("07.snapshot-wal")).await.is_err());
    }
}
