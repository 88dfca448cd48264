//! Request-scoped working directories.
//!
//! Each report request gets two disjoint locations: a scratch directory for
//! archive extraction and intermediate files, deleted automatically when the
//! request ends, and a unique artifact directory under the configured output
//! root that survives the request. Unique per-request paths mean concurrent
//! invocations sharing one output root cannot clobber each other.

use crate::errors::Result;
use crate::io::ensure_dir;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct ReportArena {
    scratch: TempDir,
    artifact_dir: PathBuf,
}

impl ReportArena {
    pub fn create(output_root: &Path) -> Result<Self> {
        ensure_dir(output_root)?;
        let scratch = tempfile::Builder::new().prefix("codereport-").tempdir()?;
        let artifact_dir = tempfile::Builder::new()
            .prefix("report-")
            .tempdir_in(output_root)?
            .keep();
        Ok(Self {
            scratch,
            artifact_dir,
        })
    }

    /// Scratch space, removed when the arena is dropped.
    pub fn scratch(&self) -> &Path {
        self.scratch.path()
    }

    /// Where the delivered artifact lands; the caller deletes it after
    /// consuming the report.
    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    /// Best-effort removal of the artifact directory, for requests that end
    /// without producing anything deliverable.
    pub fn discard_artifacts(&self) {
        if let Err(e) = std::fs::remove_dir_all(&self.artifact_dir) {
            log::warn!(
                "Could not remove artifact directory {}: {}",
                self.artifact_dir.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_is_cleaned_up_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let scratch_path;
        {
            let arena = ReportArena::create(root.path()).unwrap();
            scratch_path = arena.scratch().to_path_buf();
            assert!(scratch_path.exists());
            assert!(arena.artifact_dir().exists());
        }
        assert!(!scratch_path.exists());
    }

    #[test]
    fn concurrent_arenas_get_distinct_directories() {
        let root = tempfile::tempdir().unwrap();
        let a = ReportArena::create(root.path()).unwrap();
        let b = ReportArena::create(root.path()).unwrap();
        assert_ne!(a.artifact_dir(), b.artifact_dir());
        assert_ne!(a.scratch(), b.scratch());
    }
}
