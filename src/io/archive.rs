//! Zip expansion for uploaded archives.

use crate::errors::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Expand `archive_path` into `dest`. A file that cannot be opened as a zip,
/// or any member that fails to extract, is reported as a corrupt archive.
/// Member paths are sanitized via `enclosed_name` so hostile archives cannot
/// escape the extraction directory.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(Error::CorruptArchive)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(Error::CorruptArchive)?;
        let Some(relative) = entry.enclosed_name() else {
            log::warn!("Skipping archive member with unsafe path: {}", entry.name());
            continue;
        };
        let target = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }
    }
    Ok(())
}

/// All `.py` files under `dir`, in a stable (sorted) order so report
/// sections come out deterministically.
pub fn collect_python_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "py"))
        .collect();
    files.sort();
    files
}
