pub mod arena;
pub mod archive;

use crate::errors::{Error, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Upload boundary: reject oversized payloads before any processing starts.
pub fn enforce_size_limit(path: &Path, limit: u64) -> Result<()> {
    let actual = fs::metadata(path)?.len();
    if actual > limit {
        return Err(Error::PayloadTooLarge { limit, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn size_limit_rejects_large_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.py");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(&vec![b'#'; 2048]).unwrap();

        assert!(enforce_size_limit(&path, 4096).is_ok());
        let err = enforce_size_limit(&path, 1024).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { actual: 2048, .. }));
    }
}
