//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// The content goes to a temp file in the same directory, which is locked,
/// synced and then renamed over the target. Readers see either the old
/// file or the new one, never a partial write.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file next to the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    // Acquire exclusive lock
    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed { path: path.to_path_buf() })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    // Flush to disk
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .unlock()
        .map_err(|_| Error::LockFailed { path: path.to_path_buf() })?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote file atomically");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Read text content, treating a missing file as `None`.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("etc/heat/heat.conf");

        write_atomic(&path, b"[database]\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[database]\n");
    }

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("heat.conf");

        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["heat.conf".to_string()]);
    }

    #[test]
    fn read_text_if_exists_returns_none_for_missing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.conf");

        assert!(read_text_if_exists(&missing).unwrap().is_none());
    }
}
