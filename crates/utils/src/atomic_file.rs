//! Atomic file operations to prevent torn reads of cache files

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

/// Suffix carried by in-flight temporary files
pub const TEMP_SUFFIX: &str = ".tmp";

/// Whether a file name belongs to a temporary file created by [`write_atomic`]
pub fn is_temp_file_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// Write data to a file atomically by writing to a temporary file in the
/// same directory and renaming it over `path`.
///
/// The parent directory must already exist; a missing parent surfaces as
/// `ErrorKind::NotFound` so callers can decide whether to recreate it.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "invalid file path: no parent directory",
        )
    })?;

    let temp_path = parent.join(format!(".{}{TEMP_SUFFIX}", Uuid::new_v4()));

    let result = (|| -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        e
    })
}

/// Like [`write_atomic`] but creates missing parent directories first
pub fn write_atomic_create_dirs(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_atomic(path, content)
}
