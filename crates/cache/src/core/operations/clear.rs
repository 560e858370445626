//! Cache clear operations

use crate::core::paths::trash_prefix;
use crate::core::types::DiskCache;
use crate::errors::{CacheError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

impl DiskCache {
    /// Remove all entries.
    ///
    /// The root is first renamed aside in a single step and a fresh empty
    /// root created in its place, so concurrent readers see either the old
    /// contents or an empty cache. The old tree is deleted afterwards; if
    /// that fails it stays behind as a hidden sibling of the root until a
    /// later sweep removes it.
    pub fn remove_all(&self) -> Result<()> {
        let root = &self.inner.root;
        let trash = trash_path(root)?;

        let moved = match fs::rename(root, &trash) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(CacheError::io(root, "move cache directory aside", e)),
        };

        fs::create_dir_all(root)
            .map_err(|e| CacheError::io(root, "recreate cache directory", e))?;

        if moved {
            if let Err(e) = fs::remove_dir_all(&trash) {
                tracing::warn!(
                    "Failed to delete old cache contents at {}: {}",
                    trash.display(),
                    e
                );
            }
        }

        tracing::debug!("Cleared cache at {}", root.display());
        Ok(())
    }
}

/// Hidden sibling of `root` that the old contents are moved to
fn trash_path(root: &Path) -> Result<PathBuf> {
    let (Some(parent), Some(prefix)) = (root.parent(), trash_prefix(root)) else {
        return Err(CacheError::configuration(format!(
            "cache root {} has no parent directory",
            root.display()
        )));
    };
    Ok(parent.join(format!("{prefix}{}", uuid::Uuid::new_v4())))
}
