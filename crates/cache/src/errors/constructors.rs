//! Constructors for the errors raised inside the crate

use super::types::{CacheError, RecoveryHint};
use diskcache_utils::PrefsError;
use std::path::PathBuf;

impl CacheError {
    /// An I/O failure on `path` the caller may be able to fix with
    /// permissions
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        let path = path.into();
        Self::Io {
            recovery_hint: RecoveryHint::CheckPermissions { path: path.clone() },
            path,
            operation,
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        }
    }

    pub(crate) fn config_file(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        let path = path.into();
        Self::ConfigFile {
            recovery_hint: RecoveryHint::FixConfigFile { path: path.clone() },
            path,
            source,
        }
    }

    /// The cache root could not be listed during a sweep
    pub(crate) fn sweep_scan(root: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: root.into(),
            operation: "enumerate cache directory",
            source,
            recovery_hint: RecoveryHint::Recreate,
        }
    }

    /// Eviction succeeded but its timestamp was not stored
    pub(crate) fn sweep_state(key: impl Into<String>, source: PrefsError) -> Self {
        Self::Preferences {
            key: key.into(),
            source,
            recovery_hint: RecoveryHint::Ignore,
        }
    }
}
