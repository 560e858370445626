//! Error and recovery hint types

use diskcache_utils::PrefsError;
use std::path::PathBuf;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, CacheError>;

/// Shorter alias for [`CacheError`]
pub use CacheError as Error;

/// Failure of a whole-cache operation.
///
/// Entry-level reads and writes never produce one of these.
#[derive(Debug)]
pub enum CacheError {
    /// A filesystem call on the cache root or a config file failed
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// The config file exists but is not valid JSON for a config
    ConfigFile {
        path: PathBuf,
        source: serde_json::Error,
        recovery_hint: RecoveryHint,
    },

    /// Configuration values out of range
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },

    /// The sweep timestamp could not be persisted
    Preferences {
        key: String,
        source: PrefsError,
        recovery_hint: RecoveryHint,
    },

    /// Another sweep of the same cache instance is running
    SweepInProgress {
        root: PathBuf,
        recovery_hint: RecoveryHint,
    },
}

/// What a caller can do about a [`CacheError`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryHint {
    /// Try again after the given delay
    Retry { after: Duration },
    CheckPermissions { path: PathBuf },
    /// The cache directory vanished; creating a new cache restores it
    Recreate,
    UpdateConfiguration,
    /// Correct or delete the config file at `path`
    FixConfigFile { path: PathBuf },
    /// Safe to ignore; the cache keeps working
    Ignore,
}
