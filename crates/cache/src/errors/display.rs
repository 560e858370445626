//! Display implementations for cache errors

use super::types::CacheError;
use std::fmt;

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
                ..
            } => write!(f, "Failed to {} '{}': {}", operation, path.display(), source),
            Self::ConfigFile { path, source, .. } => {
                write!(f, "Invalid config file '{}': {}", path.display(), source)
            }
            Self::Configuration { message, .. } => {
                write!(f, "Cache configuration error: {message}")
            }
            Self::Preferences { key, source, .. } => {
                write!(f, "Failed to store preference '{key}': {source}")
            }
            Self::SweepInProgress { root, .. } => {
                write!(f, "A sweep of '{}' is already running", root.display())
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::ConfigFile { source, .. } => Some(source),
            Self::Preferences { source, .. } => Some(source),
            Self::Configuration { .. } | Self::SweepInProgress { .. } => None,
        }
    }
}
