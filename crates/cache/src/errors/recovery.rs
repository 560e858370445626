//! Recovery hints attached to cache errors

use super::types::{CacheError, RecoveryHint};

impl CacheError {
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::Io { recovery_hint, .. }
            | Self::ConfigFile { recovery_hint, .. }
            | Self::Configuration { recovery_hint, .. }
            | Self::Preferences { recovery_hint, .. }
            | Self::SweepInProgress { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Whether retrying the same call later may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::Retry { .. })
    }
}
