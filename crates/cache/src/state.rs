//! Persisted sweep state
//!
//! The only state a cache keeps outside its root is the time of the last
//! successful sweep, stored in a [`PreferencesStore`] under a key derived
//! from the root path so that caches with different roots are tracked
//! independently.

pub use crate::core::{is_sweep_due, sweep_state_key};
pub use diskcache_utils::{FilePreferences, MemoryPreferences, PreferencesStore, PrefsError};
