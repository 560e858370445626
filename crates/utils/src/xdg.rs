use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "diskcache";

/// XDG Base Directory paths for diskcache
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CONFIG_HOME/diskcache or fallback
    pub fn config_dir() -> PathBuf {
        Self::base("XDG_CONFIG_HOME", ".config").join(APP_DIR)
    }

    /// Get XDG_STATE_HOME/diskcache or fallback
    pub fn state_dir() -> PathBuf {
        Self::base("XDG_STATE_HOME", ".local/state").join(APP_DIR)
    }

    /// Get XDG_CACHE_HOME/diskcache or fallback
    pub fn cache_dir() -> PathBuf {
        Self::base("XDG_CACHE_HOME", ".cache").join(APP_DIR)
    }

    /// Path of the JSON configuration file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Path of the process-wide preferences file
    pub fn preferences_file() -> PathBuf {
        Self::state_dir().join("preferences.json")
    }

    fn base(var: &str, home_relative: &str) -> PathBuf {
        env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|home| home.join(home_relative))
                    .unwrap_or_else(|| PathBuf::from(home_relative))
            })
    }
}
