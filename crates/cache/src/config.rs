//! Cache configuration management with precedence and validation
use crate::errors::{Error, Result};
use diskcache_utils::XdgPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 100 MiB
pub const DEFAULT_SIZE_LIMIT: u64 = 100 * 1024 * 1024;
pub const DEFAULT_TRIM_RATIO: f64 = 0.5;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_INITIAL_SWEEP_DELAY: Duration = Duration::from_secs(5);

pub const ENV_SIZE_LIMIT: &str = "DISKCACHE_SIZE_LIMIT";
pub const ENV_TRIM_RATIO: &str = "DISKCACHE_TRIM_RATIO";
pub const ENV_SWEEP_INTERVAL: &str = "DISKCACHE_SWEEP_INTERVAL_SECS";
pub const ENV_INITIAL_SWEEP_DELAY: &str = "DISKCACHE_INITIAL_SWEEP_DELAY_SECS";

/// Tuning knobs of a disk cache instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskCacheConfig {
    /// Size limit in bytes. Changes take effect on the next sweep.
    pub size_limit: u64,
    /// A sweep removes entries until the remaining size is at most
    /// `size_limit * trim_ratio`.
    pub trim_ratio: f64,
    /// Minimum time between two sweeps of the same root
    #[serde(with = "duration_secs")]
    pub sweep_interval: Duration,
    /// Delay before a due sweep starts after the cache is created
    #[serde(with = "duration_secs")]
    pub initial_sweep_delay: Duration,
}

impl Default for DiskCacheConfig {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
            trim_ratio: DEFAULT_TRIM_RATIO,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            initial_sweep_delay: DEFAULT_INITIAL_SWEEP_DELAY,
        }
    }
}

impl DiskCacheConfig {
    /// Size the cache is trimmed down to once it exceeds `size_limit`
    pub fn target_size(&self) -> u64 {
        (self.size_limit as f64 * self.trim_ratio) as u64
    }

    pub fn validate(&self) -> Result<()> {
        if self.size_limit == 0 {
            return Err(Error::configuration("size limit must be greater than zero"));
        }
        if !(self.trim_ratio > 0.0 && self.trim_ratio <= 1.0) {
            return Err(Error::configuration(format!(
                "trim ratio must be within (0, 1], got {}",
                self.trim_ratio
            )));
        }
        Ok(())
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Builder for creating cache configurations
pub struct DiskCacheConfigBuilder {
    config: DiskCacheConfig,
}

impl DiskCacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: DiskCacheConfig::default(),
        }
    }

    pub fn with_size_limit(mut self, size_limit: u64) -> Self {
        self.config.size_limit = size_limit;
        self
    }

    pub fn with_trim_ratio(mut self, trim_ratio: f64) -> Self {
        self.config.trim_ratio = trim_ratio;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    pub fn with_initial_sweep_delay(mut self, delay: Duration) -> Self {
        self.config.initial_sweep_delay = delay;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<DiskCacheConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for DiskCacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Values read from a config file or the environment; unset fields keep
/// whatever a lower-precedence source provided.
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    size_limit: Option<u64>,
    trim_ratio: Option<f64>,
    sweep_interval: Option<u64>,
    initial_sweep_delay: Option<u64>,
}

impl PartialConfig {
    fn apply(self, config: &mut DiskCacheConfig) {
        if let Some(v) = self.size_limit {
            config.size_limit = v;
        }
        if let Some(v) = self.trim_ratio {
            config.trim_ratio = v;
        }
        if let Some(v) = self.sweep_interval {
            config.sweep_interval = Duration::from_secs(v);
        }
        if let Some(v) = self.initial_sweep_delay {
            config.initial_sweep_delay = Duration::from_secs(v);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    disk_cache: Option<PartialConfig>,
}

/// Configuration loader that handles precedence:
/// defaults < config file < environment
pub struct DiskCacheConfigLoader;

impl DiskCacheConfigLoader {
    /// Load configuration from the default config file and the environment
    pub fn load() -> Result<DiskCacheConfig> {
        Self::load_from(&XdgPaths::config_file())
    }

    /// Load configuration using `config_path` as the config file
    pub fn load_from(config_path: &Path) -> Result<DiskCacheConfig> {
        let mut config = DiskCacheConfig::default();

        if let Some(file_config) = Self::load_from_config_file(config_path)? {
            file_config.apply(&mut config);
        }

        Self::load_from_env().apply(&mut config);

        config.validate()?;
        Ok(config)
    }

    fn load_from_config_file(config_path: &Path) -> Result<Option<PartialConfig>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .map_err(|e| Error::io(config_path, "read config file", e))?;

        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| Error::config_file(config_path, e))?;

        Ok(file.disk_cache)
    }

    fn load_from_env() -> PartialConfig {
        PartialConfig {
            size_limit: env_value(ENV_SIZE_LIMIT),
            trim_ratio: env_value(ENV_TRIM_RATIO),
            sweep_interval: env_value(ENV_SWEEP_INTERVAL),
            initial_sweep_delay: env_value(ENV_INITIAL_SWEEP_DELAY),
        }
    }
}

fn env_value<T: std::str::FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", var, raw);
            None
        }
    }
}

/// Default root for a named cache: `<XDG cache dir>/diskcache/<name>`
pub fn named_cache_root(name: &str) -> PathBuf {
    XdgPaths::cache_dir().join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        for var in [
            ENV_SIZE_LIMIT,
            ENV_TRIM_RATIO,
            ENV_SWEEP_INTERVAL,
            ENV_INITIAL_SWEEP_DELAY,
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = DiskCacheConfig::default();
        assert_eq!(config.size_limit, 100 * 1024 * 1024);
        assert_eq!(config.trim_ratio, 0.5);
        assert_eq!(config.sweep_interval, Duration::from_secs(86_400));
        assert_eq!(config.initial_sweep_delay, Duration::from_secs(5));
        assert_eq!(config.target_size(), 50 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_validation() {
        let config = DiskCacheConfigBuilder::new()
            .with_size_limit(1000)
            .with_trim_ratio(0.7)
            .build()
            .unwrap();
        assert_eq!(config.target_size(), 700);

        assert!(DiskCacheConfigBuilder::new()
            .with_size_limit(0)
            .build()
            .is_err());
        assert!(DiskCacheConfigBuilder::new()
            .with_trim_ratio(0.0)
            .build()
            .is_err());
        assert!(DiskCacheConfigBuilder::new()
            .with_trim_ratio(1.5)
            .build()
            .is_err());
        assert!(DiskCacheConfigBuilder::new()
            .with_trim_ratio(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_serde_durations_as_seconds() {
        let config = DiskCacheConfig {
            sweep_interval: Duration::from_secs(30),
            ..DiskCacheConfig::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["sweep_interval"], 30);

        let parsed: DiskCacheConfig =
            serde_json::from_str(r#"{"size_limit": 2048, "initial_sweep_delay": 0}"#).unwrap();
        assert_eq!(parsed.size_limit, 2048);
        assert_eq!(parsed.initial_sweep_delay, Duration::ZERO);
        assert_eq!(parsed.trim_ratio, DEFAULT_TRIM_RATIO);
    }

    #[test]
    #[serial]
    fn test_config_file_loading() -> Result<()> {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"disk_cache": {"size_limit": 4096, "sweep_interval": 60}}"#,
        )
        .unwrap();

        let config = DiskCacheConfigLoader::load_from(&path)?;
        assert_eq!(config.size_limit, 4096);
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.trim_ratio, DEFAULT_TRIM_RATIO);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_missing_config_file_uses_defaults() -> Result<()> {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let config = DiskCacheConfigLoader::load_from(&temp_dir.path().join("absent.json"))?;
        assert_eq!(config, DiskCacheConfig::default());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_malformed_config_file() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();

        let result = DiskCacheConfigLoader::load_from(&path);
        assert!(matches!(result, Err(Error::ConfigFile { .. })));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() -> Result<()> {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"disk_cache": {"size_limit": 4096}}"#).unwrap();

        std::env::set_var(ENV_SIZE_LIMIT, "8192");
        std::env::set_var(ENV_TRIM_RATIO, "not-a-number");
        std::env::set_var(ENV_INITIAL_SWEEP_DELAY, "0");
        let result = DiskCacheConfigLoader::load_from(&path);
        clear_env();

        let config = result?;
        assert_eq!(config.size_limit, 8192);
        assert_eq!(config.trim_ratio, DEFAULT_TRIM_RATIO);
        assert_eq!(config.initial_sweep_delay, Duration::ZERO);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_fails_validation() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var(ENV_TRIM_RATIO, "2.5");
        let result = DiskCacheConfigLoader::load_from(&temp_dir.path().join("absent.json"));
        clear_env();

        assert!(matches!(result, Err(Error::Configuration { .. })));
    }
}
