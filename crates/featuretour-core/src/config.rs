//! Configuration loaded from `config.toml`.
//!
//! Every section and field is optional; anything missing falls back to the
//! defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::theme::Theme;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Terminal UI settings
    pub ui: UiConfig,
    /// Optimistic counter demo
    pub counter: DemoConfig,
    /// Optimistic comment list demo
    pub comments: DemoConfig,
    /// Profile form demo
    pub profile: DemoConfig,
    /// Async posts resource demo
    pub posts: ResourceConfig,
}

/// Terminal UI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Name of the starting theme preset
    pub theme: String,
    /// Input poll interval in milliseconds
    pub tick_rate_ms: u64,
}

/// Simulated backend settings for one optimistic demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated network latency in milliseconds
    pub latency_ms: u64,
    /// Probability that a simulated call fails
    pub failure_rate: f64,
}

/// Settings for the async resource demo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Simulated fetch latency in milliseconds
    pub latency_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            theme: "dark".to_string(),
            tick_rate_ms: 100,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            latency_ms: 1000,
            failure_rate: 0.2,
        }
    }
}

impl DemoConfig {
    /// Latency as a duration
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig { latency_ms: 1000 }
    }
}

impl ResourceConfig {
    /// Latency as a duration
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ui: UiConfig::default(),
            counter: DemoConfig {
                latency_ms: 1500,
                failure_rate: 0.3,
            },
            comments: DemoConfig {
                latency_ms: 1500,
                failure_rate: 0.2,
            },
            profile: DemoConfig {
                latency_ms: 1000,
                failure_rate: 0.2,
            },
            posts: ResourceConfig::default(),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/featuretour/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NoConfigDir` when the platform has no config
    /// directory.
    pub fn default_path() -> CoreResult<PathBuf> {
        let dir = dirs::config_dir().ok_or(CoreError::NoConfigDir)?;
        Ok(dir.join("featuretour").join("config.toml"))
    }

    /// Loads from the default location.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from`].
    pub fn load() -> CoreResult<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads and validates `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// holds invalid values.
    pub fn load_from(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            tracing::debug!(?path, "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(?path, "config loaded");
        Ok(config)
    }

    /// Writes to the default location.
    ///
    /// # Errors
    ///
    /// See [`Config::save_to`].
    pub fn save(&self) -> CoreResult<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Checks rates, intervals and the theme name.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFailureRate`, `CoreError::UnknownTheme` or
    /// `CoreError::InvalidConfig` for the first offending value.
    pub fn validate(&self) -> CoreResult<()> {
        for demo in [&self.counter, &self.comments, &self.profile] {
            if !(0.0..=1.0).contains(&demo.failure_rate) {
                return Err(CoreError::InvalidFailureRate(demo.failure_rate));
            }
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "ui.tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Theme::by_name(&self.ui.theme)?;
        Ok(())
    }

    /// Applies one failure rate to every optimistic demo.
    pub fn override_failure_rate(&mut self, rate: f64) {
        for demo in [&mut self.counter, &mut self.comments, &mut self.profile] {
            demo.failure_rate = rate;
        }
    }

    /// Applies one latency to every simulated call and fetch.
    pub fn override_latency(&mut self, latency_ms: u64) {
        for demo in [&mut self.counter, &mut self.comments, &mut self.profile] {
            demo.latency_ms = latency_ms;
        }
        self.posts.latency_ms = latency_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_demos() {
        let config = Config::default();
        assert_eq!(config.counter.latency(), Duration::from_millis(1500));
        assert_eq!(config.counter.failure_rate, 0.3);
        assert_eq!(config.profile.failure_rate, 0.2);
        assert_eq!(config.ui.theme, "dark");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = Config::load_from(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.theme = "light".to_string();
        config.comments.failure_rate = 0.5;
        config.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[counter]\nfailure_rate = 0.0\n").expect("write");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.counter.failure_rate, 0.0);
        assert_eq!(loaded.counter.latency_ms, DemoConfig::default().latency_ms);
        assert_eq!(loaded.profile, Config::default().profile);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui\ntheme = ").expect("write");

        let err = Config::load_from(&path).expect_err("parse error");
        assert!(matches!(err, CoreError::ConfigParse { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.profile.failure_rate = 2.0;
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidFailureRate(_))
        ));

        let mut config = Config::default();
        config.ui.theme = "sepia".to_string();
        assert!(matches!(config.validate(), Err(CoreError::UnknownTheme(_))));

        let mut config = Config::default();
        config.ui.tick_rate_ms = 0;
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.override_failure_rate(0.0);
        config.override_latency(10);
        assert_eq!(config.counter.failure_rate, 0.0);
        assert_eq!(config.comments.failure_rate, 0.0);
        assert_eq!(config.profile.latency_ms, 10);
        assert_eq!(config.posts.latency_ms, 10);
    }
}
