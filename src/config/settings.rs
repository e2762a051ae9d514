//! User settings stored as JSON under the platform config dir

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::constants;

/// How `save_all` treats keys that are in storage but not in the saved list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStrategy {
    /// Storage mirrors the saved list exactly (absent keys are deleted)
    #[default]
    Mirror,
    /// Only upsert; keys absent from the saved list are left in storage
    UpsertOnly,
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Store directory override; platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub save_strategy: SaveStrategy,
    #[serde(default = "default_wake_lock")]
    pub wake_lock: bool,
    #[serde(default = "default_brightness_percent")]
    pub brightness_percent: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_window_width")]
    pub window_width: u16,
    #[serde(default = "default_window_height")]
    pub window_height: u16,
}

fn default_wake_lock() -> bool {
    true
}

fn default_brightness_percent() -> u16 {
    constants::display::BRIGHTNESS_PERCENT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_window_width() -> u16 {
    448
}

fn default_window_height() -> u16 {
    720
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            save_strategy: SaveStrategy::default(),
            wake_lock: default_wake_lock(),
            brightness_percent: default_brightness_percent(),
            log_level: default_log_level(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Load from the default location, then apply env overrides and clamping
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::path())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate_and_clamp();
        Ok(config)
    }

    /// Load settings from `path`, writing defaults there if it does not exist
    ///
    /// A file that fails to parse is left untouched and defaults are used.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        match serde_json::from_str::<Config>(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                error!(path = %path.display(), "The file has been preserved - fix it to restore your settings.");
                Ok(Config::default())
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Directory holding the barcode store
    pub fn store_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path
    }

    /// Apply environment overrides; `lookup` resolves a variable name
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        use constants::env::*;

        if let Some(dir) = lookup(DATA_DIR).filter(|d| !d.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup(BRIGHTNESS) {
            match raw.trim().parse::<u16>() {
                Ok(percent) => self.brightness_percent = percent,
                Err(e) => warn!(var = BRIGHTNESS, value = %raw, error = %e, "Ignoring invalid brightness override"),
            }
        }

        if let Some(raw) = lookup(WAKE_LOCK) {
            self.wake_lock = !matches!(raw.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off");
        }
    }

    /// Clamp values to safe ranges
    pub fn validate_and_clamp(&mut self) {
        use constants::validation::*;

        if self.brightness_percent < MIN_BRIGHTNESS_PERCENT {
            warn!(brightness_percent = self.brightness_percent, min = MIN_BRIGHTNESS_PERCENT, "brightness_percent below minimum, clamping");
            self.brightness_percent = MIN_BRIGHTNESS_PERCENT;
        } else if self.brightness_percent > MAX_BRIGHTNESS_PERCENT {
            warn!(brightness_percent = self.brightness_percent, max = MAX_BRIGHTNESS_PERCENT, "brightness_percent exceeds maximum, clamping");
            self.brightness_percent = MAX_BRIGHTNESS_PERCENT;
        }

        for (label, value, fallback) in [
            ("window_width", &mut self.window_width, default_window_width()),
            ("window_height", &mut self.window_height, default_window_height()),
        ] {
            if *value < MIN_WINDOW_DIMENSION {
                warn!(field = label, value = *value, using = fallback, "window dimension below minimum, using default");
                *value = fallback;
            } else if *value > MAX_WINDOW_DIMENSION {
                warn!(field = label, value = *value, max = MAX_WINDOW_DIMENSION, "window dimension exceeds maximum, clamping");
                *value = MAX_WINDOW_DIMENSION;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("barcode-wallet-config-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_creates_default() {
        let dir = scratch_dir("missing");
        let path = dir.join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = scratch_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, r#"{"save_strategy": "upsert_only", "wake_lock": false}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.save_strategy, SaveStrategy::UpsertOnly);
        assert!(!config.wake_lock);
        assert_eq!(config.brightness_percent, 120);
        assert_eq!(config.log_level, "info");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_broken_file_preserved_and_defaults_used() {
        let dir = scratch_dir("broken");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_env_overrides() {
        let vars = HashMap::from([
            (constants::env::DATA_DIR, "/tmp/wallet"),
            (constants::env::BRIGHTNESS, "150"),
            (constants::env::WAKE_LOCK, "false"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/wallet")));
        assert_eq!(config.store_dir(), PathBuf::from("/tmp/wallet"));
        assert_eq!(config.brightness_percent, 150);
        assert!(!config.wake_lock);
    }

    #[test]
    fn test_invalid_brightness_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == constants::env::BRIGHTNESS).then(|| "bright".to_string()));
        assert_eq!(config.brightness_percent, 120);
    }

    #[test]
    fn test_validate_and_clamp() {
        let mut config = Config {
            brightness_percent: 500,
            window_width: 10,
            window_height: 9000,
            ..Config::default()
        };
        config.validate_and_clamp();
        assert_eq!(config.brightness_percent, 200);
        assert_eq!(config.window_width, 448);
        assert_eq!(config.window_height, 4096);

        config.brightness_percent = 20;
        config.validate_and_clamp();
        assert_eq!(config.brightness_percent, 100);
    }
}
