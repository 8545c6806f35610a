use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONTAINER_SELECTOR: &str = "div.ums-grid-offered-section";
pub const DEFAULT_CHECKBOX_SELECTOR: &str = "input[type='checkbox']";
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const MAX_DELAY_MS: u64 = 60_000;
pub const DEFAULT_PLACEHOLDER: &str = "Enter course code";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {field} selector {selector:?}")]
    InvalidSelector { field: &'static str, selector: String },
    #[error("delay of {0} ms exceeds the 60000 ms limit")]
    DelayTooLong(u64),
}

/// Where fields produced by a comma split are inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitPlacement {
    /// Right after the field the text was typed or pasted into.
    #[default]
    AfterOrigin,
    /// At the end of the field list.
    AppendEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorOptions {
    /// CSS selector identifying section containers on the target page.
    pub container: String,
    /// CSS selector for the checkbox inside a container.
    pub checkbox: String,
    /// Pause after each code, in milliseconds. Live registration pages want
    /// 500 to 1000; anything from 0 (saved pages) up to [`MAX_DELAY_MS`] is
    /// accepted.
    pub delay_ms: u64,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        SelectorOptions {
            container: DEFAULT_CONTAINER_SELECTOR.to_string(),
            checkbox: DEFAULT_CHECKBOX_SELECTOR.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl SelectorOptions {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorOptions {
    pub placement: SplitPlacement,
    pub placeholder: String,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        CollectorOptions {
            placement: SplitPlacement::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selector: SelectorOptions,
    pub collector: CollectorOptions,
}

impl Config {
    /// Platform config file location, e.g. `~/.config/coursepick/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "coursepick").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, otherwise the platform config file when it
    /// exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_selector("container", &self.selector.container)?;
        check_selector("checkbox", &self.selector.checkbox)?;
        if self.selector.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::DelayTooLong(self.selector.delay_ms));
        }
        Ok(())
    }
}

fn check_selector(field: &'static str, selector: &str) -> Result<(), ConfigError> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidSelector {
            field,
            selector: selector.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_registration_page() {
        let config = Config::default();
        assert_eq!(config.selector.container, "div.ums-grid-offered-section");
        assert_eq!(config.selector.checkbox, "input[type='checkbox']");
        assert_eq!(config.selector.delay(), Duration::from_millis(1000));
        assert_eq!(config.collector.placement, SplitPlacement::AfterOrigin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[selector]\ndelay_ms = 750\n\n[collector]\nplacement = \"append-end\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.selector.delay_ms, 750);
        assert_eq!(config.selector.container, DEFAULT_CONTAINER_SELECTOR);
        assert_eq!(config.collector.placement, SplitPlacement::AppendEnd);
        assert_eq!(config.collector.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut config = Config::default();
        config.selector.container = "div[".to_string();
        match config.validate() {
            Err(ConfigError::InvalidSelector { field, .. }) => assert_eq!(field, "container"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_excessive_delay_rejected() {
        let mut config = Config::default();
        config.selector.delay_ms = MAX_DELAY_MS + 1;
        assert!(matches!(config.validate(), Err(ConfigError::DelayTooLong(_))));
    }

    #[test]
    fn test_zero_delay_accepted_for_saved_pages() {
        let mut config = Config::default();
        config.selector.delay_ms = 0;
        assert!(config.validate().is_ok());
        config.selector.delay_ms = MAX_DELAY_MS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::load(Some(&missing)), Err(ConfigError::Read { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial_test::serial]
    fn test_platform_config_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("coursepick");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join(CONFIG_FILE_NAME), "[selector]\ndelay_ms = 500\n").unwrap();

        let previous = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
        let loaded = Config::load(None);
        match previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(loaded.unwrap().selector.delay_ms, 500);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[selector\ndelay_ms = ").unwrap();
        assert!(matches!(Config::load(Some(file.path())), Err(ConfigError::Parse { .. })));
    }
}
