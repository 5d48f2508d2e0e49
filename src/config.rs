//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/a11yh/a11yh.toml`
//! 3. Environment variables: `A11YH_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Unified configuration for a11yh.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Insert every fixture node as a root (flat element list)
    pub flatten: bool,
    /// Show node frames when rendering trees
    pub show_frames: bool,
    /// Directory against which relative fixture paths are resolved
    pub fixture_dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub flatten: Option<bool>,
    pub show_frames: Option<bool>,
    pub fixture_dir: Option<PathBuf>,
}

/// Get the XDG config directory for a11yh.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "a11yh").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("a11yh.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unexpandable input is returned as is.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// `NotFound` means the variable is not set.
fn env_value<T>(lookup: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match lookup {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.fixture_dir {
            let expanded = expand_env_vars(dir.to_string_lossy().as_ref());
            self.fixture_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            flatten: overlay.flatten.unwrap_or(self.flatten),
            show_frames: overlay.show_frames.unwrap_or(self.show_frames),
            fixture_dir: overlay
                .fixture_dir
                .clone()
                .or_else(|| self.fixture_dir.clone()),
        }
    }

    /// Load settings with full precedence: defaults, global file, env vars.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_with(global_config_path().as_deref())
    }

    /// Full precedence with an explicit global file: defaults, `global_path`,
    /// env vars. Paths are expanded once, after the last layer.
    pub fn load_with(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut settings = Self::layered(global_path)?.with_env_overrides()?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Defaults overlaid with the config file at `global_path`, if it exists.
    /// Environment variables are not consulted.
    pub fn load_from(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut settings = Self::layered(global_path)?;
        settings.expand_paths();
        Ok(settings)
    }

    fn layered(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();
        if let Some(path) = global_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
                debug!(path = %path.display(), "global config applied");
            }
        }
        Ok(current)
    }

    /// Apply A11YH_* environment variables as explicit overrides.
    ///
    /// Unset variables inherit; set but unparsable ones are a config error.
    pub fn with_env_overrides(mut self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("A11YH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_bool("flatten"))? {
            self.flatten = val;
        }
        if let Some(val) = env_value(config.get_bool("show_frames"))? {
            self.show_frames = val;
        }
        if let Some(val) = env_value(config.get_string("fixture_dir"))? {
            self.fixture_dir = Some(PathBuf::from(val));
        }
        Ok(self)
    }

    /// Render as TOML for `a11yh config`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_file_when_loading_then_defaults() {
        let settings = Settings::load_from(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.flatten);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_inherit() {
        let base = Settings {
            flatten: true,
            show_frames: false,
            fixture_dir: Some(PathBuf::from("/base")),
        };
        let overlay = RawSettings {
            show_frames: Some(true),
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert!(merged.flatten);
        assert!(merged.show_frames);
        assert_eq!(merged.fixture_dir, Some(PathBuf::from("/base")));
    }
}
