//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nodetree/nodetree.toml`
//! 3. Explicit config file passed on the command line
//! 4. Environment variables: `NODETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Unified configuration for nodetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Layout file used when none is given on the command line
    pub layout: Option<PathBuf>,
    /// Colored terminal output
    pub color: bool,
    /// Show kinds, file states and link targets when rendering
    pub annotate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: None,
            color: true,
            annotate: false,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: Option<PathBuf>,
    pub color: Option<bool>,
    pub annotate: Option<bool>,
}

/// Get the XDG config directory for nodetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nodetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("nodetree.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: overlay.layout.clone().or_else(|| self.layout.clone()),
            color: overlay.color.unwrap_or(self.color),
            annotate: overlay.annotate.unwrap_or(self.annotate),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; unlike the global
    ///   file it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), config_file, None)
    }

    /// Load settings from explicit layers.
    ///
    /// # Arguments
    /// * `global_file` - Global config; skipped when it does not exist
    /// * `config_file` - Explicit config file; must exist
    /// * `env` - Variables to read instead of the process environment
    pub fn load_layers(
        global_file: Option<&Path>,
        config_file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_file.filter(|p| p.exists()) {
            debug!(path = %global_path.display(), "loading global config");
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current, env)?;
        current.layout = current.layout.as_deref().map(expand_path);
        Ok(current)
    }

    /// Apply NODETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("NODETREE")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("layout") {
            settings.layout = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }
        if let Ok(val) = config.get_bool("annotate") {
            settings.annotate = val;
        }
        Ok(settings)
    }

    /// Render as TOML for `nodetree config`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_partial_overlay_when_merged_then_unspecified_fields_kept() {
        let base = Settings::default();
        let overlay = RawSettings {
            annotate: Some(true),
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);
        assert!(merged.annotate);
        assert!(merged.color);
        assert_eq!(merged.layout, None);
    }

    #[test]
    fn given_tilde_path_when_expanded_then_home_prefixed() {
        let expanded = expand_path(Path::new("~/layout.toml"));
        if let Some(dirs) = directories::BaseDirs::new() {
            assert_eq!(expanded, dirs.home_dir().join("layout.toml"));
        }
    }

    #[test]
    fn given_plain_path_when_expanded_then_unchanged() {
        let path = Path::new("/srv/trees/layout.toml");
        assert_eq!(expand_path(path), path);
    }
}
