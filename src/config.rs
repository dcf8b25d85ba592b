//! Persistent tool configuration
//!
//! Generation defaults loaded from a TOML file under the user config
//! directory. Every field mirrors a CLI flag, so authors can pin their
//! preferred settings per machine and override them per invocation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::snd::generate::CannedSound;

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationSettings,
}

/// Defaults applied to `generate` runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// FMOD event path used for every manipulator-derived entry
    #[serde(default = "default_event_name")]
    pub event_name: String,

    /// Root segment substituted for `/aircraft` in event paths
    #[serde(default = "default_root_category")]
    pub root_category: String,

    /// Emit EVENT_CMND_HOLD_CUE triggers instead of EVENT_CMND_UP
    #[serde(default)]
    pub use_hold_cue: bool,

    /// Follow each manipulator entry with a release-triggered duplicate
    #[serde(default)]
    pub duplicate_for_release: bool,

    /// Canned library blocks included in generated documents
    #[serde(default)]
    pub canned: Vec<CannedSound>,

    /// Manipulator kinds excluded before generation
    #[serde(default = "default_excluded_kinds")]
    pub exclude_manip_kinds: Vec<String>,

    /// Default output filename for generated documents
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

fn default_event_name() -> String {
    "/aircraft/generic/switch".to_string()
}

fn default_root_category() -> String {
    "aircraft".to_string()
}

fn default_excluded_kinds() -> Vec<String> {
    vec!["noop".to_string()]
}

fn default_output_name() -> String {
    "output.snd".to_string()
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            event_name: default_event_name(),
            root_category: default_root_category(),
            use_hold_cue: false,
            duplicate_for_release: false,
            canned: Vec::new(),
            exclude_manip_kinds: default_excluded_kinds(),
            output_name: default_output_name(),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Load configuration from the TOML file, creating a default file on
    /// first run. Parse failures are errors: a broken file is preserved
    /// for the user to fix rather than silently overwritten.
    pub fn load() -> Result<Self> {
        let config_path = Self::path();

        if !config_path.exists() {
            info!(path = %config_path.display(), "config file not found, creating default");
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config from {config_path:?}"))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse TOML from {config_path:?}"))?;

        config.generation.validate_and_clamp();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {parent:?}"))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("failed to serialize config to TOML")?;

        fs::write(&config_path, toml_string)
            .with_context(|| format!("failed to write config to {config_path:?}"))?;

        info!(path = %config_path.display(), "saved config");
        Ok(())
    }
}

impl GenerationSettings {
    /// Repair values a hand-edited file may have broken. Called after
    /// every load; never fatal.
    pub fn validate_and_clamp(&mut self) {
        if !self.event_name.starts_with('/') {
            warn!(event_name = %self.event_name, "event_name must start with '/', prepending");
            self.event_name.insert(0, '/');
        }

        let trimmed = self.root_category.trim().trim_matches('/').to_string();
        if trimmed.is_empty() {
            warn!("root_category is empty, using default");
            self.root_category = default_root_category();
        } else if trimmed != self.root_category {
            warn!(root_category = %self.root_category, "stripping '/' from root_category");
            self.root_category = trimmed;
        }

        if self.output_name.trim().is_empty() {
            warn!("output_name is empty, using default");
            self.output_name = default_output_name();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.event_name, "/aircraft/generic/switch");
        assert_eq!(settings.root_category, "aircraft");
        assert!(!settings.use_hold_cue);
        assert_eq!(settings.exclude_manip_kinds, vec!["noop"]);
        assert_eq!(settings.output_name, "output.snd");
    }

    #[test]
    fn test_validate_prepends_slash_to_event_name() {
        let mut settings = GenerationSettings::default();
        settings.event_name = "aircraft/custom".to_string();
        settings.validate_and_clamp();
        assert_eq!(settings.event_name, "/aircraft/custom");
    }

    #[test]
    fn test_validate_repairs_root_category() {
        let mut settings = GenerationSettings::default();
        settings.root_category = "/fleet/".to_string();
        settings.validate_and_clamp();
        assert_eq!(settings.root_category, "fleet");

        settings.root_category = "  ".to_string();
        settings.validate_and_clamp();
        assert_eq!(settings.root_category, "aircraft");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("[generation]\nuse_hold_cue = true\n").unwrap();
        assert!(config.generation.use_hold_cue);
        assert_eq!(config.generation.event_name, "/aircraft/generic/switch");
        assert_eq!(config.generation.output_name, "output.snd");
    }

    #[test]
    fn test_canned_sounds_roundtrip_through_toml() {
        let mut config = Config::default();
        config.generation.canned = vec![CannedSound::Engine, CannedSound::GroundRoll];

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("ground_roll"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.generation.canned, config.generation.canned);
    }
}
