//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/skillkeep/config.toml)
//! 3. Environment variables (SKILLKEEP_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "SKILLKEEP";

/// Name of the primary document inside a skill directory
pub const SKILL_FILE: &str = "SKILL.md";

/// Auxiliary directories created next to the primary document
pub const AUX_DIRS: [&str; 2] = ["scripts", "references"];

/// Extension used for stored snapshots
pub const SNAPSHOT_EXTENSION: &str = "md";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding one subdirectory per skill
    #[serde(default = "default_skills_dir")]
    pub skills_dir: PathBuf,

    /// Root directory holding one snapshot directory per skill
    #[serde(default = "default_versions_dir")]
    pub versions_dir: PathBuf,

    /// Write debug logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skills_dir: default_skills_dir(),
            versions_dir: default_versions_dir(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SKILLKEEP_SKILLS_DIR, SKILLKEEP_VERSIONS_DIR, SKILLKEEP_LOG_FILE)
    /// 2. Config file (~/.config/skillkeep/config.toml or SKILLKEEP_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Build a configuration rooted at a single directory
    ///
    /// Skills live in `<root>/skills`, snapshots in `<root>/.skill-versions`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            skills_dir: root.join("skills"),
            versions_dir: root.join(".skill-versions"),
            log_file: None,
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_SKILLS_DIR", ENV_PREFIX)) {
            self.skills_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_VERSIONS_DIR", ENV_PREFIX)) {
            self.versions_dir = PathBuf::from(val);
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SKILLKEEP_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillkeep")
            .join("config.toml")
    }

    /// Directory holding a skill's current document and auxiliary directories
    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.skills_dir.join(name)
    }

    /// Path to a skill's current document
    pub fn skill_file(&self, name: &str) -> PathBuf {
        self.skill_dir(name).join(SKILL_FILE)
    }

    /// Directory holding a skill's snapshots
    pub fn version_dir(&self, name: &str) -> PathBuf {
        self.versions_dir.join(name)
    }
}

fn claude_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
}

/// Get the default skills directory
fn default_skills_dir() -> PathBuf {
    claude_home().join("skills")
}

/// Get the default snapshot directory
fn default_versions_dir() -> PathBuf {
    claude_home().join(".skill-versions")
}
