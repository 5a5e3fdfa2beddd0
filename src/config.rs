//! Application configuration.
//!
//! Stored in `~/.config/termprof/config.yaml`. Every field has a default,
//! so a partial (or missing) file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up for the default profile when the state has none
pub const DEFAULT_PROFILE_FILE: &str = "Shell.profile";

const APP_DIR: &str = "termprof";

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_profile_dirs() -> Vec<PathBuf> {
    vec![default_data_dir().join("profiles")]
}

fn default_save_dir() -> PathBuf {
    default_data_dir().join("profiles")
}

fn default_state_file() -> PathBuf {
    default_data_dir().join("state.yaml")
}

fn default_profile_file() -> String {
    DEFAULT_PROFILE_FILE.to_string()
}

/// Where profiles are searched for and saved, and where registry state lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directories scanned for `*.profile` and `*.desktop` files, in order
    #[serde(default = "default_profile_dirs")]
    pub profile_dirs: Vec<PathBuf>,

    /// Directory new profile files are written to
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// File holding the default-profile and favorites slots
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Default profile file name used until one is chosen explicitly
    #[serde(default = "default_profile_file")]
    pub default_profile: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_dirs: default_profile_dirs(),
            save_dir: default_save_dir(),
            state_file: default_state_file(),
            default_profile: default_profile_file(),
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl Config {
    /// A config whose paths all live under `root`
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            profile_dirs: vec![root.join("profiles")],
            save_dir: root.join("profiles"),
            state_file: root.join("state.yaml"),
            default_profile: default_profile_file(),
        }
    }

    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;

        // Atomic save: write to temp file then rename
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)
            .with_context(|| format!("Failed to write config to {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join(APP_DIR)
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join(APP_DIR)
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Profile search directories with `~` expanded
    pub fn resolved_profile_dirs(&self) -> Vec<PathBuf> {
        self.profile_dirs.iter().map(|d| expand_home(d)).collect()
    }

    /// Save directory with `~` expanded
    pub fn resolved_save_dir(&self) -> PathBuf {
        expand_home(&self.save_dir)
    }

    /// State file with `~` expanded
    pub fn resolved_state_file(&self) -> PathBuf {
        expand_home(&self.state_file)
    }
}
