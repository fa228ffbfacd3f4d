//! User configuration for revmark.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/revmark/config.toml` (falling
//! back to `~/.config/revmark/config.toml`). Config errors are soft failures:
//! a missing file means defaults, a malformed file means defaults plus a
//! warning — startup never aborts over configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How often an automatic action runs: on its trigger, or only on request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Act on the trigger itself (page ready for open, every change for save).
    #[default]
    Auto,
    /// Act only on an explicit user request.
    Manual,
}

/// All user-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// When to load annotations out of the review field.
    pub open_frequency: Frequency,
    /// When to persist Presentation changes back into the field.
    pub save_frequency: Frequency,
    /// Display locale handed to the host's localization lookup.
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            open_frequency: Frequency::Auto,
            save_frequency: Frequency::Auto,
            language: "en".to_owned(),
        }
    }
}

/// Returns the path to the revmark config file.
///
/// Prefers `$XDG_CONFIG_HOME/revmark/config.toml`; falls back to
/// `~/.config/revmark/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("revmark").join("config.toml")
}

impl Config {
    /// Loads the config file, defaulting on any failure.
    ///
    /// A missing file is the common case and stays silent; a file that exists
    /// but fails to parse is logged at warn and ignored. Never panics.
    pub fn load() -> Self {
        let path = config_path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "config parse error, using defaults");
                Self::default()
            }
        }
    }
}
