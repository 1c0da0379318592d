//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.heartchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::composer::DEFAULT_MAX_CHARS;
use crate::core::history::DEFAULT_REPLAY_LIMIT;
use crate::exchange::DEFAULT_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HeartchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub endpoint: Option<String>,
    pub max_draft_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    pub persist: Option<bool>,
    pub file: Option<String>,
    pub replay_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EffectsConfig {
    pub enabled: Option<bool>,
}

const DEFAULT_HISTORY_FILE: &str = "history.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub max_draft_chars: usize,
    pub persist_history: bool,
    pub history_path: PathBuf,
    pub replay_limit: usize,
    pub effects_enabled: bool,
}

/// Overrides taken from the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub history_file: Option<PathBuf>,
    pub no_persist: bool,
    pub no_effects: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.heartchat/`.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".heartchat"))
}

/// Returns the path to `~/.heartchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.heartchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HeartchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<HeartchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HeartchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HeartchatConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<HeartchatConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HeartchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# heartchat configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# endpoint = "http://localhost:5000"   # Or set HEARTCHAT_ENDPOINT
# max_draft_chars = 1000

# [history]
# persist = true                       # Or set HEARTCHAT_PERSIST=false
# file = "history.json"                # Relative to ~/.heartchat/
# replay_limit = 5

# [effects]
# enabled = true
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Parses the usual spellings of a boolean env var.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &HeartchatConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| std::env::var("HEARTCHAT_ENDPOINT").ok())
        .or_else(|| config.general.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Persistence: CLI off-switch → env → config → default (on)
    let persist_history = !cli.no_persist
        && std::env::var("HEARTCHAT_PERSIST")
            .ok()
            .and_then(|v| parse_bool(&v))
            .or(config.history.persist)
            .unwrap_or(true);

    // History file: CLI path as given, config path relative to ~/.heartchat/
    let history_path = cli.history_file.clone().unwrap_or_else(|| {
        let file = config
            .history
            .file
            .as_deref()
            .unwrap_or(DEFAULT_HISTORY_FILE);
        match data_dir() {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    });

    ResolvedConfig {
        endpoint,
        max_draft_chars: config
            .general
            .max_draft_chars
            .unwrap_or(DEFAULT_MAX_CHARS),
        persist_history,
        history_path,
        replay_limit: config
            .history
            .replay_limit
            .unwrap_or(DEFAULT_REPLAY_LIMIT),
        effects_enabled: !cli.no_effects && config.effects.enabled.unwrap_or(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = HeartchatConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.max_draft_chars, DEFAULT_MAX_CHARS);
        assert_eq!(resolved.replay_limit, DEFAULT_REPLAY_LIMIT);
        assert!(resolved.effects_enabled);
        assert!(resolved.history_path.ends_with("history.json"));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = HeartchatConfig {
            general: GeneralConfig {
                endpoint: None,
                max_draft_chars: Some(200),
            },
            history: HistoryConfig {
                persist: None,
                file: Some("chats.json".to_string()),
                replay_limit: Some(3),
            },
            effects: EffectsConfig {
                enabled: Some(false),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.max_draft_chars, 200);
        assert_eq!(resolved.replay_limit, 3);
        assert!(!resolved.effects_enabled);
        assert!(resolved.history_path.ends_with("chats.json"));
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = HeartchatConfig {
            general: GeneralConfig {
                endpoint: Some("http://config:1".to_string()),
                ..Default::default()
            },
            history: HistoryConfig {
                persist: Some(true),
                ..Default::default()
            },
            effects: EffectsConfig {
                enabled: Some(true),
            },
        };
        let cli = CliOverrides {
            endpoint: Some("http://cli:2".to_string()),
            history_file: Some(PathBuf::from("/tmp/h.json")),
            no_persist: true,
            no_effects: true,
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.endpoint, "http://cli:2");
        assert_eq!(resolved.history_path, PathBuf::from("/tmp/h.json"));
        assert!(!resolved.persist_history);
        assert!(!resolved.effects_enabled);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
endpoint = "http://192.168.1.20:5000"
max_draft_chars = 500

[history]
persist = false
file = "other.json"
replay_limit = 10

[effects]
enabled = false
"#;
        let config: HeartchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.general.endpoint.as_deref(),
            Some("http://192.168.1.20:5000")
        );
        assert_eq!(config.general.max_draft_chars, Some(500));
        assert_eq!(config.history.persist, Some(false));
        assert_eq!(config.history.replay_limit, Some(10));
        assert_eq!(config.effects.enabled, Some(false));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[history]
replay_limit = 2
"#;
        let config: HeartchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.history.replay_limit, Some(2));
        assert!(config.general.endpoint.is_none());
        assert!(config.effects.enabled.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\nendpoint = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_bool_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
