//! Session settings and configuration persistence
//!
//! Settings live for the process lifetime and are mutated only through
//! explicit update calls ([`SettingsPatch`]). The CLI optionally persists
//! them as TOML between runs; the core never touches disk on its own.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::Language;

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clawlink")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Compiled-in default gateway address: the well-known local loopback
/// port the OpenClaw gateway listens on.
pub const DEFAULT_GATEWAY_URL: &str = "ws://127.0.0.1:18789/ws";

/// Which gateway the client should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// The loopback gateway on this machine; credential optional
    Local,
    /// An explicitly configured address; credential required
    Remote,
}

impl std::str::FromStr for ConnectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(ConnectionMode::Local),
            "remote" => Ok(ConnectionMode::Remote),
            other => Err(format!("unknown mode '{other}' (expected 'local' or 'remote')")),
        }
    }
}

/// Connection and display settings for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Local or remote gateway
    pub mode: ConnectionMode,
    /// Protocol-qualified gateway address (used in remote mode)
    pub gateway_url: String,
    /// Opaque auth credential; may be empty
    pub api_token: String,
    /// Display language for log text
    pub language: Language,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: ConnectionMode::Local,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            api_token: String::new(),
            language: Language::En,
        }
    }
}

/// Partial settings update: only the present fields are replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    /// New connection mode, if changing
    pub mode: Option<ConnectionMode>,
    /// New gateway address, if changing
    pub gateway_url: Option<String>,
    /// New credential, if changing
    pub api_token: Option<String>,
    /// New display language, if changing
    pub language: Option<Language>,
}

impl SessionSettings {
    /// Shallow-merge a patch into these settings.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(gateway_url) = patch.gateway_url {
            self.gateway_url = gateway_url;
        }
        if let Some(api_token) = patch.api_token {
            self.api_token = api_token;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
    }
}

/// Load settings from a TOML file
pub fn load_settings(path: &Path) -> Result<SessionSettings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let settings: SessionSettings = toml::from_str(&content)?;
    Ok(settings)
}

/// Save settings to a TOML file
pub fn save_settings(path: &Path, settings: &SessionSettings) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(settings)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create config dir: {}", e)))?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write config: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_loopback_gateway() {
        let settings = SessionSettings::default();
        assert_eq!(settings.mode, ConnectionMode::Local);
        assert_eq!(settings.gateway_url, DEFAULT_GATEWAY_URL);
        assert!(settings.api_token.is_empty());
    }

    #[test]
    fn test_patch_is_shallow_merge() {
        let mut settings = SessionSettings::default();
        settings.apply(SettingsPatch {
            api_token: Some("t0ken".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.api_token, "t0ken");
        // Untouched fields keep their values.
        assert_eq!(settings.mode, ConnectionMode::Local);
        assert_eq!(settings.gateway_url, DEFAULT_GATEWAY_URL);
    }

    #[test]
    fn test_settings_roundtrip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clawlink.toml");

        let mut settings = SessionSettings::default();
        settings.apply(SettingsPatch {
            mode: Some(ConnectionMode::Remote),
            gateway_url: Some("wss://gateway.example.com/ws".to_string()),
            api_token: Some("abc".to_string()),
            language: Some(Language::Zh),
        });

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
