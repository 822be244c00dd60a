//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\soundscrape\config.toml
//! - macOS: ~/Library/Application Support/soundscrape/config.toml
//! - Linux: ~/.config/soundscrape/config.toml
//!
//! Every section is optional; missing keys fall back to defaults. Command-line
//! flags override what the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Public, read-only SoundCloud client identifier.
pub const DEFAULT_CLIENT_ID: &str = "22e566527758690e6feb2b5cb300cc43";

/// Identifier used for synthesized stream URLs.
pub const DEFAULT_FALLBACK_CLIENT_ID: &str = "b45b1aa10f1ac2941910a7f0d10f8e28";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Download engine settings
    pub download: DownloadConfig,
}

/// API credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Client identifier sent with every SoundCloud API call
    pub client_id: String,

    /// Identifier baked into best-effort stream URLs
    pub fallback_client_id: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            fallback_client_id: DEFAULT_FALLBACK_CLIENT_ID.to_string(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// SoundCloud API root, without a trailing slash
    pub soundcloud_api_base: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("soundscrape/", env!("CARGO_PKG_VERSION")).to_string(),
            soundcloud_api_base: "https://api.soundcloud.com".to_string(),
        }
    }
}

/// Download engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Bytes written per write/flush cycle
    pub chunk_size: usize,

    /// Whether to draw progress bars
    pub progress: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            progress: true,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("soundscrape"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the standard location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    load_from(&path)
}

/// Load configuration from an explicit path, with the same fallbacks as [`load`].
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the standard location.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to `path`, creating its directory if needed.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[http]"));
        assert!(toml.contains("[download]"));
        assert!(toml.contains(DEFAULT_CLIENT_ID));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[credentials]
client_id = "my-id"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.credentials.client_id, "my-id");
        assert_eq!(config.credentials.fallback_client_id, DEFAULT_FALLBACK_CLIENT_ID);
        assert_eq!(config.download.chunk_size, 1024);
        assert!(config.download.progress);
        assert_eq!(config.http.soundcloud_api_base, "https://api.soundcloud.com");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.credentials.client_id = "saved-id".to_string();
        config.download.progress = false;

        save_to(&config, &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_unparseable_file_falls_back_to_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[download\nchunk_size = ").unwrap();

        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = tempdir().unwrap();
        assert_eq!(load_from(&temp.path().join("absent.toml")), Config::default());
    }
}
