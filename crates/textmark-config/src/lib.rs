use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// One display frame at 60Hz, rounded down.
pub const DEFAULT_NOTIFY_DELAY_MS: u64 = 1000 / 60;

/// Flags applied to literal text queries when the caller gives none.
pub const DEFAULT_LITERAL_FLAGS: &str = "gi";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Tunables for the text addressing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiet period before the marker index reports a burst of changes.
    pub notify_delay_ms: u64,
    /// Pattern flags used to compile literal text queries.
    pub literal_flags: String,
    /// Match any whitespace run where a literal query has whitespace.
    pub collapse_whitespace: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            notify_delay_ms: DEFAULT_NOTIFY_DELAY_MS,
            literal_flags: DEFAULT_LITERAL_FLAGS.to_string(),
            collapse_whitespace: true,
        }
    }
}

impl EngineConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: EngineConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    /// Load from `config_path`, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn notify_delay(&self) -> Duration {
        Duration::from_millis(self.notify_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.notify_delay_ms, 16);
        assert_eq!(config.literal_flags, "gi");
        assert!(config.collapse_whitespace);
        assert_eq!(config.notify_delay(), Duration::from_millis(16));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = EngineConfig {
            notify_delay_ms: 50,
            literal_flags: "g".to_string(),
            collapse_whitespace: false,
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: EngineConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EngineConfig = toml::from_str("notify_delay_ms = 100\n").unwrap();

        assert_eq!(config.notify_delay_ms, 100);
        assert_eq!(config.literal_flags, DEFAULT_LITERAL_FLAGS);
        assert!(config.collapse_whitespace);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = EngineConfig::load_from_path(&non_existent_config).unwrap();
        assert!(result.is_none());

        let fallback = EngineConfig::load_or_default(&non_existent_config).unwrap();
        assert_eq!(fallback, EngineConfig::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("textmark.toml");
        let test_config = EngineConfig {
            notify_delay_ms: 5,
            ..EngineConfig::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = EngineConfig::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("broken.toml");
        std::fs::write(&config_file, "notify_delay_ms = \"soon\"").unwrap();

        let err = EngineConfig::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
