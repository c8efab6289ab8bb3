use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the configuration or the API credential.
///
/// Every variant is fatal at startup: without a credential no request can be
/// authorized, so the process exits before the window is shown.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub openai: OpenAiConfig,
}

/// The `openai` section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Path to a file whose entire contents are the API key.
    pub api_key_file: PathBuf,
}

impl Config {
    /// Default location of the config file under the user's config directory.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("polyglot")
            .join("config.json")
    }

    /// Load the configuration from its default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file(Self::path())
    }

    /// Load the configuration from an explicit path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read the API credential from the secret file named by the config.
    ///
    /// The whole file is the token; surrounding whitespace (typically a
    /// trailing newline) is not part of it.
    pub fn load_credential(&self) -> Result<String, ConfigError> {
        let path = &self.openai.api_key_file;
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.clone(),
            source,
        })?;
        Ok(raw.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, secret_contents: &str) -> PathBuf {
        let secret_path = dir.path().join("api_key.txt");
        let mut secret = fs::File::create(&secret_path).unwrap();
        write!(secret, "{}", secret_contents).unwrap();

        let config_path = dir.path().join("config.json");
        let json = serde_json::json!({
            "openai": { "api_key_file": secret_path }
        });
        fs::write(&config_path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
        config_path
    }

    #[test]
    fn credential_is_secret_file_contents() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "X");

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.load_credential().unwrap(), "X");
    }

    #[test]
    fn credential_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "sk-test-token\n");

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.load_credential().unwrap(), "sk-test-token");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::from_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "not json").unwrap();

        let result = Config::from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn missing_secret_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let json = serde_json::json!({
            "openai": { "api_key_file": dir.path().join("gone.txt") }
        });
        fs::write(&config_path, json.to_string()).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert!(matches!(
            config.load_credential(),
            Err(ConfigError::Unreadable { .. })
        ));
    }
}
