//! Configuration file handling.
//!
//! The config file is optional. It lives at `$GHCLONE_CONFIG` if set,
//! otherwise at:
//! - Linux: `~/.config/ghclone/config.json`
//! - macOS: `~/Library/Application Support/ghclone/config.json`
//! - Windows: `C:\Users\<user>\AppData\Roaming\ghclone\config.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "GHCLONE_CONFIG";

const DEFAULT_WORKERS: usize = 4;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of clone worker threads.
    pub workers: usize,
    /// Git binary used for cloning.
    pub git_path: String,
    /// Preferred clone location. Overrides the git config preference.
    pub clone_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            git_path: "git".to_string(),
            clone_path: None,
        }
    }
}

impl Config {
    /// Where the config file is looked up.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("ghclone")
            .join("config.json")
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.workers, 4);
        assert_eq!(config.git_path, "git");
        assert_eq!(config.clone_path, None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"clone_path": "%USERPROFILE%/source/repos"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.clone_path.as_deref(),
            Some("%USERPROFILE%/source/repos")
        );
        assert_eq!(config.workers, 4);
        assert_eq!(config.git_path, "git");
    }

    #[test]
    fn test_full_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"workers": 2, "git_path": "/usr/bin/git", "clone_path": null}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config,
            Config {
                workers: 2,
                git_path: "/usr/bin/git".to_string(),
                clone_path: None,
            }
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"workers": 3, "queue_size": 8}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_directory_instead_of_file_is_io_error() {
        let temp_dir = tempdir().unwrap();

        let result = Config::load_from(temp_dir.path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            clone_path: Some("/srv/repos".to_string()),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
