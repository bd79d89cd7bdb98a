use crate::session::resolve_path;
use crate::viewport::DEFAULT_TAB_WIDTH;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_LOG_FILE: &str = "~/.pine.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config format in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings read from `config.toml`; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_width: usize,
    pub show_hidden: bool,
    pub log_file: String,
    /// Set from the command line only.
    #[serde(skip)]
    pub debug: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            show_hidden: false,
            log_file: DEFAULT_LOG_FILE.to_string(),
            debug: false,
        }
    }
}

impl EditorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        if !(1..=16).contains(&config.tab_width) {
            return Err(ConfigError::Invalid {
                key: "tab_width",
                reason: format!("{} is not between 1 and 16", config.tab_width),
            });
        }
        Ok(config)
    }

    /// Load the first config file found, or the defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match find_config_file() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Absolute location of the log file.
    pub fn log_path(&self) -> PathBuf {
        resolve_path(Path::new(&self.log_file))
    }
}

pub fn get_config_dir() -> PathBuf {
    let config_home = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    config_home.join("pine")
}

pub fn find_config_file() -> Option<PathBuf> {
    let mut paths = vec![get_config_dir().join("config.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".pine").join("config.toml"));
    }
    paths.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.tab_width, 4);
        assert!(!config.show_hidden);
        assert_eq!(config.log_file, "~/.pine.log");
        assert!(!config.debug);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = EditorConfig::from_toml("show_hidden = true\n").unwrap();
        assert!(config.show_hidden);
        assert_eq!(config.tab_width, 4);
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tab_width = 8\nlog_file = \"/tmp/pine-test.log\"\n").unwrap();
        let config = EditorConfig::from_file(&path).unwrap();
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pine-test.log"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tab_width = \"wide\"").unwrap();
        match EditorConfig::from_file(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = EditorConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_zero_tab_width_rejected() {
        let err = EditorConfig::from_toml("tab_width = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "tab_width", .. }));
    }

    #[test]
    fn test_config_dir_is_named_after_editor() {
        assert!(get_config_dir().ends_with("pine"));
    }
}
