use crate::paths;
use log::LevelFilter;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
    #[error("rows_per_page must be at least 1")]
    RowsPerPage,
}

/// Settings read from `config.json`. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Directory holding `charges-data.json`. Defaults to the per-user data dir.
    pub data_dir: Option<PathBuf>,
    pub rows_per_page: usize,
    pub page_size_choices: Vec<usize>,
    pub striped_rows: bool,
    /// Shows the sort toolbar and enables the sort keys.
    pub sort_controls: bool,
    pub mouse: bool,
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            rows_per_page: 10,
            page_size_choices: vec![5, 10, 20, 50],
            striped_rows: true,
            sort_controls: false,
            mouse: true,
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the per-user config file, if the platform has one.
    pub fn load_default() -> Result<Self, ConfigError> {
        match paths::config_file() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows_per_page == 0 {
            return Err(ConfigError::RowsPerPage);
        }
        self.log_level().map(|_| ())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// Configured data directory, else the per-user one, else the working directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(paths::data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Page-size choices with `rows_per_page` included, sorted and without zeros.
    pub fn page_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self
            .page_size_choices
            .iter()
            .copied()
            .chain([self.rows_per_page])
            .filter(|n| *n > 0)
            .collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ConsoleConfig = serde_json::from_str(r#"{"rows_per_page": 5}"#).unwrap();
        assert_eq!(config.rows_per_page, 5);
        assert!(config.striped_rows);
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("charge-console-no-such-config.json");
        assert_eq!(ConsoleConfig::load(&path).unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn bad_values_are_rejected() {
        let config = ConsoleConfig {
            log_level: "chatty".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::LogLevel(_))));
        let config = ConsoleConfig {
            rows_per_page: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::RowsPerPage)));
    }

    #[test]
    fn page_sizes_include_rows_per_page() {
        let config = ConsoleConfig {
            rows_per_page: 15,
            page_size_choices: vec![20, 0, 5, 20],
            ..Default::default()
        };
        assert_eq!(config.page_sizes(), vec![5, 15, 20]);
    }
}
