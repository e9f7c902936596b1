use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "payroll-sort.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

/// Where the Transformer reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("csv/201809_Remuneracao.csv"),
            dest_path: PathBuf::from("csv/201809_RemuneracaoParsed.csv"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn new(source_path: impl Into<PathBuf>, dest_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            dest_path: dest_path.into(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> crate::utils::errors::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::utils::errors::PayrollSortError::ConfigError(format!("{}: {}", path, e))
        })?;
        toml::from_str(&content).map_err(|e| {
            crate::utils::errors::PayrollSortError::ConfigError(format!("{}: {}", path, e))
        })
    }

    pub fn load_or_default(path: Option<&str>) -> Self {
        if let Some(p) = path {
            Self::load_from_file(p).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ErrorKind;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[paths]\nsource_path = \"in/payroll.csv\"").unwrap();

        let config = AppConfig::load_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.paths.source_path, PathBuf::from("in/payroll.csv"));
        assert_eq!(
            config.paths.dest_path,
            PathBuf::from("csv/201809_RemuneracaoParsed.csv")
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[paths\nsource_path = ").unwrap();

        let err = AppConfig::load_from_file(file.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn load_or_default_ignores_missing_file() {
        let config = AppConfig::load_or_default(Some("does/not/exist.toml"));
        assert_eq!(config.paths, PathsConfig::default());
        assert_eq!(AppConfig::load_or_default(None).paths, PathsConfig::default());
    }
}
