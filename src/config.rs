//! # Gateway Configuration
//!
//! JSON configuration file with defaults for everything except the
//! database path. The path is validated once at startup; a missing file is
//! fatal, not a per-request condition.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("database file not found: {0}")]
    DatabaseMissing(PathBuf),
}

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Absolute path to the Access database file (required)
    pub database_path: PathBuf,

    /// Host to bind to (default: "127.0.0.1", local clients only)
    #[serde(default = "default_host")]
    pub host: String,

    /// Preferred port to bind to (default: 5137)
    #[serde(default = "default_port")]
    pub port: u16,

    /// How many successive ports to try when the preferred one is taken
    /// (default: 20)
    #[serde(default = "default_port_attempts")]
    pub port_attempts: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5137
}

fn default_port_attempts() -> u16 {
    20
}

impl GatewayConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GatewayConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configured database file exists. The path is immutable for
    /// the life of the gateway, so this runs once, at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database_path.is_file() {
            return Err(ConfigError::DatabaseMissing(self.database_path.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("accbridge.json");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(json.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("empresa.accdb");
        fs::File::create(&db).unwrap();

        let json = format!(r#"{{"database_path": {:?}}}"#, db.to_str().unwrap());
        let path = write_config(&dir, &json);

        let config = GatewayConfig::load(&path).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5137);
        assert_eq!(config.port_attempts, 20);
        assert_eq!(config.database_path, db);
    }

    #[test]
    fn missing_database_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{"database_path": "/nonexistent/empresa.accdb"}"#;
        let path = write_config(&dir, json);

        assert!(matches!(
            GatewayConfig::load(&path),
            Err(ConfigError::DatabaseMissing(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{not json");
        assert!(matches!(
            GatewayConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            GatewayConfig::load(Path::new("/nonexistent/accbridge.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
