//! CLI-specific error types
//!
//! Everything surfacing here ends the process with a non-zero exit.

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::gateway::GatewayError;
use crate::sql::SqlError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or validated
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The database engine could not be set up
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The gateway failed to bind or serve
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A statement handed to `explain` was rejected
    #[error("invalid statement: {0}")]
    Statement(#[from] SqlError),

    /// The async runtime could not be created
    #[error("runtime error: {0}")]
    Runtime(std::io::Error),

    /// This build carries no database driver for the current platform
    #[error("no Access driver available on this platform; the gateway runs on Windows")]
    UnsupportedPlatform,
}
