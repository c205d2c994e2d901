//! CLI command implementations
//!
//! `start` is the long-running path: load config, build the engine, bind
//! and serve. `check` and `explain` are one-shot helpers for operators.

use std::path::Path;
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::engine::AccessEngine;
use crate::gateway::Gateway;
use crate::observability::Logger;
use crate::sql::compile::rewrite_select;
use crate::sql::guard::check_select;

use super::errors::{CliError, CliResult};

/// Run the gateway until shutdown.
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = GatewayConfig::load(config_path).map_err(|e| fatal(CliError::from(e)))?;
    let engine = build_engine(&config).map_err(fatal)?;

    let runtime = tokio::runtime::Runtime::new().map_err(|e| fatal(CliError::Runtime(e)))?;
    runtime.block_on(async move {
        let bound = Gateway::new(config, engine)
            .bind()
            .await
            .map_err(|e| fatal(CliError::from(e)))?;
        bound.serve().await.map_err(CliError::from)
    })
}

/// Validate the configuration and database file.
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = GatewayConfig::load(config_path)?;
    println!(
        "configuration ok: database {} port {}",
        config.database_path.display(),
        config.port
    );
    Ok(())
}

/// Print the Access SQL a statement compiles to.
pub fn explain(statement: &str) -> CliResult<()> {
    check_select(statement)?;
    let sql = rewrite_select(statement.trim())?;
    println!("{sql}");
    Ok(())
}

#[cfg(windows)]
fn build_engine(config: &GatewayConfig) -> CliResult<Arc<dyn AccessEngine>> {
    use crate::engine::OdbcEngine;
    let engine = OdbcEngine::new(&config.database_path)?;
    Ok(Arc::new(engine))
}

#[cfg(not(windows))]
fn build_engine(_config: &GatewayConfig) -> CliResult<Arc<dyn AccessEngine>> {
    Err(CliError::UnsupportedPlatform)
}

/// Log a startup failure before handing the error back to main.
fn fatal(e: CliError) -> CliError {
    Logger::fatal("startup_failed", &[("error", &e.to_string())]);
    e
}
