//! # Database Access Layer
//!
//! One trait, two implementations: the Windows ODBC engine that talks to
//! the real Access drivers, and a scripted in-memory engine for tests.
//! Connections live for exactly one statement; pooling, if any, belongs to
//! the driver underneath.

pub mod memory;
#[cfg(windows)]
pub mod odbc;
mod row;

pub use memory::MemoryEngine;
#[cfg(windows)]
pub use odbc::OdbcEngine;
pub use row::{Row, SqlValue};

use thiserror::Error;

use crate::observability::Logger;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by an engine implementation
#[derive(Debug, Error)]
pub enum EngineError {
    /// The driver/provider itself could not be set up or reached
    #[error("provider unavailable: {0}")]
    Provider(String),

    /// The statement was rejected or failed mid-execution
    #[error("statement execution failed: {0}")]
    Execution(String),
}

/// Executes compiled statements against the configured database file.
///
/// Callers fold every error into their soft-failure envelope; nothing here
/// is expected to reach the HTTP layer as a fault.
pub trait AccessEngine: Send + Sync {
    /// Run a SELECT and materialize the full result set.
    fn execute_query(&self, sql: &str) -> EngineResult<Vec<Row>>;

    /// Run an INSERT/UPDATE and report the affected-row count.
    fn execute_non_query(&self, sql: &str) -> EngineResult<usize>;
}

/// Run `primary`, and on failure retry exactly once with `fallback`.
///
/// The second provider's error wins when both fail; the first is only
/// logged. This mirrors the preferred/legacy Access driver pair.
pub fn with_provider_fallback<T>(
    primary: impl FnOnce() -> EngineResult<T>,
    fallback: impl FnOnce() -> EngineResult<T>,
) -> EngineResult<T> {
    primary().or_else(|first| {
        Logger::warn("provider_fallback", &[("error", &first.to_string())]);
        fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fallback_not_consulted_on_success() {
        let fallback_hit = Cell::new(false);
        let out = with_provider_fallback(
            || Ok(1),
            || {
                fallback_hit.set(true);
                Ok(2)
            },
        );
        assert_eq!(out.unwrap(), 1);
        assert!(!fallback_hit.get());
    }

    #[test]
    fn fallback_runs_once_after_primary_failure() {
        let calls = Cell::new(0u32);
        let out = with_provider_fallback(
            || Err(EngineError::Provider("ace 16 missing".into())),
            || {
                calls.set(calls.get() + 1);
                Ok(7)
            },
        );
        assert_eq!(out.unwrap(), 7);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn second_error_is_surfaced() {
        let out: EngineResult<()> = with_provider_fallback(
            || Err(EngineError::Provider("ace 16 missing".into())),
            || Err(EngineError::Execution("table not found".into())),
        );
        assert!(matches!(out, Err(EngineError::Execution(_))));
    }
}
