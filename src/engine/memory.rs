//! # In-Memory Engine
//!
//! Scripted engine for tests: statements are matched by exact text against
//! results registered up front, and every executed statement is logged for
//! assertions. In production, use the ODBC engine.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{AccessEngine, EngineError, EngineResult, Row};

/// Scripted statement → result engine.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    queries: RwLock<HashMap<String, Vec<Row>>>,
    writes: RwLock<HashMap<String, usize>>,
    executed: RwLock<Vec<String>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rows a SELECT statement returns.
    pub fn script_query(&self, sql: impl Into<String>, rows: Vec<Row>) {
        if let Ok(mut queries) = self.queries.write() {
            queries.insert(sql.into(), rows);
        }
    }

    /// Register the affected-row count a write statement reports.
    pub fn script_write(&self, sql: impl Into<String>, affected: usize) {
        if let Ok(mut writes) = self.writes.write() {
            writes.insert(sql.into(), affected);
        }
    }

    /// Every statement executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.read().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, sql: &str) -> EngineResult<()> {
        self.executed
            .write()
            .map_err(|_| EngineError::Execution("lock poisoned".to_string()))?
            .push(sql.to_string());
        Ok(())
    }
}

impl AccessEngine for MemoryEngine {
    fn execute_query(&self, sql: &str) -> EngineResult<Vec<Row>> {
        self.record(sql)?;
        self.queries
            .read()
            .map_err(|_| EngineError::Execution("lock poisoned".to_string()))?
            .get(sql)
            .cloned()
            .ok_or_else(|| EngineError::Execution(format!("no scripted result for: {sql}")))
    }

    fn execute_non_query(&self, sql: &str) -> EngineResult<usize> {
        self.record(sql)?;
        self.writes
            .read()
            .map_err(|_| EngineError::Execution("lock poisoned".to_string()))?
            .get(sql)
            .copied()
            .ok_or_else(|| EngineError::Execution(format!("no scripted result for: {sql}")))
    }
}
