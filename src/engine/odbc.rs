//! # ODBC Engine
//!
//! Production access layer: talks to the Access ODBC drivers on Windows.
//! Each statement opens a fresh connection; the preferred ACE driver is
//! tried first and the legacy Jet driver once on any failure. Column names
//! and types are read from result-set metadata before the row walk.

use std::path::{Path, PathBuf};

use odbc_api::{Connection, ConnectionOptions, Cursor, DataType, Environment, ResultSetMetadata};

use super::{with_provider_fallback, AccessEngine, EngineError, EngineResult, Row, SqlValue};

/// ACE driver shipped with current Office/Access runtimes.
const PREFERRED_DRIVER: &str = "Microsoft Access Driver (*.mdb, *.accdb)";

/// Legacy Jet driver, still present on installs without the ACE runtime.
const FALLBACK_DRIVER: &str = "Microsoft Access Driver (*.mdb)";

/// Engine backed by the Access ODBC drivers.
pub struct OdbcEngine {
    env: Environment,
    db_path: PathBuf,
}

impl OdbcEngine {
    /// Set up the ODBC environment for the given database file.
    pub fn new(db_path: impl AsRef<Path>) -> EngineResult<Self> {
        let env = Environment::new().map_err(|e| EngineError::Provider(e.to_string()))?;
        Ok(Self {
            env,
            db_path: db_path.as_ref().to_path_buf(),
        })
    }

    fn connection_string(&self, driver: &str) -> String {
        format!("Driver={{{}}};Dbq={};", driver, self.db_path.display())
    }

    fn connect(&self, driver: &str) -> Result<Connection<'_>, odbc_api::Error> {
        self.env.connect_with_connection_string(
            &self.connection_string(driver),
            ConnectionOptions::default(),
        )
    }

    fn run_query(&self, driver: &str, sql: &str) -> EngineResult<Vec<Row>> {
        self.run_query_inner(driver, sql)
            .map_err(|e| EngineError::Execution(e.to_string()))
    }

    fn run_query_inner(&self, driver: &str, sql: &str) -> Result<Vec<Row>, odbc_api::Error> {
        let conn = self.connect(driver)?;
        let mut rows = Vec::new();

        let Some(mut cursor) = conn.execute(sql, ())? else {
            return Ok(rows);
        };

        let col_count = cursor.num_result_cols()? as u16;
        let mut names = Vec::with_capacity(col_count as usize);
        let mut types = Vec::with_capacity(col_count as usize);
        for index in 1..=col_count {
            names.push(cursor.col_name(index)?);
            types.push(cursor.col_data_type(index)?);
        }

        let mut buf = Vec::new();
        while let Some(mut cursor_row) = cursor.next_row()? {
            let mut row = Row::new();
            for index in 1..=col_count {
                buf.clear();
                let present = cursor_row.get_text(index, &mut buf)?;
                let value = if present {
                    let text = String::from_utf8_lossy(&buf).into_owned();
                    typed_value(text, &types[(index - 1) as usize])
                } else {
                    SqlValue::Null
                };
                row.push(names[(index - 1) as usize].clone(), value);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn run_non_query(&self, driver: &str, sql: &str) -> EngineResult<usize> {
        self.run_non_query_inner(driver, sql)
            .map_err(|e| EngineError::Execution(e.to_string()))
    }

    fn run_non_query_inner(&self, driver: &str, sql: &str) -> Result<usize, odbc_api::Error> {
        let conn = self.connect(driver)?;
        let mut stmt = conn.preallocate()?;
        stmt.execute(sql, ())?;
        Ok(stmt.row_count()?.unwrap_or(0))
    }
}

/// Convert the driver's text rendition into the scalar the column type
/// declares. Unparseable values stay text rather than failing the row.
fn typed_value(text: String, data_type: &DataType) -> SqlValue {
    match data_type {
        DataType::TinyInt
        | DataType::SmallInt
        | DataType::Integer
        | DataType::BigInt => text.parse::<i64>().map(SqlValue::Int).unwrap_or(SqlValue::Text(text)),
        DataType::Real | DataType::Float { .. } | DataType::Double => text
            .parse::<f64>()
            .map(SqlValue::Float)
            .unwrap_or(SqlValue::Text(text)),
        DataType::Bit => match text.as_str() {
            "1" => SqlValue::Bool(true),
            "0" => SqlValue::Bool(false),
            _ => SqlValue::Text(text),
        },
        _ => SqlValue::Text(text),
    }
}

impl AccessEngine for OdbcEngine {
    fn execute_query(&self, sql: &str) -> EngineResult<Vec<Row>> {
        with_provider_fallback(
            || self.run_query(PREFERRED_DRIVER, sql),
            || self.run_query(FALLBACK_DRIVER, sql),
        )
    }

    fn execute_non_query(&self, sql: &str) -> EngineResult<usize> {
        with_provider_fallback(
            || self.run_non_query(PREFERRED_DRIVER, sql),
            || self.run_non_query(FALLBACK_DRIVER, sql),
        )
    }
}
