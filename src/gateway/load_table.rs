//! # Table-Load Endpoint
//!
//! `POST /cargatabla`: dump a table, optionally filtered, ordered and
//! paginated. The filter arrives either as a free predicate string (which
//! may carry trailing `ORDER BY` / `LIMIT` / `OFFSET`) or as a structured
//! `campo`/`operador`/`valor` triple.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::engine::AccessEngine;
use crate::sql::compile::{build_table_select, extract_limit_offset, normalize_order_by,
    split_order_by, TableSelect};
use crate::sql::predicate::build_structured_predicate;
use crate::sql::sanitize::sanitize_identifier;
use crate::sql::SqlResult;

use super::envelope::{parse_body, QueryReply, TableLoadBody};
use super::server::GatewayState;

pub async fn handle(State(state): State<Arc<GatewayState>>, body: Bytes) -> Json<QueryReply> {
    Json(respond(state.engine.as_ref(), &body))
}

fn respond(engine: &dyn AccessEngine, raw: &[u8]) -> QueryReply {
    let Some(body) = parse_body::<TableLoadBody>(raw) else {
        return QueryReply::ko();
    };
    let Some(table) = body.tabla.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return QueryReply::ko();
    };
    let Ok(table) = sanitize_identifier(table) else {
        return QueryReply::ko();
    };

    let sql = match compile(&table, &body) {
        Ok(sql) => sql,
        Err(_) => return QueryReply::ko(),
    };

    match engine.execute_query(&sql) {
        Ok(rows) if !rows.is_empty() => QueryReply::ok(&rows),
        _ => QueryReply::ko(),
    }
}

/// Assemble the full clause, peel pagination and ordering off it, and emit
/// the Access SELECT.
fn compile(table: &str, body: &TableLoadBody) -> SqlResult<String> {
    let clause = build_clause(body)?;

    // Pagination is anchored at the end of the complete clause, so it must
    // come off before the ORDER BY split.
    let (clause, limit, offset) = extract_limit_offset(&clause);
    let (predicate, order_in_clause) = split_order_by(&clause);

    // An order embedded in the clause wins over the body's orderBy field.
    let order_by = order_in_clause.or_else(|| normalize_order_by(body.order_by.as_deref()));

    build_table_select(&TableSelect {
        table,
        predicate: &predicate,
        order_by: order_by.as_deref(),
        limit,
        offset,
    })
}

/// The predicate source: free `filtro` verbatim, else the structured
/// triple, else empty (full dump).
fn build_clause(body: &TableLoadBody) -> SqlResult<String> {
    if let Some(filtro) = body.filtro.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        return Ok(filtro.to_string());
    }

    let campo = body.campo.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let operador = body.operador.as_deref().map(str::trim).filter(|o| !o.is_empty());
    match (campo, operador) {
        (Some(campo), Some(operador)) => {
            build_structured_predicate(campo, operador, body.valor.as_deref())
        }
        _ => Ok(String::new()),
    }
}
