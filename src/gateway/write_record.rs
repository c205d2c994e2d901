//! # Insert Endpoint
//!
//! `POST /escribirregistro`: insert one record. Every `registro` element is
//! a column/value pair; the insert succeeds only when the engine reports at
//! least one affected row.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::engine::AccessEngine;
use crate::sql::literal::Literal;
use crate::sql::sanitize::sanitize_identifier;

use super::envelope::{parse_body, RecordBody, WriteReply};
use super::server::GatewayState;

pub async fn handle(State(state): State<Arc<GatewayState>>, body: Bytes) -> Json<WriteReply> {
    Json(respond(state.engine.as_ref(), &body))
}

fn respond(engine: &dyn AccessEngine, raw: &[u8]) -> WriteReply {
    let Some(body) = parse_body::<RecordBody>(raw) else {
        return WriteReply::ko();
    };
    let Some(table) = body.tabla.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return WriteReply::ko();
    };
    let Ok(table) = sanitize_identifier(table) else {
        return WriteReply::ko();
    };
    let Some(registro) = body.registro.filter(|r| !r.is_empty()) else {
        return WriteReply::ko();
    };

    let mut columns = Vec::with_capacity(registro.len());
    let mut values = Vec::with_capacity(registro.len());
    for field in &registro {
        let Some(columna) = field.columna.as_deref().map(str::trim).filter(|c| !c.is_empty())
        else {
            return WriteReply::ko();
        };
        let Ok(column) = sanitize_identifier(columna) else {
            return WriteReply::ko();
        };
        columns.push(format!("[{column}]"));
        values.push(Literal::from_json(&field.dato).format());
    }

    let sql = format!(
        "INSERT INTO [{table}] ({}) VALUES ({})",
        columns.join(", "),
        values.join(", ")
    );

    match engine.execute_non_query(&sql) {
        Ok(affected) if affected > 0 => WriteReply::ok(),
        _ => WriteReply::ko(),
    }
}
