//! # Update Endpoint
//!
//! `POST /actualizarregistro`: update rows matched by an equality filter.
//! The first `registro` element is the filter (NULL-safe: a null `dato`
//! becomes `IS NULL`), the rest form the SET list, so at least two elements
//! are required.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::engine::AccessEngine;
use crate::sql::literal::Literal;
use crate::sql::sanitize::sanitize_identifier;

use super::envelope::{parse_body, RecordBody, RecordField, WriteReply};
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
    // One filter element plus at least one SET column.
    let Some(registro) = body.registro.filter(|r| r.len() >= 2) else {
        return WriteReply::ko();
    };

    let Some(where_clause) = build_where_eq(&registro[0]) else {
        return WriteReply::ko();
    };

    let mut set_parts = Vec::with_capacity(registro.len() - 1);
    for field in &registro[1..] {
        let Some(columna) = field.columna.as_deref().map(str::trim).filter(|c| !c.is_empty())
        else {
            return WriteReply::ko();
        };
        let Ok(column) = sanitize_identifier(columna) else {
            return WriteReply::ko();
        };
        set_parts.push(format!(
            "[{column}] = {}",
            Literal::from_json(&field.dato).format()
        ));
    }

    let sql = format!(
        "UPDATE [{table}] SET {} WHERE {where_clause}",
        set_parts.join(", ")
    );

    match engine.execute_non_query(&sql) {
        Ok(affected) if affected > 0 => WriteReply::ok(),
        _ => WriteReply::ko(),
    }
}

/// NULL-safe equality for the filter element: `IS NULL` when the value is
/// JSON null, `= <literal>` otherwise.
fn build_where_eq(filter: &RecordField) -> Option<String> {
    let columna = filter.columna.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
    let column = sanitize_identifier(columna).ok()?;

    let clause = match Literal::from_json(&filter.dato) {
        Literal::Null => format!("[{column}] IS NULL"),
        literal => format!("[{column}] = {}", literal.format()),
    };
    Some(clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;

    const UPDATE: &str = "UPDATE [F_ANT] SET [FECANT] = #10/07/2019 00:00:00#, \
                          [IMPANT] = 212.2 WHERE [CODANT] = 20";

    fn body() -> Vec<u8> {
        br#"{"tabla":"F_ANT","registro":[
            {"columna":"CODANT","dato":20},
            {"columna":"FECANT","dato":"2019-10-07"},
            {"columna":"IMPANT","dato":212.2}
        ]}"#
        .to_vec()
    }

    #[test]
    fn first_element_is_the_filter() {
        let engine = MemoryEngine::new();
        engine.script_write(UPDATE, 1);

        let reply = respond(&engine, &body());
        assert_eq!(reply.respuesta, "OK");
        assert_eq!(engine.executed(), vec![UPDATE]);
    }

    #[test]
    fn null_filter_value_becomes_is_null() {
        let engine = MemoryEngine::new();
        let sql = "UPDATE [F_ANT] SET [IMPANT] = 0 WHERE [FECANT] IS NULL";
        engine.script_write(sql, 3);

        let raw = br#"{"tabla":"F_ANT","registro":[
            {"columna":"FECANT","dato":null},
            {"columna":"IMPANT","dato":0}
        ]}"#;
        assert_eq!(respond(&engine, raw).respuesta, "OK");
        assert_eq!(engine.executed(), vec![sql]);
    }

    #[test]
    fn fewer_than_two_elements_is_ko() {
        let engine = MemoryEngine::new();
        assert_eq!(
            respond(&engine, br#"{"tabla":"F_ANT","registro":[]}"#).respuesta,
            "KO"
        );
        assert_eq!(
            respond(
                &engine,
                br#"{"tabla":"F_ANT","registro":[{"columna":"CODANT","dato":20}]}"#
            )
            .respuesta,
            "KO"
        );
        assert!(engine.executed().is_empty());
    }

    #[test]
    fn zero_affected_rows_is_ko() {
        let engine = MemoryEngine::new();
        engine.script_write(UPDATE, 0);
        assert_eq!(respond(&engine, &body()).respuesta, "KO");
    }

    #[test]
    fn bad_filter_or_set_column_is_ko() {
        let engine = MemoryEngine::new();
        let raw = br#"{"tabla":"F_ANT","registro":[
            {"columna":"COD ANT","dato":20},
            {"columna":"IMPANT","dato":1}
        ]}"#;
        assert_eq!(respond(&engine, raw).respuesta, "KO");

        let raw = br#"{"tabla":"F_ANT","registro":[
            {"columna":"CODANT","dato":20},
            {"columna":"IMP'ANT","dato":1}
        ]}"#;
        assert_eq!(respond(&engine, raw).respuesta, "KO");
        assert!(engine.executed().is_empty());
    }
}
