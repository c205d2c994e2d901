//! # Raw-Query Endpoint
//!
//! `POST /lanzarconsulta`: run a caller-written SELECT. The statement is
//! gated to read-only first, then its MySQL-style pagination is rewritten
//! for the Access dialect. Only SELECT text ever reaches the engine.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use crate::engine::AccessEngine;
use crate::observability::Logger;
use crate::sql::compile::rewrite_select;
use crate::sql::guard::check_select;

use super::envelope::{parse_body, QueryReply, RawQueryBody};
use super::server::GatewayState;

pub async fn handle(State(state): State<Arc<GatewayState>>, body: Bytes) -> Json<QueryReply> {
    Json(respond(state.engine.as_ref(), &body))
}

fn respond(engine: &dyn AccessEngine, raw: &[u8]) -> QueryReply {
    let Some(body) = parse_body::<RawQueryBody>(raw) else {
        return QueryReply::ko();
    };
    let Some(consulta) = body.consulta.as_deref().map(str::trim).filter(|c| !c.is_empty())
    else {
        return QueryReply::ko();
    };

    if let Err(reason) = check_select(consulta) {
        Logger::warn(
            "request_rejected",
            &[("endpoint", "lanzarconsulta"), ("reason", &reason.to_string())],
        );
        return QueryReply::ko();
    }

    let Ok(sql) = rewrite_select(consulta) else {
        return QueryReply::ko();
    };

    match engine.execute_query(&sql) {
        Ok(rows) if !rows.is_empty() => QueryReply::ok(&rows),
        _ => QueryReply::ko(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryEngine, Row, SqlValue};

    fn art_row(code: &str) -> Row {
        let mut row = Row::new();
        row.push("CODART", SqlValue::Text(code.into()));
        row
    }

    #[test]
    fn plain_select_passes_through() {
        let engine = MemoryEngine::new();
        engine.script_query("SELECT CODART FROM F_ART", vec![art_row("A")]);

        let reply = respond(&engine, br#"{"consulta":"SELECT CODART FROM F_ART"}"#);
        assert_eq!(reply.respuesta, "OK");
    }

    #[test]
    fn pagination_is_rewritten_before_execution() {
        let engine = MemoryEngine::new();
        engine.script_query(
            "SELECT TOP 10 * FROM F_ART ORDER BY CODART DESC",
            vec![art_row("Z")],
        );

        let reply = respond(
            &engine,
            br#"{"consulta":"SELECT * FROM F_ART ORDER BY CODART DESC LIMIT 10"}"#,
        );
        assert_eq!(reply.respuesta, "OK");
        assert_eq!(
            engine.executed(),
            vec!["SELECT TOP 10 * FROM F_ART ORDER BY CODART DESC"]
        );
    }

    #[test]
    fn unsafe_statements_never_reach_the_engine() {
        let engine = MemoryEngine::new();
        for consulta in [
            "SELECT 1; DROP TABLE X",
            "UPDATE T SET x=1",
            "  /* x */ DELETE FROM T",
            "SELECT * FROM T WHERE EXISTS (DROP TABLE X)",
        ] {
            let raw = serde_json::to_vec(&serde_json::json!({ "consulta": consulta })).unwrap();
            assert_eq!(respond(&engine, &raw).respuesta, "KO", "{consulta}");
        }
        assert!(engine.executed().is_empty());
    }

    #[test]
    fn missing_consulta_is_ko() {
        let engine = MemoryEngine::new();
        assert_eq!(respond(&engine, b"{}").respuesta, "KO");
        assert_eq!(respond(&engine, br#"{"consulta":"  "}"#).respuesta, "KO");
    }

    #[test]
    fn offset_without_order_is_ko() {
        let engine = MemoryEngine::new();
        let reply = respond(&engine, br#"{"consulta":"SELECT * FROM T LIMIT 5 OFFSET 5"}"#);
        assert_eq!(reply.respuesta, "KO");
        assert!(engine.executed().is_empty());
    }

    #[test]
    fn zero_rows_is_ko() {
        let engine = MemoryEngine::new();
        engine.script_query("SELECT CODART FROM F_ART", vec![]);
        let reply = respond(&engine, br#"{"consulta":"SELECT CODART FROM F_ART"}"#);
        assert_eq!(reply.respuesta, "KO");
    }
}
