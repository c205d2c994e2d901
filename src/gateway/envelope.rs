//! # Request and Reply Envelopes
//!
//! Wire types for the four endpoints. Bodies are parsed from raw bytes so
//! malformed JSON folds into the KO reply instead of a framework 400; the
//! reply always carries `respuesta: "OK" | "KO"` for the scripting layer on
//! the other side to branch on.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::Row;

/// Body of `POST /cargatabla`.
///
/// `filtro` is a free predicate (may carry its own `ORDER BY` and
/// `LIMIT`/`OFFSET`); `campo`/`operador`/`valor` is the structured
/// alternative. `filtro` wins when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct TableLoadBody {
    #[serde(default)]
    pub tabla: Option<String>,
    #[serde(default)]
    pub filtro: Option<String>,
    #[serde(default)]
    pub campo: Option<String>,
    #[serde(default)]
    pub operador: Option<String>,
    #[serde(default)]
    pub valor: Option<String>,
    #[serde(default, rename = "orderBy", alias = "orderby")]
    pub order_by: Option<String>,
}

/// Body of `POST /lanzarconsulta`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQueryBody {
    #[serde(default)]
    pub consulta: Option<String>,
}

/// Body of `POST /escribirregistro` and `POST /actualizarregistro`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordBody {
    #[serde(default)]
    pub tabla: Option<String>,
    #[serde(default)]
    pub registro: Option<Vec<RecordField>>,
}

/// One column/value pair of a record.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordField {
    #[serde(default)]
    pub columna: Option<String>,
    #[serde(default)]
    pub dato: Value,
}

/// Reply of the two query endpoints.
///
/// On success `resultado` is an array of row groups; on soft failure it is
/// the literal string `"[]"`, which is what the consuming scripting layer
/// expects.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReply {
    pub resultado: Value,
    pub respuesta: &'static str,
}

impl QueryReply {
    pub fn ok(rows: &[Row]) -> Self {
        Self {
            resultado: rows_to_json(rows),
            respuesta: "OK",
        }
    }

    pub fn ko() -> Self {
        Self {
            resultado: Value::String("[]".to_string()),
            respuesta: "KO",
        }
    }
}

/// Reply of the two write endpoints. `resultado` is always empty.
#[derive(Debug, Clone, Serialize)]
pub struct WriteReply {
    pub resultado: &'static str,
    pub respuesta: &'static str,
}

impl WriteReply {
    pub fn ok() -> Self {
        Self {
            resultado: "",
            respuesta: "OK",
        }
    }

    pub fn ko() -> Self {
        Self {
            resultado: "",
            respuesta: "KO",
        }
    }
}

/// Parse a request body leniently: any failure is `None`, which callers
/// turn into KO.
pub fn parse_body<T: DeserializeOwned>(raw: &[u8]) -> Option<T> {
    serde_json::from_slice(raw).ok()
}

/// Map rows to the wire shape: one array of `{columna, dato}` per row,
/// columns in engine order, values stringified.
fn rows_to_json(rows: &[Row]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                Value::Array(
                    row.iter()
                        .map(|(name, value)| json!({"columna": name, "dato": value.render()}))
                        .collect(),
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SqlValue;

    #[test]
    fn parse_is_lenient() {
        assert!(parse_body::<TableLoadBody>(b"{\"tabla\":\"F_ART\"}").is_some());
        assert!(parse_body::<TableLoadBody>(b"not json").is_none());
        assert!(parse_body::<TableLoadBody>(b"").is_none());
    }

    #[test]
    fn order_by_accepts_both_spellings() {
        let a: TableLoadBody = parse_body(b"{\"tabla\":\"T\",\"orderBy\":\"C\"}").unwrap();
        assert_eq!(a.order_by.as_deref(), Some("C"));
        let b: TableLoadBody = parse_body(b"{\"tabla\":\"T\",\"orderby\":\"C\"}").unwrap();
        assert_eq!(b.order_by.as_deref(), Some("C"));
    }

    #[test]
    fn missing_dato_defaults_to_null() {
        let body: RecordBody =
            parse_body(b"{\"tabla\":\"T\",\"registro\":[{\"columna\":\"A\"}]}").unwrap();
        assert!(body.registro.unwrap()[0].dato.is_null());
    }

    #[test]
    fn ok_reply_groups_rows() {
        let mut row = Row::new();
        row.push("CODART", SqlValue::Text("AGU001".into()));
        row.push("FECBAJA", SqlValue::Null);

        let reply = QueryReply::ok(&[row]);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["respuesta"], "OK");
        assert_eq!(json["resultado"][0][0]["columna"], "CODART");
        assert_eq!(json["resultado"][0][0]["dato"], "AGU001");
        assert_eq!(json["resultado"][0][1]["dato"], "");
    }

    #[test]
    fn ko_reply_uses_empty_list_string() {
        let json = serde_json::to_value(QueryReply::ko()).unwrap();
        assert_eq!(json["resultado"], "[]");
        assert_eq!(json["respuesta"], "KO");
    }

    #[test]
    fn write_replies_are_empty() {
        let json = serde_json::to_value(WriteReply::ok()).unwrap();
        assert_eq!(json["resultado"], "");
        assert_eq!(json["respuesta"], "OK");
    }
}
