//! # Structured Filter Builder
//!
//! Turns the table-load endpoint's `campo`/`operador`/`valor` triple into a
//! WHERE predicate. `IN` and `BETWEEN` take a comma- or semicolon-delimited
//! value list; every value goes through the literal formatter.

use super::literal::format_free_literal;
use super::sanitize::sanitize_identifier;
use super::{SqlError, SqlResult};

/// Build a predicate from a structured field/operator/value triple.
///
/// Supported operators: `=`, `<>`, `>`, `>=`, `<`, `<=`, `LIKE`, `IN`,
/// `BETWEEN`, `IS NULL`, `IS NOT NULL` (case-insensitive).
pub fn build_structured_predicate(
    field: &str,
    operator: &str,
    value: Option<&str>,
) -> SqlResult<String> {
    let column = sanitize_identifier(field)?;
    let op = operator.trim().to_ascii_uppercase();

    match op.as_str() {
        "=" | "<>" | ">" | ">=" | "<" | "<=" => {
            Ok(format!("[{column}] {op} {}", format_free_literal(value)))
        }
        "LIKE" => Ok(format!("[{column}] LIKE {}", format_free_literal(value))),
        "IN" => {
            let items: Vec<String> = split_value_list(value)
                .into_iter()
                .map(|v| format_free_literal(Some(v)))
                .collect();
            Ok(format!("[{column}] IN ({})", items.join(", ")))
        }
        "BETWEEN" => {
            let parts = split_value_list(value);
            if parts.len() != 2 {
                return Err(SqlError::BetweenArity);
            }
            Ok(format!(
                "[{column}] BETWEEN {} AND {}",
                format_free_literal(Some(parts[0])),
                format_free_literal(Some(parts[1]))
            ))
        }
        "IS NULL" => Ok(format!("[{column}] IS NULL")),
        "IS NOT NULL" => Ok(format!("[{column}] IS NOT NULL")),
        _ => Err(SqlError::UnsupportedOperator(op)),
    }
}

fn split_value_list(value: Option<&str>) -> Vec<&str> {
    value
        .unwrap_or("")
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_operators() {
        assert_eq!(
            build_structured_predicate("CODART", "=", Some("AGU001")).unwrap(),
            "[CODART] = 'AGU001'"
        );
        assert_eq!(
            build_structured_predicate("PRECIO", ">=", Some("10.5")).unwrap(),
            "[PRECIO] >= 10.5"
        );
        assert_eq!(
            build_structured_predicate("STOCK", "<>", Some("0")).unwrap(),
            "[STOCK] <> 0"
        );
    }

    #[test]
    fn operator_is_case_insensitive() {
        assert_eq!(
            build_structured_predicate("CODART", "like", Some("%001%")).unwrap(),
            "[CODART] LIKE '%001%'"
        );
        assert_eq!(
            build_structured_predicate("FECANT", "is null", None).unwrap(),
            "[FECANT] IS NULL"
        );
    }

    #[test]
    fn in_splits_value_lists() {
        assert_eq!(
            build_structured_predicate("CODART", "IN", Some("a, b;c")).unwrap(),
            "[CODART] IN ('a', 'b', 'c')"
        );
        assert_eq!(
            build_structured_predicate("CODANT", "IN", Some("10,20")).unwrap(),
            "[CODANT] IN (10, 20)"
        );
    }

    #[test]
    fn between_requires_two_values() {
        assert_eq!(
            build_structured_predicate("IMPANT", "BETWEEN", Some("10,20")).unwrap(),
            "[IMPANT] BETWEEN 10 AND 20"
        );
        assert_eq!(
            build_structured_predicate("IMPANT", "BETWEEN", Some("10")).unwrap_err(),
            SqlError::BetweenArity
        );
        assert_eq!(
            build_structured_predicate("IMPANT", "BETWEEN", Some("1,2,3")).unwrap_err(),
            SqlError::BetweenArity
        );
    }

    #[test]
    fn null_checks_take_no_value() {
        assert_eq!(
            build_structured_predicate("FECANT", "IS NOT NULL", Some("ignored")).unwrap(),
            "[FECANT] IS NOT NULL"
        );
    }

    #[test]
    fn missing_value_formats_as_null() {
        assert_eq!(
            build_structured_predicate("FECANT", "=", None).unwrap(),
            "[FECANT] = NULL"
        );
    }

    #[test]
    fn rejects_bad_field_and_operator() {
        assert!(matches!(
            build_structured_predicate("CODART;--", "=", Some("x")),
            Err(SqlError::InvalidIdentifier(_))
        ));
        assert_eq!(
            build_structured_predicate("CODART", "MATCHES", Some("x")).unwrap_err(),
            SqlError::UnsupportedOperator("MATCHES".to_string())
        );
    }
}
