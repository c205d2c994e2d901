//! # Identifier Sanitization
//!
//! Table and column names cannot be parameterized in the Access dialect, so
//! every identifier is validated here before it is interpolated into SQL
//! text. Only `[A-Za-z0-9_-]+` passes.

use std::sync::OnceLock;

use regex::Regex;

use super::{SqlError, SqlResult};

fn identifier_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("identifier pattern"))
}

/// Validate a table or column name for interpolation into a statement.
///
/// Trims surrounding whitespace and accepts letters, digits, `_` and `-`
/// only. Anything else is rejected; there is no escaping fallback.
pub fn sanitize_identifier(raw: &str) -> SqlResult<String> {
    let name = raw.trim();
    if name.is_empty() || !identifier_rx().is_match(name) {
        return Err(SqlError::InvalidIdentifier(raw.to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert_eq!(sanitize_identifier("F_ART").unwrap(), "F_ART");
        assert_eq!(sanitize_identifier("codart2").unwrap(), "codart2");
        assert_eq!(sanitize_identifier("MI-TABLA").unwrap(), "MI-TABLA");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(sanitize_identifier("  F_ANT  ").unwrap(), "F_ANT");
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert!(sanitize_identifier("").is_err());
        assert!(sanitize_identifier("   ").is_err());
    }

    #[test]
    fn rejects_injection_shapes() {
        assert!(sanitize_identifier("F_ART; DROP TABLE F_ART").is_err());
        assert!(sanitize_identifier("F_ART]").is_err());
        assert!(sanitize_identifier("a b").is_err());
        assert!(sanitize_identifier("col'").is_err());
        assert!(sanitize_identifier("árbol").is_err());
    }
}
