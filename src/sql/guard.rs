//! # Read-Only Statement Gate
//!
//! The raw-query endpoint accepts arbitrary statement text, so it is gated
//! here before anything is compiled or executed: one statement, SELECT
//! only, no write or DDL verbs anywhere in the text.

use std::sync::OnceLock;

use regex::Regex;

use super::{SqlError, SqlResult};

fn forbidden_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| {
        Regex::new(r"(?i)\b(INSERT|UPDATE|DELETE|DROP|ALTER|CREATE)\b")
            .expect("forbidden verb pattern")
    })
}

/// Check that a raw statement is a single read-only SELECT.
///
/// Leading `--` and `/* */` comments are stripped before the prefix check
/// so a commented preamble cannot hide the verb.
pub fn check_select(sql: &str) -> SqlResult<()> {
    if sql.contains(';') {
        return Err(SqlError::MultiStatement);
    }

    let body = strip_leading_comments(sql).trim_start();
    let starts_with_select = body
        .get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("SELECT"))
        .unwrap_or(false);
    if !starts_with_select {
        return Err(SqlError::NotSelect);
    }

    if let Some(m) = forbidden_rx().find(body) {
        return Err(SqlError::ForbiddenVerb(m.as_str().to_ascii_uppercase()));
    }

    Ok(())
}

/// Skip whitespace, `--` line comments and `/* */` block comments at the
/// start of a statement.
fn strip_leading_comments(s: &str) -> &str {
    let mut rest = s;
    loop {
        let t = rest.trim_start();
        if let Some(after) = t.strip_prefix("--") {
            match after.find(['\r', '\n']) {
                Some(i) => rest = &after[i + 1..],
                None => return "",
            }
        } else if let Some(after) = t.strip_prefix("/*") {
            match after.find("*/") {
                Some(i) => rest = &after[i + 2..],
                None => return "",
            }
        } else {
            return t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_select() {
        assert!(check_select("SELECT * FROM F_ART").is_ok());
        assert!(check_select("  select CODART from F_ART where CODART like '%1%'").is_ok());
    }

    #[test]
    fn rejects_multi_statement() {
        assert_eq!(
            check_select("SELECT 1; DROP TABLE X").unwrap_err(),
            SqlError::MultiStatement
        );
    }

    #[test]
    fn rejects_non_select() {
        assert_eq!(
            check_select("UPDATE T SET x=1").unwrap_err(),
            SqlError::NotSelect
        );
        assert_eq!(check_select("").unwrap_err(), SqlError::NotSelect);
        assert_eq!(check_select("SELEC *").unwrap_err(), SqlError::NotSelect);
    }

    #[test]
    fn rejects_non_select_behind_comments() {
        assert_eq!(
            check_select("-- harmless\nUPDATE T SET x=1").unwrap_err(),
            SqlError::NotSelect
        );
        assert_eq!(
            check_select("/* harmless */ UPDATE T SET x=1").unwrap_err(),
            SqlError::NotSelect
        );
    }

    #[test]
    fn accepts_select_behind_comments() {
        assert!(check_select("-- listado\nSELECT * FROM F_ART").is_ok());
        assert!(check_select("/* listado */ SELECT * FROM F_ART").is_ok());
    }

    #[test]
    fn rejects_forbidden_verbs_anywhere() {
        assert_eq!(
            check_select("SELECT * FROM T WHERE EXISTS (DELETE FROM X)").unwrap_err(),
            SqlError::ForbiddenVerb("DELETE".to_string())
        );
    }

    #[test]
    fn verb_match_is_whole_word() {
        // Column names containing a verb as a substring are fine.
        assert!(check_select("SELECT UPDATED_AT FROM T").is_ok());
        assert!(check_select("SELECT * FROM CREATED_ORDERS").is_ok());
    }

    #[test]
    fn unterminated_comment_is_not_a_select() {
        assert_eq!(
            check_select("/* never closed SELECT *").unwrap_err(),
            SqlError::NotSelect
        );
    }
}
