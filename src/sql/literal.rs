//! # Literal Formatting
//!
//! Formats request values into Access SQL literals. This is the only path
//! by which user data enters statement text; call sites never concatenate
//! raw input.
//!
//! Dialect rules: `NULL`, `TRUE`/`FALSE`, invariant numeric text, dates as
//! `#MM/DD/YYYY HH:MM:SS#`, everything else single-quoted with embedded
//! quotes doubled.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// A request value resolved to a closed variant before formatting.
///
/// JSON input is inspected exactly once, here; downstream code only ever
/// sees one of these shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Resolve a JSON value. Arrays and objects degrade to their text
    /// rendering, matching the engine's string-typed columns.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Literal::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Literal::Float(f)
                } else {
                    Literal::Text(n.to_string())
                }
            }
            Value::String(s) => Literal::Text(s.clone()),
            other => Literal::Text(other.to_string()),
        }
    }

    /// Emit the Access literal for this value.
    pub fn format(&self) -> String {
        match self {
            Literal::Null => "NULL".to_string(),
            Literal::Bool(true) => "TRUE".to_string(),
            Literal::Bool(false) => "FALSE".to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::Float(f) => f.to_string(),
            Literal::Text(s) => format_text(s),
        }
    }
}

/// Format a free-form string value, classifying it first.
///
/// Used by the structured table filter, where every value arrives as text:
/// the `NULL` keyword, boolean words and numeric text are recognized before
/// the date sniff, in that order. A missing value is `NULL`.
pub fn format_free_literal(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "NULL".to_string();
    };
    let v = raw.trim();

    if v.eq_ignore_ascii_case("NULL") {
        return "NULL".to_string();
    }
    if v.eq_ignore_ascii_case("true") {
        return "TRUE".to_string();
    }
    if v.eq_ignore_ascii_case("false") {
        return "FALSE".to_string();
    }
    if let Ok(i) = v.parse::<i64>() {
        return i.to_string();
    }
    if let Ok(f) = v.parse::<f64>() {
        if f.is_finite() {
            return f.to_string();
        }
    }
    format_text(v)
}

/// Date-sniff a string, then fall back to a quoted literal.
fn format_text(s: &str) -> String {
    if let Some(stamp) = sniff_datetime(s) {
        return format!("#{}#", stamp.format("%m/%d/%Y %H:%M:%S"));
    }
    format!("'{}'", s.replace('\'', "''"))
}

/// Try to read a date or timestamp out of a string.
///
/// Day-first forms come before month-first, mirroring the original
/// locale-then-invariant parse order for the Spanish accounting package
/// this gateway fronts.
fn sniff_datetime(s: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
    ];
    const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%m/%d/%Y"];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}
