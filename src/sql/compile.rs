//! # Dialect Compiler
//!
//! Rewrites MySQL-style `LIMIT n [OFFSET m]` pagination into the Access
//! dialect, which only has `TOP n`. A bare limit becomes `TOP n` after the
//! leading `SELECT`; limit plus offset becomes the double-TOP-flip: take the
//! first `n+m` rows ascending, reverse and keep `n`, reverse again.
//!
//! Parsing is string-based on purpose: `LIMIT` is only recognized anchored
//! at the end of the clause, and `ORDER BY` is split on its last occurrence
//! so subqueries with their own ordering survive. A predicate carrying
//! ` ORDER BY ` inside a quoted string value is mis-split; that matches the
//! wire behavior this gateway is replacing.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::{SqlError, SqlResult};

fn limit_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| {
        Regex::new(r"(?i)\s+LIMIT\s+(\d+)(?:\s+OFFSET\s+(\d+))?\s*$").expect("limit pattern")
    })
}

fn select_prefix_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"(?i)^\s*SELECT\s+").expect("select prefix pattern"))
}

fn order_by_rx() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| {
        Regex::new(r"(?i)^[A-Za-z0-9_-]+(\s+(ASC|DESC))?(\s*,\s*[A-Za-z0-9_-]+(\s+(ASC|DESC))?)*$")
            .expect("order by pattern")
    })
}

/// Pull a trailing `LIMIT n [OFFSET m]` off the end of a clause.
///
/// Returns the clause with the pagination stripped, plus the extracted
/// values. Must run before the `ORDER BY` split so the order list comes out
/// clean. A `LIMIT` that is not at the very end is left untouched.
pub fn extract_limit_offset(clause: &str) -> (String, Option<u64>, Option<u64>) {
    let Some(caps) = limit_rx().captures(clause) else {
        return (clause.trim().to_string(), None, None);
    };
    let limit = caps.get(1).and_then(|m| m.as_str().parse().ok());
    let offset = caps.get(2).and_then(|m| m.as_str().parse().ok());
    let stripped = limit_rx().replace(clause, "").trim().to_string();
    (stripped, limit, offset)
}

/// Split `predicate [ORDER BY list]` on the last ` ORDER BY `.
///
/// Everything before the last occurrence is preserved verbatim, which keeps
/// nested subqueries with internal ordering intact.
pub fn split_order_by(clause: &str) -> (String, Option<String>) {
    let lower = clause.to_ascii_lowercase();
    match lower.rfind(" order by ") {
        Some(idx) => {
            let order = clause[idx + " order by ".len()..].trim();
            let head = clause[..idx].trim().to_string();
            if order.is_empty() {
                (head, None)
            } else {
                (head, Some(order.to_string()))
            }
        }
        None => (clause.trim().to_string(), None),
    }
}

/// Validate a caller-supplied order list: identifiers with optional
/// `ASC`/`DESC`, comma-separated. Anything else is discarded.
pub fn normalize_order_by(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if s.is_empty() || !order_by_rx().is_match(s) {
        return None;
    }
    Some(s.to_string())
}

/// Inputs for the table-dump SELECT builder.
///
/// `table` must already be sanitized; `predicate` is the WHERE body without
/// the keyword, already stripped of pagination and ordering.
#[derive(Debug, Clone)]
pub struct TableSelect<'a> {
    pub table: &'a str,
    pub predicate: &'a str,
    pub order_by: Option<&'a str>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Build the full `SELECT * FROM [table] ...` for the table-load endpoint.
pub fn build_table_select(q: &TableSelect<'_>) -> SqlResult<String> {
    let where_clause = if q.predicate.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", q.predicate)
    };
    let order_by = q.order_by.map(str::trim).filter(|o| !o.is_empty());

    match (q.limit, q.offset) {
        (limit, Some(offset)) => {
            let order = order_by.ok_or(SqlError::OffsetRequiresOrder)?;
            let limit = match limit {
                Some(n) if n > 0 => n,
                _ => return Err(SqlError::OffsetRequiresLimit),
            };
            let top_inner = limit + offset;
            let inner = format!(
                "SELECT TOP {top_inner} * FROM [{}]{} ORDER BY {order}",
                q.table, where_clause
            );
            let mid = format!("SELECT TOP {limit} * FROM ({inner}) AS T1 ORDER BY {order} DESC");
            Ok(format!("SELECT * FROM ({mid}) AS T2 ORDER BY {order} ASC"))
        }
        (Some(limit), None) if limit > 0 => {
            let mut sql = format!("SELECT TOP {limit} * FROM [{}]{}", q.table, where_clause);
            if let Some(order) = order_by {
                sql.push_str(" ORDER BY ");
                sql.push_str(order);
            }
            Ok(sql)
        }
        _ => {
            let mut sql = format!("SELECT * FROM [{}]{}", q.table, where_clause);
            if let Some(order) = order_by {
                sql.push_str(" ORDER BY ");
                sql.push_str(order);
            }
            Ok(sql)
        }
    }
}

/// Rewrite a full MySQL-style SELECT for the raw-query endpoint.
///
/// Without pagination the statement passes through unchanged. `LIMIT n`
/// inserts `TOP n` after the leading `SELECT`; `LIMIT n OFFSET m` wraps the
/// statement in the double-TOP-flip and requires an `ORDER BY`.
pub fn rewrite_select(sql: &str) -> SqlResult<String> {
    let (clause, limit, offset) = extract_limit_offset(sql.trim());
    if limit.is_none() && offset.is_none() {
        return Ok(clause);
    }

    if let Some(offset) = offset {
        let limit = match limit {
            Some(n) if n > 0 => n,
            _ => return Err(SqlError::OffsetRequiresLimit),
        };
        let (base, order_by) = split_order_by(&clause);
        let order = order_by.ok_or(SqlError::OffsetRequiresOrder)?;

        let top_inner = limit + offset;
        let inner = format!("SELECT TOP {top_inner} * FROM ({base}) AS B1 ORDER BY {order}");
        let mid = format!("SELECT TOP {limit} * FROM ({inner}) AS T1 ORDER BY {order} DESC");
        Ok(format!("SELECT * FROM ({mid}) AS T2 ORDER BY {order} ASC"))
    } else {
        insert_top(&clause, limit.unwrap_or(0))
    }
}

/// Insert `TOP n` right after the leading `SELECT` keyword.
fn insert_top(select_sql: &str, top: u64) -> SqlResult<String> {
    if !select_prefix_rx().is_match(select_sql) {
        return Err(SqlError::NotSelect);
    }
    let rewritten = select_prefix_rx()
        .replace(select_sql, |caps: &Captures<'_>| {
            format!("{}TOP {} ", &caps[0], top)
        })
        .into_owned();
    Ok(rewritten)
}
