//! # Access SQL Construction
//!
//! Builds statements for the legacy Access engine from untrusted request
//! input. Identifier sanitization and literal formatting are the only paths
//! by which request data reaches SQL text; the compiler handles the
//! dialect's missing `LIMIT`/`OFFSET` via `TOP` rewrites.

pub mod compile;
pub mod guard;
pub mod literal;
pub mod predicate;
pub mod sanitize;

pub use compile::{
    build_table_select, extract_limit_offset, normalize_order_by, rewrite_select, split_order_by,
    TableSelect,
};
pub use guard::check_select;
pub use literal::{format_free_literal, Literal};
pub use predicate::build_structured_predicate;
pub use sanitize::sanitize_identifier;

use thiserror::Error;

/// Result type for SQL construction
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while building or rewriting a statement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// Identifier is empty or contains characters outside `[A-Za-z0-9_-]`
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Structured filter operator is not in the supported set
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// BETWEEN takes exactly two delimited values
    #[error("BETWEEN requires two values: min,max")]
    BetweenArity,

    /// OFFSET pagination without a positive LIMIT
    #[error("OFFSET requires LIMIT > 0")]
    OffsetRequiresLimit,

    /// OFFSET pagination without an ordering to window over
    #[error("LIMIT with OFFSET requires ORDER BY")]
    OffsetRequiresOrder,

    /// Statement does not start with SELECT
    #[error("not a SELECT statement")]
    NotSelect,

    /// Statement contains a `;` separator
    #[error("multiple statements are not allowed")]
    MultiStatement,

    /// A write/DDL verb appears inside a read-only statement
    #[error("forbidden verb in read-only statement: {0}")]
    ForbiddenVerb(String),
}
