//! # Rows and Scalars
//!
//! A materialized result row: ordered columns, case-insensitive lookup,
//! engine NULL mapped to [`SqlValue::Null`].

/// A scalar read from (or destined for) the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Render for the wire `dato` field. NULL is the empty string.
    pub fn render(&self) -> String {
        match self {
            SqlValue::Null => String::new(),
            SqlValue::Bool(b) => b.to_string(),
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Text(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

/// One result row, columns in engine order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-ordered name/value pairs.
    pub fn from_pairs(fields: Vec<(String, SqlValue)>) -> Self {
        Self { fields }
    }

    /// Append a column. Duplicate names keep both entries, as the engine
    /// reports them.
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.fields.push((name.into(), value));
    }

    /// Case-insensitive lookup of the first column with this name.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, SqlValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
