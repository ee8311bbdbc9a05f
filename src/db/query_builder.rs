//! Positional SQL builder.
//!
//! Placeholders are numbered from the builder's own argument list, so a
//! fragment never needs an external counter: `push_arg` returns the `?N` text
//! for the value it just stored, and `build` hands back `(sql, args)`.

use rusqlite::types::Value;

#[derive(Debug, Default)]
pub struct QueryBuilder {
    sql: String,
    args: Vec<Value>,
}

impl QueryBuilder {
    pub fn new(base: &str) -> Self {
        Self {
            sql: base.to_string(),
            args: Vec::new(),
        }
    }

    /// Store one argument and return its placeholder.
    pub fn push_arg(&mut self, value: impl Into<Value>) -> String {
        self.args.push(value.into());
        format!("?{}", self.args.len())
    }

    /// Placeholders for a list, e.g. `?3, ?4, ?5`.
    pub fn push_args<I, V>(&mut self, values: I) -> String
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        values
            .into_iter()
            .map(|v| self.push_arg(v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn push_sql(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Append `WHERE c1 AND c2 ...` when there are conditions.
    pub fn push_where(&mut self, conditions: &[String]) {
        if !conditions.is_empty() {
            self.sql.push_str(" WHERE ");
            self.sql.push_str(&conditions.join(" AND "));
        }
    }

    pub fn build(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}
