//! Submodule defining a builder for INSERT statements.

use core::time::Duration;

use super::clauses::Using;
use super::fragment::join_clauses;
use super::query_builder::QueryBuilder;
use crate::encoding::{IndexMap, ToCql, Value};
use crate::errors::{Error, QueryBuilderError};
use crate::session::ExecutionProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Builder for an INSERT statement.
///
/// # Example
///
/// ```
/// use scylla_query_rs::{Insert, QueryBuilder, Value};
///
/// let (text, values) = Insert::new("users")
///     .set("id", 1)?
///     .set("name", "Ada")?
///     .if_not_exists()
///     .build()?;
///
/// assert_eq!(text, "INSERT INTO users (id, name) VALUES (?, ?) IF NOT EXISTS");
/// assert_eq!(values, vec![Value::Int(1), Value::from("Ada")]);
/// # Ok::<(), scylla_query_rs::Error>(())
/// ```
pub struct Insert {
    /// The table being inserted into.
    table: String,
    /// Values of the inserted row, in first assignment order.
    columns: IndexMap<String, Value>,
    /// Whether to add `IF NOT EXISTS`.
    if_not_exists: bool,
    /// USING clause.
    using: Using,
    /// Execution profile passed to the session.
    profile: Option<ExecutionProfile>,
}

impl Insert {
    /// Creates a builder inserting into `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: IndexMap::default(),
            if_not_exists: false,
            using: Using::default(),
            profile: None,
        }
    }

    /// Returns the table name.
    #[inline]
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Sets the value of a column.
    ///
    /// Setting a column twice keeps its original position and the latest value.
    ///
    /// # Arguments
    ///
    /// * `column` - The column name.
    /// * `value` - The value to set for the column.
    ///
    /// # Errors
    ///
    /// * `Binding` - If the value cannot be bound.
    /// * `CounterAssignment` - If the value is a counter delta.
    pub fn set(mut self, column: impl Into<String>, value: impl ToCql) -> Result<Self, Error> {
        let column = column.into();
        let value = value.to_cql()?;
        if value.is_counter() {
            return Err(QueryBuilderError::CounterAssignment(column).into());
        }
        self.columns.insert(column, value);
        Ok(self)
    }

    /// Sets a column to NULL.
    #[must_use]
    pub fn set_null(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(column.into(), Value::Null);
        self
    }

    /// Only inserts when the row does not exist yet.
    #[must_use]
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Sets the time to live of the inserted values, in seconds.
    #[must_use]
    pub fn ttl(mut self, seconds: u32) -> Self {
        self.using.ttl = Some(seconds);
        self
    }

    /// Sets the write timestamp, in microseconds.
    #[must_use]
    pub fn timestamp(mut self, micros: i64) -> Self {
        self.using.timestamp = Some(micros);
        self
    }

    /// Sets a server-side timeout with `USING TIMEOUT`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.using.timeout = Some(timeout);
        self
    }

    /// Attaches an execution profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ExecutionProfile) -> Self {
        self.profile = Some(profile);
        self
    }
}

impl QueryBuilder for Insert {
    fn build(&self) -> Result<(String, Vec<Value>), Error> {
        if self.columns.is_empty() {
            return Err(QueryBuilderError::NoAssignments("INSERT").into());
        }
        let names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        let placeholders = vec!["?"; names.len()].join(", ");
        let target = format!("{} ({})", self.table, names.join(", "));
        let values = format!("VALUES ({placeholders})");
        let using = self.using.render();

        let text = join_clauses([
            "INSERT INTO",
            target.as_str(),
            values.as_str(),
            if self.if_not_exists {
                "IF NOT EXISTS"
            } else {
                ""
            },
            using.as_str(),
        ]);
        Ok((text, self.columns.values().cloned().collect()))
    }

    fn profile(&self) -> Option<&ExecutionProfile> {
        self.profile.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Counter, Unset};

    #[test]
    fn test_set_twice_keeps_position_and_last_value() {
        let (text, values) = Insert::new("t")
            .set("a", 1)
            .unwrap()
            .set("b", 2)
            .unwrap()
            .set("a", 3)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(text, "INSERT INTO t (a, b) VALUES (?, ?)");
        assert_eq!(values, vec![Value::Int(3), Value::Int(2)]);
    }

    #[test]
    fn test_using_clause() {
        let (text, _) = Insert::new("t")
            .set("a", 1)
            .unwrap()
            .ttl(60)
            .timestamp(1_000)
            .build()
            .unwrap();
        assert_eq!(
            text,
            "INSERT INTO t (a) VALUES (?) USING TIMESTAMP 1000 AND TTL 60"
        );
    }

    #[test]
    fn test_no_columns() {
        assert_eq!(
            Insert::new("t").build().unwrap_err(),
            Error::QueryBuilder(QueryBuilderError::NoAssignments("INSERT"))
        );
    }

    #[test]
    fn test_counter_rejected() {
        let err = Insert::new("t").set("hits", Counter(1)).unwrap_err();
        assert_eq!(
            err,
            Error::QueryBuilder(QueryBuilderError::CounterAssignment("hits".to_owned()))
        );
    }

    #[test]
    fn test_unset_and_null_are_bound() {
        let (_, values) = Insert::new("t")
            .set("a", Unset)
            .unwrap()
            .set_null("b")
            .build()
            .unwrap();
        assert_eq!(values, vec![Value::Unset, Value::Null]);
    }
}
