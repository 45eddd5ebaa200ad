//! Submodule defining a builder for DELETE statements.

use core::time::Duration;

use super::clauses::{Condition, Using};
use super::fragment::{Fragment, Fragments, join_clauses};
use super::query_builder::QueryBuilder;
use crate::encoding::{BindValues, Value};
use crate::errors::Error;
use crate::session::ExecutionProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Builder for a DELETE statement.
///
/// Without columns the whole row is deleted. Parameters are bound in clause
/// order: IF values, then WHERE values.
///
/// # Example
///
/// ```
/// use scylla_query_rs::{Delete, QueryBuilder, Value};
///
/// let (text, values) = Delete::new("users")
///     .r#where("id = ?", (7,))?
///     .if_exists()?
///     .build()?;
///
/// assert_eq!(text, "DELETE FROM users IF EXISTS WHERE id = ?");
/// assert_eq!(values, vec![Value::Int(7)]);
/// # Ok::<(), scylla_query_rs::Error>(())
/// ```
pub struct Delete {
    /// The table rows are deleted from.
    table: String,
    /// Deleted columns, the whole row when empty.
    columns: Vec<String>,
    /// WHERE conditions.
    where_clauses: Fragments,
    /// IF clause.
    condition: Condition,
    /// USING clause.
    using: Using,
    /// Execution profile passed to the session.
    profile: Option<ExecutionProfile>,
}

impl Delete {
    /// Creates a builder deleting from `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            where_clauses: Fragments::new(),
            condition: Condition::default(),
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

    /// Deletes only the given columns (or collection elements such as
    /// `"tags['a']"`) instead of the whole row.
    #[must_use]
    pub fn cols<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Adds a WHERE condition. Conditions are combined with `AND`.
    ///
    /// # Errors
    ///
    /// * `Binding` - If a value cannot be bound.
    pub fn r#where(
        self,
        clause: impl Into<String>,
        values: impl BindValues,
    ) -> Result<Self, Error> {
        Ok(self.where_fragment(Fragment::new(clause, values)?))
    }

    /// Adds a prebuilt WHERE condition.
    #[must_use]
    pub fn where_fragment(mut self, fragment: Fragment) -> Self {
        self.where_clauses.push(fragment);
        self
    }

    /// Adds an IF condition. Conditions are combined with `AND`.
    ///
    /// # Errors
    ///
    /// * `Binding` - If a value cannot be bound.
    /// * `ConflictingConditions` - If `if_exists` was already called.
    pub fn if_(self, clause: impl Into<String>, values: impl BindValues) -> Result<Self, Error> {
        self.if_fragment(Fragment::new(clause, values)?)
    }

    /// Adds a prebuilt IF condition.
    ///
    /// # Errors
    ///
    /// * `ConflictingConditions` - If `if_exists` was already called.
    pub fn if_fragment(mut self, fragment: Fragment) -> Result<Self, Error> {
        self.condition.push(fragment)?;
        Ok(self)
    }

    /// Only deletes when the row exists.
    ///
    /// # Errors
    ///
    /// * `ConflictingConditions` - If IF conditions were already added.
    pub fn if_exists(mut self) -> Result<Self, Error> {
        self.condition.require_exists()?;
        Ok(self)
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

impl QueryBuilder for Delete {
    fn build(&self) -> Result<(String, Vec<Value>), Error> {
        let columns = self.columns.join(", ");
        let where_clause = if self.where_clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.where_clauses.text())
        };
        let using = self.using.render();
        let condition = self.condition.render();

        let text = join_clauses([
            "DELETE",
            columns.as_str(),
            "FROM",
            self.table.as_str(),
            using.as_str(),
            condition.as_str(),
            where_clause.as_str(),
        ]);
        let values = self
            .condition
            .values()
            .chain(self.where_clauses.values())
            .cloned()
            .collect();
        Ok((text, values))
    }

    fn profile(&self) -> Option<&ExecutionProfile> {
        self.profile.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_columns() {
        let (text, values) = Delete::new("t")
            .cols(["a", "b"])
            .r#where("id = ?", (1,))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(text, "DELETE a, b FROM t WHERE id = ?");
        assert_eq!(values, vec![Value::Int(1)]);
    }

    #[test]
    fn test_condition_values_come_first() {
        let (text, values) = Delete::new("t")
            .r#where("id = ?", (1,))
            .unwrap()
            .if_("version = ?", (3,))
            .unwrap()
            .timestamp(99)
            .build()
            .unwrap();
        assert_eq!(
            text,
            "DELETE FROM t USING TIMESTAMP 99 IF version = ? WHERE id = ?"
        );
        assert_eq!(values, vec![Value::Int(3), Value::Int(1)]);
    }

    #[test]
    fn test_if_after_conditions_conflicts() {
        let err = Delete::new("t")
            .if_("a = ?", (1,))
            .unwrap()
            .if_exists()
            .unwrap_err();
        assert!(matches!(err, Error::QueryBuilder(_)));
    }

    #[test]
    fn test_delete_without_where_is_allowed() {
        let (text, values) = Delete::new("t").build().unwrap();
        assert_eq!(text, "DELETE FROM t");
        assert!(values.is_empty());
    }
}
