//! Submodule defining a builder for UPDATE statements.

use core::time::Duration;

use super::clauses::{Condition, Using};
use super::fragment::{Fragment, Fragments, join_clauses};
use super::query_builder::QueryBuilder;
use crate::encoding::{BindValues, IndexMap, ToCql, Value};
use crate::errors::{Error, QueryBuilderError};
use crate::session::ExecutionProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssignmentKind {
    Set,
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    kind: AssignmentKind,
    value: Value,
}

impl Assignment {
    fn render(&self, column: &str) -> String {
        match self.kind {
            AssignmentKind::Set => format!("{column} = ?"),
            AssignmentKind::Increment => format!("{column} = {column} + ?"),
            AssignmentKind::Decrement => format!("{column} = {column} - ?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Builder for an UPDATE statement.
///
/// Parameters are bound in clause order: SET values, then IF values, then
/// WHERE values.
///
/// # Example
///
/// ```
/// use scylla_query_rs::{QueryBuilder, Update, Value};
///
/// let (text, values) = Update::new("users")
///     .set("name", "Grace")?
///     .r#where("id = ?", (1,))?
///     .if_("name = ?", ("Ada",))?
///     .build()?;
///
/// assert_eq!(text, "UPDATE users SET name = ? IF name = ? WHERE id = ?");
/// assert_eq!(
///     values,
///     vec![Value::from("Grace"), Value::from("Ada"), Value::Int(1)]
/// );
/// # Ok::<(), scylla_query_rs::Error>(())
/// ```
pub struct Update {
    /// The table being updated.
    table: String,
    /// Assignments, in first assignment order.
    assignments: IndexMap<String, Assignment>,
    /// WHERE conditions.
    where_clauses: Fragments,
    /// IF clause.
    condition: Condition,
    /// USING clause.
    using: Using,
    /// Execution profile passed to the session.
    profile: Option<ExecutionProfile>,
}

impl Update {
    /// Creates a builder updating `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: IndexMap::default(),
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

    fn assign(
        mut self,
        column: impl Into<String>,
        kind: AssignmentKind,
        value: &impl ToCql,
    ) -> Result<Self, Error> {
        let column = column.into();
        let value = value.to_cql()?;
        if kind == AssignmentKind::Set && value.is_counter() {
            return Err(QueryBuilderError::CounterAssignment(column).into());
        }
        self.assignments.insert(column, Assignment { kind, value });
        Ok(self)
    }

    /// Assigns `column = ?`. The last assignment of a column wins.
    ///
    /// # Errors
    ///
    /// * `Binding` - If the value cannot be bound.
    /// * `CounterAssignment` - If the value is a counter delta.
    pub fn set(self, column: impl Into<String>, value: impl ToCql) -> Result<Self, Error> {
        self.assign(column, AssignmentKind::Set, &value)
    }

    /// Assigns `column = column + ?`, for counters and collections.
    ///
    /// # Errors
    ///
    /// * `Binding` - If the value cannot be bound.
    pub fn inc(self, column: impl Into<String>, value: impl ToCql) -> Result<Self, Error> {
        self.assign(column, AssignmentKind::Increment, &value)
    }

    /// Assigns `column = column - ?`, for counters and collections.
    ///
    /// # Errors
    ///
    /// * `Binding` - If the value cannot be bound.
    pub fn dec(self, column: impl Into<String>, value: impl ToCql) -> Result<Self, Error> {
        self.assign(column, AssignmentKind::Decrement, &value)
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

    /// Only applies the update when the row exists.
    ///
    /// # Errors
    ///
    /// * `ConflictingConditions` - If IF conditions were already added.
    pub fn if_exists(mut self) -> Result<Self, Error> {
        self.condition.require_exists()?;
        Ok(self)
    }

    /// Sets the time to live of the written values, in seconds.
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

impl QueryBuilder for Update {
    fn build(&self) -> Result<(String, Vec<Value>), Error> {
        if self.assignments.is_empty() {
            return Err(QueryBuilderError::NoAssignments("UPDATE").into());
        }
        let assignments: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, assignment)| assignment.render(column))
            .collect();
        let set_clause = format!("SET {}", assignments.join(", "));
        let where_clause = if self.where_clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.where_clauses.text())
        };
        let using = self.using.render();
        let condition = self.condition.render();

        let text = join_clauses([
            "UPDATE",
            self.table.as_str(),
            using.as_str(),
            set_clause.as_str(),
            condition.as_str(),
            where_clause.as_str(),
        ]);
        let values = self
            .assignments
            .values()
            .map(|assignment| &assignment.value)
            .chain(self.condition.values())
            .chain(self.where_clauses.values())
            .cloned()
            .collect();
        Ok((text, values))
    }

    fn profile(&self) -> Option<&ExecutionProfile> {
        self.profile.as_ref()
    }
}
