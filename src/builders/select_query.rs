//! Submodule defining a builder for SELECT statements.

use core::time::Duration;

use super::clauses::{Order, Using};
use super::fragment::{Fragment, Fragments, join_clauses};
use super::query_builder::QueryBuilder;
use crate::encoding::{BindValues, Value};
use crate::errors::Error;
use crate::session::ExecutionProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Builder for a SELECT statement.
///
/// # Example
///
/// ```
/// use scylla_query_rs::{Order, QueryBuilder, Select, Value};
///
/// let (text, values) = Select::new("events")
///     .only(["kind", "at"])
///     .r#where("day = ?", ("2024-01-01",))?
///     .order_by("at", Order::Desc)
///     .limit(10)
///     .build()?;
///
/// assert_eq!(
///     text,
///     "SELECT kind, at FROM events WHERE day = ? ORDER BY at DESC LIMIT 10"
/// );
/// assert_eq!(values, vec![Value::from("2024-01-01")]);
/// # Ok::<(), scylla_query_rs::Error>(())
/// ```
pub struct Select {
    /// The table being read.
    table: String,
    /// Whether to add `DISTINCT`.
    distinct: bool,
    /// Projected columns, `*` when empty.
    columns: Vec<String>,
    /// WHERE conditions.
    where_clauses: Fragments,
    /// GROUP BY columns.
    group_by: Vec<String>,
    /// ORDER BY columns.
    order_by: Vec<(String, Order)>,
    /// PER PARTITION LIMIT.
    per_partition_limit: Option<u32>,
    /// LIMIT.
    limit: Option<u32>,
    /// Whether to add `ALLOW FILTERING`.
    allow_filtering: bool,
    /// Whether to add `BYPASS CACHE`.
    bypass_cache: bool,
    /// USING TIMEOUT.
    timeout: Option<Duration>,
    /// Execution profile passed to the session.
    profile: Option<ExecutionProfile>,
}

impl Select {
    /// Creates a builder selecting every column of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            distinct: false,
            columns: Vec::new(),
            where_clauses: Fragments::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            per_partition_limit: None,
            limit: None,
            allow_filtering: false,
            bypass_cache: false,
            timeout: None,
            profile: None,
        }
    }

    /// Returns the table name.
    #[inline]
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Adds columns to the projection. Expressions and aliases such as
    /// `"name AS n"` or `"count(*)"` are passed through as written.
    #[must_use]
    pub fn only<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Selects only distinct partition keys.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a WHERE condition. Conditions are combined with `AND`.
    ///
    /// # Arguments
    ///
    /// * `clause` - The condition, e.g. `"id = ?"`.
    /// * `values` - The values of its placeholders.
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

    /// Adds a GROUP BY column.
    #[must_use]
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Adds an ORDER BY column.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.order_by.push((column.into(), order));
        self
    }

    /// Limits the number of rows returned for each partition.
    #[must_use]
    pub fn per_partition_limit(mut self, limit: u32) -> Self {
        self.per_partition_limit = Some(limit);
        self
    }

    /// Limits the number of rows returned.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Adds `ALLOW FILTERING`.
    #[must_use]
    pub fn allow_filtering(mut self) -> Self {
        self.allow_filtering = true;
        self
    }

    /// Adds `BYPASS CACHE`.
    #[must_use]
    pub fn bypass_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }

    /// Sets a server-side timeout with `USING TIMEOUT`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches an execution profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ExecutionProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    fn render(&self) -> String {
        let projection = if self.columns.is_empty() {
            "*".to_owned()
        } else {
            self.columns.join(", ")
        };
        let where_clause = if self.where_clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.where_clauses.text())
        };
        let group_by = if self.group_by.is_empty() {
            String::new()
        } else {
            format!("GROUP BY {}", self.group_by.join(", "))
        };
        let order_by = if self.order_by.is_empty() {
            String::new()
        } else {
            let columns: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, order)| format!("{column} {}", order.as_str()))
                .collect();
            format!("ORDER BY {}", columns.join(", "))
        };
        let per_partition_limit = self
            .per_partition_limit
            .map(|limit| format!("PER PARTITION LIMIT {limit}"))
            .unwrap_or_default();
        let limit = self
            .limit
            .map(|limit| format!("LIMIT {limit}"))
            .unwrap_or_default();
        let using = Using {
            timeout: self.timeout,
            ..Using::default()
        }
        .render();

        join_clauses([
            "SELECT",
            if self.distinct { "DISTINCT" } else { "" },
            projection.as_str(),
            "FROM",
            self.table.as_str(),
            where_clause.as_str(),
            group_by.as_str(),
            order_by.as_str(),
            per_partition_limit.as_str(),
            limit.as_str(),
            if self.allow_filtering {
                "ALLOW FILTERING"
            } else {
                ""
            },
            if self.bypass_cache { "BYPASS CACHE" } else { "" },
            using.as_str(),
        ])
    }
}

impl QueryBuilder for Select {
    fn build(&self) -> Result<(String, Vec<Value>), Error> {
        Ok((self.render(), self.where_clauses.values().cloned().collect()))
    }

    fn profile(&self) -> Option<&ExecutionProfile> {
        self.profile.as_ref()
    }
}
