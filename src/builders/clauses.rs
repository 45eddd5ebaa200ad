//! Clauses shared by several statement kinds.

use core::time::Duration;

use super::fragment::{Fragment, Fragments};
use crate::encoding::Value;
use crate::errors::QueryBuilderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Sort direction of an `ORDER BY` column.
pub enum Order {
    /// `ASC`
    #[default]
    Asc,
    /// `DESC`
    Desc,
}

impl Order {
    /// Returns the CQL keyword.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IfClause {
    Exists,
    Conditions(Fragments),
}

/// The `IF` clause of a lightweight transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Condition(Option<IfClause>);

impl Condition {
    /// Switches to `IF EXISTS`.
    pub(crate) fn require_exists(&mut self) -> Result<(), QueryBuilderError> {
        match self.0 {
            Some(IfClause::Conditions(_)) => Err(QueryBuilderError::ConflictingConditions),
            _ => {
                self.0 = Some(IfClause::Exists);
                Ok(())
            }
        }
    }

    /// Adds a condition, combined with the previous ones with `AND`.
    pub(crate) fn push(&mut self, fragment: Fragment) -> Result<(), QueryBuilderError> {
        match &mut self.0 {
            Some(IfClause::Exists) => Err(QueryBuilderError::ConflictingConditions),
            Some(IfClause::Conditions(fragments)) => {
                fragments.push(fragment);
                Ok(())
            }
            None => {
                self.0 = Some(IfClause::Conditions(fragment.into()));
                Ok(())
            }
        }
    }

    pub(crate) fn render(&self) -> String {
        match &self.0 {
            None => String::new(),
            Some(IfClause::Exists) => "IF EXISTS".to_owned(),
            Some(IfClause::Conditions(fragments)) => format!("IF {}", fragments.text()),
        }
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        match &self.0 {
            Some(IfClause::Conditions(fragments)) => Some(fragments.values()),
            _ => None,
        }
        .into_iter()
        .flatten()
    }
}

/// Renders a duration with the largest CQL unit that represents it exactly.
pub(crate) fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos % 1_000_000 == 0 {
        format!("{}ms", duration.as_millis())
    } else if nanos % 1_000 == 0 {
        format!("{}us", duration.as_micros())
    } else {
        format!("{nanos}ns")
    }
}

/// The `USING` clause: write timestamp, time to live and server-side timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Using {
    pub(crate) timestamp: Option<i64>,
    pub(crate) ttl: Option<u32>,
    pub(crate) timeout: Option<Duration>,
}

impl Using {
    pub(crate) fn render(&self) -> String {
        let mut parts = Vec::new();
        if let Some(timestamp) = self.timestamp {
            parts.push(format!("TIMESTAMP {timestamp}"));
        }
        if let Some(ttl) = self.ttl {
            parts.push(format!("TTL {ttl}"));
        }
        if let Some(timeout) = self.timeout {
            parts.push(format!("TIMEOUT {}", format_duration(timeout)));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("USING {}", parts.join(" AND "))
        }
    }
}
