//! Submodule defining batches of statements executed together.

use super::{ExecutionProfile, Statement};
use crate::encoding::{BindValues, SerializedValues};
use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Kind of a batch.
pub enum BatchType {
    /// Atomic batch, written to the batch log first.
    Logged,
    /// Non-atomic batch.
    #[default]
    Unlogged,
    /// Batch of counter updates.
    Counter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Statements executed together, each with its own parameters.
///
/// Builders add themselves with
/// [`QueryBuilder::add_to_batch`](crate::QueryBuilder::add_to_batch).
pub struct Batch {
    /// Kind of the batch.
    batch_type: BatchType,
    /// Statements, in execution order.
    statements: Vec<Statement>,
    /// Parameters of each statement.
    values: Vec<SerializedValues>,
    /// Execution profile passed to the session.
    profile: Option<ExecutionProfile>,
}

impl Batch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new(batch_type: BatchType) -> Self {
        Self {
            batch_type,
            ..Self::default()
        }
    }

    /// Attaches an execution profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ExecutionProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Returns the kind of the batch.
    #[inline]
    #[must_use]
    pub fn batch_type(&self) -> BatchType {
        self.batch_type
    }

    /// Returns the execution profile.
    #[inline]
    #[must_use]
    pub fn profile(&self) -> Option<&ExecutionProfile> {
        self.profile.as_ref()
    }

    /// Appends a statement with its parameters.
    ///
    /// # Errors
    ///
    /// * `Binding` - If a value cannot be bound.
    pub fn add_statement(
        &mut self,
        statement: impl Into<Statement>,
        values: impl BindValues,
    ) -> Result<(), Error> {
        let values = SerializedValues::from_values(&values.bind_values()?)?;
        self.push_serialized(statement.into(), values);
        Ok(())
    }

    pub(crate) fn push_serialized(&mut self, statement: Statement, values: SerializedValues) {
        self.statements.push(statement);
        self.values.push(values);
    }

    /// Returns the number of statements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns whether the batch has no statements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterates over the statements and their parameters.
    pub fn entries(&self) -> impl Iterator<Item = (&Statement, &SerializedValues)> {
        self.statements.iter().zip(&self.values)
    }
}
