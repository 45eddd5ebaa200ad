//! Submodule defining the trait shared by all statement builders.

use core::future::Future;

use tracing::debug;

use crate::encoding::{SerializedValues, Value};
use crate::errors::Error;
use crate::results::{QueryResult, RowCursor};
use crate::session::{Batch, ExecutionProfile, Query, Session, Statement};

/// A builder producing a CQL statement and its parameters.
pub trait QueryBuilder: Sync {
    /// Returns the statement text and its parameters, in placeholder order.
    ///
    /// Building does not consume or change the builder: calling it twice
    /// returns the same result.
    ///
    /// # Errors
    ///
    /// * `QueryBuilder` - If the builder state cannot form a valid statement.
    fn build(&self) -> Result<(String, Vec<Value>), Error>;

    /// Returns the execution profile attached to the builder, if any.
    fn profile(&self) -> Option<&ExecutionProfile>;

    /// Builds the statement and serializes its parameters for the session.
    ///
    /// # Errors
    ///
    /// * `QueryBuilder` - If [`build`](Self::build) fails.
    /// * `Binding` - If a parameter cannot be serialized.
    fn statement(&self) -> Result<(Statement, SerializedValues), Error> {
        let (text, values) = self.build()?;
        let mut query = Query::new(text);
        if let Some(profile) = self.profile() {
            query = query.with_profile(profile.clone());
        }
        Ok((query.into(), SerializedValues::from_values(&values)?))
    }

    /// Executes the statement and collects the whole result.
    ///
    /// # Errors
    ///
    /// * Any error of [`statement`](Self::statement).
    /// * Any error reported by the session, such as a `Database` error.
    fn execute<S: Session>(
        &self,
        session: &S,
    ) -> impl Future<Output = Result<QueryResult, Error>> + Send {
        let prepared = self.statement();
        async move {
            let (statement, values) = prepared?;
            debug!(
                statement = statement.text(),
                values = values.len(),
                paged = false,
                "executing statement"
            );
            let raw = session.execute(&statement, &values, None).await?;
            Ok(QueryResult::new(raw))
        }
    }

    /// Executes the statement and returns a cursor fetching rows one page at a time.
    ///
    /// # Errors
    ///
    /// * Any error of [`statement`](Self::statement).
    /// * Any error reported by the session while fetching the first page.
    fn execute_paged<'s, S: Session>(
        &self,
        session: &'s S,
    ) -> impl Future<Output = Result<RowCursor<'s, S>, Error>> + Send {
        let prepared = self.statement();
        async move {
            let (statement, values) = prepared?;
            debug!(
                statement = statement.text(),
                values = values.len(),
                paged = true,
                "executing statement"
            );
            RowCursor::open(session, statement, values).await
        }
    }

    /// Appends the statement to a batch.
    ///
    /// # Errors
    ///
    /// * Any error of [`statement`](Self::statement).
    fn add_to_batch(&self, batch: &mut Batch) -> Result<(), Error> {
        let (statement, values) = self.statement()?;
        batch.push_serialized(statement, values);
        Ok(())
    }
}
