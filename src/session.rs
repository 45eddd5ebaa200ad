//! Boundary with the driver session that talks to the cluster.
//!
//! This crate does not open connections: it hands statements and serialized
//! parameters to a [`Session`] implementation and decodes what comes back.

mod batch;
mod profile;

use core::future::Future;

use tracing::debug;
use uuid::Uuid;

pub use batch::{Batch, BatchType};
pub use profile::{Consistency, ExecutionProfile, SerialConsistency};

use crate::encoding::{BindValues, ColumnType, SerializedValues};
use crate::errors::Error;
use crate::results::{QueryResult, RowCursor};

#[derive(Debug, Clone, PartialEq, Eq)]
/// An unprepared statement.
pub struct Query {
    /// Statement text.
    text: String,
    /// Execution profile passed to the session.
    profile: Option<ExecutionProfile>,
}

impl Query {
    /// Creates a statement from its text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            profile: None,
        }
    }

    /// Attaches an execution profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ExecutionProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Returns the statement text.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the execution profile.
    #[inline]
    #[must_use]
    pub fn profile(&self) -> Option<&ExecutionProfile> {
        self.profile.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A statement prepared by the server, identified by an opaque handle.
pub struct PreparedStatement {
    /// Server-side handle.
    id: Vec<u8>,
    /// Statement text.
    text: String,
    /// Execution profile passed to the session.
    profile: Option<ExecutionProfile>,
}

impl PreparedStatement {
    /// Creates a prepared statement from its server-side handle and text.
    #[must_use]
    pub fn new(id: Vec<u8>, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            profile: None,
        }
    }

    /// Attaches an execution profile.
    #[must_use]
    pub fn with_profile(mut self, profile: ExecutionProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Returns the server-side handle.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Returns the statement text.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the execution profile.
    #[inline]
    #[must_use]
    pub fn profile(&self) -> Option<&ExecutionProfile> {
        self.profile.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A statement the session can execute.
pub enum Statement {
    /// Plain statement text.
    Query(Query),
    /// A prepared statement handle.
    Prepared(PreparedStatement),
}

impl Statement {
    /// Returns the statement text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Statement::Query(query) => query.text(),
            Statement::Prepared(prepared) => prepared.text(),
        }
    }

    /// Returns the execution profile.
    #[must_use]
    pub fn profile(&self) -> Option<&ExecutionProfile> {
        match self {
            Statement::Query(query) => query.profile(),
            Statement::Prepared(prepared) => prepared.profile(),
        }
    }
}

impl From<Query> for Statement {
    fn from(query: Query) -> Self {
        Statement::Query(query)
    }
}

impl From<PreparedStatement> for Statement {
    fn from(prepared: PreparedStatement) -> Self {
        Statement::Prepared(prepared)
    }
}

impl From<&str> for Statement {
    fn from(text: &str) -> Self {
        Statement::Query(Query::new(text))
    }
}

impl From<String> for Statement {
    fn from(text: String) -> Self {
        Statement::Query(Query::new(text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Name and type of a result column.
pub struct ColumnSpec {
    /// Column name, as projected.
    pub name: String,
    /// Column type.
    pub typ: ColumnType,
}

impl ColumnSpec {
    /// Creates a column spec.
    #[must_use]
    pub fn new(name: impl Into<String>, typ: ColumnType) -> Self {
        Self {
            name: name.into(),
            typ,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Opaque server token resuming a paged read.
pub struct PagingState(Vec<u8>);

impl PagingState {
    /// Wraps a token returned by the server.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the token bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Asks the session for one page of rows.
pub struct PageRequest {
    /// Maximum number of rows in the page, the session default when `None`.
    pub page_size: Option<i32>,
    /// Where to resume, `None` for the first page.
    pub paging_state: Option<PagingState>,
}

/// The cells of one row, `None` for null cells.
pub type RawRow = Vec<Option<Vec<u8>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A response as returned by the session, before decoding.
pub struct RawResult {
    /// Result columns. Empty for responses without rows.
    pub col_specs: Vec<ColumnSpec>,
    /// Rows, `None` when the response has no rows body.
    pub rows: Option<Vec<RawRow>>,
    /// Token for the next page, `None` on the last page.
    pub paging_state: Option<PagingState>,
    /// Tracing session id, when tracing was requested.
    pub tracing_id: Option<Uuid>,
    /// Warnings sent by the server.
    pub warnings: Vec<String>,
}

impl RawResult {
    /// A response without rows, as returned for most writes.
    #[must_use]
    pub fn void() -> Self {
        Self::default()
    }

    /// A response carrying rows.
    #[must_use]
    pub fn with_rows(col_specs: Vec<ColumnSpec>, rows: Vec<RawRow>) -> Self {
        Self {
            col_specs,
            rows: Some(rows),
            ..Self::default()
        }
    }

    /// Sets the token of the next page.
    #[must_use]
    pub fn with_paging_state(mut self, paging_state: PagingState) -> Self {
        self.paging_state = Some(paging_state);
        self
    }
}

/// A connection to the cluster, provided by the driver.
///
/// Implementations own networking, pooling, routing and retries. Errors
/// returned by the server are reported as [`Error::Database`] with the
/// server's code and message unchanged.
pub trait Session: Sync {
    /// Executes a statement with serialized parameters.
    ///
    /// `paging` is `None` for an unpaged request; otherwise it asks for a
    /// single page, starting where the given paging state points.
    fn execute(
        &self,
        statement: &Statement,
        values: &SerializedValues,
        paging: Option<PageRequest>,
    ) -> impl Future<Output = Result<RawResult, Error>> + Send;

    /// Prepares a statement and returns its server-side handle.
    fn prepare(&self, text: &str) -> impl Future<Output = Result<PreparedStatement, Error>> + Send;

    /// Executes a batch.
    fn batch(&self, batch: &Batch) -> impl Future<Output = Result<RawResult, Error>> + Send;
}

/// Conveniences available on every [`Session`].
pub trait SessionExt: Session {
    /// Binds `values`, executes `statement` and collects the whole result.
    ///
    /// # Errors
    ///
    /// * `Binding` - If a value cannot be bound.
    /// * Any error reported by the session.
    fn query(
        &self,
        statement: impl Into<Statement>,
        values: impl BindValues,
    ) -> impl Future<Output = Result<QueryResult, Error>> + Send {
        let statement = statement.into();
        let values = serialize_params(&values);
        async move {
            let values = values?;
            debug!(
                statement = statement.text(),
                values = values.len(),
                paged = false,
                "executing statement"
            );
            let raw = self.execute(&statement, &values, None).await?;
            Ok(QueryResult::new(raw))
        }
    }

    /// Binds `values`, executes `statement` and returns a paged cursor.
    ///
    /// # Errors
    ///
    /// * `Binding` - If a value cannot be bound.
    /// * Any error reported by the session while fetching the first page.
    fn query_paged(
        &self,
        statement: impl Into<Statement>,
        values: impl BindValues,
    ) -> impl Future<Output = Result<RowCursor<'_, Self>, Error>> + Send
    where
        Self: Sized,
    {
        let statement = statement.into();
        let values = serialize_params(&values);
        async move {
            let values = values?;
            debug!(
                statement = statement.text(),
                values = values.len(),
                paged = true,
                "executing statement"
            );
            RowCursor::open(self, statement, values).await
        }
    }

    /// Executes a batch and collects its result.
    ///
    /// # Errors
    ///
    /// Any error reported by the session.
    fn run_batch(&self, batch: &Batch) -> impl Future<Output = Result<QueryResult, Error>> + Send {
        async move {
            debug!(
                batch_type = ?batch.batch_type(),
                statements = batch.len(),
                "executing batch"
            );
            let raw = self.batch(batch).await?;
            Ok(QueryResult::new(raw))
        }
    }

    /// Prepares a statement, logging the request.
    ///
    /// # Errors
    ///
    /// Any error reported by the session.
    fn prepare_statement(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<PreparedStatement, Error>> + Send {
        async move {
            debug!(statement = text, "preparing statement");
            self.prepare(text).await
        }
    }
}

impl<S: Session> SessionExt for S {}

/// Binds and serializes a parameter list.
fn serialize_params(values: &impl BindValues) -> Result<SerializedValues, Error> {
    Ok(SerializedValues::from_values(&values.bind_values()?)?)
}
