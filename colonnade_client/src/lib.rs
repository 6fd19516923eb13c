//! Execution layer for a distributed row-oriented store
//!
//! This crate sits between application code and a wire driver implementing
//! [`CqlTransport`]. It owns three concerns the driver does not:
//!
//! - **Statement construction**: [`StatementBuilder`] freezes a template
//!   (raw text or a prepared handle), its bound parameters, and the
//!   per-statement policies (consistency, retry, tracing) into an immutable
//!   [`BoundStatement`].
//! - **Execution**: [`Operation`] runs a frozen statement in one of four
//!   equivalent modes: awaited, detached future, callback, or bounded by a
//!   deadline. The declared result shape (all rows, one optional row, a
//!   scalar count, an existence flag) is reduced identically in every mode.
//! - **Failure normalization**: every transport-native error is translated
//!   once, at the point it first surfaces, into the closed taxonomy in
//!   [`Error`]; non-transport errors pass through untouched. See
//!   [`translate`].
//!
//! # Example
//!
//! ```
//! # use std::sync::Arc;
//! # use colonnade_client::{Client, RowExpectation};
//! # use colonnade_test_helpers::StubTransport;
//! # use colonnade_types::{ConsistencyLevel, ResultSet, RetryPolicy, Value};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let transport = Arc::new(StubTransport::new());
//! transport.push_rows(ResultSet::new(["id"], [vec![Value::BigInt(7)]]));
//!
//! let client = Client::new(transport);
//! let statement = client
//!     .statement("SELECT id FROM users WHERE id = 7")
//!     .consistency(ConsistencyLevel::One)
//!     .retry_policy(RetryPolicy::DowngradingConsistency)
//!     .build()?;
//! let row = client
//!     .query_one(statement, RowExpectation::Single)
//!     .execute()
//!     .await?;
//! assert!(row.is_some());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod exec;
pub mod policy;
pub mod reduce;
pub mod statement;
pub mod translate;

use std::sync::Arc;

use colonnade_transport::{BoundStatement, CqlTransport, PreparedStatement};
use colonnade_types::{ResultSet, Row, Value};
use tokio::runtime::Handle;
use tracing::debug;

pub use crate::error::{Error, Result};
pub use crate::exec::{ExecFuture, Operation};
pub use crate::reduce::RowExpectation;
pub use crate::statement::{Binder, StatementBuilder};
pub use crate::translate::translate;

type Reducer<R> = Arc<dyn Fn(ResultSet) -> Result<R> + Send + Sync>;

/// Entry point for building and executing statements against one transport
///
/// Cheap to clone; the transport and configuration are shared. The client
/// introduces no threads of its own: detached executions are spawned onto
/// the runtime configured with [`with_runtime`][Self::with_runtime], or the
/// ambient tokio runtime otherwise.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn CqlTransport>,
    runtime: Option<Handle>,
}

impl Client {
    /// Create a [`Client`] over the given transport
    pub fn new(transport: Arc<dyn CqlTransport>) -> Self {
        Self {
            transport,
            runtime: None,
        }
    }

    /// Use `handle` for detached executions and callback delivery
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Start a statement from raw query text with no parameters
    pub fn statement(&self, cql: impl Into<String>) -> StatementBuilder {
        StatementBuilder::raw(cql, vec![])
    }

    /// Start a statement from raw query text with ordered parameter values
    pub fn statement_with_values(
        &self,
        cql: impl Into<String>,
        values: Vec<Value>,
    ) -> StatementBuilder {
        StatementBuilder::raw(cql, values)
    }

    /// Start a statement from a prepared template with no parameters
    pub fn prepared(&self, statement: PreparedStatement) -> StatementBuilder {
        StatementBuilder::prepared(statement)
    }

    /// Start a statement from a prepared template bound by `binder`
    pub fn prepared_with(
        &self,
        statement: PreparedStatement,
        binder: impl Binder + 'static,
    ) -> StatementBuilder {
        StatementBuilder::prepared_with(statement, binder)
    }

    /// Register a statement template with the transport
    ///
    /// Transport failures are translated like execution failures.
    pub async fn prepare(&self, cql: &str) -> Result<PreparedStatement> {
        debug!(cql, "preparing statement");
        self.transport
            .prepare(cql)
            .await
            .map_err(translate::translate_or_passthrough)
    }

    /// An operation producing the full result set
    pub fn query(&self, statement: BoundStatement) -> Operation<ResultSet> {
        self.operation(statement, Arc::new(|rows| Ok(rows)))
    }

    /// An operation reduced to zero or one row under `expectation`
    pub fn query_one(
        &self,
        statement: BoundStatement,
        expectation: RowExpectation,
    ) -> Operation<Option<Row>> {
        self.operation(
            statement,
            Arc::new(move |rows| reduce::single_row(rows, expectation)),
        )
    }

    /// An operation reduced to a scalar count
    pub fn count(&self, statement: BoundStatement) -> Operation<i64> {
        self.operation(statement, Arc::new(reduce::scalar_i64))
    }

    /// An operation reduced to an existence flag
    pub fn exists(&self, statement: BoundStatement) -> Operation<bool> {
        self.operation(statement, Arc::new(reduce::exists))
    }

    /// An operation executed for its effect; any rows are discarded
    pub fn update(&self, statement: BoundStatement) -> Operation<()> {
        self.operation(statement, Arc::new(|_rows| Ok(())))
    }

    fn operation<R: Send + 'static>(
        &self,
        statement: BoundStatement,
        reduce: Reducer<R>,
    ) -> Operation<R> {
        Operation::new(
            Arc::clone(&self.transport),
            statement,
            self.runtime.clone(),
            reduce,
        )
    }
}

#[cfg(test)]
mod tests {
    use colonnade_test_helpers::StubTransport;
    use colonnade_transport::NativeConsistency;
    use colonnade_types::ConsistencyLevel;
    use pretty_assertions::assert_eq;

    use super::*;

    fn client_over(stub: &Arc<StubTransport>) -> Client {
        Client::new(Arc::clone(stub) as Arc<dyn CqlTransport>)
    }

    #[test_log::test(tokio::test)]
    async fn statement_configuration_reaches_the_transport() {
        let stub = Arc::new(StubTransport::new());
        let client = client_over(&stub);

        let statement = client
            .statement("SELECT * FROM users")
            .consistency(ConsistencyLevel::Quorum)
            .enable_tracing()
            .build()
            .unwrap();
        client.query(statement).execute().await.unwrap();

        let executed = stub.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].consistency, Some(NativeConsistency::Quorum));
        assert_eq!(executed[0].tracing, Some(true));
        assert_eq!(executed[0].retry_policy, None);
    }

    #[test_log::test(tokio::test)]
    async fn scalar_shapes_reduce_uniformly() {
        let stub = Arc::new(StubTransport::new());
        let client = client_over(&stub);

        stub.push_rows(ResultSet::new(["count"], [vec![Value::BigInt(12)]]));
        let statement = client.statement("SELECT COUNT(*) FROM users").build().unwrap();
        assert_eq!(client.count(statement).execute().await.unwrap(), 12);

        stub.push_rows(ResultSet::new(["id"], [vec![Value::BigInt(1)]]));
        let statement = client
            .statement("SELECT id FROM users WHERE id = 1")
            .build()
            .unwrap();
        assert!(client.exists(statement).execute().await.unwrap());

        // unprogrammed stub responses are empty result sets
        let statement = client
            .statement("UPDATE users SET name = 'ada' WHERE id = 1")
            .build()
            .unwrap();
        client.update(statement).execute().await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn prepare_round_trips_through_the_transport() {
        let stub = Arc::new(StubTransport::new());
        let client = client_over(&stub);

        let prepared = client
            .prepare("SELECT * FROM users WHERE id = ?")
            .await
            .unwrap();
        assert_eq!(prepared.cql(), "SELECT * FROM users WHERE id = ?");

        let statement = client.prepared(prepared).build().unwrap();
        client.query(statement).execute().await.unwrap();
        assert_eq!(stub.executed().len(), 1);
    }
}
