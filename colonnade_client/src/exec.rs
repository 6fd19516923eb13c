//! Statement execution
//!
//! [`Operation`] is one configured, not-yet-run statement paired with the
//! result shape the caller declared. It offers four ways to run, all with
//! identical semantics for policy, translation, and shape reduction:
//! awaited ([`execute`][Operation::execute]), detached
//! ([`execute_async`][Operation::execute_async]), callback-driven
//! ([`execute_with_callback`][Operation::execute_with_callback]), and
//! deadline-bounded ([`execute_nonstop`][Operation::execute_nonstop]).
//!
//! Transport failures are translated exactly once, at the point where the
//! round trip completes. Everything downstream (shape reduction, derived
//! futures, callbacks, timed waits) only ever sees the translated outcome.

use std::fmt;
use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use colonnade_transport::{BoundStatement, CqlTransport};
use colonnade_types::ResultSet;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::translate;

type Reducer<R> = Arc<dyn Fn(ResultSet) -> Result<R> + Send + Sync>;

/// One configured execution of a frozen [`BoundStatement`]
///
/// The operation owns its statement; nothing can reconfigure it once built.
/// `R` is the declared result shape (`ResultSet`, `Option<Row>`, `i64`,
/// `bool`, or `()`); the reduction to `R` runs inside every execution mode,
/// after translation.
pub struct Operation<R> {
    transport: Arc<dyn CqlTransport>,
    statement: BoundStatement,
    reduce: Reducer<R>,
    runtime: Option<Handle>,
}

impl<R: Send + 'static> Operation<R> {
    pub(crate) fn new(
        transport: Arc<dyn CqlTransport>,
        statement: BoundStatement,
        runtime: Option<Handle>,
        reduce: Reducer<R>,
    ) -> Self {
        Self {
            transport,
            statement,
            reduce,
            runtime,
        }
    }

    /// The frozen statement this operation will run
    pub fn statement(&self) -> &BoundStatement {
        &self.statement
    }

    /// Run the statement and wait for its outcome
    ///
    /// Transport failures come back translated; non-transport failures pass
    /// through as [`Error::Untranslated`].
    pub async fn execute(&self) -> Result<R> {
        debug!(statement = ?self.statement.kind, "executing statement");
        let rows = round_trip(&*self.transport, &self.statement).await?;
        (self.reduce)(rows)
    }

    /// Submit the statement and return immediately
    ///
    /// The round trip runs on the configured runtime (or the ambient tokio
    /// runtime); the returned [`ExecFuture`] is the only handle to the
    /// outcome. Dropping it abandons observation, not the request.
    pub fn execute_async(&self) -> ExecFuture<R> {
        let transport = Arc::clone(&self.transport);
        let statement = self.statement.clone();
        let reduce = Arc::clone(&self.reduce);
        let handle = self.handle();

        debug!(statement = ?self.statement.kind, "submitting statement");
        let join = handle.spawn(async move {
            let rows = round_trip(&*transport, &statement).await?;
            reduce(rows)
        });

        let outcome = async move {
            match join.await {
                Ok(outcome) => outcome,
                Err(err) if err.is_panic() => panic::resume_unwind(err.into_panic()),
                Err(_) => Err(Error::ExecutorShutdown),
            }
        };
        ExecFuture {
            inner: outcome.boxed(),
            handle,
        }
    }

    /// Submit the statement and deliver the outcome to `callback`
    ///
    /// The callback fires exactly once, on an executor thread, with the
    /// already-translated outcome, failures included.
    pub fn execute_with_callback(&self, callback: impl FnOnce(Result<R>) + Send + 'static) {
        self.execute_async().on_complete(callback);
    }

    /// Run the statement, waiting at most `timeout` for the outcome
    ///
    /// On expiry this returns [`Error::Timeout`] and stops waiting, but the
    /// in-flight request is not cancelled: it keeps consuming transport
    /// resources until it completes on its own. Treat a timeout as "outcome
    /// unknown", never as "operation cancelled".
    pub async fn execute_nonstop(&self, timeout: Duration) -> Result<R> {
        self.execute_async().get_timeout(timeout).await
    }

    fn handle(&self) -> Handle {
        match &self.runtime {
            Some(handle) => handle.clone(),
            None => Handle::current(),
        }
    }
}

impl<R> fmt::Debug for Operation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("statement", &self.statement)
            .finish_non_exhaustive()
    }
}

/// Run one round trip against the transport, translating at the boundary
async fn round_trip(
    transport: &dyn CqlTransport,
    statement: &BoundStatement,
) -> Result<ResultSet> {
    transport.execute(statement).await.map_err(|raw| {
        let err = translate::translate_or_passthrough(raw);
        if matches!(err, Error::Uncategorized { .. }) {
            warn!(%err, "transport error did not match any category");
        }
        err
    })
}

/// The pending outcome of a submitted statement
///
/// Exactly one terminal outcome exists per submission, and ownership of the
/// wrapper is the right to observe it: blocking on [`get`][Self::get],
/// waiting with a bound via [`get_timeout`][Self::get_timeout], registering
/// a callback via [`on_complete`][Self::on_complete], deriving a transformed
/// future via [`map`][Self::map], or awaiting it directly. Each consumes
/// the wrapper, so no two observers can disagree about the outcome.
pub struct ExecFuture<R> {
    inner: BoxFuture<'static, Result<R>>,
    handle: Handle,
}

impl<R: Send + 'static> ExecFuture<R> {
    /// Wait for the outcome
    pub async fn get(self) -> Result<R> {
        self.inner.await
    }

    /// Wait for the outcome, at most `timeout`
    ///
    /// Expiry yields [`Error::Timeout`] and leaves the in-flight request
    /// untouched.
    pub async fn get_timeout(self, timeout: Duration) -> Result<R> {
        match tokio::time::timeout(timeout, self.inner).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::Timeout { timeout }),
        }
    }

    /// Derive a future that transforms a successful outcome
    ///
    /// Failures propagate from the original wrapper untouched. Translation
    /// happened there and is never re-applied, so transform layers cannot
    /// double-wrap a cause.
    pub fn map<U, F>(self, transform: F) -> ExecFuture<U>
    where
        U: Send + 'static,
        F: FnOnce(R) -> Result<U> + Send + 'static,
    {
        ExecFuture {
            inner: self.inner.map(|outcome| outcome.and_then(transform)).boxed(),
            handle: self.handle,
        }
    }

    /// Register the single callback for this outcome
    ///
    /// Fires exactly once, on an executor thread, with the translated
    /// outcome.
    pub fn on_complete(self, callback: impl FnOnce(Result<R>) + Send + 'static) {
        let inner = self.inner;
        self.handle.spawn(async move { callback(inner.await) });
    }
}

impl<R> Future for ExecFuture<R> {
    type Output = Result<R>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl<R> fmt::Debug for ExecFuture<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecFuture").finish_non_exhaustive()
    }
}
