//! Test doubles for the Colonnade execution layer
//!
//! [`StubTransport`] is a programmable in-process [`CqlTransport`]: tests
//! queue canned responses (rows or raw failures), optionally inject latency,
//! and inspect the statements that reached the wire boundary. An
//! unprogrammed call yields an empty result set, which keeps effect-only
//! statements (updates, DDL) out of the way in tests that don't care about
//! their responses.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use colonnade_transport::{
    BoundStatement, CqlTransport, PreparedId, PreparedStatement, RawError,
};
use colonnade_types::ResultSet;

/// A scripted transport for driving the execution layer in tests
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<ResultSet, RawError>>>,
    delay: Mutex<Option<Duration>>,
    executed: Mutex<Vec<BoundStatement>>,
    completed: Notify,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn push_rows(&self, rows: ResultSet) {
        self.responses.lock().push_back(Ok(rows));
    }

    /// Queue a failure, raised as the transport-native error `err`
    pub fn push_failure(&self, err: impl std::error::Error + Send + Sync + 'static) {
        self.responses.lock().push_back(Err(Box::new(err)));
    }

    /// Delay every subsequent `execute` call by `delay`
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Statements whose round trip has completed, in completion order
    pub fn executed(&self) -> Vec<BoundStatement> {
        self.executed.lock().clone()
    }

    pub fn executed_count(&self) -> usize {
        self.executed.lock().len()
    }

    /// Wait until at least `count` round trips have completed
    ///
    /// Lets tests observe abandoned (timed-out) requests running to their
    /// natural completion in the background.
    pub async fn wait_for_executions(&self, count: usize) {
        loop {
            if self.executed_count() >= count {
                return;
            }
            let notified = self.completed.notified();
            if self.executed_count() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl CqlTransport for StubTransport {
    async fn execute(&self, statement: &BoundStatement) -> Result<ResultSet, RawError> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ResultSet::empty()));

        // recorded only once the round trip is complete
        self.executed.lock().push(statement.clone());
        self.completed.notify_waiters();
        response
    }

    async fn prepare(&self, cql: &str) -> Result<PreparedStatement, RawError> {
        Ok(PreparedStatement::new(PreparedId::new(), cql))
    }
}
