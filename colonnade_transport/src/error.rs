//! The transport's native error family
//!
//! These are the failures a wire driver itself can raise. The execution
//! layer recognizes exactly this family when deciding whether a failure is
//! translatable into the client taxonomy; any other error type reaching the
//! transport boundary is assumed to originate in caller code and is passed
//! through untouched ([`is_transport_error`] is that membership check).
//!
//! Two members deliberately overlap in meaning:
//!
//! - [`AlreadyExistsError`] covers both table and keyspace creation
//!   conflicts, distinguished by [`was_table_creation`][AlreadyExistsError::was_table_creation].
//! - [`InvalidConfigurationInQueryError`] is a refinement of
//!   [`InvalidQueryError`]; translation must check the refinement first.

use std::error::Error as StdError;
use std::fmt;

/// Credentials rejected by a node
#[derive(Debug, Clone, thiserror::Error)]
#[error("authentication error on host {host}: {message}")]
pub struct AuthenticationError {
    pub host: String,
    pub message: String,
}

/// Unexpected driver-internal state; indicates a driver bug
#[derive(Debug, Clone, thiserror::Error)]
#[error("unexpected driver error: {message}")]
pub struct InternalError {
    pub message: String,
}

/// A bound value is incompatible with the column's type
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid type: {message}")]
pub struct InvalidTypeError {
    pub message: String,
}

/// No reachable node could serve the request
#[derive(Debug, Clone)]
pub struct NoHostAvailableError {
    /// Per-host failure details: `(host, reason)` in the order tried
    pub errors: Vec<(String, String)>,
}

impl fmt::Display for NoHostAvailableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "all {} host(s) tried for the query failed",
            self.errors.len()
        )
    }
}

impl StdError for NoHostAvailableError {}

/// The coordinator gave up waiting on replica reads
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("read timed out (data retrieved: {data_retrieved})")]
pub struct ReadTimeoutError {
    /// Whether some data had already been retrieved when the deadline hit
    pub data_retrieved: bool,
}

/// The coordinator gave up waiting on replica writes
#[derive(Debug, Clone)]
pub struct WriteTimeoutError {
    /// The kind of write that timed out, when the coordinator reported one
    pub write_type: Option<String>,
}

impl fmt::Display for WriteTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.write_type {
            Some(wt) => write!(f, "{wt} write timed out"),
            None => write!(f, "write timed out"),
        }
    }
}

impl StdError for WriteTimeoutError {}

/// A truncate operation failed cluster-side
#[derive(Debug, Clone, thiserror::Error)]
#[error("truncate failed: {message}")]
pub struct TruncateError {
    pub message: String,
}

/// Not enough live replicas for the requested consistency
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("not enough replicas available: required {required}, alive {alive}")]
pub struct UnavailableError {
    pub required: u32,
    pub alive: u32,
}

/// Creation attempted on an object that already exists
#[derive(Debug, Clone)]
pub struct AlreadyExistsError {
    pub keyspace: String,
    /// Set when the conflicting creation targeted a table
    pub table: Option<String>,
}

impl AlreadyExistsError {
    /// Whether the conflict came from a table creation (as opposed to a
    /// keyspace creation)
    pub fn was_table_creation(&self) -> bool {
        self.table.is_some()
    }
}

impl fmt::Display for AlreadyExistsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "table {}.{table} already exists", self.keyspace),
            None => write!(f, "keyspace {} already exists", self.keyspace),
        }
    }
}

impl StdError for AlreadyExistsError {}

/// The query referenced configuration that is invalid for the target
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid configuration in query: {message}")]
pub struct InvalidConfigurationInQueryError {
    pub message: String,
}

/// The query is syntactically valid but semantically wrong
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid query: {message}")]
pub struct InvalidQueryError {
    pub message: String,
}

/// The query text failed to parse
#[derive(Debug, Clone, thiserror::Error)]
#[error("syntax error: {message}")]
pub struct SyntaxError {
    pub message: String,
}

/// The operation is not permitted for the authenticated credential
#[derive(Debug, Clone, thiserror::Error)]
#[error("unauthorized: {message}")]
pub struct UnauthorizedError {
    pub message: String,
}

/// Requested trace data could not be retrieved
#[derive(Debug, Clone, thiserror::Error)]
#[error("unable to retrieve query trace: {message}")]
pub struct TraceRetrievalError {
    pub message: String,
}

/// Whether `err` belongs to the transport's native error family
///
/// Only family members are eligible for taxonomy translation.
pub fn is_transport_error(err: &(dyn StdError + Send + Sync + 'static)) -> bool {
    err.is::<AuthenticationError>()
        || err.is::<InternalError>()
        || err.is::<InvalidTypeError>()
        || err.is::<NoHostAvailableError>()
        || err.is::<ReadTimeoutError>()
        || err.is::<WriteTimeoutError>()
        || err.is::<TruncateError>()
        || err.is::<UnavailableError>()
        || err.is::<AlreadyExistsError>()
        || err.is::<InvalidConfigurationInQueryError>()
        || err.is::<InvalidQueryError>()
        || err.is::<SyntaxError>()
        || err.is::<UnauthorizedError>()
        || err.is::<TraceRetrievalError>()
}
