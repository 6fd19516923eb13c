//! The application-facing error taxonomy
//!
//! Every failure the execution layer can surface is a variant of [`Error`].
//! The transport-tagged variants (everything from [`Authentication`][Error::Authentication]
//! through [`Uncategorized`][Error::Uncategorized]) are produced exclusively
//! by the translator in [`crate::translate`] and always carry the original,
//! untranslated cause. The remaining variants are client-side conditions
//! that never pass through translation.

use std::time::Duration;

use colonnade_transport::RawError;
use colonnade_types::{ResultSet, UnknownPolicyValue};

/// Primary error type for the execution layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials rejected by a node
    #[error("authentication failed on host {host}: {source}")]
    Authentication {
        host: String,
        #[source]
        source: RawError,
    },

    /// Transport-internal invariant violation
    #[error("transport-internal error: {source}")]
    Internal {
        #[source]
        source: RawError,
    },

    /// A bound value is incompatible with the column's type
    #[error("value type incompatible with column type: {source}")]
    TypeMismatch {
        #[source]
        source: RawError,
    },

    /// No reachable node could serve the request
    #[error("no reachable node could serve the request: {source}")]
    ConnectionFailure {
        /// Per-host failure details: `(host, reason)` in the order tried
        errors: Vec<(String, String)>,
        #[source]
        source: RawError,
    },

    /// Read deadline exceeded cluster-side
    #[error("cluster-side read timeout (data retrieved: {data_retrieved}): {source}")]
    ReadTimeout {
        /// Whether some data had been retrieved before the deadline hit
        data_retrieved: bool,
        #[source]
        source: RawError,
    },

    /// Write deadline exceeded cluster-side
    #[error("cluster-side write timeout: {source}")]
    WriteTimeout {
        /// The coordinator's write-type label, when it reported one
        write_type: Option<String>,
        #[source]
        source: RawError,
    },

    /// A truncate operation failed
    #[error("truncate failed: {source}")]
    Truncate {
        #[source]
        source: RawError,
    },

    /// Not enough replicas available for the requested consistency
    #[error("insufficient replicas: required {required}, alive {alive}")]
    InsufficientReplicas {
        required: u32,
        alive: u32,
        #[source]
        source: RawError,
    },

    /// Table creation attempted on an existing table
    #[error("table {table} already exists")]
    TableExists {
        table: String,
        #[source]
        source: RawError,
    },

    /// Keyspace creation attempted on an existing keyspace
    #[error("keyspace {keyspace} already exists")]
    KeyspaceExists {
        keyspace: String,
        #[source]
        source: RawError,
    },

    /// The query referenced invalid configuration
    #[error("invalid configuration in query: {source}")]
    InvalidConfigInQuery {
        #[source]
        source: RawError,
    },

    /// Semantically invalid query
    #[error("invalid query: {source}")]
    InvalidQuery {
        #[source]
        source: RawError,
    },

    /// Malformed query text
    #[error("query syntax error: {source}")]
    Syntax {
        #[source]
        source: RawError,
    },

    /// Operation not permitted for the authenticated credential
    #[error("unauthorized: {source}")]
    Unauthorized {
        #[source]
        source: RawError,
    },

    /// Requested trace data unavailable
    #[error("trace retrieval failed: {source}")]
    TraceRetrieval {
        #[source]
        source: RawError,
    },

    /// Any other transport-native error
    #[error("uncategorized transport error: {source}")]
    Uncategorized {
        #[source]
        source: RawError,
    },

    /// A single row was expected but the result holds more
    #[error("expected a single row but the result holds {} more", .result_set.remaining() + 1)]
    NotSingleResult {
        /// The result sequence as it stood when the violation was detected
        result_set: ResultSet,
    },

    /// A bounded wait expired before the transport delivered an outcome
    ///
    /// The in-flight request is not cancelled; its outcome is unknown.
    #[error("no result within {timeout:?}; the request may still complete")]
    Timeout { timeout: Duration },

    /// A policy value parsed from text named no known variant
    #[error(transparent)]
    UnknownPolicyValue(#[from] UnknownPolicyValue),

    /// A caller-supplied parameter binder failed
    ///
    /// The cause is carried as-is; binder failures are caller errors and are
    /// never run through the taxonomy.
    #[error("statement binding failed: {source}")]
    Bind {
        #[source]
        source: RawError,
    },

    /// A result cell could not be read as the requested scalar type
    #[error("column {index} cannot be read as {expected}")]
    RowConversion {
        index: usize,
        expected: &'static str,
    },

    /// The execution task was cancelled by a shutting-down runtime
    #[error("execution task was cancelled before completing")]
    ExecutorShutdown,

    /// A non-transport error surfaced at the transport boundary
    ///
    /// Passed through unchanged; assumed to originate from caller code.
    #[error(transparent)]
    Untranslated(RawError),
}

impl Error {
    /// Stable category label, mainly for logs and assertions
    pub fn category(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Internal { .. } => "internal",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ConnectionFailure { .. } => "connection_failure",
            Self::ReadTimeout { .. } => "read_timeout",
            Self::WriteTimeout { .. } => "write_timeout",
            Self::Truncate { .. } => "truncate",
            Self::InsufficientReplicas { .. } => "insufficient_replicas",
            Self::TableExists { .. } => "table_exists",
            Self::KeyspaceExists { .. } => "keyspace_exists",
            Self::InvalidConfigInQuery { .. } => "invalid_config_in_query",
            Self::InvalidQuery { .. } => "invalid_query",
            Self::Syntax { .. } => "syntax_error",
            Self::Unauthorized { .. } => "unauthorized",
            Self::TraceRetrieval { .. } => "trace_retrieval",
            Self::Uncategorized { .. } => "uncategorized",
            Self::NotSingleResult { .. } => "not_single_result",
            Self::Timeout { .. } => "timeout",
            Self::UnknownPolicyValue(_) => "unknown_policy_value",
            Self::Bind { .. } => "bind",
            Self::RowConversion { .. } => "row_conversion",
            Self::ExecutorShutdown => "executor_shutdown",
            Self::Untranslated(_) => "untranslated",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
