//! The wire-driver contract consumed by the Colonnade execution layer
//!
//! The execution layer in `colonnade_client` never talks to the network
//! itself; it hands a frozen [`BoundStatement`] to an implementation of
//! [`CqlTransport`] and interprets what comes back. This crate defines that
//! seam: the transport trait, the statement value it consumes, the
//! prepared-statement handle it produces, the driver-native policy value
//! types, and the transport's own error family (see [`error`]).
//!
//! The transport owns its I/O resources, its thread pool, and result-set
//! paging. Nothing in this crate starts a request on its own.

pub mod error;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use colonnade_types::{ResultSet, Value};
use uuid::Uuid;

/// A transport-native failure, before translation
///
/// Errors from the transport's own family (the types in [`error`]) are
/// translated into the client taxonomy; anything else is assumed to come
/// from caller code and passes through unchanged.
pub type RawError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Driver-native consistency value, carrying the CQL wire code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NativeConsistency {
    Any = 0x0000,
    One = 0x0001,
    Two = 0x0002,
    Three = 0x0003,
    Quorum = 0x0004,
    All = 0x0005,
    LocalQuorum = 0x0006,
    EachQuorum = 0x0007,
    Serial = 0x0008,
    LocalSerial = 0x0009,
    LocalOne = 0x000A,
}

impl NativeConsistency {
    /// The two-byte code used on the wire
    pub fn code(&self) -> u16 {
        *self as u16
    }
}

/// Driver-native retry policy selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeRetryPolicy {
    Default,
    DowngradingConsistency,
    Fallthrough,
    Logging,
}

/// Opaque handle identifying a statement prepared with the transport
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PreparedId(Uuid);

impl PreparedId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PreparedId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PreparedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A statement template registered with the transport via
/// [`CqlTransport::prepare`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedStatement {
    id: PreparedId,
    cql: String,
}

impl PreparedStatement {
    pub fn new(id: PreparedId, cql: impl Into<String>) -> Self {
        Self {
            id,
            cql: cql.into(),
        }
    }

    pub fn id(&self) -> PreparedId {
        self.id
    }

    pub fn cql(&self) -> &str {
        &self.cql
    }
}

/// The statement template a [`BoundStatement`] was built from
#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    /// Raw query text, sent as-is
    Raw(String),
    /// Reference to a previously prepared template
    Prepared(PreparedId),
}

/// A fully configured statement, ready for the wire
///
/// Produced by the statement builder in `colonnade_client` and not modified
/// afterwards: the execution layer takes ownership and only ever reads it.
/// `None` policy fields leave the transport's defaults untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundStatement {
    pub kind: StatementKind,
    /// Parameter values, in binding order
    pub values: Vec<Value>,
    pub consistency: Option<NativeConsistency>,
    pub retry_policy: Option<NativeRetryPolicy>,
    /// Tri-state tracing flag: `None` means "not requested either way"
    pub tracing: Option<bool>,
}

impl BoundStatement {
    pub fn raw(cql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            kind: StatementKind::Raw(cql.into()),
            values,
            consistency: None,
            retry_policy: None,
            tracing: None,
        }
    }

    pub fn prepared(id: PreparedId, values: Vec<Value>) -> Self {
        Self {
            kind: StatementKind::Prepared(id),
            values,
            consistency: None,
            retry_policy: None,
            tracing: None,
        }
    }

    /// The raw query text, when the statement was built from one
    pub fn cql(&self) -> Option<&str> {
        match &self.kind {
            StatementKind::Raw(cql) => Some(cql),
            StatementKind::Prepared(_) => None,
        }
    }
}

/// Capability contract for the underlying wire driver
///
/// Implementations manage their own connections, pooling, and paging. Both
/// operations report failure as [`RawError`]; the execution layer decides
/// what is translatable.
#[async_trait]
pub trait CqlTransport: fmt::Debug + Send + Sync {
    /// Run one statement to completion and deliver its rows
    async fn execute(&self, statement: &BoundStatement) -> Result<ResultSet, RawError>;

    /// Register a statement template for later parameter binding
    async fn prepare(&self, cql: &str) -> Result<PreparedStatement, RawError>;
}

#[async_trait]
impl<T: CqlTransport + ?Sized> CqlTransport for Arc<T> {
    async fn execute(&self, statement: &BoundStatement) -> Result<ResultSet, RawError> {
        (**self).execute(statement).await
    }

    async fn prepare(&self, cql: &str) -> Result<PreparedStatement, RawError> {
        (**self).prepare(cql).await
    }
}
