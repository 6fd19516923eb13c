//! Shared data model for the Colonnade client
//!
//! This crate holds the types that cross the boundary between application
//! code, the execution layer in `colonnade_client`, and `CqlTransport`
//! implementations: column [`Value`]s, read-only [`Row`]s, the consumed-once
//! [`ResultSet`], and the abstract execution policies
//! ([`ConsistencyLevel`], [`RetryPolicy`]).

pub mod policy;
pub mod row;
pub mod value;

pub use policy::{ConsistencyLevel, RetryPolicy, UnknownPolicyValue};
pub use row::{ResultSet, Row};
pub use value::Value;
