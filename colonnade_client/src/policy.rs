//! Resolution of abstract execution policies to driver-native values
//!
//! Pure, total maps over closed enums; safe for unsynchronized concurrent
//! use. Unknown values cannot reach these functions: the only open boundary
//! is text parsing, which reports
//! [`UnknownPolicyValue`][colonnade_types::UnknownPolicyValue] before a
//! value gets this far.

use colonnade_transport::{NativeConsistency, NativeRetryPolicy};
use colonnade_types::{ConsistencyLevel, RetryPolicy};

/// Resolve an abstract consistency level to the driver-native value
pub fn resolve_consistency(level: ConsistencyLevel) -> NativeConsistency {
    match level {
        ConsistencyLevel::Any => NativeConsistency::Any,
        ConsistencyLevel::One => NativeConsistency::One,
        ConsistencyLevel::Two => NativeConsistency::Two,
        ConsistencyLevel::Three => NativeConsistency::Three,
        ConsistencyLevel::Quorum => NativeConsistency::Quorum,
        ConsistencyLevel::All => NativeConsistency::All,
        ConsistencyLevel::LocalQuorum => NativeConsistency::LocalQuorum,
        ConsistencyLevel::EachQuorum => NativeConsistency::EachQuorum,
        ConsistencyLevel::Serial => NativeConsistency::Serial,
        ConsistencyLevel::LocalSerial => NativeConsistency::LocalSerial,
        ConsistencyLevel::LocalOne => NativeConsistency::LocalOne,
    }
}

/// Resolve an abstract retry policy to the driver-native selector
pub fn resolve_retry(policy: RetryPolicy) -> NativeRetryPolicy {
    match policy {
        RetryPolicy::Default => NativeRetryPolicy::Default,
        RetryPolicy::DowngradingConsistency => NativeRetryPolicy::DowngradingConsistency,
        RetryPolicy::Fallthrough => NativeRetryPolicy::Fallthrough,
        RetryPolicy::Logging => NativeRetryPolicy::Logging,
    }
}
