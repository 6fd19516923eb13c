use std::fmt;

use serde::{Deserialize, Serialize};

/// Raised when parsing a policy value from text that names no known variant
///
/// The policy enums themselves are closed; the only place an unknown value
/// can enter the system is the text boundary (configuration files, CLI
/// flags), which is where this error is produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownPolicyValue {
    pub kind: &'static str,
    pub value: String,
}

/// Abstract consistency level requested for a statement
///
/// Resolved to the transport's native consistency value at statement build
/// time; a statement that never sets a level leaves the transport default
/// untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    LocalOne,
}

impl ConsistencyLevel {
    fn name(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::One => "ONE",
            Self::Two => "TWO",
            Self::Three => "THREE",
            Self::Quorum => "QUORUM",
            Self::All => "ALL",
            Self::LocalQuorum => "LOCAL_QUORUM",
            Self::EachQuorum => "EACH_QUORUM",
            Self::Serial => "SERIAL",
            Self::LocalSerial => "LOCAL_SERIAL",
            Self::LocalOne => "LOCAL_ONE",
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ConsistencyLevel {
    type Err = UnknownPolicyValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_uppercase().as_str() {
            "ANY" => Self::Any,
            "ONE" => Self::One,
            "TWO" => Self::Two,
            "THREE" => Self::Three,
            "QUORUM" => Self::Quorum,
            "ALL" => Self::All,
            "LOCAL_QUORUM" => Self::LocalQuorum,
            "EACH_QUORUM" => Self::EachQuorum,
            "SERIAL" => Self::Serial,
            "LOCAL_SERIAL" => Self::LocalSerial,
            "LOCAL_ONE" => Self::LocalOne,
            _ => {
                return Err(UnknownPolicyValue {
                    kind: "consistency level",
                    value: s.to_string(),
                });
            }
        };
        Ok(level)
    }
}

/// Abstract retry policy requested for a statement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetryPolicy {
    /// The transport's default retry behavior
    Default,
    /// Retry at progressively weaker consistency when replicas are short
    DowngradingConsistency,
    /// Never retry; surface the first failure
    Fallthrough,
    /// The default behavior, with each retry decision logged
    Logging,
}

impl RetryPolicy {
    fn name(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::DowngradingConsistency => "DOWNGRADING_CONSISTENCY",
            Self::Fallthrough => "FALLTHROUGH",
            Self::Logging => "LOGGING",
        }
    }
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for RetryPolicy {
    type Err = UnknownPolicyValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let policy = match s.to_ascii_uppercase().as_str() {
            "DEFAULT" => Self::Default,
            "DOWNGRADING_CONSISTENCY" => Self::DowngradingConsistency,
            "FALLTHROUGH" => Self::Fallthrough,
            "LOGGING" => Self::Logging,
            _ => {
                return Err(UnknownPolicyValue {
                    kind: "retry policy",
                    value: s.to_string(),
                });
            }
        };
        Ok(policy)
    }
}
