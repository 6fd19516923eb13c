//! Transport error translation
//!
//! [`translate`] maps a raw transport failure onto the closed taxonomy in
//! [`crate::error::Error`]. Dispatch is an explicit, ordered rule table
//! evaluated top to bottom: some predicates are strictly narrower than later
//! ones (a table-creation conflict is an already-exists conflict; an
//! invalid-configuration error is an invalid-query error; everything in the
//! family matches the final catch-all), so a rule must never be moved below
//! a broader rule that also matches its errors. The
//! `rule_order_is_most_specific_first` test pins this down for every rule.
//!
//! Errors outside the transport's native family are not touched: they come
//! back unchanged for the caller to handle.

use std::error::Error as StdError;

use colonnade_transport::RawError;
use colonnade_transport::error::{
    AlreadyExistsError, AuthenticationError, InternalError, InvalidConfigurationInQueryError,
    InvalidQueryError, InvalidTypeError, NoHostAvailableError, ReadTimeoutError, SyntaxError,
    TraceRetrievalError, TruncateError, UnauthorizedError, UnavailableError, WriteTimeoutError,
    is_transport_error,
};

use crate::error::Error;

type Predicate = fn(&(dyn StdError + Send + Sync + 'static)) -> bool;
type Constructor = fn(RawError) -> Error;

struct Rule {
    name: &'static str,
    matches: Predicate,
    build: Constructor,
}

/// The ordered dispatch table: narrower rules strictly before broader ones
static RULES: &[Rule] = &[
    Rule {
        name: "authentication",
        matches: |e| e.is::<AuthenticationError>(),
        build: |raw| {
            let host = raw
                .downcast_ref::<AuthenticationError>()
                .map(|e| e.host.clone())
                .unwrap_or_default();
            Error::Authentication { host, source: raw }
        },
    },
    Rule {
        name: "internal",
        matches: |e| e.is::<InternalError>(),
        build: |raw| Error::Internal { source: raw },
    },
    Rule {
        name: "type_mismatch",
        matches: |e| e.is::<InvalidTypeError>(),
        build: |raw| Error::TypeMismatch { source: raw },
    },
    Rule {
        name: "connection_failure",
        matches: |e| e.is::<NoHostAvailableError>(),
        build: |raw| {
            let errors = raw
                .downcast_ref::<NoHostAvailableError>()
                .map(|e| e.errors.clone())
                .unwrap_or_default();
            Error::ConnectionFailure { errors, source: raw }
        },
    },
    Rule {
        name: "read_timeout",
        matches: |e| e.is::<ReadTimeoutError>(),
        build: |raw| {
            let data_retrieved = raw
                .downcast_ref::<ReadTimeoutError>()
                .is_some_and(|e| e.data_retrieved);
            Error::ReadTimeout {
                data_retrieved,
                source: raw,
            }
        },
    },
    Rule {
        name: "write_timeout",
        matches: |e| e.is::<WriteTimeoutError>(),
        build: |raw| {
            let write_type = raw
                .downcast_ref::<WriteTimeoutError>()
                .and_then(|e| e.write_type.clone());
            Error::WriteTimeout {
                write_type,
                source: raw,
            }
        },
    },
    Rule {
        name: "truncate",
        matches: |e| e.is::<TruncateError>(),
        build: |raw| Error::Truncate { source: raw },
    },
    Rule {
        name: "insufficient_replicas",
        matches: |e| e.is::<UnavailableError>(),
        build: |raw| {
            let (required, alive) = raw
                .downcast_ref::<UnavailableError>()
                .map(|e| (e.required, e.alive))
                .unwrap_or_default();
            Error::InsufficientReplicas {
                required,
                alive,
                source: raw,
            }
        },
    },
    // The table variant must precede the keyspace variant: both match the
    // same raw type, split on was_table_creation().
    Rule {
        name: "table_exists",
        matches: |e| {
            e.downcast_ref::<AlreadyExistsError>()
                .is_some_and(AlreadyExistsError::was_table_creation)
        },
        build: |raw| {
            let table = raw
                .downcast_ref::<AlreadyExistsError>()
                .and_then(|e| e.table.clone())
                .unwrap_or_default();
            Error::TableExists { table, source: raw }
        },
    },
    Rule {
        name: "keyspace_exists",
        matches: |e| e.is::<AlreadyExistsError>(),
        build: |raw| {
            let keyspace = raw
                .downcast_ref::<AlreadyExistsError>()
                .map(|e| e.keyspace.clone())
                .unwrap_or_default();
            Error::KeyspaceExists {
                keyspace,
                source: raw,
            }
        },
    },
    // Invalid-configuration refines invalid-query; the broad rule below also
    // matches it, so this one must come first.
    Rule {
        name: "invalid_config_in_query",
        matches: |e| e.is::<InvalidConfigurationInQueryError>(),
        build: |raw| Error::InvalidConfigInQuery { source: raw },
    },
    Rule {
        name: "invalid_query",
        matches: |e| e.is::<InvalidQueryError>() || e.is::<InvalidConfigurationInQueryError>(),
        build: |raw| Error::InvalidQuery { source: raw },
    },
    Rule {
        name: "syntax_error",
        matches: |e| e.is::<SyntaxError>(),
        build: |raw| Error::Syntax { source: raw },
    },
    Rule {
        name: "unauthorized",
        matches: |e| e.is::<UnauthorizedError>(),
        build: |raw| Error::Unauthorized { source: raw },
    },
    Rule {
        name: "trace_retrieval",
        matches: |e| e.is::<TraceRetrievalError>(),
        build: |raw| Error::TraceRetrieval { source: raw },
    },
    // Catch-all for family members no narrower rule recognizes.
    Rule {
        name: "uncategorized",
        matches: is_transport_error,
        build: |raw| Error::Uncategorized { source: raw },
    },
];

/// Translate a raw transport failure into the client taxonomy
///
/// Returns `Err(raw)` unchanged when the failure is not part of the
/// transport's native error family.
pub fn translate(raw: RawError) -> Result<Error, RawError> {
    if !is_transport_error(&*raw) {
        return Err(raw);
    }
    for rule in RULES {
        if (rule.matches)(&*raw) {
            return Ok((rule.build)(raw));
        }
    }
    // The final rule matches every family member; this is only reachable if
    // the table loses its catch-all.
    Ok(Error::Uncategorized { source: raw })
}

/// [`translate`], with untranslatable errors carried through as
/// [`Error::Untranslated`]
pub(crate) fn translate_or_passthrough(raw: RawError) -> Error {
    match translate(raw) {
        Ok(err) => err,
        Err(raw) => Error::Untranslated(raw),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// One canonical raw error per rule, in table order
    fn canonical_errors() -> Vec<(&'static str, RawError)> {
        vec![
            (
                "authentication",
                Box::new(AuthenticationError {
                    host: "10.0.0.7".into(),
                    message: "bad credentials".into(),
                }),
            ),
            (
                "internal",
                Box::new(InternalError {
                    message: "unexpected frame".into(),
                }),
            ),
            (
                "type_mismatch",
                Box::new(InvalidTypeError {
                    message: "expected bigint".into(),
                }),
            ),
            (
                "connection_failure",
                Box::new(NoHostAvailableError {
                    errors: vec![("10.0.0.7".into(), "connection refused".into())],
                }),
            ),
            (
                "read_timeout",
                Box::new(ReadTimeoutError {
                    data_retrieved: true,
                }),
            ),
            (
                "write_timeout",
                Box::new(WriteTimeoutError {
                    write_type: Some("BATCH".into()),
                }),
            ),
            (
                "truncate",
                Box::new(TruncateError {
                    message: "truncate of users failed".into(),
                }),
            ),
            (
                "insufficient_replicas",
                Box::new(UnavailableError {
                    required: 3,
                    alive: 1,
                }),
            ),
            (
                "table_exists",
                Box::new(AlreadyExistsError {
                    keyspace: "app".into(),
                    table: Some("users".into()),
                }),
            ),
            (
                "keyspace_exists",
                Box::new(AlreadyExistsError {
                    keyspace: "app".into(),
                    table: None,
                }),
            ),
            (
                "invalid_config_in_query",
                Box::new(InvalidConfigurationInQueryError {
                    message: "unknown replication class".into(),
                }),
            ),
            (
                "invalid_query",
                Box::new(InvalidQueryError {
                    message: "unknown column".into(),
                }),
            ),
            (
                "syntax_error",
                Box::new(SyntaxError {
                    message: "line 1:8 no viable alternative".into(),
                }),
            ),
            (
                "unauthorized",
                Box::new(UnauthorizedError {
                    message: "users is read-only".into(),
                }),
            ),
            (
                "trace_retrieval",
                Box::new(TraceRetrievalError {
                    message: "trace not stored".into(),
                }),
            ),
            // No raw type maps to the catch-all alone, so exercise it with a
            // family member whose narrower rules are all above it by
            // construction: the canonical check below skips none.
        ]
    }

    /// Every canonical error must first-match its own rule: an earlier rule
    /// matching it would mean a broader predicate shadows a narrower one.
    #[test]
    fn rule_order_is_most_specific_first() {
        for (expected, raw) in canonical_errors() {
            let first = RULES
                .iter()
                .find(|rule| (rule.matches)(&*raw))
                .map(|rule| rule.name);
            assert_eq!(
                first,
                Some(expected),
                "raw error for rule {expected:?} is shadowed"
            );
        }
    }

    /// Every rule except the catch-all has a canonical error, and the table
    /// lists them in the same order.
    #[test]
    fn every_rule_is_reachable() {
        let canonical: Vec<_> = canonical_errors().into_iter().map(|(n, _)| n).collect();
        let listed: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(listed[..listed.len() - 1], canonical[..]);
        assert_eq!(listed.last(), Some(&"uncategorized"));
    }

    #[test]
    fn categories_and_causes_are_preserved() {
        for (expected, raw) in canonical_errors() {
            let err = translate(raw).expect("family member must translate");
            assert_eq!(err.category(), expected);
            assert!(
                std::error::Error::source(&err).is_some(),
                "{expected} lost its cause"
            );
        }
    }

    #[test]
    fn carried_details_match_the_raw_error() {
        let err = translate(Box::new(AuthenticationError {
            host: "10.0.0.7".into(),
            message: "bad credentials".into(),
        }))
        .unwrap();
        assert!(matches!(err, Error::Authentication { host, .. } if host == "10.0.0.7"));

        let err = translate(Box::new(UnavailableError {
            required: 3,
            alive: 1,
        }))
        .unwrap();
        assert!(matches!(
            err,
            Error::InsufficientReplicas {
                required: 3,
                alive: 1,
                ..
            }
        ));

        let err = translate(Box::new(WriteTimeoutError {
            write_type: Some("BATCH".into()),
        }))
        .unwrap();
        assert!(
            matches!(err, Error::WriteTimeout { write_type: Some(wt), .. } if wt == "BATCH")
        );

        let err = translate(Box::new(NoHostAvailableError {
            errors: vec![("10.0.0.7".into(), "connection refused".into())],
        }))
        .unwrap();
        assert!(matches!(err, Error::ConnectionFailure { errors, .. } if errors.len() == 1));
    }

    #[test]
    fn table_conflict_is_never_the_broad_already_exists() {
        let err = translate(Box::new(AlreadyExistsError {
            keyspace: "app".into(),
            table: Some("users".into()),
        }))
        .unwrap();
        assert!(matches!(err, Error::TableExists { table, .. } if table == "users"));

        let err = translate(Box::new(AlreadyExistsError {
            keyspace: "app".into(),
            table: None,
        }))
        .unwrap();
        assert!(matches!(err, Error::KeyspaceExists { keyspace, .. } if keyspace == "app"));
    }

    #[test]
    fn configuration_error_is_never_the_broad_invalid_query() {
        let err = translate(Box::new(InvalidConfigurationInQueryError {
            message: "unknown replication class".into(),
        }))
        .unwrap();
        assert!(matches!(err, Error::InvalidConfigInQuery { .. }));
    }

    #[test]
    fn non_transport_errors_pass_through_unchanged() {
        let raw: RawError = Box::new(std::io::Error::other("caller bug"));
        let passed = translate(raw).expect_err("must not translate");
        assert_eq!(passed.to_string(), "caller bug");
        assert!(passed.is::<std::io::Error>());
    }
}
