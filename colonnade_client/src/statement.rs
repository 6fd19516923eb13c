//! Statement construction
//!
//! A [`StatementBuilder`] collects a template (raw text or a prepared
//! handle), optional parameter binding, and optional execution policies,
//! then freezes them into a [`BoundStatement`] with [`build`][StatementBuilder::build].
//! The builder stays mutable; the product never changes once handed to an
//! operation.

use std::fmt;

use colonnade_transport::{BoundStatement, PreparedStatement, RawError, StatementKind};
use colonnade_types::{ConsistencyLevel, RetryPolicy, Value};

use crate::error::{Error, Result};
use crate::policy;

/// Supplies parameter values for a prepared template at bind time
///
/// Blanket-implemented for closures, so a binder is usually written inline:
///
/// ```
/// # use colonnade_client::Binder;
/// # use colonnade_transport::{PreparedStatement, RawError};
/// # use colonnade_types::Value;
/// let binder = |_ps: &PreparedStatement| -> Result<Vec<Value>, RawError> {
///     Ok(vec![Value::from(42i64), Value::from("ada")])
/// };
/// # fn assert_binder(_: impl Binder) {}
/// # assert_binder(binder);
/// ```
pub trait Binder: Send + Sync {
    /// Produce the bound values for one build of `statement`
    ///
    /// Failures here are caller errors: they surface as
    /// [`Error::Bind`][crate::Error::Bind] and are never translated.
    fn bind_values(&self, statement: &PreparedStatement) -> Result<Vec<Value>, RawError>;
}

impl<F> Binder for F
where
    F: Fn(&PreparedStatement) -> Result<Vec<Value>, RawError> + Send + Sync,
{
    fn bind_values(&self, statement: &PreparedStatement) -> Result<Vec<Value>, RawError> {
        self(statement)
    }
}

enum Template {
    Raw {
        cql: String,
        values: Vec<Value>,
    },
    Prepared {
        statement: PreparedStatement,
        binder: Option<Box<dyn Binder>>,
    },
}

/// Builder for a frozen [`BoundStatement`]
///
/// `build` applies, in order: parameter binding, consistency level, retry
/// policy, tracing. Each policy is applied only if explicitly set, so an
/// untouched field leaves the transport's default in force. Building twice
/// yields two independent statements with identical configuration.
pub struct StatementBuilder {
    template: Template,
    consistency: Option<ConsistencyLevel>,
    retry_policy: Option<RetryPolicy>,
    tracing: Option<bool>,
}

impl StatementBuilder {
    /// Start from raw query text with ordered parameter values
    pub fn raw(cql: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(Template::Raw {
            cql: cql.into(),
            values,
        })
    }

    /// Start from a prepared template with no bound parameters
    pub fn prepared(statement: PreparedStatement) -> Self {
        Self::new(Template::Prepared {
            statement,
            binder: None,
        })
    }

    /// Start from a prepared template whose values come from `binder`
    pub fn prepared_with(statement: PreparedStatement, binder: impl Binder + 'static) -> Self {
        Self::new(Template::Prepared {
            statement,
            binder: Some(Box::new(binder)),
        })
    }

    fn new(template: Template) -> Self {
        Self {
            template,
            consistency: None,
            retry_policy: None,
            tracing: None,
        }
    }

    pub fn consistency(mut self, level: ConsistencyLevel) -> Self {
        self.consistency = Some(level);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn enable_tracing(mut self) -> Self {
        self.tracing = Some(true);
        self
    }

    pub fn disable_tracing(mut self) -> Self {
        self.tracing = Some(false);
        self
    }

    /// Freeze the current configuration into a [`BoundStatement`]
    pub fn build(&self) -> Result<BoundStatement> {
        let (kind, values) = match &self.template {
            Template::Raw { cql, values } => (StatementKind::Raw(cql.clone()), values.clone()),
            Template::Prepared { statement, binder } => {
                let values = match binder {
                    Some(binder) => binder
                        .bind_values(statement)
                        .map_err(|source| Error::Bind { source })?,
                    // parameterless bind
                    None => Vec::new(),
                };
                (StatementKind::Prepared(statement.id()), values)
            }
        };

        let mut bound = BoundStatement {
            kind,
            values,
            consistency: None,
            retry_policy: None,
            tracing: None,
        };
        if let Some(level) = self.consistency {
            bound.consistency = Some(policy::resolve_consistency(level));
        }
        if let Some(retry) = self.retry_policy {
            bound.retry_policy = Some(policy::resolve_retry(retry));
        }
        if let Some(tracing) = self.tracing {
            bound.tracing = Some(tracing);
        }
        Ok(bound)
    }
}

impl fmt::Debug for StatementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let template = match &self.template {
            Template::Raw { cql, .. } => format!("raw({cql:?})"),
            Template::Prepared { statement, .. } => format!("prepared({})", statement.id()),
        };
        f.debug_struct("StatementBuilder")
            .field("template", &template)
            .field("consistency", &self.consistency)
            .field("retry_policy", &self.retry_policy)
            .field("tracing", &self.tracing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use colonnade_transport::{NativeConsistency, NativeRetryPolicy, PreparedId, StatementKind};
    use colonnade_transport::error::SyntaxError;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unset_policies_leave_transport_defaults() {
        let stmt = StatementBuilder::raw("SELECT * FROM users", vec![])
            .build()
            .unwrap();
        assert_eq!(stmt.consistency, None);
        assert_eq!(stmt.retry_policy, None);
        assert_eq!(stmt.tracing, None);
    }

    #[test]
    fn policies_are_resolved_to_native_values() {
        let stmt = StatementBuilder::raw("SELECT * FROM users", vec![Value::from(7i64)])
            .consistency(ConsistencyLevel::LocalQuorum)
            .retry_policy(RetryPolicy::DowngradingConsistency)
            .enable_tracing()
            .build()
            .unwrap();
        assert_eq!(stmt.consistency, Some(NativeConsistency::LocalQuorum));
        assert_eq!(
            stmt.retry_policy,
            Some(NativeRetryPolicy::DowngradingConsistency)
        );
        assert_eq!(stmt.tracing, Some(true));
        assert_eq!(stmt.values, vec![Value::from(7i64)]);
    }

    #[test]
    fn tracing_is_tri_state() {
        let builder = StatementBuilder::raw("SELECT 1", vec![]);
        assert_eq!(builder.build().unwrap().tracing, None);
        assert_eq!(
            builder.disable_tracing().build().unwrap().tracing,
            Some(false)
        );
    }

    #[test]
    fn build_is_idempotent() {
        let builder = StatementBuilder::raw("SELECT * FROM users WHERE id = ?", vec![1i64.into()])
            .consistency(ConsistencyLevel::One)
            .retry_policy(RetryPolicy::Fallthrough);
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prepared_without_binder_binds_no_parameters() {
        let ps = PreparedStatement::new(PreparedId::new(), "SELECT * FROM users WHERE id = ?");
        let id = ps.id();
        let stmt = StatementBuilder::prepared(ps).build().unwrap();
        assert_eq!(stmt.kind, StatementKind::Prepared(id));
        assert_eq!(stmt.values, Vec::<Value>::new());
    }

    #[test]
    fn binder_runs_on_every_build() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let ps = PreparedStatement::new(PreparedId::new(), "SELECT * FROM users WHERE id = ?");
        let builder = StatementBuilder::prepared_with(
            ps,
            |_: &PreparedStatement| -> Result<Vec<Value>, RawError> {
                CALLS.fetch_add(1, Ordering::SeqCst);
                Ok(vec![Value::from(9i64)])
            },
        );

        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first.values, vec![Value::from(9i64)]);
        assert_eq!(first, second);
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn binder_failure_is_not_translated() {
        let ps = PreparedStatement::new(PreparedId::new(), "SELECT 1");
        // A binder failing with a type from the transport family must still
        // surface as a bind error: binder failures are caller errors.
        let builder = StatementBuilder::prepared_with(ps, |_: &PreparedStatement| {
            Err(Box::new(SyntaxError {
                message: "from the binder".into(),
            }) as RawError)
        });
        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::Bind { .. }));
        assert_eq!(err.category(), "bind");
    }
}
