//! Failures reported by the booking stores.
//!
//! Every variant carries an [`ErrorContext`] naming the operation and the
//! row it was working on. The HTTP layer picks a status from the variant
//! alone, never from the message text.

use std::fmt;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a failure happened: `operation=dislike, entity=hotel, id=7`.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub operation: Option<String>,
    /// `hotel`, `room`, `user`, `reservation`, or a constraint name
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    /// Set when repeating the same call may succeed.
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labelled = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
            ("details", &self.details),
        ];
        let mut parts: Vec<String> = labelled
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}={}", label, v)))
            .collect();
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store is unreachable or the pool is exhausted. Always retryable.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// A statement failed, including counter overflow.
    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// A hotel, room, user or reservation id that does not exist.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Rejected input: empty title, `end < start`, duplicate username.
    #[error("Data validation error: {message} {context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message} {context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },

    #[error("Transaction error: {message} {context}")]
    TransactionError {
        message: String,
        context: ErrorContext,
    },

    /// Always retryable.
    #[error("Timeout error: {message} {context}")]
    TimeoutError {
        message: String,
        context: ErrorContext,
    },
}

/// Generates `name(message)` and `name_with_context(message, context)` per variant.
/// A trailing `=> retryable` forces the flag on.
macro_rules! constructors {
    ($($variant:ident: $plain:ident / $contextual:ident $(=> $force:ident)?),* $(,)?) => {
        $(
            #[doc = concat!("[`RepositoryError::", stringify!($variant), "`] with an empty context.")]
            pub fn $plain(message: impl Into<String>) -> Self {
                Self::$contextual(message, ErrorContext::default())
            }

            #[doc = concat!("[`RepositoryError::", stringify!($variant), "`] with the given context.")]
            pub fn $contextual(message: impl Into<String>, context: ErrorContext) -> Self {
                $(let context = context.$force();)?
                Self::$variant {
                    message: message.into(),
                    context,
                }
            }
        )*
    };
}

impl RepositoryError {
    constructors! {
        ConnectionError: connection / connection_with_context => retryable,
        QueryError: query / query_with_context,
        NotFound: not_found / not_found_with_context,
        ValidationError: validation / validation_with_context,
        ConfigurationError: configuration / configuration_with_context,
        InternalError: internal / internal_with_context,
        TransactionError: transaction / transaction_with_context,
        TimeoutError: timeout / timeout_with_context => retryable,
    }

    /// `NotFound` for a primary key lookup, e.g. `Hotel 7 not found`.
    pub fn missing(operation: &str, entity: &str, id: impl fmt::Display) -> Self {
        let mut label = entity.to_string();
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self::not_found_with_context(
            format!("{} {} not found", label, id),
            ErrorContext::new(operation)
                .with_entity(entity)
                .with_entity_id(id),
        )
    }

    /// Only connection, timeout, query and transaction failures can be
    /// retryable; the rest describe the request itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotFound { .. }
            | Self::ValidationError { .. }
            | Self::ConfigurationError { .. }
            | Self::InternalError { .. } => false,
            _ => self.context().retryable,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TransactionError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ValidationError { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. }
            | Self::TransactionError { context, .. }
            | Self::TimeoutError { context, .. } => context,
        }
    }

    /// Stamp the operation name, replacing any earlier one.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }
}

impl From<String> for RepositoryError {
    fn from(s: String) -> Self {
        RepositoryError::internal(s)
    }
}

impl From<&str> for RepositoryError {
    fn from(s: &str) -> Self {
        RepositoryError::internal(s)
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::DatabaseErrorKind;

        match err {
            diesel::result::Error::NotFound => RepositoryError::not_found("Record not found"),
            diesel::result::Error::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                let mut context =
                    ErrorContext::default().with_details(format!("db_error_kind={:?}", kind));
                if let Some(constraint) = info.constraint_name() {
                    context = context.with_entity(constraint);
                }

                match kind {
                    // A dangling parent reference means the row we pointed at is gone.
                    DatabaseErrorKind::ForeignKeyViolation => {
                        RepositoryError::NotFound { message, context }
                    }
                    DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::CheckViolation => {
                        RepositoryError::ValidationError { message, context }
                    }
                    DatabaseErrorKind::SerializationFailure => RepositoryError::QueryError {
                        message,
                        context: context.retryable(),
                    },
                    DatabaseErrorKind::ClosedConnection => RepositoryError::ConnectionError {
                        message,
                        context: context.retryable(),
                    },
                    _ => RepositoryError::QueryError { message, context },
                }
            }
            diesel::result::Error::QueryBuilderError(e) => {
                RepositoryError::query(format!("Query builder error: {}", e))
            }
            diesel::result::Error::DeserializationError(e) => {
                RepositoryError::internal(format!("Deserialization error: {}", e))
            }
            diesel::result::Error::SerializationError(e) => {
                RepositoryError::internal(format!("Serialization error: {}", e))
            }
            diesel::result::Error::RollbackTransaction => {
                RepositoryError::transaction("Transaction rolled back")
            }
            other => RepositoryError::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection_with_context(
            err.to_string(),
            ErrorContext::default()
                .with_details("pool_error")
                .retryable(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_builds_context() {
        let err = RepositoryError::missing("dislike", "hotel", 7);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Hotel 7 not found"));

        let ctx = err.context();
        assert_eq!(ctx.operation.as_deref(), Some("dislike"));
        assert_eq!(ctx.entity.as_deref(), Some("hotel"));
        assert_eq!(ctx.entity_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_with_operation_overrides_context() {
        let err = RepositoryError::validation("bad range").with_operation("create_reservation");
        assert_eq!(
            err.context().operation.as_deref(),
            Some("create_reservation")
        );
        assert!(!err.is_retryable());
    }
}
