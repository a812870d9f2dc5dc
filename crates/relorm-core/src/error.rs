use crate::{executor::DriverError, value::ValueError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// OrmError
///
/// Structured runtime error with a stable classification.
/// Every fallible path in the mapper surfaces exactly one of these.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct OrmError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl OrmError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct an invalid argument error.
    pub(crate) fn invalid_argument(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidArgument, origin, message)
    }

    /// Construct a malformed field tag error.
    pub(crate) fn malformed_tag(entity: &str, tag: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::MalformedTag,
            ErrorOrigin::Model,
            format!("malformed tag '{tag}' on {entity}: {reason}"),
        )
    }

    /// Construct a table name collision error.
    pub(crate) fn conflicting_type(table: &str, existing: &str, incoming: &str) -> Self {
        Self::new(
            ErrorClass::ConflictingType,
            ErrorOrigin::Model,
            format!("table '{table}' is claimed by both '{existing}' and '{incoming}'"),
        )
    }

    /// Construct a missing primary key error.
    pub(crate) fn missing_primary_key(origin: ErrorOrigin, entity: &str) -> Self {
        Self::new(
            ErrorClass::MissingPrimaryKey,
            origin,
            format!("{entity} has no primary key value"),
        )
    }

    /// Construct an affected-row count mismatch error.
    pub(crate) fn row_count_mismatch(table: &str, expected: u64, found: u64) -> Self {
        Self::new(
            ErrorClass::RowCountMismatch,
            ErrorOrigin::Orm,
            format!("expected {expected} affected row(s) in '{table}', found {found}"),
        )
    }

    /// Construct a row-not-found error.
    pub(crate) fn not_found(table: &str, key: &str) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Orm,
            format!("no row in '{table}' with key {key}"),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<ValueError> for OrmError {
    fn from(err: ValueError) -> Self {
        let class = match &err {
            ValueError::MissingPrimaryKey => ErrorClass::MissingPrimaryKey,
            _ => ErrorClass::TypeMismatch,
        };

        Self::new(class, ErrorOrigin::Value, err.to_string())
    }
}

impl From<DriverError> for OrmError {
    fn from(err: DriverError) -> Self {
        Self::new(ErrorClass::Driver, ErrorOrigin::Executor, err.to_string())
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    MalformedTag,
    ConflictingType,
    MissingPrimaryKey,
    TypeMismatch,
    RowCountMismatch,
    NotFound,
    Driver,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::MalformedTag => "malformed_tag",
            Self::ConflictingType => "conflicting_type",
            Self::MissingPrimaryKey => "missing_primary_key",
            Self::TypeMismatch => "type_mismatch",
            Self::RowCountMismatch => "row_count_mismatch",
            Self::NotFound => "not_found",
            Self::Driver => "driver",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Subsystem that produced the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Model,
    Value,
    Cache,
    Builder,
    Executor,
    Orm,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Model => "model",
            Self::Value => "value",
            Self::Cache => "cache",
            Self::Builder => "builder",
            Self::Executor => "executor",
            Self::Orm => "orm",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
