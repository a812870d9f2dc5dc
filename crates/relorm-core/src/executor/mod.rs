use crate::{config::ServerConfig, value::Value};
use thiserror::Error as ThisError;

///
/// DriverError
/// Failure reported by a database driver.
///

#[derive(Debug, ThisError)]
#[error("driver error: {message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// Executor
///
/// Minimal synchronous driver surface the mapper runs on. A row cursor is
/// opened by `query`, advanced by `next`, read by `get_field` and closed by
/// `finish`.
///

pub trait Executor {
    /// Hand the underlying connection back to the driver.
    fn release(&mut self) -> Result<(), DriverError>;

    fn begin_transaction(&mut self) -> Result<(), DriverError>;

    fn commit(&mut self) -> Result<(), DriverError>;

    fn rollback(&mut self) -> Result<(), DriverError>;

    fn query(&mut self, sql: &str) -> Result<(), DriverError>;

    fn next(&mut self) -> Result<bool, DriverError>;

    fn finish(&mut self) -> Result<(), DriverError>;

    /// Scan the current row into `values`. Each slot arrives holding the
    /// typed zero value of its column and is overwritten in place.
    fn get_field(&mut self, values: &mut [Value]) -> Result<(), DriverError>;

    /// Run an INSERT, returning the generated id (0 when none).
    fn insert(&mut self, sql: &str) -> Result<u64, DriverError>;

    /// Run an UPDATE, returning the affected row count.
    fn update(&mut self, sql: &str) -> Result<u64, DriverError>;

    /// Run a DELETE, returning the affected row count.
    fn delete(&mut self, sql: &str) -> Result<u64, DriverError>;

    fn execute(&mut self, sql: &str) -> Result<(), DriverError>;

    fn check_table_exist(&mut self, table: &str) -> Result<bool, DriverError>;
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn release(&mut self) -> Result<(), DriverError> {
        (**self).release()
    }

    fn begin_transaction(&mut self) -> Result<(), DriverError> {
        (**self).begin_transaction()
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        (**self).rollback()
    }

    fn query(&mut self, sql: &str) -> Result<(), DriverError> {
        (**self).query(sql)
    }

    fn next(&mut self) -> Result<bool, DriverError> {
        (**self).next()
    }

    fn finish(&mut self) -> Result<(), DriverError> {
        (**self).finish()
    }

    fn get_field(&mut self, values: &mut [Value]) -> Result<(), DriverError> {
        (**self).get_field(values)
    }

    fn insert(&mut self, sql: &str) -> Result<u64, DriverError> {
        (**self).insert(sql)
    }

    fn update(&mut self, sql: &str) -> Result<u64, DriverError> {
        (**self).update(sql)
    }

    fn delete(&mut self, sql: &str) -> Result<u64, DriverError> {
        (**self).delete(sql)
    }

    fn execute(&mut self, sql: &str) -> Result<(), DriverError> {
        (**self).execute(sql)
    }

    fn check_table_exist(&mut self, table: &str) -> Result<bool, DriverError> {
        (**self).check_table_exist(table)
    }
}

///
/// Connector
/// Driver factory: opens one executor per call.
///

pub trait Connector: Send + Sync {
    fn connect(&self, config: &ServerConfig) -> Result<Box<dyn Executor>, DriverError>;
}
