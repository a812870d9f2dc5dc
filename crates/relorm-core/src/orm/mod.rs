mod operation;
mod read;
mod schema;
mod write;


use crate::{
    builder::{Builder, MysqlBuilder},
    cache::StructInfoCache,
    error::OrmError,
    executor::{DriverError, Executor},
    value::Value,
};
use tracing::{debug, warn};

// re-exports
pub use operation::{OperationKind, Stage};

///
/// Orm
///
/// Facade over one executor. Every call runs to completion on the caller's
/// thread. Multi-statement writes are not atomic unless wrapped in
/// [`Orm::transaction`]; a failure part way leaves earlier statements
/// committed.
///

pub struct Orm<E: Executor, B: Builder = MysqlBuilder> {
    executor: E,
    cache: StructInfoCache,
    builder: B,
}

impl<E: Executor> Orm<E> {
    pub fn new(executor: E, cache: StructInfoCache) -> Self {
        Self::with_builder(executor, cache, MysqlBuilder)
    }
}

impl<E: Executor, B: Builder> Orm<E, B> {
    pub const fn with_builder(executor: E, cache: StructInfoCache, builder: B) -> Self {
        Self {
            executor,
            cache,
            builder,
        }
    }

    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    pub const fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    #[must_use]
    pub const fn cache(&self) -> &StructInfoCache {
        &self.cache
    }

    #[must_use]
    pub const fn builder(&self) -> &B {
        &self.builder
    }

    /// Hand the executor back to its driver.
    pub fn release(mut self) -> Result<(), OrmError> {
        self.executor.release()?;

        Ok(())
    }

    /// Run `f` inside one transaction: commit when it succeeds, roll back
    /// when it or the commit fails. The first error wins over a rollback
    /// failure.
    pub fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, OrmError>,
    ) -> Result<T, OrmError> {
        self.executor.begin_transaction()?;

        let result = f(self).and_then(|value| {
            self.executor.commit()?;
            Ok(value)
        });
        if result.is_err() {
            self.rollback();
        }

        result
    }

    fn rollback(&mut self) {
        if let Err(err) = self.executor.rollback() {
            warn!(error = %err, "rollback failed");
        }
    }

    // ======================================================================
    // Statement execution
    // ======================================================================

    fn execute(&mut self, sql: &str) -> Result<(), OrmError> {
        debug!(target: "relorm::sql", %sql, "execute");
        self.executor.execute(sql)?;

        Ok(())
    }

    fn exec_insert(&mut self, sql: &str) -> Result<u64, OrmError> {
        debug!(target: "relorm::sql", %sql, "insert");

        Ok(self.executor.insert(sql)?)
    }

    fn exec_update(&mut self, sql: &str) -> Result<u64, OrmError> {
        debug!(target: "relorm::sql", %sql, "update");

        Ok(self.executor.update(sql)?)
    }

    fn exec_delete(&mut self, sql: &str) -> Result<u64, OrmError> {
        debug!(target: "relorm::sql", %sql, "delete");

        Ok(self.executor.delete(sql)?)
    }

    /// Run a query and scan its first row into `scratch`. The cursor is
    /// always finished, even when scanning fails.
    fn fetch_one(&mut self, sql: &str, scratch: &mut [Value]) -> Result<bool, OrmError> {
        debug!(target: "relorm::sql", %sql, "query");
        self.executor.query(sql)?;

        let scanned = self.scan_first(scratch);
        let finished = self.executor.finish();
        let found = scanned?;
        finished?;

        Ok(found)
    }

    /// Run a single-column query and collect every row.
    fn fetch_column(&mut self, sql: &str, zero: &Value) -> Result<Vec<Value>, OrmError> {
        debug!(target: "relorm::sql", %sql, "query");
        self.executor.query(sql)?;

        let scanned = self.scan_all(zero);
        let finished = self.executor.finish();
        let rows = scanned?;
        finished?;

        Ok(rows)
    }

    fn scan_first(&mut self, scratch: &mut [Value]) -> Result<bool, DriverError> {
        if !self.executor.next()? {
            return Ok(false);
        }
        self.executor.get_field(scratch)?;

        Ok(true)
    }

    fn scan_all(&mut self, zero: &Value) -> Result<Vec<Value>, DriverError> {
        let mut rows = Vec::new();
        while self.executor.next()? {
            let mut slot = [zero.clone()];
            self.executor.get_field(&mut slot)?;
            let [value] = slot;
            rows.push(value);
        }

        Ok(rows)
    }
}
