pub mod entity;

use crate::{
    config::ServerConfig,
    executor::{Connector, DriverError, Executor},
    value::Value,
};
use std::{
    collections::{BTreeSet, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

///
/// ScriptedExecutor
///
/// In-memory executor for facade tests. Every statement is recorded in
/// `log` as `VERB sql`; table existence follows the CREATE and DROP
/// statements it sees. Inserts hand out sequential ids from 1, updates and
/// deletes report one affected row unless a count was queued.
///

#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    log: Vec<String>,
    tables: BTreeSet<String>,
    next_id: u64,
    updated: VecDeque<u64>,
    deleted: VecDeque<u64>,
    results: VecDeque<Vec<Vec<Value>>>,
    cursor: VecDeque<Vec<Value>>,
    row: Option<Vec<Value>>,
    open_cursors: usize,
    fail_on: Option<String>,
    refuse_commit: bool,
}

impl ScriptedExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `tables` already present in the database.
    #[must_use]
    pub fn with_tables(tables: &[&str]) -> Self {
        Self {
            tables: tables.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Drain the log, keeping the database state.
    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }

    /// Logged entries starting with `verb`.
    #[must_use]
    pub fn entries(&self, verb: &str) -> Vec<&str> {
        self.log
            .iter()
            .filter(|entry| entry.split(' ').next() == Some(verb))
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    #[must_use]
    pub const fn open_cursors(&self) -> usize {
        self.open_cursors
    }

    /// Queue the result set returned by the next `query`.
    pub fn push_rows(&mut self, rows: Vec<Vec<Value>>) {
        self.results.push_back(rows);
    }

    pub fn push_updated(&mut self, count: u64) {
        self.updated.push_back(count);
    }

    pub fn push_deleted(&mut self, count: u64) {
        self.deleted.push_back(count);
    }

    /// Fail every statement containing `fragment`.
    pub fn fail_on(&mut self, fragment: &str) {
        self.fail_on = Some(fragment.to_string());
    }

    /// Fail every `commit`.
    pub const fn refuse_commit(&mut self) {
        self.refuse_commit = true;
    }

    fn record(&mut self, verb: &str, sql: &str) -> Result<(), DriverError> {
        self.log.push(format!("{verb} {sql}"));

        match &self.fail_on {
            Some(fragment) if sql.contains(fragment.as_str()) => {
                Err(DriverError::new(format!("scripted failure on '{fragment}'")))
            }
            _ => Ok(()),
        }
    }
}

/// First backquoted identifier of a statement.
fn quoted_table(sql: &str) -> Option<&str> {
    let start = sql.find('`')? + 1;
    let len = sql[start..].find('`')?;

    Some(&sql[start..start + len])
}

impl Executor for ScriptedExecutor {
    fn release(&mut self) -> Result<(), DriverError> {
        self.log.push("RELEASE".to_string());
        Ok(())
    }

    fn begin_transaction(&mut self) -> Result<(), DriverError> {
        self.log.push("BEGIN".to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.log.push("COMMIT".to_string());
        if self.refuse_commit {
            return Err(DriverError::new("scripted commit failure"));
        }

        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.log.push("ROLLBACK".to_string());
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<(), DriverError> {
        self.record("QUERY", sql)?;
        self.cursor = self.results.pop_front().unwrap_or_default().into();
        self.row = None;
        self.open_cursors += 1;

        Ok(())
    }

    fn next(&mut self) -> Result<bool, DriverError> {
        self.row = self.cursor.pop_front();

        Ok(self.row.is_some())
    }

    fn finish(&mut self) -> Result<(), DriverError> {
        self.cursor.clear();
        self.row = None;
        self.open_cursors = self.open_cursors.saturating_sub(1);

        Ok(())
    }

    fn get_field(&mut self, values: &mut [Value]) -> Result<(), DriverError> {
        let row = self
            .row
            .as_ref()
            .ok_or_else(|| DriverError::new("no current row"))?;
        if row.len() != values.len() {
            return Err(DriverError::new(format!(
                "row has {} columns, {} requested",
                row.len(),
                values.len()
            )));
        }
        for (slot, value) in values.iter_mut().zip(row) {
            *slot = value.clone();
        }

        Ok(())
    }

    fn insert(&mut self, sql: &str) -> Result<u64, DriverError> {
        self.record("INSERT", sql)?;
        self.next_id += 1;

        Ok(self.next_id)
    }

    fn update(&mut self, sql: &str) -> Result<u64, DriverError> {
        self.record("UPDATE", sql)?;

        Ok(self.updated.pop_front().unwrap_or(1))
    }

    fn delete(&mut self, sql: &str) -> Result<u64, DriverError> {
        self.record("DELETE", sql)?;

        Ok(self.deleted.pop_front().unwrap_or(1))
    }

    fn execute(&mut self, sql: &str) -> Result<(), DriverError> {
        self.record("EXECUTE", sql)?;

        if let Some(table) = quoted_table(sql) {
            if sql.starts_with("CREATE TABLE") {
                self.tables.insert(table.to_string());
            } else if sql.starts_with("DROP TABLE") {
                self.tables.remove(table);
            }
        }

        Ok(())
    }

    fn check_table_exist(&mut self, table: &str) -> Result<bool, DriverError> {
        self.record("CHECK", table)?;

        Ok(self.tables.contains(table))
    }
}

///
/// ScriptedConnector
/// Opens a fresh `ScriptedExecutor` per connection and counts them in a
/// shared counter.
///

#[derive(Debug, Default)]
pub struct ScriptedConnector {
    pub connections: Arc<AtomicUsize>,
    pub refuse: bool,
}

impl ScriptedConnector {
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self, config: &ServerConfig) -> Result<Box<dyn Executor>, DriverError> {
        if self.refuse {
            return Err(DriverError::new(format!("refused {}", config.url())));
        }
        self.connections.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(ScriptedExecutor::new()))
    }
}
