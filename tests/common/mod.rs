//! Common test utilities and helpers
//!
//! Shared infrastructure for integration tests: a recording database mock
//! that implements the `Database` seam, plus canned fixtures.

use sqlsec::db::{Database, QueryResults, Row, escape_string};
use sqlsec::error::{DbError, DbResult};
use std::collections::VecDeque;

/// Records every executed statement; replies come from a queued script
/// (default: empty success).
pub struct RecordingDb {
    pub executed: Vec<String>,
    responses: VecDeque<DbResult<QueryResults>>,
    escaping: bool,
}

impl RecordingDb {
    /// Buffered-style mock: `sanitize` escapes.
    pub fn new() -> Self {
        Self {
            executed: Vec::new(),
            responses: VecDeque::new(),
            escaping: true,
        }
    }

    /// Prepared-style mock: `sanitize` is a passthrough.
    pub fn passthrough() -> Self {
        Self {
            escaping: false,
            ..Self::new()
        }
    }

    /// Queue a result set for the next query.
    pub fn push_rows(&mut self, rows: Vec<Vec<(&str, Option<&str>)>>) {
        let columns: Vec<String> = rows
            .first()
            .map(|row| row.iter().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .into_iter()
            .map(|cells| {
                Row::from_pairs(
                    cells
                        .into_iter()
                        .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
                        .collect(),
                )
            })
            .collect();
        self.responses.push_back(Ok(QueryResults::new(columns, rows)));
    }

    /// Queue a failure for the next query.
    pub fn push_error(&mut self, message: &str) {
        self.responses
            .push_back(Err(DbError::QueryFailed(message.to_string())));
    }

    /// Queue the engine's datadir answer.
    pub fn push_datadir(&mut self, datadir: &str) {
        self.push_rows(vec![vec![
            ("Variable_name", Some("datadir")),
            ("Value", Some(datadir)),
        ]]);
    }
}

impl Default for RecordingDb {
    fn default() -> Self {
        Self::new()
    }
}

impl Database for RecordingDb {
    fn query(&mut self, sql: &str, _want_all: bool) -> DbResult<QueryResults> {
        self.executed.push(sql.to_string());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResults::default()))
    }

    fn sanitize(&self, value: &str) -> String {
        if self.escaping {
            escape_string(value)
        } else {
            value.to_string()
        }
    }
}

/// A small but realistic schema template carrying all seven tokens.
pub fn sample_schema_template() -> &'static str {
    "-- sqlSec schema [dbVer]\n\
     CREATE USER '[dbUser]'@'%' IDENTIFIED BY '[dbPass]';\n\
     GRANT EXECUTE ON `[dbName]`.* TO '[dbUser]'@'[dbHost]';\n\
     CREATE TABLE `sqlSec_map` (`tbl` VARCHAR(64), `field` VARCHAR(64));\n\
     INSERT INTO `sqlSec_settings` (`seed`, `path`) VALUES ('[dbKey]', '[dbPath]');\n"
}
