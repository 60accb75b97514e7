//! Native access-method backends
//!
//! Concrete implementations over the MySQL wire protocol. Three access
//! methods exist with mutually incompatible fetch semantics; a capability
//! probe picks the best one once at connection time and the choice is fixed
//! for the life of the handle:
//!
//! - [`PreparedBackend`] — prepared-statement protocol; parameters are
//!   bound server-side, so `sanitize` is a passthrough.
//! - [`BufferedBackend`] — text protocol with fetch-all materialization.
//! - [`LegacyBackend`] — text protocol draining a single-row cursor.
//!
//! Whichever variant wins, `query` returns the same fully materialized
//! [`QueryResults`] shape.

use crate::config::ConnectionConfig;
use crate::db::Database;
use crate::db::escape::escape_string;
use crate::db::types::{QueryResults, Row};
use crate::error::{DbError, DbResult};
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which native access method backs the handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Prepared,
    Buffered,
    Legacy,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Prepared => write!(f, "prepared"),
            BackendKind::Buffered => write!(f, "buffered"),
            BackendKind::Legacy => write!(f, "legacy"),
        }
    }
}

impl BackendKind {
    /// Probe the connection for the best usable access method.
    ///
    /// Fixed priority order: prepared, then buffered, then legacy.
    /// Runs once per process; the result is never re-evaluated.
    fn probe(conn: &mut Conn) -> DbResult<Self> {
        if conn.prep("SELECT 1").is_ok() {
            return Ok(BackendKind::Prepared);
        }
        if conn.query_drop("SELECT 1").is_ok() {
            return Ok(BackendKind::Buffered);
        }
        if let Ok(result) = conn.query_iter("SELECT 1") {
            for _ in result {}
            return Ok(BackendKind::Legacy);
        }
        Err(DbError::NoUsableBackend)
    }
}

/// Tagged union over the three access methods.
///
/// Owned exclusively by this module's callers; the inner connection handle
/// never leaks out. Open once at startup, pass by mutable reference, and
/// call [`Backend::close`] at the end for the housekeeping pass.
pub enum Backend {
    Prepared(PreparedBackend),
    Buffered(BufferedBackend),
    Legacy(LegacyBackend),
}

/// Affected-row count and last-error bookkeeping shared by all variants
#[derive(Debug, Default)]
struct BackendState {
    affected: u64,
    last_error: Option<String>,
}

pub struct PreparedBackend {
    conn: Conn,
    state: BackendState,
}

pub struct BufferedBackend {
    conn: Conn,
    state: BackendState,
}

pub struct LegacyBackend {
    conn: Conn,
    state: BackendState,
}

impl Backend {
    /// Open a connection and wrap it in the best available access method.
    ///
    /// `forced` pins the variant without probing (settings override);
    /// otherwise the capability probe decides.
    ///
    /// # Errors
    /// `DbError::ConnectionFailed` if the connection cannot be established,
    /// `DbError::NoUsableBackend` if every access-method probe fails.
    pub fn open(config: &ConnectionConfig, forced: Option<BackendKind>) -> DbResult<Self> {
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.clone()))
            .tcp_port(config.port)
            .user(Some(config.admin_user.clone()))
            .pass(config.password.clone())
            .db_name(Some(config.database.clone()));
        let mut conn =
            Conn::new(opts).map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let kind = match forced {
            Some(kind) => kind,
            None => BackendKind::probe(&mut conn)?,
        };
        debug!(%kind, "selected database access method");

        Ok(match kind {
            BackendKind::Prepared => Backend::Prepared(PreparedBackend {
                conn,
                state: BackendState::default(),
            }),
            BackendKind::Buffered => Backend::Buffered(BufferedBackend {
                conn,
                state: BackendState::default(),
            }),
            BackendKind::Legacy => Backend::Legacy(LegacyBackend {
                conn,
                state: BackendState::default(),
            }),
        })
    }

    /// The access method backing this handle
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Prepared(_) => BackendKind::Prepared,
            Backend::Buffered(_) => BackendKind::Buffered,
            Backend::Legacy(_) => BackendKind::Legacy,
        }
    }

    /// Rows affected by the most recent statement
    pub fn affected(&self) -> u64 {
        self.state().affected
    }

    /// Message from the most recent failed statement, if any
    pub fn last_error(&self) -> Option<&str> {
        self.state().last_error.as_deref()
    }

    /// Release the handle after a best-effort maintenance pass.
    ///
    /// Every table in the target database gets a repair, optimize, and
    /// flush. Failures are logged and ignored; shutdown always completes.
    pub fn close(mut self) {
        if let Err(e) = self.maintenance() {
            warn!(error = %e, "maintenance pass did not complete");
        }
    }

    fn maintenance(&mut self) -> DbResult<()> {
        let tables = self.query("SHOW TABLES", true)?;
        for row in &tables.rows {
            let Some(table) = row.first_value().map(str::to_owned) else {
                continue;
            };
            for op in ["REPAIR", "OPTIMIZE", "FLUSH"] {
                if let Err(e) = self.query(&format!("{op} TABLE `{table}`"), true) {
                    warn!(%table, %op, error = %e, "table maintenance failed");
                }
            }
        }
        Ok(())
    }

    fn state(&self) -> &BackendState {
        match self {
            Backend::Prepared(b) => &b.state,
            Backend::Buffered(b) => &b.state,
            Backend::Legacy(b) => &b.state,
        }
    }

    fn state_mut(&mut self) -> &mut BackendState {
        match self {
            Backend::Prepared(b) => &mut b.state,
            Backend::Buffered(b) => &mut b.state,
            Backend::Legacy(b) => &mut b.state,
        }
    }

    fn fetch(&mut self, sql: &str) -> Result<(Vec<mysql::Row>, u64), mysql::Error> {
        match self {
            // One prepared-statement cursor, drained into a list
            Backend::Prepared(b) => {
                let stmt = b.conn.prep(sql)?;
                let rows: Vec<mysql::Row> = b.conn.exec(&stmt, ())?;
                let affected = b.conn.affected_rows();
                Ok((rows, affected))
            }
            // Direct fetch-all call
            Backend::Buffered(b) => {
                let rows: Vec<mysql::Row> = b.conn.query(sql)?;
                let affected = b.conn.affected_rows();
                Ok((rows, affected))
            }
            // Single-row-at-a-time cursor, materialized by explicit loop
            Backend::Legacy(b) => {
                let mut result = b.conn.query_iter(sql)?;
                let mut rows = Vec::new();
                while let Some(item) = result.next() {
                    rows.push(item?);
                }
                let affected = result.affected_rows();
                Ok((rows, affected))
            }
        }
    }
}

impl Database for Backend {
    fn query(&mut self, sql: &str, want_all: bool) -> DbResult<QueryResults> {
        match self.fetch(sql) {
            Ok((rows, affected)) => {
                let state = self.state_mut();
                state.affected = affected;
                state.last_error = None;
                Ok(materialize(rows, want_all))
            }
            Err(e) => {
                let message = e.to_string();
                self.state_mut().last_error = Some(message.clone());
                Err(DbError::QueryFailed(message))
            }
        }
    }

    fn sanitize(&self, value: &str) -> String {
        match self {
            // Parameters are server-bound; nothing to escape
            Backend::Prepared(_) => value.to_string(),
            Backend::Buffered(_) | Backend::Legacy(_) => escape_string(value),
        }
    }
}

/// Convert driver rows into the backend-agnostic result shape.
///
/// `want_all = false` keeps only the first row, matching the single-row
/// fetch mode of the public contract.
fn materialize(rows: Vec<mysql::Row>, want_all: bool) -> QueryResults {
    let columns: Vec<String> = rows
        .first()
        .map(|row| {
            row.columns_ref()
                .iter()
                .map(|c| c.name_str().into_owned())
                .collect()
        })
        .unwrap_or_default();

    let keep = if want_all { rows.len() } else { rows.len().min(1) };
    let rows = rows
        .into_iter()
        .take(keep)
        .map(|row| {
            let names: Vec<String> = row
                .columns_ref()
                .iter()
                .map(|c| c.name_str().into_owned())
                .collect();
            let values = row.unwrap();
            Row::from_pairs(names.into_iter().zip(values.into_iter().map(value_text)).collect())
        })
        .collect();

    QueryResults::new(columns, rows)
}

/// Render a wire value as text; NULL stays None.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Int(i) => Some(i.to_string()),
        Value::UInt(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Double(d) => Some(d.to_string()),
        v @ (Value::Date(..) | Value::Time(..)) => {
            Some(v.as_sql(true).trim_matches('\'').to_string())
        }
    }
}
