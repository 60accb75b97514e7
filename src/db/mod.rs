//! Database abstraction layer
//!
//! One call contract over three mutually incompatible native access
//! methods, selected once at startup by capability probing. The
//! [`Database`] trait is the seam the orchestrator programs against;
//! [`Backend`] is the production implementation, tests substitute a
//! recording mock.

pub mod backend;
pub mod batch;
pub mod escape;
pub mod types;

pub use backend::{Backend, BackendKind};
pub use batch::split_statements;
pub use escape::escape_string;
pub use types::{QueryResults, Row};

use crate::error::DbResult;

/// Uniform query interface over whichever backend was selected.
pub trait Database {
    /// Execute one SQL statement and materialize its result set.
    ///
    /// `want_all = false` returns at most the first row.
    ///
    /// # Errors
    /// `DbError::QueryFailed` with the engine's message; the caller decides
    /// whether that is fatal for its stage.
    fn query(&mut self, sql: &str, want_all: bool) -> DbResult<QueryResults>;

    /// Escape untrusted text before interpolation.
    ///
    /// Callers must always route interpolated values through this, even
    /// though the prepared backend makes it a no-op.
    fn sanitize(&self, value: &str) -> String;

    /// Execute a multi-statement document as an ordered batch,
    /// aborting on the first failure.
    fn run_batch(&mut self, document: &str) -> DbResult<()> {
        for statement in split_statements(document) {
            self.query(&statement, true)?;
        }
        Ok(())
    }
}
