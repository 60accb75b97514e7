//! Result-set type definitions
//!
//! Query results are always fully materialized: an ordered list of rows,
//! each row an ordered mapping from column name to text value. Callers
//! never see a live cursor, whichever backend produced the rows.

/// Materialized query results
#[derive(Debug, Clone, Default)]
pub struct QueryResults {
    /// Column names in result order (empty for statements without a result set)
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Row>,
}

/// A single materialized row: ordered (column, value) pairs.
///
/// Values are carried as text; `None` is SQL NULL.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl QueryResults {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// First row, if any (the `want_all = false` access pattern)
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Row {
    pub fn from_pairs(cells: Vec<(String, Option<String>)>) -> Self {
        Self { cells }
    }

    /// Look up a value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Value of the first column (e.g. `SHOW TABLES` output)
    pub fn first_value(&self) -> Option<&str> {
        self.cells.first().and_then(|(_, value)| value.as_deref())
    }

    /// Ordered (column, value) pairs
    pub fn cells(&self) -> &[(String, Option<String>)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
