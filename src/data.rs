//! In-memory row/column model shared by the ingestion stages.
//!
//! [`RawTable`] is what the extractor produces: ordered header labels plus
//! data rows whose cell counts may still disagree with the header count.
//! [`RecordSet`] is the normalized form: every row has exactly one cell per
//! header, and absent values are `None` rather than sentinel strings.

use std::fmt;

/// Conventional "no date recorded" value emitted by the source system.
pub const ZERO_DATE: &str = "0000-00-00";
/// Datetime variant of [`ZERO_DATE`].
pub const ZERO_DATETIME: &str = "0000-00-00 00:00:00";

/// Returns true for cell text that stands in for an absent value.
pub fn is_null_sentinel(value: &str) -> bool {
    value.is_empty() || value == ZERO_DATE || value == ZERO_DATETIME
}

/// Raw extraction output: header labels and possibly ragged data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A rectangular table: `rows[i].len() == headers.len()` for every row.
///
/// The normalizer upholds the invariant; downstream stages rely on it and
/// index cells positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RecordSet {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Inserts a constant-valued column at position 0 of every row.
    ///
    /// Used to stamp the tenant/subdomain label onto an export that does not
    /// carry it.
    pub fn prepend_constant_column(&mut self, header: &str, value: &str) {
        self.headers.insert(0, header.to_string());
        for row in &mut self.rows {
            row.insert(0, Some(value.to_string()));
        }
    }
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row(s) x {} column(s)",
            self.row_count(),
            self.column_count()
        )
    }
}

/// Renders an optional cell for human-facing output (preview, CSV export).
pub fn cell_display(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or("")
}
