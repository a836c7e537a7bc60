//! Row normalization: reconcile ragged rows and substitute null sentinels.
//!
//! Cell-count reconciliation is positional: short rows are padded at the end,
//! long rows truncated at the end. That is a best-effort heuristic — a
//! missing cell mid-row shifts everything after it — documented rather than
//! guaranteed. Per cell, a leading apostrophe (the Excel text-forcing
//! marker) is stripped before empty strings and zero-dates become `None`.

use log::{debug, warn};

use crate::data::{RawTable, RecordSet, is_null_sentinel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub padded_rows: usize,
    pub truncated_rows: usize,
}

/// Consumes the raw extraction and produces a rectangular [`RecordSet`].
///
/// Total: every input row survives (padded or truncated, never rejected);
/// an empty input yields an empty record set.
pub fn normalize(table: RawTable) -> (RecordSet, NormalizeReport) {
    let width = table.column_count();
    let mut report = NormalizeReport::default();
    let mut rows = Vec::with_capacity(table.rows.len());

    for (idx, mut cells) in table.rows.into_iter().enumerate() {
        if cells.len() < width {
            debug!(
                "Row {}: padded {} missing cell(s)",
                idx + 1,
                width - cells.len()
            );
            cells.resize(width, String::new());
            report.padded_rows += 1;
        } else if cells.len() > width {
            debug!(
                "Row {}: truncated {} extra cell(s)",
                idx + 1,
                cells.len() - width
            );
            cells.truncate(width);
            report.truncated_rows += 1;
        }
        rows.push(cells.into_iter().map(normalize_cell).collect());
    }

    if report.padded_rows > 0 || report.truncated_rows > 0 {
        warn!(
            "Reconciled ragged rows: {} padded, {} truncated (end-of-row heuristic)",
            report.padded_rows, report.truncated_rows
        );
    }

    (
        RecordSet {
            headers: table.headers,
            rows,
        },
        report,
    )
}

/// Quote-marker stripping happens first, then sentinel substitution, so a
/// literal `'0000-00-00` still normalizes to `None`.
fn normalize_cell(cell: String) -> Option<String> {
    let cleaned = match cell.strip_prefix('\'') {
        Some(rest) => rest.to_string(),
        None => cell,
    };
    if is_null_sentinel(&cleaned) {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let (records, report) = normalize(raw(&["a", "b", "c"], &[&["1", "2"]]));
        assert_eq!(records.rows[0], vec![Some("1".into()), Some("2".into()), None]);
        assert_eq!(report.padded_rows, 1);
    }

    #[test]
    fn long_rows_lose_trailing_cells() {
        let (records, report) = normalize(raw(&["a"], &[&["1", "spill"]]));
        assert_eq!(records.rows[0], vec![Some("1".into())]);
        assert_eq!(report.truncated_rows, 1);
    }

    #[test]
    fn every_row_matches_header_count() {
        let (records, _) = normalize(raw(
            &["a", "b"],
            &[&["1"], &["1", "2"], &["1", "2", "3"]],
        ));
        for row in &records.rows {
            assert_eq!(row.len(), records.column_count());
        }
    }

    #[test]
    fn zero_dates_and_empties_become_null() {
        let (records, _) = normalize(raw(
            &["a", "b", "c"],
            &[&["", "0000-00-00", "0000-00-00 00:00:00"]],
        ));
        assert_eq!(records.rows[0], vec![None, None, None]);
    }

    #[test]
    fn leading_quote_marker_is_stripped_once() {
        let (records, _) = normalize(raw(&["nik", "note"], &[&["'350911", "''quoted"]]));
        assert_eq!(records.rows[0][0].as_deref(), Some("350911"));
        assert_eq!(records.rows[0][1].as_deref(), Some("'quoted"));
    }

    #[test]
    fn quote_stripping_precedes_null_substitution() {
        let (records, _) = normalize(raw(&["d"], &[&["'0000-00-00"]]));
        assert_eq!(records.rows[0][0], None);
    }

    #[test]
    fn empty_table_is_a_valid_outcome() {
        let (records, report) = normalize(raw(&["a"], &[]));
        assert_eq!(records.row_count(), 0);
        assert_eq!(report, NormalizeReport::default());
    }
}
