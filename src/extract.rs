//! Table extraction from repaired markup.
//!
//! Deliberately not a DOM engine: the exports only ever carry one flat
//! `<table>`, so extraction is case-insensitive regex scanning over local
//! blocks. The first `<tr>` supplies the header labels (from `<th>` cells);
//! every later `<tr>` supplies data cells (from `<td>`). Cell text has inner
//! tags stripped, common entities decoded, and surrounding whitespace
//! trimmed. Rows with no cells, or only empty cells, are dropped.

use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;
use thiserror::Error;

use crate::data::RawTable;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no <table> element found in input")]
    NoTable,
    #[error("no header cells (<th>) found in the first table row")]
    NoHeaders,
    #[error("no data rows survived extraction")]
    NoRows,
}

static TABLE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<table\b[^>]*>").expect("table pattern"));
static TABLE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</table\s*>").expect("table close pattern"));
static ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").expect("row pattern"));
static HEADER_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<th\b[^>]*>(.*?)</th\s*>").expect("th pattern"));
static DATA_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td\s*>").expect("td pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Extracts headers and data rows from the first `<table>` in `markup`.
///
/// Returns [`ExtractError::NoTable`] / [`ExtractError::NoHeaders`] for
/// structurally unusable input. An extraction yielding zero data rows is
/// returned as-is; the pipeline decides whether that aborts the run.
pub fn extract_table(markup: &str) -> Result<RawTable, ExtractError> {
    let table = first_table_block(markup).ok_or(ExtractError::NoTable)?;

    let mut rows = ROW.captures_iter(table);
    let header_row = rows.next().ok_or(ExtractError::NoHeaders)?;
    let headers: Vec<String> = HEADER_CELL
        .captures_iter(header_row.get(1).map_or("", |m| m.as_str()))
        .map(|cell| cell_text(cell.get(1).map_or("", |m| m.as_str())))
        .collect();
    if headers.is_empty() {
        return Err(ExtractError::NoHeaders);
    }
    info!("Found {} header column(s)", headers.len());

    let mut data = Vec::new();
    let mut dropped = 0usize;
    for row in rows {
        let body = row.get(1).map_or("", |m| m.as_str());
        let cells: Vec<String> = DATA_CELL
            .captures_iter(body)
            .map(|cell| cell_text(cell.get(1).map_or("", |m| m.as_str())))
            .collect();
        if cells.is_empty() || cells.iter().all(|c| c.is_empty()) {
            dropped += 1;
            continue;
        }
        data.push(cells);
    }
    if dropped > 0 {
        debug!("Dropped {dropped} empty row(s)");
    }
    info!("Extracted {} data row(s)", data.len());

    Ok(RawTable {
        headers,
        rows: data,
    })
}

/// Returns the body of the first table element, tolerating a missing
/// `</table>` by running to end of input.
fn first_table_block(markup: &str) -> Option<&str> {
    let open = TABLE_OPEN.find(markup)?;
    let rest = &markup[open.end()..];
    match TABLE_CLOSE.find(rest) {
        Some(close) => Some(&rest[..close.start()]),
        None => Some(rest),
    }
}

/// Strips inner tags, decodes common entities, and trims whitespace.
fn cell_text(raw: &str) -> String {
    let stripped = TAG.replace_all(raw, "");
    decode_entities(stripped.as_ref()).trim().to_string()
}

/// Decodes the handful of entities that appear in form exports. Anything
/// rarer passes through literally.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
