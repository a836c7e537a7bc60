//! SQL output writing.
//!
//! The generated file is UTF-8: a comment header with the generation
//! timestamp and record count, the optional `CREATE TABLE` block, then one
//! insert per line.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

use crate::io_utils;

pub fn write_sql(
    path: &Path,
    table: &str,
    create_table: Option<&str>,
    inserts: &[String],
) -> Result<()> {
    let contents = render_sql(table, create_table, inserts, &timestamp());
    io_utils::write_text(path, &contents)
        .with_context(|| format!("Saving SQL to {path:?}"))?;
    info!(
        "Saved {} statement(s) ({} bytes) to '{}'",
        inserts.len(),
        contents.len(),
        path.display()
    );
    Ok(())
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn render_sql(
    table: &str,
    create_table: Option<&str>,
    inserts: &[String],
    generated_at: &str,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("-- SQL INSERT statements for `{table}`\n"));
    out.push_str(&format!("-- Generated: {generated_at}\n"));
    out.push_str(&format!("-- Total records: {}\n\n", inserts.len()));
    if let Some(ddl) = create_table {
        out.push_str(ddl);
        out.push('\n');
    }
    for insert in inserts {
        out.push_str(insert);
        out.push('\n');
    }
    out
}
