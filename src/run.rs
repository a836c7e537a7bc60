//! The end-to-end conversion pipeline behind `table2sql run`.
//!
//! Repair -> extract -> normalize -> project -> encode -> assemble, with
//! the interactive menu/paste flow used when no input path is given.
//! Structural failures (no table, no headers, no rows) abort before any
//! output is written; column- and cell-level problems degrade by omission
//! and are reported.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use log::{debug, info};

use crate::{
    cli::RunArgs,
    data::{RecordSet, cell_display},
    extract::{self, ExtractError},
    io_utils, normalize, output,
    project::{self, ColumnPlan},
    repair,
    schema::Schema,
    statement, table,
};

const PROGRESS_EVERY: usize = 50;
const PREVIEW_ROWS: usize = 3;
const PREVIEW_COLUMNS: usize = 8;

pub fn execute(args: &RunArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;

    let interactive = args.input.is_none();
    let markup = match &args.input {
        Some(path) => io_utils::read_text(path, encoding)?,
        None => interactive_input()?,
    };
    if markup.trim().is_empty() {
        return Err(anyhow!("Input is empty"));
    }

    let mut schema = match &args.schema {
        Some(path) => Schema::load(path)?,
        None => Schema::embedded()?,
    };
    if let Some(table) = &args.table {
        schema.table = table.clone();
    }

    let tenant = resolve_tenant(args, interactive)?;

    let (repaired, stats) = repair::repair_markup(&markup);
    if stats.inserted > 0 {
        info!(
            "Repaired markup: inserted {} missing </tr> tag(s)",
            stats.inserted
        );
    }

    let raw = extract::extract_table(&repaired)?;
    let (mut records, _report) = normalize::normalize(raw);
    if records.rows.is_empty() {
        return Err(ExtractError::NoRows.into());
    }
    if let Some(tenant) = &tenant {
        records.prepend_constant_column(&schema.tenant_field, tenant);
        info!(
            "Prepended {} '{}' to {} row(s)",
            schema.tenant_field,
            tenant,
            records.row_count()
        );
    }
    info!("Parsed {records}");

    let plan = project::build_plan(&records.headers, &schema);
    if plan.is_empty() {
        return Err(anyhow!(
            "No source column maps to a known field of `{}`",
            schema.table
        ));
    }

    if interactive {
        print_preview(&records);
        if !args.yes && !confirm("Generate SQL? (y/n): ")? {
            info!("Cancelled");
            return Ok(());
        }
    }

    let inserts = generate_inserts(&schema, &plan, &records, args.stamp_now);
    let create_table = args
        .create_table
        .then(|| statement::create_table_statement(&schema, &plan));

    let destination = resolve_output(args, interactive, &schema.table)?;
    output::write_sql(
        &destination,
        &schema.table,
        create_table.as_deref(),
        &inserts,
    )?;

    info!(
        "Done: {} row(s), {} column(s) used, {} unknown and {} duplicate column(s) skipped",
        inserts.len(),
        plan.columns.len(),
        plan.skipped_unknown.len(),
        plan.skipped_duplicate.len()
    );
    Ok(())
}

fn generate_inserts(
    schema: &Schema,
    plan: &ColumnPlan,
    records: &RecordSet,
    stamp_now: bool,
) -> Vec<String> {
    let total = records.row_count();
    let mut inserts = Vec::with_capacity(total);
    for (idx, row) in records.rows.iter().enumerate() {
        inserts.push(statement::insert_statement(schema, plan, row, stamp_now));
        if (idx + 1) % PROGRESS_EVERY == 0 {
            info!("Generated {}/{} INSERT statement(s)...", idx + 1, total);
        }
    }
    debug!("Generated {} INSERT statement(s)", inserts.len());
    inserts
}

/// Menu flow used when no input path was given: load a file or paste
/// markup terminated by an `END` line.
fn interactive_input() -> Result<String> {
    println!("No input file given.");
    println!("  1. Load HTML from a file");
    println!("  2. Paste HTML (finish with a line reading '{}')", io_utils::PASTE_TERMINATOR);
    let choice = io_utils::prompt_line("Choice (1/2): ")?;
    match choice.as_str() {
        "1" => {
            let path = io_utils::prompt_line("Input HTML file: ")?;
            if path.is_empty() {
                return Err(anyhow!("No input file given"));
            }
            io_utils::read_text(&PathBuf::from(path), encoding_rs::UTF_8)
        }
        "2" => {
            println!(
                "Paste the HTML table below. Type '{}' on its own line to finish:",
                io_utils::PASTE_TERMINATOR
            );
            io_utils::read_pasted_text()
        }
        other => Err(anyhow!("Unknown choice '{other}'")),
    }
}

fn resolve_tenant(args: &RunArgs, interactive: bool) -> Result<Option<String>> {
    if let Some(tenant) = &args.tenant {
        return Ok(Some(tenant.clone()));
    }
    if !interactive {
        return Ok(None);
    }
    let response = io_utils::prompt_line("Tenant/subdomain label (blank to skip): ")?;
    Ok(if response.is_empty() {
        None
    } else {
        Some(response)
    })
}

fn resolve_output(args: &RunArgs, interactive: bool, table: &str) -> Result<PathBuf> {
    if let Some(path) = &args.output {
        return Ok(path.clone());
    }
    let default_name = format!("insert_{table}.sql");
    if !interactive {
        return Ok(PathBuf::from(default_name));
    }
    let response = io_utils::prompt_line(&format!("Output file (default: {default_name}): "))?;
    if response.is_empty() {
        Ok(PathBuf::from(default_name))
    } else {
        Ok(PathBuf::from(io_utils::ensure_sql_extension(&response)))
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let response = io_utils::prompt_line(prompt)?;
    Ok(response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes"))
}

fn print_preview(records: &RecordSet) {
    let column_count = records.column_count().min(PREVIEW_COLUMNS);
    let headers: Vec<String> = records.headers[..column_count].to_vec();
    let rows: Vec<Vec<String>> = records
        .rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| {
            row[..column_count]
                .iter()
                .map(|cell| cell_display(cell).to_string())
                .collect()
        })
        .collect();
    println!(
        "Preview (first {} of {} row(s)):",
        rows.len(),
        records.row_count()
    );
    table::print_table(&headers, &rows);
}
