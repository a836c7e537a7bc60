//! CSV export of the parsed table, bypassing SQL generation.
//!
//! Runs the same repair/extract/normalize pipeline as `run` and writes the
//! rectangular result as CSV, quoting every field so spreadsheet tools do
//! not re-mangle identifier-like values.

use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use csv::QuoteStyle;
use log::info;

use crate::{cli::ExportArgs, data::cell_display, extract, io_utils, normalize, repair};

pub fn execute(args: &ExportArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let markup = io_utils::read_text(&args.input, encoding)?;
    let (repaired, _) = repair::repair_markup(&markup);
    let raw = extract::extract_table(&repaired)?;
    let (records, _) = normalize::normalize(raw);

    let mut writer = open_csv_writer(&args.output)?;
    writer
        .write_record(records.headers.iter())
        .context("Writing CSV headers")?;
    for (idx, row) in records.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(cell_display))
            .with_context(|| format!("Writing CSV row {}", idx + 1))?;
    }
    writer.flush().context("Flushing CSV writer")?;

    info!(
        "Exported {} row(s) x {} column(s) to '{}'",
        records.row_count(),
        records.column_count(),
        args.output.display()
    );
    Ok(())
}

fn open_csv_writer(path: &Path) -> Result<csv::Writer<Box<dyn Write>>> {
    let base: Box<dyn Write> = if io_utils::is_dash(path) {
        Box::new(std::io::stdout())
    } else {
        Box::new(File::create(path).with_context(|| format!("Creating output file {path:?}"))?)
    };
    let mut builder = csv::WriterBuilder::new();
    builder.quote_style(QuoteStyle::Always).double_quote(true);
    Ok(builder.from_writer(base))
}
