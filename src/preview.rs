use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, data::cell_display, extract, io_utils, normalize, repair, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let markup = io_utils::read_text(&args.input, encoding)?;
    let (repaired, _) = repair::repair_markup(&markup);
    let raw = extract::extract_table(&repaired)?;
    let (records, _) = normalize::normalize(raw);

    let column_count = if args.columns == 0 {
        records.column_count()
    } else {
        records.column_count().min(args.columns)
    };
    let headers: Vec<String> = records.headers[..column_count].to_vec();
    let rows: Vec<Vec<String>> = records
        .rows
        .iter()
        .take(args.rows)
        .map(|row| {
            row[..column_count]
                .iter()
                .map(|cell| cell_display(cell).to_string())
                .collect()
        })
        .collect();

    table::print_table(&headers, &rows);
    info!(
        "Displayed {} of {} row(s), {} of {} column(s)",
        rows.len(),
        records.row_count(),
        column_count,
        records.column_count()
    );
    Ok(())
}
