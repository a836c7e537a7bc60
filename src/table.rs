//! Plain-text table rendering for previews.

use std::fmt::Write as _;

/// Cells longer than this are clipped with an ellipsis so wide registration
/// exports stay readable in a terminal.
const MAX_CELL_WIDTH: usize = 30;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| clipped_width(h)).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(clipped_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(widths.len());
    for (idx, width) in widths.iter().enumerate() {
        let value = values.get(idx).map(String::as_str).unwrap_or("");
        let mut cell = clip(value);
        let padding = width.saturating_sub(cell.chars().count());
        cell.push_str(&" ".repeat(padding));
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn clipped_width(value: &str) -> usize {
    clip(value).chars().count()
}

fn clip(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect();
    if sanitized.chars().count() <= MAX_CELL_WIDTH {
        return sanitized;
    }
    let mut clipped: String = sanitized.chars().take(MAX_CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn columns_align_under_headers() {
        let rendered = render_table(
            &strings(&["nama", "kelas"]),
            &[strings(&["Siti", "7A"]), strings(&["Wibisana", "7B"])],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "nama      kelas");
        assert_eq!(lines[1], "--------  -----");
        assert_eq!(lines[2], "Siti      7A");
        assert_eq!(lines[3], "Wibisana  7B");
    }

    #[test]
    fn long_cells_are_clipped() {
        let long = "x".repeat(50);
        let rendered = render_table(&strings(&["h"]), &[vec![long]]);
        let data_line = rendered.lines().nth(2).unwrap();
        assert_eq!(data_line.chars().count(), MAX_CELL_WIDTH);
        assert!(data_line.ends_with("..."));
    }

    #[test]
    fn missing_cells_render_blank() {
        let rendered = render_table(&strings(&["a", "b"]), &[strings(&["1"])]);
        assert!(rendered.lines().nth(2).unwrap().starts_with('1'));
    }

    #[test]
    fn control_characters_become_spaces() {
        let rendered = render_table(&strings(&["a"]), &[strings(&["x\ny"])]);
        assert!(rendered.contains("x y"));
    }
}
