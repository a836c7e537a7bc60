//! Line-oriented repair of malformed table markup.
//!
//! Registration-tool exports routinely omit `</tr>` before the next `<tr`
//! or before `</table>`. The repair pass walks the text line by line with a
//! single "row open" flag and inserts the missing closers. It is not a
//! parser: a line holding several row markers, or markers nested inline,
//! passes through untouched. The pass is idempotent on well-formed input.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::RepairArgs, io_utils};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// `<tr` openers seen in the input.
    pub row_opens: usize,
    /// `</tr>` closers already present in the input.
    pub row_closes: usize,
    /// Synthetic `</tr>` lines inserted by the pass.
    pub inserted: usize,
}

/// Returns the repaired markup together with counters describing the fix.
///
/// Every `<tr` opener in the output is matched by exactly one `</tr>` before
/// the next opener or the table closer; already-balanced input comes back
/// unchanged.
pub fn repair_markup(markup: &str) -> (String, RepairStats) {
    let mut stats = RepairStats::default();
    let mut fixed: Vec<&str> = Vec::new();
    let mut row_open = false;

    for line in markup.split('\n') {
        let trimmed = line.trim();
        if is_row_opener(trimmed) {
            stats.row_opens += 1;
            if row_open {
                fixed.push("</tr>");
                stats.inserted += 1;
            }
            fixed.push(line);
            row_open = true;
            // An opener and closer on one line count as a closed row.
            if contains_row_closer(trimmed) {
                stats.row_closes += 1;
                row_open = false;
            }
        } else if contains_row_closer(trimmed) {
            stats.row_closes += 1;
            fixed.push(line);
            row_open = false;
        } else if is_table_closer(trimmed) {
            if row_open {
                fixed.push("</tr>");
                stats.inserted += 1;
                row_open = false;
            }
            fixed.push(line);
        } else {
            fixed.push(line);
        }
    }

    if row_open {
        fixed.push("</tr>");
        stats.inserted += 1;
    }

    (fixed.join("\n"), stats)
}

fn is_row_opener(line: &str) -> bool {
    has_tag_prefix(line, "<tr")
}

fn is_table_closer(line: &str) -> bool {
    has_tag_prefix(line, "</table")
}

fn contains_row_closer(line: &str) -> bool {
    line.to_ascii_lowercase().contains("</tr>")
}

/// Case-insensitive prefix check that will not mistake `<track>` for `<tr`.
fn has_tag_prefix(line: &str, prefix: &str) -> bool {
    let lowered = line.to_ascii_lowercase();
    if !lowered.starts_with(prefix) {
        return false;
    }
    match lowered.as_bytes().get(prefix.len()) {
        Some(b) => !b.is_ascii_alphanumeric(),
        None => true,
    }
}

pub fn execute(args: &RepairArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let markup = io_utils::read_text(&args.input, encoding)?;
    let (fixed, stats) = repair_markup(&markup);

    let output = match &args.output {
        Some(path) => path.clone(),
        None => io_utils::default_repair_output(&args.input),
    };
    io_utils::write_text(&output, &fixed)
        .with_context(|| format!("Writing repaired markup to {output:?}"))?;

    info!(
        "Repaired '{}': {} <tr> opener(s), {} existing </tr>, {} inserted -> {}",
        args.input.display(),
        stats.row_opens,
        stats.row_closes,
        stats.inserted,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_closer_before_next_row_opener() {
        let input = "<table>\n<tr>\n<td>1</td>\n<tr>\n<td>2</td>\n</tr>\n</table>";
        let (fixed, stats) = repair_markup(input);
        assert_eq!(
            fixed,
            "<table>\n<tr>\n<td>1</td>\n</tr>\n<tr>\n<td>2</td>\n</tr>\n</table>"
        );
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.row_opens, 2);
    }

    #[test]
    fn inserts_closer_before_table_end() {
        let input = "<table>\n<tr>\n<td>x</td>\n</table>";
        let (fixed, _) = repair_markup(input);
        assert_eq!(fixed, "<table>\n<tr>\n<td>x</td>\n</tr>\n</table>");
    }

    #[test]
    fn closes_trailing_row_at_end_of_input() {
        let input = "<tr>\n<td>last</td>";
        let (fixed, stats) = repair_markup(input);
        assert_eq!(fixed, "<tr>\n<td>last</td>\n</tr>");
        assert_eq!(stats.inserted, 1);
    }

    #[test]
    fn well_formed_input_passes_through_unchanged() {
        let input = "<table>\n<tr>\n<td>a</td>\n</tr>\n</table>";
        let (fixed, stats) = repair_markup(input);
        assert_eq!(fixed, input);
        assert_eq!(stats.inserted, 0);
    }

    #[test]
    fn repair_is_idempotent() {
        let input = "<table>\n<tr>\n<td>1</td>\n<tr>\n<td>2</td>\n<tr attr=\"x\">\n</table>";
        let (once, _) = repair_markup(input);
        let (twice, stats) = repair_markup(&once);
        assert_eq!(once, twice);
        assert_eq!(stats.inserted, 0);
    }

    #[test]
    fn single_line_row_counts_as_closed() {
        let input = "<tr><td>1</td></tr>\n<tr>\n<td>2</td>";
        let (fixed, stats) = repair_markup(input);
        assert_eq!(fixed, "<tr><td>1</td></tr>\n<tr>\n<td>2</td>\n</tr>");
        assert_eq!(stats.inserted, 1);
    }

    #[test]
    fn track_tag_is_not_a_row_opener() {
        let input = "<track>\n<trk>";
        let (fixed, stats) = repair_markup(input);
        assert_eq!(fixed, input);
        assert_eq!(stats.row_opens, 0);
    }
}
