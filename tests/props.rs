//! Property tests for the repair pass and the value codec.

use proptest::prelude::*;

use table2sql::codec;
use table2sql::repair::repair_markup;
use table2sql::schema::{DecimalSpec, FieldSpec, FieldType};

fn markup_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<table>".to_string()),
        Just("</table>".to_string()),
        Just("<tr>".to_string()),
        Just("<tr class=\"odd\">".to_string()),
        Just("</tr>".to_string()),
        Just("    <td>value</td>".to_string()),
        Just("<tr><td>inline</td></tr>".to_string()),
        Just(String::new()),
        "[a-zA-Z0-9 ]{0,16}",
    ]
}

fn field_spec(field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name: "field".to_string(),
        field_type,
        default: None,
    }
}

fn any_field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        Just(FieldType::Integer),
        Just(FieldType::Decimal(DecimalSpec {
            precision: 5,
            scale: 2,
        })),
        Just(FieldType::Varchar(255)),
        Just(FieldType::Text),
        Just(FieldType::Date),
        Just(FieldType::DateTime),
        Just(FieldType::Enum(vec!["Ya".to_string(), "Tidak".to_string()])),
    ]
}

proptest! {
    /// Repairing already-repaired markup must change nothing.
    #[test]
    fn repair_is_idempotent(lines in prop::collection::vec(markup_line(), 0..40)) {
        let input = lines.join("\n");
        let (once, _) = repair_markup(&input);
        let (twice, stats) = repair_markup(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(stats.inserted, 0);
    }

    /// After repair, no `<tr>` opener is left unclosed before the next
    /// opener or the end of the table.
    #[test]
    fn repair_closes_every_row(lines in prop::collection::vec(markup_line(), 0..40)) {
        let input = lines.join("\n");
        let (repaired, _) = repair_markup(&input);
        let mut open = false;
        for line in repaired.lines() {
            let trimmed = line.trim_start();
            let opens = trimmed.starts_with("<tr>") || trimmed.starts_with("<tr ");
            let closes = trimmed.contains("</tr>");
            if opens {
                prop_assert!(!open, "unclosed row before opener: {line:?}");
            }
            if trimmed.starts_with("</table>") {
                prop_assert!(!open, "unclosed row before </table>");
            }
            open = (open || opens) && !closes;
        }
        prop_assert!(!open, "unclosed row at end of input");
    }

    /// Encoding never fails: every cell maps to a non-empty SQL literal, and
    /// textual types always come out quoted.
    #[test]
    fn encode_is_total(cell in ".{0,40}", field_type in any_field_type()) {
        let spec = field_spec(field_type);
        let literal = codec::encode(Some(&cell), &spec);
        prop_assert!(!literal.is_empty());
        if spec.field_type.is_textual() {
            prop_assert!(literal.starts_with('\''), "unquoted literal: {literal}");
            prop_assert!(literal.ends_with('\''));
        }
    }

    /// Quoted literals never leak a bare quote or backslash.
    #[test]
    fn quoting_escapes_every_metacharacter(value in ".{0,40}") {
        let quoted = codec::quoted(&value);
        let inner = &quoted[1..quoted.len() - 1];
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' || c == '\\' {
                prop_assert_eq!(chars.next(), Some(c), "unescaped {} in {}", c, quoted);
            }
        }
    }
}
