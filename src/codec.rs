//! Cell-to-SQL-literal encoding.
//!
//! [`encode`] is total: every (cell, field) pair yields a literal, falling
//! back to the field's default when the value is absent or unrepresentable.
//! No per-cell error surfaces beyond the substitution itself.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    data::{ZERO_DATE, ZERO_DATETIME},
    schema::{FieldSpec, FieldType},
};

/// Encodes one normalized cell as a SQL literal for `spec`.
///
/// `None`, empty text, and the stray pandas artifacts `nan`/`None` all take
/// the default. Otherwise the value is coerced per type, with type-specific
/// fallback to the default on coercion failure.
pub fn encode(cell: Option<&str>, spec: &FieldSpec) -> String {
    let Some(raw) = cell else {
        return default_literal(spec);
    };
    let value = raw.trim();
    if value.is_empty() || value == "nan" || value == "None" {
        return default_literal(spec);
    }

    match &spec.field_type {
        FieldType::Integer => encode_integer(value).unwrap_or_else(|| default_literal(spec)),
        FieldType::Decimal(decimal) => Decimal::from_str(value)
            .ok()
            .map(|parsed| {
                let rounded = parsed.round_dp(decimal.scale);
                format!("{rounded:.prec$}", prec = decimal.scale as usize)
            })
            .unwrap_or_else(|| default_literal(spec)),
        FieldType::Date => {
            if value == ZERO_DATE || value == ZERO_DATETIME {
                return quoted(ZERO_DATE);
            }
            // Keep the date portion, discard any time-of-day suffix. No
            // calendar validation is performed.
            let date = value.split_whitespace().next().unwrap_or(value);
            quoted(date)
        }
        FieldType::DateTime => quoted(value),
        FieldType::Enum(allowed) => {
            if allowed.iter().any(|candidate| candidate == value) {
                quoted(value)
            } else {
                default_literal(spec)
            }
        }
        FieldType::Varchar(_) | FieldType::Text => quoted(value),
    }
}

/// The literal substituted for absent or unrepresentable values.
pub fn default_literal(spec: &FieldSpec) -> String {
    let raw = spec.default_raw();
    match spec.field_type {
        FieldType::Integer | FieldType::Decimal(_) => raw.to_string(),
        _ => quoted(raw),
    }
}

/// Integer coercion tolerates decimal-looking input ("5.0" -> 5) by parsing
/// as float and truncating.
fn encode_integer(value: &str) -> Option<String> {
    if let Ok(parsed) = value.parse::<i64>() {
        return Some(parsed.to_string());
    }
    let parsed: f64 = value.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some((parsed.trunc() as i64).to_string())
}

/// Doubles embedded quotes and backslashes, then single-quotes the whole
/// value.
pub fn quoted(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "''");
    format!("'{escaped}'")
}
