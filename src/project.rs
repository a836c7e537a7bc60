//! Header-to-schema projection.
//!
//! Free-text header labels are sanitized to canonical snake_case
//! identifiers, checked against the schema allow-list, and deduplicated
//! (first occurrence wins). The result is a [`ColumnPlan`] computed once per
//! run; unknown and duplicate headers are dropped and reported, never fatal.

use std::collections::HashSet;

use log::{info, warn};

use crate::schema::{DecimalSpec, FieldSpec, FieldType, Schema};

/// Identifier fragments whose values must stay textual even when they look
/// numeric: national IDs, card and phone numbers, postal codes. A numeric
/// parse would corrupt them (precision loss, scientific notation).
const FORCE_TEXT_EXACT: &[&str] = &["kodepos", "npsn", "nsm", "nisn", "nis", "rt", "rw", "handphone"];
const FORCE_TEXT_PREFIXES: &[&str] = &["nik", "nomor_", "telepon", "telp_"];

/// One accepted column: where it sits in the source row and what it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedColumn {
    pub source_index: usize,
    pub spec: FieldSpec,
}

/// Ordered projection of source columns onto schema fields, plus the
/// diagnostic lists of what was dropped.
#[derive(Debug, Clone, Default)]
pub struct ColumnPlan {
    pub columns: Vec<PlannedColumn>,
    pub skipped_unknown: Vec<String>,
    pub skipped_duplicate: Vec<String>,
}

impl ColumnPlan {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.spec.name.as_str())
            .collect()
    }
}

/// Sanitizes a raw header label to a canonical field identifier.
///
/// Lowercase; spaces, slashes, parentheses, hyphens, and periods become
/// underscores; every other non-alphanumeric character is dropped;
/// underscore runs collapse; leading/trailing underscores are trimmed.
pub fn sanitize_field_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        match c {
            ' ' | '/' | '(' | ')' | '-' | '.' => {
                if !out.ends_with('_') {
                    out.push('_');
                }
            }
            c if c.is_alphanumeric() || c == '_' => {
                if c == '_' && out.ends_with('_') {
                    continue;
                }
                out.push(c);
            }
            _ => {}
        }
    }
    out.trim_matches('_').to_string()
}

/// Builds the per-run column plan from the record-set headers.
///
/// Never fails: headers that sanitize to names outside the allow-list, or
/// that repeat an already-accepted name, are recorded and excluded.
pub fn build_plan(headers: &[String], schema: &Schema) -> ColumnPlan {
    let mut plan = ColumnPlan::default();
    let mut accepted: HashSet<String> = HashSet::new();

    for (index, header) in headers.iter().enumerate() {
        let name = sanitize_field_name(header);
        let Some(def) = schema.find(&name) else {
            plan.skipped_unknown.push(name);
            continue;
        };
        if !accepted.insert(name.clone()) {
            plan.skipped_duplicate.push(name);
            continue;
        }
        let field_type = def
            .field_type
            .clone()
            .unwrap_or_else(|| infer_field_type(&name));
        plan.columns.push(PlannedColumn {
            source_index: index,
            spec: FieldSpec {
                name,
                field_type,
                default: def.default.clone(),
            },
        });
    }

    report(&plan);
    plan
}

/// Classifies an allow-listed field that has no explicit schema type.
///
/// Checked in fixed priority order; the force-text override comes first so
/// identifier-like fields never take the numeric rules.
pub fn infer_field_type(name: &str) -> FieldType {
    if is_force_text(name) {
        return FieldType::Varchar(50);
    }
    if name.contains("rapor_semester") {
        return FieldType::Decimal(DecimalSpec {
            precision: 4,
            scale: 2,
        });
    }
    if name.starts_with("peringkat_") || name.starts_with("jumlah_") {
        return FieldType::Integer;
    }
    if name == "tgl" || name == "tanggal_isi_form" {
        return FieldType::DateTime;
    }
    if name.contains("tanggal") && !name.contains("sakit") {
        return FieldType::Date;
    }
    FieldType::Varchar(255)
}

fn is_force_text(name: &str) -> bool {
    FORCE_TEXT_EXACT.contains(&name)
        || FORCE_TEXT_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

fn report(plan: &ColumnPlan) {
    if !plan.skipped_duplicate.is_empty() {
        warn!(
            "Skipped {} duplicate column(s): {}",
            plan.skipped_duplicate.len(),
            plan.skipped_duplicate.join(", ")
        );
    }
    if !plan.skipped_unknown.is_empty() {
        let shown: Vec<&str> = plan
            .skipped_unknown
            .iter()
            .take(10)
            .map(String::as_str)
            .collect();
        let suffix = if plan.skipped_unknown.len() > shown.len() {
            format!(" ... and {} more", plan.skipped_unknown.len() - shown.len())
        } else {
            String::new()
        };
        warn!(
            "Skipped {} unknown column(s): {}{}",
            plan.skipped_unknown.len(),
            shown.join(", "),
            suffix
        );
    }
    info!("Using {} valid column(s)", plan.columns.len());
}
