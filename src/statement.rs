//! SQL statement assembly from a column plan.
//!
//! One `CREATE TABLE` block per run and one single-row `INSERT` per record,
//! fields in plan order. Rows are independent; nothing is batched.

use itertools::Itertools;

use crate::{
    codec,
    project::ColumnPlan,
    schema::{FieldSpec, FieldType, Schema},
};

/// Fields stamped with the generation time instead of the cell value when
/// `--stamp-now` is set: record creation and form submission.
const STAMP_NOW_FIELDS: &[&str] = &["tgl", "tanggal_isi_form"];

/// Emits the DDL for the planned columns.
///
/// The key field is always declared first as an auto-increment primary key,
/// whether or not the source carried it; a secondary index covers the
/// tenant field.
pub fn create_table_statement(schema: &Schema, plan: &ColumnPlan) -> String {
    let mut ddl = format!("CREATE TABLE IF NOT EXISTS `{}` (\n", schema.table);
    ddl.push_str(&format!(
        "  `{}` INT(11) NOT NULL AUTO_INCREMENT,\n",
        schema.key_field
    ));
    for column in &plan.columns {
        if column.spec.name == schema.key_field {
            continue;
        }
        ddl.push_str(&format!("  {},\n", declaration(&column.spec)));
    }
    ddl.push_str(&format!("  PRIMARY KEY (`{}`),\n", schema.key_field));
    ddl.push_str(&format!(
        "  KEY `{0}` (`{0}`)\n",
        schema.tenant_field
    ));
    ddl.push_str(") ENGINE=MyISAM DEFAULT CHARSET=latin1;\n");
    ddl
}

fn declaration(spec: &FieldSpec) -> String {
    let mut decl = format!("`{}` {} NOT NULL", spec.name, spec.field_type.sql_type());
    match &spec.field_type {
        FieldType::Integer => decl.push_str(" DEFAULT 0"),
        FieldType::Decimal(_) => decl.push_str(" DEFAULT 0.00"),
        FieldType::Varchar(_) => {
            decl.push_str(" DEFAULT ");
            decl.push_str(&codec::quoted(spec.default.as_deref().unwrap_or("")));
        }
        FieldType::Enum(_) => {
            if let Some(default) = &spec.default {
                decl.push_str(" DEFAULT ");
                decl.push_str(&codec::quoted(default));
            }
        }
        FieldType::Text | FieldType::Date | FieldType::DateTime => {}
    }
    decl
}

/// Emits one insert for `row` (a full normalized record-set row; the plan's
/// source indices select the cells).
pub fn insert_statement(
    schema: &Schema,
    plan: &ColumnPlan,
    row: &[Option<String>],
    stamp_now: bool,
) -> String {
    let columns = plan
        .columns
        .iter()
        .map(|column| format!("`{}`", column.spec.name))
        .join(", ");
    let values = plan
        .columns
        .iter()
        .map(|column| {
            if stamp_now && STAMP_NOW_FIELDS.contains(&column.spec.name.as_str()) {
                return "NOW()".to_string();
            }
            let cell = row.get(column.source_index).and_then(|c| c.as_deref());
            codec::encode(cell, &column.spec)
        })
        .join(", ");
    format!(
        "INSERT INTO `{}` ({}) VALUES ({});",
        schema.table, columns, values
    )
}
