//! Library-level pipeline tests: repair through statement assembly without
//! going through the binary.

use table2sql::{
    extract::{self, ExtractError},
    normalize, project, repair,
    schema::Schema,
    statement,
};

const RAGGED_EXPORT: &str = r#"
<div class="export">
<table width="100%" border="1">
<tr><th>No</th><th>Nama</th><th>NIK</th><th>Anak Ke</th><th>Nilai UN</th></tr>
<tr><td>1</td><td>Budi &amp; Ani</td><td>'3509110301200003</td><td>2</td><td>85.5</td>
<tr><td>2</td><td>Siti</td><td></td><td>0000-00-00</td></tr>
<tr><td>3</td><td>Rahmat</td><td>'3509110301200010</td><td>abc</td><td>90.126</td><td>extra</td></tr>
</table>
</div>
"#;

#[test]
fn ragged_export_round_trips_to_inserts() {
    let (repaired, stats) = repair::repair_markup(RAGGED_EXPORT);
    assert_eq!(stats.inserted, 1);

    let raw = extract::extract_table(&repaired).expect("table extracts");
    assert_eq!(raw.headers.len(), 5);
    assert_eq!(raw.rows.len(), 3);

    let (records, report) = normalize::normalize(raw);
    assert_eq!(report.padded_rows, 1);
    assert_eq!(report.truncated_rows, 1);
    // Entity decoding happens during extraction.
    assert_eq!(records.rows[0][1].as_deref(), Some("Budi & Ani"));
    // "0000-00-00" sits in an integer column here, still nulled textually.
    assert_eq!(records.rows[1][3], None);

    let schema = Schema::embedded().expect("embedded schema");
    let plan = project::build_plan(&records.headers, &schema);
    assert_eq!(
        plan.field_names(),
        vec!["no", "nama", "nik", "anak_ke", "nilai_un"]
    );

    let inserts: Vec<String> = records
        .rows
        .iter()
        .map(|row| statement::insert_statement(&schema, &plan, row, false))
        .collect();
    assert_eq!(inserts.len(), 3);
    assert!(inserts[0].contains("'3509110301200003', 2, 85.50"));
    // Nulled and missing cells take the per-type defaults.
    assert!(inserts[1].contains("'Siti', '', 0, 0.00"));
    // Garbage integers degrade to 0; truncation drops the surplus cell.
    assert!(inserts[2].contains("'Rahmat', '3509110301200010', 0, 90.13"));
    assert!(!inserts[2].contains("extra"));
}

#[test]
fn headers_only_table_yields_no_rows() {
    let markup = "<table><tr><th>No</th><th>Nama</th></tr></table>";
    let raw = extract::extract_table(markup).expect("headers alone still extract");
    let (records, _) = normalize::normalize(raw);
    assert!(records.rows.is_empty());
}

#[test]
fn second_table_is_ignored() {
    let markup = concat!(
        "<table><tr><th>Nama</th></tr><tr><td>first</td></tr></table>",
        "<table><tr><th>Nama</th></tr><tr><td>second</td></tr></table>",
    );
    let raw = extract::extract_table(markup).expect("first table extracts");
    assert_eq!(raw.rows.len(), 1);
    assert_eq!(raw.rows[0][0], "first");
}

#[test]
fn tableless_markup_is_rejected() {
    assert_eq!(
        extract::extract_table("<p>no tables today</p>"),
        Err(ExtractError::NoTable)
    );
}

#[test]
fn tenant_column_joins_the_plan() {
    let markup = "<table><tr><th>Nama</th></tr><tr><td>Sari</td></tr></table>";
    let raw = extract::extract_table(markup).expect("table extracts");
    let (mut records, _) = normalize::normalize(raw);

    let schema = Schema::embedded().expect("embedded schema");
    records.prepend_constant_column(&schema.tenant_field, "sekolah123");

    let plan = project::build_plan(&records.headers, &schema);
    assert_eq!(plan.field_names(), vec!["subdomain", "nama"]);

    let insert = statement::insert_statement(&schema, &plan, &records.rows[0], false);
    assert_eq!(
        insert,
        "INSERT INTO `psb_member` (`subdomain`, `nama`) VALUES ('sekolah123', 'Sari');"
    );
}
