use super::*;
use std::io::Write;
use tempfile::TempDir;

const RECORDS_JSON: &str = r#"[
  {"fecha": "2024-01-21", "obra_id": 1, "obra_nombre": "Edificio Central",
   "cliente_nombre": "Construcciones SA", "lider_id": 3,
   "empleado_id": 7, "empleado_nombre": "Carlos", "empleado_apellido": "González",
   "presente": true, "horas_extras": 0},
  {"fecha": "2024-01-22", "obra_id": 1, "obra_nombre": "Edificio Central",
   "cliente_nombre": "Construcciones SA", "lider_id": 3,
   "empleado_id": 7, "empleado_nombre": "Carlos", "empleado_apellido": "González",
   "presente": true, "horas_extras": 2.5}
]"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_records(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("records.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(RECORDS_JSON.as_bytes()).unwrap();
    path
}

fn range() -> (NaiveDate, NaiveDate) {
    (date(2024, 1, 21), date(2024, 2, 20))
}

// =========================================================================
// Output path Tests
// =========================================================================

#[test]
fn test_default_output_path_uses_prefix_and_date() {
    let config = ReportConfig {
        output_dir: PathBuf::from("reports"),
        ..ReportConfig::default()
    };
    let path = default_output_path(&config, date(2024, 2, 20));
    assert_eq!(path, PathBuf::from("reports/asistencia_2024-02-20.xlsx"));
}

// =========================================================================
// export Tests
// =========================================================================

#[test]
fn test_export_writes_file() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let output = dir.path().join("out.xlsx");

    export(
        records,
        range(),
        RecordQuery::default(),
        Some(output.clone()),
        None,
        false,
    )
    .unwrap();

    assert!(output.exists());
}

#[test]
fn test_export_uses_config_output_dir() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let config_path = dir.path().join("obra.yaml");
    std::fs::write(
        &config_path,
        format!(
            "file_prefix: planilla\noutput_dir: {}\n",
            dir.path().display()
        ),
    )
    .unwrap();

    export(
        records,
        range(),
        RecordQuery::default(),
        None,
        Some(config_path),
        true,
    )
    .unwrap();

    let expected = dir
        .path()
        .join(export_file_name("planilla", today()));
    assert!(expected.exists());
}

#[test]
fn test_export_inverted_range_fails() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let output = dir.path().join("out.xlsx");

    let result = export(
        records,
        (date(2024, 2, 20), date(2024, 1, 21)),
        RecordQuery::default(),
        Some(output.clone()),
        None,
        false,
    );

    assert!(matches!(
        result,
        Err(crate::error::ObraError::InvalidRange { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn test_export_no_matching_site_fails() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let query = RecordQuery {
        site_id: Some("999".to_string()),
        ..RecordQuery::default()
    };

    let result = export(
        records,
        range(),
        query,
        Some(dir.path().join("out.xlsx")),
        None,
        false,
    );

    assert!(matches!(result, Err(crate::error::ObraError::EmptyExport)));
}

#[test]
fn test_export_missing_records_file() {
    let dir = TempDir::new().unwrap();
    let result = export(
        dir.path().join("missing.json"),
        range(),
        RecordQuery::default(),
        Some(dir.path().join("out.xlsx")),
        None,
        false,
    );
    assert!(result.is_err());
}

// =========================================================================
// summary / preview / inspect Tests
// =========================================================================

#[test]
fn test_summary_runs() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    assert!(summary(records.clone(), RecordQuery::default(), false).is_ok());
    assert!(summary(records, RecordQuery::default(), true).is_ok());
}

#[test]
fn test_record_line_shows_position_and_shift() {
    let records = parser::parse_records_json(
        r#"[{"fecha": "2024-01-22", "obra_id": 1, "obra_nombre": "Edificio Central",
             "empleado_id": 7, "empleado_nombre": "Carlos", "empleado_apellido": "González",
             "cargo": "Albañil", "presente": true, "tipo_jornada": "noche",
             "horas_extras": 2.5}]"#,
    )
    .unwrap();
    let line = record_line(&records[0]);
    assert!(line.contains("2024-01-22"));
    assert!(line.contains("Carlos González"));
    assert!(line.contains("Albañil"));
    assert!(line.contains("Noche"));
    assert!(line.contains("present"));
    assert!(line.contains("2.5 h"));
}

#[test]
fn test_record_line_without_position_or_shift() {
    let records = parser::parse_records_json(
        r#"[{"fecha": "2024-01-22", "obra_id": 1, "obra_nombre": "Edificio Central",
             "empleado_id": 7, "empleado_nombre": "Carlos", "empleado_apellido": "González",
             "presente": false}]"#,
    )
    .unwrap();
    let line = record_line(&records[0]);
    assert!(line.contains("absent"));
    assert!(line.contains(" - "));
}

#[test]
fn test_preview_runs() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    assert!(preview(records, range(), RecordQuery::default(), None, true).is_ok());
}

#[test]
fn test_sheet_day_count_matches_range() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let workbook = build_workbook(
        &records,
        range(),
        &RecordQuery::default(),
        &ReportConfig::default(),
        false,
    )
    .unwrap();

    assert_eq!(sheet_day_count(&workbook.sheets[0]), 31);
}

#[test]
fn test_inspect_exported_file() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let output = dir.path().join("out.xlsx");
    export(
        records,
        range(),
        RecordQuery::default(),
        Some(output.clone()),
        None,
        false,
    )
    .unwrap();

    assert!(inspect(output, true).is_ok());
}

#[test]
fn test_inspect_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(inspect(dir.path().join("nope.xlsx"), false).is_err());
}
