//! CLI Integration Tests
//!
//! Tests the CLI binary directly using assert_cmd to exercise main.rs code paths.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const RECORDS_YAML: &str = r#"
- fecha: "2024-01-21"
  obra_id: 1
  obra_nombre: Edificio Central
  cliente_id: 10
  cliente_nombre: Construcciones SA
  lider_id: 3
  empleado_id: 7
  empleado_nombre: Carlos
  empleado_apellido: González
  presente: true
- fecha: "2024-02-05"
  obra_id: 1
  obra_nombre: Edificio Central
  cliente_id: 10
  cliente_nombre: Construcciones SA
  lider_id: 3
  empleado_id: 7
  empleado_nombre: Carlos
  empleado_apellido: González
  cargo: Albañil
  presente: true
  tipo_jornada: noche
  horas_extras: 2.5
- fecha: "2024-02-05"
  obra_id: 2
  obra_nombre: Torre Norte
  empleado_id: 8
  empleado_nombre: Lucía
  empleado_apellido: Pérez
  presente: false
"#;

fn obra_sheet() -> Command {
    Command::cargo_bin("obra-sheet").unwrap()
}

fn write_records(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("records.yaml");
    std::fs::write(&path, RECORDS_YAML).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    obra_sheet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("obra-sheet"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    obra_sheet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("obra-sheet"));
}

#[test]
fn test_export_help() {
    obra_sheet()
        .args(["export", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--site"));
}

#[test]
fn test_unknown_subcommand_fails() {
    obra_sheet().arg("calculate").assert().failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let output = dir.path().join("asistencia.xlsx");

    obra_sheet()
        .arg("export")
        .arg(&records)
        .args(["--from", "2024-01-21", "--to", "2024-02-20"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Export Complete"))
        .stdout(predicate::str::contains("Edificio Central"))
        .stdout(predicate::str::contains("Torre Norte"));

    assert!(output.exists());
}

#[test]
fn test_export_site_filter() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let output = dir.path().join("obra2.xlsx");

    obra_sheet()
        .arg("export")
        .arg(&records)
        .args(["--from", "2024-01-21", "--to", "2024-02-20", "--site", "2"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Torre Norte"))
        .stdout(predicate::str::contains("Edificio Central").not());
}

#[test]
fn test_export_default_name_from_config_env() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let config = dir.path().join("obra.yaml");
    std::fs::write(
        &config,
        format!("file_prefix: planilla\noutput_dir: {}\n", dir.path().display()),
    )
    .unwrap();

    obra_sheet()
        .env("OBRA_SHEET_CONFIG", &config)
        .arg("export")
        .arg(&records)
        .args(["--from", "2024-01-21", "--to", "2024-02-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("planilla_"));

    let written: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("planilla_") && name.ends_with(".xlsx"))
        .collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn test_export_inverted_range_fails() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    obra_sheet()
        .arg("export")
        .arg(&records)
        .args(["--from", "2024-02-20", "--to", "2024-01-21"])
        .arg("-o")
        .arg(dir.path().join("out.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidRange"));
}

#[test]
fn test_export_empty_selection_fails() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    obra_sheet()
        .arg("export")
        .arg(&records)
        .args(["--from", "2023-01-01", "--to", "2023-01-31"])
        .arg("-o")
        .arg(dir.path().join("out.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("EmptyExport"));
}

#[test]
fn test_export_bad_date_argument() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    obra_sheet()
        .arg("export")
        .arg(&records)
        .args(["--from", "21/01/2024", "--to", "2024-02-20"])
        .assert()
        .failure();
}

#[test]
fn test_export_invalid_record_reports_index() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("bad.json");
    std::fs::write(
        &records,
        r#"[{"fecha": "2024-13-01", "obra_id": 1, "obra_nombre": "A",
             "empleado_id": 1, "empleado_nombre": "Ana", "empleado_apellido": "Ruiz",
             "presente": true}]"#,
    )
    .unwrap();

    obra_sheet()
        .arg("export")
        .arg(&records)
        .args(["--from", "2024-01-01", "--to", "2024-01-31"])
        .arg("-o")
        .arg(dir.path().join("out.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("record #0"));
}

// ═══════════════════════════════════════════════════════════════════════════
// SUMMARY / PREVIEW / INSPECT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_summary_counts() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    obra_sheet()
        .arg("summary")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("Records:"))
        .stdout(predicate::str::contains("3"))
        .stdout(predicate::str::contains("2.5"));
}

#[test]
fn test_summary_worker_filter() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    obra_sheet()
        .arg("summary")
        .arg(&records)
        .args(["--worker", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Absent:"));
}

#[test]
fn test_summary_verbose_lists_records() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    obra_sheet()
        .arg("summary")
        .arg(&records)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("Albañil"))
        .stdout(predicate::str::contains("Noche"))
        .stdout(predicate::str::contains("Lucía Pérez"));
}

#[test]
fn test_preview_prints_totals() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    obra_sheet()
        .arg("preview")
        .arg(&records)
        .args(["--from", "2024-01-21", "--to", "2024-02-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Carlos González"))
        .stdout(predicate::str::contains("2 days"))
        .stdout(predicate::str::contains("2.5 h"));
}

#[test]
fn test_inspect_lists_formulas() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let output = dir.path().join("asistencia.xlsx");

    obra_sheet()
        .arg("export")
        .arg(&records)
        .args(["--from", "2024-01-21", "--to", "2024-02-20"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    obra_sheet()
        .arg("inspect")
        .arg(&output)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("Edificio Central"))
        .stdout(predicate::str::contains("COUNTIF"));
}

#[test]
fn test_inspect_missing_file_fails() {
    obra_sheet()
        .args(["inspect", "/nonexistent/asistencia.xlsx"])
        .assert()
        .failure();
}
