use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use predicates::prelude::*;
use tempfile::TempDir;

fn invx(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("invx").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

/// Temp dir holding an empty config file, so the user's config is never read.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    (dir, config)
}

fn only_file(dir: &Path, prefix: &str) -> PathBuf {
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    assert_eq!(matches.len(), 1, "expected one {}* file in {}", prefix, dir.display());
    matches.remove(0)
}

fn read_sheet(path: &Path, name: &str) -> Vec<Vec<String>> {
    let bytes = fs::read(path).unwrap();
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range(name).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[test]
fn sample_writes_laser_cutting_workbook() {
    let (dir, config) = workspace();
    let out = dir.path().join("out");

    invx(&config)
        .args(["sample", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let path = only_file(&out, "Laser_Cutting_Invoice_");
    let grid = read_sheet(&path, "Manufacturing Invoice");
    assert_eq!(grid[0][2], "Karnataka, Code : 29");
    assert_eq!(grid.len(), 14);
}

#[test]
fn export_names_file_after_invoice_number() {
    let (dir, config) = workspace();
    let input = dir.path().join("invoice.json");
    fs::write(&input, r#"{"invoiceNumber": "X", "total": "10.00"}"#).unwrap();

    invx(&config)
        .arg("export")
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Export successful"));

    let grid = read_sheet(&dir.path().join("Invoice_X.xlsx"), "Invoice Data");
    assert_eq!(grid[2][0], "SI No.");
    assert_eq!(grid[3][1], "X");
}

#[test]
fn export_without_data_fails() {
    let (dir, config) = workspace();
    let input = dir.path().join("empty.json");
    fs::write(&input, "[]").unwrap();

    invx(&config)
        .arg("export")
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data to export"));
}

#[test]
fn export_template_uses_sample() {
    let (dir, config) = workspace();

    invx(&config)
        .args(["export", "--template", "construction", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("Invoice_INV-2023-001.xlsx").exists());
}

#[test]
fn export_rejects_unknown_template() {
    let (dir, config) = workspace();

    invx(&config)
        .args(["export", "--template", "retail", "-o"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn process_prints_csv() {
    let (dir, config) = workspace();
    let scan = dir.path().join("scan.png");
    fs::write(&scan, b"not really a png").unwrap();

    invx(&config)
        .arg("process")
        .arg(&scan)
        .args(["--fast", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice #,1234567,Date,2023-04-15"))
        .stdout(predicate::str::contains("Widget A,5,$10.00,$50.00"));
}

#[test]
fn process_rejects_text_files() {
    let (dir, config) = workspace();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "hello").unwrap();

    invx(&config)
        .arg("process")
        .arg(&notes)
        .arg("--fast")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid file type"));
}

#[test]
fn batch_aggregates_pdf_and_json() {
    let (dir, config) = workspace();
    let input = dir.path().join("in");
    let out = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a.pdf"), b"%PDF-1.4").unwrap();
    fs::write(input.join("b.json"), r#"[{"invoiceNumber": "J1", "total": "5"}, {}]"#).unwrap();
    fs::write(input.join("c.txt"), "ignored").unwrap();

    invx(&config)
        .arg("batch")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("Exported 2 records"));

    let grid = read_sheet(&only_file(&out, "Invoice_Export_"), "Manufacturing Invoice");
    assert_eq!(grid[0][2], "Aggregated Invoices");
    assert_eq!(grid[3][1], "INV-a");
    assert_eq!(grid[3][8], "$1,234.56");
    assert_eq!(grid[4][1], "J1");

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("Invoice #,Date,Material ID,Total,Items"));
}

#[test]
fn batch_continues_past_unreadable_images() {
    let (dir, config) = workspace();
    let input = dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("broken.png"), b"garbage").unwrap();

    invx(&config)
        .arg("batch")
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("No data to export."))
        .stdout(predicate::str::contains("Failed files:"));
}

#[test]
fn config_set_then_get() {
    let (dir, _) = workspace();
    let config = dir.path().join("nested").join("config.json");

    invx(&config)
        .args(["config", "set", "export.export_name", "Laser"])
        .assert()
        .success();

    invx(&config)
        .args(["config", "get", "export.export_name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Laser\""));

    invx(&config)
        .args(["config", "set", "export.missing", "1"])
        .assert()
        .failure();
}

#[test]
fn export_tsv_reports_copy() {
    let (dir, config) = workspace();
    let input = dir.path().join("invoice.json");
    fs::write(&input, r#"{"invoiceNumber": "X", "total": "10.00"}"#).unwrap();

    invx(&config)
        .arg("export")
        .arg(&input)
        .arg("--tsv")
        .assert()
        .success()
        .stdout(predicate::str::contains("SI No.\t"))
        .stderr(predicate::str::contains("Copied to clipboard"));
}
