use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn invoice_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("invoice-details"))
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Config dir with a single known company
fn config_with_company(temp_dir: &TempDir) -> PathBuf {
    let config_path = temp_dir.path().join("config");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(
        config_path.join("companies.toml"),
        "[c-acme]\nname = \"Acme Tolling\"\nstateId = \"TX\"\n",
    )
    .unwrap();
    config_path
}

/// The only file written to `dir`
fn single_output(dir: &Path) -> PathBuf {
    let entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected one file, got {entries:?}");
    entries.into_iter().next().unwrap()
}

#[test]
fn test_help() {
    invoice_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inspect and export invoice details"));
}

#[test]
fn test_version() {
    invoice_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("invoice-details"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invoice-config");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized invoice-details config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("companies.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invoice-config");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_companies_list() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invoice-config");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "companies"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Rentals"))
        .stdout(predicate::str::contains("CA"));
}

#[test]
fn test_companies_empty() {
    let temp_dir = TempDir::new().unwrap();

    invoice_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "companies"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No companies configured"));
}

#[test]
fn test_show_requires_a_source() {
    let temp_dir = TempDir::new().unwrap();

    invoice_cmd()
        .args(["-C", temp_dir.path().to_str().unwrap(), "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Specify one of"));
}

#[test]
fn test_show_without_api_configured() {
    let temp_dir = TempDir::new().unwrap();

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "show",
            "--invoice-id",
            "abc",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API base_url configured"));
}

#[test]
fn test_show_rejects_bad_date() {
    let temp_dir = TempDir::new().unwrap();

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "show",
            "--company",
            "c-acme",
            "--date",
            "2024-13-40",
            "--file",
            &fixture("company_invoice.json"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_show_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = config_with_company(&temp_dir);

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "show",
            "--file",
            &fixture("invoice.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-2024-0042"))
        .stdout(predicate::str::contains("Acme Tolling (TX)"))
        .stdout(predicate::str::contains("March 5, 2024"))
        .stdout(predicate::str::contains("Done"))
        .stdout(predicate::str::contains("$24.75"))
        .stdout(predicate::str::contains("Subtotal: $7.25"))
        .stdout(predicate::str::contains("ABC123").not())
        .stdout(predicate::str::contains(
            "/invoice?companyId=c-acme&date=2024-03-05",
        ))
        .stdout(predicate::str::contains("Export with"));
}

#[test]
fn test_show_expand_lists_items() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = config_with_company(&temp_dir);

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "show",
            "--file",
            &fixture("invoice.json"),
            "--expand",
            "tolls",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC123"))
        .stdout(predicate::str::contains("CIT-9").not());

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "show",
            "--file",
            &fixture("invoice.json"),
            "--all",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC123"))
        .stdout(predicate::str::contains("CIT-9"))
        .stdout(predicate::str::contains("Late Payment"));
}

#[test]
fn test_show_unknown_company() {
    let temp_dir = TempDir::new().unwrap();

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "show",
            "--file",
            &fixture("invoice.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Company"));

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "show",
            "--file",
            &fixture("invoice.json"),
            "--company-name",
            "Walk-in Customer",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Walk-in Customer"));
}

#[test]
fn test_show_company_lookup_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = config_with_company(&temp_dir);

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "show",
            "--company",
            "c-acme",
            "--date",
            "2024-02-01",
            "--file",
            &fixture("company_invoice.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Tolling (TX)"))
        .stdout(predicate::str::contains("February 1, 2024"))
        .stdout(predicate::str::contains("Violations"))
        .stdout(predicate::str::contains("$3.40"))
        .stdout(predicate::str::contains(
            "/invoice?companyId=c-acme&date=2024-02-01",
        ));
}

#[test]
fn test_show_empty_invoice() {
    let temp_dir = TempDir::new().unwrap();

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "show",
            "--file",
            &fixture("empty_invoice.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No invoice items found"))
        .stdout(predicate::str::contains("New (finalized)"))
        .stdout(predicate::str::contains("Export with").not());
}

#[test]
fn test_show_missing_file_fails_after_retry() {
    let temp_dir = TempDir::new().unwrap();

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "show",
            "--file",
            temp_dir.path().join("missing.json").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error loading invoice details"))
        .stderr(predicate::str::contains("after 2 attempt(s)"))
        .stderr(predicate::str::contains("Run the command again to retry"))
        .stderr(predicate::str::contains("Error: ").not());
}

#[test]
fn test_export_csv() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = config_with_company(&temp_dir);
    let out_dir = temp_dir.path().join("out");

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "--file",
            &fixture("invoice.json"),
            "--output",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Data exported to spreadsheet successfully",
        ));

    let path = single_output(&out_dir);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Invoice_Details_INV-2024-0042_"));
    assert!(name.ends_with(".csv"));

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Type,License Plate,State,Toll ID"));
    // tolls, then fees, then violations
    assert!(lines[1].starts_with("Toll,ABC123,TX,555,BK-1001"));
    assert!(lines[2].starts_with("Fee,"));
    assert!(lines[2].contains("Late Payment"));
    assert!(lines[3].starts_with("Violation,"));
    assert!(lines[3].contains("CIT-9"));
}

#[test]
fn test_export_json() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "export",
            "--file",
            &fixture("invoice.json"),
            "--format",
            "json",
            "--output",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success();

    let path = single_output(&out_dir);
    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Type"], "Toll");
    assert_eq!(rows[0]["Toll ID"], 555);
    assert_eq!(rows[0]["Payment Status"], "Paid");
    assert_eq!(rows[1]["Payment Status"], "Unpaid");
    assert_eq!(rows[2]["Payment Status"], "Failed");
}

#[test]
fn test_export_document_source() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = config_with_company(&temp_dir);
    let out_dir = temp_dir.path().join("out");

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "--file",
            &fixture("invoice.json"),
            "--format",
            "typ",
            "--output",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PDF exported successfully"))
        .stderr(predicate::str::contains("Generating PDF..."));

    let path = single_output(&out_dir);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Invoice_INV-2024-0042_"));
    assert!(name.ends_with(".typ"));

    let source = fs::read_to_string(&path).unwrap();
    assert!(source.contains("Invoice INV-2024-0042"));
    assert!(source.contains("Acme Tolling (TX)"));
    assert!(source.contains("Tolls (1 items)"));
    assert!(source.contains("Violations (1 items)"));
}

#[test]
fn test_export_missing_file_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "export",
            "--file",
            temp_dir.path().join("missing.json").to_str().unwrap(),
            "--output",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load invoice"));

    assert!(!out_dir.exists());
}

#[test]
fn test_export_failure_is_reported_once() {
    let temp_dir = TempDir::new().unwrap();
    // A plain file where the output directory should be
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let output = invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "export",
            "--file",
            &fixture("invoice.json"),
            "--output",
            blocker.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(
        stderr.matches("Failed to export data to spreadsheet").count(),
        1,
        "stderr was: {stderr}"
    );
    assert!(!stderr.contains("Error: "), "stderr was: {stderr}");
    assert!(!stderr.contains("ERROR"), "stderr was: {stderr}");
}

#[test]
fn test_null_fields_and_missing_fee_type() {
    let temp_dir = TempDir::new().unwrap();
    let invoice = temp_dir.path().join("nulls.json");
    fs::write(
        &invoice,
        r#"{"id":"n-1","number":"INV-NULL","companyId":null,"invoiceDate":"2024-03-05",
            "status":0,"violations":null,
            "tolls":[{"amount":1.5,"bookingNumber":null,"licensePlate":null,"state":"TX"}],
            "fees":[{"amount":2}]}"#,
    )
    .unwrap();

    invoice_cmd()
        .args([
            "-C",
            temp_dir.path().to_str().unwrap(),
            "show",
            "--file",
            invoice.to_str().unwrap(),
            "--all",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("$3.50"))
        .stdout(predicate::str::contains("Fee Type: Unknown"))
        .stdout(predicate::str::contains("Administrative").not());
}
