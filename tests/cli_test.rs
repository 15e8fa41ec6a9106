//! CLI Interface Tests
//!
//! Runs the vest-valuator binary against the fixture rate page.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("usd2024.html")
}

fn run(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_vest-valuator"))
        .args(args)
        .env_remove("EXCHANGE_RATE_URL")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_report_from_stdin() {
    let fixture = fixture_path();
    let output = run(
        &["--rates-file", fixture.to_str().unwrap()],
        "Vest Date,Quantity,Price\n16-Jan-2024,200,$200.25\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("=== 株のVest詳細 ==="));
    assert!(stdout.contains("日本円換算: ¥6,007,500.00"));
    assert!(stdout.ends_with("総額: ¥6,007,500.00(実数: 6007500.0)\n"));
}

#[test]
fn test_missing_date_column_exits_with_error() {
    let fixture = fixture_path();
    let output = run(
        &["report", "--rates-file", fixture.to_str().unwrap()],
        "Settled,Quantity,Price\n16-Jan-2024,200,$200.25\n",
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("Vest Date"));
}

#[test]
fn test_rates_lookup() {
    let fixture = fixture_path();
    let output = run(&["rates", "20240104", "--rates-file", fixture.to_str().unwrap()], "");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("20240104: 141.82"));
    assert!(stdout.contains("20240104の為替レート: 141.82"));
}

#[test]
fn test_rates_lookup_not_found() {
    let fixture = fixture_path();
    let output = run(&["rates", "20240102", "--rates-file", fixture.to_str().unwrap()], "");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("20240102の為替レートは見つかりませんでした"));
}
