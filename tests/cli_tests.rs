//! End-to-end tests for the ferro-gl binary

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/history/Allelelist_history.txt")
}

/// Run the binary from an empty directory so no local config is picked up
fn run(args: &[&str]) -> Output {
    let dir = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_ferro-gl"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("IMGTHLA")
        .env("HOME", dir.path())
        .output()
        .expect("failed to run ferro-gl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_liftover_glstring() {
    let history = fixture();
    let output = run(&[
        "liftover",
        "-g",
        "HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01",
        "-s",
        "3.20.0",
        "-t",
        "3.25.0",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01 -> HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01:01\n"
    );
}

#[test]
fn test_liftover_degenerate_genotypes_json() {
    let history = fixture();
    let output = run(&[
        "liftover",
        "-g",
        "HLA-A*03:194+HLA-A*26:03:02^HLA-DRB1*11:11:02+HLA-DRB1*08:01:03",
        "-s",
        "3.18.0",
        "-t",
        "3.25.0",
        "--degenerate-genotypes",
        "--format",
        "json",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["target"], "HLA-A*26:111");
    assert_eq!(value["status"], "partially_converted");
    assert_eq!(value["dropped"].as_array().unwrap().len(), 3);
}

#[test]
fn test_liftover_empty_result() {
    let history = fixture();
    let output = run(&[
        "liftover",
        "-g",
        "HLA-A*26:03:02",
        "-s",
        "3.20.0",
        "-t",
        "3.25.0",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "HLA-A*26:03:02 -> (empty)\n");
}

#[test]
fn test_liftover_strict_unknown_allele_fails() {
    let history = fixture();
    let output = run(&[
        "liftover",
        "-g",
        "HLA-A*99:99",
        "-s",
        "3.20.0",
        "-t",
        "3.25.0",
        "--strict",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("HLA-A*99:99"));
    // reported once, in the requested format
    assert_eq!(err.matches("ERROR").count(), 1, "{}", err);
    assert!(!err.contains("Error:"), "{}", err);
}

#[test]
fn test_liftover_strict_failure_json() {
    let history = fixture();
    let output = run(&[
        "liftover",
        "-g",
        "HLA-A*99:99",
        "-s",
        "3.20.0",
        "-t",
        "3.25.0",
        "--strict",
        "--format",
        "json",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert_eq!(err.lines().count(), 1, "{}", err);
    let value: serde_json::Value = serde_json::from_str(&err).unwrap();
    assert_eq!(value["input"], "HLA-A*99:99");
    assert_eq!(value["code"], "E2003");
}

#[test]
fn test_liftover_bad_uri_json() {
    let history = fixture();
    let output = run(&[
        "liftover",
        "-u",
        "not a uri",
        "-t",
        "3.25.0",
        "--format",
        "json",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert_eq!(err.lines().count(), 1, "{}", err);
    let value: serde_json::Value = serde_json::from_str(&err).unwrap();
    assert_eq!(value["input"], "not a uri");
    assert!(value["error"].is_string());
}

#[test]
fn test_liftover_bad_request_file_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("request.json");
    std::fs::write(&path, "{\"sourceUri\": ").unwrap();

    let history = fixture();
    let output = run(&[
        "liftover",
        "-f",
        path.to_str().unwrap(),
        "--format",
        "json",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert_eq!(err.lines().count(), 1, "{}", err);
    let value: serde_json::Value = serde_json::from_str(&err).unwrap();
    assert_eq!(value["input"], path.to_str().unwrap());
}

#[test]
fn test_liftover_input_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("donors.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "# donors").unwrap();
    writeln!(file, "HLA-A*24:03:01  # donor 1").unwrap();
    writeln!(file, "HLA-A*01:02+").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "HLA-B*07:02:01+HLA-B*08:01:01").unwrap();
    drop(file);

    let history = fixture();
    let output = run(&[
        "liftover",
        "-i",
        path.to_str().unwrap(),
        "-s",
        "3.20.0",
        "-t",
        "3.25.0",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "HLA-A*24:03:01 -> HLA-A*24:03:01:01\nHLA-B*07:02:01+HLA-B*08:01:01\n"
    );
    assert!(stderr(&output).contains("ERROR (line 3)"));
}

#[test]
fn test_liftover_missing_versions() {
    let history = fixture();
    let output = run(&[
        "liftover",
        "-g",
        "HLA-A*01:02",
        "-s",
        "3.20.0",
        "--history",
        history.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--source and --target"));
}

#[test]
fn test_liftover_without_history_fails() {
    let output = run(&["liftover", "-g", "HLA-A*01:02", "-s", "3.20.0", "-t", "3.25.0"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No allele history file"));
}

#[test]
fn test_parse_command() {
    let output = run(&["parse", "HLA-A*01:01+HLA-A*02:01^HLA-B*07:02+HLA-B*08:01"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "multilocus-unphased-genotype\tHLA-A*01:01+HLA-A*02:01^HLA-B*07:02+HLA-B*08:01\n"
    );
}

#[test]
fn test_parse_command_error() {
    let output = run(&["parse", "HLA-A*01:01 +HLA-A*02:01"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Did you mean"));
}

#[test]
fn test_history_versions() {
    let history = fixture();
    let output = run(&["history", "--history", history.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "3.18.0\t3180\n3.20.0\t3200\n3.25.0\t3250\n"
    );
}

#[test]
fn test_history_allele() {
    let history = fixture();
    let output = run(&[
        "history",
        "--history",
        history.to_str().unwrap(),
        "--allele",
        "HLA-A*03:194",
        "--version",
        "3.18.0",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "HLA13000\t3.18.0\tA*03:194\nHLA13000\t3.20.0\tA*03:194\nHLA13000\t3.25.0\tA*26:111\n"
    );
}

#[test]
fn test_config_file_sets_target_and_policy() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ferro-gl.toml");
    std::fs::write(
        &config,
        format!(
            "[history]\npath = {:?}\n\n[liftover]\ntarget = \"3.25.0\"\ngenotype = \"degenerate\"\n",
            fixture().to_str().unwrap()
        ),
    )
    .unwrap();

    let output = run(&[
        "--config",
        config.to_str().unwrap(),
        "liftover",
        "-g",
        "HLA-A*03:194+HLA-A*26:03:02",
        "-s",
        "3.18.0",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "HLA-A*03:194+HLA-A*26:03:02 -> HLA-A*26:111\n");
}
