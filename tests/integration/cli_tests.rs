//! Integration tests for the CLI binary.
//!
//! This test is registered as a [[test]] in the docsig-cli crate so that
//! CARGO_BIN_EXE_docsig is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `docsig` binary.
fn docsig_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docsig"))
}

fn run(args: &[&str]) -> Output {
    docsig_binary()
        .args(args)
        .output()
        .expect("failed to execute docsig")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path should be valid UTF-8")
}

const PAYLOAD: &str = r#"{
    "id": "6bf77fce-1275-4ac1-9e0b-81c7580bb2ee",
    "owner": "dd92ad1e-a7f6-46e7-8357-eb2a056ebc9b",
    "schema": "dummy.schema.ink"
}"#;

#[test]
fn cli_help_lists_every_command() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["init", "show", "thumbprint", "sign", "verify", "envelope", "demo"] {
        assert!(stdout.contains(command), "help is missing `{command}`: {stdout}");
    }
    assert!(stdout.contains("--verbose"), "got: {stdout}");
}

#[test]
fn cli_sign_help_names_its_flags() {
    let output = run(&["sign", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--identity", "--payload", "--out"] {
        assert!(stdout.contains(flag), "sign help is missing `{flag}`: {stdout}");
    }
}

#[test]
fn cli_version_matches_package() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("docsig {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn cli_sign_without_payload_is_usage_error() {
    let output = run(&["sign", "--identity", "id.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--payload"));
}

#[test]
fn cli_init_sign_verify() {
    let dir = tempfile::tempdir().unwrap();
    let identity = dir.path().join("alice.json");
    let payload = dir.path().join("payload.json");
    let signed = dir.path().join("signed.json");
    std::fs::write(&payload, PAYLOAD).unwrap();

    let output = run(&["init", "--out", path_str(&identity)]);
    assert!(
        output.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(identity.exists());

    // Refuses to overwrite
    let output = run(&["init", "--out", path_str(&identity)]);
    assert!(!output.status.success());

    let output = run(&["show", "--identity", path_str(&identity)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2048 bits"), "got: {stdout}");
    assert!(stdout.contains("Thumbprint: matches"), "got: {stdout}");

    let output = run(&[
        "sign",
        "--identity",
        path_str(&identity),
        "--payload",
        path_str(&payload),
        "--out",
        path_str(&signed),
    ]);
    assert!(
        output.status.success(),
        "sign failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = run(&["verify", "--document", path_str(&signed)]);
    assert!(
        output.status.success(),
        "verify failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("valid"));

    let output = run(&["envelope", "--document", path_str(&signed)]);
    assert!(output.status.success());
    let envelope: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(envelope["payload"].is_string());
    assert_eq!(envelope["signatures"].as_array().unwrap().len(), 1);
}

#[test]
fn cli_verify_rejects_tampered_document() {
    let dir = tempfile::tempdir().unwrap();
    let identity = dir.path().join("id.json");
    let payload = dir.path().join("payload.json");
    let signed = dir.path().join("signed.json");
    std::fs::write(&payload, PAYLOAD).unwrap();

    assert!(run(&["init", "--out", path_str(&identity)]).status.success());
    assert!(run(&[
        "sign",
        "--identity",
        path_str(&identity),
        "--payload",
        path_str(&payload),
        "--out",
        path_str(&signed),
    ])
    .status
    .success());

    let text = std::fs::read_to_string(&signed).unwrap();
    let tampered = text.replace("dummy.schema.ink", "other.schema.ink");
    assert_ne!(text, tampered);
    std::fs::write(&signed, tampered).unwrap();

    let output = run(&["verify", "--document", path_str(&signed)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("INVALID"));
}

#[test]
fn cli_thumbprint_matches_identity() {
    let dir = tempfile::tempdir().unwrap();
    let identity = dir.path().join("id.json");
    let jwk = dir.path().join("public.json");

    assert!(run(&["init", "--out", path_str(&identity)]).status.success());
    let record: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&identity).unwrap()).unwrap();
    std::fs::write(&jwk, serde_json::to_vec(&record["jwk"]).unwrap()).unwrap();

    let output = run(&["thumbprint", "--jwk", path_str(&jwk)]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        record["id"].as_str().unwrap()
    );
}

#[test]
fn cli_verify_missing_file_fails() {
    let output = run(&["verify", "--document", "/nonexistent/docsig/file.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn cli_demo_runs() {
    let output = run(&["demo"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Signed document verifies: true"), "got: {stdout}");
    assert!(stdout.contains("After changing id to \"1\": false"), "got: {stdout}");
}
