//! Integration tests for CLI argument handling
//!
//! Runs the `pokedex` binary, pointing it at a local mock server where a
//! network round-trip is needed.

use std::process::Command;

use mockito::Server;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pokedex"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pokedex")
}

const PIKACHU: &str = r#"{
    "id": 25,
    "name": "pikachu",
    "height": 4,
    "weight": 60,
    "types": [{"slot": 1, "type": {"name": "electric", "url": ""}}],
    "stats": [{"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": ""}}],
    "abilities": [{"ability": {"name": "static", "url": ""}, "is_hidden": false, "slot": 1}]
}"#;

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pokedex"), "Help should mention pokedex");
    assert!(stdout.contains("list"), "Help should mention the list command");
    assert!(stdout.contains("show"), "Help should mention the show command");
}

#[test]
fn test_show_without_id_fails() {
    let output = run_cli(&["show"]);
    assert!(!output.status.success());
}

#[test]
fn test_zero_page_prints_error_and_exits() {
    let output = run_cli(&["list", "--page", "0"]);
    assert!(!output.status.success(), "Expected page 0 to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid page"),
        "Should print error message about the page: {}",
        stderr
    );
}

#[test]
fn test_show_prints_card_from_server() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/pokemon/pikachu")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PIKACHU)
        .expect(1)
        .create();

    let url = server.url();
    let output = run_cli(&["show", "Pikachu", "--base-url", url.as_str()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#25 Pikachu"), "unexpected output: {}", stdout);
    assert!(stdout.contains("Electric"));
    mock.assert();
}

#[test]
fn test_show_json_output() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/pokemon/25")
        .with_status(200)
        .with_body(PIKACHU)
        .create();

    let url = server.url();
    let output = run_cli(&["show", "25", "--json", "--base-url", url.as_str()]);

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(parsed[0]["name"], "pikachu");
    assert_eq!(parsed[0]["types"][0]["color_hint"], "#F7D02C");
    mock.assert();
}

#[test]
fn test_missing_entry_reports_not_found() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/pokemon/missingno")
        .with_status(404)
        .expect(1)
        .create();

    let url = server.url();
    let output = run_cli(&["show", "missingno", "--max-retries", "0", "--base-url", url.as_str()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missingno: not found"), "stderr: {}", stderr);
    mock.assert();
}
