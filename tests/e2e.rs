// SPDX-License-Identifier: MIT

//! End-to-end runs of the `reviewgate` binary.
//!
//! The contract under test: the marker-delimited JSON block is always present
//! and always parses, whichever path the pipeline took, and the exit code
//! follows the verdict policy.

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const START: &str = "=== AI REVIEW JSON START ===";
const END: &str = "=== AI REVIEW JSON END ===";

/// All environment the gate reads; scrubbed so host configuration cannot
/// leak into the tests.
const ENV_VARS: &[&str] = &[
    "AI_REVIEW_BACKEND",
    "AI_REVIEW_MODEL",
    "AI_REVIEW_ENDPOINT",
    "AI_REVIEW_MAX_DIFF_CHARS",
    "AI_REVIEW_TIMEOUT_SECS",
    "AI_REVIEW_STRICT",
    "AI_REVIEW_TEMPERATURE",
    "OLLAMA_MODEL",
    "OLLAMA_URL",
];

fn gate(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reviewgate").unwrap();
    cmd.current_dir(dir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn write_rules(dir: &Path) {
    fs::create_dir_all(dir.join("ci")).unwrap();
    fs::write(
        dir.join("ci/ai_checks.md"),
        "Review rules.\nEmit {overall_status, checks, notes}.",
    )
    .unwrap();
}

/// Extract and parse the JSON block between the markers.
fn verdict_json(stdout: &str) -> serde_json::Value {
    let start = stdout.find(START).expect("start marker") + START.len();
    let end = stdout.rfind(END).expect("end marker");
    serde_json::from_str(stdout[start..end].trim()).expect("verdict must parse")
}

// ─── Missing rules document ──────────────────────────────────────────────────

#[test]
fn missing_rules_emits_unknown_and_exits_zero() {
    let dir = TempDir::new().unwrap();

    let output = gate(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdict = verdict_json(&stdout);
    assert_eq!(verdict["overall_status"], "unknown");
}

#[test]
fn missing_rules_in_strict_mode_exits_one() {
    let dir = TempDir::new().unwrap();

    gate(dir.path())
        .env("AI_REVIEW_STRICT", "1")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains(START))
        .stdout(predicate::str::contains("\"overall_status\": \"unknown\""));
}

// ─── Dry-run backend ─────────────────────────────────────────────────────────

#[test]
fn dryrun_backend_passes_without_a_model_server() {
    let dir = TempDir::new().unwrap();
    write_rules(dir.path());

    gate(dir.path())
        .env("AI_REVIEW_BACKEND", "dryrun")
        .assert()
        .success()
        .stdout(predicate::str::contains(START))
        .stdout(predicate::str::contains(END))
        .stdout(predicate::str::contains("\"overall_status\": \"pass\""));
}

// ─── No changes short-circuit ────────────────────────────────────────────────

fn git(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "test")
        .env("GIT_AUTHOR_EMAIL", "test@test.invalid")
        .env("GIT_COMMITTER_NAME", "test")
        .env("GIT_COMMITTER_EMAIL", "test@test.invalid")
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn empty_diff_passes_without_invoking_the_backend() {
    let dir = TempDir::new().unwrap();
    write_rules(dir.path());

    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "one"]);
    git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "two"]);

    // Endpoint points at a dead port: if the backend were invoked the run
    // would degrade to unknown, so a pass proves the short-circuit.
    let output = gate(dir.path())
        .env("AI_REVIEW_ENDPOINT", "http://127.0.0.1:1")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdict = verdict_json(&stdout);
    assert_eq!(verdict["overall_status"], "pass");
    assert!(
        verdict["notes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n.as_str().unwrap_or_default().contains("No changes")),
    );
}

// ─── Backend failure degrades instead of crashing ────────────────────────────

#[test]
fn unreachable_backend_degrades_to_unknown() {
    let dir = TempDir::new().unwrap();
    write_rules(dir.path());

    let output = gate(dir.path())
        .env("AI_REVIEW_ENDPOINT", "http://127.0.0.1:1")
        .env("AI_REVIEW_TIMEOUT_SECS", "2")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "non-strict degraded run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdict = verdict_json(&stdout);
    assert_eq!(verdict["overall_status"], "unknown");
}

#[test]
fn hosted_backend_degrades_to_unknown() {
    let dir = TempDir::new().unwrap();
    write_rules(dir.path());

    let output = gate(dir.path())
        .env("AI_REVIEW_BACKEND", "hosted")
        .env("AI_REVIEW_STRICT", "1")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1), "strict degraded run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdict = verdict_json(&stdout);
    assert_eq!(verdict["overall_status"], "unknown");
    assert!(
        verdict["notes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n.as_str().unwrap_or_default().contains("not implemented")),
    );
}

// ─── Full pipeline against a mocked model ────────────────────────────────────

async fn mock_model(server: &MockServer, response: &str) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "llama3:8b"}]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": response
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fail_verdict_from_model_exits_one() {
    let server = MockServer::start().await;
    mock_model(
        &server,
        r#"{"overall_status": "fail", "checks": [], "notes": ["x"]}"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    write_rules(dir.path());
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        gate(dir.path())
            .env("AI_REVIEW_ENDPOINT", &uri)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdict = verdict_json(&stdout);
    assert_eq!(verdict["overall_status"], "fail");
    assert_eq!(verdict["notes"][0], "x");
}

#[tokio::test]
async fn pass_verdict_reproduces_checks_unchanged() {
    let server = MockServer::start().await;
    mock_model(
        &server,
        r#"{"overall_status": "pass", "checks": [{"name": "t", "status": "pass", "details": "ok"}], "notes": []}"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    write_rules(dir.path());
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        gate(dir.path())
            .env("AI_REVIEW_ENDPOINT", &uri)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let verdict = verdict_json(&stdout);
    assert_eq!(verdict["overall_status"], "pass");
    assert_eq!(
        verdict["checks"],
        serde_json::json!([{"name": "t", "status": "pass", "details": "ok"}])
    );
}

#[tokio::test]
async fn fenced_model_output_is_salvaged() {
    let server = MockServer::start().await;
    mock_model(
        &server,
        "```json\n{\"overall_status\": \"pass\", \"checks\": [], \"notes\": []}\n```",
    )
    .await;

    let dir = TempDir::new().unwrap();
    write_rules(dir.path());
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        gate(dir.path())
            .env("AI_REVIEW_ENDPOINT", &uri)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let verdict = verdict_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(verdict["overall_status"], "pass");
}

#[tokio::test]
async fn prose_only_model_output_degrades_to_unknown() {
    let server = MockServer::start().await;
    mock_model(&server, "Looks good to me, ship it!").await;

    let dir = TempDir::new().unwrap();
    write_rules(dir.path());
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        gate(dir.path())
            .env("AI_REVIEW_ENDPOINT", &uri)
            .env("AI_REVIEW_STRICT", "1")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let verdict = verdict_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(verdict["overall_status"], "unknown");
}
