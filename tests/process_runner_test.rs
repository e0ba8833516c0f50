// tests/process_runner_test.rs
//! End-to-end tests against a stub console script.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use metasploit_mcp_lib::build_server;
use metasploit_mcp_lib::config::ServerConfig;
use metasploit_mcp_lib::tools::{ProcessRunner, ToolCallInput, EXECUTION_FAILED};

/// Writes an executable `msfconsole` stand-in with the given body.
fn stub_console(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("msfconsole");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn config_for(console: &Path) -> ServerConfig {
    ServerConfig {
        console_path: console.to_string_lossy().into_owned(),
        ..ServerConfig::default()
    }
}

#[tokio::test]
async fn test_arguments_reach_console_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let console = stub_console(&dir, r#"for arg in "$@"; do printf '[%s]' "$arg"; done"#);
    let server = build_server(&config_for(&console), Arc::new(ProcessRunner));

    let result = server
        .registry()
        .invoke(ToolCallInput::new(
            "run-nmap-scan",
            json!({ "target": "10.0.0.5 $(id)", "options": "-sV \"-p 445\"" }),
        ))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(
        result.output,
        "[-q][-n][-x][db_nmap -sV \"-p 445\" 10.0.0.5 $(id)][-x][exit]"
    );
}

#[tokio::test]
async fn test_stub_console_stderr_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let console = stub_console(&dir, "echo 'Framework: 6.4.0'\necho '[-] warning' >&2");
    let server = build_server(&config_for(&console), Arc::new(ProcessRunner));

    let result = server
        .registry()
        .invoke(ToolCallInput::new("get-version", json!({})))
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.output, "[-] warning\n");
    assert_eq!(result.error.as_deref(), Some(EXECUTION_FAILED));
}

#[tokio::test]
async fn test_missing_console_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let console = dir.path().join("not-installed");
    let server = build_server(&config_for(&console), Arc::new(ProcessRunner));

    let result = server
        .registry()
        .invoke(ToolCallInput::new("get-version", json!({})))
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some(EXECUTION_FAILED));
    assert!(!result.output.is_empty());
}
