//! Integration tests for the `hwolt` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! profile handling and error exit codes, all without a live OLT.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

const NOWHERE: &str = "/tmp/hwolt-cli-test-nonexistent";

/// Build a [`Command`] for the `hwolt` binary with env isolation.
///
/// Clears all `HWOLT_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn hwolt_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hwolt");
    cmd.env("HOME", NOWHERE)
        .env("XDG_CONFIG_HOME", NOWHERE)
        .env("HWOLT_CONFIG", format!("{NOWHERE}/config.toml"))
        .env_remove("HWOLT_PROFILE")
        .env_remove("HWOLT_HOST")
        .env_remove("HWOLT_PORT")
        .env_remove("HWOLT_USERNAME")
        .env_remove("HWOLT_PASSWORD")
        .env_remove("HWOLT_PROXY")
        .env_remove("HWOLT_TIMEOUT")
        .env_remove("HWOLT_DEBUG")
        .env_remove("HWOLT_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same as [`hwolt_cmd`] but reading `config` from a temp file.
fn hwolt_with_config(config: &Path) -> assert_cmd::Command {
    let mut cmd = hwolt_cmd();
    cmd.env("HWOLT_CONFIG", config);
    cmd
}

const SAMPLE_CONFIG: &str = r#"
default_profile = "lab"

[defaults]
output = "text"
timeout = 2

[profiles.lab]
host = "10.0.0.2"
username = "root"
password = "admin123"

[profiles.edge]
host = "olt-edge.example.net"
port = 2222
proxy = "127.0.0.1:1080"
"#;

fn write_config(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, SAMPLE_CONFIG).unwrap();
    path
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = hwolt_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    hwolt_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Huawei")
            .and(predicate::str::contains("ont"))
            .and(predicate::str::contains("service-port"))
            .and(predicate::str::contains("--proxy")),
    );
}

#[test]
fn test_version_flag() {
    hwolt_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hwolt"));
}

#[test]
fn test_subcommand_help_lists_ont_actions() {
    hwolt_cmd().args(["ont", "--help"]).assert().success().stdout(
        predicate::str::contains("add")
            .and(predicate::str::contains("optical"))
            .and(predicate::str::contains("native-vlan")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    hwolt_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hwolt"));
}

#[test]
fn test_completions_zsh() {
    hwolt_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_invalid_shell() {
    hwolt_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .code(2);
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_vlan_out_of_range_is_rejected() {
    hwolt_cmd()
        .args(["vlan", "add", "5000"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_ont_add_requires_serial_or_file() {
    let output = hwolt_cmd()
        .args(["ont", "add", "--slot", "1", "0", "--description", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--serial"));
}

#[test]
fn test_port_toggle_accepts_only_on_off() {
    hwolt_cmd()
        .args(["port", "fec", "--slot", "1", "0", "maybe"])
        .assert()
        .failure()
        .code(2);
}

// ── Session resolution errors ───────────────────────────────────────

#[test]
fn test_missing_host_is_usage_error() {
    let output = hwolt_cmd().args(["display", "version"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("No OLT host"), "unexpected output:\n{text}");
}

#[test]
fn test_unknown_profile_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let output = hwolt_with_config(&path)
        .args(["--profile", "ghost", "display", "version"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("edge, lab"), "unexpected output:\n{text}");
}

#[test]
fn test_missing_username_is_auth_error() {
    let output = hwolt_cmd()
        .args(["--host", "127.0.0.1", "--password", "x", "display", "version"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_refused_connection_exits_with_connection_code() {
    let output = hwolt_cmd()
        .args([
            "--host", "127.0.0.1", "--port", "1", "-u", "root", "--password", "x", "display",
            "version",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[test]
fn test_destructive_command_needs_yes_without_tty() {
    let output = hwolt_cmd()
        .args(["ont", "delete", "--slot", "1", "0", "3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

// ── Config subcommands ──────────────────────────────────────────────

#[test]
fn test_config_profiles_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    let output = hwolt_with_config(&path)
        .args(["config", "profiles", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "edge");
    assert_eq!(rows[0]["port"], 2222);
    assert_eq!(rows[1]["default"], true);
}

#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    hwolt_with_config(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("password = \"****\"")
                .and(predicate::str::contains("admin123").not()),
        );
}

#[test]
fn test_config_use_switches_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    hwolt_with_config(&path)
        .args(["config", "use", "edge"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("default_profile = \"edge\""), "{saved}");
}

#[test]
fn test_config_use_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    hwolt_with_config(&path)
        .args(["config", "use", "ghost"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_config_set_writes_active_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    hwolt_with_config(&path)
        .args(["--profile", "edge", "config", "set", "enforce_modes", "true"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("enforce_modes = true"), "{saved}");
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir);
    hwolt_with_config(&path)
        .args(["config", "set", "colour", "red"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}
