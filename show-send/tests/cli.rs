//! CLI integration tests for show-send.
//!
//! Everything here must fail (or print help) before any network work, so
//! no credentials or connectivity are required.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn show_send() -> Command {
    let mut cmd = Command::cargo_bin("show-send").expect("binary");
    // Deterministic environment: no inherited credentials or config.
    cmd.env_remove("API_KEY")
        .env_remove("API_KEY_SECRET")
        .env_remove("ACCESS_TOKEN")
        .env_remove("ACCESS_TOKEN_SECRET")
        .env("SHOWCAST_CONFIG", "/nonexistent/showcast.toml");
    cmd
}

/// A config whose archive root exists and whose state file does not.
fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let root = dir.path().join("scripts");
    std::fs::create_dir_all(&root).expect("mkdir");
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
            [archive]
            root = "{}"
            state_file = "{}"
            seasons = [6, 6]
            "#,
            root.display(),
            dir.path().join("cursor").display()
        ),
    )
    .expect("write config");
    config_path
}

#[test]
fn wrong_argument_count_fails_fast() {
    show_send()
        .args(["1", "2"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("2 argument(s)"));
}

#[test]
fn non_integer_season_fails_fast() {
    show_send()
        .args(["one", "2", "3"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("SEASON must be a positive integer"));
}

#[test]
fn negative_last_line_is_accepted_but_minus_two_is_not() {
    // -2 passes clap (negative numbers allowed) and dies in validation.
    show_send()
        .args(["1", "1", "-2"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("LAST_LINE must be >= -1"));
}

#[test]
fn stray_keyword_fails_fast() {
    show_send()
        .arg("resume")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("expected 'continue'"));
}

#[test]
fn missing_config_is_reported() {
    show_send()
        .args(["1", "1", "-1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn missing_credentials_are_reported_before_any_posting() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir);

    show_send()
        .args(["1", "1", "-1"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Missing required environment variable: API_KEY",
        ));
}

#[test]
fn continue_without_state_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let config = write_config(&dir);

    show_send()
        .arg("continue")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("State file not found"));
}

#[test]
fn missing_archive_root_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
        [archive]
        root = "/nonexistent/scripts"
        state_file = "/nonexistent/cursor"
        seasons = [6]
        "#,
    )
    .expect("write config");

    show_send()
        .args(["1", "1", "-1"])
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for archive.root"));
}

#[test]
fn help_documents_the_invocation_forms() {
    show_send()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show-send continue"))
        .stdout(predicate::str::contains("SEASON EPISODE LAST_LINE").or(
            predicate::str::contains("POSITION"),
        ));
}
