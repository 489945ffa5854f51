#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn wirekit(home: &TempDir, cwd: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wirekit"));
    cmd.env("WIREKIT_HOME", home.path())
        .env_remove("RUST_LOG")
        .current_dir(cwd.path());
    cmd
}

fn show(home: &TempDir, cwd: &TempDir) -> serde_json::Value {
    let output = wirekit(home, cwd).args(["config", "show"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn show_defaults_without_config_files() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    let config = show(&home, &cwd);
    assert_eq!(config["form"]["buffer_size"], 65536);
    assert_eq!(config["split"]["json"], false);
}

#[test]
fn user_config_is_loaded() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(home.path().join("wirekit.toml"), "[form]\nbuffer_size = 1024\n").unwrap();
    assert_eq!(show(&home, &cwd)["form"]["buffer_size"], 1024);
}

#[test]
fn project_config_wins_over_user_config() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(home.path().join("wirekit.toml"), "[form]\nbuffer_size = 1024\n").unwrap();
    fs::create_dir(cwd.path().join(".wirekit")).unwrap();
    fs::write(
        cwd.path().join(".wirekit/wirekit.toml"),
        "[form]\nbuffer_size = 2048\n",
    )
    .unwrap();
    assert_eq!(show(&home, &cwd)["form"]["buffer_size"], 2048);
}

#[test]
fn invalid_config_warns_and_uses_defaults() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(home.path().join("wirekit.toml"), "not valid [[[").unwrap();
    let output = wirekit(&home, &cwd)
        .args(["config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["form"]["buffer_size"], 65536);
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse"));
}

#[test]
fn config_path_marks_active_file() {
    let home = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(home.path().join("wirekit.toml"), "").unwrap();
    let output = wirekit(&home, &cwd)
        .args(["config", "path"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(".wirekit/wirekit.toml"));
    assert!(lines[1].ends_with("wirekit.toml  (active)"));
}
