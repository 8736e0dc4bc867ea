use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("sigo")
        .env("SIGO_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("sigo")
        .env("SIGO_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuración creada en"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("base_url ="));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[api]\ntimeout_secs = 5\n").unwrap();

    cargo_bin_cmd!("sigo")
        .env("SIGO_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(&config_path).unwrap(),
        "[api]\ntimeout_secs = 5\n"
    );
}

#[test]
fn test_invalid_config_fails_fast() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "[api\nbase_url = ").unwrap();

    cargo_bin_cmd!("sigo")
        .env("SIGO_HOME", dir.path())
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}

#[test]
fn test_config_path_hints_init_when_missing() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("sigo")
        .env("SIGO_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stderr(predicate::str::contains("sigo config init"));
}

#[test]
fn test_config_show_applies_env_override() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[api]\nbase_url = \"http://portal.example/api\"\ntimeout_secs = 0\n",
    )
    .unwrap();

    cargo_bin_cmd!("sigo")
        .env("SIGO_HOME", dir.path())
        .env("SIGO_BASE_URL", "http://override.example/api")
        .env("SIGO_LOG", "sigo_core=debug")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: http://override.example/api"))
        .stdout(predicate::str::contains("timeout: sin límite"))
        .stdout(predicate::str::contains("log: sigo_core=debug"));
}
