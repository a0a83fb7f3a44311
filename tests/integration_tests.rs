use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// A `whichprovides` command isolated from the caller's home config.
fn whichprovides(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("whichprovides").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("WHICHPROVIDES_OS_RELEASE_PATH")
        .env_remove("WHICHPROVIDES_DISTRO_QUALIFIER")
        .env_remove("WHICHPROVIDES_APT_FILE_ACCEPTED_EXIT_CODES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("provides a file"))
        .stdout(predicate::str::contains("--os-release"))
        .stdout(predicate::str::contains("--distro-qualifier"));
}

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("whichprovides"));
}

#[test]
fn test_path_is_required() {
    let home = TempDir::new().unwrap();
    whichprovides(&home).assert().failure();
}

#[test]
fn test_unknown_distro_reports_unknown() {
    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.args(["--os-release", "/nonexistent/os-release", "/bin/sh"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("/bin/sh"))
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_json_output_for_unknown_path() {
    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.args(["--json", "--os-release", "/nonexistent/os-release", "/bin/sh"]);
    let output = cmd.assert().failure().get_output().stdout.clone();

    let reports: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(reports[0]["path"], "/bin/sh");
    assert!(reports[0]["provides"].is_null());
    assert!(reports[0]["canonical_id"].is_null());
}

#[test]
fn test_os_release_from_env() {
    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.env("WHICHPROVIDES_OS_RELEASE_PATH", "/nonexistent/os-release")
        .args(["--json", "/bin/sh", "/bin/ls"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"provides\": null").count(2));
}

#[test]
fn test_missing_config_file_is_error() {
    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.args(["--config", "/nonexistent/whichprovides.toml", "/bin/sh"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_config_file_is_applied() {
    let home = TempDir::new().unwrap();
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "os_release_path = \"/nonexistent/os-release\"").unwrap();

    let mut cmd = whichprovides(&home);
    cmd.arg("--config").arg(config.path()).args(["--json", "/bin/sh"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"provides\": null"));
}

#[test]
fn test_empty_os_release_reports_unknown() {
    let home = TempDir::new().unwrap();
    let mut os_release = NamedTempFile::new().unwrap();
    writeln!(os_release, "NAME=\"No Identity\"").unwrap();

    let mut cmd = whichprovides(&home);
    cmd.arg("--os-release")
        .arg(os_release.path())
        .arg("/bin/sh");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.args(["-vvv", "--json", "--os-release", "/nonexistent/os-release", "/bin/sh"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No distro identifier"))
        .stdout(predicate::str::starts_with("["));
}

#[cfg(unix)]
#[test]
fn test_json_output_for_non_utf8_path() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let home = TempDir::new().unwrap();
    let mut cmd = whichprovides(&home);
    cmd.args(["--json", "--os-release", "/nonexistent/os-release"])
        .arg(OsStr::from_bytes(b"/tmp/lib\xffz.so"));
    let output = cmd.assert().failure().get_output().stdout.clone();

    let reports: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(reports[0]["path"], "/tmp/lib\u{FFFD}z.so");
    assert!(reports[0]["provides"].is_null());
}
