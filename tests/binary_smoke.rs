use std::fs;
use std::process::Command;
use tempfile::tempdir;

const DEST: &str = "{{ cookiecutter.project_slug }}";

fn farwrite() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("farwrite"));
    // keep a developer's own config file out of the picture
    cmd.env("FARWRITE_CONFIG", "/nonexistent/farwrite/config.xml");
    cmd
}

#[test]
fn binary_print_config_succeeds() {
    let out = farwrite().arg("--print-config").output().expect("spawn binary");
    assert!(out.status.success());
}

#[test]
fn binary_relocates_source() {
    let td = tempdir().unwrap();
    fs::write(td.path().join("a.txt"), "hi").unwrap();

    let out = farwrite()
        .arg("--src")
        .arg(td.path())
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read_to_string(td.path().join(DEST).join("a.txt")).unwrap(),
        "hi"
    );
    assert!(!td.path().join("a.txt").exists());
}

#[test]
fn binary_fails_on_missing_source() {
    let td = tempdir().unwrap();
    let out = farwrite()
        .arg("--src")
        .arg(td.path().join("missing"))
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("source path not found"), "stderr: {stderr}");
}

#[test]
fn binary_fails_without_source() {
    let out = farwrite().output().expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn binary_json_logs_are_parseable() {
    let td = tempdir().unwrap();
    fs::write(td.path().join("a.txt"), "hi").unwrap();
    let out = farwrite()
        .args(["--log-format", "json", "--log-level", "debug", "--dry-run"])
        .arg(td.path())
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let json_lines: Vec<_> = stdout.lines().filter(|l| l.starts_with('{')).collect();
    assert!(!json_lines.is_empty(), "stdout: {stdout}");
    for line in json_lines {
        serde_json::from_str::<serde_json::Value>(line).expect("valid json log line");
    }
    assert!(td.path().join("a.txt").exists(), "dry-run must not move anything");
}

#[test]
fn binary_logs_one_error_event_with_code() {
    let td = tempdir().unwrap();
    let missing = td.path().join("missing");
    let out = farwrite()
        .args(["--log-format", "json"])
        .arg(&missing)
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let errors: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str::<serde_json::Value>(l).expect("valid json log line"))
        .filter(|v| v["level"] == "ERROR")
        .collect();
    assert_eq!(errors.len(), 1, "stdout: {stdout}");
    assert_eq!(errors[0]["fields"]["code"], "E_SOURCE_NOT_FOUND");
    assert_eq!(errors[0]["fields"]["path"], missing.display().to_string());
}
