//! Binary smoke tests
//!
//! Runs the `codeprint` executable against a temporary base path.

mod common;

use std::path::Path;
use std::process::Command;

use common::{commit, init_repo, DAY};

fn codeprint_bin() -> &'static str {
    env!("CARGO_BIN_EXE_codeprint")
}

fn run(base: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(codeprint_bin())
        .arg("--base-path")
        .arg(base)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run codeprint");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

fn setup_user(base: &Path) {
    let user = base.join("octo");
    let repo = init_repo(&user.join("octo_tool.git"));
    commit(&repo, &[("src/main.rs", "fn main() {}\n")], "octo", 1_700_000_000);
    commit(&repo, &[("src/main.rs", "fn main() {\n}\n")], "octo", 1_700_000_000 + DAY);

    std::fs::write(
        user.join("report.json"),
        r#"{
            "contributors": [{"repo": "tool", "contributors": ["octo"]}],
            "commits": {"tool": [
                {"commit": {"author": {"date": "2023-11-14T09:00:00Z"}}},
                {"commit": {"author": {"date": "2023-11-14T09:20:00Z"}}}
            ]}
        }"#,
    )
    .unwrap();
}

#[test]
fn test_select_writes_selection() {
    let base = tempfile::tempdir().unwrap();
    setup_user(base.path());

    let (code, stdout, stderr) = run(base.path(), &["select", "octo"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("tool"));

    let written = std::fs::read_to_string(base.path().join("octo/repository_selection.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["repositories"], serde_json::json!(["tool"]));
    assert_eq!(value["metadata"]["tool"]["stats"]["commit_count"], 4);
}

#[test]
fn test_activity_prints_patterns() {
    let base = tempfile::tempdir().unwrap();
    setup_user(base.path());

    let (code, stdout, stderr) = run(base.path(), &["activity", "octo"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["frequency"]["active_hours"], serde_json::json!(["09-10"]));
    assert_eq!(value["frequency"]["timezone_hint"], "UTC+0 to UTC+2");
    assert_eq!(value["burst_patterns"]["intensity"], "high");
}

#[test]
fn test_missing_report_fails() {
    let base = tempfile::tempdir().unwrap();
    let (code, _stdout, stderr) = run(base.path(), &["select", "nobody"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("report"));
}
