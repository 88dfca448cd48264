use assert_cmd::Command;
use std::fs;

#[test]
fn doc_subcommand_prints_documented_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.py");
    fs::write(&input, "def greet(name):\n    print(name)\n").unwrap();

    let output = Command::cargo_bin("codereport")
        .unwrap()
        .args(["doc", input.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("greet function."));
    assert!(stdout.contains("name: Description of name."));
}

#[test]
fn bugs_subcommand_lists_findings() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("risky.py");
    fs::write(&input, "eval(x)\ny = a / 0\n").unwrap();

    Command::cargo_bin("codereport")
        .unwrap()
        .args(["bugs", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("unsafe function 'eval'"))
        .stdout(predicates::str::contains("division by zero at line 2"));
}

#[test]
fn metrics_subcommand_emits_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("m.py");
    fs::write(&input, "def f():\n    if x:\n        pass\n").unwrap();

    let output = Command::cargo_bin("codereport")
        .unwrap()
        .args(["metrics", input.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["function_count"], 1);
    assert_eq!(parsed["complexity"], 2);
}

#[test]
fn review_subcommand_reports_clean_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clean.py");
    fs::write(&input, "def f(a):\n    return a\n").unwrap();

    Command::cargo_bin("codereport")
        .unwrap()
        .args(["review", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("No significant issues found."));
}
