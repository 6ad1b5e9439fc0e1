use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn repopack() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repopack"));
    cmd.arg("--no-git");
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let assert = cmd.arg("--format").arg("json").assert().success();
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json document")
}

fn paths(doc: &Value) -> Vec<String> {
    doc["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn json_document_for_text_and_binary_files() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("a.go"), b"package main\n");
    write_file(&temp.path().join("b.bin"), &[0x00, 0x01, 0x02]);

    let doc = run_json(repopack().arg(temp.path()));

    assert_eq!(paths(&doc), vec!["a.go", "b.bin"]);
    assert_eq!(doc["files"][0]["language_hint"], "go");
    assert_eq!(doc["files"][0]["content"], "package main\n");
    assert_eq!(doc["files"][1]["is_binary"], true);
    assert!(doc["files"][1].get("content").is_none());
    assert_eq!(doc["summary"]["total_files"], 2);
    assert_eq!(doc["summary"]["total_lines"], 1);
    assert_eq!(doc["summary"]["binary_files"], 1);
    assert!(doc.get("git").is_none());
}

#[test]
fn include_and_exclude_lists() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("main.go"), b"package main\n");
    write_file(&temp.path().join("main_test.go"), b"package main\n");
    write_file(&temp.path().join("README.md"), b"# readme\n");
    write_file(&temp.path().join("notes.txt"), b"notes\n");

    let doc = run_json(
        repopack()
            .arg(temp.path())
            .arg("--include")
            .arg(" *.go , *.md ,")
            .arg("--exclude")
            .arg("*_test.go"),
    );

    assert_eq!(paths(&doc), vec!["README.md", "main.go"]);
}

#[test]
fn excluded_directory_is_pruned() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("app.go"), b"package app\n");
    write_file(&temp.path().join("vendor/dep/dep.go"), b"package dep\n");

    let doc = run_json(repopack().arg(temp.path()).arg("--exclude").arg("vendor"));

    assert_eq!(paths(&doc), vec!["app.go"]);
    assert_eq!(doc["structure"], "```\napp.go\n```");
}

#[test]
fn token_budget_stops_collection() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("1.txt"), &[b'a'; 40]);
    write_file(&temp.path().join("2.txt"), &[b'b'; 40]);
    write_file(&temp.path().join("3.txt"), &[b'c'; 4]);

    let doc = run_json(repopack().arg(temp.path()).arg("--max-tokens").arg("15"));

    assert_eq!(paths(&doc), vec!["1.txt", "2.txt"]);
    assert_eq!(doc["files"][1]["truncated"], true);
    assert!(doc["files"][1].get("content").is_none());
    assert_eq!(
        doc["files"][1]["read_error_message"],
        "omitted due to --max-tokens budget (would add ~10 tokens)"
    );
    assert_eq!(doc["summary"]["skipped_by_token_limit"], 1);
    assert_eq!(doc["summary"]["estimated_tokens"], 10);
}

#[test]
fn max_file_size_truncates_content() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("long.txt"), b"0123456789");

    let doc = run_json(repopack().arg(temp.path()).arg("--max-file-size").arg("4"));

    assert_eq!(doc["files"][0]["content"], "0123");
    assert_eq!(doc["files"][0]["truncated"], true);
    assert_eq!(doc["files"][0]["size"], 10);
}

#[test]
fn markdown_report_with_token_trailer() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("src/lib.rs"), b"pub fn f() {}\n");

    repopack()
        .arg(temp.path())
        .arg("--tokens")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Repository Context\n"))
        .stdout(predicate::str::contains("- Not a git repository\n"))
        .stdout(predicate::str::contains("```\nsrc/\n  lib.rs\n```"))
        .stdout(predicate::str::contains("### File: src/lib.rs\n```\npub fn f() {}\n\n```"))
        .stdout(predicate::str::ends_with("\nEstimated tokens: 4\n"));
}

#[test]
fn output_file_option() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("a.py"), b"print('hi')\n");
    let out = temp.path().join("context.md");

    repopack()
        .arg(temp.path().join("a.py"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("### File: a.py\n```python\nprint('hi')\n\n```"));
}

#[test]
fn missing_input_is_reported_but_not_fatal() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("a.txt"), b"a\n");

    let mut cmd = repopack();
    cmd.arg(temp.path()).arg(temp.path().join("nope"));
    let doc = run_json(&mut cmd);

    assert_eq!(paths(&doc), vec!["a.txt"]);
}

#[test]
fn unwritable_output_fails() {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("a.txt"), b"a\n");

    repopack()
        .arg(temp.path())
        .arg("-o")
        .arg(temp.path().join("missing/dir/out.md"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to write output"));
}

#[test]
fn invalid_pattern_is_rejected() {
    let temp = TempDir::new().unwrap();

    repopack()
        .arg(temp.path())
        .arg("--include")
        .arg("[abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid glob pattern"));
}

#[test]
fn output_is_deterministic() {
    let temp = TempDir::new().unwrap();
    for name in ["z.md", "a/b.rs", "a-b.rs", "m/n/o.txt"] {
        write_file(&temp.path().join(name), name.as_bytes());
    }

    let first = repopack().arg(temp.path()).assert().success();
    let second = repopack().arg(temp.path()).assert().success();

    assert_eq!(first.get_output().stdout, second.get_output().stdout);
}
