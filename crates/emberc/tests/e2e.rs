//! End-to-end tests driving the `emberc` binary over fixture files.

use std::io::Write;
use std::process::Stdio;
use std::process::Command;

fn emberc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_emberc"))
}

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn clean_source_file_exits_zero_with_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "ok.ember",
        "fun add(a s32, b s32) -> s32 { return a + b; }\n",
    );

    let output = emberc().arg(&path).output().unwrap();
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn unresolved_name_exits_one_and_reports_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "bad.ember", "fun f() { let a = nope; }\n");

    let output = emberc().arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("nope") || stderr.contains("resolve"));
}

#[test]
fn missing_file_exits_two() {
    let output = emberc().arg("/no/such/file.ember").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn dump_tree_flag_prints_parse_tree_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "tree.ember", "let x: s32 = 1;\n");

    let output = emberc().arg("--dump-tree").arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("VarDecl"));
    assert!(stdout.contains("SourceFile"));
}

#[test]
fn reads_from_stdin_when_no_file_given() {
    let mut child = emberc()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"fun f() -> s32 { return 1; }\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
}

#[test]
fn type_mismatch_is_reported_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "mismatch.ember",
        "fun f() -> s32 { return true; }\n",
    );

    let output = emberc().arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn struct_decl_and_field_access_round_trips_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "point.ember",
        "struct Point { x s32, y s32 }\n\
         fun sum(p Point) -> s32 { return p.x + p.y; }\n",
    );

    let output = emberc().arg(&path).output().unwrap();
    assert!(output.status.success());
}

#[test]
fn assignment_statement_resolves_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "assign.ember", "fun main() { let x = 10; x = 20; }\n");

    let output = emberc().arg(&path).output().unwrap();
    assert!(output.status.success());
}

#[test]
fn named_composite_literal_field_access_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "named.ember",
        "struct P { x s32, y s32 }\n\
         fun f() -> s32 { let p = P{x=1,y=2}; let a = p.x; return a; }\n",
    );

    let output = emberc().arg(&path).output().unwrap();
    assert!(output.status.success());
}
