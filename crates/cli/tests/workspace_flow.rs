use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn codemap() -> Command {
    let mut cmd = Command::cargo_bin("codemap").unwrap();
    cmd.env("CODEMAP_ORACLE", "canned");
    cmd.env_remove("CODEMAP_MAX_TREE_DEPTH");
    cmd.env_remove("CODEMAP_FORCE_BREAKDOWN");
    cmd
}

#[test]
fn map_prints_graph_and_summaries() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("app.py"),
        "def outer():\n    helper()\n\ndef helper():\n    pass\n",
    )
    .unwrap();

    codemap()
        .arg("map")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("outer -> [helper]"))
        .stdout(predicate::str::contains("helper -> []"))
        .stdout(predicate::str::contains("outer : "));
}

#[test]
fn map_skips_malformed_files_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.py"), "def broken(:\n").unwrap();
    fs::write(dir.path().join("good.py"), "def fine():\n    pass\n").unwrap();

    codemap()
        .arg("map")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("fine -> []"));
}

#[test]
fn map_stores_records_that_search_can_rank() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("app.py"),
        "def outer():\n    helper()\n\ndef helper():\n    pass\n",
    )
    .unwrap();
    let store = dir.path().join("records.json");

    codemap()
        .arg("map")
        .arg("--root")
        .arg(dir.path())
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("stored 2 records"));

    codemap()
        .arg("search")
        .arg("helper")
        .arg("--store")
        .arg(&store)
        .arg("--limit")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"helper|outer").unwrap());
}

#[test]
fn map_emits_json_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.py"), "def lone():\n    pass\n").unwrap();

    codemap()
        .arg("map")
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"graph\""))
        .stdout(predicate::str::contains("\"summaries\""));
}

#[test]
fn solve_resolves_the_root_from_its_children() {
    codemap()
        .arg("solve")
        .arg("gather inputs and combine results")
        .assert()
        .success()
        .stdout(predicate::str::contains("level 0: gather inputs and combine results"))
        .stdout(predicate::str::contains("level 1: gather inputs ; combine results"))
        .stdout(predicate::str::contains(
            "result: solved: gather inputs and combine results",
        ));
}

#[test]
fn solve_with_depth_one_never_expands() {
    codemap()
        .arg("solve")
        .arg("gather inputs and combine results")
        .arg("--max-depth")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("level 0:"))
        .stdout(predicate::str::contains("level 1:").not());
}
