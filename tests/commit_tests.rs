use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const HI_BLOB: &str = "32f95c3cf70b7aa19ca88912c84d0cbf7d9e62ae";

fn minigit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("minigit").expect("Failed to find binary");
    cmd.current_dir(dir.path());
    cmd
}

fn init_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    Command::cargo_bin("minigit")
        .unwrap()
        .arg("init")
        .current_dir(&temp_dir)
        .assert()
        .success();
    temp_dir
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

fn head_commit(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join(".git/refs/heads/master"))
        .expect("Failed to read master ref")
        .trim()
        .to_string()
}

/// Follows `refs/heads/master -> commit -> tree` via cat-file.
fn root_tree(dir: &TempDir) -> String {
    let commit = stdout_of(
        minigit(dir)
            .args(["cat-file", "-p", &head_commit(dir)])
            .assert()
            .success(),
    );
    let tree_line = commit
        .lines()
        .find(|l| l.starts_with("tree "))
        .expect("Commit has no tree line");
    tree_line.trim_start_matches("tree ").to_string()
}

#[test]
fn test_single_file_commit() {
    let temp_dir = init_repo();
    fs::write(temp_dir.path().join("hello.txt"), "hi\n").unwrap();

    minigit(&temp_dir).args(["add", "hello.txt"]).assert().success();
    minigit(&temp_dir)
        .args(["commit", "-m", "one"])
        .assert()
        .success()
        .stdout(predicate::str::contains("one"));

    // The branch ref now holds a 40-hex commit id.
    let commit = head_commit(&temp_dir);
    assert_eq!(commit.len(), 40);
    assert!(commit.bytes().all(|b| b.is_ascii_hexdigit()));

    // The index was cleared.
    let index = fs::read_to_string(temp_dir.path().join(".git/index")).unwrap();
    assert_eq!(index, "{}");

    // The root tree holds exactly the staged blob.
    let tree = stdout_of(
        minigit(&temp_dir)
            .args(["cat-file", "-p", &root_tree(&temp_dir)])
            .assert()
            .success(),
    );
    assert!(tree.contains("100644 hello.txt"));

    // And the blob reads back byte-for-byte.
    minigit(&temp_dir)
        .args(["cat-file", "-p", HI_BLOB])
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn test_commit_records_author_and_parent_chain() {
    let temp_dir = init_repo();

    fs::write(temp_dir.path().join("a.txt"), "1").unwrap();
    minigit(&temp_dir).args(["add", "a.txt"]).assert().success();
    minigit(&temp_dir)
        .args(["commit", "-m", "first", "--author", "Jo Doe <jo@example.com>"])
        .assert()
        .success();
    let first = head_commit(&temp_dir);

    fs::write(temp_dir.path().join("a.txt"), "2").unwrap();
    minigit(&temp_dir).args(["add", "a.txt"]).assert().success();
    minigit(&temp_dir)
        .args(["commit", "-m", "second"])
        .assert()
        .success();

    let payload = stdout_of(
        minigit(&temp_dir)
            .args(["cat-file", "-p", &head_commit(&temp_dir)])
            .assert()
            .success(),
    );
    assert!(payload.contains(&format!("parent {}", first)));
    assert!(payload.contains("author PyGit user <user@pygit.com>"));
    assert!(payload.contains("+0000"));

    let first_payload = stdout_of(
        minigit(&temp_dir)
            .args(["cat-file", "-p", &first])
            .assert()
            .success(),
    );
    assert!(first_payload.contains("author Jo Doe <jo@example.com>"));
    assert!(!first_payload.contains("parent "));
}

#[test]
fn test_nested_directories_sorted_in_trees() {
    let temp_dir = init_repo();
    fs::create_dir_all(temp_dir.path().join("src")).unwrap();
    fs::write(temp_dir.path().join("src/b.txt"), "B").unwrap();
    fs::write(temp_dir.path().join("src/a.txt"), "A").unwrap();
    fs::write(temp_dir.path().join("readme"), "R").unwrap();

    minigit(&temp_dir).args(["add", "."]).assert().success();
    minigit(&temp_dir)
        .args(["commit", "-m", "tree shape"])
        .assert()
        .success();

    let root = stdout_of(
        minigit(&temp_dir)
            .args(["cat-file", "-p", &root_tree(&temp_dir)])
            .assert()
            .success(),
    );
    let readme_at = root.find("readme").expect("readme entry missing");
    let src_at = root.find("40000 src").expect("src entry missing");
    assert!(readme_at < src_at, "entries must sort by raw name bytes");
    assert!(root.contains("100644 readme"));
}

#[test]
fn test_commit_with_empty_index_is_a_noop() {
    let temp_dir = init_repo();

    minigit(&temp_dir)
        .args(["commit", "-m", "empty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to commit"));

    assert!(!temp_dir.path().join(".git/refs/heads/master").exists());
}

#[test]
fn test_unchanged_snapshot_is_a_noop() {
    let temp_dir = init_repo();
    fs::write(temp_dir.path().join("same.txt"), "unchanged").unwrap();

    minigit(&temp_dir).args(["add", "same.txt"]).assert().success();
    minigit(&temp_dir)
        .args(["commit", "-m", "first"])
        .assert()
        .success();
    let before = head_commit(&temp_dir);

    // Stage the identical content again; the snapshot matches the parent.
    minigit(&temp_dir).args(["add", "same.txt"]).assert().success();
    minigit(&temp_dir)
        .args(["commit", "-m", "again"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to commit"));

    assert_eq!(head_commit(&temp_dir), before);
}

#[test]
fn test_cat_file_type_and_size() {
    let temp_dir = init_repo();
    fs::write(temp_dir.path().join("hello.txt"), "hi\n").unwrap();
    minigit(&temp_dir).args(["add", "hello.txt"]).assert().success();

    minigit(&temp_dir)
        .args(["cat-file", "-t", HI_BLOB])
        .assert()
        .success()
        .stdout("blob\n");

    minigit(&temp_dir)
        .args(["cat-file", "-s", HI_BLOB])
        .assert()
        .success()
        .stdout("3\n");

    minigit(&temp_dir)
        .args(["cat-file", "-p", &"0".repeat(40)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
