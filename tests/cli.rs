use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn stacks(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stacks").unwrap();
    cmd.env("STACKS_HOME", home);
    cmd
}

#[test]
fn full_catalog_lifecycle() {
    let temp = tempfile::tempdir().unwrap();

    stacks(temp.path())
        .args([
            "add",
            "--title",
            "Dune",
            "--author",
            "Frank Herbert",
            "--isbn",
            "111",
            "--category",
            "Fiction",
            "--year",
            "1965",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"Dune\" has been added to the library.",
        ));

    stacks(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 books: 1 available, 0 issued, 0 overdue",
        ))
        .stdout(predicate::str::contains("Dune by Frank Herbert [Fiction]"))
        .stdout(predicate::str::contains("Available"));

    stacks(temp.path())
        .args(["issue", "1", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"Dune\" has been issued to Alice.",
        ));

    stacks(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 books: 0 available, 1 issued, 0 overdue",
        ))
        .stdout(predicate::str::contains("issued to Alice, due "));

    stacks(temp.path())
        .args(["return", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"Dune\" has been returned successfully.",
        ));

    stacks(temp.path())
        .args(["rm", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"Dune\" has been removed from the library.",
        ));

    stacks(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No books found."));
}

#[test]
fn add_refuses_an_invalid_form() {
    let temp = tempfile::tempdir().unwrap();

    stacks(temp.path())
        .args(["add", "--year", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title is required"))
        .stderr(predicate::str::contains("Author is required"))
        .stderr(predicate::str::contains("ISBN is required"))
        .stderr(predicate::str::contains("Category is required"))
        .stderr(predicate::str::contains("Invalid year"));

    stacks(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No books found."));
}

#[test]
fn search_filters_by_any_field() {
    let temp = tempfile::tempdir().unwrap();

    for (title, author, isbn, category) in [
        ("Dune", "Frank Herbert", "111", "Fiction"),
        ("Cosmos", "Carl Sagan", "222", "Science"),
    ] {
        stacks(temp.path())
            .args([
                "add", "--title", title, "--author", author, "--isbn", isbn, "--category",
                category, "--year", "1980",
            ])
            .assert()
            .success();
    }

    stacks(temp.path())
        .args(["search", "dune"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"))
        .stdout(predicate::str::contains("Cosmos").not());

    stacks(temp.path())
        .args(["list", "--search", "sagan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cosmos"))
        .stdout(predicate::str::contains("Dune").not());
}

#[test]
fn issue_requires_a_member_name() {
    let temp = tempfile::tempdir().unwrap();

    stacks(temp.path())
        .args([
            "add", "--title", "Dune", "--author", "Frank Herbert", "--isbn", "111", "--category",
            "Fiction",
        ])
        .assert()
        .success();

    stacks(temp.path())
        .args(["issue", "1", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Member name is required"));
}

#[test]
fn operations_on_missing_books_fail_loudly() {
    let temp = tempfile::tempdir().unwrap();

    stacks(temp.path())
        .args(["return", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No book at position 5"));
}

#[test]
fn stats_reports_the_four_counters() {
    let temp = tempfile::tempdir().unwrap();

    stacks(temp.path())
        .args([
            "add", "--title", "Dune", "--author", "Frank Herbert", "--isbn", "111", "--category",
            "Fiction",
        ])
        .assert()
        .success();

    stacks(temp.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:     1"))
        .stdout(predicate::str::contains("Available: 1"))
        .stdout(predicate::str::contains("Issued:    0"))
        .stdout(predicate::str::contains("Overdue:   0"));
}

#[test]
fn export_then_import_restores_the_catalog() {
    let home = tempfile::tempdir().unwrap();
    let backups = tempfile::tempdir().unwrap();

    stacks(home.path())
        .args([
            "add", "--title", "Dune", "--author", "Frank Herbert", "--isbn", "111", "--category",
            "Fiction",
        ])
        .assert()
        .success();

    stacks(home.path())
        .args(["export", "--dest", backups.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to "));

    let archive = std::fs::read_dir(backups.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();

    let fresh_home = tempfile::tempdir().unwrap();
    stacks(fresh_home.path())
        .args(["import", archive.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 book(s) restored from backup."));

    stacks(fresh_home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune by Frank Herbert [Fiction]"));
}
