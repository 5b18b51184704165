//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `jabuti` binary and verify
//! exit codes, stdout content, and stderr content. Fixtures are written
//! to temporary directories.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CANONICAL: &str = "contract Sale {
  parties {
    application = \"Shop\"
    process = \"Billing\"
  }

  clauses {
    right Pay {
      rolePlayer = application
      operation = request
      terms {
        Timeout(180)
      }
    }
  }
}
";

const MESSY: &str = "contract Sale{\nparties{\napplication=\"Shop\"\nprocess=\"Billing\"\n}\n}";

fn jabuti() -> Command {
    cargo_bin_cmd!("jabuti")
}

/// Write `content` to `name` inside a fresh temp dir.
fn fixture(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    (dir, path)
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    jabuti()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jabuti contract language toolchain"));
}

#[test]
fn version_exits_0() {
    jabuti()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jabuti"));
}

#[test]
fn fmt_requires_at_least_one_file() {
    jabuti().arg("fmt").assert().failure();
}

// ──────────────────────────────────────────────
// 2. fmt
// ──────────────────────────────────────────────

#[test]
fn fmt_rewrites_file_in_place() {
    let (_dir, path) = fixture("sale.jabuti", MESSY);
    jabuti()
        .arg("fmt")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("formatted"));

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "contract Sale {\n  parties {\n    application = \"Shop\"\n    process = \"Billing\"\n  }\n}\n"
    );
}

#[test]
fn fmt_check_lists_unformatted_files_and_fails() {
    let (_dir, path) = fixture("sale.jabuti", MESSY);
    jabuti()
        .args(["fmt", "--check"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("sale.jabuti"))
        .stderr(predicate::str::contains("1 file(s) would be reformatted"));

    // --check never writes
    assert_eq!(fs::read_to_string(&path).unwrap(), MESSY);
}

#[test]
fn fmt_check_passes_on_canonical_file() {
    let (_dir, path) = fixture("sale.jabuti", CANONICAL);
    jabuti()
        .args(["fmt", "--check"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn fmt_json_reports_each_file() {
    let (_dir, path) = fixture("sale.jabuti", CANONICAL);
    let out = jabuti()
        .args(["--output", "json", "fmt"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json[0]["changed"], false);
}

#[test]
fn fmt_missing_file_exits_1() {
    jabuti()
        .args(["fmt", "does/not/exist.jabuti"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn quiet_suppresses_error_output() {
    jabuti()
        .args(["--quiet", "fmt", "does/not/exist.jabuti"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

#[test]
fn json_errors_are_objects() {
    let out = jabuti()
        .args(["--output", "json", "outline", "does/not/exist.jabuti"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let err: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert!(err["error"].as_str().unwrap().contains("exist.jabuti"));
}

// ──────────────────────────────────────────────
// 3. outline
// ──────────────────────────────────────────────

#[test]
fn outline_prints_indented_tree() {
    let (_dir, path) = fixture("sale.jabuti", CANONICAL);
    jabuti()
        .arg("outline")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("contract (1:1)\n  parties (2:3)\n"))
        .stdout(predicate::str::contains("    right Pay (8:5)"))
        .stdout(predicate::str::contains("        Timeout 180 (12:9)"));
}

#[test]
fn outline_json_is_the_scope_tree() {
    let (_dir, path) = fixture("sale.jabuti", CANONICAL);
    let out = jabuti()
        .args(["outline", "--output", "json"])
        .arg(&path)
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["label"], "contract");
    assert_eq!(json["kind"], "module");
    assert_eq!(json["children"][0]["children"][1]["label"], "process");
}

// ──────────────────────────────────────────────
// 4. complete / hover / definition
// ──────────────────────────────────────────────

#[test]
fn complete_inside_clause_lists_members() {
    let (_dir, path) = fixture(
        "draft.jabuti",
        "contract C {\n  clauses {\n    right A {\n      \n    }\n  }\n}\n",
    );
    jabuti()
        .arg("complete")
        .arg(&path)
        .args(["--line", "4", "--column", "7"])
        .assert()
        .success()
        .stdout("rolePlayer\noperation\nterms\nonBreach\n");
}

#[test]
fn complete_on_empty_file_offers_scaffolds() {
    let (_dir, path) = fixture("empty.jabuti", "");
    let out = jabuti()
        .args(["--output", "json", "complete"])
        .arg(&path)
        .args(["--line", "1", "--column", "1"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[1]["detail"], "A complete contract");
    assert_eq!(json[1]["retrigger"], true);
}

#[test]
fn hover_prints_keyword_documentation() {
    let (_dir, path) = fixture("sale.jabuti", CANONICAL);
    jabuti()
        .arg("hover")
        .arg(&path)
        .args(["--line", "10", "--column", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("push | poll | read | write | request | response"));
}

#[test]
fn definition_points_at_party_declaration() {
    let (_dir, path) = fixture("sale.jabuti", CANONICAL);
    jabuti()
        .arg("definition")
        .arg(&path)
        .args(["--line", "9", "--column", "22"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("sale.jabuti:3:5\n"));
}

#[test]
fn definition_of_non_role_is_empty() {
    let (_dir, path) = fixture("sale.jabuti", CANONICAL);
    jabuti()
        .args(["--output", "json", "definition"])
        .arg(&path)
        .args(["--line", "7", "--column", "4"])
        .assert()
        .success()
        .stdout("null\n");
}
