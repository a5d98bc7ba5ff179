//! Tests for `saass validate` and `saass rubric`

mod support;

use predicates::prelude::*;
use std::fs;
use support::{read_table, saass, setup_inputs, ANSWERS_CSV, RUBRIC_CSV};

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_ok() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"))
        .stdout(predicate::str::contains("3 students"))
        .stdout(predicate::str::contains("2 unattempted"))
        .stdout(predicate::str::ends_with("OK\n"));

    assert!(!dir.path().join("output.xlsx").exists());
}

#[test]
fn test_validate_json() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    let output = saass()
        .current_dir(dir.path())
        .args(["--format", "json", "validate"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["rubric"]["questions"], 2);
    assert_eq!(report["answers"]["students"], 3);
    assert_eq!(report["answers"]["unattempted"], 2);
}

#[test]
fn test_validate_reports_missing_column() {
    let answers = "\
,Q2-answer
s1,water
";
    let dir = setup_inputs(RUBRIC_CSV, answers);

    saass()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Q1-answer"));
}

#[test]
fn test_validate_rejects_ragged_rows() {
    let answers = "\
,Q1-answer,Q2-answer
s1,Paris,water,extra
";
    let dir = setup_inputs(RUBRIC_CSV, answers);

    saass()
        .current_dir(dir.path())
        .args(["validate", "--answers", "answers.csv", "--rubric", "answer_sheet.csv"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("row 1 has 4 cells"));
}

#[test]
fn test_validate_rejects_non_workbook_xlsx() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);
    fs::write(dir.path().join("answers.xlsx"), ANSWERS_CSV).unwrap();

    saass()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("answers.xlsx"));
}

#[test]
fn test_validate_explicit_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("key.csv"), RUBRIC_CSV).unwrap();
    fs::write(dir.path().join("class.csv"), ANSWERS_CSV).unwrap();

    saass()
        .current_dir(dir.path())
        .args(["validate", "--rubric", "key.csv", "--answers", "class.csv"])
        .assert()
        .success();
}

// ============================================================================
// rubric
// ============================================================================

#[test]
fn test_rubric_lists_bands_in_column_order() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .arg("rubric")
        .assert()
        .success()
        .stdout(predicate::str::contains("Q1\n  score_1 (1): Paris\n  score_2 (2): London"))
        .stdout(predicate::str::contains("score_2 (2): evaporation, condensation"));
}

#[test]
fn test_rubric_json() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    let output = saass()
        .current_dir(dir.path())
        .args(["--format", "json", "rubric"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rubric: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rubric["questions"][0]["id"], "Q1");
    assert_eq!(rubric["questions"][1]["bands"][1]["exemplars"][1], "condensation");
    assert_eq!(rubric["questions"][1]["bands"][2]["score"], 3);
    assert!(rubric["exported"].is_null());
}

#[test]
fn test_rubric_export_sorts_questions() {
    let rubric = "\
Question- ID,SCORE-1,SCORE-2,SCORE-3
10,ten,\"dix, zehn\",diez
2,two,deux,zwei
";
    let dir = setup_inputs(rubric, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .args(["rubric", "--export", "sorted.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to sorted.csv"));

    let (headers, rows) = read_table(&dir.path().join("sorted.csv"));
    assert_eq!(headers, vec!["Question- ID", "SCORE-1", "SCORE-2", "SCORE-3"]);
    assert_eq!(
        rows,
        vec![
            vec!["2", "two", "deux", "zwei"],
            vec!["10", "ten", "dix, zehn", "diez"],
        ]
    );
}

#[test]
fn test_rubric_export_to_xlsx_reloads() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .args(["rubric", "--export", "key.xlsx"])
        .assert()
        .success();

    let (_, rows) = read_table(&dir.path().join("key.xlsx"));
    assert_eq!(rows[1][2], "evaporation, condensation");

    saass()
        .current_dir(dir.path())
        .args(["validate", "--rubric", "key.xlsx"])
        .assert()
        .success();
}
