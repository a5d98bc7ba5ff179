//! End-to-end grading tests using the offline hashing embedder

mod support;

use predicates::prelude::*;
use std::fs;
use support::{read_table, saass, setup_inputs, ANSWERS_CSV, RUBRIC_CSV};

fn expected_headers() -> Vec<&'static str> {
    vec![
        "Student ID",
        "Student Total Score",
        "Q1-Predicted Score",
        "Q1-Matched Answer",
        "Q1-Cosine Similarity",
        "Q2-Predicted Score",
        "Q2-Matched Answer",
        "Q2-Cosine Similarity",
    ]
}

#[test]
fn test_grade_writes_report() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .args([
            "grade",
            "--answers",
            "answers.csv",
            "--rubric",
            "answer_sheet.csv",
            "--output",
            "scores.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("SAASS completed."))
        .stdout(predicate::str::contains("Results saved to scores.csv"));

    let (headers, rows) = read_table(&dir.path().join("scores.csv"));
    assert_eq!(headers, expected_headers());
    assert_eq!(
        rows,
        vec![
            vec!["s1", "3", "1", "Paris", "1.0", "2", "evaporation", "1.0"],
            vec!["s2", "3", "3", "Berlin", "1.0", "", "", ""],
            vec!["s3", "1", "", "", "", "1", "water", "1.0"],
        ]
    );
}

#[test]
fn test_bare_invocation_uses_default_paths() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Results saved to output.xlsx"));

    let (headers, rows) = read_table(&dir.path().join("output.xlsx"));
    assert_eq!(headers, expected_headers());
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_xlsx_and_csv_reports_agree() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .args(["grade", "--output", "scores.xlsx"])
        .assert()
        .success();
    saass()
        .current_dir(dir.path())
        .args([
            "grade",
            "--answers",
            "answers.csv",
            "--rubric",
            "answer_sheet.csv",
            "--output",
            "scores.csv",
        ])
        .assert()
        .success();

    let from_xlsx = read_table(&dir.path().join("scores.xlsx"));
    assert_eq!(from_xlsx, read_table(&dir.path().join("scores.csv")));
    assert_eq!(from_xlsx.1[0], vec!["s1", "3", "1", "Paris", "1.0", "2", "evaporation", "1.0"]);
}

#[test]
fn test_grade_quiet_prints_nothing() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .args(["--quiet", "grade"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(dir.path().join("output.xlsx").exists());
}

#[test]
fn test_grade_json_summary() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    let output = saass()
        .current_dir(dir.path())
        .args(["--format", "json", "grade"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["output"], "output.xlsx");
    assert_eq!(summary["students"], 3);
    assert_eq!(summary["questions"], 2);
    assert_eq!(summary["embedder"], "hashing-512");
    assert_eq!(summary["totals"][0]["student_id"], "s1");
    assert_eq!(summary["totals"][0]["total_score"], 3);
    assert_eq!(summary["totals"][2]["total_score"], 1);
}

#[test]
fn test_unanswered_question_dropped_from_report() {
    let answers = "\
,Q1-answer,Q2-answer
s1,London,
";
    let dir = setup_inputs(RUBRIC_CSV, answers);

    saass().current_dir(dir.path()).assert().success();

    let (headers, rows) = read_table(&dir.path().join("output.xlsx"));
    assert_eq!(
        headers,
        vec![
            "Student ID",
            "Student Total Score",
            "Q1-Predicted Score",
            "Q1-Matched Answer",
            "Q1-Cosine Similarity",
        ]
    );
    assert_eq!(rows, vec![vec!["s1", "2", "2", "London", "1.0"]]);
}

#[test]
fn test_answer_with_no_content_words_scores_zero() {
    let answers = "\
,Q1-answer,Q2-answer
s1,the,water
";
    let dir = setup_inputs(RUBRIC_CSV, answers);

    saass().current_dir(dir.path()).assert().success();

    let (_, rows) = read_table(&dir.path().join("output.xlsx"));
    assert_eq!(rows[0][..5], ["s1", "1", "0", "", "0.0"]);
}

#[test]
fn test_missing_answer_column_is_data_error() {
    let answers = "\
,Q1-answer
s1,Paris
";
    let dir = setup_inputs(RUBRIC_CSV, answers);

    saass()
        .current_dir(dir.path())
        .arg("grade")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Q2-answer"));

    assert!(!dir.path().join("output.xlsx").exists());
}

#[test]
fn test_rubric_missing_band_is_data_error() {
    let rubric = "\
Question- ID,SCORE-1,SCORE-2
Q1,Paris,London
";
    let dir = setup_inputs(rubric, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .arg("grade")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("malformed rubric"))
        .stderr(predicate::str::contains("SCORE-3"));
}

#[test]
fn test_duplicate_question_is_data_error_as_json() {
    let rubric = "\
Question- ID,SCORE-1,SCORE-2,SCORE-3
Q1,a,b,c
Q1,d,e,f
";
    let dir = setup_inputs(rubric, ANSWERS_CSV);

    let output = saass()
        .current_dir(dir.path())
        .args(["--format", "json", "grade"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let error: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["type"], "malformed_rubric");
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    saass()
        .current_dir(dir.path())
        .arg("grade")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("answer_sheet.xlsx"));
}

#[test]
fn test_unreachable_embedding_endpoint_aborts_without_output() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/v1/embeddings", listener.local_addr().unwrap());
    drop(listener);

    saass()
        .current_dir(dir.path())
        .env("SAASS_EMBEDDING_URL", &url)
        .env("SAASS_EMBEDDING_TIMEOUT", "2")
        .args(["grade", "--embedder", "http"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("embedding failed"));

    assert!(!dir.path().join("output.xlsx").exists());
}

#[test]
fn test_local_config_sets_paths() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);
    fs::write(
        dir.path().join("saass.toml"),
        "[paths]\noutput = \"from-config.csv\"\n\n[embedding]\ndimensions = 1024\n",
    )
    .unwrap();

    saass()
        .current_dir(dir.path())
        .args(["--format", "json", "grade"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-config.csv"))
        .stdout(predicate::str::contains("hashing-1024"));

    assert!(dir.path().join("from-config.csv").exists());
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);

    saass()
        .current_dir(dir.path())
        .args(["--config", "missing.toml", "grade"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_existing_report_replaced() {
    let dir = setup_inputs(RUBRIC_CSV, ANSWERS_CSV);
    fs::write(dir.path().join("output.xlsx"), "stale\n").unwrap();

    saass().current_dir(dir.path()).assert().success();

    let (headers, _) = read_table(&dir.path().join("output.xlsx"));
    assert_eq!(headers[0], "Student ID");
}
