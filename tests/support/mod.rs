use assert_cmd::{cargo::cargo_bin_cmd, Command};
use saass_core::table::Table;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Rubric with two questions and the standard three bands
#[allow(dead_code)]
pub const RUBRIC_CSV: &str = "\
Question- ID,SCORE-1,SCORE-2,SCORE-3
Q1,Paris,London,Berlin
Q2,water,\"evaporation, condensation\",evaporation condensation precipitation
";

/// Three students; s2 skips Q2 and s3 skips Q1
#[allow(dead_code)]
pub const ANSWERS_CSV: &str = "\
,Q1-answer,Q2-answer
s1,Paris,evaporation
s2,Berlin,
s3,,water
";

/// Get a Command for saass, isolated from the caller's config and environment
pub fn saass() -> Command {
    let mut cmd = cargo_bin_cmd!("saass");
    cmd.env("SAASS_CONFIG_DIR", std::env::temp_dir().join("saass-tests-no-config"))
        .env_remove("SAASS_EMBEDDING_PROVIDER")
        .env_remove("SAASS_EMBEDDING_URL")
        .env_remove("SAASS_EMBEDDING_MODEL")
        .env_remove("SAASS_EMBEDDING_TIMEOUT")
        .env_remove("SAASS_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Temp directory holding the default `answers.xlsx` and `answer_sheet.xlsx`,
/// plus `answers.csv` and `answer_sheet.csv` with the same content
#[allow(dead_code)]
pub fn setup_inputs(rubric: &str, answers: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (stem, content) in [("answer_sheet", rubric), ("answers", answers)] {
        fs::write(dir.path().join(format!("{}.csv", stem)), content).unwrap();
        write_xlsx(&dir.path().join(format!("{}.xlsx", stem)), content);
    }
    dir
}

/// Write CSV text to a workbook cell by cell, ragged rows included
#[allow(dead_code)]
pub fn write_xlsx(path: &Path, csv_text: &str) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());
    let mut records = reader.records().map(|record| {
        record
            .unwrap()
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
            .collect::<Vec<_>>()
    });
    let headers = records
        .next()
        .unwrap()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();
    let table = Table {
        headers,
        rows: records.collect(),
    };
    table.write_path(path).unwrap();
}

/// Read a CSV or xlsx file as header plus rows of strings, blanks as ""
#[allow(dead_code)]
pub fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let table = Table::read_path(path).unwrap();
    let rows = table
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(Option::unwrap_or_default).collect())
        .collect();
    (table.headers, rows)
}
