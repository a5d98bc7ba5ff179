//! Flattening student reports into the output table

use std::collections::BTreeSet;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::question::QuestionId;
use crate::rubric::Rubric;
use crate::scorer::StudentReport;
use crate::table::Table;

pub const STUDENT_ID_COLUMN: &str = "Student ID";
pub const TOTAL_SCORE_COLUMN: &str = "Student Total Score";

const PREDICTED_SCORE_SUFFIX: &str = "-Predicted Score";
const MATCHED_ANSWER_SUFFIX: &str = "-Matched Answer";
const SIMILARITY_SUFFIX: &str = "-Cosine Similarity";

/// Shortest round-trip decimal, always with a decimal point (`1.0`, `0.8731`)
pub fn format_similarity(value: f32) -> String {
    format!("{:?}", value)
}

/// Questions that appear in at least one report, in rubric order
fn reported_questions<'r>(rubric: &'r Rubric, reports: &[StudentReport]) -> Vec<&'r QuestionId> {
    let attempted: BTreeSet<&QuestionId> = reports
        .iter()
        .flat_map(|r| r.results.iter().map(|q| &q.question_id))
        .collect();
    rubric
        .question_ids()
        .filter(|q| attempted.contains(q))
        .collect()
}

/// Build the report table: one row per student, in report order
pub fn build_report_table(rubric: &Rubric, reports: &[StudentReport]) -> Table {
    let questions = reported_questions(rubric, reports);

    let mut headers = vec![STUDENT_ID_COLUMN.to_string(), TOTAL_SCORE_COLUMN.to_string()];
    for question in &questions {
        headers.push(format!("{}{}", question, PREDICTED_SCORE_SUFFIX));
        headers.push(format!("{}{}", question, MATCHED_ANSWER_SUFFIX));
        headers.push(format!("{}{}", question, SIMILARITY_SUFFIX));
    }

    let mut table = Table::new(headers);
    for report in reports {
        let mut row = vec![
            Some(report.student_id.clone()),
            Some(report.total_score.to_string()),
        ];
        for question in &questions {
            match report.result(question) {
                Some(result) => {
                    row.push(Some(result.predicted_score.to_string()));
                    row.push(result.matched_answer.clone());
                    row.push(Some(format_similarity(result.similarity)));
                }
                None => row.extend([None, None, None]),
            }
        }
        table.push_row(row);
    }
    table
}

/// Build the report and write it to `path`
pub fn write_report(path: &Path, rubric: &Rubric, reports: &[StudentReport]) -> Result<Table> {
    let table = build_report_table(rubric, reports);
    table.write_path(path)?;
    info!(
        path = %path.display(),
        students = table.rows.len(),
        columns = table.headers.len(),
        "wrote report"
    );
    Ok(table)
}
