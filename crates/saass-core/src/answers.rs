//! Student answer table loading
//!
//! The first column holds the student identifier (its header is usually
//! blank). Every `<QuestionID>-answer` column holds one question's answers.
//! Answer text is passed through untouched: no trimming, casing, or
//! normalization, so similarity is judged on what the student wrote.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::bail_answers;
use crate::error::{Result, SaassError};
use crate::question::{QuestionId, ANSWER_SUFFIX};
use crate::rubric::Rubric;
use crate::table::Table;
use crate::trace_time;

/// One student's row: identifier plus an answer slot per answer column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub student_id: String,
    /// `None` means the question was not attempted
    pub answers: BTreeMap<QuestionId, Option<String>>,
}

impl StudentRecord {
    /// The student's answer to `question`, if attempted
    pub fn answer(&self, question: &QuestionId) -> Option<&str> {
        self.answers.get(question).and_then(|a| a.as_deref())
    }
}

/// All student records plus the questions the table has columns for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    /// Questions with an answer column, in ascending order
    pub questions: Vec<QuestionId>,
    /// Students in table order
    pub students: Vec<StudentRecord>,
}

impl AnswerSheet {
    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn has_column_for(&self, question: &QuestionId) -> bool {
        self.questions.binary_search(question).is_ok()
    }

    /// Check that every rubric question has an answer column.
    ///
    /// Answer columns the rubric does not know about are reported and
    /// otherwise ignored.
    pub fn ensure_covers(&self, rubric: &Rubric) -> Result<()> {
        for question in rubric.question_ids() {
            if !self.has_column_for(question) {
                return Err(SaassError::MissingAnswerColumn {
                    question: question.to_string(),
                    column: question.answer_column(),
                });
            }
        }

        for question in &self.questions {
            if rubric.get(question).is_none() {
                warn!(question = %question, "answer column has no rubric entry, ignoring");
            }
        }

        Ok(())
    }
}

/// Read and parse the answer CSV at `path`
pub fn load_answers(path: &Path) -> Result<AnswerSheet> {
    let start = Instant::now();
    let table = Table::read_path(path)?;
    let sheet = parse_answers(&table)?;
    info!(
        path = %path.display(),
        students = sheet.len(),
        questions = sheet.questions.len(),
        "loaded answers"
    );
    trace_time!(start, "load_answers");
    Ok(sheet)
}

/// Parse an answer table into student records
pub fn parse_answers(table: &Table) -> Result<AnswerSheet> {
    if table.headers.is_empty() {
        bail_answers!("no columns");
    }

    let mut columns: Vec<(usize, QuestionId)> = Vec::new();
    for (index, header) in table.headers.iter().enumerate().skip(1) {
        let Some(raw) = header.strip_suffix(ANSWER_SUFFIX) else {
            continue;
        };
        if raw.is_empty() {
            bail_answers!("column `{}` does not name a question", header);
        }
        let question = QuestionId::new(raw);
        if columns.iter().any(|(_, q)| *q == question) {
            bail_answers!("more than one `{}` column", header);
        }
        columns.push((index, question));
    }

    let mut students = Vec::with_capacity(table.rows.len());
    for (row_index, row) in table.rows.iter().enumerate() {
        let Some(student_id) = row.first().and_then(|c| c.as_deref()) else {
            bail_answers!("row {}: blank student identifier", row_index + 1);
        };

        let answers = columns
            .iter()
            .map(|(index, question)| (question.clone(), row.get(*index).cloned().flatten()))
            .collect();

        students.push(StudentRecord {
            student_id: student_id.to_string(),
            answers,
        });
    }

    let mut questions: Vec<QuestionId> = columns.into_iter().map(|(_, q)| q).collect();
    questions.sort();

    Ok(AnswerSheet {
        questions,
        students,
    })
}
