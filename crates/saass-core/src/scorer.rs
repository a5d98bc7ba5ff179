//! Matching student answers against rubric bands
//!
//! Each attempted answer is embedded once and compared with every exemplar
//! of every band of its question. The band whose best exemplar is strictly
//! more similar than everything seen before wins, so on a tie the earlier
//! band keeps the match. The running best starts at score 0, no match,
//! similarity 0.0; a question where no band beats 0.0 keeps that default.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::answers::{AnswerSheet, StudentRecord};
use crate::bail_embedding;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::question::QuestionId;
use crate::rubric::{QuestionRubric, Rubric};
use crate::similarity::Similarity;
use crate::trace_time;

/// Outcome of grading one attempted question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub predicted_score: u32,
    /// Exemplar that produced the winning similarity, if any band won
    pub matched_answer: Option<String>,
    pub similarity: f32,
}

/// Outcome of grading one student
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReport {
    pub student_id: String,
    /// Sum of predicted scores over attempted questions
    pub total_score: u32,
    /// Results for attempted questions, in question order
    pub results: Vec<QuestionResult>,
}

impl StudentReport {
    pub fn result(&self, question: &QuestionId) -> Option<&QuestionResult> {
        self.results.iter().find(|r| &r.question_id == question)
    }
}

/// Best exemplar of a single band
struct BandMatch<'r> {
    exemplar: &'r str,
    similarity: f32,
}

/// Grades answers with an embedding model and a similarity function
pub struct Scorer<'a> {
    embedder: &'a dyn Embedder,
    similarity: &'a dyn Similarity,
}

impl<'a> Scorer<'a> {
    pub fn new(embedder: &'a dyn Embedder, similarity: &'a dyn Similarity) -> Self {
        Self {
            embedder,
            similarity,
        }
    }

    /// Grade one answer against one question's bands
    pub fn score_question(&self, question: &QuestionRubric, answer: &str) -> Result<QuestionResult> {
        let answer_vector = self.embedder.embed_one(answer)?;

        let mut best = QuestionResult {
            question_id: question.id.clone(),
            predicted_score: 0,
            matched_answer: None,
            similarity: 0.0,
        };

        for band in &question.bands {
            let Some(band_match) = self.best_in_band(&answer_vector, &band.exemplars)? else {
                continue;
            };
            debug!(
                question = %question.id,
                band = %band.label,
                similarity = band_match.similarity,
                "band best"
            );
            if band_match.similarity > best.similarity {
                best.predicted_score = band.score;
                best.matched_answer = Some(band_match.exemplar.to_string());
                best.similarity = band_match.similarity;
            }
        }

        debug!(
            question = %question.id,
            score = best.predicted_score,
            similarity = best.similarity,
            matched = best.matched_answer.is_some(),
            "scored question"
        );
        Ok(best)
    }

    fn best_in_band<'r>(
        &self,
        answer_vector: &[f32],
        exemplars: &'r [String],
    ) -> Result<Option<BandMatch<'r>>> {
        let texts: Vec<&str> = exemplars.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed(&texts)?;
        if vectors.len() != texts.len() {
            bail_embedding!(
                "{} returned {} vectors for {} exemplars",
                self.embedder.name(),
                vectors.len(),
                texts.len()
            );
        }

        let mut best: Option<BandMatch<'r>> = None;
        for (exemplar, vector) in exemplars.iter().zip(&vectors) {
            let similarity = self.similarity.similarity(answer_vector, vector)?;
            let better = match &best {
                Some(current) => similarity > current.similarity,
                None => true,
            };
            if better {
                best = Some(BandMatch {
                    exemplar: exemplar.as_str(),
                    similarity,
                });
            }
        }
        Ok(best)
    }

    /// Grade every rubric question the student attempted
    pub fn score_student(&self, rubric: &Rubric, record: &StudentRecord) -> Result<StudentReport> {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut total_score = 0u32;

        for question in rubric.questions() {
            let Some(answer) = record.answer(&question.id) else {
                debug!(student = %record.student_id, question = %question.id, "unattempted");
                continue;
            };
            let result = self.score_question(question, answer)?;
            total_score += result.predicted_score;
            results.push(result);
        }

        info!(
            student = %record.student_id,
            total = total_score,
            attempted = results.len(),
            "scored student"
        );
        trace_time!(start, "score_student", student = record.student_id.as_str());

        Ok(StudentReport {
            student_id: record.student_id.clone(),
            total_score,
            results,
        })
    }

    /// Check coverage, then grade every student in table order
    pub fn score_all(&self, rubric: &Rubric, sheet: &AnswerSheet) -> Result<Vec<StudentReport>> {
        sheet.ensure_covers(rubric)?;

        let start = Instant::now();
        let reports = sheet
            .students
            .iter()
            .map(|record| self.score_student(rubric, record))
            .collect::<Result<Vec<_>>>()?;
        trace_time!(start, "score_all");
        Ok(reports)
    }
}
