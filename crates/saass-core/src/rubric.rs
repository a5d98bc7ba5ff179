//! Rubric loading: question → score bands → exemplar answers
//!
//! The rubric table has one row per question. `Question- ID` names the
//! question and every `SCORE-<n>` column is a score band worth `n` points.
//! Band cells list exemplar answers joined by `", "`.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::bail_rubric;
use crate::config::RubricConfig;
use crate::error::{Result, SaassError};
use crate::question::QuestionId;
use crate::table::Table;
use crate::trace_time;

/// Header of the question identifier column
pub const QUESTION_ID_COLUMN: &str = "Question- ID";

/// Delimiter between exemplar answers inside a band cell
pub const EXEMPLAR_DELIMITER: &str = ", ";

/// Split a band cell into its exemplar answers
pub fn split_exemplars(cell: &str) -> Vec<String> {
    cell.split(EXEMPLAR_DELIMITER).map(str::to_string).collect()
}

/// Join exemplar answers back into a band cell
pub fn join_exemplars(exemplars: &[String]) -> String {
    exemplars.join(EXEMPLAR_DELIMITER)
}

/// Parse the score encoded in a band label (`score_2` → 2, `SCORE-2` → 2)
pub fn band_score(label: &str) -> Option<u32> {
    let digits = label.rsplit(['_', '-']).next()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// One score band of a question: a score and the answers that earn it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBand {
    /// Band key, e.g. `score_2`
    pub label: String,
    /// Score encoded by the label
    pub score: u32,
    /// Exemplar answers, in cell order; never empty
    pub exemplars: Vec<String>,
}

impl ScoreBand {
    /// Build a band from its label, reading the score out of the label
    pub fn from_label(label: impl Into<String>, exemplars: Vec<String>) -> Result<Self> {
        let label = label.into();
        let Some(score) = band_score(&label) else {
            bail_rubric!("band label `{}` does not encode a score", label);
        };
        if exemplars.is_empty() {
            bail_rubric!("band `{}` has no exemplar answers", label);
        }
        Ok(Self {
            label,
            score,
            exemplars,
        })
    }
}

/// All score bands of one question, in column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRubric {
    pub id: QuestionId,
    pub bands: Vec<ScoreBand>,
}

/// Band column of the rubric table
#[derive(Debug, Clone, PartialEq)]
struct BandColumn {
    index: usize,
    header: String,
    label: String,
}

/// The parsed rubric, keyed and iterated by ascending question identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rubric {
    questions: BTreeMap<QuestionId, QuestionRubric>,
    band_headers: Vec<String>,
}

impl Rubric {
    /// Build a rubric directly from questions (band headers derive from labels)
    pub fn from_questions(questions: Vec<QuestionRubric>) -> Result<Self> {
        let mut map = BTreeMap::new();
        let mut band_headers: Vec<String> = Vec::new();
        for question in questions {
            if question.bands.is_empty() {
                bail_rubric!("question {} has no score bands", question.id);
            }
            for band in &question.bands {
                let header = format!("SCORE-{}", band.score);
                if !band_headers.contains(&header) {
                    band_headers.push(header);
                }
            }
            if map.contains_key(&question.id) {
                bail_rubric!("question {} appears more than once", question.id);
            }
            map.insert(question.id.clone(), question);
        }
        Ok(Self {
            questions: map,
            band_headers,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &QuestionId) -> Option<&QuestionRubric> {
        self.questions.get(id)
    }

    /// Questions in ascending identifier order
    pub fn questions(&self) -> btree_map::Values<'_, QuestionId, QuestionRubric> {
        self.questions.values()
    }

    /// Question identifiers in ascending order
    pub fn question_ids(&self) -> btree_map::Keys<'_, QuestionId, QuestionRubric> {
        self.questions.keys()
    }

    /// Re-export the rubric with the loader's header convention
    pub fn to_table(&self) -> Table {
        let mut headers = vec![QUESTION_ID_COLUMN.to_string()];
        headers.extend(self.band_headers.iter().cloned());

        let mut table = Table::new(headers);
        for question in self.questions.values() {
            let mut row = vec![Some(question.id.to_string())];
            for header in &self.band_headers {
                let score = band_score(header);
                let cell = question
                    .bands
                    .iter()
                    .find(|b| Some(b.score) == score)
                    .map(|b| join_exemplars(&b.exemplars));
                row.push(cell);
            }
            table.push_row(row);
        }
        table
    }
}

/// Read and parse the rubric CSV at `path`
pub fn load_rubric(path: &Path, config: &RubricConfig) -> Result<Rubric> {
    let start = Instant::now();
    let table = Table::read_path(path)?;
    let rubric = parse_rubric(&table, config)?;
    info!(
        path = %path.display(),
        questions = rubric.len(),
        bands = rubric.band_headers.len(),
        "loaded rubric"
    );
    trace_time!(start, "load_rubric");
    Ok(rubric)
}

/// Parse a rubric table into per-question score bands.
///
/// Handling is strict: a missing `Question- ID` column, no band columns, a
/// missing required score, two columns for one score, a blank or repeated
/// question identifier, or a blank band cell all fail with
/// [`SaassError::MalformedRubric`](crate::error::SaassError::MalformedRubric).
pub fn parse_rubric(table: &Table, config: &RubricConfig) -> Result<Rubric> {
    let Some(id_column) = table.column(QUESTION_ID_COLUMN) else {
        bail_rubric!("missing column `{}`", QUESTION_ID_COLUMN);
    };

    let band_columns = band_columns(table)?;
    if band_columns.is_empty() {
        bail_rubric!("no score band columns (expected headers like `SCORE-1`)");
    }

    for required in &config.required_scores {
        if !band_columns
            .iter()
            .any(|c| band_score(&c.label) == Some(*required))
        {
            bail_rubric!("missing column `SCORE-{}`", required);
        }
    }

    let mut questions: BTreeMap<QuestionId, QuestionRubric> = BTreeMap::new();
    for (row_index, row) in table.rows.iter().enumerate() {
        let row_number = row_index + 1;
        let Some(raw_id) = row.get(id_column).and_then(|c| c.as_deref()) else {
            bail_rubric!("row {}: blank `{}`", row_number, QUESTION_ID_COLUMN);
        };
        let id = QuestionId::new(raw_id);
        if questions.contains_key(&id) {
            bail_rubric!("row {}: question {} appears more than once", row_number, id);
        }

        let mut bands = Vec::with_capacity(band_columns.len());
        for column in &band_columns {
            let Some(cell) = row.get(column.index).and_then(|c| c.as_deref()) else {
                bail_rubric!(
                    "row {}: question {} has a blank `{}` cell",
                    row_number,
                    id,
                    column.header
                );
            };
            bands.push(ScoreBand::from_label(column.label.clone(), split_exemplars(cell))?);
        }

        debug!(question = %id, bands = bands.len(), "parsed rubric row");
        questions.insert(id.clone(), QuestionRubric { id, bands });
    }

    if questions.is_empty() {
        bail_rubric!("no questions");
    }

    Ok(Rubric {
        questions,
        band_headers: band_columns.into_iter().map(|c| c.header).collect(),
    })
}

fn band_columns(table: &Table) -> Result<Vec<BandColumn>> {
    let regex = Regex::new(r"^SCORE-(\d+)$")
        .map_err(|e| SaassError::Other(format!("failed to compile band header regex: {}", e)))?;
    let mut seen_scores = HashSet::new();
    let mut columns = Vec::new();

    for (index, header) in table.headers.iter().enumerate() {
        let Some(captures) = regex.captures(header) else {
            continue;
        };
        let label = format!("score_{}", &captures[1]);
        let Some(score) = band_score(&label) else {
            bail_rubric!("band column `{}` does not encode a valid score", header);
        };
        if !seen_scores.insert(score) {
            bail_rubric!("more than one band column for score {}", score);
        }
        columns.push(BandColumn {
            index,
            header: header.clone(),
            label,
        });
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    fn strict() -> RubricConfig {
        RubricConfig::default()
    }

    fn lenient() -> RubricConfig {
        RubricConfig {
            required_scores: Vec::new(),
        }
    }

    const RUBRIC: &str = "\
Question- ID,SCORE-1,SCORE-2,SCORE-3
Q2,wrong,\"partly, somewhat\",right
Q1,no,maybe,yes
";

    #[test]
    fn test_keys_sorted_ascending() {
        let rubric = parse_rubric(&table(RUBRIC), &strict()).unwrap();
        let ids: Vec<&str> = rubric.question_ids().map(QuestionId::as_str).collect();
        assert_eq!(ids, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_bands_in_column_order_with_scores_from_labels() {
        let rubric = parse_rubric(&table(RUBRIC), &strict()).unwrap();
        let q2 = rubric.get(&QuestionId::new("Q2")).unwrap();

        let labels: Vec<&str> = q2.bands.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["score_1", "score_2", "score_3"]);
        assert_eq!(q2.bands[1].score, 2);
        assert_eq!(q2.bands[1].exemplars, vec!["partly", "somewhat"]);
    }

    #[test]
    fn test_score_comes_from_label_not_position() {
        let csv = "Question- ID,SCORE-3,SCORE-1\nQ1,best,worst\n";
        let rubric = parse_rubric(&table(csv), &lenient()).unwrap();
        let q1 = rubric.get(&QuestionId::new("Q1")).unwrap();
        assert_eq!(q1.bands[0].label, "score_3");
        assert_eq!(q1.bands[0].score, 3);
        assert_eq!(q1.bands[1].score, 1);
    }

    #[test]
    fn test_n_bands_supported() {
        let csv = "Question- ID,SCORE-0,SCORE-1,SCORE-2,SCORE-3,SCORE-4\nQ1,a,b,c,d,e\n";
        let rubric = parse_rubric(&table(csv), &strict()).unwrap();
        assert_eq!(rubric.get(&QuestionId::new("Q1")).unwrap().bands.len(), 5);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "Notes,Question- ID,SCORE-1,SCORE-2,SCORE-3\nintro,Q1,a,b,c\n";
        let rubric = parse_rubric(&table(csv), &strict()).unwrap();
        assert_eq!(rubric.len(), 1);
    }

    #[test]
    fn test_missing_id_column() {
        let csv = "Question,SCORE-1,SCORE-2,SCORE-3\nQ1,a,b,c\n";
        let err = parse_rubric(&table(csv), &strict()).unwrap_err();
        assert!(matches!(err, SaassError::MalformedRubric { .. }));
        assert!(err.to_string().contains("Question- ID"));
    }

    #[test]
    fn test_missing_required_band() {
        let csv = "Question- ID,SCORE-1,SCORE-3\nQ1,a,c\n";
        let err = parse_rubric(&table(csv), &strict()).unwrap_err();
        assert!(err.to_string().contains("missing column `SCORE-2`"));
    }

    #[test]
    fn test_no_band_columns() {
        let csv = "Question- ID,Answer\nQ1,a\n";
        let err = parse_rubric(&table(csv), &lenient()).unwrap_err();
        assert!(err.to_string().contains("no score band columns"));
    }

    #[test]
    fn test_duplicate_question_rejected() {
        let csv = "Question- ID,SCORE-1,SCORE-2,SCORE-3\nQ1,a,b,c\nQ1,d,e,f\n";
        let err = parse_rubric(&table(csv), &strict()).unwrap_err();
        assert!(err.to_string().contains("row 2: question Q1 appears more than once"));
    }

    #[test]
    fn test_duplicate_score_columns_rejected() {
        let csv = "Question- ID,SCORE-1,SCORE-01\nQ1,a,b\n";
        let err = parse_rubric(&table(csv), &lenient()).unwrap_err();
        assert!(err.to_string().contains("more than one band column for score 1"));
    }

    #[test]
    fn test_blank_band_cell_rejected() {
        let csv = "Question- ID,SCORE-1,SCORE-2,SCORE-3\nQ1,a,,c\n";
        let err = parse_rubric(&table(csv), &strict()).unwrap_err();
        assert!(err.to_string().contains("blank `SCORE-2` cell"));
    }

    #[test]
    fn test_blank_question_id_rejected() {
        let csv = "Question- ID,SCORE-1,SCORE-2,SCORE-3\n,a,b,c\n";
        let err = parse_rubric(&table(csv), &strict()).unwrap_err();
        assert!(err.to_string().contains("row 1: blank"));
    }

    #[test]
    fn test_split_join_round_trip() {
        for cell in ["Paris", "Paris, the capital, City of Light", "a,b, c", " x , y "] {
            assert_eq!(join_exemplars(&split_exemplars(cell)), cell);
        }
        assert_eq!(split_exemplars("a,b, c"), vec!["a,b", "c"]);
    }

    #[test]
    fn test_band_score_parsing() {
        assert_eq!(band_score("score_1"), Some(1));
        assert_eq!(band_score("SCORE-12"), Some(12));
        assert_eq!(band_score("score_"), None);
        assert_eq!(band_score("score_x"), None);
    }

    #[test]
    fn test_to_table_round_trips_cells() {
        let source = table(RUBRIC);
        let rubric = parse_rubric(&source, &strict()).unwrap();
        let exported = rubric.to_table();

        assert_eq!(exported.headers, source.headers);
        // Exported rows follow question order, source rows file order
        assert_eq!(exported.rows[0], source.rows[1]);
        assert_eq!(exported.rows[1], source.rows[0]);
    }

    #[test]
    fn test_from_questions_rejects_duplicates() {
        let q = QuestionRubric {
            id: QuestionId::new("Q1"),
            bands: vec![ScoreBand::from_label("score_1", vec!["no".into()]).unwrap()],
        };
        let err = Rubric::from_questions(vec![q.clone(), q]).unwrap_err();
        assert!(matches!(err, SaassError::MalformedRubric { .. }));
    }
}
