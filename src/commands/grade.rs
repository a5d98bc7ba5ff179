//! `saass grade` command - score every student and write the report

use serde::Serialize;
use tracing::{debug, info};

use crate::cli::GradeArgs;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use saass_core::answers::load_answers;
use saass_core::config::GraderConfig;
use saass_core::embedding::{build_embedder, Embedder};
use saass_core::error::Result;
use saass_core::log_embedding_metrics;
use saass_core::report::write_report;
use saass_core::rubric::load_rubric;
use saass_core::scorer::Scorer;
use saass_core::similarity::CosineSimilarity;

#[derive(Serialize)]
struct GradeSummary<'a> {
    output: String,
    embedder: &'a str,
    students: usize,
    questions: usize,
    totals: Vec<StudentTotal<'a>>,
}

#[derive(Serialize)]
struct StudentTotal<'a> {
    student_id: &'a str,
    total_score: u32,
}

fn apply_args(config: &mut GraderConfig, args: &GradeArgs) {
    if let Some(answers) = &args.answers {
        config.paths.answers = answers.clone();
    }
    if let Some(rubric) = &args.rubric {
        config.paths.rubric = rubric.clone();
    }
    if let Some(output) = &args.output {
        config.paths.output = output.clone();
    }
    if let Some(provider) = args.embedder {
        config.embedding.provider = provider;
    }
}

/// Execute the grade command
pub fn execute(ctx: &CommandContext, args: &GradeArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    apply_args(&mut config, args);
    config.validate()?;
    let paths = &config.paths;

    let rubric = load_rubric(&paths.rubric, &config.rubric)?;
    debug!(elapsed = ?ctx.start.elapsed(), "load_rubric");

    let sheet = load_answers(&paths.answers)?;
    debug!(elapsed = ?ctx.start.elapsed(), "load_answers");

    let embedder = build_embedder(&config.embedding)?;
    let scorer = Scorer::new(&embedder, &CosineSimilarity);
    let reports = scorer.score_all(&rubric, &sheet)?;
    debug!(elapsed = ?ctx.start.elapsed(), "score_all");

    write_report(&paths.output, &rubric, &reports)?;
    log_embedding_metrics!(embedder.metrics(), "grade");
    info!(
        students = reports.len(),
        output = %paths.output.display(),
        elapsed = ?ctx.start.elapsed(),
        "grading complete"
    );

    output_by_format!(ctx.cli.format,
        json => {
            let summary = GradeSummary {
                output: paths.output.display().to_string(),
                embedder: embedder.name(),
                students: reports.len(),
                questions: rubric.len(),
                totals: reports
                    .iter()
                    .map(|r| StudentTotal {
                        student_id: &r.student_id,
                        total_score: r.total_score,
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        },
        human => {
            if !ctx.cli.quiet {
                println!("SAASS completed.");
                println!("Results saved to {}", paths.output.display());
            }
        }
    )
}
