//! `saass validate` command - check inputs without grading

use tracing::debug;

use crate::cli::ValidateArgs;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use saass_core::answers::load_answers;
use saass_core::error::Result;
use saass_core::rubric::load_rubric;

/// Execute the validate command
pub fn execute(ctx: &CommandContext, args: &ValidateArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    if let Some(answers) = &args.answers {
        config.paths.answers = answers.clone();
    }
    if let Some(rubric) = &args.rubric {
        config.paths.rubric = rubric.clone();
    }
    let paths = &config.paths;

    let rubric = load_rubric(&paths.rubric, &config.rubric)?;
    let sheet = load_answers(&paths.answers)?;
    sheet.ensure_covers(&rubric)?;
    debug!(elapsed = ?ctx.start.elapsed(), "validate");

    let unattempted: usize = sheet
        .students
        .iter()
        .map(|s| rubric.question_ids().filter(|q| s.answer(q).is_none()).count())
        .sum();

    output_by_format!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "valid": true,
                "rubric": {
                    "path": paths.rubric.display().to_string(),
                    "questions": rubric.len(),
                },
                "answers": {
                    "path": paths.answers.display().to_string(),
                    "students": sheet.len(),
                    "answer_columns": sheet.questions.len(),
                    "unattempted": unattempted,
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            if !ctx.cli.quiet {
                println!("Rubric: {} ({} questions)", paths.rubric.display(), rubric.len());
                println!(
                    "Answers: {} ({} students, {} answer columns, {} unattempted)",
                    paths.answers.display(),
                    sheet.len(),
                    sheet.questions.len(),
                    unattempted
                );
            }
            println!("OK");
        }
    )
}
