//! `saass rubric` command - show or export the parsed rubric

use crate::cli::RubricArgs;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use saass_core::error::Result;
use saass_core::rubric::{join_exemplars, load_rubric, QuestionRubric};

/// Execute the rubric command
pub fn execute(ctx: &CommandContext, args: &RubricArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let path = args.rubric.as_ref().unwrap_or(&config.paths.rubric);

    let rubric = load_rubric(path, &config.rubric)?;

    if let Some(export) = &args.export {
        rubric.to_table().write_path(export)?;
    }

    output_by_format!(ctx.cli.format,
        json => {
            let questions: Vec<&QuestionRubric> = rubric.questions().collect();
            let output = serde_json::json!({
                "path": path.display().to_string(),
                "questions": questions,
                "exported": args.export.as_ref().map(|p| p.display().to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            for question in rubric.questions() {
                println!("{}", question.id);
                for band in &question.bands {
                    println!("  {} ({}): {}", band.label, band.score, join_exemplars(&band.exemplars));
                }
            }
            if let Some(export) = &args.export {
                if !ctx.cli.quiet {
                    println!("Exported to {}", export.display());
                }
            }
        }
    )
}
