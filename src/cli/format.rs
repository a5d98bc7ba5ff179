//! Format output dispatch helpers

/// Dispatch output by format.
///
/// The json branch evaluates to a `Result`; the human branch prints and
/// yields `Ok(())`.
///
/// ```rust,ignore
/// output_by_format!(cli.format,
///     json => {
///         println!("{}", serde_json::to_string_pretty(&summary)?);
///         Ok(())
///     },
///     human => { println!("Done"); }
/// )?;
/// ```
#[macro_export]
macro_rules! output_by_format {
    ($format:expr, json => $json:expr, human => $human:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
        }
    };
}
