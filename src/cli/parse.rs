use saass_core::config::EmbeddingProvider;
use saass_core::format::OutputFormat;

/// Parse output format from string
pub fn parse_output_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse embedding provider from string
pub fn parse_provider(s: &str) -> std::result::Result<EmbeddingProvider, String> {
    s.parse::<EmbeddingProvider>().map_err(|e| e.to_string())
}
