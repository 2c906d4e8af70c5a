//! CLI command implementations

pub mod feedback;
pub mod fix;
pub mod review;
pub mod stats;

pub use feedback::FeedbackArgs;
pub use fix::FixArgs;
pub use review::ReviewArgs;
pub use stats::{InsightsArgs, StatsArgs};

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use critic_core::{language, Config, ReviewPipeline};
use critic_openai::OpenAiAnalyzer;

/// Build a pipeline talking to the configured analysis API
///
/// Fails when no API key is available.
pub fn build_pipeline(config: &Config) -> anyhow::Result<ReviewPipeline> {
    let analyzer = OpenAiAnalyzer::from_config(&config.analysis)
        .map_err(|e| anyhow::anyhow!("Failed to create analysis client: {}", e))?;
    Ok(ReviewPipeline::from_config(Arc::new(analyzer), config)?)
}

/// Read source code from a file, or stdin for `-`
pub fn read_code(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("Failed to read code from stdin")?;
        return Ok(code);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Pick the language: explicit flag first, then the file extension
pub fn resolve_language(explicit: Option<&str>, path: &Path) -> anyhow::Result<String> {
    if let Some(name) = explicit {
        return Ok(language::canonical(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.trim().to_string()));
    }

    language::detect(path).map(str::to_string).ok_or_else(|| {
        anyhow::anyhow!(
            "Could not detect the language of {}; pass --language",
            path.display()
        )
    })
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_language_prefers_flag() {
        let lang = resolve_language(Some("rust"), Path::new("main.py")).unwrap();
        assert_eq!(lang, "Rust");
    }

    #[test]
    fn test_resolve_language_keeps_unknown_flag() {
        let lang = resolve_language(Some("Haskell"), Path::new("-")).unwrap();
        assert_eq!(lang, "Haskell");
    }

    #[test]
    fn test_resolve_language_from_extension() {
        assert_eq!(resolve_language(None, Path::new("lib.go")).unwrap(), "Go");
        assert!(resolve_language(None, Path::new("-")).is_err());
    }

    #[test]
    fn test_read_code_missing_file() {
        let err = read_code(Path::new("/definitely/not/here.rs")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
