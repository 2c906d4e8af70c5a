//! Fix command - ask for a targeted fix of a described issue

use std::path::PathBuf;

use clap::Args;
use critic_core::{Config, Outcome};

use super::{build_pipeline, print_json, read_code, resolve_language};

/// Arguments for the fix command
#[derive(Args, Debug)]
pub struct FixArgs {
    /// File containing the code (`-` reads stdin)
    pub file: PathBuf,

    /// Description of the issue to fix
    #[arg(short, long)]
    pub issue: String,

    /// Language of the code (detected from the extension when omitted)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl FixArgs {
    /// Execute the fix command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let code = read_code(&self.file)?;
        let language = resolve_language(self.language.as_deref(), &self.file)?;
        let pipeline = build_pipeline(config)?;

        let result = pipeline.process_quick_fix(&code, &self.issue, &language).await;

        if self.json {
            print_json(&result)?;
        }

        match result {
            Outcome::Success(fix) => {
                if !self.json {
                    println!("{}", fix.fix_text);
                }
                Ok(())
            }
            Outcome::Failure(failure) => anyhow::bail!("{}", failure.error),
        }
    }
}
