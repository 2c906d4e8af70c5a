//! Feedback command - record a rating without running a review

use std::path::PathBuf;

use clap::{ArgAction, Args};
use critic_core::review::validate_rating;
use critic_core::{Config, FeedbackStore, FeedbackSubmission, JsonFileRepository};

use super::{print_json, read_code};

/// Arguments for the feedback command
#[derive(Args, Debug)]
pub struct FeedbackArgs {
    /// Language of the reviewed code
    #[arg(short, long)]
    pub language: String,

    /// Rating from 1 to 5
    #[arg(short, long)]
    pub rating: u8,

    /// Whether the review was helpful
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub helpful: bool,

    /// Improvement suggestions
    #[arg(short, long, default_value = "")]
    pub suggestions: String,

    /// File with the reviewed code (used for its length)
    #[arg(long)]
    pub code_file: Option<PathBuf>,

    /// File with the review text (used for its length)
    #[arg(long)]
    pub review_file: Option<PathBuf>,

    /// Print the stored entry as JSON
    #[arg(long)]
    pub json: bool,
}

impl FeedbackArgs {
    /// Execute the feedback command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        validate_rating(self.rating)?;

        let code = self.code_file.as_deref().map(read_code).transpose()?;
        let review = self.review_file.as_deref().map(read_code).transpose()?;

        let mut store = FeedbackStore::open(JsonFileRepository::new(&config.feedback.path));
        let entry = store.record(
            FeedbackSubmission::new(
                review.unwrap_or_default(),
                code.unwrap_or_default(),
                self.language.clone(),
                self.rating,
                self.helpful,
            )
            .with_suggestions(self.suggestions.clone()),
        );

        if self.json {
            print_json(&entry)?;
        } else {
            println!(
                "Recorded feedback: {} rated {}/5 ({} entries total)",
                entry.language,
                entry.rating,
                store.len()
            );
        }
        Ok(())
    }
}
