//! Stats and insights commands - report on collected feedback

use clap::Args;
use critic_core::{insights, Config, FeedbackStatistics, FeedbackStore, JsonFileRepository};

use super::print_json;

/// Show aggregate feedback statistics
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsArgs {
    /// Execute the stats command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let stats = load_statistics(config);

        if self.json {
            return print_json(&stats);
        }

        println!("Feedback Statistics");
        println!("===================");
        println!();
        println!("Total reviews:     {}", stats.total_reviews);
        println!("Average rating:    {:.2}", stats.average_rating);
        println!("Helpful:           {:.2}%", stats.helpful_percentage);

        if !stats.language_distribution.is_empty() {
            println!();
            println!("Languages:");
            let mut languages: Vec<_> = stats.language_distribution.iter().collect();
            languages.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (language, count) in languages {
                println!("  {:<12} {}", language, count);
            }
        }

        if !stats.recent_suggestions.is_empty() {
            println!();
            println!("Recent suggestions:");
            for suggestion in &stats.recent_suggestions {
                println!("  - {}", suggestion);
            }
        }

        Ok(())
    }
}

/// Show insights derived from feedback
#[derive(Args, Debug)]
pub struct InsightsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl InsightsArgs {
    /// Execute the insights command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let insights = insights::derive(&load_statistics(config));

        if self.json {
            return print_json(&insights);
        }

        for insight in &insights {
            let marker = if insight.is_warning() { "!" } else { "-" };
            println!("{} {}", marker, insight);
        }
        Ok(())
    }
}

fn load_statistics(config: &Config) -> FeedbackStatistics {
    FeedbackStore::open(JsonFileRepository::new(&config.feedback.path)).statistics()
}
