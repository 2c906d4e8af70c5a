//! Critic CLI - Command line interface for AI code reviews
//!
//! Reviews code through an OpenAI-compatible model and collects feedback on
//! the reviews it produces.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use critic_core::{language::SUPPORTED_LANGUAGES, secrets, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{FeedbackArgs, FixArgs, InsightsArgs, ReviewArgs, StatsArgs};

/// Critic: AI code reviews with feedback analytics
#[derive(Parser, Debug)]
#[command(name = "critic")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model to use (overrides config and env)
    #[arg(long, global = true, env = "CRITIC_MODEL")]
    model: Option<String>,

    /// Feedback log location (overrides config and env)
    #[arg(long, global = true, env = "CRITIC_FEEDBACK_PATH")]
    feedback_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Review code files in one session
    #[command(visible_alias = "r")]
    Review(ReviewArgs),

    /// Ask for a fix of a specific issue
    Fix(FixArgs),

    /// Record feedback on a review
    Feedback(FeedbackArgs),

    /// Show feedback statistics
    Stats(StatsArgs),

    /// Show insights derived from feedback
    Insights(InsightsArgs),

    /// List supported languages
    Languages,

    /// Show current configuration
    Config,

    /// Create a secrets file template for the API key
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = Config::load_with_overrides(cli.model.clone(), cli.feedback_path.clone())?;

    if cli.verbose {
        tracing::info!(
            api_url = %config.analysis.api_url,
            model = %config.analysis.model,
            feedback_path = %config.feedback.path.display(),
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("critic {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Review(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Fix(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Feedback(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Stats(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Insights(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Languages) => {
            for language in SUPPORTED_LANGUAGES {
                println!("{}", language);
            }
        }
        Some(Commands::Config) => {
            println!("Critic Configuration");
            println!("====================");
            println!();
            println!("Analysis Settings:");
            println!("  api_url: {}", config.analysis.api_url);
            println!("  model: {}", config.analysis.model);
            println!("  timeout: {}s", config.analysis.timeout.as_secs());
            println!(
                "  reply_language: {}",
                config.analysis.reply_language.as_deref().unwrap_or("(model default)")
            );
            println!();
            println!("Feedback log: {}", config.feedback.path.display());
            println!("Max sessions: {}", config.sessions.max_sessions);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            match secrets::resolve_api_key() {
                Ok(Some(key)) => println!("API key: configured ({})", key.source()),
                Ok(None) => println!("API key: missing"),
                Err(e) => println!("API key: unusable ({})", e),
            }
        }
        Some(Commands::Init) => {
            let path = secrets::create_template()?;
            println!("Created {}", path.display());
            println!("Add your API key there, or set OPENAI_API_KEY.");
        }
        None => {
            println!("Critic - AI code reviews with feedback analytics");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
