//! Review command - review one or more files in a single session

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use critic_core::{
    Config, FeedbackSubmission, Outcome, ReviewPipeline, ReviewRecord, ReviewRequest, ReviewType,
};

use super::{build_pipeline, print_json, read_code, resolve_language};

/// Arguments for the review command
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Files to review (`-` reads stdin)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Language of the code (detected from the extension when omitted)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Review type: comprehensive, test_cases or quick_fix
    #[arg(short = 't', long = "type", default_value = "comprehensive")]
    pub review_type: ReviewType,

    /// Issue to fix (required for quick_fix)
    #[arg(long)]
    pub issue: Option<String>,

    /// Ask for a rating after each review
    #[arg(long)]
    pub feedback: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// List the session's reviews when done
    #[arg(long)]
    pub history: bool,

    /// Only list reviews in this language (implies --history)
    #[arg(long)]
    pub history_language: Option<String>,

    /// Only list reviews of this type (implies --history)
    #[arg(long)]
    pub history_type: Option<ReviewType>,
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        if self.review_type == ReviewType::QuickFix && self.issue.is_none() {
            anyhow::bail!("--issue is required for quick_fix reviews");
        }

        let mut pipeline = build_pipeline(config)?;
        let session_id = pipeline.start_new_session();

        if verbose {
            tracing::info!(
                session_id = %session_id,
                files = self.files.len(),
                review_type = self.review_type.as_str(),
                "Starting review session"
            );
        }

        let mut failures = 0;
        for path in &self.files {
            let code = read_code(path)?;
            let language = resolve_language(self.language.as_deref(), path)?;

            if let Some(issue) = self.review_type_issue() {
                let result = pipeline.process_quick_fix(&code, issue, &language).await;
                if self.json {
                    print_json(&result)?;
                } else {
                    print_fix(path, &result);
                }
                failures += usize::from(!result.is_success());
                continue;
            }

            let request = ReviewRequest::new(code, language).with_type(self.review_type);
            let result = pipeline.process_review(request).await;

            if self.json {
                print_json(&result)?;
            } else {
                print_review(path, &result);
            }

            match result {
                Outcome::Success(record) if self.feedback => ask_feedback(&mut pipeline, &record)?,
                Outcome::Success(_) => {}
                Outcome::Failure(_) => failures += 1,
            }
        }

        if self.wants_history() {
            let shown = filter_history(
                pipeline.session_history(),
                self.history_language.as_deref(),
                self.history_type,
            );
            if self.json {
                print_json(&shown)?;
            } else {
                println!();
                print!("{}", render_history(&shown));
            }
        }

        if !self.json {
            println!();
            println!(
                "Session {}: {} review(s) recorded",
                session_id,
                pipeline.session_history().len()
            );
        }

        if failures > 0 {
            anyhow::bail!("{} of {} file(s) failed", failures, self.files.len());
        }
        Ok(())
    }

    fn wants_history(&self) -> bool {
        self.history || self.history_language.is_some() || self.history_type.is_some()
    }

    fn review_type_issue(&self) -> Option<&str> {
        match self.review_type {
            ReviewType::QuickFix => self.issue.as_deref(),
            ReviewType::Comprehensive | ReviewType::TestCases => None,
        }
    }
}

fn print_review(path: &std::path::Path, result: &Outcome<ReviewRecord>) {
    println!();
    println!("{}", path.display());
    println!("{}", "=".repeat(path.display().to_string().chars().count().max(3)));
    match result {
        Outcome::Success(record) => {
            let stats = &record.code_stats;
            println!(
                "{} | {} | {} lines ({} non-empty), {} chars, complexity: {}",
                record.review_type,
                record.language,
                stats.total_lines,
                stats.non_empty_lines,
                stats.total_characters,
                stats.complexity
            );
            println!();
            println!("{}", record.review_text);
        }
        Outcome::Failure(failure) => {
            eprintln!("Review failed: {}", failure.error);
        }
    }
}

const HISTORY_CODE_CHARS: usize = 200;
const HISTORY_REVIEW_CHARS: usize = 500;

/// Reviews matching the optional language and type filters, in stored order
fn filter_history<'a>(
    records: &'a [ReviewRecord],
    language: Option<&str>,
    review_type: Option<ReviewType>,
) -> Vec<&'a ReviewRecord> {
    records
        .iter()
        .filter(|r| match language {
            Some(l) => r.language.eq_ignore_ascii_case(l.trim()),
            None => true,
        })
        .filter(|r| review_type.is_none() || review_type == Some(r.review_type))
        .collect()
}

/// Newest first, numbered by position in the filtered list
fn render_history(records: &[&ReviewRecord]) -> String {
    if records.is_empty() {
        return "No reviews in this session match.\n".to_string();
    }

    let mut out = String::new();
    for (i, record) in records.iter().enumerate().rev() {
        let stats = &record.code_stats;
        out.push_str(&format!(
            "#{} {} | {} | {} | {} lines ({} non-empty), complexity: {}\n",
            i + 1,
            record.language,
            record.review_type.as_str(),
            record.timestamp.format("%Y-%m-%d %H:%M UTC"),
            stats.total_lines,
            stats.non_empty_lines,
            stats.complexity
        ));
        out.push_str(&format!("    code:   {}\n", truncate(&record.code, HISTORY_CODE_CHARS)));
        out.push_str(&format!(
            "    review: {}\n",
            truncate(&record.review_text, HISTORY_REVIEW_CHARS)
        ));
    }
    out
}

/// Collapse whitespace onto one line and cut at `max` characters
fn truncate(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    format!("{}...", cut)
}

fn print_fix(path: &std::path::Path, result: &critic_core::FixResult) {
    println!();
    println!("{}", path.display());
    match result {
        Outcome::Success(fix) => {
            println!("Issue: {}", fix.issue);
            println!();
            println!("{}", fix.fix_text);
        }
        Outcome::Failure(failure) => eprintln!("Quick fix failed: {}", failure.error),
    }
}

fn ask_feedback(pipeline: &mut ReviewPipeline, record: &ReviewRecord) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let Some(rating) = prompt(&mut input, "Rate this review (1-5, empty to skip): ")? else {
        return Ok(());
    };
    let rating: u8 = match rating.parse() {
        Ok(r) => r,
        Err(_) => {
            eprintln!("Not a number, skipping feedback");
            return Ok(());
        }
    };

    let helpful = prompt(&mut input, "Was it helpful? [y/N]: ")?
        .map(|a| a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes"))
        .unwrap_or(false);
    let suggestions = prompt(&mut input, "Suggestions (optional): ")?.unwrap_or_default();

    let submission = FeedbackSubmission::new(
        record.review_text.clone(),
        record.code.clone(),
        record.language.clone(),
        rating,
        helpful,
    )
    .with_suggestions(suggestions);

    match pipeline.collect_feedback(submission) {
        Outcome::Success(_) => println!("Thanks, feedback recorded."),
        Outcome::Failure(failure) => eprintln!("{}", failure.error),
    }
    Ok(())
}

fn prompt(input: &mut impl BufRead, question: &str) -> anyhow::Result<Option<String>> {
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}
