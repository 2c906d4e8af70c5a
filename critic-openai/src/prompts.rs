//! Prompt templates for the analysis capabilities
//!
//! Templates are embedded markdown with `{{VARIABLE}}` placeholders.

use std::collections::HashMap;

const REVIEW_PROMPT: &str = include_str!("prompts/review.md");
const TESTS_PROMPT: &str = include_str!("prompts/tests.md");
const FIX_PROMPT: &str = include_str!("prompts/fix.md");

/// The three things the analysis service can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Comprehensive review
    Review,
    /// Unit test generation
    Tests,
    /// Targeted fix
    Fix,
}

/// Sampling parameters sent with a request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl Capability {
    /// Sampling used for this capability
    pub fn sampling(&self) -> Sampling {
        match self {
            Capability::Review => Sampling {
                temperature: 0.7,
                max_tokens: 2000,
            },
            Capability::Tests => Sampling {
                temperature: 0.5,
                max_tokens: 1500,
            },
            Capability::Fix => Sampling {
                temperature: 0.3,
                max_tokens: 1500,
            },
        }
    }
}

/// Get the raw system prompt template for a capability
pub fn get_template(capability: Capability) -> &'static str {
    match capability {
        Capability::Review => REVIEW_PROMPT,
        Capability::Tests => TESTS_PROMPT,
        Capability::Fix => FIX_PROMPT,
    }
}

/// Variables substituted into a template
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    variables: HashMap<String, String>,
}

impl PromptContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Set the programming language
    pub fn with_language(self, language: impl Into<String>) -> Self {
        self.with("LANGUAGE", language)
    }
}

/// Render the system prompt for a capability
///
/// When `reply_language` is set the model is told to answer in it.
pub fn system_prompt(
    capability: Capability,
    language: &str,
    reply_language: Option<&str>,
) -> String {
    let context = PromptContext::new().with_language(language);
    let mut prompt = render_template(get_template(capability), &context);

    if let Some(reply) = reply_language.map(str::trim).filter(|r| !r.is_empty()) {
        prompt.push_str(&format!("\nRespond in {}.\n", reply));
    }

    prompt
}

/// Build the user message carrying the code
pub fn user_message(
    capability: Capability,
    code: &str,
    language: &str,
    issue: Option<&str>,
) -> String {
    let fence = language.to_lowercase();
    let block = format!("```{}\n{}\n```", fence, code);

    match capability {
        Capability::Review => format!("Please review the following {} code:\n\n{}", language, block),
        Capability::Tests => format!("Write test cases for the following {} code:\n\n{}", language, block),
        Capability::Fix => format!(
            "Fix the issue '{}' in the following code:\n\n{}\n\nShow the corrected code and explain why each change was made.",
            issue.unwrap_or("(not specified)"),
            block
        ),
    }
}

fn render_template(template: &str, context: &PromptContext) -> String {
    let mut result = template.to_string();

    for (key, value) in &context.variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_have_language_placeholder() {
        for capability in [Capability::Review, Capability::Tests, Capability::Fix] {
            assert!(get_template(capability).contains("{{LANGUAGE}}"));
        }
    }

    #[test]
    fn test_review_prompt_lists_categories() {
        let prompt = system_prompt(Capability::Review, "Python", None);
        assert!(prompt.contains("senior Python developer"));
        for section in ["Bugs", "Style", "Performance", "Refactoring", "Tests", "Complexity"] {
            assert!(prompt.contains(section), "missing {}", section);
        }
        assert!(!prompt.contains("{{"));
        assert!(!prompt.contains("Respond in"));
    }

    #[test]
    fn test_reply_language_appended() {
        let prompt = system_prompt(Capability::Fix, "Go", Some("Korean"));
        assert!(prompt.trim_end().ends_with("Respond in Korean."));

        let blank = system_prompt(Capability::Fix, "Go", Some("  "));
        assert!(!blank.contains("Respond in"));
    }

    #[test]
    fn test_user_message_fences_code() {
        let message = user_message(Capability::Tests, "fn add() {}", "Rust", None);
        assert!(message.contains("```rust\nfn add() {}\n```"));
    }

    #[test]
    fn test_fix_message_names_issue() {
        let message = user_message(Capability::Fix, "x = 1/0", "Python", Some("division by zero"));
        assert!(message.contains("'division by zero'"));
    }

    #[test]
    fn test_sampling_per_capability() {
        assert_eq!(Capability::Review.sampling().max_tokens, 2000);
        assert_eq!(Capability::Fix.sampling().temperature, 0.3);
        assert_eq!(Capability::Tests.sampling().temperature, 0.5);
    }
}
