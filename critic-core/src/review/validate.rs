//! Input checks run before any call to the analysis service

use crate::{Error, Result};

/// Longest snippet accepted, in characters
pub const MAX_CODE_CHARS: usize = 10_000;

/// Accepted rating range
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Check a snippet and its language tag. The first failing rule wins.
pub fn validate(code: &str, language: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(Error::Validation("no code provided".to_string()));
    }

    if code.chars().count() > MAX_CODE_CHARS {
        return Err(Error::Validation(
            "code too long (max 10,000 characters)".to_string(),
        ));
    }

    if language.trim().is_empty() {
        return Err(Error::Validation("no language selected".to_string()));
    }

    Ok(())
}

/// Check the issue description of a quick fix
pub fn validate_issue(issue: &str) -> Result<()> {
    if issue.trim().is_empty() {
        return Err(Error::Validation("no issue description provided".to_string()));
    }
    Ok(())
}

/// Check a feedback rating
pub fn validate_rating(rating: u8) -> Result<()> {
    if !RATING_RANGE.contains(&rating) {
        return Err(Error::Validation(format!(
            "rating must be between {} and {}, got {}",
            RATING_RANGE.start(),
            RATING_RANGE.end(),
            rating
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate("print('hi')", "Python").is_ok());
    }

    #[test]
    fn test_empty_and_whitespace_code() {
        assert_eq!(message(validate("", "Python")), "no code provided");
        assert_eq!(message(validate(" \n\t ", "Python")), "no code provided");
    }

    #[test]
    fn test_code_length_limit() {
        let at_limit = "a".repeat(MAX_CODE_CHARS);
        assert!(validate(&at_limit, "Rust").is_ok());

        let over = "a".repeat(MAX_CODE_CHARS + 1);
        assert_eq!(
            message(validate(&over, "Rust")),
            "code too long (max 10,000 characters)"
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 3 bytes per char in UTF-8
        let korean = "가".repeat(MAX_CODE_CHARS);
        assert!(validate(&korean, "Python").is_ok());
    }

    #[test]
    fn test_missing_language() {
        assert_eq!(message(validate("x = 1", "")), "no language selected");
        assert_eq!(message(validate("x = 1", "  ")), "no language selected");
    }

    #[test]
    fn test_first_failure_wins() {
        assert_eq!(message(validate("   ", "")), "no code provided");
        let over = "b".repeat(MAX_CODE_CHARS + 1);
        assert_eq!(
            message(validate(&over, "")),
            "code too long (max 10,000 characters)"
        );
    }

    #[test]
    fn test_issue_and_rating() {
        assert!(validate_issue("panics on empty input").is_ok());
        assert!(validate_issue(" ").is_err());

        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(message(validate_rating(6)).contains("between 1 and 5"));
    }
}
