//! Lightweight code statistics
//!
//! The complexity tier is a line-count heuristic. It does not parse the code
//! and says nothing about cyclomatic complexity.

use serde::{Deserialize, Serialize};

/// Coarse size label derived from the line count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    /// Fewer than 10 lines
    Low,
    /// Fewer than 50 lines
    Medium,
    /// Fewer than 100 lines
    High,
    /// 100 lines or more
    VeryHigh,
}

impl ComplexityTier {
    /// Tier for a given line count
    pub fn from_lines(lines: usize) -> Self {
        match lines {
            0..=9 => ComplexityTier::Low,
            10..=49 => ComplexityTier::Medium,
            50..=99 => ComplexityTier::High,
            _ => ComplexityTier::VeryHigh,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ComplexityTier::Low => "low",
            ComplexityTier::Medium => "medium",
            ComplexityTier::High => "high",
            ComplexityTier::VeryHigh => "very high",
        }
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistics of a code snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeStats {
    /// Number of `\n`-separated segments, including a trailing empty one
    pub total_lines: usize,
    /// Segments with non-whitespace content
    pub non_empty_lines: usize,
    /// Length in characters
    pub total_characters: usize,
    /// Tier derived from `total_lines`
    pub complexity: ComplexityTier,
}

/// Compute statistics for `code`
pub fn analyze(code: &str) -> CodeStats {
    let (total_lines, non_empty_lines) = code
        .split('\n')
        .fold((0, 0), |(total, non_empty), line| {
            let filled = usize::from(!line.trim().is_empty());
            (total + 1, non_empty + filled)
        });

    CodeStats {
        total_lines,
        non_empty_lines,
        total_characters: code.chars().count(),
        complexity: ComplexityTier::from_lines(total_lines),
    }
}
