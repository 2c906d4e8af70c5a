//! Languages offered to users and detection from file names

use std::path::Path;

/// Languages offered in the language picker
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "Python",
    "JavaScript",
    "Java",
    "C++",
    "C#",
    "Go",
    "Rust",
    "TypeScript",
    "PHP",
    "Ruby",
    "Other",
];

/// Guess the language of a file from its extension
pub fn detect(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match ext.as_str() {
        "py" | "pyi" => "Python",
        "js" | "mjs" | "cjs" | "jsx" => "JavaScript",
        "java" => "Java",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "C++",
        "cs" => "C#",
        "go" => "Go",
        "rs" => "Rust",
        "ts" | "tsx" | "mts" => "TypeScript",
        "php" => "PHP",
        "rb" => "Ruby",
        _ => return None,
    };
    Some(language)
}

/// Case-insensitive lookup of a supported language name
pub fn canonical(name: &str) -> Option<&'static str> {
    let name = name.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .copied()
        .find(|l| l.eq_ignore_ascii_case(name))
}
