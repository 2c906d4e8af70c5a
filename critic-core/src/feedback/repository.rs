//! Persistence for the feedback log
//!
//! The log is always written whole. The JSON repository writes to a temporary
//! file next to the target and renames it into place, so a crash mid-write
//! leaves the previous log intact.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::FeedbackEntry;
use crate::{Error, Result};

/// Storage backend for feedback entries
pub trait FeedbackRepository: Send + Sync {
    /// Read every stored entry in stored order
    fn load_all(&self) -> Result<Vec<FeedbackEntry>>;

    /// Replace the stored log with `entries`
    fn save_all(&self, entries: &[FeedbackEntry]) -> Result<()>;

    /// Move an unreadable log out of the way so the next save cannot
    /// overwrite it
    ///
    /// Returns where the old log went, or `None` when there was nothing to
    /// keep.
    fn set_aside(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedbackRepository for JsonFileRepository {
    fn load_all(&self) -> Result<Vec<FeedbackEntry>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No feedback log yet");
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let entries: Vec<FeedbackEntry> = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), entries = entries.len(), "Loaded feedback log");
        Ok(entries)
    }

    fn save_all(&self, entries: &[FeedbackEntry]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let content = serde_json::to_vec_pretty(entries)?;
        let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
        temp.write_all(&content)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| {
            Error::Storage(format!("failed to persist {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), entries = entries.len(), "Saved feedback log");
        Ok(())
    }

    fn set_aside(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let backup = corrupt_backup_path(&self.path, Utc::now());
        std::fs::rename(&self.path, &backup)?;
        debug!(from = %self.path.display(), to = %backup.display(), "Moved unreadable feedback log");
        Ok(Some(backup))
    }
}

/// `feedback_data.json` -> `feedback_data.json.corrupt-20250314T092653Z`
fn corrupt_backup_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "feedback_data.json".into());
    name.push(format!(".corrupt-{}", at.format("%Y%m%dT%H%M%S%.6fZ")));
    path.with_file_name(name)
}

/// Repository that keeps the log in memory only
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<Vec<FeedbackEntry>>,
}

impl MemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with `entries`
    pub fn with_entries(entries: Vec<FeedbackEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl FeedbackRepository for MemoryRepository {
    fn load_all(&self) -> Result<Vec<FeedbackEntry>> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .map_err(|_| Error::Storage("memory repository lock poisoned".to_string()))
    }

    fn save_all(&self, entries: &[FeedbackEntry]) -> Result<()> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|_| Error::Storage("memory repository lock poisoned".to_string()))?;
        *stored = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(language: &str, rating: u8, suggestions: &str) -> FeedbackEntry {
        FeedbackEntry {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            language: language.to_string(),
            code_length: 42,
            review_length: 1337,
            rating,
            helpful: rating >= 4,
            suggestions: suggestions.to_string(),
            session_id: "session_20250314_092653".to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("feedback_data.json"));
        assert!(repo.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_reproduces_entries() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested").join("feedback.json"));
        let entries = vec![
            entry("Python", 5, "더 자세히"),
            entry("Rust", 2, ""),
        ];

        repo.save_all(&entries).unwrap();
        assert_eq!(repo.load_all().unwrap(), entries);
    }

    #[test]
    fn test_save_overwrites_whole_log() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("feedback.json"));

        repo.save_all(&[entry("Go", 3, ""), entry("Go", 4, "")]).unwrap();
        repo.save_all(&[entry("Java", 1, "")]).unwrap();

        let loaded = repo.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].language, "Java");
    }

    #[test]
    fn test_file_format_uses_snake_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        let repo = JsonFileRepository::new(&path);
        repo.save_all(&[entry("Python", 4, "ok")]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"code_length\": 42"));
        assert!(raw.contains("\"session_id\""));
        assert!(raw.contains("\"timestamp\": \"2025-03-14T09:26:53Z\""));
        // pretty printed
        assert!(raw.contains('\n'));
    }

    #[test]
    fn test_reads_existing_log_written_by_hand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(
            &path,
            r#"[
  {
    "timestamp": "2024-11-02T10:15:30.123456",
    "language": "JavaScript",
    "code_length": 120,
    "review_length": 900,
    "rating": 4,
    "helpful": true,
    "suggestions": "",
    "session_id": "session_20241102_101530"
  }
]"#,
        )
        .unwrap();

        let loaded = JsonFileRepository::new(&path).load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].language, "JavaScript");
        assert_eq!(loaded[0].rating, 4);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = JsonFileRepository::new(&path).load_all();
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_set_aside_moves_log_next_to_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(&path, "[{\"truncated\":").unwrap();

        let repo = JsonFileRepository::new(&path);
        let backup = repo.set_aside().unwrap().unwrap();

        assert!(!path.exists());
        assert_eq!(backup.parent(), path.parent());
        assert!(backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("feedback.json.corrupt-"));
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "[{\"truncated\":");
    }

    #[test]
    fn test_set_aside_without_file_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("feedback.json"));
        assert_eq!(repo.set_aside().unwrap(), None);
    }

    #[test]
    fn test_backup_name_carries_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let backup = corrupt_backup_path(Path::new("/data/feedback_data.json"), at);
        assert_eq!(
            backup,
            PathBuf::from("/data/feedback_data.json.corrupt-20250314T092653.000000Z")
        );
    }

    #[test]
    fn test_memory_repository() {
        let repo = MemoryRepository::new();
        assert!(repo.load_all().unwrap().is_empty());
        repo.save_all(&[entry("C#", 3, "")]).unwrap();
        assert_eq!(repo.load_all().unwrap().len(), 1);
    }
}
