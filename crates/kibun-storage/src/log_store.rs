//! Append-only interaction log with two persisted mirrors.
//!
//! Every recorded interaction is written to a row-oriented CSV mirror and to
//! a line-oriented JSON mirror before it becomes visible in memory. Both
//! mirrors are strictly append-only, so concurrent appenders can interleave
//! lines but can never clobber each other's entries.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{FeedbackEntry, Sentiment};

const CSV_FILE: &str = "feedback_log.csv";
const JSONL_FILE: &str = "feedback_log.jsonl";
const CSV_HEADER: &str = "timestamp,text,sentiment,score";

/// Export failure surfaced to the UI layer
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no feedback has been recorded yet (missing {0})")]
    NotFound(PathBuf),
}

/// Append-only feedback log, mirrored to disk on every record
#[derive(Debug)]
pub struct FeedbackLog {
    entries: Vec<FeedbackEntry>,
    csv_path: PathBuf,
    jsonl_path: PathBuf,
}

impl FeedbackLog {
    /// Open the log in the given data directory, replaying the durable
    /// mirror into memory. A missing mirror is an empty log.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// durable mirror cannot be read or parsed.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = data_dir.unwrap_or_else(Self::default_data_dir);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        let csv_path = dir.join(CSV_FILE);
        let jsonl_path = dir.join(JSONL_FILE);
        let entries = Self::replay(&jsonl_path)?;

        log::info!(
            "Feedback log opened at {} ({} entries)",
            dir.display(),
            entries.len()
        );

        Ok(Self {
            entries,
            csv_path,
            jsonl_path,
        })
    }

    /// Default data directory (`<local data dir>/kibun`)
    fn default_data_dir() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("kibun");
        path
    }

    /// Rebuild the entry sequence by reading every line of the durable
    /// mirror. The collection view is never derived any other way.
    fn replay(path: &Path) -> Result<Vec<FeedbackEntry>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut entries = Vec::new();
        for (number, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: FeedbackEntry = serde_json::from_str(line).with_context(|| {
                format!("Corrupt log line {} in {}", number + 1, path.display())
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Record a classified interaction.
    ///
    /// The entry is appended to both on-disk mirrors before it is appended
    /// to the in-memory sequence, so a persistence failure never leaves
    /// memory ahead of disk.
    ///
    /// # Errors
    ///
    /// Returns an error if either mirror cannot be written; the entry is
    /// then not recorded at all.
    pub fn record(
        &mut self,
        text: String,
        sentiment: Sentiment,
        score: u8,
    ) -> Result<FeedbackEntry> {
        let entry = FeedbackEntry::new(text, sentiment, score);

        self.append_csv(&entry)?;
        self.append_jsonl(&entry)?;

        self.entries.push(entry.clone());
        log::debug!("Recorded {} entry #{}", sentiment, self.entries.len());

        Ok(entry)
    }

    /// Read-only view of the in-memory sequence, insertion order
    #[must_use]
    pub fn all(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    #[must_use]
    pub fn jsonl_path(&self) -> &Path {
        &self.jsonl_path
    }

    /// Literal contents of the row-oriented mirror.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NotFound`] if nothing has been recorded yet.
    pub fn export_csv(&self) -> Result<String> {
        if !self.csv_path.exists() {
            return Err(ExportError::NotFound(self.csv_path.clone()).into());
        }
        fs::read_to_string(&self.csv_path)
            .with_context(|| format!("Failed to read {}", self.csv_path.display()))
    }

    /// Whole-collection view as a pretty-printed JSON array, reconstructed
    /// from the durable mirror.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NotFound`] if nothing has been recorded yet.
    pub fn export_json(&self) -> Result<String> {
        if !self.jsonl_path.exists() {
            return Err(ExportError::NotFound(self.jsonl_path.clone()).into());
        }
        let entries = Self::replay(&self.jsonl_path)?;
        serde_json::to_string_pretty(&entries).context("Failed to render feedback log as JSON")
    }

    /// Header existence is decided by a file-existence check at call time:
    /// if the file was deleted mid-session the next append re-emits the
    /// header.
    fn append_csv(&self, entry: &FeedbackEntry) -> Result<()> {
        let needs_header = !self.csv_path.exists();

        let mut row = String::new();
        if needs_header {
            let _ = writeln!(row, "{CSV_HEADER}");
        }
        let _ = writeln!(
            row,
            "{},{},{},{}",
            entry.timestamp.to_rfc3339(),
            escape_csv(&entry.text),
            entry.sentiment,
            entry.score
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Failed to open {} for append", self.csv_path.display()))?;
        file.write_all(row.as_bytes())
            .with_context(|| format!("Failed to append to {}", self.csv_path.display()))
    }

    fn append_jsonl(&self, entry: &FeedbackEntry) -> Result<()> {
        let mut line =
            serde_json::to_string(entry).context("Failed to serialize feedback entry")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.jsonl_path)
            .with_context(|| format!("Failed to open {} for append", self.jsonl_path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to {}", self.jsonl_path.display()))
    }
}

/// Escape a string for CSV format
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_log(dir: &TempDir) -> FeedbackLog {
        FeedbackLog::open(Some(dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_open_empty() {
        let dir = TempDir::new().unwrap();
        let log = open_log(&dir);
        assert!(log.is_empty());
        assert!(!log.csv_path().exists());
        assert!(!log.jsonl_path().exists());
    }

    #[test]
    fn test_record_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let mut log = open_log(&dir);

        log.record("great".to_string(), Sentiment::Positive, 95).unwrap();
        log.record("awful".to_string(), Sentiment::Negative, 88).unwrap();
        log.record("fine".to_string(), Sentiment::Neutral, 50).unwrap();

        let entries = log.all();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "great");
        assert_eq!(entries[1].sentiment, Sentiment::Negative);
        assert_eq!(entries[2].score, 50);
    }

    #[test]
    fn test_csv_header_written_once() {
        let dir = TempDir::new().unwrap();
        let mut log = open_log(&dir);

        log.record("a".to_string(), Sentiment::Positive, 90).unwrap();
        log.record("b".to_string(), Sentiment::Negative, 80).unwrap();

        let contents = fs::read_to_string(log.csv_path()).unwrap();
        let headers = contents
            .lines()
            .filter(|l| *l == CSV_HEADER)
            .count();
        assert_eq!(headers, 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_csv_header_reemitted_after_deletion() {
        let dir = TempDir::new().unwrap();
        let mut log = open_log(&dir);

        log.record("a".to_string(), Sentiment::Positive, 90).unwrap();
        fs::remove_file(log.csv_path()).unwrap();
        log.record("b".to_string(), Sentiment::Negative, 80).unwrap();

        let contents = fs::read_to_string(log.csv_path()).unwrap();
        assert!(contents.starts_with(CSV_HEADER));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_csv_escapes_special_characters() {
        let dir = TempDir::new().unwrap();
        let mut log = open_log(&dir);

        log.record("good, but \"odd\"".to_string(), Sentiment::Positive, 70)
            .unwrap();

        let contents = fs::read_to_string(log.csv_path()).unwrap();
        assert!(contents.contains("\"good, but \"\"odd\"\"\""));
    }

    #[test]
    fn test_reopen_replays_durable_mirror() {
        let dir = TempDir::new().unwrap();
        {
            let mut log = open_log(&dir);
            log.record("first".to_string(), Sentiment::Positive, 95).unwrap();
            log.record("second".to_string(), Sentiment::Neutral, 60).unwrap();
        }

        let reopened = open_log(&dir);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.all()[0].text, "first");
        assert_eq!(reopened.all()[1].text, "second");
    }

    #[test]
    fn test_round_trip_field_for_field() {
        let dir = TempDir::new().unwrap();
        let mut log = open_log(&dir);

        let recorded = vec![
            log.record("one".to_string(), Sentiment::Positive, 91).unwrap(),
            log.record("two".to_string(), Sentiment::Negative, 72).unwrap(),
            log.record("three".to_string(), Sentiment::Neutral, 33).unwrap(),
        ];

        let replayed = open_log(&dir);
        assert_eq!(replayed.all(), recorded.as_slice());
    }

    #[test]
    fn test_export_before_any_record_is_not_found() {
        let dir = TempDir::new().unwrap();
        let log = open_log(&dir);

        let csv_err = log.export_csv().unwrap_err();
        assert!(csv_err.downcast_ref::<ExportError>().is_some());

        let json_err = log.export_json().unwrap_err();
        assert!(json_err.downcast_ref::<ExportError>().is_some());
    }

    #[test]
    fn test_export_csv_returns_literal_contents() {
        let dir = TempDir::new().unwrap();
        let mut log = open_log(&dir);
        log.record("hello".to_string(), Sentiment::Positive, 99).unwrap();

        let exported = log.export_csv().unwrap();
        let on_disk = fs::read_to_string(log.csv_path()).unwrap();
        assert_eq!(exported, on_disk);
        assert!(exported.starts_with(CSV_HEADER));
    }

    #[test]
    fn test_export_json_is_ordered_array() {
        let dir = TempDir::new().unwrap();
        let mut log = open_log(&dir);
        log.record("first".to_string(), Sentiment::Positive, 95).unwrap();
        log.record("second".to_string(), Sentiment::Negative, 85).unwrap();

        let exported = log.export_json().unwrap();
        let parsed: Vec<FeedbackEntry> = serde_json::from_str(&exported).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].text, "first");
        assert_eq!(parsed[1].text, "second");
        assert_eq!(parsed.as_slice(), log.all());

        // Pretty-printed with 2-space indentation
        assert!(exported.contains("\n  {"));
    }

    #[test]
    fn test_corrupt_durable_line_fails_replay() {
        let dir = TempDir::new().unwrap();
        {
            let mut log = open_log(&dir);
            log.record("ok".to_string(), Sentiment::Positive, 90).unwrap();
        }

        let jsonl = dir.path().join(JSONL_FILE);
        let mut raw = fs::read_to_string(&jsonl).unwrap();
        raw.push_str("not json\n");
        fs::write(&jsonl, raw).unwrap();

        let err = FeedbackLog::open(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_escape_csv_plain() {
        assert_eq!(escape_csv("hello"), "hello");
    }

    #[test]
    fn test_escape_csv_comma_and_quote() {
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
