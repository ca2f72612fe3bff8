//! Append-only plain-text log of every submitted question.
//!
//! One line per question: `YYYY-MM-DD HH:MM:SS - <question>`. The file is
//! opened in append mode per write and closed afterwards; no rotation.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct QuestionLog {
    path: PathBuf,
}

impl QuestionLog {
    /// Create the log directory if missing and return a logger writing to
    /// `<dir>/questions_log.txt`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        Ok(Self {
            path: dir.join(crate::constants::QUESTION_LOG_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line for `question`.
    pub fn log_question(&self, question: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open question log {}", self.path.display()))?;
        writeln!(file, "{} - {}", timestamp, question)
            .with_context(|| format!("Failed to write to question log {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_per_question_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = QuestionLog::new(dir.path()).unwrap();
        log.log_question("how many users signed up?").unwrap();
        log.log_question("top sellers last month").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - how many users signed up?"));
        assert!(lines[1].ends_with(" - top sellers last month"));
    }

    #[test]
    fn test_timestamp_prefix_is_well_formed() {
        let dir = tempfile::tempdir().unwrap();
        let log = QuestionLog::new(dir.path()).unwrap();
        log.log_question("q").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let line = contents.lines().next().unwrap();
        let (stamp, rest) = line.split_once(" - ").unwrap();
        assert_eq!(rest, "q");
        // YYYY-MM-DD HH:MM:SS
        chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap();
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let log = QuestionLog::new(&nested).unwrap();
        log.log_question("q").unwrap();
        assert!(log.path().exists());
    }
}
