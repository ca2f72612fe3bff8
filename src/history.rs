//! Turn records and the in-memory session history.
//!
//! One [`TurnRecord`] is created per submitted question and appended to an
//! insertion-ordered, append-only list for the lifetime of the session.
//! Records are never mutated after creation.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Tabular result of running the generated SQL.
///
/// `rows` holds at most [`TableData::DISPLAY_LIMIT`] rows; `total_rows` keeps
/// the untruncated count so the UI can say "showing 10 of 1234".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub total_rows: usize,
}

impl TableData {
    pub const DISPLAY_LIMIT: usize = 10;

    /// Truncate to the display limit, preserving the original row count.
    pub fn truncated(mut self) -> Self {
        self.total_rows = self.rows.len().max(self.total_rows);
        if self.rows.len() > Self::DISPLAY_LIMIT {
            self.rows.truncate(Self::DISPLAY_LIMIT);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One question/response entry in the chat history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnRecord {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_questions: Option<Vec<String>>,
    /// Set when the pipeline failed outright; the other response fields are
    /// empty in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TurnRecord {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// A turn that failed before producing any response fields.
    pub fn failed(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Append-only session history shared between web handlers.
#[derive(Debug, Default)]
pub struct ChatHistory {
    turns: Mutex<Vec<TurnRecord>>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, turn: TurnRecord) {
        self.turns.lock().expect("history lock poisoned").push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.lock().expect("history lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all turns, in submission order.
    pub fn snapshot(&self) -> Vec<TurnRecord> {
        self.turns.lock().expect("history lock poisoned").clone()
    }
}
