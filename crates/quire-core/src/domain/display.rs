//! Render-ready view types handed to the renderer collaborator.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{BookId, TaskId};
use super::task::TaskStatus;

/// UI key of a display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DisplayKey {
    /// The ephemeral in-flight job reported by the server.
    Current,
    /// A persisted task.
    Task(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub key: DisplayKey,
    pub book_id: Option<BookId>,
    pub book_name: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// False for the ephemeral current-job row.
    pub removable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl DisplayItem {
    pub fn is_current(&self) -> bool {
        self.key == DisplayKey::Current
    }

    /// Label for the row: name if known, else the book id.
    pub fn label(&self) -> String {
        match (&self.book_name, &self.book_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "(unknown)".to_string(),
        }
    }
}

/// Number of display rows per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub downloading: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::Downloading => self.downloading,
            TaskStatus::Completed => self.completed,
            TaskStatus::Failed => self.failed,
            TaskStatus::Skipped => self.skipped,
        }
    }
}

/// Everything a render pass needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayView {
    pub items: Vec<DisplayItem>,
    pub counts: StatusCounts,
}
