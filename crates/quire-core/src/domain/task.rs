//! Task record and its status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BookId, TaskId};

/// Status of a user-enqueued task.
///
/// State transitions:
/// - Pending -> Downloading | Completed | Failed | Skipped
///
/// Nothing leads back to Pending. A user retry builds a fresh `Task` instead
/// of rewinding the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting for the remote worker to pick it up.
    Pending,

    /// Being downloaded by the remote worker.
    Downloading,

    /// Remote worker reported success.
    Completed,

    /// Remote worker reported failure.
    Failed,

    /// Remote worker decided not to download it.
    Skipped,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::Downloading,
        TaskStatus::Completed,
        TaskStatus::Failed,
        TaskStatus::Skipped,
    ];

    /// Is this a terminal state (eligible for retry)?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Skipped
        )
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        self == TaskStatus::Pending && next != TaskStatus::Pending
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Downloading => "downloading",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted download job.
///
/// Design:
/// - `id`, `book_id`, `added_at` are fixed at construction.
/// - `completed_at` is stamped at most once.
/// - All status changes go through `resolve`, which enforces the transition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub book_id: BookId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_name: Option<String>,

    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Percent complete, only meaningful while `Downloading`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    pub added_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: TaskId,
        book_id: BookId,
        book_name: Option<String>,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            book_id,
            book_name,
            status: TaskStatus::Pending,
            message: None,
            progress: None,
            added_at,
            completed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    /// Move a pending task to `next`. Returns false (and changes nothing) when
    /// the transition is not allowed.
    pub fn resolve(&mut self, next: TaskStatus, message: Option<String>, now: DateTime<Utc>) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.message = message;
        if next != TaskStatus::Downloading {
            self.progress = None;
        }
        if next == TaskStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        true
    }

    /// Build the next attempt for a terminal task: same book, new identity.
    pub fn rearmed(&self, id: TaskId, now: DateTime<Utc>) -> Self {
        Task::new(id, self.book_id.clone(), self.book_name.clone(), now)
    }
}
