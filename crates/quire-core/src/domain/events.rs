//! Events - ドメインイベント
//!
//! タスクストアとポーラーが発行し、`EventSink` に送られます。
//! 利用者向けの警告（重複登録・保存失敗・ポーリング失敗の継続）もここを通ります。

use super::ids::{BookId, TaskId};
use super::task::TaskStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    TaskAdded {
        task_id: TaskId,
        book_id: BookId,
    },
    DuplicateRejected {
        book_id: BookId,
    },
    TaskRemoved {
        task_id: TaskId,
    },
    QueueCleared {
        removed: usize,
    },
    TaskRetried {
        previous: TaskId,
        task_id: TaskId,
        book_id: BookId,
    },
    TaskResolved {
        task_id: TaskId,
        book_id: BookId,
        status: TaskStatus,
    },
    /// Whole-list write failed; the in-memory list is still authoritative.
    PersistenceFailed {
        error: String,
    },
    /// Consecutive poll failures reached the warning threshold.
    PollFailing {
        consecutive: u32,
        error: String,
    },
}

impl DomainEvent {
    /// Should a UI surface this to the user?
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            DomainEvent::DuplicateRejected { .. }
                | DomainEvent::PersistenceFailed { .. }
                | DomainEvent::PollFailing { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::TaskAdded { .. } => "task_added",
            DomainEvent::DuplicateRejected { .. } => "duplicate_rejected",
            DomainEvent::TaskRemoved { .. } => "task_removed",
            DomainEvent::QueueCleared { .. } => "queue_cleared",
            DomainEvent::TaskRetried { .. } => "task_retried",
            DomainEvent::TaskResolved { .. } => "task_resolved",
            DomainEvent::PersistenceFailed { .. } => "persistence_failed",
            DomainEvent::PollFailing { .. } => "poll_failing",
        }
    }
}
