//! Errors - エラー型と分類
//!
//! このサブシステムのエラーはどれもプロセスを止めません。
//! `ErrorKind` は呼び出し側が「次の tick で回復するのか」「利用者に見せるのか」を
//! 判断するための運用分類です。

use thiserror::Error;

use super::ids::{BookId, TaskId};

/// ErrorKind は実行エラーの分類
///
/// - Transient: 一時的なエラー（次の poll で回復）
/// - Infrastructure: ローカル永続化の障害（メモリ上の状態が正）
/// - Rejected: 利用者の操作が拒否された
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Infrastructure,
    Rejected,
}

/// Failure of one status fetch. Always recovered by keeping the last snapshot.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("status request failed: {0}")]
    Transport(String),

    #[error("status endpoint answered {status}")]
    Http { status: u16 },

    #[error("status response could not be decoded: {0}")]
    Malformed(String),
}

impl PollError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Transient
    }
}

impl From<serde_json::Error> for PollError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Failure to read or write the persisted task slot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("task slot unavailable: {0}")]
    Unavailable(String),

    #[error("task slot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("task slot could not be decoded: {0}")]
    Decode(String),

    #[error("task list could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PersistenceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Infrastructure
    }
}

/// Rejection of an enqueue-boundary operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("book {book_id} is already queued")]
    DuplicateEnqueue { book_id: BookId },

    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("book {book_id} has no finished task to retry")]
    NothingToRetry { book_id: BookId },
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_recovery_strategy() {
        assert_eq!(PollError::Http { status: 502 }.kind(), ErrorKind::Transient);
        assert_eq!(
            PersistenceError::Unavailable("quota".into()).kind(),
            ErrorKind::Infrastructure
        );
        assert_eq!(
            TaskError::DuplicateEnqueue { book_id: "1".into() }.kind(),
            ErrorKind::Rejected
        );
    }

    #[test]
    fn duplicate_message_names_the_book() {
        let err = TaskError::DuplicateEnqueue { book_id: "111".into() };
        assert_eq!(err.to_string(), "book 111 is already queued");
    }
}
