//! ServerStatus - リモートワーカーの状態スナップショット
//!
//! ポーリングのたびに丸ごと置き換えられる一時的なデータです。永続化はしません。
//! `StatusReport` はワイヤー形式（snake_case の JSON）、`ServerStatus` は
//! 正規化済みのドメイン表現です。

use serde::{Deserialize, Serialize};

use super::ids::BookId;
use super::task::TaskStatus;

/// Outcome of one finished job, as reported by the remote worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResult {
    pub book_id: BookId,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub skipped: bool,
}

impl BookResult {
    pub fn success(book_id: impl Into<BookId>) -> Self {
        Self {
            book_id: book_id.into(),
            success: true,
            message: None,
            skipped: false,
        }
    }

    pub fn failure(book_id: impl Into<BookId>, message: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            success: false,
            message: Some(message.into()),
            skipped: false,
        }
    }

    pub fn skipped(book_id: impl Into<BookId>, message: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            success: false,
            message: Some(message.into()),
            skipped: true,
        }
    }

    /// Status a pending task takes when this result is applied.
    pub fn target_status(&self) -> TaskStatus {
        if self.skipped {
            TaskStatus::Skipped
        } else if self.success {
            TaskStatus::Completed
        } else {
            TaskStatus::Failed
        }
    }
}

/// Ephemeral descriptor of the job the remote worker is running right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentJob {
    pub book_id: Option<BookId>,
    pub book_name: Option<String>,
    pub progress: u8,
    pub message: Option<String>,
}

/// Normalized snapshot of the status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStatus {
    pub is_downloading: bool,
    pub current_book_id: Option<BookId>,
    pub current_book_name: Option<String>,
    pub progress: u8,
    pub message: Option<String>,
    pub results: Vec<BookResult>,
}

impl ServerStatus {
    /// Snapshot before the first successful poll.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn downloading(book_id: impl Into<BookId>, progress: u8) -> Self {
        Self {
            is_downloading: true,
            current_book_id: Some(book_id.into()),
            progress: progress.min(100),
            ..Self::default()
        }
    }

    pub fn with_results(mut self, results: Vec<BookResult>) -> Self {
        self.results = results;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Same snapshot with the outcome list dropped.
    pub fn without_results(&self) -> Self {
        Self {
            results: Vec::new(),
            ..self.clone()
        }
    }

    pub fn current_job(&self) -> Option<CurrentJob> {
        if !self.is_downloading {
            return None;
        }
        Some(CurrentJob {
            book_id: self.current_book_id.clone(),
            book_name: self.current_book_name.clone(),
            progress: self.progress,
            message: self.message.clone(),
        })
    }
}

/// Wire shape of the status endpoint.
///
/// Every field is optional; absent fields fall back to an idle worker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusReport {
    pub is_downloading: bool,
    pub current_book: Option<String>,
    pub current_book_id: Option<BookId>,
    /// Any JSON number; normalized to a 0..=100 integer.
    pub progress: Option<f64>,
    pub message: Option<String>,
    pub results: Vec<BookResult>,
}

impl From<StatusReport> for ServerStatus {
    fn from(report: StatusReport) -> Self {
        let progress = report
            .progress
            .filter(|p| p.is_finite())
            .map_or(0, |p| p.clamp(0.0, 100.0).round() as u8);
        Self {
            is_downloading: report.is_downloading,
            current_book_id: report.current_book_id,
            current_book_name: report.current_book.filter(|s| !s.is_empty()),
            progress,
            message: report.message.filter(|s| !s.is_empty()),
            results: report.results,
        }
    }
}
