//! Reconciler - サーバー状態をタスクストアへ一方向にマージ
//!
//! # フロー
//! 1. `is_downloading` なら現在ジョブの記述子を作る（永続化しない）
//! 2. `results` の各エントリについて、同じ book_id の pending タスクを探して遷移させる
//! 3. 変更があれば一覧全体を 1 回だけ書き込む
//!
//! pending ガードがあるので、同じ `results` を何度適用しても 2 回目以降は何も起きません。

use tracing::debug;

use crate::domain::{BookId, CurrentJob, ServerStatus, TaskId, TaskStatus};
use crate::store::TaskStore;

/// One pending task resolved by a reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTransition {
    pub task_id: TaskId,
    pub book_id: BookId,
    pub status: TaskStatus,
}

/// What a reconcile pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub current: Option<CurrentJob>,
    pub applied: Vec<AppliedTransition>,
    /// Result entries that matched no pending task.
    pub ignored: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Merge `status` into `store`.
pub fn reconcile(store: &mut TaskStore, status: &ServerStatus) -> ReconcileReport {
    let mut report = ReconcileReport {
        current: status.current_job(),
        ..ReconcileReport::default()
    };

    for result in &status.results {
        let target = result.target_status();
        match store.transition_pending(&result.book_id, target, result.message.clone()) {
            Some(task_id) => report.applied.push(AppliedTransition {
                task_id,
                book_id: result.book_id.clone(),
                status: target,
            }),
            None => report.ignored += 1,
        }
    }

    if report.changed() {
        store.commit();
    }

    debug!(
        applied = report.applied.len(),
        ignored = report.ignored,
        downloading = status.is_downloading,
        "reconciled"
    );
    report
}
