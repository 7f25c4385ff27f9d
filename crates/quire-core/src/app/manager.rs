//! TaskManager - セッション全体の入口
//!
//! ストアとポーラーを所有し、登録境界（add / remove / clear / retry）と
//! 表示境界（display_view）を提供します。変更のたびに Renderer を呼びます。
//! 変更のログはストアが発行するイベント経由で出ます。
//!
//! # ロック
//! - `poller` は fetch から reconcile まで保持する。tick が重ならないのはこのため
//! - 順序は poller → session。逆順で取ることはない
//! - `session`（ストア + 最新スナップショット）は await を跨いで保持しない
//! - session を取るたびにスロットを読み直す（別プロセスの `quire add` を拾うため）

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::domain::{BookId, DisplayView, ServerStatus, Task, TaskError, TaskId};
use crate::ports::Renderer;
use crate::store::TaskStore;

use super::poller::StatusPoller;
use super::projection;
use super::reconciler::{self, ReconcileReport};

/// Result of one poll/reconcile/render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Applied(ReconcileReport),
    /// The run that started the fetch was stopped before the response arrived.
    Discarded,
}

struct Session {
    store: TaskStore,
    latest: ServerStatus,
}

pub struct TaskManager {
    session: Mutex<Session>,
    poller: Mutex<StatusPoller>,
    renderer: Arc<dyn Renderer>,
}

impl TaskManager {
    pub(crate) fn new(store: TaskStore, poller: StatusPoller, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            session: Mutex::new(Session {
                store,
                latest: ServerStatus::idle(),
            }),
            poller: Mutex::new(poller),
            renderer,
        }
    }

    pub async fn add(&self, book_id: BookId, book_name: Option<String>) -> Result<TaskId, TaskError> {
        let mut session = self.lock_session().await;
        let id = session.store.add(book_id, book_name)?;
        self.render(&session);
        Ok(id)
    }

    pub async fn remove(&self, id: TaskId) -> Result<Task, TaskError> {
        let mut session = self.lock_session().await;
        let removed = session.store.remove(id)?;
        self.render(&session);
        Ok(removed)
    }

    pub async fn clear(&self) -> usize {
        let mut session = self.lock_session().await;
        let removed = session.store.clear();
        self.render(&session);
        removed
    }

    pub async fn retry(&self, book_id: &BookId) -> Result<TaskId, TaskError> {
        let mut session = self.lock_session().await;
        let id = session.store.retry(book_id)?;
        self.render(&session);
        Ok(id)
    }

    /// Persisted tasks in insertion order.
    pub async fn tasks(&self) -> Vec<Task> {
        self.lock_session().await.store.list().to_vec()
    }

    pub async fn latest_status(&self) -> ServerStatus {
        self.session.lock().await.latest.clone()
    }

    pub async fn has_unsaved_changes(&self) -> bool {
        self.session.lock().await.store.has_unsaved_changes()
    }

    pub async fn display_view(&self) -> DisplayView {
        let session = self.lock_session().await;
        projection::view(&session.latest, session.store.list())
    }

    /// Re-render without polling.
    pub async fn refresh(&self) {
        let session = self.lock_session().await;
        self.render(&session);
    }

    /// One poll/reconcile/render pass outside any controller run.
    pub async fn tick(&self) -> ReconcileReport {
        let always = AtomicBool::new(true);
        match self.poll_cycle(&always).await {
            TickOutcome::Applied(report) => report,
            TickOutcome::Discarded => ReconcileReport::default(),
        }
    }

    /// `active` is checked after the fetch and before anything is merged.
    ///
    /// The poller stays locked until the snapshot is merged, so concurrent
    /// passes apply their snapshots in fetch order.
    pub(crate) async fn poll_cycle(&self, active: &AtomicBool) -> TickOutcome {
        let mut poller = self.poller.lock().await;
        let status = poller.poll().await;

        if !active.load(Ordering::SeqCst) {
            debug!("poll response arrived after stop, discarded");
            return TickOutcome::Discarded;
        }

        let mut session = self.lock_session().await;
        let report = if poller.is_stale() {
            // results of a stale snapshot were merged when it was fresh
            reconciler::reconcile(&mut session.store, &status.without_results())
        } else {
            reconciler::reconcile(&mut session.store, &status)
        };
        session.latest = status;
        self.render(&session);
        drop(session);
        drop(poller);
        TickOutcome::Applied(report)
    }

    /// Lock the session and pick up tasks written by other processes.
    async fn lock_session(&self) -> MutexGuard<'_, Session> {
        let mut session = self.session.lock().await;
        session.store.reload();
        session
    }

    fn render(&self, session: &Session) {
        let view = projection::view(&session.latest, session.store.list());
        self.renderer.render(&view);
    }
}
