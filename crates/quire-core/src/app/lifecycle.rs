//! PollingController - ポーリングのライフサイクル
//!
//! `stopped → running`（start）、`running → stopped`（stop）。
//! 実行中は一定間隔で poll → reconcile → render を回します。
//!
//! - 実行中の start は何もしない（タイマーは常に 1 本）
//! - Foreground への遷移で 1 回余分に回す
//! - Background でも止めない
//! - stop は進行中の fetch を中断しない。ただしその応答は捨てる

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::manager::TaskManager;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Host visibility signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Foreground,
    Background,
}

/// One running timer.
/// - `shutdown_tx` を drop するとループが止まる
/// - `active` は stop 時に false になり、進行中の応答を無効にする
struct Run {
    shutdown_tx: watch::Sender<bool>,
    active: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

pub struct PollingController {
    manager: Arc<TaskManager>,
    interval: Duration,
    run: Option<Run>,
}

impl PollingController {
    pub fn new(manager: Arc<TaskManager>, interval: Duration) -> Self {
        Self {
            manager,
            interval,
            run: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking. Returns false if already running.
    ///
    /// The first tick fires immediately.
    pub fn start(&mut self, visibility: watch::Receiver<Visibility>) -> bool {
        if self.run.is_some() {
            debug!("polling already running, start ignored");
            return false;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let active = Arc::new(AtomicBool::new(true));
        let join = tokio::spawn(polling_loop(
            Arc::clone(&self.manager),
            self.interval,
            Arc::clone(&active),
            shutdown_rx,
            visibility,
        ));

        info!(interval_ms = self.interval.as_millis() as u64, "polling started");
        self.run = Some(Run {
            shutdown_tx,
            active,
            join,
        });
        true
    }

    /// Stop ticking. Returns false if not running.
    ///
    /// An in-flight fetch is left to finish; its response is discarded.
    pub fn stop(&mut self) -> bool {
        let Some(run) = self.run.take() else {
            return false;
        };
        run.active.store(false, Ordering::SeqCst);
        // ignore send error: the loop may already be gone
        let _ = run.shutdown_tx.send(true);
        info!("polling stopped");
        true
    }

    /// Stop and wait for the loop (including any in-flight fetch) to finish.
    pub async fn stop_and_join(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        run.active.store(false, Ordering::SeqCst);
        let _ = run.shutdown_tx.send(true);
        let _ = run.join.await;
        info!("polling stopped");
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn polling_loop(
    manager: Arc<TaskManager>,
    period: Duration,
    active: Arc<AtomicBool>,
    mut shutdown_rx: watch::Receiver<bool>,
    mut visibility: watch::Receiver<Visibility>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // 開始時点の値は「遷移」ではない
    let _ = visibility.borrow_and_update();
    let mut watching = true;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            changed = visibility.changed(), if watching => {
                if changed.is_err() {
                    debug!("visibility source dropped, ticking on");
                    watching = false;
                    continue;
                }
                if *visibility.borrow_and_update() != Visibility::Foreground {
                    continue;
                }
                debug!("foregrounded, extra poll");
            }
            _ = ticker.tick() => {}
        }

        manager.poll_cycle(&active).await;
    }
}
