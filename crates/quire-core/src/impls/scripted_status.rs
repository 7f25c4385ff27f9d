//! ScriptedStatusSource - 応答を順番に返す StatusSource（開発用・テスト用）
//!
//! `pause()` 中の fetch は `resume()` まで戻りません。
//! 「取得中に clear/stop された」状況を作るのに使います。

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{PollError, ServerStatus};
use crate::ports::StatusSource;

pub struct ScriptedStatusSource {
    script: Mutex<VecDeque<Result<ServerStatus, PollError>>>,
    fallback: ServerStatus,
    paused: watch::Sender<bool>,
    started: AtomicUsize,
}

impl ScriptedStatusSource {
    pub fn new() -> Self {
        Self::with_fallback(ServerStatus::idle())
    }

    /// Response used once the script runs out.
    pub fn with_fallback(fallback: ServerStatus) -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            paused,
            started: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, response: Result<ServerStatus, PollError>) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    pub fn push_ok(&self, status: ServerStatus) {
        self.push(Ok(status));
    }

    pub fn push_err(&self, error: PollError) {
        self.push(Err(error));
    }

    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Number of fetches started so far (including paused ones).
    pub fn fetch_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn fetch(&self) -> Result<ServerStatus, PollError> {
        self.started.fetch_add(1, Ordering::SeqCst);

        let mut paused = self.paused.subscribe();
        while *paused.borrow_and_update() {
            if paused.changed().await.is_err() {
                break;
            }
        }

        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let source = ScriptedStatusSource::new();
        source.push_ok(ServerStatus::downloading("111", 10));
        source.push_err(PollError::Http { status: 500 });

        assert_eq!(
            source.fetch().await.unwrap(),
            ServerStatus::downloading("111", 10)
        );
        assert!(source.fetch().await.is_err());
        assert_eq!(source.fetch().await.unwrap(), ServerStatus::idle());
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn paused_fetch_waits_for_resume() {
        let source = std::sync::Arc::new(ScriptedStatusSource::new());
        source.pause();

        let handle = tokio::spawn({
            let source = source.clone();
            async move { source.fetch().await }
        });

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        source.resume();
        assert!(handle.await.unwrap().is_ok());
    }
}
