//! StatusPoller - ステータスの取得と前回値の保持
//!
//! 取得に失敗しても前回の `ServerStatus` をそのまま返します（stale-tolerant）。
//! 連続失敗がしきい値に達したら `PollFailing` を発行します。
//! タスクストアには一切触れません。

use std::sync::Arc;

use tracing::debug;

use crate::domain::{DomainEvent, ServerStatus};
use crate::ports::{EventSink, StatusSource};

pub const DEFAULT_FAILURE_WARN_THRESHOLD: u32 = 5;

pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    events: Arc<dyn EventSink>,
    last: ServerStatus,
    consecutive_failures: u32,
    warn_threshold: u32,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn StatusSource>, events: Arc<dyn EventSink>) -> Self {
        Self {
            source,
            events,
            last: ServerStatus::idle(),
            consecutive_failures: 0,
            warn_threshold: DEFAULT_FAILURE_WARN_THRESHOLD,
        }
    }

    /// 0 is treated as 1: every failure warns.
    pub fn with_warn_threshold(mut self, threshold: u32) -> Self {
        self.warn_threshold = threshold.max(1);
        self
    }

    /// One fetch. Returns the fresh snapshot, or the previous one on failure.
    pub async fn poll(&mut self) -> ServerStatus {
        match self.source.fetch().await {
            Ok(status) => {
                if self.consecutive_failures > 0 {
                    debug!(after = self.consecutive_failures, "status endpoint recovered");
                }
                self.consecutive_failures = 0;
                self.last = status;
                self.last.clone()
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures >= self.warn_threshold {
                    self.events.emit(DomainEvent::PollFailing {
                        consecutive: self.consecutive_failures,
                        error: e.to_string(),
                    });
                } else {
                    debug!(consecutive = self.consecutive_failures, error = %e, "status poll failed, keeping last snapshot");
                }
                self.last.clone()
            }
        }
    }

    pub fn last(&self) -> &ServerStatus {
        &self.last
    }

    /// True when the last `poll` fell back to the previous snapshot.
    pub fn is_stale(&self) -> bool {
        self.consecutive_failures > 0
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookResult, PollError};
    use crate::impls::{RecordingEventSink, ScriptedStatusSource};
    use rstest::rstest;

    fn poller(source: Arc<ScriptedStatusSource>, threshold: u32) -> (StatusPoller, Arc<RecordingEventSink>) {
        let events = Arc::new(RecordingEventSink::new());
        let poller = StatusPoller::new(source, events.clone()).with_warn_threshold(threshold);
        (poller, events)
    }

    #[tokio::test]
    async fn starts_idle() {
        let (p, _) = poller(Arc::new(ScriptedStatusSource::new()), 3);
        assert_eq!(p.last(), &ServerStatus::idle());
    }

    #[rstest]
    #[case::transport(PollError::Transport("connection refused".into()))]
    #[case::http(PollError::Http { status: 503 })]
    #[case::malformed(PollError::Malformed("expected value".into()))]
    #[tokio::test]
    async fn failure_returns_previous_snapshot(#[case] error: PollError) {
        let source = Arc::new(ScriptedStatusSource::new());
        let good = ServerStatus::downloading("111", 42)
            .with_results(vec![BookResult::success("7")]);
        source.push_ok(good.clone());
        source.push_err(error);
        let (mut p, _) = poller(source, 3);

        assert_eq!(p.poll().await, good);
        assert!(!p.is_stale());
        assert_eq!(p.poll().await, good);
        assert!(p.is_stale());
        assert_eq!(p.consecutive_failures(), 1);
    }

    #[tokio::test]
    async fn warns_once_threshold_is_reached_and_resets_on_success() {
        let source = Arc::new(ScriptedStatusSource::new());
        for _ in 0..3 {
            source.push_err(PollError::Http { status: 500 });
        }
        let (mut p, events) = poller(source, 2);

        p.poll().await;
        assert_eq!(events.count("poll_failing"), 0);
        p.poll().await;
        p.poll().await;
        assert_eq!(events.count("poll_failing"), 2);

        p.poll().await;
        assert_eq!(p.consecutive_failures(), 0);
    }
}
