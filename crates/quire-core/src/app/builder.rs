//! ManagerBuilder - TaskManager の構築とワイヤリング
//!
//! # 方針
//! - 起動時検証（Fail-fast）: StatusSource がなければ build() でエラー
//! - それ以外の協調者には既定値がある（MemorySlot / SystemClock / TracingEventSink / NoopRenderer）

use std::sync::Arc;

use crate::config::QuireConfig;
use crate::domain::PollError;
use crate::impls::{FileSlot, HttpStatusSource, MemorySlot, TracingEventSink};
use crate::ports::{
    Clock, EventSink, IdGenerator, NoopRenderer, Renderer, StatusSource, SystemClock, TaskSlot,
    UlidGenerator,
};
use crate::store::{StoreDeps, TaskStore};

use super::manager::TaskManager;
use super::poller::{DEFAULT_FAILURE_WARN_THRESHOLD, StatusPoller};

/// BuildError は TaskManager 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no status source configured; call status_source() before build()")]
    MissingStatusSource,

    #[error("status source could not be created: {0}")]
    StatusSource(#[from] PollError),
}

/// # 使用例
/// ```ignore
/// let manager = ManagerBuilder::new()
///     .status_source(Arc::new(source))
///     .slot(Arc::new(FileSlot::new(path)))
///     .build()?;
/// ```
pub struct ManagerBuilder {
    source: Option<Arc<dyn StatusSource>>,
    slot: Option<Arc<dyn TaskSlot>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    events: Option<Arc<dyn EventSink>>,
    renderer: Option<Arc<dyn Renderer>>,
    failure_warn_threshold: u32,
}

impl ManagerBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            slot: None,
            clock: None,
            ids: None,
            events: None,
            renderer: None,
            failure_warn_threshold: DEFAULT_FAILURE_WARN_THRESHOLD,
        }
    }

    /// HTTP source and file slot taken from `config`.
    pub fn from_config(config: &QuireConfig) -> Result<Self, BuildError> {
        let source = HttpStatusSource::new(config.status_url.clone(), config.request_timeout())?;
        Ok(Self::new()
            .status_source(Arc::new(source))
            .slot(Arc::new(FileSlot::new(config.store_path.clone())))
            .failure_warn_threshold(config.failure_warn_threshold))
    }

    pub fn status_source(mut self, source: Arc<dyn StatusSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn slot(mut self, slot: Arc<dyn TaskSlot>) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn failure_warn_threshold(mut self, threshold: u32) -> Self {
        self.failure_warn_threshold = threshold;
        self
    }

    /// Wire everything and load the persisted task list.
    pub fn build(self) -> Result<TaskManager, BuildError> {
        let source = self.source.ok_or(BuildError::MissingStatusSource)?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));
        let events: Arc<dyn EventSink> = self.events.unwrap_or_else(|| Arc::new(TracingEventSink));
        let slot = self.slot.unwrap_or_else(|| Arc::new(MemorySlot::new()));
        let renderer = self.renderer.unwrap_or_else(|| Arc::new(NoopRenderer));

        let store = TaskStore::load(
            slot,
            StoreDeps {
                clock,
                ids,
                events: Arc::clone(&events),
            },
        );
        let poller = StatusPoller::new(source, events).with_warn_threshold(self.failure_warn_threshold);

        Ok(TaskManager::new(store, poller, renderer))
    }
}

impl Default for ManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::ScriptedStatusSource;

    #[test]
    fn build_without_status_source_fails() {
        let result = ManagerBuilder::new().build();
        assert!(matches!(result, Err(BuildError::MissingStatusSource)));
    }

    #[tokio::test]
    async fn build_loads_existing_tasks() {
        let slot = Arc::new(MemorySlot::with_contents(
            r#"[{"id":"01HZY0J3W5D3X9YQ0M5Q8V2K7R","bookId":"111","status":"pending","addedAt":"2024-01-01T00:00:00Z"}]"#,
        ));
        let manager = ManagerBuilder::new()
            .status_source(Arc::new(ScriptedStatusSource::new()))
            .slot(slot)
            .build()
            .unwrap();

        let tasks = manager.tasks().await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].book_id.as_str(), "111");
    }

    #[test]
    fn from_config_uses_http_source_and_file_slot() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuireConfig {
            store_path: dir.path().join("tasks.json"),
            ..QuireConfig::default()
        };

        assert!(ManagerBuilder::from_config(&config).unwrap().build().is_ok());
    }
}
