//! End-to-end scenarios through TaskManager with scripted status responses.

use std::sync::{Arc, Mutex};

use quire_core::domain::{
    BookId, BookResult, DisplayView, DomainEvent, PollError, ServerStatus, TaskError, TaskStatus,
};
use quire_core::impls::{MemorySlot, RecordingEventSink, ScriptedStatusSource};
use quire_core::ports::Renderer;
use quire_core::{ManagerBuilder, TaskManager};

#[derive(Default)]
struct RecordingRenderer {
    views: Mutex<Vec<DisplayView>>,
}

impl RecordingRenderer {
    fn renders(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    fn last(&self) -> DisplayView {
        self.views.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, view: &DisplayView) {
        self.views.lock().unwrap().push(view.clone());
    }
}

struct Harness {
    manager: Arc<TaskManager>,
    source: Arc<ScriptedStatusSource>,
    slot: Arc<MemorySlot>,
    events: Arc<RecordingEventSink>,
    renderer: Arc<RecordingRenderer>,
}

fn harness() -> Harness {
    let source = Arc::new(ScriptedStatusSource::new());
    let slot = Arc::new(MemorySlot::new());
    let events = Arc::new(RecordingEventSink::new());
    let renderer = Arc::new(RecordingRenderer::default());
    let manager = ManagerBuilder::new()
        .status_source(source.clone())
        .slot(slot.clone())
        .event_sink(events.clone())
        .renderer(renderer.clone())
        .failure_warn_threshold(2)
        .build()
        .unwrap();
    Harness {
        manager: Arc::new(manager),
        source,
        slot,
        events,
        renderer,
    }
}

fn completed(book: &str) -> ServerStatus {
    ServerStatus::idle().with_results(vec![BookResult::success(book)])
}

#[tokio::test]
async fn enqueue_download_complete_walkthrough() {
    let h = harness();
    h.manager.add("111".into(), Some("Dune".into())).await.unwrap();

    // idle worker, nothing reported
    h.source.push_ok(ServerStatus::idle());
    h.manager.tick().await;
    let view = h.manager.display_view().await;
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.counts.pending, 1);

    // in flight: ephemeral row at 42 plus the still-pending record
    h.source.push_ok(ServerStatus::downloading("111", 42));
    h.manager.tick().await;
    let view = h.manager.display_view().await;
    assert_eq!(view.items.len(), 2);
    assert!(view.items[0].is_current());
    assert_eq!(view.items[0].progress, Some(42));
    assert_eq!(view.items[1].status, TaskStatus::Pending);

    // finished
    h.source.push_ok(completed("111"));
    h.manager.tick().await;
    // replayed
    h.source.push_ok(completed("111"));
    let replay = h.manager.tick().await;

    assert!(!replay.changed());
    let tasks = h.manager.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    let view = h.manager.display_view().await;
    assert_eq!(view.counts.completed, 1);
    assert_eq!(view.counts.total, 1);
    assert_eq!(h.events.count("task_resolved"), 1);
}

#[tokio::test]
async fn duplicate_enqueue_keeps_single_task_and_warns() {
    let h = harness();
    h.manager.add("111".into(), None).await.unwrap();

    let err = h.manager.add("111".into(), None).await.unwrap_err();

    assert_eq!(err, TaskError::DuplicateEnqueue { book_id: BookId::from("111") });
    assert_eq!(h.manager.tasks().await.len(), 1);
    assert!(h
        .events
        .warnings()
        .iter()
        .any(|e| matches!(e, DomainEvent::DuplicateRejected { .. })));
}

#[tokio::test]
async fn clear_during_in_flight_poll_does_not_resurrect() {
    let h = harness();
    h.manager.add("111".into(), None).await.unwrap();
    h.source.push_ok(completed("111"));
    h.source.pause();

    let tick = tokio::spawn({
        let manager = h.manager.clone();
        async move { manager.tick().await }
    });
    while h.source.fetch_count() == 0 {
        tokio::task::yield_now().await;
    }

    assert_eq!(h.manager.clear().await, 1);
    h.source.resume();
    let report = tick.await.unwrap();

    assert!(!report.changed());
    assert_eq!(report.ignored, 1);
    assert!(h.manager.tasks().await.is_empty());
    assert!(h.manager.display_view().await.items.is_empty());
}

#[tokio::test]
async fn failed_poll_keeps_last_snapshot() {
    let h = harness();
    h.manager.add("111".into(), None).await.unwrap();
    h.source.push_ok(ServerStatus::downloading("111", 10));
    h.source.push_err(PollError::Http { status: 502 });
    h.source.push_err(PollError::Transport("reset".into()));

    h.manager.tick().await;
    h.manager.tick().await;
    h.manager.tick().await;

    let view = h.manager.display_view().await;
    assert!(view.items[0].is_current());
    assert_eq!(view.items[0].progress, Some(10));
    assert_eq!(h.events.count("poll_failing"), 1);
}

#[tokio::test]
async fn failed_poll_does_not_replay_results_onto_a_retried_book() {
    let h = harness();
    h.manager.add("111".into(), None).await.unwrap();
    h.source
        .push_ok(ServerStatus::idle().with_results(vec![BookResult::failure("111", "timeout")]));
    h.manager.tick().await;

    h.manager.retry(&BookId::from("111")).await.unwrap();
    h.source.push_err(PollError::Transport("reset".into()));
    let report = h.manager.tick().await;

    assert!(!report.changed());
    assert_eq!(h.manager.tasks().await[0].status, TaskStatus::Pending);
}

#[tokio::test]
async fn overlapping_ticks_apply_snapshots_in_fetch_order() {
    let h = harness();
    h.source.push_ok(ServerStatus::downloading("111", 10));
    h.source.push_ok(ServerStatus::downloading("111", 20));
    h.source.pause();

    let first = tokio::spawn({
        let manager = h.manager.clone();
        async move { manager.tick().await }
    });
    while h.source.fetch_count() == 0 {
        tokio::task::yield_now().await;
    }
    let second = tokio::spawn({
        let manager = h.manager.clone();
        async move { manager.tick().await }
    });
    tokio::task::yield_now().await;

    h.source.resume();
    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(h.source.fetch_count(), 2);
    assert_eq!(h.manager.latest_status().await.progress, 20);
}

#[tokio::test]
async fn persistence_failure_is_not_fatal() {
    let h = harness();
    h.slot.set_fail_writes(true);

    h.manager.add("111".into(), None).await.unwrap();
    h.source.push_ok(completed("111"));
    h.manager.tick().await;

    let tasks = h.manager.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert!(h.manager.has_unsaved_changes().await);
    assert_eq!(h.events.count("persistence_failed"), 2);
    assert!(h.slot.contents().is_none());
}

#[tokio::test]
async fn retry_rearms_a_failed_task_for_the_next_result() {
    let h = harness();
    let first = h.manager.add("111".into(), None).await.unwrap();
    h.source
        .push_ok(ServerStatus::idle().with_results(vec![BookResult::failure("111", "timeout")]));
    h.manager.tick().await;

    let second = h.manager.retry(&BookId::from("111")).await.unwrap();
    h.source.push_ok(completed("111"));
    h.manager.tick().await;

    assert_ne!(first, second);
    let tasks = h.manager.tasks().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, second);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
}

#[tokio::test]
async fn every_boundary_mutation_renders() {
    let h = harness();

    let id = h.manager.add("1".into(), None).await.unwrap();
    h.manager.add("2".into(), None).await.unwrap();
    h.manager.remove(id).await.unwrap();
    h.manager.clear().await;
    h.manager.tick().await;

    assert_eq!(h.renderer.renders(), 5);
    assert_eq!(h.renderer.last(), DisplayView::default());
}

#[tokio::test]
async fn removing_unknown_task_is_rejected_without_render() {
    let h = harness();
    let id = h.manager.add("1".into(), None).await.unwrap();
    h.manager.remove(id).await.unwrap();
    let renders = h.renderer.renders();

    assert_eq!(h.manager.remove(id).await.unwrap_err(), TaskError::TaskNotFound(id));
    assert_eq!(h.renderer.renders(), renders);
}
