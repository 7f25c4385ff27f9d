//! TracingEventSink - イベントを tracing に流す既定の EventSink

use tracing::{debug, info, warn};

use crate::domain::DomainEvent;
use crate::ports::EventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: DomainEvent) {
        match event {
            DomainEvent::TaskAdded { task_id, book_id } => {
                info!(%task_id, %book_id, "task added");
            }
            DomainEvent::DuplicateRejected { book_id } => {
                warn!(%book_id, "book is already queued, ignoring");
            }
            DomainEvent::TaskRemoved { task_id } => {
                info!(%task_id, "task removed");
            }
            DomainEvent::QueueCleared { removed } => {
                info!(removed, "queue cleared");
            }
            DomainEvent::TaskRetried {
                previous,
                task_id,
                book_id,
            } => {
                info!(%previous, %task_id, %book_id, "task re-armed");
            }
            DomainEvent::TaskResolved {
                task_id,
                book_id,
                status,
            } => {
                debug!(%task_id, %book_id, %status, "task resolved");
            }
            DomainEvent::PersistenceFailed { error } => {
                warn!(%error, "task list not saved, keeping in-memory copy");
            }
            DomainEvent::PollFailing { consecutive, error } => {
                warn!(consecutive, %error, "status endpoint keeps failing");
            }
        }
    }
}
