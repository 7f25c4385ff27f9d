//! Persisted task store.
//!
//! `TaskStore` owns the ordered task list for the session. The slot is rewritten
//! in full after every change. Other processes may write the same slot, so
//! callers `reload` before acting on the list. A failed write is reported
//! through the event sink and otherwise ignored; memory then stays
//! authoritative until a write succeeds again.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    BookId, DomainEvent, PersistenceError, Task, TaskError, TaskId, TaskStatus,
};
use crate::ports::{Clock, EventSink, IdGenerator, TaskSlot};

/// Collaborators the store needs besides its slot.
#[derive(Clone)]
pub struct StoreDeps {
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub events: Arc<dyn EventSink>,
}

pub struct TaskStore {
    tasks: Vec<Task>,
    slot: Arc<dyn TaskSlot>,
    deps: StoreDeps,

    /// Set when the last write failed and memory is ahead of the slot.
    unsaved: bool,
}

impl TaskStore {
    /// Open the store, reading whatever the slot holds.
    ///
    /// A missing, unreadable or malformed slot yields an empty list.
    pub fn load(slot: Arc<dyn TaskSlot>, deps: StoreDeps) -> Self {
        let tasks = match read_slot(slot.as_ref()) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "task slot unusable, starting empty");
                Vec::new()
            }
        };
        debug!(tasks = tasks.len(), "task store loaded");
        Self {
            tasks,
            slot,
            deps,
            unsaved: false,
        }
    }

    /// Pick up changes another writer made to the slot.
    ///
    /// Skipped while memory holds unsaved changes. A slot that cannot be read
    /// or decoded leaves memory as is.
    pub fn reload(&mut self) {
        if self.unsaved {
            return;
        }
        match read_slot(self.slot.as_ref()) {
            Ok(tasks) => {
                if tasks != self.tasks {
                    debug!(tasks = tasks.len(), "task slot changed outside this session");
                    self.tasks = tasks;
                }
            }
            Err(e) => warn!(error = %e, "task slot unusable, keeping in-memory list"),
        }
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_pending(&self, book_id: &BookId) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.is_pending() && &t.book_id == book_id)
    }

    /// True while the slot is behind memory because a write failed.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Replace the whole list and persist it.
    pub fn save(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.commit();
    }

    /// Enqueue a book. Rejected if the same book is already pending.
    pub fn add(&mut self, book_id: BookId, book_name: Option<String>) -> Result<TaskId, TaskError> {
        if self.find_pending(&book_id).is_some() {
            self.deps
                .events
                .emit(DomainEvent::DuplicateRejected { book_id: book_id.clone() });
            return Err(TaskError::DuplicateEnqueue { book_id });
        }

        let id = self.deps.ids.generate_task_id();
        let task = Task::new(id, book_id.clone(), book_name, self.deps.clock.now());
        self.tasks.push(task);
        self.deps.events.emit(DomainEvent::TaskAdded { task_id: id, book_id });
        self.commit();
        Ok(id)
    }

    pub fn remove(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TaskError::TaskNotFound(id))?;
        let removed = self.tasks.remove(pos);
        self.deps.events.emit(DomainEvent::TaskRemoved { task_id: id });
        self.commit();
        Ok(removed)
    }

    /// Drop every task. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        self.deps.events.emit(DomainEvent::QueueCleared { removed });
        self.commit();
        removed
    }

    /// Re-arm the most recent finished task of `book_id` as a new pending attempt.
    ///
    /// The old record is replaced in place by a fresh one (new id, new
    /// `added_at`), so timestamps of a record are still only ever set once.
    pub fn retry(&mut self, book_id: &BookId) -> Result<TaskId, TaskError> {
        if self.find_pending(book_id).is_some() {
            self.deps
                .events
                .emit(DomainEvent::DuplicateRejected { book_id: book_id.clone() });
            return Err(TaskError::DuplicateEnqueue {
                book_id: book_id.clone(),
            });
        }

        let pos = self
            .tasks
            .iter()
            .rposition(|t| &t.book_id == book_id && t.status.is_terminal())
            .ok_or_else(|| TaskError::NothingToRetry {
                book_id: book_id.clone(),
            })?;

        let id = self.deps.ids.generate_task_id();
        let next = self.tasks[pos].rearmed(id, self.deps.clock.now());
        let previous = std::mem::replace(&mut self.tasks[pos], next);
        self.deps.events.emit(DomainEvent::TaskRetried {
            previous: previous.id,
            task_id: id,
            book_id: book_id.clone(),
        });
        self.commit();
        Ok(id)
    }

    /// Move the pending task of `book_id` to `status` and persist.
    ///
    /// No-op unless such a pending task exists. That guard is what makes
    /// replaying the same server result harmless.
    pub fn update_status(
        &mut self,
        book_id: &BookId,
        status: TaskStatus,
        message: Option<String>,
    ) -> Option<TaskId> {
        let changed = self.transition_pending(book_id, status, message);
        if changed.is_some() {
            self.commit();
        }
        changed
    }

    /// Same as `update_status` but without writing; callers batch several
    /// transitions and then `commit` once.
    pub fn transition_pending(
        &mut self,
        book_id: &BookId,
        status: TaskStatus,
        message: Option<String>,
    ) -> Option<TaskId> {
        let now = self.deps.clock.now();
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.is_pending() && &t.book_id == book_id)?;
        if !task.resolve(status, message, now) {
            return None;
        }
        let task_id = task.id;
        self.deps.events.emit(DomainEvent::TaskResolved {
            task_id,
            book_id: book_id.clone(),
            status,
        });
        Some(task_id)
    }

    /// Write the whole list to the slot.
    pub fn commit(&mut self) {
        match self.write_all() {
            Ok(()) => self.unsaved = false,
            Err(e) => {
                self.unsaved = true;
                self.deps.events.emit(DomainEvent::PersistenceFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    fn write_all(&self) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(&self.tasks)?;
        self.slot.write(&raw)
    }
}

fn read_slot(slot: &dyn TaskSlot) -> Result<Vec<Task>, PersistenceError> {
    match slot.read()? {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(&raw).map_err(|e| PersistenceError::Decode(e.to_string()))
        }
        _ => Ok(Vec::new()),
    }
}
