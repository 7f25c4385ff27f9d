//! RecordingEventSink - 発行されたイベントを溜めておく EventSink（テスト用）

use std::sync::Mutex;

use crate::domain::DomainEvent;
use crate::ports::EventSink;

#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn warnings(&self) -> Vec<DomainEvent> {
        self.events()
            .into_iter()
            .filter(DomainEvent::is_warning)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.name() == name).count()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: DomainEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
