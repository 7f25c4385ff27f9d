//! MemorySlot - メモリ上のスロット（開発用・テスト用）
//!
//! 書き込み失敗を注入できるので、保存失敗時の振る舞いを確認するのに使います。

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::domain::PersistenceError;
use crate::ports::TaskSlot;

#[derive(Debug, Default)]
pub struct MemorySlot {
    contents: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    writes: AtomicUsize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw contents, as if a previous session had written them.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            ..Self::default()
        }
    }

    /// Make every following write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every following read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl TaskSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("read rejected".to_string()));
        }
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("write rejected".to_string()));
        }
        *self.contents.lock().unwrap_or_else(|e| e.into_inner()) = Some(contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
