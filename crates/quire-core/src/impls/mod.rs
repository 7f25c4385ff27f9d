//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **FileSlot**: JSON ファイルのスロット（本番用）
//! - **HttpStatusSource**: reqwest による取得（本番用）
//! - **TracingEventSink**: イベントをログに出す（既定）
//! - **MemorySlot / ScriptedStatusSource / RecordingEventSink**: 開発用・テスト用

pub mod file_slot;
pub mod http_status;
pub mod memory_slot;
pub mod recording_sink;
pub mod scripted_status;
pub mod tracing_sink;

pub use self::file_slot::FileSlot;
pub use self::http_status::HttpStatusSource;
pub use self::memory_slot::MemorySlot;
pub use self::recording_sink::RecordingEventSink;
pub use self::scripted_status::ScriptedStatusSource;
pub use self::tracing_sink::TracingEventSink;
