//! EventSink port - イベント記録の抽象化
//!
//! UI 側の協調者はこれを実装して、警告イベントを利用者に見せます。
//! 既定の実装は `TracingEventSink`（ログに出すだけ）です。

use crate::domain::DomainEvent;

/// EventSink はドメインイベントを受け取る
///
/// 呼び出しはタスクストアのロック内から行われるので、ブロックしないこと。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}
