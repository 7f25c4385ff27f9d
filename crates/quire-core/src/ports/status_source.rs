//! StatusSource port - リモートのステータスエンドポイント
//!
//! # 実装
//! - **HttpStatusSource**: reqwest による HTTP 実装（本番用）
//! - テストではスクリプト化された実装を使う

use async_trait::async_trait;

use crate::domain::{PollError, ServerStatus};

/// StatusSource は 1 回分のステータス取得を行う
///
/// 失敗時の「前回値を使い続ける」判断は StatusPoller 側の責務です。
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<ServerStatus, PollError>;
}
