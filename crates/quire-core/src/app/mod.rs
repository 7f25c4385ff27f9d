//! App - アプリケーション層
//!
//! このモジュールは、ports とストアを組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **ManagerBuilder**: TaskManager の構築とワイヤリング
//! - **TaskManager**: 登録境界と表示境界
//! - **StatusPoller**: ステータス取得（失敗時は前回値）
//! - **reconcile**: サーバーの結果をタスクストアへマージ
//! - **projection**: 表示用シーケンスの構築
//! - **PollingController**: ポーリングタイマーとフォアグラウンド検知

pub mod builder;
pub mod lifecycle;
pub mod manager;
pub mod poller;
pub mod projection;
pub mod reconciler;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, ManagerBuilder};
pub use self::lifecycle::{DEFAULT_POLL_INTERVAL, PollingController, Visibility};
pub use self::manager::{TaskManager, TickOutcome};
pub use self::poller::StatusPoller;
pub use self::reconciler::{AppliedTransition, ReconcileReport, reconcile};
