//! quire-core
//!
//! Core of the quire download-job manager: the task reconciliation engine.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, status, display, errors, events）
//! - **ports**: 抽象化レイヤー（TaskSlot, StatusSource, EventSink, Renderer, Clock, IdGenerator）
//! - **impls**: 実装（FileSlot, HttpStatusSource と開発用のインメモリ実装）
//! - **store**: 永続タスクストア
//! - **app**: アプリケーションロジック（builder, manager, poller, reconciler, projection, lifecycle）
//! - **config**: TOML 設定
//!
//! ローカルのタスク一覧は利用者の意図、リモートのステータスは実行結果の正本です。
//! 結果はリモートからローカルへ一方向にだけ流れ、pending ガードで冪等になります。

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod store;

pub use self::app::{ManagerBuilder, PollingController, TaskManager, Visibility};
pub use self::config::QuireConfig;
