//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait はローカルの保存先・リモートのステータスエンドポイント・
//! 描画側の協調者へのインターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ローカルのタスク一覧は利用者の「意図」の正本
//! - リモートのステータスは「実行結果」の正本
//! - 結果は一方向（リモート → ローカル）にだけ流れる

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod renderer;
pub mod status_source;
pub mod task_slot;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::renderer::{NoopRenderer, Renderer};
pub use self::status_source::StatusSource;
pub use self::task_slot::TaskSlot;
