//! Renderer port - 表示の協調者
//!
//! 描画そのものは範囲外です。マネージャは変更のたびに最新の
//! `DisplayView` を渡すだけです。

use crate::domain::DisplayView;

pub trait Renderer: Send + Sync {
    fn render(&self, view: &DisplayView);
}

/// 何もしない Renderer（ヘッドレス実行・テスト用）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&self, _view: &DisplayView) {}
}
