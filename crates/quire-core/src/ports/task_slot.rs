//! TaskSlot port - タスク一覧を保存する名前付きスロット
//!
//! スロットはシリアライズ済みの文字列をそのまま出し入れするだけです。
//! エンコード・デコードや「壊れていたら空として扱う」判断はタスクストア側で行います。

use crate::domain::PersistenceError;

/// TaskSlot はタスク一覧の永続化先
///
/// # 設計原則
/// - 書き込みは常に一覧全体の置き換え（部分更新はしない）
/// - `read` が `Ok(None)` を返すのは「まだ一度も書かれていない」場合
pub trait TaskSlot: Send + Sync {
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    fn write(&self, contents: &str) -> Result<(), PersistenceError>;
}
