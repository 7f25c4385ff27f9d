//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use std::sync::Arc;

use crate::domain::ids::TaskId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator はタスク ID を生成
///
/// 生成した ID は二度と使いません（削除済みタスクの ID も再利用しない）。
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
pub struct UlidGenerator {
    clock: Arc<dyn Clock>,
}

impl UlidGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl IdGenerator for UlidGenerator {
    fn generate_task_id(&self) -> TaskId {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        TaskId::from(ulid)
    }
}
