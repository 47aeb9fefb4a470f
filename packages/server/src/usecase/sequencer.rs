//! 受信イベントの直列化
//!
//! 1 つのイベントは状態の変更から最後のフレームの送信キューへの追加までの間、
//! シーケンサを保持します。クライアントは状態に適用された順にイベントの結果を受け取ります。
//! 猶予期間の判定タスクも同じシーケンサを通ります。

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// 状態を変更・配信するユースケースが共有する順番待ち
#[derive(Debug, Clone, Default)]
pub struct EventSequencer {
    turn: Arc<Mutex<()>>,
}

impl EventSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 順番を待つ。ガードを破棄すると次のイベントに順番が移る
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }
}
