//! UseCase: ソケット接続処理
//!
//! 新しい WebSocket 接続に接続 ID を割り当て、送信チャンネルを登録します。
//! セッションの作成は `join` イベントまで行いません。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionIdFactory, MessagePusher, Notification, PusherChannel,
};

use super::EventSequencer;

/// ソケット接続のユースケース
pub struct ConnectUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: EventSequencer,
}

impl ConnectUseCase {
    /// 新しい ConnectUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, sequencer: EventSequencer) -> Self {
        Self {
            message_pusher,
            sequencer,
        }
    }

    /// 接続 ID を発行し、送信チャンネルを登録して `connected` を通知する
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let _turn = self.sequencer.enter().await;
        let connection_id = ConnectionIdFactory::generate();
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let connected = Notification::Connected {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &connected).await {
            tracing::warn!("Failed to send connected to '{}': {}", connection_id, e);
        }

        connection_id
    }
}
