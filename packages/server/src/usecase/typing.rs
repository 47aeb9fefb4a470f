//! UseCase: 入力中通知

use std::sync::Arc;

use crate::domain::{ChatRepository, ConnectionId, MessagePusher, Notification};

use super::{EventSequencer, TypingError};

/// 入力中通知のユースケース
pub struct TypingUseCase {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: EventSequencer,
}

impl TypingUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: EventSequencer,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// 送信者の現在のルームの他メンバーに、登録済みの表示名で通知する
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, TypingError> {
        let _turn = self.sequencer.enter().await;
        let (session, peers) = self.repository.room_peers(connection_id).await?;
        if peers.is_empty() {
            return Ok(peers);
        }

        let notification = Notification::TypingIndicator(session.display_name);
        if let Err(e) = self
            .message_pusher
            .broadcast(peers.clone(), &notification)
            .await
        {
            tracing::warn!("Failed to broadcast typing indicator: {}", e);
        }
        Ok(peers)
    }
}
