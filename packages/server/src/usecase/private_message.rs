//! UseCase: プライベートメッセージ処理
//!
//! 宛先の接続 1 つだけに配信します。履歴には残しません。

use std::sync::Arc;

use crate::domain::{ChatRepository, ConnectionId, MessageContent, MessagePusher, Notification};

use super::{EventSequencer, PrivateMessageError};

/// プライベートメッセージのユースケース
pub struct PrivateMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: EventSequencer,
}

impl PrivateMessageUseCase {
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

    /// `target` の接続にメッセージを届ける
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        target: &ConnectionId,
        content: MessageContent,
    ) -> Result<(), PrivateMessageError> {
        let _turn = self.sequencer.enter().await;
        let sender = self
            .repository
            .lookup(connection_id)
            .await
            .ok_or_else(|| PrivateMessageError::UnknownSender(connection_id.to_string()))?;
        if target == connection_id {
            return Err(PrivateMessageError::SelfTarget);
        }

        let notification = Notification::PrivateReceive {
            payload: content,
            sender_name: sender.display_name,
            sender_connection_id: connection_id.clone(),
        };
        self.message_pusher
            .push_to(target, &notification)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to deliver private message to '{}': {}", target, e);
                PrivateMessageError::UnknownTarget(target.to_string())
            })?;

        tracing::debug!("Private message from '{}' to '{}'", connection_id, target);
        Ok(())
    }
}
