//! UseCase: 公開メッセージ・ファイル送信処理
//!
//! メッセージはルームの履歴に追加され、送信者以外のルームメンバーに配信されます。
//! ファイルは履歴に `[file] <ファイル名>` のマーカーだけを残し、
//! ファイル本体は配信時にのみ中継します。

use std::sync::Arc;

use crate::domain::{
    ChatRepository, ConnectionId, FileBlob, MessageBody, MessageContent, MessagePusher,
    Notification, RoomName, RoutedMessage,
};

use super::{EventSequencer, SendMessageError};

/// 公開メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: EventSequencer,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// テキストメッセージを送信
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID
    /// * `content` - メッセージ内容
    /// * `room` - 宛先ルーム（省略時は送信者の現在のルーム）
    ///
    /// # Returns
    ///
    /// * `Ok(RoutedMessage)` - 履歴に追加したルームと配信先
    /// * `Err(SendMessageError)` - 送信者が未登録
    pub async fn send_text(
        &self,
        connection_id: &ConnectionId,
        content: MessageContent,
        room: Option<RoomName>,
    ) -> Result<RoutedMessage, SendMessageError> {
        let _turn = self.sequencer.enter().await;
        let routed = self
            .repository
            .record_message(connection_id, room, MessageBody::Text(content.clone()))
            .await?;

        let notification = Notification::Receive {
            payload: content,
            sender_name: routed.sender.display_name.clone(),
        };
        self.deliver(&routed, &notification).await;
        Ok(routed)
    }

    /// ファイルを送信
    pub async fn send_file(
        &self,
        connection_id: &ConnectionId,
        file: FileBlob,
        room: Option<RoomName>,
    ) -> Result<RoutedMessage, SendMessageError> {
        let _turn = self.sequencer.enter().await;
        let routed = self
            .repository
            .record_message(connection_id, room, MessageBody::File(file.file_name.clone()))
            .await?;

        let notification = Notification::File {
            file,
            sender_name: routed.sender.display_name.clone(),
        };
        self.deliver(&routed, &notification).await;
        Ok(routed)
    }

    async fn deliver(&self, routed: &RoutedMessage, notification: &Notification) {
        tracing::debug!(
            "Relaying message from '{}' to {} member(s) of '{}'",
            routed.sender.display_name,
            routed.recipients.len(),
            routed.room
        );
        if routed.recipients.is_empty() {
            return;
        }
        if let Err(e) = self
            .message_pusher
            .broadcast(routed.recipients.clone(), notification)
            .await
        {
            tracing::warn!("Failed to broadcast message: {}", e);
        }
    }
}
