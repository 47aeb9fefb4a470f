//! UseCase: ルーム参加処理
//!
//! `join` イベントでセッションを登録します。同じ clientId のセッションが
//! 残っていれば新しい接続をそのセッションに紐付け直します（再接続）。

use std::sync::Arc;

use crate::domain::{
    ChatRepository, ConnectionId, DisplayName, MessagePusher, Notification, Registration,
    StableClientId,
};

use super::{DirectoryBroadcaster, EventSequencer, JoinError};

/// ルーム参加のユースケース
pub struct JoinUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    directory: Arc<DirectoryBroadcaster>,
    sequencer: EventSequencer,
}

impl JoinUseCase {
    /// 新しい JoinUseCase を作成
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        directory: Arc<DirectoryBroadcaster>,
        sequencer: EventSequencer,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            directory,
            sequencer,
        }
    }

    /// ルーム参加を実行
    ///
    /// 参加者には所属ルームの履歴を送り、新規セッションの場合のみ
    /// ルームの他メンバーに `user-joined` を通知します。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
        client_id: Option<StableClientId>,
    ) -> Result<Registration, JoinError> {
        let _turn = self.sequencer.enter().await;
        let registration = self
            .repository
            .register_or_reconnect(connection_id.clone(), name, client_id)
            .await?;

        let session = &registration.session;
        if registration.is_new {
            tracing::info!(
                "'{}' joined room '{}' ({})",
                session.display_name,
                session.room,
                connection_id
            );
        } else {
            tracing::info!(
                "'{}' reconnected to room '{}' ({}, session {})",
                session.display_name,
                session.room,
                connection_id,
                session.key.as_str()
            );
        }

        let history = Notification::History(registration.history.clone());
        if let Err(e) = self.message_pusher.push_to(&connection_id, &history).await {
            tracing::warn!("Failed to send history to '{}': {}", connection_id, e);
        }

        if registration.is_new && !registration.room_peers.is_empty() {
            let joined = Notification::UserJoined(session.display_name.clone());
            if let Err(e) = self
                .message_pusher
                .broadcast(registration.room_peers.clone(), &joined)
                .await
            {
                tracing::warn!("Failed to broadcast user-joined: {}", e);
            }
        }

        self.directory.refresh().await;

        Ok(registration)
    }
}
