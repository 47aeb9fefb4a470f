//! UseCase: ルーム切替処理

use std::sync::Arc;

use crate::domain::{
    ChatRepository, ConnectionId, MessagePusher, Notification, RoomName, RoomSwitch,
};

use super::{EventSequencer, SwitchRoomError};

/// ルーム切替のユースケース
pub struct SwitchRoomUseCase {
    repository: Arc<dyn ChatRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: EventSequencer,
}

impl SwitchRoomUseCase {
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

    /// セッションを `room` に移し、そのルームの履歴を送る
    ///
    /// 同じセッションの接続はすべて一緒に移動し、それぞれに履歴が届きます。
    /// 現在のルームと同じ名前を指定した場合は呼び出した接続への履歴の再送のみ行います。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: RoomName,
    ) -> Result<RoomSwitch, SwitchRoomError> {
        let _turn = self.sequencer.enter().await;
        let switch = self.repository.switch_room(connection_id, room).await?;

        let history = Notification::History(switch.history.clone());
        let readers = if switch.changed() {
            switch.moved.clone()
        } else {
            vec![connection_id.clone()]
        };
        for reader in &readers {
            if let Err(e) = self.message_pusher.push_to(reader, &history).await {
                tracing::warn!("Failed to send history to '{}': {}", reader, e);
            }
        }

        if switch.changed() {
            tracing::info!(
                "'{}' moved from '{}' to '{}'",
                switch.session.display_name,
                switch.previous_room,
                switch.session.room
            );
            let joined = Notification::UserJoined(switch.session.display_name.clone());
            if let Err(e) = self
                .message_pusher
                .broadcast(switch.room_peers.clone(), &joined)
                .await
            {
                tracing::warn!("Failed to broadcast user-joined: {}", e);
            }
        }

        Ok(switch)
    }
}
