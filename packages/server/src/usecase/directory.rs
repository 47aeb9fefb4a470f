//! UseCase: オンラインユーザー一覧の配信
//!
//! セッションごとに 1 件（clientId があれば clientId 単位、なければ接続単位）の
//! 一覧を作り、接続中の全クライアントに配信します。

use std::sync::Arc;

use crate::domain::{ChatRepository, DirectoryEntry, MessagePusher, Notification};

/// Directory Broadcaster
pub struct DirectoryBroadcaster {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DirectoryBroadcaster {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 現在の一覧を取得（配信はしない）
    pub async fn snapshot(&self) -> Vec<DirectoryEntry> {
        self.repository.directory().await
    }

    /// 一覧を再計算して全クライアントに配信
    ///
    /// 呼び出し側が `EventSequencer` の順番を保持している必要があります。
    pub async fn refresh(&self) -> Vec<DirectoryEntry> {
        let entries = self.repository.directory().await;
        let notification = Notification::Directory(entries.clone());
        if let Err(e) = self.message_pusher.broadcast_all(&notification).await {
            tracing::warn!("Failed to broadcast directory: {}", e);
        } else {
            tracing::debug!("Broadcasted directory with {} entries", entries.len());
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatState, DisplayName, MockMessagePusher, StableClientId},
        infrastructure::{
            dto::websocket::{DirectoryEntryDto, ServerEvent},
            repository::InMemoryChatRepository,
        },
        usecase::test_support::{TestHarness, conn, drain},
    };
    use hiroba_shared::time::FixedClock;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn test_refresh_reaches_clients_that_have_not_joined() {
        // テスト項目: join 前の接続にも一覧が配信される
        // given (前提条件):
        let harness = TestHarness::new();
        let (_lurker, mut lurker_rx) = harness.open("lurker").await;
        harness
            .repository
            .register_or_reconnect(
                conn("a1"),
                DisplayName::new("Alice".to_string()).unwrap(),
                None,
            )
            .await
            .unwrap();

        // when (操作):
        let entries = harness.directory.refresh().await;

        // then (期待する結果):
        assert_eq!(entries.len(), 1);
        assert_eq!(
            drain(&mut lurker_rx),
            vec![ServerEvent::Directory(vec![DirectoryEntryDto {
                id: "a1".to_string(),
                name: "Alice".to_string(),
            }])]
        );
    }

    #[tokio::test]
    async fn test_refresh_deduplicates_by_client_id() {
        // テスト項目: 同じ clientId の複数接続は 1 件として配信される
        // given (前提条件):
        let repository = Arc::new(InMemoryChatRepository::new(
            Arc::new(Mutex::new(ChatState::new())),
            Arc::new(FixedClock::new(0)),
        ));
        let bob = DisplayName::new("Bob".to_string()).unwrap();
        let client_id = Some(StableClientId::new("device-b".to_string()).unwrap());
        for id in ["b1", "b2", "b3"] {
            repository
                .register_or_reconnect(conn(id), bob.clone(), client_id.clone())
                .await
                .unwrap();
        }

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast_all()
            .withf(|notification| {
                matches!(notification, Notification::Directory(entries) if entries.len() == 1)
            })
            .times(1)
            .returning(|_| Ok(()));
        let broadcaster = DirectoryBroadcaster::new(repository, Arc::new(pusher));

        // when (操作):
        let entries = broadcaster.refresh().await;

        // then (期待する結果):
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, conn("b3"));
    }
}
