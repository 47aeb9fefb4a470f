//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する ChatRepository trait の具体的な実装。
//! `ChatState`（セッション表とルーム表）を 1 つの Mutex で保護します。
//!
//! 各メソッドはロックを 1 回だけ取得し、その中で状態変更を完結させます。
//! そのため、あるイベントの処理途中の状態を別のイベントが観測することはありません。
//! 通知の送信はロック解放後に UseCase 層が行います。

use std::sync::Arc;

use async_trait::async_trait;
use hiroba_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChatRepository, ChatState, ConnectionId, Departure, DirectoryEntry, DisplayName,
    FinalizedDeparture, MessageBody, PresenceKey, Registration, RepositoryError, Room, RoomName,
    RoomSwitch, RoutedMessage, Session, StableClientId, Timestamp,
};

/// インメモリ Chat Repository 実装
pub struct InMemoryChatRepository {
    /// セッションとルームの状態
    state: Arc<Mutex<ChatState>>,
    /// タイムスタンプ生成用の時計
    clock: Arc<dyn Clock>,
}

impl InMemoryChatRepository {
    /// 新しい InMemoryChatRepository を作成
    pub fn new(state: Arc<Mutex<ChatState>>, clock: Arc<dyn Clock>) -> Self {
        Self { state, clock }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn register_or_reconnect(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
        client_id: Option<StableClientId>,
    ) -> Result<Registration, RepositoryError> {
        let now = self.now();
        let mut state = self.state.lock().await;
        state.register_or_reconnect(connection_id, name, client_id, now)
    }

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Session> {
        let state = self.state.lock().await;
        state.lookup(connection_id)
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let mut state = self.state.lock().await;
        state.unregister(connection_id)
    }

    async fn enter_grace_period(&self, key: &PresenceKey) -> Option<u64> {
        let mut state = self.state.lock().await;
        state.enter_grace_period(key)
    }

    async fn finalize_departure(
        &self,
        key: &PresenceKey,
        expected_epoch: Option<u64>,
    ) -> Option<FinalizedDeparture> {
        let mut state = self.state.lock().await;
        state.finalize_departure(key, expected_epoch)
    }

    async fn switch_room(
        &self,
        connection_id: &ConnectionId,
        room: RoomName,
    ) -> Result<RoomSwitch, RepositoryError> {
        let now = self.now();
        let mut state = self.state.lock().await;
        state.switch_room(connection_id, room, now)
    }

    async fn record_message(
        &self,
        connection_id: &ConnectionId,
        room: Option<RoomName>,
        body: MessageBody,
    ) -> Result<RoutedMessage, RepositoryError> {
        let now = self.now();
        let mut state = self.state.lock().await;
        state.record_message(connection_id, room, body, now)
    }

    async fn room_peers(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(Session, Vec<ConnectionId>), RepositoryError> {
        let state = self.state.lock().await;
        state.room_peers(connection_id)
    }

    async fn directory(&self) -> Vec<DirectoryEntry> {
        let state = self.state.lock().await;
        state.directory()
    }

    async fn get_room(&self, name: &RoomName) -> Option<Room> {
        let state = self.state.lock().await;
        state.room(name)
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let state = self.state.lock().await;
        state.rooms()
    }
}
