//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ConnectionId, Departure, DirectoryEntry, DisplayName, FinalizedDeparture, MessageBody,
    PresenceKey, Registration, RepositoryError, Room, RoomName, RoomSwitch, RoutedMessage,
    Session, StableClientId,
};

/// Chat Repository trait
///
/// Each method is applied atomically: no other event observes the state
/// half-way through a call.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// 新規セッションを登録、または同じ clientId のセッションに再接続
    async fn register_or_reconnect(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
        client_id: Option<StableClientId>,
    ) -> Result<Registration, RepositoryError>;

    /// 接続 ID からセッションを取得
    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Session>;

    /// 接続の紐付けとルーム所属を解除（プレゼンスの判定は行わない）
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Departure>;

    /// 猶予期間へ遷移し、その epoch を返す
    async fn enter_grace_period(&self, key: &PresenceKey) -> Option<u64>;

    /// 再接続がなければセッションを削除
    async fn finalize_departure(
        &self,
        key: &PresenceKey,
        expected_epoch: Option<u64>,
    ) -> Option<FinalizedDeparture>;

    /// ルームを切り替え
    async fn switch_room(
        &self,
        connection_id: &ConnectionId,
        room: RoomName,
    ) -> Result<RoomSwitch, RepositoryError>;

    /// メッセージを履歴に追加し、配信対象を返す
    async fn record_message(
        &self,
        connection_id: &ConnectionId,
        room: Option<RoomName>,
        body: MessageBody,
    ) -> Result<RoutedMessage, RepositoryError>;

    /// 送信者のセッションと同じルームの他メンバーを取得
    async fn room_peers(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(Session, Vec<ConnectionId>), RepositoryError>;

    /// 重複のないオンラインユーザー一覧
    async fn directory(&self) -> Vec<DirectoryEntry>;

    async fn get_room(&self, name: &RoomName) -> Option<Room>;

    async fn get_rooms(&self) -> Vec<Room>;
}
