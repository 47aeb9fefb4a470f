//! MessagePusher trait 定義
//!
//! クライアントへの通知送信を抽象化します。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification};

/// Outbound channel of one connection. Carries encoded frames.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Delivers notifications to connected clients.
///
/// Delivery is best-effort: broadcasts skip unreachable clients instead of failing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 指定したクライアント群に送信
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 接続中の全クライアントに送信（参加前の接続も含む）
    async fn broadcast_all(&self, notification: &Notification) -> Result<(), MessagePushError>;
}
