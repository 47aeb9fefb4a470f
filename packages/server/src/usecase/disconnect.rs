//! UseCase: 切断処理とプレゼンス判定
//!
//! clientId を持つセッションは、最後の接続が切れても猶予期間のあいだ残ります。
//! 猶予期間内に同じ clientId で再接続すれば、ルームには何も通知されません。
//! 猶予期間が過ぎた時点で再接続がなければ `user-left` を 1 回だけ通知します。
//!
//! 猶予期間の判定は遅延タスクで行い、タスクは実行時に状態を確認し直します。
//! 再接続や新しい切断で epoch が変わっていれば、そのタスクは何もしません。
//! 判定タスクも受信イベントと同じ `EventSequencer` の順番を待ってから状態に触れます。

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::domain::{
    ChatRepository, ConnectionId, FinalizedDeparture, MessagePusher, Notification, PresenceKey,
};

use super::{DirectoryBroadcaster, EventSequencer};

/// 再接続を待つ猶予期間の既定値
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(8);

/// 切断処理の結果
#[derive(Debug)]
pub enum PresenceOutcome {
    /// join 前の接続だった
    NotRegistered,
    /// 同じセッションに別の接続が残っている
    StillConnected,
    /// 猶予期間に入った。`check` は期限到来時の判定結果を返す
    GracePeriod {
        epoch: u64,
        check: JoinHandle<Option<FinalizedDeparture>>,
    },
    /// 即時にオフラインになった
    Offline(FinalizedDeparture),
}

/// 切断のユースケース
#[derive(Clone)]
pub struct DisconnectUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    directory: Arc<DirectoryBroadcaster>,
    sequencer: EventSequencer,
    grace_period: Duration,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        directory: Arc<DirectoryBroadcaster>,
        sequencer: EventSequencer,
        grace_period: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            directory,
            sequencer,
            grace_period,
        }
    }

    /// 切断を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断した接続の ID
    ///
    /// # Returns
    ///
    /// * `PresenceOutcome` - セッションがどう扱われたか
    pub async fn execute(&self, connection_id: &ConnectionId) -> PresenceOutcome {
        let _turn = self.sequencer.enter().await;

        // 1. 送信チャンネルを登録解除
        self.message_pusher.unregister_client(connection_id).await;

        // 2. 接続の紐付けとルーム所属を解除
        let Some(departure) = self.repository.unregister(connection_id).await else {
            tracing::debug!("Connection '{}' closed before joining", connection_id);
            return PresenceOutcome::NotRegistered;
        };

        // 3. 同じセッションの別接続が残っていればプレゼンスは変わらない
        if departure.still_bound {
            tracing::info!(
                "'{}' closed one of several connections ({})",
                departure.session.display_name,
                connection_id
            );
            self.directory.refresh().await;
            return PresenceOutcome::StillConnected;
        }

        // 4. clientId がなければ即時にオフライン
        if !departure.key.has_grace_period() || self.grace_period.is_zero() {
            return match self.finalize(&departure.key, None).await {
                Some(finalized) => PresenceOutcome::Offline(finalized),
                None => PresenceOutcome::StillConnected,
            };
        }

        // 5. 猶予期間に入り、期限到来時の判定を予約
        let Some(epoch) = self.repository.enter_grace_period(&departure.key).await else {
            return PresenceOutcome::StillConnected;
        };
        tracing::info!(
            "'{}' disconnected, waiting {:?} for reconnect (session {})",
            departure.session.display_name,
            self.grace_period,
            departure.key.as_str()
        );

        let this = self.clone();
        let key = departure.key;
        let check = tokio::spawn(async move {
            tokio::time::sleep(this.grace_period).await;
            let _turn = this.sequencer.enter().await;
            this.finalize(&key, Some(epoch)).await
        });

        PresenceOutcome::GracePeriod { epoch, check }
    }

    /// 再接続がなければセッションを削除し、ルームと一覧に反映する
    async fn finalize(
        &self,
        key: &PresenceKey,
        expected_epoch: Option<u64>,
    ) -> Option<FinalizedDeparture> {
        let Some(finalized) = self
            .repository
            .finalize_departure(key, expected_epoch)
            .await
        else {
            tracing::debug!("Session '{}' was resumed, nothing to finalize", key.as_str());
            return None;
        };

        tracing::info!(
            "'{}' left room '{}'",
            finalized.session.display_name,
            finalized.session.room
        );
        if !finalized.notify.is_empty() {
            let left = Notification::UserLeft(finalized.session.display_name.clone());
            if let Err(e) = self
                .message_pusher
                .broadcast(finalized.notify.clone(), &left)
                .await
            {
                tracing::warn!("Failed to broadcast user-left: {}", e);
            }
        }
        self.directory.refresh().await;

        Some(finalized)
    }
}
