//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// join のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// 接続が別の clientId で登録済み
    #[error("Connection '{0}' is already registered under another identity")]
    AlreadyRegistered(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for JoinError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ConnectionAlreadyBound(id) => JoinError::AlreadyRegistered(id),
            other => JoinError::Repository(other),
        }
    }
}

/// 未登録の接続からのイベントに共通するエラー
macro_rules! unknown_sender_error {
    ($(#[$meta:meta])* $name:ident { $($extra:tt)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Error)]
        pub enum $name {
            /// 送信元の接続にセッションが存在しない
            #[error("Unknown sender '{0}'")]
            UnknownSender(String),

            #[error(transparent)]
            Repository(RepositoryError),

            $($extra)*
        }

        impl From<RepositoryError> for $name {
            fn from(error: RepositoryError) -> Self {
                match error {
                    RepositoryError::SessionNotFound(id) => $name::UnknownSender(id),
                    other => $name::Repository(other),
                }
            }
        }
    };
}

unknown_sender_error!(
    /// ルーム切替のエラー
    SwitchRoomError {}
);

unknown_sender_error!(
    /// 公開メッセージ・ファイル送信のエラー
    SendMessageError {}
);

unknown_sender_error!(
    /// タイピング通知のエラー
    TypingError {}
);

unknown_sender_error!(
    /// プライベートメッセージのエラー
    PrivateMessageError {
        /// 宛先の接続が存在しない
        #[error("Unknown target '{0}'")]
        UnknownTarget(String),

        /// 自分自身宛て
        #[error("Private message addressed to the sender")]
        SelfTarget,
    }
);

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_maps_to_unknown_sender() {
        // テスト項目: SessionNotFound は UnknownSender に変換される
        // given (前提条件):
        let error = RepositoryError::SessionNotFound("c1".to_string());

        // when (操作):
        let mapped = SendMessageError::from(error);

        // then (期待する結果):
        assert_eq!(mapped, SendMessageError::UnknownSender("c1".to_string()));
    }

    #[test]
    fn test_already_bound_maps_to_already_registered() {
        // テスト項目: ConnectionAlreadyBound は AlreadyRegistered に変換される
        // given (前提条件):
        let error = RepositoryError::ConnectionAlreadyBound("c1".to_string());

        // when (操作):
        let mapped = JoinError::from(error);

        // then (期待する結果):
        assert_eq!(mapped, JoinError::AlreadyRegistered("c1".to_string()));
    }
}
