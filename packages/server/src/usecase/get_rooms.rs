//! UseCase: ルーム情報の取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{ChatRepository, Room, RoomName};

use super::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 名前順のルーム一覧
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_name: String) -> Result<Room, GetRoomDetailError> {
        let name = RoomName::new(room_name.clone())
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_name.clone()))?;
        self.repository
            .get_room(&name)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound(room_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::DisplayName,
        usecase::test_support::{TestHarness, conn},
    };

    #[tokio::test]
    async fn test_get_rooms_lists_rooms_by_name() {
        // テスト項目: 作成済みのルームが名前順で返される
        // given (前提条件):
        let harness = TestHarness::new();
        let alice = conn("a1");
        harness
            .repository
            .register_or_reconnect(
                alice.clone(),
                DisplayName::new("Alice".to_string()).unwrap(),
                None,
            )
            .await
            .unwrap();
        harness
            .repository
            .switch_room(&alice, RoomName::new("announcements".to_string()).unwrap())
            .await
            .unwrap();
        let usecase = GetRoomsUseCase::new(harness.repository.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        let names: Vec<&str> = rooms.iter().map(|room| room.name.as_str()).collect();
        assert_eq!(names, vec!["announcements", "general"]);
        assert!(rooms[1].members.is_empty());
        assert!(rooms[0].members.contains(&alice));
    }

    #[tokio::test]
    async fn test_get_room_detail_not_found() {
        // テスト項目: 存在しないルームは RoomNotFound
        // given (前提条件):
        let harness = TestHarness::new();
        let usecase = GetRoomDetailUseCase::new(harness.repository.clone());

        // when (操作):
        let result = usecase.execute("nowhere".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            GetRoomDetailError::RoomNotFound("nowhere".to_string())
        );
    }
}
