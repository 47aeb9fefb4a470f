//! Shared application state handed to every handler.

use std::{collections::HashMap, sync::Arc, time::Duration};

use hiroba_shared::time::SystemClock;
use tokio::sync::Mutex;

use crate::{
    domain::ChatState,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryChatRepository},
    usecase::{
        ConnectUseCase, DirectoryBroadcaster, DisconnectUseCase, EventSequencer,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinUseCase, PrivateMessageUseCase,
        SendMessageUseCase, SwitchRoomUseCase, TypingUseCase,
    },
};

pub struct AppState {
    pub connect_usecase: Arc<ConnectUseCase>,
    pub join_usecase: Arc<JoinUseCase>,
    pub switch_room_usecase: Arc<SwitchRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub private_message_usecase: Arc<PrivateMessageUseCase>,
    pub typing_usecase: Arc<TypingUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub directory: Arc<DirectoryBroadcaster>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl AppState {
    /// Wire the use cases on top of the in-memory repository and the WebSocket pusher.
    pub fn in_memory(grace_period: Duration) -> Self {
        // 1. Repository
        let repository = Arc::new(InMemoryChatRepository::new(
            Arc::new(Mutex::new(ChatState::new())),
            Arc::new(SystemClock),
        ));

        // 2. MessagePusher
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));

        // 3. UseCases (one sequencer orders every state change and its fan-out)
        let sequencer = EventSequencer::new();
        let directory = Arc::new(DirectoryBroadcaster::new(
            repository.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_usecase: Arc::new(ConnectUseCase::new(
                message_pusher.clone(),
                sequencer.clone(),
            )),
            join_usecase: Arc::new(JoinUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                directory.clone(),
                sequencer.clone(),
            )),
            switch_room_usecase: Arc::new(SwitchRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            private_message_usecase: Arc::new(PrivateMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            typing_usecase: Arc::new(TypingUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            disconnect_usecase: Arc::new(DisconnectUseCase::new(
                repository.clone(),
                message_pusher,
                directory.clone(),
                sequencer,
                grace_period,
            )),
            directory,
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
        }
    }
}
