//! Helpers shared by the use case tests.

use std::{collections::HashMap, sync::Arc};

use hiroba_shared::time::FixedClock;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ChatState, ConnectionId, MessagePusher},
    infrastructure::{
        dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
        repository::InMemoryChatRepository,
    },
};

use super::{DirectoryBroadcaster, EventSequencer};

pub(crate) struct TestHarness {
    pub repository: Arc<InMemoryChatRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub directory: Arc<DirectoryBroadcaster>,
    pub sequencer: EventSequencer,
}

impl TestHarness {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryChatRepository::new(
            Arc::new(Mutex::new(ChatState::new())),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        ));
        let pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let directory = Arc::new(DirectoryBroadcaster::new(
            repository.clone(),
            pusher.clone(),
        ));
        Self {
            repository,
            pusher,
            directory,
            sequencer: EventSequencer::new(),
        }
    }

    /// Register an outbound channel for `id` as the socket handler would.
    pub async fn open(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = conn(id);
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(connection_id.clone(), tx).await;
        (connection_id, rx)
    }
}

pub(crate) fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

/// Everything queued on a receiver so far, decoded.
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        events.push(serde_json::from_str(&frame).unwrap());
    }
    events
}

/// Like `drain`, without directory updates.
pub(crate) fn drain_without_directory(
    rx: &mut mpsc::UnboundedReceiver<String>,
) -> Vec<ServerEvent> {
    drain(rx)
        .into_iter()
        .filter(|event| !matches!(event, ServerEvent::Directory(_)))
        .collect()
}
