//! Domain layer: chat state, entities and the interfaces the use cases depend on.

pub mod command;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod notification;
pub mod registry;
pub mod repository;
pub mod room;
pub mod state;
pub mod value_object;

pub use command::ClientCommand;
pub use entity::{
    DirectoryEntry, FileBlob, HistoryEntry, MessageBody, PresenceKey, PresenceState, Session,
};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::Notification;
pub use registry::ConnectionRegistry;
pub use repository::ChatRepository;
pub use room::{HISTORY_CAPACITY, History, Room, RoomStore};
pub use state::{ChatState, Departure, FinalizedDeparture, Registration, RoomSwitch, RoutedMessage};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, DEFAULT_ROOM, DisplayName, FileName, MessageContent,
    RoomName, StableClientId, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
