//! Events the relay pushes to clients.

use super::{
    entity::{DirectoryEntry, FileBlob, HistoryEntry},
    value_object::{ConnectionId, DisplayName, MessageContent},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Sent once per socket so the client learns its own connection id
    Connected { connection_id: ConnectionId },
    History(Vec<HistoryEntry>),
    UserJoined(DisplayName),
    UserLeft(DisplayName),
    Receive {
        payload: MessageContent,
        sender_name: DisplayName,
    },
    File {
        file: FileBlob,
        sender_name: DisplayName,
    },
    PrivateReceive {
        payload: MessageContent,
        sender_name: DisplayName,
        sender_connection_id: ConnectionId,
    },
    TypingIndicator(DisplayName),
    Directory(Vec<DirectoryEntry>),
}
