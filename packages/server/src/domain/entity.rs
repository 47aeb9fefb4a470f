//! Entities held by the chat state.

use super::value_object::{
    ConnectionId, DisplayName, FileName, MessageContent, RoomName, StableClientId, Timestamp,
};

/// Identity a session is keyed by.
///
/// Clients that supply a stable id keep their session across reconnects;
/// older clients are tracked per connection and have no grace period.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PresenceKey {
    Stable(StableClientId),
    Connection(ConnectionId),
}

impl PresenceKey {
    pub fn for_client(client_id: Option<StableClientId>, connection_id: &ConnectionId) -> Self {
        match client_id {
            Some(id) => PresenceKey::Stable(id),
            None => PresenceKey::Connection(connection_id.clone()),
        }
    }

    pub fn has_grace_period(&self) -> bool {
        matches!(self, PresenceKey::Stable(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            PresenceKey::Stable(id) => id.as_str(),
            PresenceKey::Connection(id) => id.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    Online,
    /// Disconnected, waiting for a successor connection. `epoch` identifies
    /// which disconnect scheduled the pending check.
    GracePeriod { epoch: u64 },
}

/// Logical user behind one or more connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub key: PresenceKey,
    /// Most recently bound connection
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub room: RoomName,
    pub connected_at: Timestamp,
    pub presence: PresenceState,
    grace_epoch: u64,
}

impl Session {
    pub fn new(
        key: PresenceKey,
        connection_id: ConnectionId,
        display_name: DisplayName,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            key,
            connection_id,
            display_name,
            room: RoomName::general(),
            connected_at,
            presence: PresenceState::Online,
            grace_epoch: 0,
        }
    }

    /// Rebind the session to a successor connection.
    pub fn rebind(&mut self, connection_id: ConnectionId, display_name: DisplayName) {
        self.connection_id = connection_id;
        self.display_name = display_name;
        self.presence = PresenceState::Online;
    }

    /// Enter the grace period and return the epoch of this transition.
    pub fn enter_grace_period(&mut self) -> u64 {
        self.grace_epoch += 1;
        self.presence = PresenceState::GracePeriod {
            epoch: self.grace_epoch,
        };
        self.grace_epoch
    }

    pub fn is_pending_since(&self, epoch: u64) -> bool {
        self.presence == PresenceState::GracePeriod { epoch }
    }
}

/// Opaque file payload relayed between clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// Encoded file contents (typically a data URL)
    pub data: String,
    pub file_name: FileName,
    pub file_type: String,
}

/// What a history entry records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(MessageContent),
    /// File bytes are never retained, only a marker.
    File(FileName),
}

impl MessageBody {
    pub fn render(&self) -> String {
        match self {
            MessageBody::Text(content) => content.as_str().to_string(),
            MessageBody::File(file_name) => format!("[file] {}", file_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sender_name: DisplayName,
    pub body: MessageBody,
    pub sent_at: Timestamp,
}

impl HistoryEntry {
    pub fn new(sender_name: DisplayName, body: MessageBody, sent_at: Timestamp) -> Self {
        Self {
            sender_name,
            body,
            sent_at,
        }
    }
}

/// One line of the online-user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub id: ConnectionId,
    pub name: DisplayName,
}
