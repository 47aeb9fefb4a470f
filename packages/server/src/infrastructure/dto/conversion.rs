//! Conversion logic between DTOs and domain types.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ClientCommand, ConnectionId, DirectoryEntry, DisplayName, FileBlob, FileName, HistoryEntry,
    MessageContent, Notification, Room, RoomName, StableClientId, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::ClientEvent> for ClientCommand {
    type Error = ValueObjectError;

    fn try_from(event: dto::ClientEvent) -> Result<Self, Self::Error> {
        let command = match event {
            dto::ClientEvent::Join(payload) => {
                let (name, client_id) = match payload {
                    dto::JoinPayload::Name(name) => (name, None),
                    dto::JoinPayload::Details(details) => (details.name, details.client_id),
                };
                ClientCommand::Join {
                    name: DisplayName::new(name)?,
                    client_id: StableClientId::from_optional(client_id)?,
                }
            }
            dto::ClientEvent::SwitchRoom(room) => ClientCommand::SwitchRoom {
                room: RoomName::new(room)?,
            },
            dto::ClientEvent::Send(payload) => {
                let (content, room) = match payload {
                    dto::SendPayload::Text(text) => (text, None),
                    dto::SendPayload::Message(message) => (message.payload, message.room),
                };
                ClientCommand::Send {
                    content: MessageContent::new(content)?,
                    room: RoomName::from_optional(room)?,
                }
            }
            dto::ClientEvent::File(payload) => ClientCommand::File {
                file: FileBlob {
                    data: payload.blob,
                    file_name: FileName::new(payload.file_name)?,
                    file_type: payload.file_type,
                },
                room: RoomName::from_optional(payload.room)?,
            },
            dto::ClientEvent::PrivateSend(payload) => ClientCommand::PrivateSend {
                target: ConnectionId::new(payload.target_id)?,
                content: MessageContent::new(payload.payload)?,
            },
            dto::ClientEvent::Typing(_) => ClientCommand::Typing,
        };
        Ok(command)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&HistoryEntry> for dto::HistoryEntryDto {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            sender_name: entry.sender_name.to_string(),
            payload: entry.body.render(),
        }
    }
}

impl From<&DirectoryEntry> for dto::DirectoryEntryDto {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
        }
    }
}

impl From<&Notification> for dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::Connected { connection_id } => {
                dto::ServerEvent::Connected(dto::ConnectedPayload {
                    connection_id: connection_id.to_string(),
                })
            }
            Notification::History(entries) => {
                dto::ServerEvent::History(entries.iter().map(Into::into).collect())
            }
            Notification::UserJoined(name) => dto::ServerEvent::UserJoined(name.to_string()),
            Notification::UserLeft(name) => dto::ServerEvent::UserLeft(name.to_string()),
            Notification::Receive {
                payload,
                sender_name,
            } => dto::ServerEvent::Receive(dto::ReceivePayload {
                payload: payload.to_string(),
                sender_name: sender_name.to_string(),
            }),
            Notification::File { file, sender_name } => {
                dto::ServerEvent::File(dto::FileDeliveryPayload {
                    blob: file.data.clone(),
                    file_name: file.file_name.to_string(),
                    file_type: file.file_type.clone(),
                    sender_name: sender_name.to_string(),
                })
            }
            Notification::PrivateReceive {
                payload,
                sender_name,
                sender_connection_id,
            } => dto::ServerEvent::PrivateReceive(dto::PrivateReceivePayload {
                payload: payload.to_string(),
                sender_name: sender_name.to_string(),
                sender_connection_id: sender_connection_id.to_string(),
            }),
            Notification::TypingIndicator(name) => {
                dto::ServerEvent::TypingIndicator(name.to_string())
            }
            Notification::Directory(entries) => {
                dto::ServerEvent::Directory(entries.iter().map(Into::into).collect())
            }
        }
    }
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.to_string(),
            members: room.members.len(),
            history_size: room.history.len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.to_string(),
            members: room
                .sorted_members()
                .into_iter()
                .map(ConnectionId::into_string)
                .collect(),
            history: room
                .history
                .iter()
                .map(|entry| http::HistoryRecordDto {
                    sender_name: entry.sender_name.to_string(),
                    payload: entry.body.render(),
                    sent_at: timestamp_to_rfc3339(entry.sent_at.value()),
                })
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

/// Encode a notification as a WebSocket text frame.
pub fn encode_notification(notification: &Notification) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerEvent::from(notification))
}

/// Decode and normalize a WebSocket text frame into a command.
pub fn decode_command(text: &str) -> Result<ClientCommand, DecodeError> {
    let event: dto::ClientEvent = serde_json::from_str(text)?;
    Ok(ClientCommand::try_from(event)?)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    Invalid(#[from] ValueObjectError),
}
