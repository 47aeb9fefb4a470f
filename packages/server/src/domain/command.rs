//! Normalized inbound commands.
//!
//! Whatever shape a client used on the wire, handlers only ever see these.

use super::{
    entity::FileBlob,
    value_object::{ConnectionId, DisplayName, MessageContent, RoomName, StableClientId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Join {
        name: DisplayName,
        client_id: Option<StableClientId>,
    },
    SwitchRoom {
        room: RoomName,
    },
    Send {
        content: MessageContent,
        room: Option<RoomName>,
    },
    File {
        file: FileBlob,
        room: Option<RoomName>,
    },
    PrivateSend {
        target: ConnectionId,
        content: MessageContent,
    },
    Typing,
}

impl ClientCommand {
    /// Event name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientCommand::Join { .. } => "join",
            ClientCommand::SwitchRoom { .. } => "switch-room",
            ClientCommand::Send { .. } => "send",
            ClientCommand::File { .. } => "file",
            ClientCommand::PrivateSend { .. } => "private-send",
            ClientCommand::Typing => "typing",
        }
    }
}
