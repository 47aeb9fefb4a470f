//! UseCase layer: one struct per inbound operation.

mod connect;
mod directory;
mod disconnect;
mod error;
mod get_rooms;
mod join;
mod private_message;
mod sequencer;
mod send_message;
mod switch_room;
mod typing;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect::ConnectUseCase;
pub use directory::DirectoryBroadcaster;
pub use disconnect::{DEFAULT_GRACE_PERIOD, DisconnectUseCase, PresenceOutcome};
pub use error::{
    GetRoomDetailError, JoinError, PrivateMessageError, SendMessageError, SwitchRoomError,
    TypingError,
};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join::JoinUseCase;
pub use private_message::PrivateMessageUseCase;
pub use sequencer::EventSequencer;
pub use send_message::SendMessageUseCase;
pub use switch_room::SwitchRoomUseCase;
pub use typing::TypingUseCase;
