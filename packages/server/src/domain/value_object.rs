//! Value objects.
//!
//! Every value object validates its input on construction, so code past the
//! protocol boundary never sees an empty name or an oversized room id.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Room every new session starts in.
pub const DEFAULT_ROOM: &str = "general";

pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;
pub const MAX_CLIENT_ID_LENGTH: usize = 128;
pub const MAX_ROOM_NAME_LENGTH: usize = 64;
pub const MAX_FILE_NAME_LENGTH: usize = 255;

fn validated(
    field: &'static str,
    value: String,
    max: usize,
    trim: bool,
) -> Result<String, ValueObjectError> {
    let value = if trim {
        value.trim().to_string()
    } else {
        value
    };
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty { field });
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValueObjectError::TooLong { field, max, actual });
    }
    Ok(value)
}

macro_rules! string_value_object {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_value_object!(
    /// Ephemeral identifier of one live transport connection.
    ConnectionId
);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated("connection id", value, MAX_CLIENT_ID_LENGTH, true).map(Self)
    }
}

/// Generates connection ids for freshly upgraded sockets.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

string_value_object!(
    /// Client-supplied identity that survives reconnects.
    StableClientId
);

impl StableClientId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated("client id", value, MAX_CLIENT_ID_LENGTH, true).map(Self)
    }

    /// Blank ids are treated as "not supplied".
    pub fn from_optional(value: Option<String>) -> Result<Option<Self>, ValueObjectError> {
        match value {
            Some(raw) if !raw.trim().is_empty() => Self::new(raw).map(Some),
            _ => Ok(None),
        }
    }
}

string_value_object!(
    /// Self-asserted user name. Not unique.
    DisplayName
);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated("display name", value, MAX_DISPLAY_NAME_LENGTH, true).map(Self)
    }
}

string_value_object!(RoomName);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated("room name", value, MAX_ROOM_NAME_LENGTH, true).map(Self)
    }

    pub fn general() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }

    pub fn from_optional(value: Option<String>) -> Result<Option<Self>, ValueObjectError> {
        match value {
            Some(raw) if !raw.trim().is_empty() => Self::new(raw).map(Some),
            _ => Ok(None),
        }
    }
}

string_value_object!(
    /// Text body of a public or private message. Kept verbatim.
    MessageContent
);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated("message content", value, usize::MAX, false).map(Self)
    }
}

string_value_object!(FileName);

impl FileName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated("file name", value, MAX_FILE_NAME_LENGTH, true).map(Self)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
