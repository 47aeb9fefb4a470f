//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.
//! Inbound payloads accept the legacy shapes (bare strings, `message` /
//! `file` field names); conversion into `ClientCommand` normalizes them.

use serde::{Deserialize, Serialize};

// ========================================
// Client → Server
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    Join(JoinPayload),
    SwitchRoom(String),
    Send(SendPayload),
    File(FilePayload),
    PrivateSend(PrivateSendPayload),
    Typing(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JoinPayload {
    Name(String),
    Details(JoinDetails),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDetails {
    pub name: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendPayload {
    Text(String),
    Message(SendMessage),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessage {
    #[serde(alias = "message")]
    pub payload: String,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    #[serde(alias = "file")]
    pub blob: String,
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub room: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSendPayload {
    #[serde(alias = "targetConnectionId")]
    pub target_id: String,
    #[serde(alias = "message")]
    pub payload: String,
}

// ========================================
// Server → Client
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Connected(ConnectedPayload),
    History(Vec<HistoryEntryDto>),
    UserJoined(String),
    UserLeft(String),
    Receive(ReceivePayload),
    File(FileDeliveryPayload),
    PrivateReceive(PrivateReceivePayload),
    TypingIndicator(String),
    Directory(Vec<DirectoryEntryDto>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryDto {
    pub sender_name: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivePayload {
    pub payload: String,
    pub sender_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDeliveryPayload {
    pub blob: String,
    pub file_name: String,
    pub file_type: String,
    pub sender_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateReceivePayload {
    pub payload: String,
    pub sender_name: String,
    pub sender_connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntryDto {
    pub id: String,
    pub name: String,
}
