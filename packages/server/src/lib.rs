//! Hiroba chat relay server library.
//!
//! Clients connect over WebSocket, join named rooms, exchange text, files and
//! private messages, and see who is online. Sessions carrying a stable client
//! id survive short disconnects without a leave notice.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

pub use config::ServerConfig;
