//! Utilities shared by the Hiroba packages: logging setup and time helpers.

pub mod logger;
pub mod time;
