//! Data models for users, messages and chats

mod chat;
mod message;
mod user;

pub use chat::*;
pub use message::*;
pub use user::*;

/// The local user. Never reassigned at runtime.
pub const SELF_ID: &str = "1";
