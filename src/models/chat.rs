//! Chat-related models

use serde::{Deserialize, Serialize};

use super::Message;

/// One-on-one chat in the chat-list layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    /// The peer this chat is with
    pub user_id: String,
    /// Denormalized preview of the newest message
    pub last_message: String,
    /// Denormalized time of the newest message
    pub last_time: String,
    pub unread: u32,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub muted: bool,
    pub messages: Vec<Message>,
}

impl Chat {
    /// Re-sync the denormalized fields from the newest message.
    pub fn sync_last_message(&mut self) {
        if let Some(last) = self.messages.last() {
            self.last_message = last.preview();
            self.last_time = last.time.clone();
        }
    }
}
