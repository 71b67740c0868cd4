//! Conversation state store
//!
//! Owns the seeded users, the active room and all UI-selection state. Every
//! mutation is a synchronous method; renderers read the store and never
//! mutate it directly.

mod chats;
mod conversation;
mod draft;
mod typing;

pub use chats::{ChatFilter, ChatList};
pub use draft::Draft;
pub use typing::DEFAULT_TYPING_PROBABILITY;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Chat, Message, Presence, User, SELF_ID};
use crate::seed;

/// Maximum length of the recently-used emoji list.
pub const MAX_RECENT_EMOJIS: usize = 6;

/// Title of the single room in the group layout.
pub const GROUP_TITLE: &str = "General Chat";

/// Lookup failures. Blank sends are not errors; they return `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown message: {0}")]
    UnknownMessage(String),
    #[error("unknown chat: {0}")]
    UnknownChat(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("chat list operations need the whatsapp layout")]
    NotChatList,
}

/// Which front-end layout the store is seeded for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Single group room with an online-users sidebar
    #[default]
    #[serde(alias = "group")]
    Messenger,
    /// Searchable list of one-on-one chats
    #[serde(alias = "chats")]
    Whatsapp,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Messenger => "messenger",
            Layout::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "messenger" | "group" => Ok(Layout::Messenger),
            "whatsapp" | "chats" => Ok(Layout::Whatsapp),
            other => Err(format!("Unknown layout: {}. Use: messenger, whatsapp", other)),
        }
    }
}

/// The conversation(s) the store holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Room {
    Group { messages: Vec<Message> },
    Chats(ChatList),
}

/// Conversation state store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    users: Vec<User>,
    room: Room,
    draft: Draft,
    recent_emojis: Vec<String>,
    sidebar_open: bool,
    dark_mode: bool,
    #[serde(skip)]
    time_format: String,
}

impl Store {
    /// Seeded store for the given layout.
    pub fn new(layout: Layout) -> Self {
        let room = match layout {
            Layout::Messenger => Room::Group {
                messages: seed::group_messages(),
            },
            Layout::Whatsapp => Room::Chats(ChatList::new(seed::chats())),
        };
        Self {
            users: seed::users(),
            room,
            draft: Draft::default(),
            recent_emojis: Vec::new(),
            sidebar_open: true,
            dark_mode: false,
            time_format: "%H:%M".to_string(),
        }
    }

    /// Override the chrono format used for new message timestamps.
    pub fn with_time_format(mut self, format: &str) -> Self {
        self.time_format = format.to_string();
        self
    }

    pub fn with_dark_mode(mut self, dark: bool) -> Self {
        self.dark_mode = dark;
        self
    }

    pub fn layout(&self) -> Layout {
        match self.room {
            Room::Group { .. } => Layout::Messenger,
            Room::Chats(_) => Layout::Whatsapp,
        }
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &str) -> Result<&User, StoreError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::UnknownUser(id.to_string()))
    }

    /// Display name for a user id, with a placeholder for unknown ids.
    pub fn user_name(&self, id: &str) -> &str {
        self.user(id).map(|u| u.name.as_str()).unwrap_or("Unknown")
    }

    fn self_user_mut(&mut self) -> &mut User {
        let idx = self
            .users
            .iter()
            .position(|u| u.id == SELF_ID)
            .unwrap_or(0);
        &mut self.users[idx]
    }

    pub fn status(&self) -> Presence {
        self.user(SELF_ID)
            .map(|u| u.status)
            .unwrap_or(Presence::Offline)
    }

    /// Update the local user's status.
    pub fn set_status(&mut self, status: Presence) {
        tracing::info!("Status set to {}", status);
        self.self_user_mut().status = status;
    }

    pub fn online_users(&self) -> Vec<&User> {
        self.users.iter().filter(|u| u.online).collect()
    }

    /// Peers currently typing (the local user is excluded).
    pub fn typing_users(&self) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| u.id != SELF_ID && u.typing)
            .collect()
    }

    /// Typing peers visible in the active room: everyone in the group, only
    /// the peer of the selected chat in the chat list.
    pub fn room_typing_users(&self) -> Vec<&User> {
        match &self.room {
            Room::Group { .. } => self.typing_users(),
            Room::Chats(list) => {
                let peer = list.selected().map(|c| c.user_id.as_str());
                self.typing_users()
                    .into_iter()
                    .filter(|u| Some(u.id.as_str()) == peer)
                    .collect()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Room
    // -----------------------------------------------------------------------

    /// Messages of the active conversation: the group room, or the selected chat.
    pub fn messages(&self) -> &[Message] {
        match &self.room {
            Room::Group { messages } => messages,
            Room::Chats(list) => list.selected().map(|c| c.messages.as_slice()).unwrap_or(&[]),
        }
    }

    fn messages_mut(&mut self) -> Option<&mut Vec<Message>> {
        match &mut self.room {
            Room::Group { messages } => Some(messages),
            Room::Chats(list) => list.selected_mut().map(|c| &mut c.messages),
        }
    }

    /// Header title for the active conversation.
    pub fn room_title(&self) -> String {
        match &self.room {
            Room::Group { .. } => GROUP_TITLE.to_string(),
            Room::Chats(list) => list
                .selected()
                .map(|c| self.user_name(&c.user_id).to_string())
                .unwrap_or_default(),
        }
    }

    // -----------------------------------------------------------------------
    // Compose
    // -----------------------------------------------------------------------

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Replace the draft text. The local user's typing flag follows it.
    pub fn set_draft_text(&mut self, text: &str) {
        self.draft.text = text.to_string();
        let typing = !text.is_empty();
        self.self_user_mut().typing = typing;
    }

    pub fn attach_image(&mut self, path: &str) {
        tracing::debug!("Attached image {}", path);
        self.draft.attach_image(path);
    }

    pub fn attach_file(&mut self, path: &str) {
        self.draft.attach_file(path);
        tracing::debug!("Attached file {:?}", self.draft.file);
    }

    /// Flip the mock recording flag. Returns the new state.
    pub fn toggle_recording(&mut self) -> bool {
        self.draft.recording = !self.draft.recording;
        self.draft.recording
    }

    /// Send the current draft.
    ///
    /// Silently returns `None` when the draft has blank text and no attachment.
    /// Otherwise the message is appended and the draft cleared.
    pub fn send_message(&mut self) -> Option<&Message> {
        let time = chrono::Local::now().format(&self.time_format).to_string();
        self.send_message_at(time)
    }

    fn send_message_at(&mut self, time: String) -> Option<&Message> {
        if !self.draft.is_sendable() {
            return None;
        }
        let draft = self.draft.take();
        self.self_user_mut().typing = false;

        if let Room::Chats(list) = &mut self.room {
            let chat = list.selected_mut()?;
            conversation::append(&mut chat.messages, SELF_ID, draft, time);
            chat.sync_last_message();
        } else {
            conversation::append(self.messages_mut()?, SELF_ID, draft, time);
        }

        let sent = self.messages().last()?;
        tracing::info!("Sent message {} ({} chars)", sent.id, sent.text.chars().count());
        Some(sent)
    }

    /// Set the draft text and send it in one step.
    pub fn send_text(&mut self, text: &str) -> Option<&Message> {
        self.set_draft_text(text);
        self.send_message()
    }

    // -----------------------------------------------------------------------
    // Reactions
    // -----------------------------------------------------------------------

    pub fn recent_emojis(&self) -> &[String] {
        &self.recent_emojis
    }

    /// Toggle the local user's reaction on a message of the active conversation.
    ///
    /// Returns `true` if the reaction is now present.
    pub fn toggle_reaction(&mut self, message_id: &str, emoji: &str) -> Result<bool, StoreError> {
        let messages = self
            .messages_mut()
            .ok_or_else(|| StoreError::UnknownMessage(message_id.to_string()))?;
        let message = conversation::find_mut(messages, message_id)
            .ok_or_else(|| StoreError::UnknownMessage(message_id.to_string()))?;
        let added = message.toggle_reaction(emoji, SELF_ID);

        self.recent_emojis.retain(|e| e != emoji);
        self.recent_emojis.insert(0, emoji.to_string());
        self.recent_emojis.truncate(MAX_RECENT_EMOJIS);

        tracing::debug!(
            "Reaction {} {} on {}",
            emoji,
            if added { "added" } else { "removed" },
            message_id
        );
        Ok(added)
    }

    // -----------------------------------------------------------------------
    // View flags
    // -----------------------------------------------------------------------

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    // -----------------------------------------------------------------------
    // Chat list (whatsapp layout)
    // -----------------------------------------------------------------------

    pub fn chat_list(&self) -> Option<&ChatList> {
        match &self.room {
            Room::Chats(list) => Some(list),
            Room::Group { .. } => None,
        }
    }

    fn chat_list_mut(&mut self) -> Result<&mut ChatList, StoreError> {
        match &mut self.room {
            Room::Chats(list) => Ok(list),
            Room::Group { .. } => Err(StoreError::NotChatList),
        }
    }

    pub fn set_search(&mut self, query: &str) -> Result<(), StoreError> {
        self.chat_list_mut()?.search = query.to_string();
        Ok(())
    }

    pub fn set_filter(&mut self, filter: ChatFilter) -> Result<(), StoreError> {
        self.chat_list_mut()?.filter = filter;
        Ok(())
    }

    /// Chats matching the current search and filter. Empty in the group layout.
    pub fn filtered_chats(&self) -> Vec<&Chat> {
        self.chat_list()
            .map(|list| list.filtered(&self.users))
            .unwrap_or_default()
    }

    pub fn select_chat(&mut self, chat_id: &str) -> Result<(), StoreError> {
        self.chat_list_mut()?.select(chat_id)?;
        tracing::info!("Selected chat {}", chat_id);
        Ok(())
    }

    pub fn toggle_pin(&mut self, chat_id: &str) -> Result<bool, StoreError> {
        self.chat_list_mut()?.toggle_pin(chat_id)
    }

    pub fn toggle_mute(&mut self, chat_id: &str) -> Result<bool, StoreError> {
        self.chat_list_mut()?.toggle_mute(chat_id)
    }

    pub fn mark_as_read(&mut self, chat_id: &str) -> Result<(), StoreError> {
        self.chat_list_mut()?.mark_as_read(chat_id)
    }
}
