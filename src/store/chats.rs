//! Chat list for the WhatsApp-style layout: selection, search and filters.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::models::{Chat, User};

use super::StoreError;

/// Secondary filter applied after the name search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatFilter {
    #[default]
    All,
    Unread,
    Pinned,
}

impl ChatFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatFilter::All => "all",
            ChatFilter::Unread => "unread",
            ChatFilter::Pinned => "pinned",
        }
    }

    pub fn next(self) -> ChatFilter {
        match self {
            ChatFilter::All => ChatFilter::Unread,
            ChatFilter::Unread => ChatFilter::Pinned,
            ChatFilter::Pinned => ChatFilter::All,
        }
    }

    fn accepts(&self, chat: &Chat) -> bool {
        match self {
            ChatFilter::All => true,
            ChatFilter::Unread => chat.unread > 0,
            ChatFilter::Pinned => chat.pinned,
        }
    }
}

impl fmt::Display for ChatFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ChatFilter::All),
            "unread" => Ok(ChatFilter::Unread),
            "pinned" => Ok(ChatFilter::Pinned),
            other => Err(format!("Unknown filter: {}. Use: all, unread, pinned", other)),
        }
    }
}

/// All chats plus the current selection and search state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatList {
    pub(crate) chats: Vec<Chat>,
    /// Id of the single selected chat
    pub(crate) selected: String,
    pub(crate) search: String,
    pub(crate) filter: ChatFilter,
}

impl ChatList {
    /// Build a list with the first chat selected.
    pub fn new(chats: Vec<Chat>) -> Self {
        let selected = chats.first().map(|c| c.id.clone()).unwrap_or_default();
        let mut list = Self {
            chats,
            selected,
            search: String::new(),
            filter: ChatFilter::default(),
        };
        if let Some(chat) = list.selected_mut() {
            chat.unread = 0;
        }
        list
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> ChatFilter {
        self.filter
    }

    pub fn selected_id(&self) -> &str {
        &self.selected
    }

    pub fn selected(&self) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == self.selected)
    }

    pub(crate) fn selected_mut(&mut self) -> Option<&mut Chat> {
        let id = self.selected.clone();
        self.chats.iter_mut().find(|c| c.id == id)
    }

    fn get_mut(&mut self, chat_id: &str) -> Result<&mut Chat, StoreError> {
        self.chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or_else(|| StoreError::UnknownChat(chat_id.to_string()))
    }

    /// Chats whose peer name contains the search query (case-insensitive)
    /// and that pass the current filter. Order is preserved.
    ///
    /// Only an empty query matches everything; whitespace is matched literally.
    pub fn filtered<'a>(&'a self, users: &[User]) -> Vec<&'a Chat> {
        let query = self.search.to_lowercase();
        self.chats
            .iter()
            .filter(|chat| {
                if query.is_empty() {
                    return true;
                }
                users
                    .iter()
                    .find(|u| u.id == chat.user_id)
                    .is_some_and(|u| u.name.to_lowercase().contains(&query))
            })
            .filter(|chat| self.filter.accepts(chat))
            .collect()
    }

    /// Select a chat and mark it read.
    pub fn select(&mut self, chat_id: &str) -> Result<(), StoreError> {
        self.get_mut(chat_id)?.unread = 0;
        self.selected = chat_id.to_string();
        Ok(())
    }

    pub fn toggle_pin(&mut self, chat_id: &str) -> Result<bool, StoreError> {
        let chat = self.get_mut(chat_id)?;
        chat.pinned = !chat.pinned;
        Ok(chat.pinned)
    }

    pub fn toggle_mute(&mut self, chat_id: &str) -> Result<bool, StoreError> {
        let chat = self.get_mut(chat_id)?;
        chat.muted = !chat.muted;
        Ok(chat.muted)
    }

    pub fn mark_as_read(&mut self, chat_id: &str) -> Result<(), StoreError> {
        self.get_mut(chat_id)?.unread = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn list() -> ChatList {
        ChatList::new(seed::chats())
    }

    #[test]
    fn test_first_chat_selected_and_read() {
        let list = list();
        assert_eq!(list.selected_id(), "c1");
        assert_eq!(list.selected().unwrap().unread, 0);
    }

    #[test]
    fn test_search_case_insensitive() {
        let users = seed::users();
        let mut list = list();
        list.search = "cHaR".to_string();
        let found = list.filtered(&users);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, "3");
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let users = seed::users();
        let mut list = list();
        list.search = "zelda".to_string();
        assert!(list.filtered(&users).is_empty());
    }

    #[test]
    fn test_search_match_all_keeps_list() {
        let users = seed::users();
        let mut list = list();
        list.search = String::new();
        let all: Vec<&Chat> = list.chats.iter().collect();
        assert_eq!(list.filtered(&users), all);
    }

    #[test]
    fn test_search_whitespace_is_literal() {
        let users = seed::users();
        let mut list = list();
        list.search = " ".to_string();
        assert!(list.filtered(&users).is_empty());

        list.search = " bob".to_string();
        assert!(list.filtered(&users).is_empty());
    }

    #[test]
    fn test_filter_unread_and_pinned() {
        let users = seed::users();
        let mut list = list();
        list.filter = ChatFilter::Unread;
        let unread: Vec<_> = list.filtered(&users).iter().map(|c| c.id.clone()).collect();
        assert_eq!(unread, vec!["c2", "c3"]);

        list.toggle_pin("c3").unwrap();
        list.filter = ChatFilter::Pinned;
        let pinned: Vec<_> = list.filtered(&users).iter().map(|c| c.id.clone()).collect();
        assert_eq!(pinned, vec!["c3"]);
    }

    #[test]
    fn test_select_marks_read() {
        let mut list = list();
        list.select("c2").unwrap();
        assert_eq!(list.selected_id(), "c2");
        assert_eq!(list.selected().unwrap().unread, 0);
    }

    #[test]
    fn test_select_unknown_keeps_selection() {
        let mut list = list();
        let err = list.select("nope").unwrap_err();
        assert!(matches!(err, StoreError::UnknownChat(_)));
        assert_eq!(list.selected_id(), "c1");
    }

    #[test]
    fn test_toggle_mute() {
        let mut list = list();
        assert!(list.toggle_mute("c1").unwrap());
        assert!(!list.toggle_mute("c1").unwrap());
    }

    #[test]
    fn test_filter_parse_and_cycle() {
        assert_eq!("Unread".parse::<ChatFilter>().unwrap(), ChatFilter::Unread);
        assert!("archived".parse::<ChatFilter>().is_err());
        assert_eq!(ChatFilter::Pinned.next(), ChatFilter::All);
    }
}
