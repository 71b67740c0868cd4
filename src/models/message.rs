//! Message-related models

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Reaction emoji offered by the picker.
pub const EMOJI_PALETTE: [&str; 6] = ["👍", "😂", "❤️", "😮", "😢", "🔥"];

/// Reference stored on messages sent while recording.
pub const VOICE_REFERENCE: &str = "voice-message.mp3";

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Author user id
    pub user_id: String,
    pub text: String,
    /// Formatted send time (e.g. "09:01")
    pub time: String,
    /// Emoji -> ids of users who reacted with it. Empty sets are pruned.
    #[serde(default)]
    pub reactions: BTreeMap<String, BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// One reaction chip as displayed under a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount<'a> {
    pub emoji: &'a str,
    pub count: usize,
    /// Whether the viewing user is among the reactors.
    pub mine: bool,
}

impl Message {
    pub fn has_reacted(&self, emoji: &str, user_id: &str) -> bool {
        self.reactions
            .get(emoji)
            .is_some_and(|users| users.contains(user_id))
    }

    /// Add or remove `user_id` from the emoji's reactor set.
    ///
    /// Returns `true` if the user now has the reaction.
    pub fn toggle_reaction(&mut self, emoji: &str, user_id: &str) -> bool {
        if self.has_reacted(emoji, user_id) {
            if let Some(users) = self.reactions.get_mut(emoji) {
                users.remove(user_id);
                if users.is_empty() {
                    self.reactions.remove(emoji);
                }
            }
            false
        } else {
            self.reactions
                .entry(emoji.to_string())
                .or_default()
                .insert(user_id.to_string());
            true
        }
    }

    /// Reaction chips with counts, from the point of view of `viewer`.
    pub fn reaction_counts(&self, viewer: &str) -> Vec<ReactionCount<'_>> {
        self.reactions
            .iter()
            .map(|(emoji, users)| ReactionCount {
                emoji: emoji.as_str(),
                count: users.len(),
                mine: users.contains(viewer),
            })
            .collect()
    }

    /// Short text used for chat-list previews.
    pub fn preview(&self) -> String {
        if !self.text.trim().is_empty() {
            return self.text.clone();
        }
        if self.image.is_some() {
            "📷 Photo".to_string()
        } else if let Some(file) = &self.file {
            format!("📎 {}", file)
        } else if self.voice.is_some() {
            "🎤 Voice message".to_string()
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> Message {
        Message {
            id: "m1".to_string(),
            user_id: "2".to_string(),
            text: text.to_string(),
            time: "09:00".to_string(),
            reactions: BTreeMap::new(),
            image: None,
            file: None,
            voice: None,
        }
    }

    #[test]
    fn test_toggle_reaction_adds_then_prunes() {
        let mut msg = message("hello");
        assert!(msg.toggle_reaction("👍", "1"));
        assert!(msg.has_reacted("👍", "1"));
        assert!(!msg.toggle_reaction("👍", "1"));
        assert!(msg.reactions.is_empty());
    }

    #[test]
    fn test_toggle_reaction_keeps_other_users() {
        let mut msg = message("hello");
        msg.toggle_reaction("🔥", "2");
        msg.toggle_reaction("🔥", "1");
        msg.toggle_reaction("🔥", "1");
        assert_eq!(msg.reactions["🔥"].len(), 1);
        assert!(msg.has_reacted("🔥", "2"));
    }

    #[test]
    fn test_reaction_counts() {
        let mut msg = message("hello");
        msg.toggle_reaction("👍", "1");
        msg.toggle_reaction("👍", "3");
        msg.toggle_reaction("😂", "3");

        let counts = msg.reaction_counts("1");
        let thumbs = counts.iter().find(|c| c.emoji == "👍").unwrap();
        assert_eq!(thumbs.count, 2);
        assert!(thumbs.mine);
        let laugh = counts.iter().find(|c| c.emoji == "😂").unwrap();
        assert_eq!(laugh.count, 1);
        assert!(!laugh.mine);
    }

    #[test]
    fn test_preview_falls_back_to_attachment() {
        let mut msg = message("  ");
        msg.file = Some("notes.txt".to_string());
        assert_eq!(msg.preview(), "📎 notes.txt");

        msg.image = Some("/tmp/cat.png".to_string());
        assert_eq!(msg.preview(), "📷 Photo");

        let text = message("see attached");
        assert_eq!(text.preview(), "see attached");
    }
}
