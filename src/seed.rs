//! Startup data. Everything here is rebuilt on every launch.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Chat, Message, Presence, User, SELF_ID};

const AVATARS: [&str; 4] = [
    "https://randomuser.me/api/portraits/men/32.jpg",
    "https://randomuser.me/api/portraits/women/44.jpg",
    "https://randomuser.me/api/portraits/men/45.jpg",
    "https://randomuser.me/api/portraits/women/48.jpg",
];

const SHARED_IMAGE: &str =
    "https://images.unsplash.com/photo-1506744038136-46273834b3fb?auto=format&fit=crop&w=400&q=80";

fn user(id: &str, name: &str, avatar: &str, status: Presence) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        avatar: avatar.to_string(),
        status,
        online: true,
        typing: false,
    }
}

fn message(id: &str, user_id: &str, text: &str, time: &str) -> Message {
    Message {
        id: id.to_string(),
        user_id: user_id.to_string(),
        text: text.to_string(),
        time: time.to_string(),
        reactions: BTreeMap::new(),
        image: None,
        file: None,
        voice: None,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(SELF_ID, "Alice", AVATARS[1], Presence::Online),
        user("2", "Bob", AVATARS[0], Presence::Brb),
        user("3", "Charlie", AVATARS[2], Presence::Busy),
        user("4", "Daisy", AVATARS[3], Presence::Online),
    ]
}

/// Messages of the "General Chat" group room.
pub fn group_messages() -> Vec<Message> {
    let mut greeting = message("m1", "2", "Hey Alice!", "09:00");
    greeting.image = Some(SHARED_IMAGE.to_string());

    let mut plan = message("m3", "3", "Morning everyone!", "09:02");
    plan.file = Some("ProjectPlan.pdf".to_string());
    plan.reactions
        .insert("👍".to_string(), BTreeSet::from([SELF_ID.to_string()]));

    vec![greeting, message("m2", SELF_ID, "Hi Bob! 👋", "09:01"), plan]
}

fn chat(id: &str, user_id: &str, unread: u32, messages: Vec<Message>) -> Chat {
    let mut chat = Chat {
        id: id.to_string(),
        user_id: user_id.to_string(),
        last_message: String::new(),
        last_time: String::new(),
        unread,
        pinned: false,
        muted: false,
        messages,
    };
    chat.sync_last_message();
    chat
}

/// One-on-one chats of the chat-list layout, one per peer.
pub fn chats() -> Vec<Chat> {
    vec![
        chat(
            "c1",
            "2",
            0,
            vec![
                message("m1", "2", "Hey Alice! Lunch today?", "09:00"),
                message("m2", SELF_ID, "Sure, 12:30 works 👍", "09:03"),
            ],
        ),
        chat(
            "c2",
            "3",
            2,
            vec![
                message("m1", "3", "Did you see the new plan?", "10:12"),
                message("m2", "3", "Let me know what you think", "10:14"),
            ],
        ),
        chat(
            "c3",
            "4",
            1,
            vec![
                message("m1", SELF_ID, "Happy birthday Daisy! 🎉", "08:30"),
                message("m2", "4", "Thank you so much! ❤️", "08:41"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_unique() {
        let mut ids: Vec<_> = group_messages().into_iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_seed_chats_denormalized() {
        for chat in chats() {
            assert_eq!(chat.messages.len(), 2);
            let last = chat.messages.last().unwrap();
            assert_eq!(chat.last_message, last.text);
            assert_eq!(chat.last_time, last.time);
        }
    }

    #[test]
    fn test_seed_chat_peers_exist() {
        let users = users();
        for chat in chats() {
            assert!(users.iter().any(|u| u.id == chat.user_id));
            assert_ne!(chat.user_id, SELF_ID);
        }
    }
}
