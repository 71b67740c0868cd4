//! Append-only message list operations shared by both layouts.

use std::collections::BTreeMap;

use crate::models::{Message, VOICE_REFERENCE};

use super::Draft;

/// Next free sequential id: `m{len+1}`, bumped past any seeded collision.
fn next_id(messages: &[Message]) -> String {
    let mut n = messages.len() + 1;
    loop {
        let id = format!("m{}", n);
        if !messages.iter().any(|m| m.id == id) {
            return id;
        }
        n += 1;
    }
}

/// Append a message built from `draft`. The text is stored untrimmed.
pub(crate) fn append(messages: &mut Vec<Message>, author: &str, draft: Draft, time: String) {
    let message = Message {
        id: next_id(messages),
        user_id: author.to_string(),
        text: draft.text,
        time,
        reactions: BTreeMap::new(),
        image: draft.image,
        file: draft.file,
        voice: draft.recording.then(|| VOICE_REFERENCE.to_string()),
    };
    messages.push(message);
}

pub(crate) fn find_mut<'a>(messages: &'a mut [Message], id: &str) -> Option<&'a mut Message> {
    messages.iter_mut().find(|m| m.id == id)
}
