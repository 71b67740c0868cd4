//! Non-interactive commands.
//!
//! Every command starts from a freshly seeded store, so changes made here are
//! printed and then forgotten.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::models::{Message, SELF_ID};
use crate::store::{ChatFilter, Layout, Store};

/// List users with status and flags
pub fn list_users() -> Result<()> {
    let store = Store::new(Layout::Messenger);

    println!("\nUsers:");
    for user in store.users() {
        let you = if user.id == SELF_ID { " (you)" } else { "" };
        let online = if user.online { "*" } else { "o" };
        let typing = if user.typing { " typing..." } else { "" };
        println!(
            "  {} [{}] {}{} - {}{}",
            online, user.id, user.name, you, user.status, typing
        );
    }

    Ok(())
}

/// List chats matching an optional name query and filter
pub fn list_chats(query: Option<&str>, filter: ChatFilter) -> Result<()> {
    let mut store = Store::new(Layout::Whatsapp);
    if let Some(q) = query {
        store.set_search(q)?;
    }
    store.set_filter(filter)?;

    let chats = store.filtered_chats();
    if chats.is_empty() {
        println!("No chats found.");
        return Ok(());
    }

    println!("\nChats ({}):", filter);
    for chat in chats {
        let unread = if chat.unread > 0 {
            format!(" ({} unread)", chat.unread)
        } else {
            String::new()
        };
        println!(
            "  [{}] {}{}  {} {}",
            chat.id,
            store.user_name(&chat.user_id),
            unread,
            chat.last_time,
            chat.last_message
        );
    }

    Ok(())
}

/// Build a store positioned on the requested conversation.
fn store_for(chat_id: Option<&str>) -> Result<Store> {
    match chat_id {
        None => Ok(Store::new(Layout::Messenger)),
        Some(id) => {
            let mut store = Store::new(Layout::Whatsapp);
            store
                .select_chat(id)
                .with_context(|| format!("Cannot open chat {}", id))?;
            Ok(store)
        }
    }
}

/// Format one message for terminal output.
pub fn format_message(store: &Store, msg: &Message) -> String {
    let mut out = format!(
        "[{}] {} {}: {}",
        msg.id,
        msg.time,
        store.user_name(&msg.user_id),
        msg.text
    );
    if let Some(image) = &msg.image {
        out.push_str(&format!("\n      [image] {}", image));
    }
    if let Some(file) = &msg.file {
        out.push_str(&format!("\n      [file] {}", file));
    }
    if msg.voice.is_some() {
        out.push_str("\n      [voice] Voice message");
    }
    let reactions: Vec<String> = msg
        .reaction_counts(SELF_ID)
        .iter()
        .map(|r| format!("{} {}", r.emoji, r.count))
        .collect();
    if !reactions.is_empty() {
        out.push_str(&format!("\n      {}", reactions.join("  ")));
    }
    out
}

fn print_messages(store: &Store, limit: usize) {
    let messages = store.messages();
    let skip = messages.len().saturating_sub(limit);
    println!("\n{}:", store.room_title());
    for msg in &messages[skip..] {
        println!("  {}", format_message(store, msg));
    }
}

/// Print messages of the group room or of a chat
pub fn read_messages(chat_id: Option<&str>, limit: usize) -> Result<()> {
    let store = store_for(chat_id)?;
    print_messages(&store, limit);
    Ok(())
}

/// Options for the `send` command.
pub struct SendOptions<'a> {
    pub chat_id: Option<&'a str>,
    pub text: &'a str,
    pub image: Option<&'a str>,
    pub file: Option<&'a str>,
    pub voice: bool,
}

/// Send a message and print the conversation tail
pub fn send_message(opts: SendOptions<'_>) -> Result<()> {
    let mut store = store_for(opts.chat_id)?;
    if let Some(image) = opts.image {
        store.attach_image(image);
    }
    if let Some(file) = opts.file {
        store.attach_file(file);
    }
    if opts.voice {
        store.toggle_recording();
    }

    match store.send_text(opts.text) {
        Some(msg) => println!("Sent {}", msg.id),
        None => println!("Nothing to send (blank message, no attachment)."),
    }
    print_messages(&store, 5);
    Ok(())
}

/// Toggle a reaction in the group room and print the message
pub fn react(message_id: &str, emoji: &str) -> Result<()> {
    let mut store = Store::new(Layout::Messenger);
    let added = store.toggle_reaction(message_id, emoji)?;
    println!(
        "{} {} {}",
        if added { "Added" } else { "Removed" },
        emoji,
        message_id
    );
    if let Some(msg) = store.messages().iter().find(|m| m.id == message_id) {
        println!("  {}", format_message(&store, msg));
    }
    Ok(())
}

/// Print the whole seeded store as JSON
pub fn dump(layout: Layout) -> Result<()> {
    let store = Store::new(layout);
    let json = serde_json::to_string_pretty(&store).context("Failed to serialize store")?;
    println!("{}", json);
    Ok(())
}

/// Print the config path and effective values, optionally writing defaults
pub fn show_config(init: bool) -> Result<()> {
    if init {
        let path = Config::default().save()?;
        println!("Wrote default config to {}", path.display());
    }

    let path = Config::config_path()?;
    let config = Config::load()?;
    println!("\nConfig: {}", path.display());
    println!("  layout: {}", config.layout);
    println!("  dark_mode: {}", config.dark_mode);
    println!("  typing_interval_secs: {}", config.typing_interval_secs);
    println!("  typing_probability: {}", config.typing_probability);
    println!("  time_format: {}", config.time_format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_with_attachments() {
        let store = Store::new(Layout::Messenger);
        let plan = &store.messages()[2];
        let text = format_message(&store, plan);
        assert!(text.starts_with("[m3] 09:02 Charlie: Morning everyone!"));
        assert!(text.contains("[file] ProjectPlan.pdf"));
        assert!(text.contains("👍 1"));
    }

    #[test]
    fn test_store_for_unknown_chat() {
        let err = store_for(Some("c42")).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown chat: c42"));
    }

    #[test]
    fn test_store_for_selects_chat() {
        let store = store_for(Some("c2")).unwrap();
        assert_eq!(store.room_title(), "Charlie");
    }
}
