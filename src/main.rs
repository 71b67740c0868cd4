//! chat-mock - Terminal mock of a two-layout chat client
//!
//! Seeded users and conversations, reactions, attachments and a simulated
//! typing indicator. Nothing leaves the process.

mod commands;
mod config;
mod models;
mod seed;
mod store;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::store::{ChatFilter, Layout};

#[derive(Parser)]
#[command(name = "chat-mock")]
#[command(about = "Terminal mock of a messenger-style chat client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List seeded users and their status
    Users,

    /// List chats (whatsapp layout)
    Chats {
        /// Case-insensitive name search
        #[arg(short, long)]
        query: Option<String>,

        /// Filter: all, unread, pinned
        #[arg(short, long, default_value = "all")]
        filter: ChatFilter,
    },

    /// Read messages from the group room or a chat
    Read {
        /// Chat ID (from `chats` output); omit for the group room
        chat_id: Option<String>,

        /// Maximum number of messages to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Send a message as the local user
    Send {
        /// Chat ID (from `chats` output); omit for the group room
        #[arg(short, long)]
        to: Option<String>,

        /// Attach an image by path
        #[arg(long)]
        image: Option<String>,

        /// Attach a file by path
        #[arg(long)]
        file: Option<String>,

        /// Send as a voice message
        #[arg(long)]
        voice: bool,

        /// Message content
        #[arg(default_value = "")]
        message: String,
    },

    /// Toggle a reaction on a group room message
    React {
        /// Message ID (e.g. m1)
        message_id: String,

        /// Emoji to toggle
        emoji: String,
    },

    /// Print the seeded store as JSON
    Dump {
        /// Layout: messenger or whatsapp
        #[arg(short, long, default_value = "messenger")]
        layout: Layout,
    },

    /// Show the configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },

    /// Launch the terminal user interface
    Tui {
        /// Layout override: messenger or whatsapp
        #[arg(short, long)]
        layout: Option<Layout>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());
    let logs = tui::LogBuffer::new();
    if matches!(cli.command, Commands::Tui { .. }) {
        // The TUI owns the terminal; logs go to its log pane instead.
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(logs.clone()),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    match cli.command {
        Commands::Users => commands::list_users()?,
        Commands::Chats { query, filter } => {
            commands::list_chats(query.as_deref(), filter)?;
        }
        Commands::Read { chat_id, limit } => {
            commands::read_messages(chat_id.as_deref(), limit)?;
        }
        Commands::Send {
            to,
            image,
            file,
            voice,
            message,
        } => {
            tracing::debug!("Sending message...");
            commands::send_message(commands::SendOptions {
                chat_id: to.as_deref(),
                text: &message,
                image: image.as_deref(),
                file: file.as_deref(),
                voice,
            })?;
        }
        Commands::React { message_id, emoji } => commands::react(&message_id, &emoji)?,
        Commands::Dump { layout } => commands::dump(layout)?,
        Commands::Config { init } => commands::show_config(init)?,
        Commands::Tui { layout } => {
            let config = config::Config::load()?;
            let layout = layout.unwrap_or(config.layout);
            tui::run(layout, &config, logs).await?;
        }
    }

    Ok(())
}
