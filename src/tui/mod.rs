//! Terminal chat client built on Ratatui.

mod app;
mod compose;
mod debug_log;
mod help;
mod input;
mod log_capture;
mod messages;
mod picker;
mod search;
mod sidebar;
mod text;
mod theme;
mod ui;

pub use app::run;
pub use log_capture::LogBuffer;
