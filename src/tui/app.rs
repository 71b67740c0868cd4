//! TUI application state and main event loop

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use rand::Rng;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::Config;
use crate::models::EMOJI_PALETTE;
use crate::store::{Layout, Store, StoreError};

use super::compose::{AttachKind, AttachPrompt};
use super::debug_log::DebugLogState;
use super::input::LineInput;
use super::log_capture::LogBuffer;
use super::messages::MessagesState;
use super::picker::EmojiPicker;
use super::search::SearchState;
use super::sidebar::SidebarState;
use super::ui;

/// Redraw interval; also drives the typing-dots animation.
const FRAME_DURATION_MS: u64 = 250;

/// Frames a status message stays visible.
const STATUS_FRAMES: u32 = 12;

/// Active pane in the TUI
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sidebar,
    Messages,
    #[default]
    Compose,
}

impl Pane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pane::Sidebar => "sidebar",
            Pane::Messages => "messages",
            Pane::Compose => "compose",
        }
    }

    fn next(self) -> Pane {
        match self {
            Pane::Sidebar => Pane::Messages,
            Pane::Messages => Pane::Compose,
            Pane::Compose => Pane::Sidebar,
        }
    }

    fn previous(self) -> Pane {
        match self {
            Pane::Sidebar => Pane::Compose,
            Pane::Messages => Pane::Sidebar,
            Pane::Compose => Pane::Messages,
        }
    }
}

/// Application state
pub struct App {
    pub store: Store,
    pub should_exit: bool,
    pub active_pane: Pane,
    pub sidebar: SidebarState,
    pub messages: MessagesState,
    pub compose: LineInput,
    pub picker: EmojiPicker,
    pub search: SearchState,
    pub prompt: Option<AttachPrompt>,
    pub show_help: bool,
    pub debug_log: DebugLogState,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    status_ttl: u32,
    /// Frame counter for animations
    pub tick: u64,
    typing_probability: f64,
}

impl App {
    pub fn new(store: Store, logs: LogBuffer, typing_probability: f64) -> Self {
        let mut app = Self {
            store,
            should_exit: false,
            active_pane: Pane::default(),
            sidebar: SidebarState::default(),
            messages: MessagesState::default(),
            compose: LineInput::default(),
            picker: EmojiPicker::default(),
            search: SearchState::default(),
            prompt: None,
            show_help: false,
            debug_log: DebugLogState::new(logs),
            status_message: None,
            status_is_error: false,
            status_ttl: 0,
            tick: 0,
            typing_probability,
        };
        app.sidebar.follow_selection(&app.store);
        app.messages.sync(app.store.messages().len());
        app
    }

    /// Any popup that captures keyboard input.
    pub fn has_overlay(&self) -> bool {
        self.show_help || self.prompt.is_some() || self.picker.is_open() || self.search.active
    }

    fn set_status(&mut self, msg: impl Into<String>, is_error: bool) {
        self.status_message = Some(msg.into());
        self.status_is_error = is_error;
        self.status_ttl = STATUS_FRAMES;
    }

    fn report(&mut self, result: Result<(), StoreError>) {
        if let Err(e) = result {
            tracing::warn!("{}", e);
            self.set_status(e.to_string(), true);
        }
    }

    /// Per-frame housekeeping.
    pub fn on_frame(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.debug_log.refresh();
        if self.status_ttl > 0 {
            self.status_ttl -= 1;
            if self.status_ttl == 0 {
                self.status_message = None;
            }
        }
    }

    /// Typing simulator tick.
    pub fn on_typing_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.store.simulate_typing(rng, self.typing_probability);
    }

    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
        // Resize is picked up by the next draw.
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if self.picker.is_open() {
            self.handle_picker_key(key);
            return;
        }
        if self.search.active {
            self.handle_search_key(key);
            return;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('b') => {
                    let open = self.store.toggle_sidebar();
                    if !open && self.active_pane == Pane::Sidebar {
                        self.active_pane = Pane::Messages;
                    }
                }
                KeyCode::Char('t') => {
                    self.store.toggle_dark_mode();
                }
                KeyCode::Char('d') => self.debug_log.toggle(),
                KeyCode::Char('r') => {
                    let on = self.store.toggle_recording();
                    self.set_status(
                        if on {
                            "Recording: next message is a voice message"
                        } else {
                            "Recording stopped"
                        },
                        false,
                    );
                }
                KeyCode::Char('g') => self.prompt = Some(AttachPrompt::new(AttachKind::Image)),
                KeyCode::Char('o') => self.prompt = Some(AttachPrompt::new(AttachKind::File)),
                KeyCode::Char('u') => {
                    self.compose.clear();
                    self.store.set_draft_text("");
                }
                KeyCode::Up if self.debug_log.visible => self.debug_log.scroll_up(1),
                KeyCode::Down if self.debug_log.visible => self.debug_log.scroll_down(1),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.cycle_pane(Pane::next);
                return;
            }
            KeyCode::BackTab => {
                self.cycle_pane(Pane::previous);
                return;
            }
            _ => {}
        }

        match self.active_pane {
            Pane::Compose => self.handle_compose_key(key),
            Pane::Messages => self.handle_messages_key(key),
            Pane::Sidebar => self.handle_sidebar_key(key),
        }
    }

    fn cycle_pane(&mut self, step: fn(Pane) -> Pane) {
        let mut pane = step(self.active_pane);
        if pane == Pane::Sidebar && !self.store.is_sidebar_open() {
            pane = step(pane);
        }
        self.active_pane = pane;
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.send(),
            KeyCode::Esc => self.active_pane = Pane::Messages,
            KeyCode::Char(c) => {
                self.compose.insert_char(c);
                self.store.set_draft_text(self.compose.as_str());
            }
            KeyCode::Backspace => {
                self.compose.backspace();
                self.store.set_draft_text(self.compose.as_str());
            }
            KeyCode::Delete => {
                self.compose.delete();
                self.store.set_draft_text(self.compose.as_str());
            }
            KeyCode::Left => self.compose.move_left(),
            KeyCode::Right => self.compose.move_right(),
            KeyCode::Home => self.compose.move_home(),
            KeyCode::End => self.compose.move_end(),
            _ => {}
        }
    }

    /// Send the draft. Blank drafts without attachments are ignored.
    fn send(&mut self) {
        if self.store.send_message().is_some() {
            self.compose.clear();
            self.messages.follow_latest();
            self.messages.sync(self.store.messages().len());
        }
    }

    fn handle_messages_key(&mut self, key: KeyEvent) {
        let count = self.store.messages().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.messages.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.messages.select_next(count),
            KeyCode::Char('g') => self.messages.select_first(),
            KeyCode::Char('G') => self.messages.follow_latest(),
            KeyCode::Char('+') | KeyCode::Char('e') => {
                if let Some(id) = self.messages.selected_id(&self.store) {
                    self.picker.open(id, self.store.recent_emojis());
                }
            }
            KeyCode::Char(c @ '1'..='6') => {
                let n = c as usize - '1' as usize;
                if let Some(id) = self.messages.selected_id(&self.store) {
                    let result = self.store.toggle_reaction(&id, EMOJI_PALETTE[n]).map(|_| ());
                    self.report(result);
                }
            }
            KeyCode::Char('i') | KeyCode::Enter => self.active_pane = Pane::Compose,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') => self.should_exit = true,
            _ => {}
        }
        self.messages.sync(self.store.messages().len());
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.sidebar.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.sidebar.move_down(&self.store),
            KeyCode::Char('s') => {
                let next = self.store.status().next_selectable();
                self.store.set_status(next);
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') => self.should_exit = true,
            KeyCode::Esc => self.active_pane = Pane::Messages,
            _ if self.store.layout() == Layout::Whatsapp => self.handle_chat_list_key(key),
            _ => {}
        }
    }

    fn handle_chat_list_key(&mut self, key: KeyEvent) {
        let under_cursor = self.sidebar.chat_under_cursor(&self.store);
        match key.code {
            KeyCode::Enter => {
                if let Some(id) = under_cursor {
                    let result = self.store.select_chat(&id);
                    self.report(result);
                    self.messages.follow_latest();
                    self.active_pane = Pane::Compose;
                }
            }
            KeyCode::Char('/') => self.search.activate(&self.store),
            KeyCode::Char('f') => {
                let next = self
                    .store
                    .chat_list()
                    .map(|l| l.filter().next())
                    .unwrap_or_default();
                let result = self.store.set_filter(next);
                self.report(result);
                self.sidebar.clamp(&self.store);
            }
            KeyCode::Char('p') => {
                if let Some(id) = under_cursor {
                    let result = self.store.toggle_pin(&id).map(|_| ());
                    self.report(result);
                    self.sidebar.clamp(&self.store);
                }
            }
            KeyCode::Char('m') => {
                if let Some(id) = under_cursor {
                    let result = self.store.toggle_mute(&id).map(|_| ());
                    self.report(result);
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = under_cursor {
                    let result = self.store.mark_as_read(&id);
                    self.report(result);
                    self.sidebar.clamp(&self.store);
                }
            }
            _ => {}
        }
        self.messages.sync(self.store.messages().len());
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                let result = self.search.cancel(&mut self.store);
                self.report(result);
            }
            KeyCode::Enter => {
                let result = self.search.open_selected(&mut self.store).map(|_| ());
                self.report(result);
                self.search.deactivate();
                self.sidebar.follow_selection(&self.store);
                self.messages.follow_latest();
                self.messages.sync(self.store.messages().len());
            }
            KeyCode::Up => self.search.select_previous(),
            KeyCode::Down => self.search.select_next(&self.store),
            KeyCode::Left => self.search.input.move_left(),
            KeyCode::Right => self.search.input.move_right(),
            KeyCode::Backspace => {
                self.search.input.backspace();
                let result = self.search.apply(&mut self.store);
                self.report(result);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.input.insert_char(c);
                let result = self.search.apply(&mut self.store);
                self.report(result);
            }
            _ => {}
        }
        self.sidebar.clamp(&self.store);
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let result = match key.code {
            KeyCode::Esc => {
                self.picker.close();
                Ok(None)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.picker.move_left();
                Ok(None)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.picker.move_right();
                Ok(None)
            }
            KeyCode::Enter => self.picker.apply(&mut self.store),
            KeyCode::Char(c @ '1'..='6') => {
                let n = c as usize - '1' as usize;
                self.picker.apply_palette(&mut self.store, n)
            }
            _ => Ok(None),
        };
        self.report(result.map(|_| ()));
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    if prompt.confirm(&mut self.store) {
                        self.active_pane = Pane::Compose;
                    }
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                prompt.input.insert_char(c)
            }
            KeyCode::Backspace => prompt.input.backspace(),
            KeyCode::Delete => prompt.input.delete(),
            KeyCode::Left => prompt.input.move_left(),
            KeyCode::Right => prompt.input.move_right(),
            KeyCode::Home => prompt.input.move_home(),
            KeyCode::End => prompt.input.move_end(),
            _ => {}
        }
    }

    /// Render the UI
    pub fn render(&self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Run the TUI. `ratatui::init` installs a panic hook that restores the terminal.
pub async fn run(layout: Layout, config: &Config, logs: LogBuffer) -> Result<()> {
    let store = Store::new(layout)
        .with_time_format(&config.time_format)
        .with_dark_mode(config.dark_mode);
    let app = App::new(store, logs, config.typing_probability);

    tracing::info!("Starting TUI ({} layout)", layout);
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, app, config.typing_interval()).await;
    ratatui::restore();
    result
}

async fn run_app(terminal: &mut DefaultTerminal, mut app: App, typing_every: Duration) -> Result<()> {
    let mut events = EventStream::new();
    let mut frames = time::interval(Duration::from_millis(FRAME_DURATION_MS));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // Dropped with this future, which stops the simulator on teardown.
    let mut typing = time::interval_at(Instant::now() + typing_every, typing_every);
    let mut rng = rand::rng();

    while !app.should_exit {
        terminal
            .draw(|frame| app.render(frame))
            .context("Failed to draw frame")?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => app.handle_event(event),
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },
            _ = typing.tick() => app.on_typing_tick(&mut rng),
            _ = frames.tick() => app.on_frame(),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SELF_ID;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app(layout: Layout) -> App {
        App::new(Store::new(layout), LogBuffer::new(), 0.1)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_type_and_send() {
        let mut app = app(Layout::Messenger);
        type_str(&mut app, "hi");
        assert!(app.store.user(SELF_ID).unwrap().typing);
        press(&mut app, KeyCode::Enter);

        let last = app.store.messages().last().unwrap();
        assert_eq!(last.text, "hi");
        assert_eq!(last.user_id, SELF_ID);
        assert!(app.compose.is_empty());
        assert_eq!(app.messages.selected, 3);
        assert!(!app.store.user(SELF_ID).unwrap().typing);
    }

    #[test]
    fn test_blank_enter_keeps_compose() {
        let mut app = app(Layout::Messenger);
        type_str(&mut app, "  ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.messages().len(), 3);
        assert_eq!(app.compose.as_str(), "  ");
    }

    #[test]
    fn test_voice_message_via_recording() {
        let mut app = app(Layout::Messenger);
        ctrl(&mut app, 'r');
        press(&mut app, KeyCode::Enter);
        let last = app.store.messages().last().unwrap();
        assert!(last.voice.is_some());
        assert!(!app.store.draft().recording);
    }

    #[test]
    fn test_attach_prompt_flow() {
        let mut app = app(Layout::Messenger);
        ctrl(&mut app, 'o');
        assert!(app.prompt.is_some());
        type_str(&mut app, "/tmp/notes.txt");
        press(&mut app, KeyCode::Enter);
        assert!(app.prompt.is_none());
        assert_eq!(app.store.draft().file.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_quick_reaction_from_messages_pane() {
        let mut app = app(Layout::Messenger);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.active_pane, Pane::Messages);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char('6'));
        assert!(app.store.messages()[1].has_reacted("🔥", SELF_ID));
        assert_eq!(app.store.recent_emojis(), &["🔥".to_string()]);
    }

    #[test]
    fn test_picker_from_messages_pane() {
        let mut app = app(Layout::Messenger);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('+'));
        assert!(app.picker.is_open());
        press(&mut app, KeyCode::Enter);
        assert!(!app.picker.is_open());
        // m3 had the local user's 👍; the first palette entry removes it.
        assert!(app.store.messages()[2].reactions.is_empty());
    }

    #[test]
    fn test_status_cycle_in_sidebar() {
        let mut app = app(Layout::Messenger);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_pane, Pane::Sidebar);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.store.status(), crate::models::Presence::Brb);
    }

    #[test]
    fn test_tab_skips_hidden_sidebar() {
        let mut app = app(Layout::Messenger);
        ctrl(&mut app, 'b');
        assert!(!app.store.is_sidebar_open());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_pane, Pane::Messages);
    }

    #[test]
    fn test_open_chat_from_sidebar() {
        let mut app = app(Layout::Whatsapp);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.room_title(), "Charlie");
        assert_eq!(app.active_pane, Pane::Compose);
        let chat = app.store.chat_list().unwrap().selected().unwrap();
        assert_eq!(chat.unread, 0);
    }

    #[test]
    fn test_search_overlay_selects_chat() {
        let mut app = app(Layout::Whatsapp);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search.active);
        type_str(&mut app, "dai");
        press(&mut app, KeyCode::Enter);
        assert!(!app.search.active);
        assert_eq!(app.store.room_title(), "Daisy");
        assert_eq!(app.sidebar.selected, 0);
    }

    #[test]
    fn test_ctrl_keys_not_typed_into_overlays() {
        let mut app = app(Layout::Whatsapp);
        ctrl(&mut app, 'g');
        ctrl(&mut app, 'u');
        type_str(&mut app, "a.png");
        assert_eq!(app.prompt.as_ref().unwrap().input.as_str(), "a.png");
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('/'));
        ctrl(&mut app, 'b');
        ctrl(&mut app, 't');
        assert!(app.search.input.is_empty());
        assert_eq!(app.store.filtered_chats().len(), 3);
    }

    #[test]
    fn test_ctrl_c_exits_from_anywhere() {
        let mut app = app(Layout::Messenger);
        ctrl(&mut app, 'g');
        ctrl(&mut app, 'c');
        assert!(app.should_exit);
    }

    #[test]
    fn test_status_message_expires() {
        let mut app = app(Layout::Messenger);
        ctrl(&mut app, 'r');
        assert!(app.status_message.is_some());
        for _ in 0..STATUS_FRAMES {
            app.on_frame();
        }
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_render_both_layouts() {
        for layout in [Layout::Messenger, Layout::Whatsapp] {
            let mut app = app(layout);
            app.show_help = true;
            app.debug_log.toggle();
            let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
            terminal.draw(|frame| app.render(frame)).unwrap();
        }
    }
}
