//! Top-level layout and the header, typing and status bars.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
    Frame,
};

use crate::store::{self, Store};

use super::app::{App, Pane};
use super::compose;
use super::debug_log;
use super::help;
use super::messages;
use super::picker;
use super::search;
use super::sidebar;
use super::text;
use super::theme::Theme;

/// Sidebar width per layout.
fn sidebar_width(layout: store::Layout) -> u16 {
    match layout {
        store::Layout::Messenger => 34,
        store::Layout::Whatsapp => 38,
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.store.is_dark_mode());
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.base()), area);

    let log_height = if app.debug_log.visible {
        debug_log::DEBUG_LOG_HEIGHT
    } else {
        0
    };
    let [header_area, main_area, log_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(log_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), &app.store, &theme);

    let content_area = if app.store.is_sidebar_open() {
        let [sidebar_area, content_area] = Layout::horizontal([
            Constraint::Length(sidebar_width(app.store.layout())),
            Constraint::Fill(1),
        ])
        .areas(main_area);
        sidebar::render(
            sidebar_area,
            frame.buffer_mut(),
            &app.sidebar,
            &app.store,
            &theme,
            app.active_pane == Pane::Sidebar,
        );
        content_area
    } else {
        main_area
    };

    let [messages_area, typing_area, compose_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(compose::COMPOSE_HEIGHT),
    ])
    .areas(content_area);

    messages::render(
        messages_area,
        frame.buffer_mut(),
        &app.messages,
        &app.store,
        &theme,
        app.active_pane == Pane::Messages,
    );
    render_typing(typing_area, frame.buffer_mut(), &app.store, &theme, app.tick);
    compose::render(
        compose_area,
        frame,
        &app.compose,
        &app.store,
        &theme,
        app.active_pane == Pane::Compose && !app.has_overlay(),
    );

    if log_height > 0 {
        debug_log::render(log_area, frame.buffer_mut(), &app.debug_log, &theme);
    }
    render_status(status_area, frame.buffer_mut(), app, &theme);

    // Overlays, lowest first.
    search::render_search_overlay(frame, &app.search, &app.store, &theme);
    picker::render(frame, &app.picker, &theme);
    if let Some(prompt) = &app.prompt {
        compose::render_prompt(frame, prompt, &theme);
    }
    if app.show_help {
        help::render_help_popup(frame, &theme);
    }
}

/// Header: app name, room title on the left; own status on the right.
fn render_header(area: Rect, buf: &mut Buffer, store: &Store, theme: &Theme) {
    let title = match store.layout() {
        store::Layout::Messenger => " Messenger",
        store::Layout::Whatsapp => " WhatsApp",
    };
    let room = format!("  {}", store.room_title());
    let subtitle = match store.layout() {
        store::Layout::Messenger => "  All online users".to_string(),
        store::Layout::Whatsapp => String::new(),
    };
    let right = format!("[?] Help  ● {}  {} ", store.status(), if store.is_dark_mode() { "☾" } else { "☀" });

    let used = text::width(title) + text::width(&room) + text::width(&subtitle) + text::width(&right);
    let pad = (area.width as usize).saturating_sub(used);

    let line = Line::from(vec![
        Span::styled(title, theme.accent().add_modifier(Modifier::BOLD)),
        Span::styled(room, theme.bold()),
        Span::styled(subtitle, theme.muted()),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, theme.accent()),
    ]);
    Paragraph::new(line).style(theme.bar()).render(area, buf);
}

/// Typing indicator: "Bob typing..." for every typing peer in the room, with animated dots.
fn render_typing(area: Rect, buf: &mut Buffer, store: &Store, theme: &Theme, tick: u64) {
    let typing = store.room_typing_users();
    if typing.is_empty() {
        return;
    }
    let dots = ".".repeat((tick % 3) as usize + 1);
    let mut spans = vec![Span::raw(" ")];
    for user in typing {
        spans.push(Span::styled(
            user.name.clone(),
            theme.accent().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" typing{:<3}   ", dots), theme.muted()));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);
}

/// Status bar: transient message, or pane and key hints.
fn render_status(area: Rect, buf: &mut Buffer, app: &App, theme: &Theme) {
    if let Some(msg) = &app.status_message {
        let style = if app.status_is_error {
            Style::default().fg(theme.error)
        } else {
            theme.accent()
        };
        Paragraph::new(Line::from(Span::styled(format!(" {} ", msg), style)))
            .style(theme.bar())
            .render(area, buf);
        return;
    }

    let sep = Span::styled(" | ", theme.muted());
    let mut spans = vec![
        Span::styled(format!(" {} ", app.store.layout()), theme.accent()),
        sep.clone(),
        Span::styled(format!("Tab: {}", app.active_pane.as_str()), theme.bold()),
        sep.clone(),
        Span::styled("?: help", theme.muted()),
    ];
    if app.store.layout() == store::Layout::Whatsapp {
        spans.push(sep.clone());
        spans.push(Span::styled("/: search", theme.muted()));
    }
    if app.store.draft().recording {
        spans.push(sep);
        spans.push(Span::styled("● recording", Style::default().fg(theme.error)));
    }

    Paragraph::new(Line::from(spans))
        .style(theme.bar())
        .render(area, buf);
}
