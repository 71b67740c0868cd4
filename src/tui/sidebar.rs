//! Sidebar widget: online users (messenger) or the chat list (whatsapp).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::models::{Presence, User, SELF_ID};
use crate::store::{Layout, Store};

use super::text;
use super::theme::Theme;

// ---------------------------------------------------------------------------
// Navigation state
// ---------------------------------------------------------------------------

/// Cursor over the sidebar rows.
#[derive(Default)]
pub struct SidebarState {
    /// Index into the visible rows (online users or filtered chats)
    pub selected: usize,
}

impl SidebarState {
    fn item_count(store: &Store) -> usize {
        match store.layout() {
            Layout::Messenger => store.online_users().len(),
            Layout::Whatsapp => store.filtered_chats().len(),
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, store: &Store) {
        if self.selected + 1 < Self::item_count(store) {
            self.selected += 1;
        }
    }

    /// Clamp after the visible list changed (search or filter).
    pub fn clamp(&mut self, store: &Store) {
        let count = Self::item_count(store);
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Id of the chat under the cursor (whatsapp layout only).
    pub fn chat_under_cursor(&self, store: &Store) -> Option<String> {
        store
            .filtered_chats()
            .get(self.selected)
            .map(|c| c.id.clone())
    }

    /// Move the cursor onto the store's selected chat if it is visible.
    pub fn follow_selection(&mut self, store: &Store) {
        let Some(list) = store.chat_list() else {
            return;
        };
        if let Some(pos) = store
            .filtered_chats()
            .iter()
            .position(|c| c.id == list.selected_id())
        {
            self.selected = pos;
        } else {
            self.clamp(store);
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the sidebar into the given area.
pub fn render(
    area: Rect,
    buf: &mut Buffer,
    state: &SidebarState,
    store: &Store,
    theme: &Theme,
    focused: bool,
) {
    let title = match store.layout() {
        Layout::Messenger => " Messenger ",
        Layout::Whatsapp => " Chats ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(theme.border(focused))
        .title(Span::styled(title, theme.accent().add_modifier(Modifier::BOLD)));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    match store.layout() {
        Layout::Messenger => render_users(inner, buf, state, store, theme, focused),
        Layout::Whatsapp => render_chats(inner, buf, state, store, theme, focused),
    }
}

/// Status selector row: the selectable statuses with the current one highlighted.
fn status_selector(current: Presence, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(" ", theme.muted())];
    for status in Presence::SELECTABLE {
        let style = if status == current {
            Style::default()
                .fg(theme.bar_bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            theme.muted()
        };
        spans.push(Span::styled(format!(" {} ", status), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_users(
    area: Rect,
    buf: &mut Buffer,
    state: &SidebarState,
    store: &Store,
    theme: &Theme,
    focused: bool,
) {
    let mut rows = area.height as usize;
    let mut y = area.y;

    // Status selector and section header take the first three rows.
    let header: [Line<'static>; 3] = [
        status_selector(store.status(), theme),
        Line::from(""),
        Line::from(Span::styled(" ONLINE USERS", theme.muted())),
    ];
    for line in header.into_iter().take(rows) {
        Paragraph::new(line).render(Rect::new(area.x, y, area.width, 1), buf);
        y += 1;
    }
    rows = rows.saturating_sub(3);
    if rows == 0 {
        return;
    }

    let users = store.online_users();
    let offset = compute_scroll_offset(state.selected, rows, users.len());
    for (row, idx) in (offset..users.len()).take(rows).enumerate() {
        let selected = focused && idx == state.selected;
        let row_area = Rect::new(area.x, y + row as u16, area.width, 1);
        render_user_row(row_area, buf, users[idx], theme, selected);
    }
}

fn render_user_row(area: Rect, buf: &mut Buffer, user: &User, theme: &Theme, selected: bool) {
    let base = if selected {
        theme.selected()
    } else {
        Style::default().fg(theme.fg)
    };
    let you = if user.id == SELF_ID { " (You)" } else { "" };
    let typing = if user.typing { " typing..." } else { "" };
    let left = format!(" ({}) {}{}", user.initial(), user.name, you);
    let detail = format!(" {}{}", user.status, typing);

    let dot_style = if user.online {
        Style::default().fg(theme.accent)
    } else {
        theme.muted()
    };
    render_row(
        buf,
        area,
        vec![
            Span::styled(left, base),
            Span::styled(detail, base.fg(theme.muted)),
        ],
        Span::styled("●", dot_style),
        base,
    );
}

fn render_chats(
    area: Rect,
    buf: &mut Buffer,
    state: &SidebarState,
    store: &Store,
    theme: &Theme,
    focused: bool,
) {
    let Some(list) = store.chat_list() else {
        return;
    };

    // First row: active search and filter.
    let search = if list.search().is_empty() {
        "/ search".to_string()
    } else {
        format!("/ {}", list.search())
    };
    let info = Line::from(vec![
        Span::styled(format!(" {}", search), theme.muted()),
        Span::styled(format!("  [{}]", list.filter()), theme.accent()),
    ]);
    Paragraph::new(info).render(Rect::new(area.x, area.y, area.width, 1), buf);

    // Each chat takes two rows: name line and preview line.
    let rows = area.height.saturating_sub(1) as usize / 2;
    let chats = store.filtered_chats();
    if rows == 0 {
        return;
    }
    if chats.is_empty() {
        let line = Line::from(Span::styled(" No chats found", theme.muted()));
        Paragraph::new(line).render(Rect::new(area.x, area.y + 1, area.width, 1), buf);
        return;
    }

    let offset = compute_scroll_offset(state.selected, rows, chats.len());
    for (row, idx) in (offset..chats.len()).take(rows).enumerate() {
        let chat = chats[idx];
        let y = area.y + 1 + (row * 2) as u16;
        let cursor = focused && idx == state.selected;
        let open = chat.id == list.selected_id();

        let base = if cursor {
            theme.selected()
        } else if open {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg)
        };

        let mut markers = String::new();
        if chat.pinned {
            markers.push_str(" ^");
        }
        if chat.muted {
            markers.push_str(" ~");
        }
        let name = store.user_name(&chat.user_id);
        let typing = store.user(&chat.user_id).is_ok_and(|u| u.typing);
        render_row(
            buf,
            Rect::new(area.x, y, area.width, 1),
            vec![Span::styled(format!(" {}{}", name, markers), base)],
            Span::styled(chat.last_time.clone(), base.fg(theme.muted)),
            base,
        );

        let preview = if typing {
            Span::styled("  typing...".to_string(), base.fg(theme.accent))
        } else {
            Span::styled(format!("  {}", chat.last_message), base.fg(theme.muted))
        };
        let badge = if chat.unread > 0 {
            Span::styled(
                format!(" {} ", chat.unread),
                Style::default()
                    .fg(theme.bar_bg)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        };
        render_row(
            buf,
            Rect::new(area.x, y + 1, area.width, 1),
            vec![preview],
            badge,
            base,
        );
    }
}

/// Keep the selected row visible.
fn compute_scroll_offset(selected: usize, height: usize, total: usize) -> usize {
    if total <= height || selected < height {
        return 0;
    }
    let max_offset = total.saturating_sub(height);
    selected.saturating_sub(height - 1).min(max_offset)
}

/// Render a row with left-aligned spans and a right-aligned badge.
fn render_row(buf: &mut Buffer, area: Rect, left: Vec<Span<'static>>, badge: Span<'static>, fill: Style) {
    let width = area.width as usize;
    if width == 0 {
        return;
    }

    let badge_w = text::width(&badge.content);
    let mut budget = width.saturating_sub(if badge_w > 0 { badge_w + 1 } else { 0 });

    let mut spans = Vec::new();
    let mut used = 0;
    for span in left {
        let content = text::truncate(&span.content, budget);
        let w = text::width(&content);
        budget -= w;
        used += w;
        spans.push(Span::styled(content, span.style));
    }

    let pad = width.saturating_sub(used + badge_w);
    spans.push(Span::styled(" ".repeat(pad), fill));
    spans.push(badge);

    Paragraph::new(Line::from(spans)).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset() {
        assert_eq!(compute_scroll_offset(0, 5, 3), 0);
        assert_eq!(compute_scroll_offset(4, 5, 10), 0);
        assert_eq!(compute_scroll_offset(7, 5, 10), 3);
        assert_eq!(compute_scroll_offset(9, 5, 10), 5);
    }

    #[test]
    fn test_navigation_clamps() {
        let store = Store::new(Layout::Whatsapp);
        let mut state = SidebarState::default();
        state.move_up();
        assert_eq!(state.selected, 0);
        for _ in 0..10 {
            state.move_down(&store);
        }
        assert_eq!(state.selected, 2);
        assert_eq!(state.chat_under_cursor(&store).as_deref(), Some("c3"));
    }

    #[test]
    fn test_clamp_after_search() {
        let mut store = Store::new(Layout::Whatsapp);
        let mut state = SidebarState { selected: 2 };
        store.set_search("bob").unwrap();
        state.clamp(&store);
        assert_eq!(state.selected, 0);

        store.set_search("nobody").unwrap();
        state.clamp(&store);
        assert_eq!(state.selected, 0);
        assert!(state.chat_under_cursor(&store).is_none());
    }

    #[test]
    fn test_follow_selection() {
        let mut store = Store::new(Layout::Whatsapp);
        store.select_chat("c3").unwrap();
        let mut state = SidebarState::default();
        state.follow_selection(&store);
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn test_messenger_rows_are_online_users() {
        let store = Store::new(Layout::Messenger);
        let mut state = SidebarState::default();
        for _ in 0..10 {
            state.move_down(&store);
        }
        assert_eq!(state.selected, store.online_users().len() - 1);
    }
}
