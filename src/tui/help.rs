//! Help popup listing keyboard shortcuts.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::Theme;

const POPUP_WIDTH: u16 = 80;
const POPUP_HEIGHT: u16 = 24;

/// Key binding and what it does.
type Shortcut = (&'static str, &'static str);

struct Category {
    title: &'static str,
    shortcuts: &'static [Shortcut],
}

const NAVIGATION: Category = Category {
    title: "NAVIGATION",
    shortcuts: &[
        ("Tab", "Next pane"),
        ("Shift+Tab", "Previous pane"),
        ("Up/Down", "Move within pane"),
        ("g / G", "First / newest message"),
        ("Esc", "Back / close popup"),
    ],
};

const SIDEBAR: Category = Category {
    title: "SIDEBAR",
    shortcuts: &[
        ("s", "Cycle your status"),
        ("Enter", "Open chat"),
        ("/", "Search chats"),
        ("f", "Cycle filter all/unread/pinned"),
        ("p / m", "Pin / mute chat"),
        ("r", "Mark chat read"),
    ],
};

const MESSAGES: Category = Category {
    title: "MESSAGES",
    shortcuts: &[
        ("+ or e", "React to message"),
        ("1-6", "Quick reaction"),
        ("i / Enter", "Write a message"),
    ],
};

const COMPOSE: Category = Category {
    title: "COMPOSE",
    shortcuts: &[
        ("Enter", "Send"),
        ("Ctrl+U", "Clear message"),
        ("Ctrl+G", "Attach image"),
        ("Ctrl+O", "Attach file"),
        ("Ctrl+R", "Toggle voice recording"),
    ],
};

const MISC: Category = Category {
    title: "MISC",
    shortcuts: &[
        ("Ctrl+B", "Toggle sidebar"),
        ("Ctrl+T", "Toggle dark mode"),
        ("Ctrl+D", "Toggle log pane"),
        ("?", "Toggle this help"),
        ("q / Ctrl+C", "Quit"),
    ],
};

/// Render the help popup centered on screen.
pub fn render_help_popup(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    let popup_w = POPUP_WIDTH.min(area.width.saturating_sub(2));
    let popup_h = POPUP_HEIGHT.min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(popup_w) / 2,
        area.y + area.height.saturating_sub(popup_h) / 2,
        popup_w,
        popup_h,
    );

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .title(Line::from(vec![
            Span::styled(" HELP ", theme.accent().add_modifier(Modifier::BOLD)),
            Span::styled("(? to close) ", theme.muted()),
        ]))
        .title_bottom(Line::from(Span::styled(
            " Press any key to close ",
            theme.muted(),
        )))
        .style(theme.bar());

    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    let left_lines = column_lines(&[&NAVIGATION, &SIDEBAR], theme);
    frame.render_widget(Paragraph::new(left_lines), inset(left));
    let right_lines = column_lines(&[&MESSAGES, &COMPOSE, &MISC], theme);
    frame.render_widget(Paragraph::new(right_lines), inset(right));
}

fn column_lines(categories: &[&Category], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, cat) in categories.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(cat.title, theme.bold())));
        for (key, desc) in cat.shortcuts {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", key), Style::default().fg(theme.accent)),
                Span::styled(*desc, Style::default().fg(theme.fg)),
            ]));
        }
    }
    lines
}

fn inset(area: Rect) -> Rect {
    Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}
