//! Messages pane: chat bubbles with attachments and reaction chips.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::models::{Message, SELF_ID};
use crate::store::Store;

use super::text;
use super::theme::Theme;

/// Selection state for the messages pane.
pub struct MessagesState {
    /// Index of the highlighted message.
    pub selected: usize,
    /// Keep the newest message selected as messages arrive.
    pub follow: bool,
}

impl Default for MessagesState {
    fn default() -> Self {
        Self {
            selected: 0,
            follow: true,
        }
    }
}

impl MessagesState {
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.follow = false;
    }

    pub fn select_next(&mut self, count: usize) {
        if self.selected + 1 < count {
            self.selected += 1;
        }
        self.follow = self.selected + 1 >= count;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.follow = false;
    }

    /// Jump to the newest message and keep following new ones.
    pub fn follow_latest(&mut self) {
        self.follow = true;
    }

    /// Resolve the effective selection for `count` messages.
    pub fn sync(&mut self, count: usize) {
        if self.follow {
            self.selected = count.saturating_sub(1);
        } else {
            self.selected = self.selected.min(count.saturating_sub(1));
        }
    }

    /// Id of the highlighted message.
    pub fn selected_id(&self, store: &Store) -> Option<String> {
        store.messages().get(self.selected).map(|m| m.id.clone())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the messages pane into the given area.
pub fn render(
    area: Rect,
    buf: &mut Buffer,
    state: &MessagesState,
    store: &Store,
    theme: &Theme,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(theme.border(focused));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let messages = store.messages();
    if messages.is_empty() {
        let line = Line::from(Span::styled(" No messages yet", theme.muted()));
        Paragraph::new(line).render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        return;
    }

    let (all_lines, ranges) = build_message_lines(store, state.selected, inner.width as usize, theme);
    let total_lines = all_lines.len();
    let visible_height = inner.height as usize;

    let scroll = compute_auto_scroll(state.selected, &ranges, visible_height, total_lines);

    for (row, line_idx) in (scroll..total_lines).take(visible_height).enumerate() {
        let line_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        Paragraph::new(all_lines[line_idx].clone()).render(line_area, buf);
    }

    if total_lines > visible_height {
        let x = inner.x + inner.width.saturating_sub(1);
        if scroll > 0 {
            let cell = &mut buf[(x, inner.y)];
            cell.set_char('^');
            cell.set_style(theme.muted());
        }
        if scroll + visible_height < total_lines {
            let cell = &mut buf[(x, inner.y + inner.height - 1)];
            cell.set_char('v');
            cell.set_style(theme.muted());
        }
    }
}

/// Build all bubble lines plus the line range of each message.
fn build_message_lines(
    store: &Store,
    selected: usize,
    width: usize,
    theme: &Theme,
) -> (Vec<Line<'static>>, Vec<(usize, usize)>) {
    let mut lines = Vec::new();
    let mut ranges = Vec::new();

    for (idx, msg) in store.messages().iter().enumerate() {
        let start = lines.len();
        render_bubble(&mut lines, store, msg, width, idx == selected, theme);
        lines.push(Line::from(""));
        ranges.push((start, lines.len()));
    }

    (lines, ranges)
}

/// One bubble. Own messages hug the right edge, peers the left.
fn render_bubble(
    lines: &mut Vec<Line<'static>>,
    store: &Store,
    msg: &Message,
    width: usize,
    is_selected: bool,
    theme: &Theme,
) {
    let mine = msg.user_id == SELF_ID;

    // Bubble at most 70% of the pane, never narrower than 16 columns.
    let bubble_w = (width * 7 / 10).max(16).min(width);
    if bubble_w < 8 {
        return;
    }
    let content_w = bubble_w - 4;
    let indent = if mine { width - bubble_w } else { 0 };
    let indent_str = " ".repeat(indent);

    let border = if is_selected {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else if mine {
        Style::default().fg(theme.own_bubble)
    } else {
        Style::default().fg(theme.peer_bubble)
    };

    let edge = format!("{}+{}+", indent_str, "-".repeat(bubble_w - 2));
    lines.push(Line::from(Span::styled(edge.clone(), border)));

    // Header: author (with initial) and time, plus a sent tick for own messages.
    let author = if mine {
        "You".to_string()
    } else {
        let name = store.user_name(&msg.user_id);
        format!("({}) {}", name.chars().next().unwrap_or('?'), name)
    };
    let time = if mine {
        format!("{} ✓", msg.time)
    } else {
        msg.time.clone()
    };
    let author = text::truncate(&author, content_w.saturating_sub(text::width(&time) + 1));
    let pad = content_w.saturating_sub(text::width(&author) + text::width(&time));
    push_row(
        lines,
        &indent_str,
        border,
        vec![
            Span::styled(author, theme.bold()),
            Span::raw(" ".repeat(pad)),
            Span::styled(time, theme.muted()),
        ],
    );

    for row in text::wrap(&msg.text, content_w) {
        let pad = content_w.saturating_sub(text::width(&row));
        push_row(
            lines,
            &indent_str,
            border,
            vec![Span::styled(row, Style::default().fg(theme.fg)), Span::raw(" ".repeat(pad))],
        );
    }

    let attachments = [
        msg.image.as_ref().map(|i| (format!("[image] {}", i), theme.link)),
        msg.file.as_ref().map(|f| (format!("[file] {}", f), theme.link)),
        msg.voice.as_ref().map(|_| ("[voice] Voice message".to_string(), theme.accent)),
    ];
    for (label, color) in attachments.into_iter().flatten() {
        let label = text::truncate(&label, content_w);
        let pad = content_w.saturating_sub(text::width(&label));
        push_row(
            lines,
            &indent_str,
            border,
            vec![
                Span::styled(label, Style::default().fg(color).add_modifier(Modifier::UNDERLINED)),
                Span::raw(" ".repeat(pad)),
            ],
        );
    }

    let chips = msg.reaction_counts(SELF_ID);
    if !chips.is_empty() {
        let mut spans = Vec::new();
        let mut used = 0;
        for chip in &chips {
            let label = format!(" {} {} ", chip.emoji, chip.count);
            let w = text::width(&label) + 1;
            if used + w > content_w {
                break;
            }
            used += w;
            let style = if chip.mine {
                Style::default().fg(theme.bar_bg).bg(theme.accent)
            } else {
                Style::default().fg(theme.fg).bg(theme.selection_bg)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::raw(" ".repeat(content_w.saturating_sub(used))));
        push_row(lines, &indent_str, border, spans);
    }

    lines.push(Line::from(Span::styled(edge, border)));
}

fn push_row(lines: &mut Vec<Line<'static>>, indent: &str, border: Style, body: Vec<Span<'static>>) {
    let mut spans = vec![Span::raw(indent.to_string()), Span::styled("| ", border)];
    spans.extend(body);
    spans.push(Span::styled(" |", border));
    lines.push(Line::from(spans));
}

/// Scroll offset that keeps the selected message visible.
fn compute_auto_scroll(
    selected: usize,
    ranges: &[(usize, usize)],
    visible_height: usize,
    total_lines: usize,
) -> usize {
    if total_lines <= visible_height {
        return 0;
    }
    let Some(&(sel_start, sel_end)) = ranges.get(selected) else {
        return 0;
    };

    let scroll = if sel_end.saturating_sub(sel_start) >= visible_height {
        sel_start
    } else {
        sel_end.saturating_sub(visible_height)
    };
    scroll.min(total_lines.saturating_sub(visible_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Layout;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_follow_tracks_newest() {
        let mut state = MessagesState::default();
        state.sync(3);
        assert_eq!(state.selected, 2);
        state.sync(4);
        assert_eq!(state.selected, 3);
    }

    #[test]
    fn test_manual_selection_stops_following() {
        let mut state = MessagesState::default();
        state.sync(3);
        state.select_previous();
        state.sync(4);
        assert_eq!(state.selected, 1);

        state.select_next(4);
        state.select_next(4);
        assert!(state.follow);
    }

    #[test]
    fn test_auto_scroll_bottom_message() {
        let ranges = vec![(0, 6), (6, 12), (12, 18)];
        assert_eq!(compute_auto_scroll(2, &ranges, 10, 18), 8);
        assert_eq!(compute_auto_scroll(0, &ranges, 10, 18), 0);
        assert_eq!(compute_auto_scroll(0, &ranges, 20, 18), 0);
    }

    #[test]
    fn test_render_shows_reactions_and_file() {
        let store = Store::new(Layout::Messenger);
        let mut state = MessagesState::default();
        state.sync(store.messages().len());

        let backend = TestBackend::new(60, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                render(frame.area(), frame.buffer_mut(), &state, &store, &Theme::dark(), true)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("ProjectPlan.pdf"));
        assert!(content.contains("Morning"));
        assert!(content.contains("You"));
    }
}
