//! Compose box: text input, attachment toolbar and the attach-path prompt.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::store::{Draft, Store};

use super::input::LineInput;
use super::text;
use super::theme::Theme;

/// Height of the compose box: border + toolbar + input + border.
pub const COMPOSE_HEIGHT: u16 = 4;

/// What the attach prompt will attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachKind {
    Image,
    File,
}

impl AttachKind {
    fn title(&self) -> &'static str {
        match self {
            AttachKind::Image => " Attach image (path) ",
            AttachKind::File => " Attach file (path) ",
        }
    }
}

/// Mock file picker: the user types a path instead of browsing.
#[derive(Debug, Clone)]
pub struct AttachPrompt {
    pub kind: AttachKind,
    pub input: LineInput,
}

impl AttachPrompt {
    pub fn new(kind: AttachKind) -> Self {
        Self {
            kind,
            input: LineInput::default(),
        }
    }

    /// Apply the typed path to the store. Blank paths attach nothing.
    pub fn confirm(&self, store: &mut Store) -> bool {
        let path = self.input.as_str().trim();
        if path.is_empty() {
            return false;
        }
        match self.kind {
            AttachKind::Image => store.attach_image(path),
            AttachKind::File => store.attach_file(path),
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the compose box. Uses `Frame` so it can place the cursor.
pub fn render(
    area: Rect,
    frame: &mut Frame,
    input: &LineInput,
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
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let toolbar_area = Rect::new(inner.x, inner.y, inner.width, 1);
    render_toolbar(toolbar_area, frame.buffer_mut(), store.draft(), theme, focused);

    if inner.height < 2 {
        return;
    }
    let input_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    let avail = (input_area.width as usize).saturating_sub(2);

    if input.is_empty() {
        let placeholder = format!(" Message {}...", store.room_title());
        let line = Line::from(Span::styled(
            text::truncate(&placeholder, input_area.width as usize),
            theme.muted(),
        ));
        Paragraph::new(line).render(input_area, frame.buffer_mut());
        if focused {
            frame.set_cursor_position((input_area.x + 1, input_area.y));
        }
    } else {
        let (visible, col) = input.visible(avail);
        let line = Line::from(Span::styled(
            format!(" {}", visible),
            Style::default().fg(theme.fg),
        ));
        Paragraph::new(line).render(input_area, frame.buffer_mut());
        if focused {
            let prefix: String = visible.chars().take(col).collect();
            let cx = input_area.x + 1 + text::width(&prefix) as u16;
            frame.set_cursor_position((cx, input_area.y));
        }
    }
}

/// Toolbar: attach actions on the left, pending attachments and send on the right.
fn render_toolbar(area: Rect, buf: &mut Buffer, draft: &Draft, theme: &Theme, focused: bool) {
    let w = area.width as usize;
    let key_style = if focused {
        Style::default().fg(theme.fg)
    } else {
        theme.muted()
    };

    let left = " ^G image  ^O file  ^R voice";
    let mut pending: Vec<Span<'static>> = Vec::new();
    if let Some(image) = &draft.image {
        pending.push(Span::styled(
            format!("[img {}] ", text::truncate(image, 16)),
            Style::default().fg(theme.link),
        ));
    }
    if let Some(file) = &draft.file {
        pending.push(Span::styled(
            format!("[{}] ", text::truncate(file, 16)),
            Style::default().fg(theme.link),
        ));
    }
    if draft.recording {
        pending.push(Span::styled(
            "● REC ",
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ));
    }
    let send = Span::styled(
        "➤ Enter ",
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    );

    let right_w: usize = pending.iter().map(|s| text::width(&s.content)).sum::<usize>()
        + text::width(&send.content);
    let left = text::truncate(left, w.saturating_sub(right_w));
    let pad = w.saturating_sub(text::width(&left) + right_w);

    let mut spans = vec![Span::styled(left, key_style), Span::raw(" ".repeat(pad))];
    spans.extend(pending);
    spans.push(send);
    Paragraph::new(Line::from(spans)).render(area, buf);
}

/// Render the attach prompt as a small popup above the compose box.
pub fn render_prompt(frame: &mut Frame, prompt: &AttachPrompt, theme: &Theme) {
    let area = frame.area();
    let width = 60.min(area.width.saturating_sub(2));
    let height = 3;
    if area.height < height + COMPOSE_HEIGHT {
        return;
    }
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height - COMPOSE_HEIGHT - height;
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .title(Span::styled(prompt.kind.title(), theme.accent().add_modifier(Modifier::BOLD)))
        .title_bottom(Span::styled(" Enter attach, Esc cancel ", theme.muted()))
        .style(theme.bar());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let (visible, col) = prompt.input.visible((inner.width as usize).saturating_sub(1));
    let prefix: String = visible.chars().take(col).collect();
    frame.render_widget(Paragraph::new(format!(" {}", visible)), inner);
    frame.set_cursor_position((inner.x + 1 + text::width(&prefix) as u16, inner.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Layout;

    fn prompt_with(kind: AttachKind, path: &str) -> AttachPrompt {
        let mut prompt = AttachPrompt::new(kind);
        for c in path.chars() {
            prompt.input.insert_char(c);
        }
        prompt
    }

    #[test]
    fn test_prompt_attaches_file_name() {
        let mut store = Store::new(Layout::Messenger);
        assert!(prompt_with(AttachKind::File, "/tmp/report.pdf").confirm(&mut store));
        assert_eq!(store.draft().file.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_prompt_attaches_image_path() {
        let mut store = Store::new(Layout::Messenger);
        assert!(prompt_with(AttachKind::Image, " ~/cat.png ").confirm(&mut store));
        assert_eq!(store.draft().image.as_deref(), Some("~/cat.png"));
    }

    #[test]
    fn test_blank_prompt_attaches_nothing() {
        let mut store = Store::new(Layout::Messenger);
        assert!(!prompt_with(AttachKind::Image, "   ").confirm(&mut store));
        assert_eq!(store.draft(), &Draft::default());
    }
}
