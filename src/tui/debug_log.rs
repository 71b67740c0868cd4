//! Toggleable pane showing captured log lines.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::log_capture::LogBuffer;
use super::theme::Theme;

/// Scroll history kept by the pane.
const MAX_HISTORY: usize = 1000;

/// Height of the pane when visible.
pub const DEBUG_LOG_HEIGHT: u16 = 8;

pub struct DebugLogState {
    source: LogBuffer,
    lines: Vec<String>,
    pub visible: bool,
    /// Lines scrolled up from the bottom (0 = newest visible)
    scroll_offset: usize,
}

impl DebugLogState {
    pub fn new(source: LogBuffer) -> Self {
        Self {
            source,
            lines: Vec::new(),
            visible: false,
            scroll_offset: 0,
        }
    }

    /// Pull new lines from the capture buffer. Call once per frame.
    pub fn refresh(&mut self) {
        self.lines.extend(self.source.drain());
        if self.lines.len() > MAX_HISTORY {
            let excess = self.lines.len() - MAX_HISTORY;
            self.lines.drain(..excess);
            self.scroll_offset = self.scroll_offset.saturating_sub(excess);
        }
    }

    /// Show or hide the pane. Opening jumps to the newest line.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_offset = 0;
        }
    }

    pub fn scroll_up(&mut self, n: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + n).min(max);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }
}

pub fn render(area: Rect, buf: &mut Buffer, state: &DebugLogState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted())
        .title(Span::styled(
            " Log (Ctrl+D) ",
            theme.accent().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let end = state.lines.len().saturating_sub(state.scroll_offset);
    let start = end.saturating_sub(inner.height as usize);
    let lines: Vec<Line> = state.lines[start..end]
        .iter()
        .map(|l| level_line(l, theme))
        .collect();
    Paragraph::new(lines).render(inner, buf);
}

/// Color a fmt-layer line by its level token.
fn level_line(line: &str, theme: &Theme) -> Line<'static> {
    let color = if line.contains("ERROR") {
        theme.error
    } else if line.contains("WARN") {
        Color::Yellow
    } else if line.contains("INFO") {
        theme.accent
    } else {
        theme.muted
    };
    Line::from(Span::styled(line.to_string(), Style::default().fg(color)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_accumulates() {
        let source = LogBuffer::new();
        let mut state = DebugLogState::new(source.clone());
        source.push("a".to_string());
        state.refresh();
        source.push("b".to_string());
        state.refresh();
        assert_eq!(state.lines, vec!["a", "b"]);
    }

    #[test]
    fn test_history_capped() {
        let source = LogBuffer::with_capacity(MAX_HISTORY + 10);
        let mut state = DebugLogState::new(source.clone());
        for i in 0..MAX_HISTORY + 5 {
            source.push(i.to_string());
        }
        state.refresh();
        assert_eq!(state.lines.len(), MAX_HISTORY);
        assert_eq!(state.lines[0], "5");
    }

    #[test]
    fn test_scroll_clamps() {
        let source = LogBuffer::new();
        for i in 0..4 {
            source.push(i.to_string());
        }
        let mut state = DebugLogState::new(source);
        state.refresh();
        state.scroll_up(10);
        assert_eq!(state.scroll_offset, 3);
        state.scroll_down(1);
        assert_eq!(state.scroll_offset, 2);
        state.toggle();
        assert!(state.visible);
        assert_eq!(state.scroll_offset, 0);
    }
}
