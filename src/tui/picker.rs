//! Emoji picker popup: recently used reactions followed by the full palette.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::EMOJI_PALETTE;
use crate::store::{Store, StoreError};

use super::theme::Theme;

/// Picker state. Closed when `target` is `None`.
#[derive(Debug, Default)]
pub struct EmojiPicker {
    /// Message the reaction will be applied to
    target: Option<String>,
    /// Recent row followed by the palette; the same emoji may appear twice.
    choices: Vec<String>,
    recent_len: usize,
    cursor: usize,
}

impl EmojiPicker {
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    /// Open for `message_id`, snapshotting the recent list.
    pub fn open(&mut self, message_id: String, recent: &[String]) {
        self.choices = recent.to_vec();
        self.recent_len = recent.len();
        self.choices
            .extend(EMOJI_PALETTE.iter().map(|e| e.to_string()));
        self.cursor = 0;
        self.target = Some(message_id);
    }

    pub fn close(&mut self) {
        self.target = None;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.choices.len() {
            self.cursor += 1;
        }
    }

    /// Toggle the emoji under the cursor and close the picker.
    pub fn apply(&mut self, store: &mut Store) -> Result<Option<bool>, StoreError> {
        let Some(emoji) = self.choices.get(self.cursor).cloned() else {
            return Ok(None);
        };
        self.apply_emoji(store, &emoji)
    }

    /// Toggle the n-th palette emoji (0-based) and close the picker.
    pub fn apply_palette(&mut self, store: &mut Store, n: usize) -> Result<Option<bool>, StoreError> {
        match EMOJI_PALETTE.get(n) {
            Some(emoji) => self.apply_emoji(store, emoji),
            None => Ok(None),
        }
    }

    fn apply_emoji(&mut self, store: &mut Store, emoji: &str) -> Result<Option<bool>, StoreError> {
        let Some(target) = self.target.take() else {
            return Ok(None);
        };
        store.toggle_reaction(&target, emoji).map(Some)
    }
}

/// Render the picker centered over the messages pane.
pub fn render(frame: &mut Frame, picker: &EmojiPicker, theme: &Theme) {
    if !picker.is_open() {
        return;
    }
    let area = frame.area();
    let width = 44.min(area.width.saturating_sub(2));
    let height = if picker.recent_len > 0 { 6 } else { 4 };
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height.min(area.height),
    );

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .title(Span::styled(" React ", theme.accent().add_modifier(Modifier::BOLD)))
        .title_bottom(Span::styled(" <-/-> move  Enter pick  1-6  Esc ", theme.muted()))
        .style(theme.bar());

    let chip = |idx: usize, emoji: &str| {
        let style = if idx == picker.cursor {
            Style::default()
                .fg(theme.bar_bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg)
        };
        Span::styled(format!(" {} ", emoji), style)
    };

    let mut lines = Vec::new();
    if picker.recent_len > 0 {
        lines.push(Line::from(Span::styled(" Recent", theme.muted())));
        let mut row = vec![Span::raw(" ")];
        for (idx, emoji) in picker.choices[..picker.recent_len].iter().enumerate() {
            row.push(chip(idx, emoji));
        }
        lines.push(Line::from(row));
    }
    lines.push(Line::from(Span::styled(" All", theme.muted())));
    let mut row = vec![Span::raw(" ")];
    for (offset, emoji) in picker.choices[picker.recent_len..].iter().enumerate() {
        row.push(chip(picker.recent_len + offset, emoji));
    }
    lines.push(Line::from(row));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Layout;

    #[test]
    fn test_open_includes_recent_then_palette() {
        let mut picker = EmojiPicker::default();
        picker.open("m1".to_string(), &["🔥".to_string()]);
        assert!(picker.is_open());
        assert_eq!(picker.choices.len(), 1 + EMOJI_PALETTE.len());
        assert_eq!(picker.choices[0], "🔥");
        assert_eq!(picker.choices[1], "👍");
    }

    #[test]
    fn test_apply_toggles_and_closes() {
        let mut store = Store::new(Layout::Messenger);
        let mut picker = EmojiPicker::default();
        picker.open("m2".to_string(), store.recent_emojis());
        picker.move_right();
        assert_eq!(picker.apply(&mut store).unwrap(), Some(true));
        assert!(!picker.is_open());
        assert!(store.messages()[1].has_reacted("😂", "1"));
        assert_eq!(store.recent_emojis(), &["😂".to_string()]);
    }

    #[test]
    fn test_apply_palette_digit() {
        let mut store = Store::new(Layout::Messenger);
        let mut picker = EmojiPicker::default();
        picker.open("m3".to_string(), store.recent_emojis());
        // m3 already has the local user's 👍, so this removes it.
        assert_eq!(picker.apply_palette(&mut store, 0).unwrap(), Some(false));
        assert!(store.messages()[2].reactions.is_empty());
    }

    #[test]
    fn test_cursor_bounds() {
        let mut picker = EmojiPicker::default();
        picker.open("m1".to_string(), &[]);
        picker.move_left();
        assert_eq!(picker.cursor, 0);
        for _ in 0..20 {
            picker.move_right();
        }
        assert_eq!(picker.cursor, EMOJI_PALETTE.len() - 1);
    }

    #[test]
    fn test_apply_when_closed_is_noop() {
        let mut store = Store::new(Layout::Messenger);
        let mut picker = EmojiPicker::default();
        assert_eq!(picker.apply_palette(&mut store, 0).unwrap(), None);
    }
}
