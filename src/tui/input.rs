//! Single-line text input with a character cursor.
//!
//! Shared by the compose box, the chat search bar and the attachment prompt.

#[derive(Debug, Default, Clone)]
pub struct LineInput {
    text: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
}

impl LineInput {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let end = self.byte_offset(self.cursor);
        let start = self.byte_offset(self.cursor - 1);
        self.text.drain(start..end);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.drain(start..end);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Visible slice and cursor column for a field `width` columns wide,
    /// scrolled horizontally so the cursor stays in view.
    pub fn visible(&self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let chars: Vec<char> = self.text.chars().collect();
        let start = if self.cursor < width {
            0
        } else {
            self.cursor + 1 - width
        };
        let end = (start + width).min(chars.len());
        (chars[start..end].iter().collect(), self.cursor - start)
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> LineInput {
        let mut input = LineInput::default();
        for c in s.chars() {
            input.insert_char(c);
        }
        input
    }

    #[test]
    fn test_insert_multibyte() {
        let mut input = typed("hi👋");
        assert_eq!(input.cursor, 3);
        input.move_left();
        input.insert_char('!');
        assert_eq!(input.as_str(), "hi!👋");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = typed("héllo");
        input.backspace();
        assert_eq!(input.as_str(), "héll");
        input.move_home();
        input.move_right();
        input.delete();
        assert_eq!(input.as_str(), "hll");
        input.move_end();
        input.delete();
        assert_eq!(input.as_str(), "hll");
    }

    #[test]
    fn test_visible_scrolls_to_cursor() {
        let input = typed("abcdefghij");
        let (visible, col) = input.visible(4);
        assert_eq!(visible, "hij");
        assert_eq!(col, 3);

        let short = typed("ab");
        assert_eq!(short.visible(10), ("ab".to_string(), 2));
    }

    #[test]
    fn test_clear() {
        let mut input = typed("text");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
    }
}
