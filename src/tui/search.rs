//! Chat search overlay: filters the chat list by peer name as you type.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::store::{Store, StoreError};

use super::input::LineInput;
use super::text;
use super::theme::Theme;

/// Maximum number of results to display in the dropdown.
const MAX_VISIBLE_RESULTS: usize = 8;

/// Height of the search input bar (border + input + border).
const SEARCH_BAR_HEIGHT: u16 = 3;

/// State for the search overlay. The query itself lives in the store so the
/// sidebar stays filtered after the overlay closes.
#[derive(Default)]
pub struct SearchState {
    pub active: bool,
    pub input: LineInput,
    /// Index into the store's filtered chats
    pub selected: usize,
}

impl SearchState {
    /// Open the overlay, picking up the store's current query.
    pub fn activate(&mut self, store: &Store) {
        self.active = true;
        self.input.clear();
        if let Some(list) = store.chat_list() {
            for c in list.search().chars() {
                self.input.insert_char(c);
            }
        }
        self.selected = 0;
    }

    /// Close the overlay, keeping the filter applied.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Close the overlay and drop the filter.
    pub fn cancel(&mut self, store: &mut Store) -> Result<(), StoreError> {
        self.active = false;
        self.input.clear();
        store.set_search("")
    }

    /// Push the edited query into the store. Call after every keystroke.
    pub fn apply(&mut self, store: &mut Store) -> Result<(), StoreError> {
        store.set_search(self.input.as_str())?;
        self.selected = 0;
        Ok(())
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, store: &Store) {
        if self.selected + 1 < store.filtered_chats().len() {
            self.selected += 1;
        }
    }

    /// Open the highlighted chat. Returns its id.
    pub fn open_selected(&mut self, store: &mut Store) -> Result<Option<String>, StoreError> {
        let Some(id) = store.filtered_chats().get(self.selected).map(|c| c.id.clone()) else {
            return Ok(None);
        };
        store.select_chat(&id)?;
        self.deactivate();
        Ok(Some(id))
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the overlay at the top of the screen, below the header.
pub fn render_search_overlay(frame: &mut Frame, state: &SearchState, store: &Store, theme: &Theme) {
    if !state.active {
        return;
    }

    let area = frame.area();
    let results = store.filtered_chats();
    let results_height = if results.is_empty() {
        3
    } else {
        results.len().min(MAX_VISIBLE_RESULTS) as u16 + 2
    };

    let width = 50.min(area.width);
    let height = (SEARCH_BAR_HEIGHT + results_height).min(area.height.saturating_sub(2));
    if height == 0 {
        return;
    }
    let overlay = Rect::new(area.x, area.y + 1, width, height);
    frame.render_widget(Clear, overlay);

    let bar = Rect::new(overlay.x, overlay.y, overlay.width, SEARCH_BAR_HEIGHT.min(height));
    render_search_bar(bar, frame, state, theme);

    if height > SEARCH_BAR_HEIGHT {
        let results_area = Rect::new(
            overlay.x,
            overlay.y + SEARCH_BAR_HEIGHT,
            overlay.width,
            height - SEARCH_BAR_HEIGHT,
        );
        render_results(results_area, frame.buffer_mut(), state, store, theme);
    }
}

fn render_search_bar(area: Rect, frame: &mut Frame, state: &SearchState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .title(Span::styled(
            " Search chats (Esc to clear) ",
            theme.accent().add_modifier(Modifier::BOLD),
        ))
        .style(theme.bar());

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.input.is_empty() {
        let line = Line::from(Span::styled(" Search by name...", theme.muted()));
        Paragraph::new(line).render(inner, frame.buffer_mut());
        frame.set_cursor_position((inner.x + 1, inner.y));
        return;
    }

    let (visible, col) = state.input.visible((inner.width as usize).saturating_sub(2));
    let prefix: String = visible.chars().take(col).collect();
    Paragraph::new(format!(" {}", visible)).render(inner, frame.buffer_mut());
    frame.set_cursor_position((inner.x + 1 + text::width(&prefix) as u16, inner.y));
}

fn render_results(area: Rect, buf: &mut Buffer, state: &SearchState, store: &Store, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted())
        .style(theme.bar());
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let results = store.filtered_chats();
    if results.is_empty() {
        Paragraph::new(Line::from(Span::styled(" No results found", theme.muted())))
            .render(inner, buf);
        return;
    }

    let visible = inner.height as usize;
    let offset = (state.selected + 1).saturating_sub(visible);
    for (row, idx) in (offset..results.len()).take(visible).enumerate() {
        let chat = results[idx];
        let style = if idx == state.selected {
            theme.selected()
        } else {
            theme.bar()
        };
        let label = format!(
            " * {} - {}",
            store.user_name(&chat.user_id),
            chat.last_message
        );
        let label = text::truncate(&label, inner.width as usize);
        let pad = (inner.width as usize).saturating_sub(text::width(&label));
        let line = Line::from(vec![
            Span::styled(label, style),
            Span::styled(" ".repeat(pad), style),
        ]);
        Paragraph::new(line).render(Rect::new(inner.x, inner.y + row as u16, inner.width, 1), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Layout;

    fn type_query(state: &mut SearchState, store: &mut Store, q: &str) {
        for c in q.chars() {
            state.input.insert_char(c);
            state.apply(store).unwrap();
        }
    }

    #[test]
    fn test_typing_filters_store() {
        let mut store = Store::new(Layout::Whatsapp);
        let mut state = SearchState::default();
        state.activate(&store);
        type_query(&mut state, &mut store, "ch");
        assert_eq!(store.filtered_chats().len(), 1);
    }

    #[test]
    fn test_open_selected_selects_chat() {
        let mut store = Store::new(Layout::Whatsapp);
        let mut state = SearchState::default();
        state.activate(&store);
        type_query(&mut state, &mut store, "daisy");
        let opened = state.open_selected(&mut store).unwrap();
        assert_eq!(opened.as_deref(), Some("c3"));
        assert!(!state.active);
        assert_eq!(store.chat_list().unwrap().selected_id(), "c3");
        // Filter stays applied after closing.
        assert_eq!(store.filtered_chats().len(), 1);
    }

    #[test]
    fn test_cancel_clears_filter() {
        let mut store = Store::new(Layout::Whatsapp);
        let mut state = SearchState::default();
        state.activate(&store);
        type_query(&mut state, &mut store, "zzz");
        assert!(store.filtered_chats().is_empty());
        assert_eq!(state.open_selected(&mut store).unwrap(), None);

        state.cancel(&mut store).unwrap();
        assert_eq!(store.filtered_chats().len(), 3);
    }

    #[test]
    fn test_reactivate_restores_query() {
        let mut store = Store::new(Layout::Whatsapp);
        store.set_search("bo").unwrap();
        let mut state = SearchState::default();
        state.activate(&store);
        assert_eq!(state.input.as_str(), "bo");
    }
}
