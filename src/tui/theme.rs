//! Light and dark color palettes.

use ratatui::style::{Color, Modifier, Style};

/// WhatsApp green.
const ACCENT: Color = Color::Rgb(37, 211, 102);

/// Colors used by every pane.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub bar_bg: Color,
    pub selection_bg: Color,
    /// Border of bubbles sent by the local user
    pub own_bubble: Color,
    /// Border of bubbles sent by peers
    pub peer_bubble: Color,
    pub link: Color,
    pub error: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(229, 221, 213),
            fg: Color::Black,
            muted: Color::Rgb(107, 114, 128),
            accent: ACCENT,
            bar_bg: Color::White,
            selection_bg: Color::Rgb(231, 248, 239),
            own_bubble: Color::Rgb(32, 186, 90),
            peer_bubble: Color::Rgb(156, 163, 175),
            link: Color::Blue,
            error: Color::Red,
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(3, 7, 18),
            fg: Color::White,
            muted: Color::Rgb(156, 163, 175),
            accent: ACCENT,
            bar_bg: Color::Rgb(17, 24, 39),
            selection_bg: Color::Rgb(31, 41, 55),
            own_bubble: ACCENT,
            peer_bubble: Color::Rgb(75, 85, 99),
            link: Color::LightBlue,
            error: Color::LightRed,
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn bar(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bar_bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn bold(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    /// Border style for a pane, depending on focus.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }
}
