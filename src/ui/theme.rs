// ui/theme.rs - Colors for the editor chrome

use ratatui::style::{Color, Style};

#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub general: GeneralTheme,
    pub ui: UiTheme,
}

#[derive(Debug, Clone)]
pub struct GeneralTheme {
    pub background: Color,
    pub foreground: Color,
}

#[derive(Debug, Clone)]
pub struct UiTheme {
    pub title_bar_bg: Color,
    pub title_bar_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub message_fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    /// Marker for lines running past the right edge.
    pub overflow_fg: Color,
    pub header_fg: Color,
    pub filler_fg: Color,
}

impl Default for GeneralTheme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Reset,
        }
    }
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            title_bar_bg: Color::White,
            title_bar_fg: Color::Black,
            status_bar_bg: Color::Cyan,
            status_bar_fg: Color::Black,
            message_fg: Color::Red,
            highlight_bg: Color::Yellow,
            highlight_fg: Color::Black,
            overflow_fg: Color::Cyan,
            header_fg: Color::Blue,
            filler_fg: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn text(&self) -> Style {
        Style::default()
            .fg(self.general.foreground)
            .bg(self.general.background)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.ui.highlight_fg)
            .bg(self.ui.highlight_bg)
    }

    pub fn title_bar(&self) -> Style {
        Style::default()
            .fg(self.ui.title_bar_fg)
            .bg(self.ui.title_bar_bg)
    }

    pub fn status_bar(&self) -> Style {
        Style::default()
            .fg(self.ui.status_bar_fg)
            .bg(self.ui.status_bar_bg)
    }
}
