// ui/renderer.rs - Ratatui-based renderer for the text editor

use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Stdout};

use crate::editor::Editor;
use crate::ui::theme::Theme;
use crate::ui::widgets::editor_pane::EditorPane;
use crate::ui::widgets::message_line::MessageLine;
use crate::ui::widgets::status_bar::StatusBar;
use crate::ui::widgets::title_bar::TitleBar;
use crate::viewport::ScreenPos;

/// Ratatui-based renderer for the text editor
pub struct TuiRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    theme: Theme,
}

fn row_rect(size: Rect, row: usize) -> Rect {
    let y = (row as u16).min(size.height.saturating_sub(1));
    Rect::new(0, y, size.width, 1.min(size.height))
}

/// Rectangle between two absolute cells, clipped to the terminal.
fn region_rect(size: Rect, start: ScreenPos, end: ScreenPos) -> Rect {
    let x = (start.col as u16).min(size.width);
    let y = (start.row as u16).min(size.height);
    let right = (end.col as u16).min(size.width).max(x);
    let bottom = (end.row as u16).min(size.height).max(y);
    Rect::new(x, y, right - x, bottom - y)
}

impl TuiRenderer {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            theme: Theme::default(),
        })
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    pub fn draw(&mut self, editor: &Editor) -> io::Result<()> {
        let theme = &self.theme;
        self.terminal.draw(|f| {
            let size = f.size();
            if size.height < 3 || size.width == 0 {
                return;
            }
            let layout = &editor.layout;

            f.render_widget(TitleBar::new(editor, theme), row_rect(size, layout.title_row()));

            let pane = region_rect(size, editor.viewport.start, editor.viewport.end);
            if let Some(buffer) = editor.active_buffer() {
                f.render_widget(EditorPane::new(buffer, &editor.viewport, theme), pane);
            }

            f.render_widget(StatusBar::new(editor, theme), row_rect(size, layout.status_row()));
            f.render_widget(MessageLine::new(editor, theme), row_rect(size, layout.message_row()));

            let cursor = if editor.mode.is_prompt() {
                Some(editor.prompt_view.screen_cursor(&editor.prompt))
            } else {
                editor
                    .active_buffer()
                    .map(|buffer| editor.viewport.screen_cursor(buffer))
            };
            if let Some(pos) = cursor {
                let (x, y) = (pos.col as u16, pos.row as u16);
                if x < size.width && y < size.height {
                    f.set_cursor(x, y);
                }
            }
        })?;
        Ok(())
    }
}
