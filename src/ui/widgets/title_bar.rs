// ui/widgets/title_bar.rs - Top row: editor name or prompt hint, buffer tag

use ratatui::{buffer::Buffer, layout::Rect, text::Line, widgets::Widget};

use crate::editor::Editor;
use crate::layout::buffer_label;
use crate::ui::theme::Theme;

pub struct TitleBar<'a> {
    pub editor: &'a Editor,
    pub theme: &'a Theme,
}

impl<'a> TitleBar<'a> {
    pub fn new(editor: &'a Editor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }
}

impl Widget for TitleBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.title_bar();
        buf.set_style(area, style);

        if let Some(hint) = self.editor.prompt_hint() {
            buf.set_line(area.x, area.y, &Line::from(format!(" {}", hint)), area.width);
            return;
        }

        let title = format!("Pine Editor v{}", env!("CARGO_PKG_VERSION"));
        buf.set_line(area.x, area.y, &Line::from(title), area.width);

        if let Some(buffer) = self.editor.active_buffer() {
            let label = buffer_label(self.editor.session.active_index(), buffer);
            let col = self.editor.layout.buffer_label_col(&label) as u16;
            if col < area.width {
                buf.set_line(area.x + col, area.y, &Line::from(label), area.width - col);
            }
        }
    }
}
