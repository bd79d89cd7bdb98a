// ui/widgets/message_line.rs - Bottom row: prompt input or the last message

use ratatui::{buffer::Buffer, layout::Rect, style::Style, text::Line, widgets::Widget};

use crate::editor::Editor;
use crate::ui::theme::Theme;
use crate::ui::widgets::editor_pane::render_line;

pub struct MessageLine<'a> {
    pub editor: &'a Editor,
    pub theme: &'a Theme,
}

impl<'a> MessageLine<'a> {
    pub fn new(editor: &'a Editor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }
}

impl Widget for MessageLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.text());

        if self.editor.mode.is_prompt() {
            if let Some(line) = self.editor.prompt.line_chars(0) {
                let view = &self.editor.prompt_view;
                render_line(
                    buf,
                    area,
                    area.y,
                    line,
                    view.anchor.col,
                    view.tab_width,
                    None,
                    self.theme,
                    self.theme.highlight(),
                );
            }
            return;
        }

        if let Some(msg) = &self.editor.status_message {
            let line = Line::styled(msg.as_str(), Style::default().fg(self.theme.ui.message_fg));
            buf.set_line(area.x, area.y, &line, area.width);
        }
    }
}
