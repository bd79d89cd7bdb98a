// ui/widgets/editor_pane.rs - Buffer content widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::buffer::TextBuffer;
use crate::cursor::Position;
use crate::ui::theme::Theme;
use crate::viewport::{Viewport, display_cells};

/// Draws the part of a buffer visible through a viewport, including the
/// directory header when the viewport reserves one.
pub struct EditorPane<'a> {
    pub buffer: &'a TextBuffer,
    pub viewport: &'a Viewport,
    pub theme: &'a Theme,
}

impl<'a> EditorPane<'a> {
    pub fn new(buffer: &'a TextBuffer, viewport: &'a Viewport, theme: &'a Theme) -> Self {
        Self {
            buffer,
            viewport,
            theme,
        }
    }
}

/// Draw one buffer line into row `y`, scrolled left by `skip` display
/// columns. Glyphs inside `highlight` (rune columns, end exclusive) get
/// `highlight_style`. A line running past the right edge ends in `>`.
#[allow(clippy::too_many_arguments)]
pub fn render_line(
    buf: &mut Buffer,
    area: Rect,
    y: u16,
    line: &[char],
    skip: usize,
    tab_width: usize,
    highlight: Option<(usize, usize)>,
    theme: &Theme,
    highlight_style: Style,
) {
    let width = area.width as usize;
    for cell in display_cells(line, tab_width) {
        if cell.col < skip {
            continue;
        }
        let x = cell.col - skip;
        if x + cell.width > width {
            if width > 0 {
                buf.set_string(
                    area.x + width as u16 - 1,
                    y,
                    ">",
                    Style::default().fg(theme.ui.overflow_fg),
                );
            }
            break;
        }
        let style = match highlight {
            Some((start, end)) if cell.rune >= start && cell.rune < end => highlight_style,
            _ => theme.text(),
        };
        let glyph: String = if cell.glyph == ' ' {
            " ".repeat(cell.width)
        } else {
            cell.glyph.to_string()
        };
        buf.set_string(area.x + x as u16, y, glyph, style);
    }
}

impl Widget for EditorPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the pane so switching buffers leaves no artifacts
        for y in 0..area.height {
            for x in 0..area.width {
                buf.get_mut(area.x + x, area.y + y)
                    .set_char(' ')
                    .set_style(self.theme.text());
            }
        }

        let header_rows = self.viewport.header_rows.min(area.height as usize);
        if header_rows > 0 {
            let header = Line::from(Span::styled(
                format!(" {}", self.buffer.file_path.display()),
                Style::default().fg(self.theme.ui.header_fg),
            ));
            buf.set_line(area.x, area.y, &header, area.width);
        }

        let anchor = self.viewport.anchor;
        let highlight = self.buffer.highlight;
        for i in 0..(area.height as usize - header_rows) {
            let line_idx = anchor.line + i;
            let y = area.y + (header_rows + i) as u16;
            match self.buffer.line_chars(line_idx) {
                Some(line) => render_line(
                    buf,
                    area,
                    y,
                    line,
                    anchor.col,
                    self.viewport.tab_width,
                    highlight_on_line(highlight, line_idx),
                    self.theme,
                    self.theme.highlight(),
                ),
                None => {
                    let filler = Line::from(Span::styled(
                        "~",
                        Style::default().fg(self.theme.ui.filler_fg),
                    ));
                    buf.set_line(area.x, y, &filler, area.width);
                }
            }
        }
    }
}

fn highlight_on_line(span: Option<(Position, Position)>, line: usize) -> Option<(usize, usize)> {
    let (start, end) = span?;
    if line < start.line || line > end.line {
        return None;
    }
    let from = if line == start.line { start.col } else { 0 };
    let to = if line == end.line { end.col } else { usize::MAX };
    Some((from, to))
}
