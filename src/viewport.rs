// viewport.rs - Buffer position <-> screen cell translation

use crate::buffer::TextBuffer;
use crate::cursor::Position;
use unicode_width::UnicodeWidthChar;

pub const DEFAULT_TAB_WIDTH: usize = 4;

/// An absolute terminal cell, or one relative to a viewport's content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPos {
    pub row: usize,
    pub col: usize,
}

impl ScreenPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Top-left visible cell: a buffer line and a display column (not a rune
/// index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub line: usize,
    pub col: usize,
}

/// One rendered glyph of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Display column where the glyph starts.
    pub col: usize,
    pub glyph: char,
    pub width: usize,
    /// Index of the rune that produced the glyph.
    pub rune: usize,
}

/// Number of terminal columns `ch` takes when drawn at display column `col`.
pub fn rendered_width(ch: char, col: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab = tab_width.max(1);
        return tab - col % tab;
    }
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Display column of rune index `col` within `line`.
pub fn screen_col_of(line: &[char], col: usize, tab_width: usize) -> usize {
    line.iter()
        .take(col)
        .fold(0, |w, ch| w + rendered_width(*ch, w, tab_width))
}

/// Expand a line into drawable cells. Tabs become spaces, control
/// characters a placeholder.
pub fn display_cells(line: &[char], tab_width: usize) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(line.len());
    let mut col = 0;
    for (rune, ch) in line.iter().enumerate() {
        let width = rendered_width(*ch, col, tab_width);
        let glyph = match ch {
            '\t' => ' ',
            c if c.is_control() => '?',
            c => *c,
        };
        cells.push(Cell {
            col,
            glyph,
            width,
            rune,
        });
        col += width;
    }
    cells
}

/// Scroll state for one rendered buffer. The cursor itself stays owned by
/// the buffer; only its screen projection is cached here.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// First cell of the region (absolute).
    pub start: ScreenPos,
    /// One past the last cell of the region (absolute).
    pub end: ScreenPos,
    /// Rows at the top of the region reserved for a header.
    pub header_rows: usize,
    pub anchor: Anchor,
    pub cursor_screen_col: usize,
    pub tab_width: usize,
}

impl Viewport {
    pub fn new(start: ScreenPos, end: ScreenPos, tab_width: usize) -> Self {
        Self {
            start,
            end,
            header_rows: 0,
            anchor: Anchor::default(),
            cursor_screen_col: 0,
            tab_width,
        }
    }

    pub fn set_region(&mut self, start: ScreenPos, end: ScreenPos, header_rows: usize) {
        self.start = start;
        self.end = end;
        self.header_rows = header_rows;
    }

    /// Forget the scroll position, e.g. when the viewed buffer is recreated.
    pub fn reset(&mut self) {
        self.anchor = Anchor::default();
        self.cursor_screen_col = 0;
    }

    /// Rows available for buffer content.
    pub fn height(&self) -> usize {
        self.end
            .row
            .saturating_sub(self.start.row + self.header_rows)
    }

    pub fn width(&self) -> usize {
        self.end.col.saturating_sub(self.start.col)
    }

    /// Absolute cell of the first content row.
    pub fn content_origin(&self) -> ScreenPos {
        ScreenPos::new(self.start.row + self.header_rows, self.start.col)
    }

    pub fn contains(&self, abs: ScreenPos) -> bool {
        let origin = self.content_origin();
        abs.row >= origin.row && abs.row < self.end.row && abs.col >= origin.col && abs.col < self.end.col
    }

    /// Recompute the cursor's display column and scroll minimally so that
    /// it stays inside the content area.
    pub fn sync_cursor_to_view(&mut self, buffer: &TextBuffer) {
        let cursor = buffer.cursor();
        self.cursor_screen_col = buffer
            .line_chars(cursor.line)
            .map_or(0, |line| screen_col_of(line, cursor.col, self.tab_width));

        let height = self.height().max(1);
        let width = self.width().max(1);

        if cursor.line < self.anchor.line {
            self.anchor.line = cursor.line;
        } else if cursor.line >= self.anchor.line + height {
            self.anchor.line = cursor.line + 1 - height;
        }

        if self.cursor_screen_col < self.anchor.col {
            self.anchor.col = self.cursor_screen_col;
        } else if self.cursor_screen_col >= self.anchor.col + width {
            self.anchor.col = self.cursor_screen_col + 1 - width;
        }
    }

    /// Absolute cell the terminal cursor should be placed at.
    pub fn screen_cursor(&self, buffer: &TextBuffer) -> ScreenPos {
        let origin = self.content_origin();
        ScreenPos::new(
            origin.row + buffer.cursor().line.saturating_sub(self.anchor.line),
            origin.col + self.cursor_screen_col.saturating_sub(self.anchor.col),
        )
    }

    pub fn move_cursor_up(&self, buffer: &mut TextBuffer) {
        let cursor = buffer.cursor();
        if buffer.is_empty() || cursor.line == 0 {
            return;
        }
        buffer.set_cursor(Position::new(cursor.line - 1, cursor.col));
    }

    pub fn move_cursor_down(&self, buffer: &mut TextBuffer) {
        let cursor = buffer.cursor();
        if cursor.line + 1 >= buffer.line_count() {
            return;
        }
        buffer.set_cursor(Position::new(cursor.line + 1, cursor.col));
    }

    pub fn move_cursor_left(&self, buffer: &mut TextBuffer) {
        let cursor = buffer.cursor();
        if cursor.col == 0 {
            return;
        }
        buffer.set_cursor(Position::new(cursor.line, cursor.col - 1));
    }

    pub fn move_cursor_right(&self, buffer: &mut TextBuffer) {
        let cursor = buffer.cursor();
        if cursor.col >= buffer.line_len(cursor.line) {
            return;
        }
        buffer.set_cursor(Position::new(cursor.line, cursor.col + 1));
    }

    pub fn move_cursor_line_start(&self, buffer: &mut TextBuffer) {
        let cursor = buffer.cursor();
        buffer.set_cursor(Position::new(cursor.line, 0));
    }

    pub fn move_cursor_line_end(&self, buffer: &mut TextBuffer) {
        let cursor = buffer.cursor();
        buffer.set_cursor(Position::new(cursor.line, buffer.line_len(cursor.line)));
    }

    fn half_screen(&self) -> usize {
        (self.height() / 2).max(1)
    }

    pub fn move_cursor_half_screen_next(&self, buffer: &mut TextBuffer) {
        if buffer.is_empty() {
            return;
        }
        let cursor = buffer.cursor();
        let line = (cursor.line + self.half_screen()).min(buffer.line_count() - 1);
        buffer.set_cursor(Position::new(line, cursor.col));
    }

    pub fn move_cursor_half_screen_prev(&self, buffer: &mut TextBuffer) {
        if buffer.is_empty() {
            return;
        }
        let cursor = buffer.cursor();
        let line = cursor.line.saturating_sub(self.half_screen());
        buffer.set_cursor(Position::new(line, cursor.col));
    }

    /// Place the cursor on the rune drawn at `pos`, relative to the content
    /// area. Returns false (cursor untouched) when `pos` hits no line.
    pub fn map_screen_position_to_cursor(&self, buffer: &mut TextBuffer, pos: ScreenPos) -> bool {
        if pos.row >= self.height() || pos.col >= self.width() {
            return false;
        }
        let line = self.anchor.line + pos.row;
        let Some(chars) = buffer.line_chars(line) else {
            return false;
        };

        let target = self.anchor.col + pos.col;
        let mut rune = 0;
        let mut width = 0;
        while width < target && rune < chars.len() {
            width += rendered_width(chars[rune], width, self.tab_width);
            rune += 1;
        }
        buffer.set_cursor(Position::new(line, rune));
        true
    }

    /// Mouse click at an absolute cell; ignored outside this viewport's
    /// content area (headers included).
    pub fn move_cursor_by_mouse(&self, buffer: &mut TextBuffer, abs: ScreenPos) -> bool {
        if !self.contains(abs) {
            return false;
        }
        let origin = self.content_origin();
        self.map_screen_position_to_cursor(
            buffer,
            ScreenPos::new(abs.row - origin.row, abs.col - origin.col),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::Path;

    fn viewport(rows: usize, cols: usize) -> Viewport {
        Viewport::new(ScreenPos::new(0, 0), ScreenPos::new(rows, cols), DEFAULT_TAB_WIDTH)
    }

    fn buffer(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(Path::new("view.txt"), lines)
    }

    #[test]
    fn test_rendered_width() {
        assert_eq!(rendered_width('a', 0, 4), 1);
        assert_eq!(rendered_width('\t', 0, 4), 4);
        assert_eq!(rendered_width('\t', 1, 4), 3);
        assert_eq!(rendered_width('\t', 4, 4), 4);
        assert_eq!(rendered_width('漢', 0, 4), 2);
    }

    #[test]
    fn test_screen_col_of() {
        let line: Vec<char> = "a\tb漢c".chars().collect();
        assert_eq!(screen_col_of(&line, 0, 4), 0);
        assert_eq!(screen_col_of(&line, 1, 4), 1);
        assert_eq!(screen_col_of(&line, 2, 4), 4);
        assert_eq!(screen_col_of(&line, 4, 4), 7);
        assert_eq!(screen_col_of(&line, 5, 4), 8);
    }

    #[test]
    fn test_display_cells_expand_tabs() {
        let line: Vec<char> = "\tx".chars().collect();
        let cells = display_cells(&line, 4);
        assert_eq!(cells[0], Cell { col: 0, glyph: ' ', width: 4, rune: 0 });
        assert_eq!(cells[1], Cell { col: 4, glyph: 'x', width: 1, rune: 1 });
    }

    #[test]
    fn test_sync_accounts_for_tabs_and_wide_glyphs() {
        let mut buf = buffer(&["\t漢x"]);
        buf.set_cursor(Position::new(0, 3));
        let mut vp = viewport(10, 80);
        vp.sync_cursor_to_view(&buf);
        assert_eq!(vp.cursor_screen_col, 6);
        assert_eq!(vp.screen_cursor(&buf), ScreenPos::new(0, 6));
    }

    #[test]
    fn test_sync_scrolls_down_and_back_up() {
        let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut buf = buffer(&refs);
        let mut vp = viewport(10, 80);

        buf.set_cursor(Position::new(25, 0));
        vp.sync_cursor_to_view(&buf);
        assert_eq!(vp.anchor.line, 16);

        buf.set_cursor(Position::new(20, 0));
        vp.sync_cursor_to_view(&buf);
        assert_eq!(vp.anchor.line, 16, "no scroll while visible");

        buf.set_cursor(Position::new(3, 0));
        vp.sync_cursor_to_view(&buf);
        assert_eq!(vp.anchor.line, 3);
    }

    #[test]
    fn test_sync_scrolls_horizontally() {
        let long = "x".repeat(100);
        let mut buf = buffer(&[&long]);
        let mut vp = viewport(5, 20);
        buf.set_cursor(Position::new(0, 30));
        vp.sync_cursor_to_view(&buf);
        assert_eq!(vp.anchor.col, 11);
        buf.set_cursor(Position::new(0, 5));
        vp.sync_cursor_to_view(&buf);
        assert_eq!(vp.anchor.col, 5);
    }

    #[test]
    fn test_header_rows_shrink_height() {
        let mut vp = viewport(10, 80);
        vp.set_region(ScreenPos::new(1, 0), ScreenPos::new(10, 80), 1);
        assert_eq!(vp.height(), 8);
        assert_eq!(vp.content_origin(), ScreenPos::new(2, 0));
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut buf = buffer(&["long line", "ab", "another long one"]);
        let vp = viewport(10, 80);
        buf.set_cursor(Position::new(0, 8));
        vp.move_cursor_down(&mut buf);
        assert_eq!(buf.cursor(), Position::new(1, 2));
        vp.move_cursor_down(&mut buf);
        assert_eq!(buf.cursor(), Position::new(2, 2));
        vp.move_cursor_down(&mut buf);
        assert_eq!(buf.cursor(), Position::new(2, 2));
        vp.move_cursor_up(&mut buf);
        vp.move_cursor_up(&mut buf);
        vp.move_cursor_up(&mut buf);
        assert_eq!(buf.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_horizontal_moves_stay_in_line() {
        let mut buf = buffer(&["ab", "cd"]);
        let vp = viewport(10, 80);
        buf.set_cursor(Position::new(1, 0));
        vp.move_cursor_left(&mut buf);
        assert_eq!(buf.cursor(), Position::new(1, 0));
        buf.set_cursor(Position::new(0, 2));
        vp.move_cursor_right(&mut buf);
        assert_eq!(buf.cursor(), Position::new(0, 2));
        vp.move_cursor_left(&mut buf);
        assert_eq!(buf.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_moves_on_empty_buffer() {
        let mut buf = TextBuffer::default();
        let vp = viewport(10, 80);
        vp.move_cursor_up(&mut buf);
        vp.move_cursor_down(&mut buf);
        vp.move_cursor_left(&mut buf);
        vp.move_cursor_right(&mut buf);
        vp.move_cursor_line_end(&mut buf);
        vp.move_cursor_half_screen_next(&mut buf);
        vp.move_cursor_half_screen_prev(&mut buf);
        assert_eq!(buf.cursor(), Position::origin());
    }

    #[test]
    fn test_half_screen_moves() {
        let lines: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut buf = buffer(&refs);
        let vp = viewport(10, 80);
        vp.move_cursor_half_screen_next(&mut buf);
        assert_eq!(buf.cursor().line, 5);
        for _ in 0..10 {
            vp.move_cursor_half_screen_next(&mut buf);
        }
        assert_eq!(buf.cursor().line, 29);
        vp.move_cursor_half_screen_prev(&mut buf);
        assert_eq!(buf.cursor().line, 24);
        for _ in 0..10 {
            vp.move_cursor_half_screen_prev(&mut buf);
        }
        assert_eq!(buf.cursor().line, 0);
    }

    #[test]
    fn test_line_start_and_end() {
        let mut buf = buffer(&["hello"]);
        let vp = viewport(10, 80);
        vp.move_cursor_line_end(&mut buf);
        assert_eq!(buf.cursor(), Position::new(0, 5));
        vp.move_cursor_line_start(&mut buf);
        assert_eq!(buf.cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_mouse_mapping_walks_widths() {
        let mut buf = buffer(&["a\tb", "漢字x"]);
        let vp = viewport(10, 80);

        assert!(vp.map_screen_position_to_cursor(&mut buf, ScreenPos::new(0, 4)));
        assert_eq!(buf.cursor(), Position::new(0, 2));

        assert!(vp.map_screen_position_to_cursor(&mut buf, ScreenPos::new(1, 2)));
        assert_eq!(buf.cursor(), Position::new(1, 1));

        assert!(vp.map_screen_position_to_cursor(&mut buf, ScreenPos::new(1, 70)));
        assert_eq!(buf.cursor(), Position::new(1, 3));
    }

    #[test]
    fn test_mouse_mapping_ignores_rows_past_end() {
        let mut buf = buffer(&["a", "b"]);
        buf.set_cursor(Position::new(1, 1));
        let vp = viewport(10, 80);
        assert!(!vp.map_screen_position_to_cursor(&mut buf, ScreenPos::new(5, 0)));
        assert!(!vp.map_screen_position_to_cursor(&mut buf, ScreenPos::new(20, 0)));
        assert_eq!(buf.cursor(), Position::new(1, 1));
    }

    #[test]
    fn test_mouse_respects_region_and_header() {
        let mut buf = buffer(&["zero", "one", "two"]);
        let mut vp = viewport(10, 80);
        vp.set_region(ScreenPos::new(1, 0), ScreenPos::new(8, 80), 1);

        assert!(!vp.move_cursor_by_mouse(&mut buf, ScreenPos::new(1, 2)));
        assert!(!vp.move_cursor_by_mouse(&mut buf, ScreenPos::new(9, 2)));
        assert_eq!(buf.cursor(), Position::origin());

        assert!(vp.move_cursor_by_mouse(&mut buf, ScreenPos::new(3, 2)));
        assert_eq!(buf.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_mouse_mapping_uses_anchor() {
        let lines: Vec<String> = (0..40).map(|i| format!("{i:02}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut buf = buffer(&refs);
        let mut vp = viewport(10, 80);
        buf.set_cursor(Position::new(35, 0));
        vp.sync_cursor_to_view(&buf);
        assert!(vp.map_screen_position_to_cursor(&mut buf, ScreenPos::new(0, 1)));
        assert_eq!(buf.cursor(), Position::new(26, 1));
    }

    proptest! {
        #[test]
        fn sync_keeps_cursor_visible(
            rows in 1..30usize,
            cols in 1..40usize,
            text in "[a-z\t漢 ]{0,60}",
            line_count in 1..60usize,
            target_line in 0..80usize,
            target_col in 0..80usize,
        ) {
            let lines: Vec<&str> = std::iter::repeat(text.as_str()).take(line_count).collect();
            let mut buf = buffer(&lines);
            let mut vp = viewport(rows, cols);
            buf.set_cursor(Position::new(target_line, target_col));
            vp.sync_cursor_to_view(&buf);

            let cursor = buf.cursor();
            prop_assert!(cursor.line >= vp.anchor.line);
            prop_assert!(cursor.line < vp.anchor.line + vp.height());
            prop_assert!(vp.cursor_screen_col >= vp.anchor.col);
            prop_assert!(vp.cursor_screen_col < vp.anchor.col + vp.width());

            let screen = vp.screen_cursor(&buf);
            prop_assert!(screen.row < rows);
            prop_assert!(screen.col < cols);
        }
    }
}
