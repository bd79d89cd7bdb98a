// Common test utilities for the integration suites

use pine::buffer::TextBuffer;
use pine::cursor::Position;
use pine::editor::Editor;
use pine::operation::Operation;

/// Files and editors with known content
pub mod fixtures {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Write `content` to `name` inside `dir` and return the full path
    #[allow(dead_code)]
    pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Editor with one buffer loaded from a fresh temp file
    #[allow(dead_code)]
    pub fn editor_with_content(content: &str) -> (TempDir, PathBuf, Editor) {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "fixture.txt", content);
        let mut editor = Editor::default();
        editor.open(Some(&path));
        (dir, path, editor)
    }

    #[allow(dead_code)]
    pub fn buffer_with_lines(lines: &[&str]) -> TextBuffer {
        TextBuffer::from_lines(Path::new("fixture.txt"), lines)
    }

    /// Feed every char of `text` as an insert operation
    #[allow(dead_code)]
    pub fn type_text(editor: &mut Editor, text: &str) {
        for c in text.chars() {
            editor.execute(Operation::InsertChar(c));
        }
    }
}

/// Validation utilities for checking invariants
pub mod validation {
    use super::*;

    /// Check if a position is valid for the given buffer
    #[allow(dead_code)]
    pub fn is_valid_position(buffer: &TextBuffer, pos: Position) -> bool {
        if buffer.is_empty() {
            return pos == Position::origin();
        }
        pos.line < buffer.line_count() && pos.col <= buffer.line_len(pos.line)
    }

    /// Assert cursor is in valid position
    #[allow(dead_code)]
    pub fn assert_cursor_valid(buffer: &TextBuffer) {
        let cursor = buffer.cursor();
        assert!(
            is_valid_position(buffer, cursor),
            "Cursor {} out of bounds (line_count: {}, line_len: {})",
            cursor,
            buffer.line_count(),
            buffer.line_len(cursor.line)
        );
    }

    /// Assert the terminal cursor lands inside the buffer pane
    #[allow(dead_code)]
    pub fn assert_cursor_visible(editor: &Editor) {
        let buffer = editor.active_buffer().expect("editor has an active buffer");
        let view = &editor.viewport;
        let pos = view.screen_cursor(buffer);
        let origin = view.content_origin();
        assert!(
            pos.row >= origin.row && pos.row < view.end.row,
            "cursor row {} outside [{}, {})",
            pos.row,
            origin.row,
            view.end.row
        );
        assert!(
            pos.col >= origin.col && pos.col < view.end.col,
            "cursor col {} outside [{}, {})",
            pos.col,
            origin.col,
            view.end.col
        );
    }
}

/// Utilities for rapid operation testing
pub mod stress {
    use super::*;

    /// Run `operations` repeatedly, checking invariants after each one
    #[allow(dead_code)]
    pub fn rapid_operations(editor: &mut Editor, operations: &[Operation], iterations: usize) {
        for _ in 0..iterations {
            for op in operations {
                editor.execute(*op);
                let buffer = editor.active_buffer().expect("editor has an active buffer");
                validation::assert_cursor_valid(buffer);
                validation::assert_cursor_visible(editor);
            }
        }
    }

    /// Operations that keep the editor in Edit mode
    #[allow(dead_code)]
    pub fn editing_operations() -> Vec<Operation> {
        vec![
            Operation::InsertChar('a'),
            Operation::InsertChar('漢'),
            Operation::InsertChar(' '),
            Operation::InsertTab,
            Operation::InsertNewline,
            Operation::DeleteChar,
            Operation::DeleteLine,
            Operation::MoveCursorUp,
            Operation::MoveCursorDown,
            Operation::MoveCursorLeft,
            Operation::MoveCursorRight,
            Operation::MoveLineStart,
            Operation::MoveLineEnd,
            Operation::NextHalfPage,
            Operation::PrevHalfPage,
        ]
    }
}
