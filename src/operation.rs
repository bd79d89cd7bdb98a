use crate::viewport::ScreenPos;

/// Everything the key mapper can ask the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Noop,
    /// A key press with no binding. Answers a confirmation like any key.
    Unbound,
    /// First key of a two-key chord is pending.
    CommandPrefix,
    InsertChar(char),
    InsertTab,
    InsertNewline,
    DeleteChar,
    DeleteLine,
    MoveCursorUp,
    MoveCursorDown,
    MoveCursorLeft,
    MoveCursorRight,
    MoveLineStart,
    MoveLineEnd,
    NextHalfPage,
    PrevHalfPage,
    OpenFile,
    SaveFile,
    CloseFile,
    Exit,
    Cancel,
    Help,
    Search,
    NextMatch,
    PrevMatch,
    NextBuffer,
    PrevBuffer,
    // mouse positions are absolute terminal cells
    MouseLeft(ScreenPos),
    MouseRight(ScreenPos),
    WheelUp(ScreenPos),
    WheelDown(ScreenPos),
    /// New terminal size as (columns, rows).
    Resize(u16, u16),
}

impl Operation {
    /// True for operations that change buffer content.
    pub fn is_text_edit(&self) -> bool {
        matches!(
            self,
            Operation::InsertChar(_)
                | Operation::InsertTab
                | Operation::InsertNewline
                | Operation::DeleteChar
                | Operation::DeleteLine
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_variants() {
        assert_eq!(Operation::MoveCursorLeft, Operation::MoveCursorLeft);
        assert_ne!(Operation::MoveCursorRight, Operation::MoveCursorUp);
        let op = Operation::InsertChar('a');
        if let Operation::InsertChar(c) = op {
            assert_eq!(c, 'a');
        } else {
            panic!("Expected InsertChar");
        }
    }

    #[test]
    fn test_text_edit_classification() {
        assert!(Operation::InsertChar('x').is_text_edit());
        assert!(Operation::DeleteLine.is_text_edit());
        assert!(!Operation::MoveCursorDown.is_text_edit());
        assert!(!Operation::SaveFile.is_text_edit());
        assert!(!Operation::MouseLeft(ScreenPos::new(1, 1)).is_text_edit());
    }
}
