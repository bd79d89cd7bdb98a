// src/keymap.rs - Terminal events to editor operations, with the ^K chord

use crate::operation::Operation;
use crate::viewport::ScreenPos;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Default)]
pub struct KeyMapper {
    /// `^K` was pressed and the next key completes the chord.
    pending: bool,
    last_key: Option<KeyEvent>,
}

impl KeyMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Map one terminal event. Key releases and repeats are ignored.
    pub fn map(&mut self, event: &Event) -> Operation {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.last_key = Some(*key);
                if self.pending {
                    self.pending = false;
                    return map_chord(key);
                }
                let op = map_key(key);
                if op == Operation::CommandPrefix {
                    self.pending = true;
                }
                op
            }
            Event::Mouse(mouse) => {
                let op = map_mouse(mouse);
                if op != Operation::Noop {
                    self.pending = false;
                }
                op
            }
            Event::Resize(cols, rows) => Operation::Resize(*cols, *rows),
            _ => Operation::Noop,
        }
    }

    /// Short description of the last key press, e.g. `^x` or `M-Right`.
    pub fn describe_last(&self) -> String {
        let Some(key) = self.last_key else {
            return String::new();
        };
        let mut out = String::new();
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            out.push('^');
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            out.push_str("M-");
        }
        match key.code {
            KeyCode::Char(c) => out.push(c),
            other => out.push_str(&format!("{:?}", other)),
        }
        out
    }
}

fn map_key(key: &KeyEvent) -> Operation {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        return match key.code {
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'x' => Operation::Exit,
                'r' => Operation::OpenFile,
                'o' => Operation::SaveFile,
                'w' => Operation::CloseFile,
                'f' => Operation::Search,
                'a' => Operation::MoveLineStart,
                'e' => Operation::MoveLineEnd,
                'v' => Operation::NextHalfPage,
                'z' | 'y' => Operation::PrevHalfPage,
                'n' => Operation::NextMatch,
                'p' => Operation::PrevMatch,
                'k' => Operation::CommandPrefix,
                // terminals report ^/ as ^_ or ^7
                '/' | '_' | '7' => Operation::Help,
                _ => Operation::Unbound,
            },
            _ => Operation::Unbound,
        };
    }

    if alt {
        return match key.code {
            KeyCode::Right => Operation::NextBuffer,
            KeyCode::Left => Operation::PrevBuffer,
            _ => Operation::Unbound,
        };
    }

    match key.code {
        KeyCode::Up => Operation::MoveCursorUp,
        KeyCode::Down => Operation::MoveCursorDown,
        KeyCode::Left => Operation::MoveCursorLeft,
        KeyCode::Right => Operation::MoveCursorRight,
        KeyCode::Home => Operation::MoveLineStart,
        KeyCode::End => Operation::MoveLineEnd,
        KeyCode::PageDown => Operation::NextHalfPage,
        KeyCode::PageUp => Operation::PrevHalfPage,
        KeyCode::Enter => Operation::InsertNewline,
        KeyCode::Backspace => Operation::DeleteChar,
        KeyCode::Tab => Operation::InsertTab,
        KeyCode::Esc => Operation::Cancel,
        KeyCode::F(1) => Operation::Help,
        KeyCode::Char(c) if !c.is_control() => Operation::InsertChar(c),
        _ => Operation::Unbound,
    }
}

/// Second key after `^K`. Anything unbound abandons the chord.
fn map_chord(key: &KeyEvent) -> Operation {
    match key.code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' => Operation::DeleteLine,
            'n' => Operation::NextBuffer,
            'p' => Operation::PrevBuffer,
            'w' => Operation::CloseFile,
            'f' => Operation::Search,
            _ => Operation::Noop,
        },
        _ => Operation::Noop,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Operation {
    let pos = ScreenPos::new(mouse.row as usize, mouse.column as usize);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Operation::MouseLeft(pos),
        MouseEventKind::Down(MouseButton::Right) => Operation::MouseRight(pos),
        MouseEventKind::ScrollUp => Operation::WheelUp(pos),
        MouseEventKind::ScrollDown => Operation::WheelDown(pos),
        _ => Operation::Noop,
    }
}
