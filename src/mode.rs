/// Editor modes. Confirmation modes carry the buffers they are about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Edit,
    Dir,
    FileOpen,
    FileSave,
    Search,
    /// Exit requested while these buffers hold unsaved changes.
    ConfirmExit(Vec<usize>),
    /// Close requested for a buffer with unsaved changes.
    ConfirmClose(usize),
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Edit => "EDIT",
            Mode::Dir => "DIR",
            Mode::FileOpen => "OPEN",
            Mode::FileSave => "SAVE",
            Mode::Search => "SEARCH",
            Mode::ConfirmExit(_) => "EXIT?",
            Mode::ConfirmClose(_) => "CLOSE?",
        }
    }

    /// Modes whose input goes to the one-line prompt.
    pub fn is_prompt(&self) -> bool {
        matches!(self, Mode::FileOpen | Mode::FileSave | Mode::Search)
    }

    pub fn is_confirm(&self) -> bool {
        matches!(self, Mode::ConfirmExit(_) | Mode::ConfirmClose(_))
    }
}
