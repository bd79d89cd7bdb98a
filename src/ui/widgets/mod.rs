// ui/widgets/mod.rs - UI widgets

pub mod editor_pane;
pub mod message_line;
pub mod status_bar;
pub mod title_bar;
