// lib.rs - Library root for the pine editor

pub mod buffer;
pub mod cli;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod keymap;
pub mod layout;
pub mod mode;
pub mod operation;
pub mod search;
pub mod session;
pub mod ui;
pub mod viewport;
