// TUI widget modules for each dashboard panel.

pub mod dialog;
pub mod history;
pub mod reels;
pub mod roster_editor;
pub mod settings;
pub mod status_bar;
