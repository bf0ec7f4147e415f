// Library root: re-exports all modules so integration tests can drive the
// app loop and the view layer directly.

pub mod app;
pub mod protocol;
pub mod tui;
