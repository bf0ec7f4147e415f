// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (tab switching,
// scrolling, editor typing, overlays).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use lucky_draw_core::session::{Confirmation, DrawMode};

use super::{ConfirmKind, ViewState};
use crate::protocol::{TabId, UserCommand};

/// Scroll key for the history list.
pub const HISTORY_SCROLL: &str = "history";

/// Lines moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally by
/// mutating `ViewState` or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows emits Release events too; only act on presses.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if let Some(kind) = view_state.confirm {
        return handle_confirm(key_event, view_state, kind);
    }

    if view_state.import_prompt.is_some() {
        return handle_import_prompt(key_event, view_state);
    }

    if view_state.edit_mode {
        return handle_edit_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => switch_tab(view_state, TabId::Input),
        KeyCode::Char('2') => switch_tab(view_state, TabId::Draw),
        KeyCode::Char('3') => switch_tab(view_state, TabId::History),
        KeyCode::Tab => switch_tab(view_state, view_state.active_tab.next()),
        KeyCode::BackTab => switch_tab(view_state, view_state.active_tab.prev()),

        KeyCode::Char('q') => {
            view_state.confirm = Some(ConfirmKind::Quit);
            None
        }

        KeyCode::Esc => {
            view_state.notice = None;
            None
        }

        _ => match view_state.active_tab {
            TabId::Input => handle_input_tab(key_event, view_state),
            TabId::Draw => handle_draw_tab(key_event, view_state),
            TabId::History => handle_history_tab(key_event, view_state),
        },
    }
}

/// Change tabs unless a draw is running.
fn switch_tab(view_state: &mut ViewState, tab: TabId) -> Option<UserCommand> {
    if !view_state.is_drawing() {
        view_state.active_tab = tab;
    }
    None
}

fn handle_input_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    if view_state.is_drawing() {
        return None;
    }
    match key_event.code {
        KeyCode::Char('e') => {
            view_state.edit_mode = true;
            None
        }
        KeyCode::Char('i') => {
            view_state.import_prompt = Some(String::new());
            None
        }
        KeyCode::Char('d') => Some(UserCommand::Dedupe),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let next = view_state.settings.draw_count.saturating_add(1);
            (next <= view_state.max_draw_count).then_some(UserCommand::SetDrawCount(next))
        }
        KeyCode::Char('-') => {
            let next = view_state.settings.draw_count.saturating_sub(1);
            (next >= 1).then_some(UserCommand::SetDrawCount(next))
        }
        KeyCode::Char('w') => Some(UserCommand::ToggleExcludeWinners),
        KeyCode::Char('x') => {
            view_state.confirm = Some(ConfirmKind::ClearAll);
            None
        }
        _ => None,
    }
}

fn handle_draw_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(' ') | KeyCode::Enter => {
            if view_state.is_drawing() || view_state.eligible_count == 0 {
                None
            } else {
                Some(UserCommand::StartDraw)
            }
        }
        KeyCode::Char('n') if view_state.mode == DrawMode::ResultShown => {
            Some(UserCommand::PrepareNextRound)
        }
        KeyCode::Char('h') => switch_tab(view_state, TabId::History),
        _ => None,
    }
}

fn handle_history_tab(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('s') => {
            (!view_state.history.is_empty()).then_some(UserCommand::ExportHistory)
        }
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }
        KeyCode::Home => {
            view_state.scroll_offset.insert(HISTORY_SCROLL.to_string(), 0);
            None
        }
        _ => None,
    }
}

/// Handle key events while a confirmation overlay is open.
///
/// - `y` confirms (`q` too, for the quit prompt)
/// - `n` or `Esc` declines
/// - All other keys are blocked
fn handle_confirm(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    kind: ConfirmKind,
) -> Option<UserCommand> {
    let answer = match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Confirmation::Accepted,
        KeyCode::Char('q') | KeyCode::Char('Q') if kind == ConfirmKind::Quit => {
            Confirmation::Accepted
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Confirmation::Declined,
        _ => return None,
    };

    view_state.confirm = None;
    match (kind, answer) {
        (ConfirmKind::Quit, Confirmation::Accepted) => Some(UserCommand::Quit),
        (ConfirmKind::Quit, Confirmation::Declined) => None,
        (ConfirmKind::ClearAll, answer) => Some(UserCommand::ClearAll(answer)),
    }
}

/// Handle key events while the import path prompt is open.
///
/// Enter submits the trimmed path (an empty path just closes the prompt),
/// Esc cancels.
fn handle_import_prompt(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.import_prompt = None;
            None
        }
        KeyCode::Enter => {
            let path = view_state.import_prompt.take()?;
            let path = path.trim();
            if path.is_empty() {
                None
            } else {
                Some(UserCommand::ImportFile(PathBuf::from(path)))
            }
        }
        KeyCode::Backspace => {
            if let Some(prompt) = view_state.import_prompt.as_mut() {
                prompt.pop();
            }
            None
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = view_state.import_prompt.as_mut() {
                prompt.push(c);
            }
            None
        }
        _ => None,
    }
}

/// Handle key events while typing in the roster editor.
///
/// Every change to the buffer is forwarded so the roster tracks the text.
fn handle_edit_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.edit_mode = false;
            None
        }
        KeyCode::Enter => {
            view_state.editor_text.push('\n');
            Some(UserCommand::SetRosterText(view_state.editor_text.clone()))
        }
        KeyCode::Backspace => {
            view_state.editor_text.pop()?;
            Some(UserCommand::SetRosterText(view_state.editor_text.clone()))
        }
        KeyCode::Char(c) => {
            view_state.editor_text.push(c);
            Some(UserCommand::SetRosterText(view_state.editor_text.clone()))
        }
        _ => None,
    }
}

fn scroll_up(view_state: &mut ViewState, lines: usize) {
    let offset = view_state
        .scroll_offset
        .entry(HISTORY_SCROLL.to_string())
        .or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let max = view_state.history.len().saturating_sub(1);
    let offset = view_state
        .scroll_offset
        .entry(HISTORY_SCROLL.to_string())
        .or_insert(0);
    *offset = offset.saturating_add(lines).min(max);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
