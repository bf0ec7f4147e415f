// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the session as last reported by the
// app orchestrator. The orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use lucky_draw_core::history::RoundRecord;
use lucky_draw_core::roster;
use lucky_draw_core::session::{DrawMode, DrawSettings};

use crate::protocol::{AppSnapshot, TabId, UiUpdate, UserCommand};

use layout::{build_layout, split_draw, split_input, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Which destructive action the confirmation overlay is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    ClearAll,
    Quit,
}

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    pub roster: Vec<String>,
    pub settings: DrawSettings,
    pub eligible_count: usize,
    pub max_draw_count: usize,
    pub effective_draw_count: usize,
    pub mode: DrawMode,
    pub current_winners: Vec<String>,
    /// Completed rounds, newest first.
    pub history: Vec<RoundRecord>,
    pub total_winners: usize,
    /// Roster editor buffer.
    pub editor_text: String,
    /// Whether keystrokes go into the roster editor.
    pub edit_mode: bool,
    /// Path being typed for an import, while the prompt is open.
    pub import_prompt: Option<String>,
    /// Open confirmation overlay, if any.
    pub confirm: Option<ConfirmKind>,
    /// One reel per winner slot for the running (or last) draw.
    pub reels: Vec<Vec<String>>,
    /// When the reel animation started.
    pub draw_started_at: Option<Instant>,
    pub draw_duration: Duration,
    /// Last message from the orchestrator, shown in the status bar.
    pub notice: Option<String>,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_tab: TabId::Input,
            roster: Vec::new(),
            settings: DrawSettings::default(),
            eligible_count: 0,
            max_draw_count: 1,
            effective_draw_count: 1,
            mode: DrawMode::Idle,
            current_winners: Vec::new(),
            history: Vec::new(),
            total_winners: 0,
            editor_text: String::new(),
            edit_mode: false,
            import_prompt: None,
            confirm: None,
            reels: Vec::new(),
            draw_started_at: None,
            draw_duration: Duration::ZERO,
            notice: None,
            scroll_offset: HashMap::new(),
        }
    }
}

impl ViewState {
    /// Apply a full state snapshot from the app orchestrator.
    ///
    /// Tab, overlays, reels and scroll offsets are TUI-local and left alone.
    /// The editor buffer is rewritten from the roster only when the user is
    /// not typing in it and the two have drifted apart (import, dedupe,
    /// clear).
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.roster = snapshot.roster;
        self.settings = snapshot.settings;
        self.eligible_count = snapshot.eligible_count;
        self.max_draw_count = snapshot.max_draw_count;
        self.effective_draw_count = snapshot.effective_draw_count;
        self.mode = snapshot.mode;
        self.current_winners = snapshot.current_winners;
        self.history = snapshot.history;
        self.total_winners = snapshot.total_winners;

        if self.mode != DrawMode::Drawing {
            self.draw_started_at = None;
        }
        if !self.edit_mode {
            self.resync_editor();
        }
    }

    fn resync_editor(&mut self) {
        if self.roster.is_empty() {
            self.editor_text.clear();
            return;
        }
        let buffered = roster::parse(&self.editor_text);
        if buffered.len() != self.roster.len() {
            self.editor_text = roster::join(&self.roster);
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == DrawMode::Drawing
    }

    /// Scroll offset for a widget, defaulting to the top.
    pub fn scroll(&self, key: &str) -> usize {
        self.scroll_offset.get(key).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::DrawStarted { reels, duration } => {
            state.reels = reels;
            state.draw_duration = duration;
            state.draw_started_at = Some(Instant::now());
            state.mode = DrawMode::Drawing;
            state.current_winners.clear();
        }
        UiUpdate::Notice(text) => {
            state.notice = Some(text);
        }
    }
}

// ---------------------------------------------------------------------------
// Reel animation
// ---------------------------------------------------------------------------

/// Position on a reel of `len` names after `elapsed` of a `duration`-long spin.
///
/// Follows a cubic ease-out so the reel slows down before landing on the last
/// entry (the winner) once `elapsed >= duration`.
pub fn reel_index(elapsed: Duration, duration: Duration, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    if duration.is_zero() || elapsed >= duration {
        return last;
    }
    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
    let eased = 1.0 - (1.0 - t).powi(3);
    ((eased * last as f64).round() as usize).min(last)
}

/// The name each reel slot shows right now.
pub fn visible_reel_names(state: &ViewState, now: Instant) -> Vec<String> {
    if !state.is_drawing() {
        return state.current_winners.clone();
    }
    let elapsed = state
        .draw_started_at
        .map(|start| now.saturating_duration_since(start))
        .unwrap_or_default();
    state
        .reels
        .iter()
        .filter_map(|reel| {
            reel.get(reel_index(elapsed, state.draw_duration, reel.len()))
                .cloned()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    render_help_bar(frame, &layout, state);

    if let Some(prompt) = &state.import_prompt {
        widgets::dialog::render_prompt(frame, frame.area(), "Import file", prompt);
    }
    if let Some(kind) = state.confirm {
        widgets::dialog::render_confirm(frame, frame.area(), kind);
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    match state.active_tab {
        TabId::Input => {
            let zones = split_input(layout.main_panel);
            widgets::roster_editor::render(frame, zones.editor, state);
            widgets::settings::render(frame, zones.settings, state);
        }
        TabId::Draw => {
            let zones = split_draw(layout.main_panel);
            let names = visible_reel_names(state, Instant::now());
            widgets::reels::render(frame, zones.reels, state, &names);
            widgets::reels::render_actions(frame, zones.actions, state);
        }
        TabId::History => {
            widgets::history::render(frame, layout.main_panel, state);
        }
    }
}

/// Key hints for the current tab and mode.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.edit_mode {
        return " Type names (one per line or ;-separated) | Enter:New line | Esc:Done";
    }
    match state.active_tab {
        TabId::Input => {
            " e:Edit | i:Import | d:Dedupe | +/-:Count | w:Exclude winners | x:Clear | 1-3:Tabs | q:Quit"
        }
        TabId::Draw if state.is_drawing() => " Drawing...",
        TabId::Draw => " Space:Draw | n:Next round | h:History | 1-3:Tabs | q:Quit",
        TabId::History => " s:Save CSV | Up/Down:Scroll | 1-3:Tabs | q:Quit",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Orchestrator gone
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::from(e)),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::from(e));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn snapshot_with_roster(roster: &[&str]) -> AppSnapshot {
        AppSnapshot {
            roster: names(roster),
            settings: DrawSettings::default(),
            eligible_count: roster.len(),
            max_draw_count: roster.len().max(1),
            effective_draw_count: 1,
            mode: DrawMode::Idle,
            current_winners: Vec::new(),
            history: Vec::new(),
            total_winners: 0,
        }
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.active_tab, TabId::Input);
        assert_eq!(state.mode, DrawMode::Idle);
        assert!(state.roster.is_empty());
        assert!(state.editor_text.is_empty());
        assert!(!state.edit_mode);
        assert!(state.import_prompt.is_none());
        assert!(state.confirm.is_none());
        assert!(state.reels.is_empty());
        assert!(state.notice.is_none());
        assert!(state.scroll_offset.is_empty());
    }

    #[test]
    fn apply_snapshot_updates_fields() {
        let mut state = ViewState::default();
        let mut snapshot = snapshot_with_roster(&["Alice", "Bob"]);
        snapshot.mode = DrawMode::ResultShown;
        snapshot.current_winners = names(&["Bob"]);
        snapshot.history = vec![RoundRecord::new(1, names(&["Bob"]), Utc::now())];
        snapshot.total_winners = 1;
        state.apply_snapshot(snapshot);
        assert_eq!(state.roster, names(&["Alice", "Bob"]));
        assert_eq!(state.mode, DrawMode::ResultShown);
        assert_eq!(state.current_winners, names(&["Bob"]));
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.total_winners, 1);
        assert_eq!(state.active_tab, TabId::Input);
    }

    #[test]
    fn snapshot_fills_empty_editor_from_roster() {
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot_with_roster(&["Alice", "Bob"]));
        assert_eq!(state.editor_text, "Alice\nBob");
    }

    #[test]
    fn snapshot_rewrites_editor_when_sizes_differ() {
        let mut state = ViewState::default();
        state.editor_text = "Alice\nBob\nAlice".to_string();
        state.apply_snapshot(snapshot_with_roster(&["Alice", "Bob"]));
        assert_eq!(state.editor_text, "Alice\nBob");
    }

    #[test]
    fn snapshot_keeps_editor_formatting_when_sizes_match() {
        let mut state = ViewState::default();
        state.editor_text = "Alice; Bob".to_string();
        state.apply_snapshot(snapshot_with_roster(&["Alice", "Bob"]));
        assert_eq!(state.editor_text, "Alice; Bob");
    }

    #[test]
    fn snapshot_clears_editor_for_empty_roster() {
        let mut state = ViewState::default();
        state.editor_text = "Alice".to_string();
        state.apply_snapshot(snapshot_with_roster(&[]));
        assert!(state.editor_text.is_empty());
    }

    #[test]
    fn snapshot_leaves_editor_alone_while_editing() {
        let mut state = ViewState::default();
        state.edit_mode = true;
        state.editor_text = "Ali".to_string();
        state.apply_snapshot(snapshot_with_roster(&[]));
        assert_eq!(state.editor_text, "Ali");
    }

    #[test]
    fn apply_ui_update_draw_started() {
        let mut state = ViewState::default();
        state.current_winners = names(&["Old"]);
        apply_ui_update(
            &mut state,
            UiUpdate::DrawStarted {
                reels: vec![names(&["A", "B"])],
                duration: Duration::from_secs(3),
            },
        );
        assert!(state.is_drawing());
        assert!(state.draw_started_at.is_some());
        assert_eq!(state.draw_duration, Duration::from_secs(3));
        assert!(state.current_winners.is_empty());
    }

    #[test]
    fn apply_ui_update_notice() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Notice("Saved".to_string()));
        assert_eq!(state.notice.as_deref(), Some("Saved"));
    }

    #[test]
    fn reel_index_starts_at_zero_and_lands_on_last() {
        let duration = Duration::from_millis(3500);
        assert_eq!(reel_index(Duration::ZERO, duration, 40), 0);
        assert_eq!(reel_index(duration, duration, 40), 39);
        assert_eq!(reel_index(duration * 2, duration, 40), 39);
        assert_eq!(reel_index(Duration::ZERO, Duration::ZERO, 5), 4);
        assert_eq!(reel_index(Duration::from_secs(1), duration, 0), 0);
    }

    #[test]
    fn reel_index_is_monotonic_and_front_loaded() {
        let duration = Duration::from_millis(1000);
        let mut last = 0;
        for ms in (0..=1000).step_by(50) {
            let idx = reel_index(Duration::from_millis(ms), duration, 40);
            assert!(idx >= last);
            last = idx;
        }
        // Ease-out covers most of the reel in the first half.
        assert!(reel_index(Duration::from_millis(500), duration, 40) > 30);
    }

    #[test]
    fn visible_names_show_winners_when_not_drawing() {
        let mut state = ViewState::default();
        state.current_winners = names(&["Amy", "Bob"]);
        assert_eq!(visible_reel_names(&state, Instant::now()), names(&["Amy", "Bob"]));
    }

    #[test]
    fn visible_names_follow_reels_while_drawing() {
        let mut state = ViewState::default();
        let start = Instant::now();
        state.mode = DrawMode::Drawing;
        state.reels = vec![names(&["X", "Y", "Winner"])];
        state.draw_duration = Duration::from_secs(1);
        state.draw_started_at = Some(start);
        assert_eq!(visible_reel_names(&state, start), names(&["X"]));
        assert_eq!(
            visible_reel_names(&state, start + Duration::from_secs(2)),
            names(&["Winner"])
        );
    }

    #[test]
    fn help_text_depends_on_tab_and_mode() {
        let mut state = ViewState::default();
        assert!(help_text(&state).contains("Import"));
        state.edit_mode = true;
        assert!(help_text(&state).contains("Esc"));
        state.edit_mode = false;
        state.active_tab = TabId::Draw;
        assert!(help_text(&state).contains("Space"));
        state.mode = DrawMode::Drawing;
        assert!(help_text(&state).contains("Drawing"));
        state.active_tab = TabId::History;
        assert!(help_text(&state).contains("Save CSV"));
    }

    #[test]
    fn render_frame_does_not_panic_on_every_tab() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot_with_roster(&["Alice", "Bob", "Carol"]));
        state.history = vec![RoundRecord::new(1, names(&["Bob"]), Utc::now())];
        for tab in TabId::ALL {
            state.active_tab = tab;
            terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        }
        state.confirm = Some(ConfirmKind::Quit);
        state.import_prompt = Some("names.csv".to_string());
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
