// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI and
// completion events from the draw timer. Owns the session and pushes UI
// updates to the TUI render loop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use lucky_draw_core::config::Config;
use lucky_draw_core::draw::{plan_draw, SETTLE_DELAY};
use lucky_draw_core::export::{self, ExportError};
use lucky_draw_core::session::{Confirmation, DrawSettings, Session};

use crate::protocol::{AppSnapshot, DrawEvent, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub session: Session,
    /// Randomness for winner selection and reel padding.
    pub rng: StdRng,
    /// Timer task for the draw currently animating, if any.
    pub pending_draw: Option<JoinHandle<()>>,
    /// Sender the timer task uses to report completion.
    pub draw_tx: mpsc::Sender<DrawEvent>,
}

impl AppState {
    pub fn new(config: Config, rng: StdRng, draw_tx: mpsc::Sender<DrawEvent>) -> Self {
        let session = Session::new(DrawSettings::from(&config.draw));
        AppState {
            config,
            session,
            rng,
            pending_draw: None,
            draw_tx,
        }
    }

    /// Reel animation length from config.
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.config.draw.animation_ms)
    }

    /// Capture the current session into an `AppSnapshot`.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let session = &self.session;
        AppSnapshot {
            roster: session.roster().to_vec(),
            settings: session.settings(),
            eligible_count: session.eligible_pool().len(),
            max_draw_count: session.max_draw_count(),
            effective_draw_count: session.effective_draw_count(),
            mode: session.mode(),
            current_winners: session.current_winners().to_vec(),
            history: session.history().iter().cloned().collect(),
            total_winners: session.history().total_winners(),
        }
    }

    /// Start a draw and schedule its completion.
    ///
    /// Returns the reels to animate, or `None` when the session refused to
    /// start (empty pool or a draw already in flight).
    pub fn begin_draw(&mut self) -> Option<Vec<Vec<String>>> {
        let ticket = self.session.start_draw()?;
        let outcome = plan_draw(
            &ticket.pool,
            ticket.count,
            self.config.draw.reel_length,
            &mut self.rng,
        );

        let delay = self.animation() + SETTLE_DELAY;
        let generation = ticket.generation;
        let winners = outcome.winners;
        let tx = self.draw_tx.clone();
        debug!("Draw #{} completes in {:?}", generation, delay);

        self.cancel_pending_draw();
        self.pending_draw = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(DrawEvent::Finished { generation, winners }).await;
        }));

        Some(outcome.reels)
    }

    /// Abort the timer task, if one is pending.
    pub fn cancel_pending_draw(&mut self) {
        if let Some(handle) = self.pending_draw.take() {
            handle.abort();
            debug!("Aborted pending draw timer");
        }
    }

    /// Tear down any in-flight draw so no winners are reported afterwards.
    pub fn shutdown(&mut self) {
        self.cancel_pending_draw();
        self.session.cancel_draw();
    }

    /// Apply a timer completion. Returns whether a round was recorded.
    pub fn complete_draw(&mut self, generation: u64, winners: Vec<String>) -> bool {
        let recorded = self.session.finish_draw(generation, winners).is_some();
        if recorded {
            self.pending_draw = None;
        }
        recorded
    }

    /// Write the CSV export. `Ok(None)` when there is nothing to export.
    pub fn export_history(&self) -> Result<Option<PathBuf>, ExportError> {
        let dir = self.config.export.resolve_directory();
        self.export_history_to(&dir)
    }

    fn export_history_to(&self, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
        match export::write_export(
            dir,
            self.session.history(),
            &self.config.export.timestamp_format,
            chrono::Utc::now().date_naive(),
        ) {
            Ok(path) => Ok(Some(path)),
            Err(ExportError::EmptyHistory) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Processes user commands and draw completions until the user quits or the
/// command channel closes. Pushes UI updates through `ui_tx`.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut draw_rx: mpsc::Receiver<DrawEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Track whether the draw channel is still open so select! never spins on
    // a closed receiver.
    let mut draw_open = true;

    send_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Draw timer events ---
            event = draw_rx.recv(), if draw_open => {
                match event {
                    Some(event) => handle_draw_event(&mut state, event, &ui_tx).await,
                    None => {
                        info!("Draw channel closed");
                        draw_open = false;
                    }
                }
            }
        }
    }

    // Cleanup
    state.shutdown();
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(snapshot))).await;
}

async fn send_notice(ui_tx: &mpsc::Sender<UiUpdate>, text: impl Into<String>) {
    let _ = ui_tx.send(UiUpdate::Notice(text.into())).await;
}

async fn handle_draw_event(state: &mut AppState, event: DrawEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    match event {
        DrawEvent::Finished {
            generation,
            winners,
        } => {
            if state.complete_draw(generation, winners) {
                send_snapshot(state, ui_tx).await;
            }
        }
    }
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::SetRosterText(text) => {
            if let Err(e) = state.session.set_roster_text(&text) {
                send_notice(ui_tx, e.to_string()).await;
            }
        }
        UserCommand::ImportFile(path) => {
            if path.as_os_str().is_empty() {
                return;
            }
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes);
                    match state.session.import_file(&content) {
                        Ok(report) => {
                            send_notice(
                                ui_tx,
                                format!(
                                    "Imported {} names from {} ({} already listed)",
                                    report.added,
                                    path.display(),
                                    report.skipped
                                ),
                            )
                            .await;
                        }
                        Err(e) => send_notice(ui_tx, e.to_string()).await,
                    }
                }
                Err(e) => {
                    warn!("Failed to read import file {}: {}", path.display(), e);
                    send_notice(ui_tx, format!("Cannot read {}: {}", path.display(), e)).await;
                    return;
                }
            }
        }
        UserCommand::Dedupe => match state.session.dedupe_roster() {
            Ok(removed) => {
                send_notice(ui_tx, format!("Removed {removed} duplicate names")).await;
            }
            Err(e) => send_notice(ui_tx, e.to_string()).await,
        },
        UserCommand::SetDrawCount(count) => {
            if let Err(e) = state.session.set_draw_count(count) {
                send_notice(ui_tx, e.to_string()).await;
            }
        }
        UserCommand::ToggleExcludeWinners => {
            if let Err(e) = state.session.toggle_exclude_winners() {
                send_notice(ui_tx, e.to_string()).await;
            }
        }
        UserCommand::StartDraw => {
            let Some(reels) = state.begin_draw() else {
                return;
            };
            let _ = ui_tx
                .send(UiUpdate::DrawStarted {
                    reels,
                    duration: state.animation(),
                })
                .await;
        }
        UserCommand::PrepareNextRound => {
            state.session.prepare_next_round();
        }
        UserCommand::ClearAll(confirmation) => {
            if confirmation == Confirmation::Accepted {
                state.cancel_pending_draw();
            }
            if !state.session.clear_all(confirmation) {
                return;
            }
            send_notice(ui_tx, "All names and rounds cleared").await;
        }
        UserCommand::ExportHistory => match state.export_history() {
            Ok(Some(path)) => {
                send_notice(ui_tx, format!("Saved {}", path.display())).await;
            }
            Ok(None) => return,
            Err(e) => {
                warn!("Export failed: {}", e);
                send_notice(ui_tx, format!("Export failed: {e}")).await;
                return;
            }
        },
        UserCommand::Quit => {
            // Handled in the main loop
            return;
        }
    }

    send_snapshot(state, ui_tx).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lucky_draw_core::session::DrawMode;
    use rand::SeedableRng;

    fn test_state() -> (AppState, mpsc::Receiver<DrawEvent>) {
        let (draw_tx, draw_rx) = mpsc::channel(8);
        let state = AppState::new(Config::default(), StdRng::seed_from_u64(7), draw_tx);
        (state, draw_rx)
    }

    #[test]
    fn new_state_uses_config_defaults() {
        let (mut state, _rx) = test_state();
        assert_eq!(state.session.settings().draw_count, 1);
        assert!(state.session.settings().exclude_winners);
        assert_eq!(state.animation(), Duration::from_millis(3500));
        assert!(state.pending_draw.is_none());
        state.shutdown();
    }

    #[test]
    fn snapshot_reflects_session() {
        let (mut state, _rx) = test_state();
        state.session.set_roster_text("A\nB\nA").unwrap();
        state.session.set_draw_count(2).unwrap();
        let snap = state.build_snapshot();
        assert_eq!(snap.roster.len(), 3);
        assert_eq!(snap.eligible_count, 2);
        assert_eq!(snap.max_draw_count, 3);
        assert_eq!(snap.effective_draw_count, 2);
        assert_eq!(snap.mode, DrawMode::Idle);
        assert!(snap.history.is_empty());
        assert_eq!(snap.total_winners, 0);
    }

    #[test]
    fn begin_draw_on_empty_roster_returns_none() {
        let (mut state, _rx) = test_state();
        assert!(state.begin_draw().is_none());
        assert!(state.pending_draw.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn begin_draw_reports_winners_after_animation() {
        let (mut state, mut rx) = test_state();
        state.session.set_roster_text("A\nB\nC").unwrap();
        state.session.set_draw_count(2).unwrap();

        let reels = state.begin_draw().expect("draw starts");
        assert_eq!(reels.len(), 2);
        assert!(reels.iter().all(|r| r.len() == 40));
        assert_eq!(state.session.mode(), DrawMode::Drawing);

        let start = tokio::time::Instant::now();
        let DrawEvent::Finished { generation, winners } = rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(3600));

        let expected: Vec<String> = reels.iter().map(|r| r.last().unwrap().clone()).collect();
        assert_eq!(winners, expected);
        assert!(state.complete_draw(generation, winners));
        assert_eq!(state.session.mode(), DrawMode::ResultShown);
        assert_eq!(state.session.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_timer() {
        let (mut state, mut rx) = test_state();
        state.session.set_roster_text("A").unwrap();
        state.begin_draw().unwrap();
        state.shutdown();
        assert_eq!(state.session.mode(), DrawMode::Idle);

        drop(state);
        // The only sender was held by the state and the aborted task.
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn export_with_empty_history_is_noop() {
        let (state, _rx) = test_state();
        let dir = std::env::temp_dir().join("lucky_draw_app_export_empty");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(state.export_history_to(&dir).unwrap().is_none());
        assert!(!dir.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn export_writes_csv_after_round() {
        let (mut state, mut rx) = test_state();
        state.session.set_roster_text("Bob").unwrap();
        state.begin_draw().unwrap();
        let DrawEvent::Finished { generation, winners } = rx.recv().await.unwrap();
        state.complete_draw(generation, winners);

        let dir = std::env::temp_dir().join("lucky_draw_app_export");
        let _ = std::fs::remove_dir_all(&dir);
        let path = state.export_history_to(&dir).unwrap().expect("file written");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("\"Bob\""));
    }
}
