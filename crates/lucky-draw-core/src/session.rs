// Session state: roster, settings, history, current winners, draw lifecycle.
//
// Draw lifecycle:
//
//   Idle --start_draw--> Drawing --finish_draw--> ResultShown
//    ^                      |                         |
//    +----cancel_draw-------+                         |
//    +-------------------prepare_next_round-----------+
//
// The mode is derived from two fields: an outstanding draw ticket means
// Drawing, non-empty current winners mean ResultShown, otherwise Idle.
// Roster and settings are read-only while Drawing.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DrawConfig;
use crate::draw::clamp_count;
use crate::history::{History, RoundRecord};
use crate::roster::{self, MergeReport};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("roster and settings are read-only while a draw is in progress")]
    DrawInProgress,
}

/// User-adjustable draw parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSettings {
    /// Winners per round. Always at least 1.
    pub draw_count: usize,
    /// Whether past winners are removed from the eligible pool.
    pub exclude_winners: bool,
}

impl Default for DrawSettings {
    fn default() -> Self {
        DrawSettings {
            draw_count: 1,
            exclude_winners: true,
        }
    }
}

impl From<&DrawConfig> for DrawSettings {
    fn from(config: &DrawConfig) -> Self {
        DrawSettings {
            draw_count: config.default_count.max(1),
            exclude_winners: config.exclude_winners,
        }
    }
}

/// Where the session is in the draw lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Idle,
    Drawing,
    ResultShown,
}

/// The user's answer to a destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

/// Permission to run one draw, handed out by [`Session::start_draw`].
///
/// The ticket snapshots the eligible pool and the clamped winner count at the
/// moment the draw started. Its generation must be presented back to
/// [`Session::finish_draw`]; completions from any other generation are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawTicket {
    pub generation: u64,
    pub pool: Vec<String>,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Session {
    roster: Vec<String>,
    settings: DrawSettings,
    /// Settings restored by `clear_all`.
    defaults: DrawSettings,
    history: History,
    current_winners: Vec<String>,
    /// Generation of the outstanding draw, if one is in flight.
    in_flight: Option<u64>,
    /// Monotonically increasing draw counter. Bumped on every `start_draw`.
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(DrawSettings::default())
    }
}

impl Session {
    /// Create an empty session with the given starting settings.
    pub fn new(settings: DrawSettings) -> Self {
        let settings = DrawSettings {
            draw_count: settings.draw_count.max(1),
            ..settings
        };
        Session {
            roster: Vec::new(),
            settings,
            defaults: settings,
            history: History::new(),
            current_winners: Vec::new(),
            in_flight: None,
            generation: 0,
        }
    }

    // -- Read access -------------------------------------------------------

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn settings(&self) -> DrawSettings {
        self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_winners(&self) -> &[String] {
        &self.current_winners
    }

    pub fn is_drawing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn mode(&self) -> DrawMode {
        if self.in_flight.is_some() {
            DrawMode::Drawing
        } else if !self.current_winners.is_empty() {
            DrawMode::ResultShown
        } else {
            DrawMode::Idle
        }
    }

    /// Names currently allowed to win.
    ///
    /// The roster in order with repeated names collapsed; when
    /// `exclude_winners` is on, every name that won any past round is removed.
    pub fn eligible_pool(&self) -> Vec<String> {
        let unique = roster::dedupe(&self.roster);
        if !self.settings.exclude_winners {
            return unique;
        }
        let past_winners = self.history.all_winners();
        unique
            .into_iter()
            .filter(|name| !past_winners.contains(name.as_str()))
            .collect()
    }

    /// Winner count the next draw will use, clamped to the eligible pool.
    pub fn effective_draw_count(&self) -> usize {
        clamp_count(self.settings.draw_count, self.eligible_pool().len())
    }

    /// Upper bound offered for the draw count setting.
    pub fn max_draw_count(&self) -> usize {
        self.roster.len().max(1)
    }

    // -- Roster and settings -------------------------------------------------

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.is_drawing() {
            warn!("Rejected roster/settings change during an active draw");
            return Err(SessionError::DrawInProgress);
        }
        Ok(())
    }

    /// Replace the roster with the names parsed from editor text.
    pub fn set_roster_text(&mut self, raw: &str) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.roster = roster::parse(raw);
        debug!("Roster replaced from text: {} names", self.roster.len());
        Ok(())
    }

    /// Merge the names from an imported file into the roster.
    pub fn import_file(&mut self, content: &str) -> Result<MergeReport, SessionError> {
        self.ensure_editable()?;
        let report = roster::merge_import(&self.roster, roster::parse_file(content));
        self.roster = report.roster.clone();
        info!(
            "Imported {} new names ({} already present), roster now {}",
            report.added,
            report.skipped,
            self.roster.len()
        );
        Ok(report)
    }

    /// Remove duplicate names. Returns how many entries were dropped.
    pub fn dedupe_roster(&mut self) -> Result<usize, SessionError> {
        self.ensure_editable()?;
        let before = self.roster.len();
        self.roster = roster::dedupe(&self.roster);
        let removed = before - self.roster.len();
        info!("Deduplicated roster: removed {}", removed);
        Ok(removed)
    }

    /// Set the winners-per-round count, clamped to `[1, max(1, roster size)]`.
    /// Returns the value actually stored.
    pub fn set_draw_count(&mut self, count: usize) -> Result<usize, SessionError> {
        self.ensure_editable()?;
        self.settings.draw_count = count.clamp(1, self.max_draw_count());
        Ok(self.settings.draw_count)
    }

    pub fn set_exclude_winners(&mut self, exclude: bool) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.settings.exclude_winners = exclude;
        Ok(())
    }

    /// Flip the exclude-winners flag. Returns the new value.
    pub fn toggle_exclude_winners(&mut self) -> Result<bool, SessionError> {
        let next = !self.settings.exclude_winners;
        self.set_exclude_winners(next)?;
        Ok(next)
    }

    // -- Draw lifecycle ------------------------------------------------------

    /// Begin a draw.
    ///
    /// Returns `None` without touching any state when the eligible pool is
    /// empty or another draw is already in flight.
    pub fn start_draw(&mut self) -> Option<DrawTicket> {
        if self.is_drawing() {
            debug!("start_draw ignored: draw already in flight");
            return None;
        }
        let pool = self.eligible_pool();
        if pool.is_empty() {
            debug!("start_draw ignored: eligible pool is empty");
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.current_winners.clear();

        let count = clamp_count(self.settings.draw_count, pool.len());
        info!(
            "Draw #{} started: {} of {} eligible",
            self.generation,
            count,
            pool.len()
        );
        Some(DrawTicket {
            generation: self.generation,
            pool,
            count,
        })
    }

    /// Complete the outstanding draw, stamping the round with the current time.
    pub fn finish_draw(&mut self, generation: u64, winners: Vec<String>) -> Option<&RoundRecord> {
        self.finish_draw_at(generation, winners, Utc::now())
    }

    /// Complete the outstanding draw with an explicit timestamp.
    ///
    /// Records exactly one round: numbered `history.len() + 1`, prepended to
    /// history, and mirrored into current winners. A generation that does not
    /// match the outstanding ticket is ignored and returns `None`.
    pub fn finish_draw_at(
        &mut self,
        generation: u64,
        winners: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Option<&RoundRecord> {
        if self.in_flight != Some(generation) {
            warn!(
                "Discarding completion for draw #{} (outstanding: {:?})",
                generation, self.in_flight
            );
            return None;
        }

        let record = RoundRecord::new(self.history.next_round(), winners, timestamp);
        info!(
            "Round {} recorded: {}",
            record.round,
            record.winners.join(", ")
        );
        self.in_flight = None;
        self.current_winners = record.winners.clone();
        Some(self.history.prepend(record))
    }

    /// Drop the outstanding draw without recording a round.
    /// Returns whether a draw was cancelled.
    pub fn cancel_draw(&mut self) -> bool {
        match self.in_flight.take() {
            Some(generation) => {
                info!("Draw #{} cancelled before completion", generation);
                true
            }
            None => false,
        }
    }

    /// Leave the result view so the next round can start.
    pub fn prepare_next_round(&mut self) {
        if self.is_drawing() {
            return;
        }
        self.current_winners.clear();
    }

    /// Reset the session after explicit confirmation.
    ///
    /// Clears roster, history, current winners and any in-flight draw, and
    /// restores the starting settings. Returns whether the reset happened.
    pub fn clear_all(&mut self, confirmation: Confirmation) -> bool {
        if confirmation == Confirmation::Declined {
            info!("Clear-all declined; session unchanged");
            return false;
        }
        self.roster.clear();
        self.history.clear();
        self.current_winners.clear();
        self.in_flight = None;
        self.settings = self.defaults;
        info!("Session cleared");
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
