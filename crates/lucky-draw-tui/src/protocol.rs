// Message types exchanged between the TUI, the app orchestrator and the
// draw timer task.

use std::path::PathBuf;
use std::time::Duration;

use lucky_draw_core::history::RoundRecord;
use lucky_draw_core::session::{Confirmation, DrawMode, DrawSettings};

/// The three dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    /// Roster editor and draw settings.
    Input,
    /// Reels and the start / next-round actions.
    Draw,
    /// Completed rounds and CSV export.
    History,
}

impl TabId {
    pub const ALL: [TabId; 3] = [TabId::Input, TabId::Draw, TabId::History];

    /// The tab after this one, wrapping around.
    pub fn next(self) -> TabId {
        match self {
            TabId::Input => TabId::Draw,
            TabId::Draw => TabId::History,
            TabId::History => TabId::Input,
        }
    }

    /// The tab before this one, wrapping around.
    pub fn prev(self) -> TabId {
        match self {
            TabId::Input => TabId::History,
            TabId::Draw => TabId::Input,
            TabId::History => TabId::Draw,
        }
    }
}

/// Commands from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Replace the roster with the names parsed from the editor text.
    SetRosterText(String),
    /// Read a `.csv` / `.txt` file and merge its names into the roster.
    ImportFile(PathBuf),
    /// Remove duplicate names from the roster.
    Dedupe,
    SetDrawCount(usize),
    ToggleExcludeWinners,
    StartDraw,
    PrepareNextRound,
    /// Reset the session; carries the user's answer to the confirmation.
    ClearAll(Confirmation),
    /// Write the history CSV to the export directory.
    ExportHistory,
    Quit,
}

/// Events from the draw timer task back to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawEvent {
    /// The animation for draw `generation` has run its course.
    Finished {
        generation: u64,
        winners: Vec<String>,
    },
}

/// Everything the TUI needs to render, captured after each state change.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub roster: Vec<String>,
    pub settings: DrawSettings,
    pub eligible_count: usize,
    /// Upper bound for the draw count setting.
    pub max_draw_count: usize,
    /// Winners the next draw will produce.
    pub effective_draw_count: usize,
    pub mode: DrawMode,
    pub current_winners: Vec<String>,
    /// Newest first.
    pub history: Vec<RoundRecord>,
    /// Winner slots across every round.
    pub total_winners: usize,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    /// A draw began: one reel per winner slot, animated over `duration`.
    DrawStarted {
        reels: Vec<Vec<String>>,
        duration: Duration,
    },
    /// A one-line message for the status bar.
    Notice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycle_wraps_both_ways() {
        for tab in TabId::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
        assert_eq!(TabId::History.next(), TabId::Input);
        assert_eq!(TabId::Input.prev(), TabId::History);
    }
}
