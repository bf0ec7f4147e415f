// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Main Panel (tab content)                          |
// |                                                   |
// |  Input:  editor (60%)      | settings (40%)       |
// |  Draw:   reels (fill)                             |
// |          actions (3 rows)                         |
// |  History: round list                              |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: tab bar, roster counts, notices.
    pub status_bar: Rect,
    /// Tab-switched content area.
    pub main_panel: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Areas of the Input tab.
#[derive(Debug, Clone)]
pub struct InputLayout {
    pub editor: Rect,
    pub settings: Rect,
}

/// Areas of the Draw tab.
#[derive(Debug, Clone)]
pub struct DrawLayout {
    pub reels: Rect,
    pub actions: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(5),    // main panel
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        help_bar: vertical[2],
    }
}

/// Split the main panel for the Input tab: editor (60%) | settings (40%).
pub fn split_input(area: Rect) -> InputLayout {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    InputLayout {
        editor: horizontal[0],
        settings: horizontal[1],
    }
}

/// Split the main panel for the Draw tab: reels above a 3-row action bar.
pub fn split_draw(area: Rect) -> DrawLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    DrawLayout {
        reels: vertical[0],
        actions: vertical[1],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
