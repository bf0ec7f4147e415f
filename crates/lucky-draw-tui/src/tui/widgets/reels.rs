// Reel slots widget: one box per winner slot, plus the Draw tab action bar.
//
// While a draw runs each slot shows the name its reel is currently passing;
// afterwards the slots hold the round's winners. Slots are laid out in a grid
// of up to SLOTS_PER_ROW columns.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use lucky_draw_core::session::DrawMode;

use crate::tui::ViewState;

const SLOTS_PER_ROW: usize = 4;
const SLOT_HEIGHT: u16 = 3;

/// Render the reel slots into the given area.
///
/// `names` holds what each slot shows this frame.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, names: &[String]) {
    let title = match state.mode {
        DrawMode::Drawing => "Drawing...".to_string(),
        DrawMode::ResultShown => format!("Winners ({})", names.len()),
        DrawMode::Idle => "Ready".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if names.is_empty() {
        let text = idle_text(state);
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, inner);
        return;
    }

    let slot_style = if state.mode == DrawMode::Drawing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };

    for (slot, name) in slot_rects(inner, names.len()).into_iter().zip(names) {
        let paragraph = Paragraph::new(name.as_str())
            .alignment(Alignment::Center)
            .style(slot_style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, slot);
    }
}

/// Message shown when no slot has a name yet.
pub fn idle_text(state: &ViewState) -> &'static str {
    if state.eligible_count == 0 {
        "Roster is empty"
    } else {
        "Press Space to draw"
    }
}

/// Lay out `count` slot boxes in rows of up to `SLOTS_PER_ROW`.
///
/// Rows that do not fit vertically are dropped.
pub fn slot_rects(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 || area.width == 0 || area.height == 0 {
        return Vec::new();
    }
    let columns = count.min(SLOTS_PER_ROW);
    let rows = count.div_ceil(columns);
    let fitting_rows = ((area.height / SLOT_HEIGHT) as usize).clamp(1, rows);

    let row_rects = Layout::vertical(vec![Constraint::Length(SLOT_HEIGHT); fitting_rows])
        .split(area);

    let mut rects = Vec::with_capacity(count);
    for (row, row_rect) in row_rects.iter().enumerate() {
        let in_row = (count - row * columns).min(columns);
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_rect);
        rects.extend(cells.iter().take(in_row).copied());
    }
    rects
}

/// Render the action bar under the reels.
pub fn render_actions(frame: &mut Frame, area: Rect, state: &ViewState) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let spans = match state.mode {
        DrawMode::Drawing => vec![Span::styled(" Drawing...", dim)],
        DrawMode::Idle if state.eligible_count == 0 => {
            vec![Span::styled(" [Space] Roster is empty", dim)]
        }
        DrawMode::Idle => vec![
            Span::styled(" [Space]", key),
            Span::raw(format!(" Draw {}", state.effective_draw_count)),
        ],
        DrawMode::ResultShown => vec![
            Span::styled(" [n]", key),
            Span::raw(" Next round  "),
            Span::styled("[h]", key),
            Span::raw(" History"),
        ],
    };

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
