// History widget: completed rounds, newest first.
//
// Each: "Round {n}  {time}  {count} winner(s): {names}"

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use chrono::Local;
use lucky_draw_core::history::RoundRecord;

use crate::tui::input::HISTORY_SCROLL;
use crate::tui::ViewState;

/// Render the round history into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.history.is_empty() {
        let paragraph = Paragraph::new("  No rounds drawn yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("History"));
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = state.history.len();

    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = state.scroll(HISTORY_SCROLL).min(max_offset);

    let items: Vec<ListItem> = state
        .history
        .iter()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|record| ListItem::new(round_line(record)))
        .collect();

    let title = format!(
        "History ({} rounds, {} winners)",
        total, state.total_winners
    );

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Format the header part of a round: "Round 3  14:05:09  2 winners".
pub fn format_round(record: &RoundRecord) -> String {
    let time = record.timestamp.with_timezone(&Local).format("%H:%M:%S");
    let noun = if record.winners.len() == 1 {
        "winner"
    } else {
        "winners"
    };
    format!(
        "Round {}  {}  {} {}",
        record.round,
        time,
        record.winners.len(),
        noun
    )
}

fn round_line(record: &RoundRecord) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format_round(record),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(": "),
        Span::styled(record.winners.join(", "), Style::default().fg(Color::Green)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
