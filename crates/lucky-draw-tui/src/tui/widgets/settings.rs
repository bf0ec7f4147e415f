// Settings widget: draw count, exclude-winners toggle, pool summary.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the draw settings panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let label = Style::default().fg(Color::Gray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("  Participants:    ", label),
            Span::styled(state.roster.len().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("  Eligible:        ", label),
            Span::styled(state.eligible_count.to_string(), value),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Winners/round:   ", label),
            Span::styled(draw_count_text(state), value),
        ]),
        Line::from(vec![
            Span::styled("  Exclude winners: ", label),
            toggle_span(state.settings.exclude_winners),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Rounds drawn:    {}", state.history.len()),
            label,
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Settings"),
    );
    frame.render_widget(paragraph, area);
}

/// "2 (1-5)", plus the clamped value when the pool is smaller.
pub fn draw_count_text(state: &ViewState) -> String {
    let mut text = format!(
        "{} (1-{})",
        state.settings.draw_count, state.max_draw_count
    );
    if state.effective_draw_count < state.settings.draw_count {
        text.push_str(&format!(", {} this round", state.effective_draw_count));
    }
    text
}

fn toggle_span(on: bool) -> Span<'static> {
    if on {
        Span::styled("[x] on", Style::default().fg(Color::Green))
    } else {
        Span::styled("[ ] off", Style::default().fg(Color::DarkGray))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_count_text_shows_bounds() {
        let mut state = ViewState::default();
        state.settings.draw_count = 2;
        state.max_draw_count = 5;
        state.effective_draw_count = 2;
        assert_eq!(draw_count_text(&state), "2 (1-5)");
    }

    #[test]
    fn draw_count_text_notes_clamping() {
        let mut state = ViewState::default();
        state.settings.draw_count = 4;
        state.max_draw_count = 5;
        state.effective_draw_count = 1;
        assert_eq!(draw_count_text(&state), "4 (1-5), 1 this round");
    }

    #[test]
    fn toggle_span_text() {
        assert_eq!(toggle_span(true).content, "[x] on");
        assert_eq!(toggle_span(false).content, "[ ] off");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(40, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
