// Roster editor widget: the multi-line name buffer.
//
// Shows the editor text with a block cursor while editing. The title carries
// the participant count; the border turns cyan in edit mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

const PLACEHOLDER: &str = "  Press e and type names, one per line or separated by ;";

/// Render the roster editor into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let border = if state.edit_mode {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!("Names ({})", state.roster.len()));

    if state.editor_text.is_empty() && !state.edit_mode {
        let paragraph = Paragraph::new(PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let lines = editor_lines(&state.editor_text, state.edit_mode);

    // Keep the cursor line in view: subtract 2 for borders.
    let visible_rows = (area.height as usize).saturating_sub(2);
    let scroll = lines.len().saturating_sub(visible_rows.max(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Split the buffer into display lines, appending a cursor when editing.
pub fn editor_lines(text: &str, editing: bool) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = text
        .split('\n')
        .map(|line| Line::from(line.to_string()))
        .collect();

    if editing {
        let cursor = Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        );
        if let Some(last) = lines.last_mut() {
            last.push_span(cursor);
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_lines_split_on_newlines() {
        let lines = editor_lines("Alice\nBob;Carol\n", false);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].to_string(), "Bob;Carol");
        assert_eq!(lines[2].to_string(), "");
    }

    #[test]
    fn editor_lines_cursor_on_last_line() {
        let lines = editor_lines("Alice\nB", true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans.len(), 2);
        assert_eq!(lines[0].spans.len(), 1);
    }

    #[test]
    fn empty_buffer_while_editing_shows_cursor() {
        let lines = editor_lines("", true);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), " ");
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_long_buffer() {
        let backend = ratatui::backend::TestBackend::new(30, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.edit_mode = true;
        state.editor_text = (1..=50).map(|i| format!("Person {i}")).collect::<Vec<_>>().join("\n");
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
