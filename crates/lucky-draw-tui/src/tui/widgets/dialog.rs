// Modal overlays: y/n confirmation and the import path prompt.
//
// Rendered centered on top of the main layout when `ViewState::confirm` or
// `ViewState::import_prompt` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::ConfirmKind;

const CONFIRM_WIDTH: u16 = 44;
const CONFIRM_HEIGHT: u16 = 5;
const PROMPT_WIDTH: u16 = 60;
const PROMPT_HEIGHT: u16 = 5;

/// Title and question for a confirmation overlay.
pub fn confirm_text(kind: ConfirmKind) -> (&'static str, &'static str) {
    match kind {
        ConfirmKind::Quit => (" Quit? ", "Really quit?"),
        ConfirmKind::ClearAll => (" Clear all? ", "Remove all names and rounds?"),
    }
}

/// Render a y/n confirmation overlay centered on the screen.
pub fn render_confirm(frame: &mut Frame, area: Rect, kind: ConfirmKind) {
    let dialog_area = centered_rect(CONFIRM_WIDTH, CONFIRM_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let (title, question) = confirm_text(kind);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Line::from(vec![
        Span::raw(format!("  {question} (")),
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("/"),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(")"),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Render a single-line text prompt centered on the screen.
pub fn render_prompt(frame: &mut Frame, area: Rect, title: &str, input: &str) {
    let dialog_area = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {title} "));

    let lines = vec![
        Line::from(vec![
            Span::raw(" > "),
            Span::raw(input.to_string()),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ]),
        Line::from(Span::styled(
            " Enter:Import  Esc:Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the dialog is clamped to the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let result = centered_rect(CONFIRM_WIDTH, CONFIRM_HEIGHT, area);
        assert_eq!(result.width, CONFIRM_WIDTH);
        assert_eq!(result.height, CONFIRM_HEIGHT);
        let dx = (result.x + result.width / 2) as i32 - (area.width / 2) as i32;
        let dy = (result.y + result.height / 2) as i32 - (area.height / 2) as i32;
        assert!(dx.unsigned_abs() <= 1, "not horizontally centered: {result:?}");
        assert!(dy.unsigned_abs() <= 1, "not vertically centered: {result:?}");
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let result = centered_rect(PROMPT_WIDTH, PROMPT_HEIGHT, area);
        assert!(result.width <= area.width);
        assert!(result.height <= area.height);
    }

    #[test]
    fn confirm_text_per_kind() {
        assert_eq!(confirm_text(ConfirmKind::Quit).1, "Really quit?");
        assert!(confirm_text(ConfirmKind::ClearAll).1.contains("names and rounds"));
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_confirm(frame, area, ConfirmKind::ClearAll);
                render_prompt(frame, area, "Import file", "~/names.csv");
            })
            .unwrap();
    }
}
