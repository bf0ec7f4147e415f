// Status bar widget: tab indicator, roster counts, last notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [tab bar] | [participants / eligible] | [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(tab_spans(state.active_tab, state.is_drawing()));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        counts_text(state),
        Style::default().fg(Color::White),
    ));

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "N participants, M eligible".
pub fn counts_text(state: &ViewState) -> String {
    format!(
        "{} participants, {} eligible",
        state.roster.len(),
        state.eligible_count
    )
}

/// Build tab indicator spans with the active tab highlighted.
/// E.g. "[1:Names] [2:Draw] [3:History]". Inactive tabs are dimmed while a
/// draw locks tab switching.
pub fn tab_spans(active: TabId, locked: bool) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab) in TabId::ALL.into_iter().enumerate() {
        let style = if tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else if locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, tab_label(tab)), style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Return the label for a tab.
pub fn tab_label(tab: TabId) -> &'static str {
    match tab {
        TabId::Input => "Names",
        TabId::Draw => "Draw",
        TabId::History => "History",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_spans_label_every_tab() {
        let spans = tab_spans(TabId::Draw, false);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "[1:Names] [2:Draw] [3:History] ");
    }

    #[test]
    fn active_tab_is_bold() {
        let spans = tab_spans(TabId::History, false);
        let active = spans
            .iter()
            .find(|s| s.content.contains("History"))
            .unwrap();
        assert!(active.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn locked_tabs_are_dimmed() {
        let spans = tab_spans(TabId::Draw, true);
        let names = spans.iter().find(|s| s.content.contains("Names")).unwrap();
        assert_eq!(names.style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn counts_text_reports_roster_and_pool() {
        let mut state = ViewState::default();
        state.roster = vec!["A".into(), "B".into(), "A".into()];
        state.eligible_count = 1;
        assert_eq!(counts_text(&state), "3 participants, 1 eligible");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.notice = Some("Saved lucky_draw_results_2026-10-19.csv".to_string());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
