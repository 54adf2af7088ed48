use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::navigation::PageLayout;
use crate::state::{AppState, Screen};

pub fn draw_statusbar(f: &mut Frame, area: Rect, state: &AppState) {
    let session = state.store.session_id().to_string();
    let short_session: String = session.chars().take(8).collect();

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            format!("session {}", short_session),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if state.screen() != Screen::Empty {
        let counts = state.status_counts();
        let total = state.survey.questions.len();
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("✓ {}/{} answered", counts.answered, total),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("○ {} skipped", counts.unanswered),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("· {} unread", counts.unread),
            Style::default().fg(Color::DarkGray),
        ));
        if state.nav.layout() == PageLayout::OnePerPage {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("page {} of {}", state.nav.page() + 1, state.nav.page_count()),
                Style::default().fg(Color::Cyan),
            ));
        }
    }

    if let Some(message) = &state.status_message {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(message.clone(), Style::default().fg(Color::Yellow)));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
