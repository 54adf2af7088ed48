use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::QuestionSource;
use crate::state::AppState;

/// Heading and detail shown for a survey with nothing to preview.
pub fn empty_message(source: QuestionSource) -> (&'static str, &'static str) {
    match source {
        QuestionSource::Manual => (
            "No questions yet",
            "Add questions to this survey to preview how respondents will see it.",
        ),
        QuestionSource::QuestionBank => (
            "Questions come from a question bank",
            "Questions are drawn from the linked bank when a respondent starts, so there is nothing to preview here.",
        ),
    }
}

pub fn draw_empty(f: &mut Frame, area: Rect, state: &AppState) {
    let (heading, detail) = empty_message(state.survey.question_source);

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            heading,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(detail),
        Line::from(""),
        Line::from(Span::styled("[Ctrl+Q] Exit", Style::default().fg(Color::DarkGray))),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
