use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::report::{answer_display, format_points, score_line, verdict_mark};
use crate::scoring::Verdict;
use crate::state::AppState;
use crate::ui::question::wrap_text;

pub fn result_lines(state: &AppState, width: u16) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = vec![Line::from("")];
    let Some(result) = &state.result else {
        return lines;
    };
    let visibility = state.visibility();

    if visibility.score {
        let (badge, color) = if result.passed {
            ("  ✓  PASSED", Color::Green)
        } else {
            ("  ✗  NOT PASSED", Color::Red)
        };
        lines.push(Line::from(Span::styled(
            badge,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("  Score: "),
            Span::styled(score_line(result), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(format!(
            "  Correct: {}   Wrong: {}   Unanswered: {}",
            result.correct_answers,
            result.wrong_answers,
            result.unanswered()
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  ✓  Responses submitted",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  This survey hides the score from respondents.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if visibility.breakdown || visibility.correct_answers {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Breakdown",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        let text_width = (width as usize).saturating_sub(18);

        for (i, outcome) in result.outcomes.iter().enumerate() {
            let Some(question) = state.survey.question(&outcome.question_id) else {
                continue;
            };
            let color = match outcome.verdict {
                Verdict::Correct => Color::Green,
                Verdict::Incorrect => Color::Red,
                Verdict::Unanswered => Color::DarkGray,
                Verdict::Invalid(_) => Color::Yellow,
            };
            let points = if visibility.breakdown {
                format!(
                    "  {}/{}",
                    format_points(outcome.points_awarded),
                    format_points(outcome.max_points)
                )
            } else {
                String::new()
            };

            for (li, wline) in wrap_text(&question.text, text_width).into_iter().enumerate() {
                if li == 0 {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("  {} ", verdict_mark(&outcome.verdict)),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!("{:>2}. {}", i + 1, wline)),
                        Span::styled(points.clone(), Style::default().fg(Color::DarkGray)),
                    ]));
                } else {
                    lines.push(Line::from(format!("        {}", wline)));
                }
            }

            if let Verdict::Invalid(reason) = &outcome.verdict {
                lines.push(Line::from(Span::styled(
                    format!("        ! {}", reason),
                    Style::default().fg(Color::Yellow),
                )));
            }
            if visibility.correct_answers && !outcome.verdict.is_correct() {
                lines.push(Line::from(Span::styled(
                    format!("        yours:   {}", answer_display(question, state.store.get(&question.id))),
                    Style::default().fg(Color::DarkGray),
                )));
                if let Some(expected) = question.correct_answer_display() {
                    lines.push(Line::from(Span::styled(
                        format!("        correct: {}", expected),
                        Style::default().fg(Color::Green),
                    )));
                }
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "  Preview only: nothing was submitted. Session {}",
            state.store.session_id()
        ),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Ctrl+R] Retake    [Ctrl+Q] Quit",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

pub fn draw_result(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Preview result ")
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    let lines = result_lines(state, inner.width);

    let total = lines.len();
    let visible = inner.height as usize;
    let scroll = state.result_scroll.min(total.saturating_sub(visible));
    let shown: Vec<Line> = lines.into_iter().skip(scroll).collect();

    f.render_widget(Paragraph::new(shown).block(block), area);

    if total > visible {
        let mut scrollbar_state = ScrollbarState::new(total)
            .position(scroll)
            .viewport_content_length(visible);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }
}
