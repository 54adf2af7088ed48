use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::AppState;
use crate::timer::format_duration;

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &AppState) {
    let warning_secs = i64::try_from(state.config.time_warning_secs).unwrap_or(i64::MAX);

    let timer_text = match state.remaining_seconds {
        Some(secs) => {
            let formatted = format!(" {} remaining ", format_duration(secs));
            if secs <= warning_secs {
                Span::styled(
                    formatted,
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(formatted, Style::default().fg(Color::Rgb(200, 200, 120)))
            }
        }
        None => Span::raw(""),
    };
    let timer_len = timer_text.content.chars().count();

    let badge = format!(" {} · PREVIEW ", state.survey.survey_type.label());
    let badge_len = badge.chars().count();
    let badge_span = Span::styled(badge, Style::default().fg(Color::Black).bg(Color::Cyan));

    let title_text = format!("[ {} ]", state.survey.title);
    let title_len = title_text.chars().count();
    let title_span = Span::styled(
        title_text,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    );

    // Title centred on the full width, badge on the left, timer on the right.
    let available = area.width as usize;
    let center_pad = available.saturating_sub(title_len) / 2;
    let left_pad = center_pad.saturating_sub(badge_len);
    let right_pad = available.saturating_sub(badge_len + left_pad + title_len + timer_len);

    let line = Line::from(vec![
        badge_span,
        Span::raw(" ".repeat(left_pad)),
        title_span,
        Span::raw(" ".repeat(right_pad)),
        timer_text,
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
