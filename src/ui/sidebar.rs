use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::state::{ActivePanel, AppState, QuestionStatus};

/// First visible row, keeping the focused question in view.
pub fn scroll_offset(state: &AppState, visible: usize) -> usize {
    let current = state.nav.current();
    let total = state.survey.questions.len();
    if visible == 0 {
        return 0;
    }
    if current >= state.sidebar_scroll + visible {
        current + 1 - visible
    } else if current < state.sidebar_scroll {
        current
    } else {
        state.sidebar_scroll.min(total.saturating_sub(visible))
    }
}

/// Rows available for questions below the title row.
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(1) as usize
}

/// Question index under row `y` of the sidebar, if any.
pub fn question_at(state: &AppState, area: Rect, y: u16) -> Option<usize> {
    let visible = visible_rows(area);
    let row = y.checked_sub(area.y + 1)? as usize;
    if row >= visible {
        return None;
    }
    let idx = scroll_offset(state, visible) + row;
    (idx < state.survey.questions.len()).then_some(idx)
}

pub fn draw_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let visible = visible_rows(area);
    let current = state.nav.current();
    let total = state.survey.questions.len();
    let offset = scroll_offset(state, visible);
    let text_max = area.width.saturating_sub(11) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (qi, q) in state.survey.questions.iter().enumerate().skip(offset).take(visible) {
        let status = state.question_status(q);
        let (icon, color) = match status {
            QuestionStatus::Unread => ("·", Color::DarkGray),
            QuestionStatus::Unanswered => ("○", Color::White),
            QuestionStatus::Answered => ("✓", Color::Green),
        };

        let is_current = qi == current;
        let bg = if is_current { Color::DarkGray } else { Color::Reset };
        let style = if is_current {
            Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(bg)
        };

        let text: String = if q.text.chars().count() > text_max {
            let cut: String = q.text.chars().take(text_max.saturating_sub(1)).collect();
            format!("{}…", cut)
        } else {
            q.text.clone()
        };

        lines.push(Line::from(vec![
            Span::styled(if is_current { " ▸ " } else { "   " }, style),
            Span::styled(format!("{} ", icon), Style::default().fg(color).bg(bg)),
            Span::styled(format!("{:>2}. ", qi + 1), style),
            Span::styled(text, style),
        ]));
    }

    let border_style = if state.active_panel == ActivePanel::Sidebar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(format!(" {} Questions ", total))
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(border_style);

    f.render_widget(Paragraph::new(lines).block(block), area);

    if total > visible {
        let scrollbar_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: visible as u16,
        };
        let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(1))
            .position(current)
            .viewport_content_length(3);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreviewConfig;
    use crate::loader::{parse_survey, Format};
    use std::path::{Path, PathBuf};

    fn state(count: usize) -> AppState {
        let questions: Vec<String> = (1..=count)
            .map(|i| format!(r#"{{"text": "Question {}", "type": "short_text"}}"#, i))
            .collect();
        let json = format!(r#"{{"title": "Long", "questions": [{}]}}"#, questions.join(","));
        let survey = parse_survey(&json, Format::Json, Path::new("t.json")).unwrap();
        AppState::new(survey, PathBuf::from("t.json"), "sha256:test".to_string(), PreviewConfig::default())
    }

    #[test]
    fn test_scroll_offset_is_sticky() {
        let mut s = state(20);
        s.navigate_to(12);
        assert_eq!(scroll_offset(&s, 5), 8);
        s.sidebar_scroll = 8;

        s.navigate_to(10);
        assert_eq!(scroll_offset(&s, 5), 8);
        s.navigate_to(3);
        assert_eq!(scroll_offset(&s, 5), 3);
    }

    #[test]
    fn test_question_at_uses_offset() {
        let mut s = state(20);
        s.sidebar_scroll = 8;
        s.navigate_to(10);
        let area = Rect::new(0, 0, 32, 6);
        assert_eq!(visible_rows(area), 5);
        assert_eq!(question_at(&s, area, 1), Some(8));
        assert_eq!(question_at(&s, area, 0), None);
        assert_eq!(question_at(&s, area, 6), None);
    }
}
