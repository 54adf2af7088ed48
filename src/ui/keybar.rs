use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{AppState, InputMode, Screen};

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &AppState) {
    let bindings: Vec<(&str, &str)> = match (state.screen(), state.input_mode) {
        (Screen::Empty, _) => vec![("?", "help"), ("Ctrl+Q", "quit")],
        (Screen::Submitted, _) => vec![
            ("↑/↓", "scroll"),
            ("Ctrl+R", "retake"),
            ("?", "help"),
            ("Ctrl+Q", "quit"),
        ],
        (Screen::Answering, InputMode::TextInput) => vec![
            ("←/→", "cursor"),
            ("Enter", "next"),
            ("Esc", "done editing"),
            ("Ctrl+S", "submit"),
            ("Ctrl+R", "reset"),
            ("Ctrl+Q", "quit"),
        ],
        (Screen::Answering, InputMode::ChoiceSelect) => vec![
            ("a-z", "answer"),
            ("arrows", "prev/next"),
            ("Tab", "panel"),
            ("Ctrl+S", "submit"),
            ("Ctrl+R", "reset"),
            ("Ctrl+Q", "quit"),
        ],
        (Screen::Answering, InputMode::Navigation) => vec![
            ("arrows", "prev/next"),
            ("PgUp/PgDn", "jump 5"),
            ("Tab", "panel"),
            ("Ctrl+S", "submit"),
            ("Ctrl+R", "reset"),
            ("Ctrl+Q", "quit"),
        ],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
