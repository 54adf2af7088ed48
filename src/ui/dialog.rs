use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::state::{AppState, Dialog};
use crate::timer::format_duration;

pub fn draw_dialog(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };

    match dialog {
        Dialog::ConfirmSubmit => draw_confirm_submit(f, area, state),
        Dialog::ConfirmReset => draw_confirm(
            f,
            area,
            "Reset the preview?",
            &["All answers are cleared and a", "new session starts."],
        ),
        Dialog::ConfirmQuit => draw_confirm(f, area, "Quit?", &["Preview answers are not kept."]),
        Dialog::SubmitOnLastPage => draw_notice(
            f,
            area,
            "Not on the last page",
            &["Submit from the last question."],
            Color::Yellow,
        ),
        Dialog::TimeWarning => {
            let remaining = format_duration(state.remaining_seconds.unwrap_or(0));
            draw_notice(
                f,
                area,
                &format!("⚠  {} REMAINING", remaining),
                &["The preview submits itself", "when time runs out."],
                Color::Red,
            )
        }
        Dialog::Help => draw_help(f, area),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_box(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>, width: u16, color: Color, title: Option<&str>) {
    let rect = centered_rect(width, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if let Some(title) = title {
        block = block.title(format!(" {} ", title));
    }
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

fn heading(text: &str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        format!("   {}", text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn confirm_row() -> Line<'static> {
    Line::from(vec![
        Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
        Span::raw("    "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_confirm(f: &mut Frame, area: Rect, title: &str, body: &[&str]) {
    let mut lines = vec![heading(title, Color::Yellow), Line::from("")];
    lines.extend(body.iter().map(|l| Line::from(format!("   {}", l))));
    lines.push(Line::from(""));
    lines.push(confirm_row());
    render_box(f, area, lines, 40, Color::Yellow, None);
}

fn draw_notice(f: &mut Frame, area: Rect, title: &str, body: &[&str], color: Color) {
    let mut lines = vec![heading(title, color), Line::from("")];
    lines.extend(body.iter().map(|l| Line::from(format!("   {}", l))));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "          [Enter] Continue",
        Style::default().fg(Color::Green),
    )));
    render_box(f, area, lines, 40, color, None);
}

fn draw_confirm_submit(f: &mut Frame, area: Rect, state: &AppState) {
    let counts = state.status_counts();
    let open = counts.unanswered + counts.unread;

    let mut lines = vec![heading("Submit this preview?", Color::Yellow), Line::from("")];
    if open > 0 {
        lines.push(Line::from(format!("   {} questions are not answered.", open)));
    }
    lines.push(Line::from(Span::styled(
        "   Scored locally, nothing is sent.",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(confirm_row());
    render_box(f, area, lines, 42, Color::Yellow, None);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        heading("Key Bindings", Color::Cyan),
        Line::from(""),
        Line::from("   arrows     Previous/Next question"),
        Line::from("   PgUp/PgDn  Jump 5 questions"),
        Line::from("   Home/End   First/Last question"),
        Line::from("   a-z        Select/toggle choice"),
        Line::from("   Tab        Switch panel"),
        Line::from("   Ctrl+S     Submit preview"),
        Line::from("   Ctrl+R     Reset / retake"),
        Line::from("   Ctrl+Q     Quit"),
        Line::from("   ?          This help"),
        Line::from("   Esc        Close dialog"),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    render_box(f, area, lines, 44, Color::Cyan, Some("Help"));
}
