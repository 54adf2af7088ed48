use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::model::{Answer, Question};
use crate::navigation::PageLayout;
use crate::renderer::InputKind;
use crate::state::{AppState, InputMode};
use crate::ui::markdown::markdown_to_lines;

/// One rendered option row range, for mouse hits.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionHit {
    pub start: usize,
    pub end: usize,
    pub question: usize,
    pub option: usize,
}

/// The current page as content lines plus the positions mouse handling and
/// anchor scrolling need.
pub struct PageView {
    pub lines: Vec<Line<'static>>,
    /// (header line, question index) for every question on the page.
    pub anchors: Vec<(usize, usize)>,
    pub options: Vec<OptionHit>,
}

impl PageView {
    pub fn anchor_line(&self, question: usize) -> Option<usize> {
        self.anchors.iter().find(|(_, q)| *q == question).map(|(line, _)| *line)
    }

    pub fn option_at(&self, content_line: usize) -> Option<(usize, usize)> {
        self.options
            .iter()
            .find(|hit| content_line >= hit.start && content_line < hit.end)
            .map(|hit| (hit.question, hit.option))
    }
}

pub fn build_page(state: &AppState, width: u16) -> PageView {
    let mut view = PageView {
        lines: Vec::new(),
        anchors: Vec::new(),
        options: Vec::new(),
    };
    let first = match state.nav.layout() {
        PageLayout::OnePerPage => state.nav.page(),
        PageLayout::AllOnOnePage => 0,
    };
    let default_points = state.survey.scoring().default_points();

    for (offset, question) in state.nav.page_questions(&state.survey).iter().enumerate() {
        let qi = first + offset;
        if offset > 0 {
            view.lines.push(Line::from(""));
        }
        push_question(&mut view, state, question, qi, default_points, width);
    }

    push_footer(&mut view.lines, state);
    view
}

fn push_question(
    view: &mut PageView,
    state: &AppState,
    question: &Question,
    qi: usize,
    default_points: f64,
    width: u16,
) {
    let focused = qi == state.nav.current();
    let single_page = state.nav.layout() == PageLayout::AllOnOnePage;

    view.anchors.push((view.lines.len(), qi));
    let marker = if focused && single_page { "▸ " } else { "  " };
    let header = format!("{}{}. {}", marker, qi + 1, question.text);
    for (i, wline) in wrap_text(&header, (width as usize).saturating_sub(2)).into_iter().enumerate() {
        let text = if i == 0 { wline } else { format!("     {}", wline) };
        view.lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
    }

    let mut meta = vec![
        type_label(question).to_string(),
        format!("{} pts", crate::report::format_points(question.points.unwrap_or(default_points))),
    ];
    if let Some(difficulty) = question.difficulty {
        meta.push(format!("{:?}", difficulty).to_lowercase());
    }
    if !question.tags.is_empty() {
        meta.push(question.tags.join(", "));
    }
    view.lines.push(Line::from(Span::styled(
        format!("     {}", meta.join(" · ")),
        Style::default().fg(Color::DarkGray),
    )));

    if let Some(description) = question.description.as_deref().filter(|d| !d.trim().is_empty()) {
        view.lines.push(Line::from(""));
        let wrap_width = (width as usize).saturating_sub(4);
        for line in markdown_to_lines(description) {
            for wline in wrap_styled_line(line, wrap_width) {
                view.lines.push(Line::from(
                    std::iter::once(Span::raw("  "))
                        .chain(wline.spans)
                        .collect::<Vec<_>>(),
                ));
            }
        }
    }
    if let Some(url) = &question.description_image {
        view.lines.push(Line::from(Span::styled(
            format!("  [image: {}]", url),
            Style::default().fg(Color::Magenta),
        )));
    }

    view.lines.push(Line::from(""));
    match InputKind::for_question(question) {
        kind @ (InputKind::Radio | InputKind::Checkbox) => {
            push_options(view, state, question, qi, kind, focused, width)
        }
        InputKind::FreeText => push_text_box(&mut view.lines, state, question, focused, width),
    }
}

fn type_label(question: &Question) -> &'static str {
    match InputKind::for_question(question) {
        InputKind::Radio => "single choice",
        InputKind::Checkbox => "multiple choice",
        InputKind::FreeText => "short text",
    }
}

fn push_options(
    view: &mut PageView,
    state: &AppState,
    question: &Question,
    qi: usize,
    kind: InputKind,
    focused: bool,
    width: u16,
) {
    if question.options.is_empty() {
        view.lines.push(Line::from(Span::styled(
            "  (no options)",
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }

    for (i, option) in question.options.iter().enumerate() {
        let selected = state.is_choice_selected(&question.id, i);
        let mark = match (kind, selected) {
            (InputKind::Checkbox, true) => "[x]",
            (InputKind::Checkbox, false) => "[ ]",
            (_, true) => "(●)",
            (_, false) => "( )",
        };
        let letter = letter_for(i);

        let style = if selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        let letter_style = if focused && state.choice_cursor == i && state.input_mode == InputMode::ChoiceSelect {
            style.add_modifier(Modifier::UNDERLINED)
        } else {
            style
        };

        // "  (●) A. " is 9 columns
        let prefix_len = 9;
        let text_width = (width as usize).saturating_sub(prefix_len + 1);
        let mut text = option.text().to_string();
        if let Some(url) = option.image_url() {
            text.push_str(&format!(" [image: {}]", url));
        }

        let start = view.lines.len();
        for (li, wline) in wrap_text(&text, text_width).into_iter().enumerate() {
            if li == 0 {
                view.lines.push(Line::from(vec![
                    Span::styled(format!("  {} ", mark), style),
                    Span::styled(format!("{}.", letter), letter_style),
                    Span::raw(" "),
                    Span::styled(wline, style),
                ]));
            } else {
                view.lines.push(Line::from(vec![
                    Span::raw(" ".repeat(prefix_len)),
                    Span::styled(wline, style),
                ]));
            }
        }
        view.options.push(OptionHit {
            start,
            end: view.lines.len(),
            question: qi,
            option: i,
        });
    }
}

pub fn letter_for(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| (b'A' + i) as char)
        .unwrap_or('?')
}

fn push_text_box(lines: &mut Vec<Line<'static>>, state: &AppState, question: &Question, focused: bool, width: u16) {
    let is_editing = focused && state.input_mode == InputMode::TextInput;
    let display_text = if is_editing {
        state.text_input.clone()
    } else {
        match state.store.get(&question.id) {
            Some(Answer::Text(text)) => text.clone(),
            _ => String::new(),
        }
    };

    // Frame is W-4 wide: "  ┌" + dashes + "┐", inner text is W-8.
    let dashes = width.saturating_sub(6) as usize;
    let inner = width.saturating_sub(8) as usize;

    lines.push(Line::from(format!("  ┌{}┐", "─".repeat(dashes))));

    let mut spans = vec![Span::raw("  │ ")];
    if display_text.is_empty() && !is_editing {
        let placeholder: String = "Type your answer...".chars().take(inner).collect();
        let padding = inner.saturating_sub(placeholder.chars().count());
        spans.push(Span::styled(placeholder, Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(" ".repeat(padding)));
    } else {
        let chars: Vec<char> = display_text.chars().collect();
        let cursor = if is_editing {
            display_text[..state.text_cursor.min(display_text.len())].chars().count()
        } else {
            chars.len()
        };
        // Keep the cursor inside the box when the text is wider than it.
        let start = (cursor + 1).saturating_sub(inner);
        let visible: Vec<char> = chars.iter().skip(start).take(inner).copied().collect();
        let cursor_rel = cursor - start;
        let text_style = Style::default().fg(Color::White);
        let cursor_style = Style::default().fg(Color::Black).bg(Color::White);

        if is_editing {
            let before: String = visible.iter().take(cursor_rel).collect();
            spans.push(Span::styled(before, text_style));
            match visible.get(cursor_rel) {
                Some(c) => {
                    spans.push(Span::styled(c.to_string(), cursor_style));
                    let after: String = visible.iter().skip(cursor_rel + 1).collect();
                    spans.push(Span::styled(after, text_style));
                    spans.push(Span::raw(" ".repeat(inner.saturating_sub(visible.len()))));
                }
                None => {
                    spans.push(Span::styled(" ", cursor_style));
                    spans.push(Span::raw(" ".repeat(inner.saturating_sub(visible.len() + 1))));
                }
            }
        } else {
            let shown: String = visible.iter().collect();
            spans.push(Span::styled(shown, text_style));
            spans.push(Span::raw(" ".repeat(inner.saturating_sub(visible.len()))));
        }
    }
    spans.push(Span::raw(" │"));
    lines.push(Line::from(spans));

    lines.push(Line::from(format!("  └{}┘", "─".repeat(dashes))));
}

fn push_footer(lines: &mut Vec<Line<'static>>, state: &AppState) {
    lines.push(Line::from(""));
    let dim = Style::default().fg(Color::DarkGray);
    let button = Style::default().fg(Color::White).bg(Color::Rgb(50, 50, 50));
    let submit = Style::default().fg(Color::White).bg(Color::Green).add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::raw("  ")];
    if state.nav.layout() == PageLayout::OnePerPage {
        if state.nav.current() > 0 {
            spans.push(Span::styled(" ◂ PREV ", button));
            spans.push(Span::raw("  "));
        }
        if state.nav.can_submit() {
            spans.push(Span::styled(" ✓ SUBMIT (Ctrl+S) ", submit));
        } else {
            spans.push(Span::styled(" NEXT ▸ ", button));
        }
    } else {
        spans.push(Span::styled(" ✓ SUBMIT (Ctrl+S) ", submit));
    }
    lines.push(Line::from(spans));
    lines.push(Line::from(Span::styled(
        "  Preview mode: responses are scored locally and never sent.",
        dim,
    )));
}

pub fn draw_page(f: &mut Frame, area: Rect, state: &AppState) {
    let view = build_page(state, area.width);

    let total_content_lines = view.lines.len();
    let visible_height = area.height as usize;
    let scroll = state
        .question_scroll
        .min(total_content_lines.saturating_sub(visible_height));
    let display_lines: Vec<Line> = view.lines.into_iter().skip(scroll).collect();

    f.render_widget(Paragraph::new(display_lines), area);

    if total_content_lines > visible_height {
        let mut scrollbar_state = ScrollbarState::new(total_content_lines)
            .position(scroll)
            .viewport_content_length(visible_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

/// Wrap a styled Line at `width`, preserving span styles across breaks.
fn wrap_styled_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }

    let mut chars: Vec<(char, Style)> = Vec::new();
    for span in &line.spans {
        for c in span.content.chars() {
            chars.push((c, span.style));
        }
    }

    let mut result: Vec<Line<'static>> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if chars.len() - pos <= width {
            result.push(styled_chars_to_line(&chars[pos..]));
            break;
        }

        let chunk_end = pos + width;
        let break_at = if chars[chunk_end].0 == ' ' {
            chunk_end
        } else {
            match chars[pos..chunk_end].iter().rposition(|(c, _)| *c == ' ') {
                Some(sp) if sp > 0 => pos + sp,
                _ => chunk_end,
            }
        };

        result.push(styled_chars_to_line(&chars[pos..break_at]));
        pos = break_at;
        if pos < chars.len() && chars[pos].0 == ' ' {
            pos += 1;
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }
    result
}

/// Rebuild a Line from (char, style) pairs, grouping runs of one style.
fn styled_chars_to_line(chars: &[(char, Style)]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current_text = String::new();
    let mut current_style = chars.first().map(|(_, s)| *s).unwrap_or_default();

    for &(c, style) in chars {
        if style != current_style && !current_text.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current_text), current_style));
        }
        current_style = style;
        current_text.push(c);
    }
    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, current_style));
    }
    Line::from(spans)
}

/// Wrap text to fit within `width` columns, breaking at word boundaries.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}
