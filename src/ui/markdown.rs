use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub fn markdown_to_lines(text: &str) -> Vec<Line<'static>> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, opts);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current_spans: Vec<Span<'static>> = Vec::new();
    let mut style_stack: Vec<Style> = vec![Style::default()];
    let mut link_target: Option<String> = None;
    let mut in_code_block = false;

    fn push_style(stack: &mut Vec<Style>, f: impl FnOnce(Style) -> Style) {
        let current = stack.last().copied().unwrap_or_default();
        stack.push(f(current));
    }

    for event in parser {
        match event {
            Event::Start(Tag::Paragraph) => current_spans.clear(),
            Event::End(TagEnd::Paragraph) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                lines.push(Line::from(""));
            }
            Event::Start(Tag::Strong) => push_style(&mut style_stack, |s| s.add_modifier(Modifier::BOLD)),
            Event::Start(Tag::Emphasis) => push_style(&mut style_stack, |s| s.add_modifier(Modifier::ITALIC)),
            Event::Start(Tag::Strikethrough) => {
                push_style(&mut style_stack, |s| s.add_modifier(Modifier::CROSSED_OUT))
            }
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough) => {
                style_stack.pop();
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                push_style(&mut style_stack, |s| s.fg(Color::Blue).add_modifier(Modifier::UNDERLINED));
                link_target = Some(dest_url.to_string());
            }
            Event::End(TagEnd::Link) => {
                style_stack.pop();
                if let Some(url) = link_target.take() {
                    current_spans.push(Span::styled(format!(" <{}>", url), Style::default().fg(Color::DarkGray)));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[image: {}] ", dest_url),
                    Style::default().fg(Color::Magenta),
                ));
            }
            Event::Start(Tag::Item) => {
                current_spans.clear();
                current_spans.push(Span::raw("  • "));
            }
            Event::End(TagEnd::Item) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                current_spans.clear();
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::Heading { level, .. }) => {
                current_spans.clear();
                let prefix = match level {
                    HeadingLevel::H1 => "# ",
                    HeadingLevel::H2 => "## ",
                    HeadingLevel::H3 => "### ",
                    _ => "",
                };
                current_spans.push(Span::styled(prefix, Style::default().add_modifier(Modifier::BOLD)));
                push_style(&mut style_stack, |s| s.add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Heading(_)) => {
                style_stack.pop();
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                lines.push(Line::from(""));
            }
            Event::Text(text) if in_code_block => {
                for code_line in text.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", code_line),
                        Style::default().fg(Color::Green),
                    )));
                }
            }
            Event::Text(text) => {
                let style = style_stack.last().copied().unwrap_or_default();
                current_spans.push(Span::styled(text.to_string(), style));
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(format!("`{}`", code), Style::default().fg(Color::Yellow)));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                if html.trim_start().starts_with("<br") || html.trim_start().starts_with("</p") {
                    if !current_spans.is_empty() {
                        lines.push(Line::from(std::mem::take(&mut current_spans)));
                    }
                    continue;
                }
                let stripped = strip_tags(&html);
                if !stripped.trim().is_empty() {
                    let style = style_stack.last().copied().unwrap_or_default();
                    current_spans.push(Span::styled(stripped, style));
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::Rule => {
                lines.push(Line::from(Span::styled("─".repeat(40), Style::default().fg(Color::DarkGray))));
            }
            _ => {}
        }
    }

    if !current_spans.is_empty() {
        lines.push(Line::from(current_spans));
    }
    while lines.last().is_some_and(|l| l.width() == 0) {
        lines.pop();
    }

    lines
}

/// Drop `<...>` tags and decode the handful of entities rich-text editors emit.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
