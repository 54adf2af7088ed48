use std::io;
use std::sync::mpsc;
use std::time::Duration;

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::error::Result;
use crate::navigation::{FocusTarget, PageLayout};
use crate::report;
use crate::state::*;
use crate::timer::{self, TimerEvent};
use crate::ui::layout::{compute_layout, contains};
use crate::ui::{question, sidebar};

type Timer = Option<mpsc::Receiver<TimerEvent>>;

pub fn run_tui(mut state: AppState) -> Result<()> {
    let mouse = state.config.mouse;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut timer = start_timer(&mut state);
    let result = main_loop(&mut terminal, &mut state, &mut timer);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture).ok();
    }
    terminal.show_cursor().ok();

    result
}

/// A fresh countdown for surveys with a time limit. Dropping the previous
/// receiver stops the previous thread.
fn start_timer(state: &mut AppState) -> Timer {
    let limit = state.time_limit_secs()?;
    if state.screen() != Screen::Answering {
        return None;
    }
    state.remaining_seconds = Some(limit);
    tracing::debug!(limit_secs = limit, "assessment timer started");
    Some(timer::spawn_timer(limit, state.config.time_warning_secs))
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    timer: &mut Timer,
) -> Result<()> {
    loop {
        terminal.draw(|f| crate::ui::draw(f, state))?;

        if state.should_quit {
            break;
        }

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let before = state.nav.current();
                    handle_key(key, state, timer);
                    if state.nav.current() != before {
                        scroll_to_current(state, area);
                    }
                }
                Event::Mouse(mouse) => handle_mouse(mouse, state, area),
                _ => {}
            }
            let rows = sidebar::visible_rows(compute_layout(area).sidebar);
            state.sidebar_scroll = sidebar::scroll_offset(state, rows);
        }

        let events: Vec<TimerEvent> = timer
            .as_ref()
            .map(|rx| rx.try_iter().collect())
            .unwrap_or_default();
        for ev in events {
            handle_timer(ev, state, timer);
        }
    }

    Ok(())
}

/// Keep the focused question in view on the single-page layout.
fn scroll_to_current(state: &mut AppState, area: Rect) {
    if state.nav.layout() != PageLayout::AllOnOnePage {
        return;
    }
    let main = compute_layout(area).main;
    let view = question::build_page(state, main.width);
    if let Some(line) = view.anchor_line(state.nav.current()) {
        state.question_scroll = line;
    }
}

fn handle_key(key: KeyEvent, state: &mut AppState, timer: &mut Timer) {
    if state.has_dialog() {
        handle_dialog_key(key, state, timer);
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match state.screen() {
        Screen::Empty => match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => state.should_quit = true,
            KeyCode::Char('?') => state.push_dialog(Dialog::Help),
            _ => {}
        },
        Screen::Submitted => handle_result_key(key, state, timer),
        Screen::Answering => {
            if ctrl {
                handle_ctrl_key(key, state);
                return;
            }
            if key.code == KeyCode::Tab {
                state.save_current_text_input();
                state.active_panel = match state.active_panel {
                    ActivePanel::Main => ActivePanel::Sidebar,
                    ActivePanel::Sidebar => ActivePanel::Main,
                };
                return;
            }
            if state.active_panel == ActivePanel::Sidebar {
                handle_sidebar_key(key, state);
                return;
            }
            match state.input_mode {
                InputMode::TextInput => handle_text_input_key(key, state),
                InputMode::ChoiceSelect => handle_choice_key(key, state),
                InputMode::Navigation => handle_nav_key(key, state),
            }
        }
    }
}

fn handle_ctrl_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char('q') => state.push_dialog(Dialog::ConfirmQuit),
        KeyCode::Char('s') => {
            state.save_current_text_input();
            if state.nav.can_submit() {
                state.push_dialog(Dialog::ConfirmSubmit);
            } else {
                state.push_dialog(Dialog::SubmitOnLastPage);
            }
        }
        KeyCode::Char('r') => state.push_dialog(Dialog::ConfirmReset),
        KeyCode::Up | KeyCode::Left => state.navigate_prev(),
        KeyCode::Down | KeyCode::Right => state.navigate_next(),
        _ => {}
    }
}

fn handle_result_key(key: KeyEvent, state: &mut AppState, timer: &mut Timer) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Char('r') if ctrl => do_reset(state, timer),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        KeyCode::Up => state.result_scroll = state.result_scroll.saturating_sub(1),
        KeyCode::Down => state.result_scroll += 1,
        KeyCode::PageUp => state.result_scroll = state.result_scroll.saturating_sub(10),
        KeyCode::PageDown => state.result_scroll += 10,
        KeyCode::Home => state.result_scroll = 0,
        _ => {}
    }
}

fn handle_sidebar_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.navigate_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.navigate_next(),
        KeyCode::Enter | KeyCode::Esc => state.active_panel = ActivePanel::Main,
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => handle_page_keys(key, state),
    }
}

fn prev_char_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor].char_indices().last().map_or(0, |(i, _)| i)
}

fn next_char_boundary(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map_or(cursor, |c| cursor + c.len_utf8())
}

fn handle_text_input_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Char(c) => {
            state.text_input.insert(state.text_cursor, c);
            state.text_cursor += c.len_utf8();
        }
        KeyCode::Backspace => {
            if state.text_cursor > 0 {
                state.text_cursor = prev_char_boundary(&state.text_input, state.text_cursor);
                state.text_input.remove(state.text_cursor);
            }
        }
        KeyCode::Delete => {
            if state.text_cursor < state.text_input.len() {
                state.text_input.remove(state.text_cursor);
            }
        }
        KeyCode::Left => state.text_cursor = prev_char_boundary(&state.text_input, state.text_cursor),
        KeyCode::Right => state.text_cursor = next_char_boundary(&state.text_input, state.text_cursor),
        KeyCode::Home => state.text_cursor = 0,
        KeyCode::End => state.text_cursor = state.text_input.len(),
        KeyCode::Enter | KeyCode::Down => state.navigate_next(),
        KeyCode::Up => state.navigate_prev(),
        KeyCode::Esc => {
            state.save_current_text_input();
            state.input_mode = InputMode::Navigation;
        }
        _ => {}
    }
}

fn handle_choice_key(key: KeyEvent, state: &mut AppState) {
    let option_count = state.current_question().map_or(0, |q| q.options.len());
    match key.code {
        KeyCode::Up | KeyCode::Left => state.navigate_prev(),
        KeyCode::Down | KeyCode::Right | KeyCode::Enter => state.navigate_next(),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        KeyCode::Char(c) if c.is_ascii_lowercase() => {
            let idx = (c as u8 - b'a') as usize;
            if idx < option_count {
                state.activate_choice(idx);
            }
        }
        _ => handle_page_keys(key, state),
    }
}

fn handle_nav_key(key: KeyEvent, state: &mut AppState) {
    let is_text_question = state
        .current_question()
        .is_some_and(|q| !q.question_type.is_choice());
    if is_text_question {
        match key.code {
            KeyCode::Enter => {
                state.input_mode = InputMode::TextInput;
                return;
            }
            KeyCode::Char(c) if c != '?' => {
                state.input_mode = InputMode::TextInput;
                state.text_input.insert(state.text_cursor, c);
                state.text_cursor += c.len_utf8();
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Up | KeyCode::Left => state.navigate_prev(),
        KeyCode::Down | KeyCode::Right => state.navigate_next(),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => handle_page_keys(key, state),
    }
}

fn handle_page_keys(key: KeyEvent, state: &mut AppState) {
    let total = state.survey.questions.len();
    let current = state.nav.current();
    match key.code {
        KeyCode::PageUp => state.navigate_to(current.saturating_sub(5)),
        KeyCode::PageDown => state.navigate_to((current + 5).min(total.saturating_sub(1))),
        KeyCode::Home => state.navigate_to(0),
        KeyCode::End => state.navigate_to(total.saturating_sub(1)),
        _ => {}
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState, timer: &mut Timer) {
    let Some(dialog) = state.top_dialog().cloned() else {
        return;
    };
    match (dialog, key.code) {
        (Dialog::ConfirmSubmit, KeyCode::Enter) => {
            state.pop_dialog();
            do_submit(state, timer);
        }
        (Dialog::ConfirmReset, KeyCode::Enter) => {
            state.pop_dialog();
            do_reset(state, timer);
        }
        (Dialog::ConfirmQuit, KeyCode::Enter) => {
            state.pop_dialog();
            state.should_quit = true;
        }
        (Dialog::SubmitOnLastPage | Dialog::TimeWarning, KeyCode::Enter | KeyCode::Esc) => {
            state.pop_dialog();
        }
        (Dialog::Help, KeyCode::Esc | KeyCode::Char('?')) => {
            state.pop_dialog();
        }
        (Dialog::ConfirmSubmit | Dialog::ConfirmReset | Dialog::ConfirmQuit, KeyCode::Esc) => {
            state.pop_dialog();
        }
        _ => {}
    }
}

fn handle_timer(event: TimerEvent, state: &mut AppState, timer: &mut Timer) {
    match event {
        TimerEvent::Tick(secs) => state.remaining_seconds = Some(secs),
        TimerEvent::Warning => {
            if state.screen() == Screen::Answering && !state.has_dialog() {
                state.push_dialog(Dialog::TimeWarning);
            }
        }
        TimerEvent::Expired => {
            state.remaining_seconds = Some(0);
            if state.screen() == Screen::Answering {
                tracing::info!(survey = %state.survey.id, "time limit reached, submitting");
                state.expire();
                after_submit(state, timer);
            }
        }
    }
}

fn do_submit(state: &mut AppState, timer: &mut Timer) {
    if state.submit() {
        after_submit(state, timer);
    }
}

fn after_submit(state: &mut AppState, timer: &mut Timer) {
    *timer = None;
    let Some(path) = state.export_path.clone() else {
        return;
    };
    let Some(report) = state.report() else {
        return;
    };
    state.status_message = Some(match report::export_report(&report, &path) {
        Ok(()) => format!("Result exported to {}", path.display()),
        Err(e) => {
            tracing::warn!(error = %e, "export failed");
            format!("Export failed: {}", e)
        }
    });
}

fn do_reset(state: &mut AppState, timer: &mut Timer) {
    state.reset();
    *timer = start_timer(state);
    tracing::info!(session = %state.store.session_id(), "preview reset");
}

fn handle_mouse(mouse: MouseEvent, state: &mut AppState, area: Rect) {
    if state.has_dialog() {
        return;
    }
    let layout = compute_layout(area);
    let (x, y) = (mouse.column, mouse.row);

    if state.screen() == Screen::Submitted {
        match mouse.kind {
            MouseEventKind::ScrollUp => state.result_scroll = state.result_scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => state.result_scroll += 1,
            _ => {}
        }
        return;
    }
    if state.screen() != Screen::Answering {
        return;
    }

    let view = question::build_page(state, layout.main.width);
    let max_scroll = view.lines.len().saturating_sub(layout.main.height as usize);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if contains(layout.sidebar, x, y) {
                let Some(idx) = sidebar::question_at(state, layout.sidebar, y) else {
                    return;
                };
                let id = state.survey.questions[idx].id.clone();
                if let Some(FocusTarget::Anchor { index, .. }) = state.focus_question(&id) {
                    if let Some(line) = view.anchor_line(index) {
                        state.question_scroll = line.min(max_scroll);
                    }
                }
                state.active_panel = ActivePanel::Main;
            } else if contains(layout.main, x, y) {
                state.active_panel = ActivePanel::Main;
                let scroll = state.question_scroll.min(max_scroll);
                let content_line = (y - layout.main.y) as usize + scroll;
                if let Some((question_idx, option_idx)) = view.option_at(content_line) {
                    state.activate_choice_at(question_idx, option_idx);
                    state.question_scroll = scroll;
                }
            }
        }
        MouseEventKind::ScrollUp => {
            if contains(layout.sidebar, x, y) {
                state.navigate_prev();
                scroll_to_current(state, area);
            } else if contains(layout.main, x, y) {
                state.question_scroll = state.question_scroll.min(max_scroll).saturating_sub(1);
            }
        }
        MouseEventKind::ScrollDown => {
            if contains(layout.sidebar, x, y) {
                state.navigate_next();
                scroll_to_current(state, area);
            } else if contains(layout.main, x, y) {
                state.question_scroll = (state.question_scroll + 1).min(max_scroll);
            }
        }
        _ => {}
    }
}
