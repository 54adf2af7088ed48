pub mod dialog;
pub mod empty;
pub mod keybar;
pub mod layout;
pub mod markdown;
pub mod question;
pub mod result;
pub mod sidebar;
pub mod statusbar;
pub mod titlebar;

use ratatui::Frame;

use crate::state::{AppState, Screen};

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    match state.screen() {
        Screen::Empty => {
            empty::draw_empty(f, layout.body, state);
        }
        Screen::Answering => {
            sidebar::draw_sidebar(f, layout.sidebar, state);
            question::draw_page(f, layout.main, state);
        }
        Screen::Submitted => {
            result::draw_result(f, layout.body, state);
        }
    }
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);

    if state.has_dialog() {
        dialog::draw_dialog(f, area, state);
    }
}
