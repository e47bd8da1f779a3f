pub mod constants;
pub mod help;
pub mod popup;
pub mod status_line;
pub mod text;
pub mod tree;


use crate::app::{AppMode, AppState};
use help::HelpRenderer;
use popup::PopupRenderer;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use status_line::StatusLineRenderer;
use tree::TreeRenderer;

// Main render function
pub fn render(frame: &mut Frame, app: &mut AppState) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    // The tree stays visible behind every popup except help.
    if app.mode == AppMode::Help {
        HelpRenderer::render(frame, chunks[0]);
    } else {
        TreeRenderer::render(frame, app, chunks[0]);
    }

    let app = &*app;
    match &app.mode {
        AppMode::Menu { id, selected } => {
            let title = app.tree.get(id).map(|n| n.name.as_str()).unwrap_or("Actions");
            PopupRenderer::render_menu(frame, title, &app.menu_entries(id), *selected, chunks[0]);
        }
        AppMode::Form(form) => PopupRenderer::render_form(frame, app, form, chunks[0]),
        AppMode::Confirm(target) => PopupRenderer::render_confirm(frame, app, target, chunks[0]),
        AppMode::AccountPicker {
            accounts, selected, ..
        } => PopupRenderer::render_picker(frame, accounts, *selected, chunks[0]),
        AppMode::Normal | AppMode::Search { .. } | AppMode::Help => {}
    }

    StatusLineRenderer::render(frame, app, chunks[1]);
}
