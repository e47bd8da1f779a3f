use crate::app::AppState;
use crate::view::{self, ClickRegion, RowKind};

use super::menu::open_menu;

pub fn cursor_up(app: &mut AppState) {
    if app.cursor > 0 {
        app.cursor -= 1;
    }
}

pub fn cursor_down(app: &mut AppState) {
    let len = app.rows().len();
    if app.cursor + 1 < len {
        app.cursor += 1;
    }
}

pub fn cursor_top(app: &mut AppState) {
    app.cursor = 0;
    app.viewport_top = 0;
}

pub fn cursor_bottom(app: &mut AppState) {
    app.cursor = app.rows().len().saturating_sub(1);
}

/// Keyboard equivalent of clicking the body of the row under the cursor.
pub fn toggle_row(app: &mut AppState) {
    if let Some(id) = app.current_row().and_then(|row| row.grouping_id().cloned()) {
        view::handle_click(&app.tree, &mut app.expansion, &id, ClickRegion::Row);
    }
}

/// Pointer click on visible row `row`.
pub fn click(app: &mut AppState, row: usize, region: ClickRegion) {
    let Some(clicked) = app.rows().into_iter().nth(row) else {
        return;
    };
    app.cursor = row;

    let RowKind::Grouping(id) = clicked.kind else {
        if region == ClickRegion::ActionMenu {
            open_menu(app);
        }
        return;
    };
    match region {
        ClickRegion::ActionMenu => open_menu(app),
        ClickRegion::DragHandle | ClickRegion::Row => {
            view::handle_click(&app.tree, &mut app.expansion, &id, region);
        }
    }
}

pub fn expand_all(app: &mut AppState) {
    let expandable: Vec<_> = app
        .tree
        .iter()
        .filter(|node| app.tree.is_expandable(&node.id))
        .map(|node| node.id.clone())
        .collect();
    app.expansion.expand_path(&expandable);
}

pub fn collapse_all(app: &mut AppState) {
    app.expansion.collapse_all();
    app.clamp_cursor();
}
