use crate::app::AppState;
use crate::outbox::Mutation;
use crate::reorder::{DragSession, ReorderOutcome};

use super::sync::queue;

/// Picks up the grouping under the cursor.
pub fn begin_drag(app: &mut AppState) {
    let Some(source) = app.current_row().and_then(|row| row.grouping_id().cloned()) else {
        return;
    };
    if let Some(session) = DragSession::begin_drag(&app.tree, &source) {
        let name = app.tree.get(&source).map(|n| n.name.clone()).unwrap_or_default();
        app.set_message(format!("Moving {}: pick a sibling and press Enter", name));
        app.drag = Some(session);
    }
}

/// Drops the dragged grouping onto the grouping under the cursor.
pub fn drop_drag(app: &mut AppState) {
    let Some(session) = app.drag.take() else {
        return;
    };
    app.clear_message();
    let Some(target) = app.current_row().and_then(|row| row.grouping_id().cloned()) else {
        return;
    };
    let source = session.source().clone();

    match session.complete_drag(&mut app.tree, &target) {
        ReorderOutcome::Moved(update) => {
            queue(app, Mutation::Reorder(update));
            app.select_grouping(&source);
        }
        // Dropped on itself, or on a row outside the sibling list: the
        // engine already logged it and nothing changed.
        ReorderOutcome::Unchanged | ReorderOutcome::Aborted(_) => {}
    }
}

pub fn cancel_drag(app: &mut AppState) {
    if app.drag.take().is_some() {
        app.clear_message();
    }
}

pub fn mouse_drag_start(app: &mut AppState, row: usize) {
    if row < app.rows().len() {
        app.cursor = row;
        begin_drag(app);
    }
}

pub fn mouse_drop(app: &mut AppState, row: usize) {
    if row < app.rows().len() {
        app.cursor = row;
        drop_drag(app);
    } else {
        cancel_drag(app);
    }
}
