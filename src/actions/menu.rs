use anyhow::Result;

use crate::app::{AppMode, AppState, ConfirmTarget};
use crate::model::GroupingId;
use crate::view::{self, NodeAction, RowKind};

use super::dialogs::open_account_picker;
use super::form::{open_create_form, open_edit_form};

/// Opens the action menu of the grouping under the cursor.
/// On an account row this goes straight to the detach prompt.
pub fn open_menu(app: &mut AppState) {
    let Some(row) = app.current_row() else {
        return;
    };
    match row.kind {
        RowKind::Grouping(id) => {
            app.mode = AppMode::Menu { id, selected: 0 };
        }
        RowKind::Account { grouping, account } => {
            app.mode = AppMode::Confirm(ConfirmTarget::Account { grouping, account });
        }
    }
}

pub fn menu_up(app: &mut AppState) {
    if let AppMode::Menu { selected, .. } = &mut app.mode {
        *selected = selected.saturating_sub(1);
    }
}

pub fn menu_down(app: &mut AppState) {
    if let AppMode::Menu { selected, .. } = &mut app.mode {
        if *selected + 1 < NodeAction::ALL.len() {
            *selected += 1;
        }
    }
}

pub fn close_menu(app: &mut AppState) {
    app.mode = AppMode::Normal;
}

pub fn menu_select(app: &mut AppState) -> Result<()> {
    let AppMode::Menu { id, selected } = &app.mode else {
        return Ok(());
    };
    let (id, selected) = (id.clone(), *selected);
    let Some(action) = NodeAction::ALL.get(selected).copied() else {
        return Ok(());
    };
    run_node_action(app, &id, action)
}

/// Shortcut keys act on the row under the cursor.
pub fn run_on_cursor(app: &mut AppState, action: NodeAction) -> Result<()> {
    let Some(row) = app.current_row() else {
        return Ok(());
    };
    match row.kind {
        RowKind::Grouping(id) => run_node_action(app, &id, action),
        RowKind::Account { grouping, account } => {
            match action {
                NodeAction::Remove => {
                    app.mode = AppMode::Confirm(ConfirmTarget::Account { grouping, account });
                }
                _ => run_node_action(app, &grouping, action)?,
            }
            Ok(())
        }
    }
}

/// Runs one action-menu entry for `id`, honouring its gate.
pub fn run_node_action(app: &mut AppState, id: &GroupingId, action: NodeAction) -> Result<()> {
    let enabled = view::is_action_enabled(
        &app.tree,
        id,
        action,
        app.config.max_depth,
        app.is_delete_pending(id),
    );
    if !enabled {
        let reason = match action {
            NodeAction::AddGlDefinition => {
                format!("Maximum depth of {} reached", app.config.max_depth)
            }
            NodeAction::Remove if app.is_delete_pending(id) => "Removal already in progress".to_string(),
            NodeAction::Remove => "Remove child groupings and accounts first".to_string(),
            _ => "Action unavailable".to_string(),
        };
        app.set_message(format!("{}: {}", action.label(), reason));
        app.mode = AppMode::Normal;
        return Ok(());
    }

    match action {
        NodeAction::AddAccount => open_account_picker(app, id)?,
        NodeAction::AddGlDefinition => open_create_form(app, Some(id.clone())),
        NodeAction::Edit => open_edit_form(app, id, false),
        NodeAction::View => open_edit_form(app, id, true),
        NodeAction::Remove => {
            app.mode = AppMode::Confirm(ConfirmTarget::Grouping(id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::navigation::expand_all;
    use crate::actions::test_support::{create_test_app, id};
    use crate::app::FormKind;

    #[test]
    fn test_menu_selection_wraps_to_bounds() {
        let mut app = create_test_app();
        open_menu(&mut app);
        menu_up(&mut app);
        for _ in 0..10 {
            menu_down(&mut app);
        }
        assert_eq!(
            app.mode,
            AppMode::Menu {
                id: id("r1"),
                selected: NodeAction::ALL.len() - 1
            }
        );
    }

    #[test]
    fn test_remove_disabled_with_descendants() {
        let mut app = create_test_app();
        run_node_action(&mut app, &id("r1"), NodeAction::Remove).unwrap();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.message.as_deref().unwrap().starts_with("Remove:"));
    }

    #[test]
    fn test_remove_leaf_asks_for_confirmation() {
        let mut app = create_test_app();
        run_node_action(&mut app, &id("r2"), NodeAction::Remove).unwrap();
        assert_eq!(app.mode, AppMode::Confirm(ConfirmTarget::Grouping(id("r2"))));
    }

    #[test]
    fn test_add_child_blocked_at_max_depth() {
        let mut app = create_test_app();
        run_node_action(&mut app, &id("g1"), NodeAction::AddGlDefinition).unwrap();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(
            app.message.as_deref(),
            Some("Add GL Definition: Maximum depth of 2 reached")
        );

        run_node_action(&mut app, &id("c2"), NodeAction::AddGlDefinition).unwrap();
        assert!(matches!(&app.mode, AppMode::Form(form) if form.kind == FormKind::Create));
    }

    #[test]
    fn test_remove_on_account_row_targets_the_account() {
        let mut app = create_test_app();
        expand_all(&mut app);
        app.cursor = 2; // r1, c1, a1
        run_on_cursor(&mut app, NodeAction::Remove).unwrap();
        assert!(matches!(
            app.mode,
            AppMode::Confirm(ConfirmTarget::Account { .. })
        ));
    }
}
