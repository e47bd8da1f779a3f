use crate::actions::Action;
use crate::app::{AppMode, AppState, FormField};
use crate::ui::constants::{HANDLE_WIDTH, INDENT_WIDTH, MENU_WIDTH};
use crate::view::{ClickRegion, NodeAction, RowKind};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

pub fn handle_events(app: &mut AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(10))? {
        match event::read()? {
            Event::Key(key) => return Ok(handle_key_event(app, key)),
            Event::Mouse(mouse) => return Ok(handle_mouse_event(app, mouse)),
            _ => {}
        }
    }
    Ok(None)
}

pub fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Menu { .. } => handle_menu_mode(key),
        AppMode::Form(form) => handle_form_mode(form.field, key),
        AppMode::Confirm(_) => handle_confirm_mode(key),
        AppMode::AccountPicker { .. } => handle_picker_mode(key),
        AppMode::Search { .. } => handle_search_mode(key),
        AppMode::Help => handle_help_mode(key),
    }
}

fn handle_normal_mode(app: &AppState, key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    // While a grouping is picked up, Enter drops it and Esc puts it back.
    if app.drag.is_some() {
        match key.code {
            Enter | Char(' ') => return Some(Action::DropDrag),
            Esc => return Some(Action::CancelDrag),
            _ => {}
        }
    }

    match (key.code, key.modifiers) {
        // Quit
        (Char('q'), KeyModifiers::NONE) => Some(Action::Quit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        // Movement
        (Char('j'), KeyModifiers::NONE) | (Down, _) => Some(Action::CursorDown),
        (Char('k'), KeyModifiers::NONE) | (Up, _) => Some(Action::CursorUp),
        (Char('g'), KeyModifiers::NONE) | (Home, _) => Some(Action::CursorTop),
        (Char('G'), KeyModifiers::SHIFT) | (End, _) => Some(Action::CursorBottom),

        // Expansion
        (Char(' '), KeyModifiers::NONE) | (Enter, KeyModifiers::NONE) => Some(Action::ToggleRow),
        (Char('b'), KeyModifiers::NONE) => Some(Action::ExpandAll),
        (Char('z'), KeyModifiers::NONE) => Some(Action::CollapseAll),

        // Node actions
        (Char('m'), KeyModifiers::NONE) | (Tab, KeyModifiers::NONE) => Some(Action::OpenMenu),
        (Char('a'), KeyModifiers::NONE) => Some(Action::RunNodeAction(NodeAction::AddAccount)),
        (Char('c'), KeyModifiers::NONE) => {
            Some(Action::RunNodeAction(NodeAction::AddGlDefinition))
        }
        (Char('e'), KeyModifiers::NONE) => Some(Action::RunNodeAction(NodeAction::Edit)),
        (Char('v'), KeyModifiers::NONE) => Some(Action::RunNodeAction(NodeAction::View)),
        (Char('d'), KeyModifiers::NONE) | (Delete, _) => {
            Some(Action::RunNodeAction(NodeAction::Remove))
        }
        (Char('o'), KeyModifiers::NONE) => Some(Action::AddRootGrouping),

        // Reordering
        (Char('M'), KeyModifiers::SHIFT) => Some(Action::BeginDrag),

        // Search
        (Char('/'), KeyModifiers::NONE) | (Char('f'), KeyModifiers::CONTROL) => {
            Some(Action::StartSearch)
        }
        (Char('n'), KeyModifiers::NONE) => Some(Action::NextSearchResult),

        (Char('r'), KeyModifiers::NONE) => Some(Action::Refresh),
        (Char('?'), _) => Some(Action::ShowHelp),

        _ => None,
    }
}

fn handle_menu_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match key.code {
        Esc | Char('q') => Some(Action::CloseMenu),
        Char('k') | Up => Some(Action::MenuUp),
        Char('j') | Down => Some(Action::MenuDown),
        Enter => Some(Action::MenuSelect),
        _ => None,
    }
}

fn handle_form_mode(field: FormField, key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::FormCancel),
        (Enter, _) => Some(Action::FormSubmit),
        (Tab, _) | (Down, _) => Some(Action::FormNextField),
        (Backspace, _) => Some(Action::FormBackspace),

        // The classification is a closed set, so it cycles instead of taking text.
        (Char(' '), _) | (Left, _) | (Right, _) if field == FormField::GeneralLedgerType => {
            Some(Action::FormCycleType)
        }
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::FormChar(c)),

        _ => None,
    }
}

fn handle_confirm_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmYes),
        KeyCode::Char('n') | KeyCode::Esc => Some(Action::ConfirmNo),
        _ => None,
    }
}

fn handle_picker_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match key.code {
        Esc | Char('q') => Some(Action::PickerCancel),
        Char('k') | Up => Some(Action::PickerUp),
        Char('j') | Down => Some(Action::PickerDown),
        Enter => Some(Action::PickerSelect),
        _ => None,
    }
}

fn handle_search_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match key.code {
        Esc => Some(Action::CancelSearch),
        Enter => Some(Action::ConfirmSearch),
        Char(c) => Some(Action::SearchChar(c)),
        Backspace => Some(Action::SearchBackspace),
        _ => None,
    }
}

fn handle_help_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}

pub fn handle_mouse_event(app: &AppState, mouse: MouseEvent) -> Option<Action> {
    if app.mode != AppMode::Normal {
        return None;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let (row, region) = hit_test(app, mouse.column, mouse.row)?;
            if region == ClickRegion::DragHandle {
                Some(Action::MouseDragStart { row })
            } else {
                Some(Action::Click { row, region })
            }
        }
        MouseEventKind::Up(MouseButton::Left) if app.drag.is_some() => {
            // Releasing outside the rows cancels the drag.
            let row = hit_test(app, mouse.column, mouse.row).map_or(usize::MAX, |(row, _)| row);
            Some(Action::MouseDrop { row })
        }
        MouseEventKind::ScrollDown => Some(Action::CursorDown),
        MouseEventKind::ScrollUp => Some(Action::CursorUp),
        _ => None,
    }
}

/// Maps a screen cell to a visible row index and the part of the row hit.
///
/// A row is laid out as indent, drag handle, label, and the action menu glyph
/// in the rightmost columns. Account rows have no handle.
pub fn hit_test(app: &AppState, column: u16, row: u16) -> Option<(usize, ClickRegion)> {
    let area = app.tree_area;
    if !area.contains(column, row) {
        return None;
    }
    let index = app.viewport_top + (row - area.y) as usize;
    let rows = app.rows();
    let hit = rows.get(index)?;

    let x = (column - area.x) as usize;
    let width = area.width as usize;
    let handle_start = hit.depth * INDENT_WIDTH;

    let region = if x + MENU_WIDTH >= width {
        ClickRegion::ActionMenu
    } else if matches!(hit.kind, RowKind::Grouping(_))
        && (handle_start..handle_start + HANDLE_WIDTH).contains(&x)
    {
        ClickRegion::DragHandle
    } else {
        ClickRegion::Row
    };
    Some((index, region))
}
