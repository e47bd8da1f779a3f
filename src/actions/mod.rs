mod dialogs;
mod drag;
mod form;
mod menu;
mod navigation;
mod search;
mod sync;

use crate::app::AppState;
use crate::view::{ClickRegion, NodeAction};
use anyhow::Result;

// Re-export all public functions from submodules
pub use dialogs::*;
pub use drag::*;
pub use form::*;
pub use menu::*;
pub use navigation::*;
pub use search::*;
pub use sync::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application control
    Quit,
    Refresh,

    // Movement
    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,

    // Expansion
    ToggleRow,
    Click { row: usize, region: ClickRegion },
    ExpandAll,
    CollapseAll,

    // Action menu
    OpenMenu,
    MenuUp,
    MenuDown,
    MenuSelect,
    CloseMenu,
    RunNodeAction(NodeAction),
    AddRootGrouping,

    // Form
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormCycleType,
    FormSubmit,
    FormCancel,

    // Confirmation prompt
    ConfirmYes,
    ConfirmNo,

    // Account picker
    PickerUp,
    PickerDown,
    PickerSelect,
    PickerCancel,

    // Drag and drop
    BeginDrag,
    DropDrag,
    CancelDrag,
    MouseDragStart { row: usize },
    MouseDrop { row: usize },

    // Search
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    ConfirmSearch,
    CancelSearch,
    NextSearchResult,

    // Help
    ShowHelp,
    CloseHelp,
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    match action {
        Action::Quit => app.running = false,
        Action::Refresh => refresh(app),

        // Movement
        Action::CursorUp => cursor_up(app),
        Action::CursorDown => cursor_down(app),
        Action::CursorTop => cursor_top(app),
        Action::CursorBottom => cursor_bottom(app),

        // Expansion
        Action::ToggleRow => toggle_row(app),
        Action::Click { row, region } => click(app, row, region),
        Action::ExpandAll => expand_all(app),
        Action::CollapseAll => collapse_all(app),

        // Action menu
        Action::OpenMenu => open_menu(app),
        Action::MenuUp => menu_up(app),
        Action::MenuDown => menu_down(app),
        Action::MenuSelect => menu_select(app)?,
        Action::CloseMenu => close_menu(app),
        Action::RunNodeAction(action) => run_on_cursor(app, action)?,
        Action::AddRootGrouping => open_create_form(app, None),

        // Form
        Action::FormChar(c) => form_char(app, c),
        Action::FormBackspace => form_backspace(app),
        Action::FormNextField => form_next_field(app),
        Action::FormCycleType => form_cycle_type(app),
        Action::FormSubmit => form_submit(app),
        Action::FormCancel => close_dialog(app),

        // Confirmation prompt
        Action::ConfirmYes => confirm_yes(app),
        Action::ConfirmNo => close_dialog(app),

        // Account picker
        Action::PickerUp => picker_up(app),
        Action::PickerDown => picker_down(app),
        Action::PickerSelect => picker_select(app),
        Action::PickerCancel => close_dialog(app),

        // Drag and drop
        Action::BeginDrag => begin_drag(app),
        Action::DropDrag => drop_drag(app),
        Action::CancelDrag => cancel_drag(app),
        Action::MouseDragStart { row } => mouse_drag_start(app, row),
        Action::MouseDrop { row } => mouse_drop(app, row),

        // Search
        Action::StartSearch => start_search(app),
        Action::SearchChar(c) => search_char(app, c),
        Action::SearchBackspace => search_backspace(app),
        Action::ConfirmSearch => confirm_search(app),
        Action::CancelSearch => cancel_search(app),
        Action::NextSearchResult => next_search_result(app),

        // Help
        Action::ShowHelp => app.mode = crate::app::AppMode::Help,
        Action::CloseHelp => app.mode = crate::app::AppMode::Normal,
    }
    Ok(())
}
