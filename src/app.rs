use anyhow::Result;
use tracing::{info, warn};

use crate::api::GlDefinitionApi;
use crate::config::AppConfig;
use crate::model::{AccountId, AccountRef, GeneralLedgerType, GroupingId};
use crate::outbox::{OpKind, Outbox};
use crate::reorder::DragSession;
use crate::state::ExpansionState;
use crate::tree::GlTree;
use crate::view::{self, MenuEntry, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Create,
    Edit,
    View,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    GeneralLedgerType,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Description,
            FormField::Description => FormField::GeneralLedgerType,
            FormField::GeneralLedgerType => FormField::Name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub kind: FormKind,
    /// Parent for `Create` (`None` creates a root), the grouping itself otherwise.
    pub target: Option<GroupingId>,
    pub name: String,
    pub description: String,
    pub general_ledger_type: GeneralLedgerType,
    pub field: FormField,
}

impl FormState {
    pub fn is_read_only(&self) -> bool {
        self.kind == FormKind::View
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmTarget {
    Grouping(GroupingId),
    Account {
        grouping: GroupingId,
        account: AccountId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Menu {
        id: GroupingId,
        selected: usize,
    },
    Form(FormState),
    Confirm(ConfirmTarget),
    AccountPicker {
        grouping: GroupingId,
        accounts: Vec<AccountRef>,
        selected: usize,
    },
    Search {
        query: String,
    },
    Help,
}

/// Screen area of the tree panel, recorded on every draw for mouse hit tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeArea {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl TreeArea {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x && column < self.x + self.width && row >= self.y && row < self.y + self.height
    }
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub tree: GlTree,
    pub expansion: ExpansionState,
    pub config: AppConfig,
    pub api: Box<dyn GlDefinitionApi>,
    pub outbox: Outbox,

    // Cursor is an index into the visible rows
    pub cursor: usize,
    pub viewport_top: usize,
    pub tree_area: TreeArea,

    pub drag: Option<DragSession>,

    // Message for status line
    pub message: Option<String>,

    // Search state
    pub search_results: Vec<GroupingId>,
    pub search_index: usize,
}

impl AppState {
    pub fn new(config: AppConfig, api: Box<dyn GlDefinitionApi>) -> Self {
        Self {
            running: true,
            mode: AppMode::Normal,
            tree: GlTree::new(),
            expansion: ExpansionState::new(),
            config,
            api,
            outbox: Outbox::new(),
            cursor: 0,
            viewport_top: 0,
            tree_area: TreeArea::default(),
            drag: None,
            message: None,
            search_results: Vec::new(),
            search_index: 0,
        }
    }

    /// Replaces the local tree with the service's current one.
    /// Expansion state survives; ids that vanished are simply never shown.
    pub fn refresh(&mut self) -> Result<()> {
        let records = self.api.fetch_tree()?;
        self.tree = GlTree::from_records(records)?;
        info!(groupings = self.tree.len(), "fetched grouping tree");
        self.clamp_cursor();
        Ok(())
    }

    /// Refetch after a failed request; a second failure only gets logged.
    pub fn resync(&mut self) {
        if let Err(err) = self.refresh() {
            warn!(%err, "refetch after failed request also failed");
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        view::visible_rows(&self.tree, &self.expansion)
    }

    pub fn current_row(&self) -> Option<Row> {
        self.rows().into_iter().nth(self.cursor)
    }

    /// Grouping under the cursor. Account rows resolve to their grouping.
    pub fn current_grouping(&self) -> Option<GroupingId> {
        self.current_row().map(|row| match row.kind {
            view::RowKind::Grouping(id) => id,
            view::RowKind::Account { grouping, .. } => grouping,
        })
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Moves the cursor to the row of `id` if it is visible.
    pub fn select_grouping(&mut self, id: &GroupingId) -> bool {
        match self
            .rows()
            .iter()
            .position(|row| row.grouping_id() == Some(id))
        {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    /// Expands the ancestors of `id` and marks it as the scroll target.
    pub fn reveal(&mut self, id: &GroupingId) {
        if let Some(path) = self.tree.path_to(id) {
            self.expansion.expand_path(&path);
            self.expansion.set_target_node_id(id);
        }
    }

    pub fn is_delete_pending(&self, id: &GroupingId) -> bool {
        self.outbox.is_pending(OpKind::Delete, Some(id))
    }

    pub fn menu_entries(&self, id: &GroupingId) -> Vec<MenuEntry> {
        view::node_actions(
            &self.tree,
            id,
            self.config.max_depth,
            self.is_delete_pending(id),
        )
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
