//! Renderer-independent view of the tree: which rows are shown, what a click
//! on a row does, and which per-node actions are available.

use crate::model::{AccountId, GroupingId, GroupingNode};
use crate::state::ExpansionState;
use crate::tree::{is_suppressed, GlTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Grouping(GroupingId),
    Account {
        grouping: GroupingId,
        account: AccountId,
    },
}

/// One line of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub depth: usize,
    pub label: String,
    pub icon: Option<String>,
    pub summary: String,
    pub expandable: bool,
    pub expanded: bool,
}

impl Row {
    pub fn grouping_id(&self) -> Option<&GroupingId> {
        match &self.kind {
            RowKind::Grouping(id) => Some(id),
            RowKind::Account { .. } => None,
        }
    }
}

/// Walks the tree depth-first and returns the rows currently visible.
///
/// Child groupings of an expanded node come first, followed by its accounts.
pub fn visible_rows(tree: &GlTree, state: &ExpansionState) -> Vec<Row> {
    let mut rows = Vec::new();
    for root in tree.roots() {
        if is_suppressed(root, 0) {
            continue;
        }
        push_rows(tree, state, root, &mut rows);
    }
    rows
}

fn push_rows(tree: &GlTree, state: &ExpansionState, node: &GroupingNode, rows: &mut Vec<Row>) {
    let expandable = tree.is_expandable(&node.id);
    let expanded = expandable && state.is_expanded(&node.id);
    rows.push(Row {
        kind: RowKind::Grouping(node.id.clone()),
        depth: node.depth,
        label: node.name.clone(),
        icon: None,
        summary: tree.summary_label(&node.id),
        expandable,
        expanded,
    });

    if !expanded {
        return;
    }
    for child in tree.children_of(Some(&node.id)) {
        push_rows(tree, state, child, rows);
    }
    for account in &node.accounts {
        rows.push(Row {
            kind: RowKind::Account {
                grouping: node.id.clone(),
                account: account.id.clone(),
            },
            depth: node.depth + 1,
            label: account.name.clone(),
            icon: account.icon.clone(),
            summary: String::new(),
            expandable: false,
            expanded: false,
        });
    }
}

/// Part of a row that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    DragHandle,
    ActionMenu,
    Row,
}

/// Applies a click on the row of `id`. Returns whether the expanded set changed.
///
/// Clicks on the drag handle or the action menu are swallowed here and never
/// toggle the row.
pub fn handle_click(
    tree: &GlTree,
    state: &mut ExpansionState,
    id: &GroupingId,
    region: ClickRegion,
) -> bool {
    match region {
        ClickRegion::DragHandle | ClickRegion::ActionMenu => false,
        ClickRegion::Row => {
            if !tree.is_expandable(id) {
                return false;
            }
            let expanded = state.is_expanded(id);
            state.toggle_node(id, !expanded);
            true
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    AddAccount,
    AddGlDefinition,
    Edit,
    View,
    Remove,
}

impl NodeAction {
    pub const ALL: [NodeAction; 5] = [
        NodeAction::AddAccount,
        NodeAction::AddGlDefinition,
        NodeAction::Edit,
        NodeAction::View,
        NodeAction::Remove,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NodeAction::AddAccount => "Add Account",
            NodeAction::AddGlDefinition => "Add GL Definition",
            NodeAction::Edit => "Edit",
            NodeAction::View => "View",
            NodeAction::Remove => "Remove",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub action: NodeAction,
    pub enabled: bool,
}

/// Action menu of a grouping with each entry's gate evaluated.
///
/// `delete_pending` disables Remove while a delete for this node is in flight.
pub fn node_actions(
    tree: &GlTree,
    id: &GroupingId,
    max_depth: usize,
    delete_pending: bool,
) -> Vec<MenuEntry> {
    let Some(depth) = tree.depth(id) else {
        return Vec::new();
    };
    NodeAction::ALL
        .iter()
        .map(|&action| {
            let enabled = match action {
                NodeAction::AddGlDefinition => depth < max_depth,
                NodeAction::Remove => tree.can_delete(id) && !delete_pending,
                NodeAction::AddAccount | NodeAction::Edit | NodeAction::View => true,
            };
            MenuEntry { action, enabled }
        })
        .collect()
}

pub fn is_action_enabled(
    tree: &GlTree,
    id: &GroupingId,
    action: NodeAction,
    max_depth: usize,
    delete_pending: bool,
) -> bool {
    node_actions(tree, id, max_depth, delete_pending)
        .iter()
        .any(|entry| entry.action == action && entry.enabled)
}

/// Plain-text rendering of the visible rows.
pub fn outline(tree: &GlTree, state: &ExpansionState) -> String {
    let mut out = String::new();
    for row in visible_rows(tree, state) {
        out.push_str(&"  ".repeat(row.depth));
        match row.kind {
            RowKind::Grouping(_) => {
                let marker = match (row.expandable, row.expanded) {
                    (false, _) => "-",
                    (true, false) => "+",
                    (true, true) => "v",
                };
                out.push_str(marker);
                out.push(' ');
                out.push_str(&row.label);
                if !row.summary.is_empty() {
                    out.push_str(&format!(" ({})", row.summary));
                }
            }
            RowKind::Account { .. } => {
                out.push_str("* ");
                out.push_str(&row.label);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountRef, GroupingRecord};

    fn id(s: &str) -> GroupingId {
        GroupingId::from(s)
    }

    fn sample() -> GlTree {
        GlTree::from_records(vec![GroupingRecord::new("r1", "Root").with_children(vec![
            GroupingRecord::new("c1", "Child")
                .with_accounts(vec![AccountRef::new("a1", "Cash")]),
            GroupingRecord::new("c2", "Empty"),
        ])])
        .unwrap()
    }

    #[test]
    fn test_collapsed_tree_shows_only_roots() {
        let tree = sample();
        let rows = visible_rows(&tree, &ExpansionState::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].grouping_id(), Some(&id("r1")));
        assert!(rows[0].expandable);
        assert!(!rows[0].expanded);
    }

    #[test]
    fn test_expanded_rows_list_children_then_accounts() {
        let tree = sample();
        let mut state = ExpansionState::new();
        state.expand_path([&id("r1"), &id("c1")]);

        let rows = visible_rows(&tree, &state);
        let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);
        assert_eq!(
            rows[2].kind,
            RowKind::Account {
                grouping: id("c1"),
                account: AccountId::from("a1")
            }
        );
    }

    #[test]
    fn test_row_click_toggles_expandable_only() {
        let tree = sample();
        let mut state = ExpansionState::new();

        assert!(handle_click(&tree, &mut state, &id("r1"), ClickRegion::Row));
        assert!(state.is_expanded(&id("r1")));
        assert!(handle_click(&tree, &mut state, &id("r1"), ClickRegion::Row));
        assert!(!state.is_expanded(&id("r1")));

        assert!(!handle_click(&tree, &mut state, &id("c2"), ClickRegion::Row));
        assert_eq!(state.expanded_count(), 0);
    }

    #[test]
    fn test_handle_and_menu_clicks_never_toggle() {
        let tree = sample();
        let mut state = ExpansionState::new();
        assert!(!handle_click(&tree, &mut state, &id("r1"), ClickRegion::DragHandle));
        assert!(!handle_click(&tree, &mut state, &id("r1"), ClickRegion::ActionMenu));
        assert_eq!(state.expanded_count(), 0);
    }

    #[test]
    fn test_menu_gates() {
        let tree = sample();
        let gate = |node: &str, action, max_depth, pending| {
            is_action_enabled(&tree, &id(node), action, max_depth, pending)
        };

        assert!(gate("r1", NodeAction::AddGlDefinition, 1, false));
        assert!(!gate("c1", NodeAction::AddGlDefinition, 1, false));
        assert!(!gate("r1", NodeAction::Remove, 4, false));
        assert!(!gate("c1", NodeAction::Remove, 4, false));
        assert!(gate("c2", NodeAction::Remove, 4, false));
        assert!(!gate("c2", NodeAction::Remove, 4, true));
        assert!(gate("c1", NodeAction::AddAccount, 0, true));
        assert!(node_actions(&tree, &id("missing"), 4, false).is_empty());
    }
}
