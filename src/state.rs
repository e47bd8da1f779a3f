use std::collections::HashSet;

use crate::model::GroupingId;

/// Which groupings are expanded, plus a one-shot scroll target.
///
/// Created once per session and never persisted: everything starts collapsed.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<GroupingId>,
    target: Option<GroupingId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_node(&mut self, id: &GroupingId, expanded: bool) {
        if expanded {
            self.expanded.insert(id.clone());
        } else {
            self.expanded.remove(id);
        }
    }

    pub fn is_expanded(&self, id: &GroupingId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Expands every id in `path`, e.g. the ancestors of a node to reveal.
    pub fn expand_path<'a>(&mut self, path: impl IntoIterator<Item = &'a GroupingId>) {
        for id in path {
            self.expanded.insert(id.clone());
        }
    }

    /// Collapses everything. A pending scroll target is dropped with it.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.target = None;
    }

    /// Drops all state about a deleted grouping.
    pub fn forget(&mut self, id: &GroupingId) {
        self.expanded.remove(id);
        if self.target.as_ref() == Some(id) {
            self.target = None;
        }
    }

    pub fn set_target_node_id(&mut self, id: &GroupingId) {
        self.target = Some(id.clone());
    }

    pub fn target_node_id(&self) -> Option<&GroupingId> {
        self.target.as_ref()
    }

    /// Clears the scroll target once `id` has been scrolled into view.
    /// A newer target set in the meantime is left alone.
    pub fn clear_target_node_id_after_scroll(&mut self, id: &GroupingId) {
        if self.target.as_ref() == Some(id) {
            self.target = None;
        }
    }
}
