use std::collections::{HashMap, HashSet};

use indextree::{Arena, NodeId};
use tracing::{debug, warn};

use crate::errors::{TreeError, TreeResult};
use crate::model::{AccountId, AccountRef, GroupingDraft, GroupingId, GroupingNode, GroupingRecord};

/// First-level nodes that carry an entries back-reference belong nested under
/// their entries grouping and are not rendered as roots.
pub fn is_suppressed(node: &GroupingNode, depth: usize) -> bool {
    node.entries_id.is_some() && depth == 0
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// The chart-of-accounts grouping hierarchy.
///
/// Groupings live in an arena under a hidden synthetic root, so the root list
/// is just the synthetic root's children. A flat index maps every grouping id
/// to its arena slot.
#[derive(Debug, Clone)]
pub struct GlTree {
    arena: Arena<GroupingNode>,
    root: NodeId,
    index: HashMap<GroupingId, NodeId>,
}

impl Default for GlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GlTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(GroupingNode::new("", "root"));
        Self {
            arena,
            root,
            index: HashMap::new(),
        }
    }

    /// Builds the tree from the nested records returned by a fetch.
    ///
    /// Depths are recomputed from position. Root-level records with an
    /// entries id are either dropped (when the same id also appears nested),
    /// re-homed under their entries grouping, or kept as suppressed roots.
    pub fn from_records(records: Vec<GroupingRecord>) -> TreeResult<Self> {
        let mut nested = HashSet::new();
        for record in &records {
            collect_nested_ids(&record.children, &mut nested);
        }

        let mut tree = Self::new();
        let mut rehome = Vec::new();
        for record in records {
            if record.entries_id.is_some() && nested.contains(&record.id) {
                debug!(id = %record.id, "dropping root-level duplicate of nested grouping");
                continue;
            }
            if let Some(entries_id) = record.entries_id.clone() {
                rehome.push((record.id.clone(), entries_id));
            }
            let root = tree.root;
            tree.insert_record(root, record)?;
        }

        for (id, entries_id) in rehome {
            tree.rehome(&id, &entries_id);
        }

        Ok(tree)
    }

    fn insert_record(&mut self, parent: NodeId, record: GroupingRecord) -> TreeResult<()> {
        if self.index.contains_key(&record.id) {
            return Err(TreeError::DuplicateId(record.id));
        }

        let depth = self.slot_depth(parent).map_or(0, |d| d + 1);
        if let Some(given) = record.depth {
            if given != depth {
                warn!(id = %record.id, given, depth, "correcting grouping depth");
            }
        }

        let node = GroupingNode {
            id: record.id.clone(),
            name: record.name,
            description: record.description,
            depth,
            accounts: record.accounts,
            general_ledger_type: record.general_ledger_type,
            entries_id: record.entries_id,
        };
        let slot = self.arena.new_node(node);
        parent.append(slot, &mut self.arena);
        self.index.insert(record.id, slot);

        for child in record.children {
            self.insert_record(slot, child)?;
        }
        Ok(())
    }

    fn rehome(&mut self, id: &GroupingId, entries_id: &GroupingId) {
        let (Some(&slot), Some(&parent)) = (self.index.get(id), self.index.get(entries_id)) else {
            warn!(%id, %entries_id, "entries grouping missing, keeping suppressed root");
            return;
        };
        if parent.ancestors(&self.arena).any(|a| a == slot) {
            warn!(%id, %entries_id, "entries reference would form a cycle, keeping suppressed root");
            return;
        }
        slot.detach(&mut self.arena);
        parent.append(slot, &mut self.arena);
        self.refresh_depths(slot);
        debug!(%id, %entries_id, "re-homed grouping under its entries grouping");
    }

    fn refresh_depths(&mut self, slot: NodeId) {
        let subtree: Vec<NodeId> = slot.descendants(&self.arena).collect();
        for node_id in subtree {
            let depth = self.compute_depth(node_id);
            if let Some(node) = self.arena.get_mut(node_id) {
                node.get_mut().depth = depth;
            }
        }
    }

    /// Number of grouping ancestors, excluding the synthetic root.
    fn compute_depth(&self, slot: NodeId) -> usize {
        slot.ancestors(&self.arena).count().saturating_sub(2)
    }

    fn slot_depth(&self, slot: NodeId) -> Option<usize> {
        if slot == self.root {
            None
        } else {
            self.arena.get(slot).map(|n| n.get().depth)
        }
    }

    /// Converts back to the nested wire shape, roots in display order.
    pub fn to_records(&self) -> Vec<GroupingRecord> {
        self.root
            .children(&self.arena)
            .map(|slot| self.record_of(slot))
            .collect()
    }

    fn record_of(&self, slot: NodeId) -> GroupingRecord {
        let node = self.arena[slot].get();
        GroupingRecord {
            id: node.id.clone(),
            name: node.name.clone(),
            description: node.description.clone(),
            depth: Some(node.depth),
            children: slot
                .children(&self.arena)
                .map(|child| self.record_of(child))
                .collect(),
            accounts: node.accounts.clone(),
            general_ledger_type: node.general_ledger_type,
            entries_id: node.entries_id.clone(),
        }
    }

    fn slot(&self, id: &GroupingId) -> TreeResult<NodeId> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    /// Arena slot of a sibling list's parent: the synthetic root for `None`.
    fn parent_slot(&self, parent: Option<&GroupingId>) -> TreeResult<NodeId> {
        match parent {
            Some(id) => self.slot(id),
            None => Ok(self.root),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &GroupingId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &GroupingId) -> Option<&GroupingNode> {
        self.index.get(id).map(|&slot| self.arena[slot].get())
    }

    pub fn depth(&self, id: &GroupingId) -> Option<usize> {
        self.get(id).map(|n| n.depth)
    }

    /// Children of `parent`, or the root list for `None`, in display order.
    pub fn children_of(&self, parent: Option<&GroupingId>) -> Vec<&GroupingNode> {
        match self.parent_slot(parent) {
            Ok(slot) => slot
                .children(&self.arena)
                .map(|child| self.arena[child].get())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn roots(&self) -> Vec<&GroupingNode> {
        self.children_of(None)
    }

    pub fn parent_of(&self, id: &GroupingId) -> Option<&GroupingId> {
        let slot = self.index.get(id)?;
        let parent = slot.parent(&self.arena)?;
        if parent == self.root {
            None
        } else {
            Some(&self.arena[parent].get().id)
        }
    }

    /// Ancestor ids from the root down to the parent of `id`, excluding `id`.
    pub fn path_to(&self, id: &GroupingId) -> Option<Vec<GroupingId>> {
        let slot = *self.index.get(id)?;
        let mut path: Vec<GroupingId> = slot
            .ancestors(&self.arena)
            .skip(1)
            .filter(|&a| a != self.root)
            .map(|a| self.arena[a].get().id.clone())
            .collect();
        path.reverse();
        Some(path)
    }

    /// Resolves the sibling list addressed by `path`.
    ///
    /// Returns `None` when the path no longer describes the real ancestry of
    /// its last element, which happens when the caller holds stale state.
    pub fn sibling_ids(&self, path: &[GroupingId]) -> Option<Vec<GroupingId>> {
        let parent = match path.split_last() {
            None => self.root,
            Some((last, ancestors)) => {
                if self.path_to(last)?.as_slice() != ancestors {
                    return None;
                }
                *self.index.get(last)?
            }
        };
        Some(
            parent
                .children(&self.arena)
                .map(|child| self.arena[child].get().id.clone())
                .collect(),
        )
    }

    /// All groupings, depth-first in display order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupingNode> + '_ {
        self.root
            .descendants(&self.arena)
            .skip(1)
            .map(move |slot| self.arena[slot].get())
    }

    pub fn has_children(&self, id: &GroupingId) -> bool {
        self.index
            .get(id)
            .is_some_and(|slot| slot.children(&self.arena).next().is_some())
    }

    pub fn has_accounts(&self, id: &GroupingId) -> bool {
        self.get(id).is_some_and(|n| !n.accounts.is_empty())
    }

    pub fn is_expandable(&self, id: &GroupingId) -> bool {
        self.has_children(id) || self.has_accounts(id)
    }

    pub fn can_delete(&self, id: &GroupingId) -> bool {
        self.contains(id) && !self.has_children(id) && !self.has_accounts(id)
    }

    /// Item and account counts for first-level nodes, e.g. "2 items, 1 account".
    pub fn summary_label(&self, id: &GroupingId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        if node.depth != 0 {
            return String::new();
        }

        let items = self.children_of(Some(id)).len();
        let accounts = node.accounts.len();
        let mut parts = Vec::new();
        if items > 0 {
            parts.push(plural(items, "item"));
        }
        if accounts > 0 {
            parts.push(plural(accounts, "account"));
        }
        parts.join(", ")
    }

    /// Grouping that currently holds `account`, if any.
    pub fn account_owner(&self, account: &AccountId) -> Option<&GroupingId> {
        self.iter()
            .find(|n| n.accounts.iter().any(|a| &a.id == account))
            .map(|n| &n.id)
    }

    /// Adds `node` as the last child of `parent` (or as a root for `None`).
    /// Rejected when the parent already sits at `max_depth`.
    pub fn insert_grouping(
        &mut self,
        parent: Option<&GroupingId>,
        mut node: GroupingNode,
        max_depth: usize,
    ) -> TreeResult<()> {
        if self.index.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        let parent_slot = self.parent_slot(parent)?;
        let depth = match self.slot_depth(parent_slot) {
            Some(parent_depth) if parent_depth >= max_depth => {
                return Err(TreeError::DepthExceeded {
                    id: self.arena[parent_slot].get().id.clone(),
                    depth: parent_depth,
                    max_depth,
                });
            }
            Some(parent_depth) => parent_depth + 1,
            None => 0,
        };

        node.depth = depth;
        let id = node.id.clone();
        let slot = self.arena.new_node(node);
        parent_slot.append(slot, &mut self.arena);
        self.index.insert(id, slot);
        Ok(())
    }

    pub fn update_grouping(&mut self, id: &GroupingId, draft: &GroupingDraft) -> TreeResult<()> {
        let slot = self.slot(id)?;
        let node = self.arena[slot].get_mut();
        node.name = draft.name.clone();
        node.description = draft.description.clone();
        node.general_ledger_type = draft.general_ledger_type;
        Ok(())
    }

    /// Removes a leaf grouping. Groupings with children or accounts are kept.
    pub fn remove_grouping(&mut self, id: &GroupingId) -> TreeResult<GroupingNode> {
        let slot = self.slot(id)?;
        if !self.can_delete(id) {
            return Err(TreeError::HasDescendants(id.clone()));
        }
        let node = self.arena[slot].get().clone();
        slot.remove(&mut self.arena);
        self.index.remove(id);
        Ok(node)
    }

    pub fn attach_account(&mut self, grouping: &GroupingId, account: AccountRef) -> TreeResult<()> {
        let slot = self.slot(grouping)?;
        if let Some(owner) = self.account_owner(&account.id) {
            return Err(TreeError::AccountAlreadyAttached {
                account: account.id,
                grouping: owner.clone(),
            });
        }
        self.arena[slot].get_mut().accounts.push(account);
        Ok(())
    }

    pub fn detach_account(
        &mut self,
        grouping: &GroupingId,
        account: &AccountId,
    ) -> TreeResult<AccountRef> {
        let slot = self.slot(grouping)?;
        let accounts = &mut self.arena[slot].get_mut().accounts;
        let pos = accounts
            .iter()
            .position(|a| &a.id == account)
            .ok_or_else(|| TreeError::AccountNotAttached {
                account: account.clone(),
                grouping: grouping.clone(),
            })?;
        Ok(accounts.remove(pos))
    }

    /// Replaces the order of the sibling list under `parent` with `order`.
    ///
    /// `order` must name exactly the current members of that list; otherwise
    /// nothing changes.
    pub fn apply_order(&mut self, parent: Option<&GroupingId>, order: &[GroupingId]) -> TreeResult<()> {
        let parent_slot = self.parent_slot(parent)?;
        let current: HashSet<&GroupingId> = parent_slot
            .children(&self.arena)
            .map(|child| &self.arena[child].get().id)
            .collect();
        let requested: HashSet<&GroupingId> = order.iter().collect();
        if current.len() != order.len() || current != requested {
            return Err(TreeError::OrderMismatch);
        }

        let slots: Vec<NodeId> = order.iter().map(|id| self.index[id]).collect();
        for slot in slots {
            slot.detach(&mut self.arena);
            parent_slot.append(slot, &mut self.arena);
        }
        Ok(())
    }
}

fn collect_nested_ids(records: &[GroupingRecord], out: &mut HashSet<GroupingId>) {
    for record in records {
        out.insert(record.id.clone());
        collect_nested_ids(&record.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GlTree {
        GlTree::from_records(vec![
            GroupingRecord::new("r1", "Assets").with_children(vec![
                GroupingRecord::new("c1", "Current")
                    .with_accounts(vec![AccountRef::new("a1", "Cash on hand")]),
                GroupingRecord::new("c2", "Fixed")
                    .with_children(vec![GroupingRecord::new("g1", "Buildings")]),
            ]),
            GroupingRecord::new("r2", "Liabilities"),
        ])
        .unwrap()
    }

    fn id(s: &str) -> GroupingId {
        GroupingId::from(s)
    }

    #[test]
    fn test_depth_equals_ancestor_count() {
        let tree = sample();
        for node in tree.iter() {
            let ancestors = tree.path_to(&node.id).unwrap().len();
            assert_eq!(node.depth, ancestors, "depth mismatch for {}", node.id);
        }
        assert_eq!(tree.depth(&id("r1")), Some(0));
        assert_eq!(tree.depth(&id("g1")), Some(2));
    }

    #[test]
    fn test_supplied_depth_is_corrected() {
        let mut record = GroupingRecord::new("c1", "Child");
        record.depth = Some(7);
        let tree =
            GlTree::from_records(vec![GroupingRecord::new("r1", "Root").with_children(vec![record])])
                .unwrap();
        assert_eq!(tree.depth(&id("c1")), Some(1));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = GlTree::from_records(vec![
            GroupingRecord::new("r1", "A"),
            GroupingRecord::new("r1", "B"),
        ]);
        assert_eq!(result.unwrap_err(), TreeError::DuplicateId(id("r1")));
    }

    #[test]
    fn test_structural_queries() {
        let tree = sample();
        assert!(tree.has_children(&id("r1")));
        assert!(!tree.has_accounts(&id("r1")));
        assert!(tree.has_accounts(&id("c1")));
        assert!(tree.is_expandable(&id("c1")));
        assert!(!tree.is_expandable(&id("r2")));
        assert!(!tree.can_delete(&id("c1")));
        assert!(tree.can_delete(&id("g1")));
    }

    #[test]
    fn test_summary_label_only_for_first_level() {
        let mut tree = sample();
        assert_eq!(tree.summary_label(&id("r1")), "2 items");
        assert_eq!(tree.summary_label(&id("r2")), "");
        assert_eq!(tree.summary_label(&id("c1")), "");

        tree.attach_account(&id("r1"), AccountRef::new("a2", "Petty cash"))
            .unwrap();
        assert_eq!(tree.summary_label(&id("r1")), "2 items, 1 account");
        tree.attach_account(&id("r2"), AccountRef::new("a3", "Payables"))
            .unwrap();
        assert_eq!(tree.summary_label(&id("r2")), "1 account");
    }

    #[test]
    fn test_is_suppressed_only_at_depth_zero() {
        let node = GroupingNode {
            entries_id: Some(id("e1")),
            ..GroupingNode::new("x", "X")
        };
        assert!(is_suppressed(&node, 0));
        assert!(!is_suppressed(&node, 1));
        assert!(!is_suppressed(&GroupingNode::new("y", "Y"), 0));
    }

    #[test]
    fn test_root_duplicate_of_nested_node_is_dropped() {
        let tree = GlTree::from_records(vec![
            GroupingRecord::new("r1", "Entries")
                .with_children(vec![GroupingRecord::new("n1", "Nested").with_entries_id("r1")]),
            GroupingRecord::new("n1", "Nested").with_entries_id("r1"),
        ])
        .unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.parent_of(&id("n1")), Some(&id("r1")));
    }

    #[test]
    fn test_root_with_entries_id_is_rehomed() {
        let tree = GlTree::from_records(vec![
            GroupingRecord::new("r1", "Entries"),
            GroupingRecord::new("n1", "Moved")
                .with_entries_id("r1")
                .with_children(vec![GroupingRecord::new("n2", "Deep")]),
        ])
        .unwrap();
        assert_eq!(tree.parent_of(&id("n1")), Some(&id("r1")));
        assert_eq!(tree.depth(&id("n1")), Some(1));
        assert_eq!(tree.depth(&id("n2")), Some(2));
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn test_orphan_entries_node_stays_at_root() {
        let tree = GlTree::from_records(vec![GroupingRecord::new("n1", "Orphan").with_entries_id("gone")])
            .unwrap();
        let node = tree.get(&id("n1")).unwrap();
        assert_eq!(node.depth, 0);
        assert!(is_suppressed(node, node.depth));
    }

    #[test]
    fn test_sibling_ids_rejects_stale_path() {
        let tree = sample();
        assert_eq!(
            tree.sibling_ids(&[]),
            Some(vec![id("r1"), id("r2")])
        );
        assert_eq!(
            tree.sibling_ids(&[id("r1")]),
            Some(vec![id("c1"), id("c2")])
        );
        assert_eq!(tree.sibling_ids(&[id("r1"), id("c2")]), Some(vec![id("g1")]));
        // c2 is not a root, so a path starting at it is stale
        assert_eq!(tree.sibling_ids(&[id("c2")]), None);
        assert_eq!(tree.sibling_ids(&[id("missing")]), None);
    }

    #[test]
    fn test_insert_respects_max_depth() {
        let mut tree = sample();
        tree.insert_grouping(Some(&id("g1")), GroupingNode::new("g2", "Too deep?"), 3)
            .unwrap();
        assert_eq!(tree.depth(&id("g2")), Some(3));

        let err = tree
            .insert_grouping(Some(&id("g2")), GroupingNode::new("g3", "Too deep"), 3)
            .unwrap_err();
        assert!(matches!(err, TreeError::DepthExceeded { depth: 3, max_depth: 3, .. }));
        assert!(!tree.contains(&id("g3")));
    }

    #[test]
    fn test_remove_requires_no_descendants() {
        let mut tree = sample();
        assert_eq!(
            tree.remove_grouping(&id("c2")).unwrap_err(),
            TreeError::HasDescendants(id("c2"))
        );
        tree.remove_grouping(&id("g1")).unwrap();
        tree.remove_grouping(&id("c2")).unwrap();
        assert_eq!(tree.sibling_ids(&[id("r1")]), Some(vec![id("c1")]));
        assert!(tree.get(&id("g1")).is_none());
    }

    #[test]
    fn test_account_attached_to_one_grouping_at_a_time() {
        let mut tree = sample();
        let err = tree
            .attach_account(&id("r2"), AccountRef::new("a1", "Cash on hand"))
            .unwrap_err();
        assert!(matches!(err, TreeError::AccountAlreadyAttached { .. }));

        let detached = tree.detach_account(&id("c1"), &AccountId::from("a1")).unwrap();
        tree.attach_account(&id("r2"), detached).unwrap();
        assert_eq!(tree.account_owner(&AccountId::from("a1")), Some(&id("r2")));
    }

    #[test]
    fn test_apply_order_rejects_mismatched_members() {
        let mut tree = sample();
        assert_eq!(
            tree.apply_order(Some(&id("r1")), &[id("c1")]),
            Err(TreeError::OrderMismatch)
        );
        tree.apply_order(Some(&id("r1")), &[id("c2"), id("c1")])
            .unwrap();
        assert_eq!(tree.sibling_ids(&[id("r1")]), Some(vec![id("c2"), id("c1")]));
    }

    #[test]
    fn test_records_round_trip_keeps_order() {
        let tree = sample();
        let rebuilt = GlTree::from_records(tree.to_records()).unwrap();
        let before: Vec<_> = tree.iter().map(|n| n.id.clone()).collect();
        let after: Vec<_> = rebuilt.iter().map(|n| n.id.clone()).collect();
        assert_eq!(before, after);
    }
}
