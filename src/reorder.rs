use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::GroupingId;
use crate::tree::GlTree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingIndex {
    pub id: GroupingId,
    pub index: usize,
}

/// Full ordering of one sibling level, as sent to the index-update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexUpdate {
    /// Parent grouping of the sibling list; `None` for the root list.
    pub parent: Option<GroupingId>,
    pub entries: Vec<SiblingIndex>,
}

impl IndexUpdate {
    pub fn from_order(parent: Option<GroupingId>, order: Vec<GroupingId>) -> Self {
        Self {
            parent,
            entries: order
                .into_iter()
                .enumerate()
                .map(|(index, id)| SiblingIndex { id, index })
                .collect(),
        }
    }

    /// Ids sorted by their index.
    pub fn ordered_ids(&self) -> Vec<GroupingId> {
        let mut entries: Vec<&SiblingIndex> = self.entries.iter().collect();
        entries.sort_by_key(|e| e.index);
        entries.into_iter().map(|e| e.id.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The path no longer addresses a sibling list in the tree.
    StalePath,
    SourceMissing,
    TargetMissing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The local tree now holds the new order; send this update.
    Moved(IndexUpdate),
    /// Dropped onto itself. Nothing to send.
    Unchanged,
    Aborted(AbortReason),
}

impl ReorderOutcome {
    pub fn update(&self) -> Option<&IndexUpdate> {
        match self {
            ReorderOutcome::Moved(update) => Some(update),
            _ => None,
        }
    }
}

/// Moves `source` to the position of `target`, shifting the items between
/// them by one slot. Returns `None` if either is not in `list`.
pub fn move_item<T: PartialEq + Clone>(list: &[T], source: &T, target: &T) -> Option<Vec<T>> {
    let from = list.iter().position(|item| item == source)?;
    let to = list.iter().position(|item| item == target)?;
    let mut moved = list.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Some(moved)
}

/// Reorders the sibling list addressed by `path` by moving `source` onto
/// `target`, applying the new order to `tree` optimistically.
///
/// The order is always read from `tree` at call time, so consecutive drags
/// build on each other even while earlier updates are still unsent.
pub fn reorder(
    tree: &mut GlTree,
    path: &[GroupingId],
    source: &GroupingId,
    target: &GroupingId,
) -> ReorderOutcome {
    if source == target {
        return ReorderOutcome::Unchanged;
    }

    let Some(siblings) = tree.sibling_ids(path) else {
        debug!(%source, %target, ?path, "reorder aborted: stale path");
        return ReorderOutcome::Aborted(AbortReason::StalePath);
    };
    if !siblings.contains(source) {
        debug!(%source, ?path, "reorder aborted: source not in sibling list");
        return ReorderOutcome::Aborted(AbortReason::SourceMissing);
    }
    let Some(order) = move_item(&siblings, source, target) else {
        debug!(%source, %target, ?path, "reorder aborted: stale target");
        return ReorderOutcome::Aborted(AbortReason::TargetMissing);
    };

    let parent = path.last().cloned();
    if let Err(err) = tree.apply_order(parent.as_ref(), &order) {
        debug!(%err, "reorder aborted while applying order");
        return ReorderOutcome::Aborted(AbortReason::StalePath);
    }

    debug!(%source, %target, ?parent, "reordered siblings");
    ReorderOutcome::Moved(IndexUpdate::from_order(parent, order))
}

/// A drag gesture scoped to the sibling list of the dragged grouping.
///
/// This is the seam a pointer or keyboard drag adapter talks to; drops on
/// groupings outside the list are aborted as stale targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    path: Vec<GroupingId>,
    source: GroupingId,
}

impl DragSession {
    pub fn begin_drag(tree: &GlTree, source: &GroupingId) -> Option<Self> {
        let path = tree.path_to(source)?;
        Some(Self {
            path,
            source: source.clone(),
        })
    }

    pub fn source(&self) -> &GroupingId {
        &self.source
    }

    pub fn path(&self) -> &[GroupingId] {
        &self.path
    }

    /// Whether `target` shares the dragged grouping's sibling list.
    pub fn accepts(&self, tree: &GlTree, target: &GroupingId) -> bool {
        tree.sibling_ids(&self.path)
            .is_some_and(|siblings| siblings.contains(target))
    }

    pub fn complete_drag(self, tree: &mut GlTree, target: &GroupingId) -> ReorderOutcome {
        reorder(tree, &self.path, &self.source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupingRecord;

    fn id(s: &str) -> GroupingId {
        GroupingId::from(s)
    }

    fn ids(list: &[&str]) -> Vec<GroupingId> {
        list.iter().map(|s| id(s)).collect()
    }

    fn flat_tree() -> GlTree {
        GlTree::from_records(vec![GroupingRecord::new("p", "Parent").with_children(vec![
            GroupingRecord::new("A", "A"),
            GroupingRecord::new("B", "B"),
            GroupingRecord::new("C", "C"),
            GroupingRecord::new("D", "D"),
        ])])
        .unwrap()
    }

    #[test]
    fn test_move_item_is_a_move_not_a_swap() {
        let list = vec!['A', 'B', 'C', 'D'];
        assert_eq!(move_item(&list, &'A', &'C'), Some(vec!['B', 'C', 'A', 'D']));
        assert_eq!(move_item(&list, &'D', &'B'), Some(vec!['A', 'D', 'B', 'C']));
        assert_eq!(move_item(&list, &'A', &'Z'), None);
    }

    #[test]
    fn test_reorder_emits_full_level_order() {
        let mut tree = flat_tree();
        let outcome = reorder(&mut tree, &ids(&["p"]), &id("A"), &id("C"));

        let update = outcome.update().expect("expected a move");
        assert_eq!(update.parent, Some(id("p")));
        assert_eq!(update.ordered_ids(), ids(&["B", "C", "A", "D"]));
        assert_eq!(update.entries[2], SiblingIndex { id: id("A"), index: 2 });
        assert_eq!(tree.sibling_ids(&ids(&["p"])), Some(ids(&["B", "C", "A", "D"])));
    }

    #[test]
    fn test_drop_on_self_is_a_noop() {
        let mut tree = flat_tree();
        assert_eq!(
            reorder(&mut tree, &ids(&["p"]), &id("A"), &id("A")),
            ReorderOutcome::Unchanged
        );
        assert_eq!(tree.sibling_ids(&ids(&["p"])), Some(ids(&["A", "B", "C", "D"])));
    }

    #[test]
    fn test_stale_target_aborts_without_mutation() {
        let mut tree = flat_tree();
        assert_eq!(
            reorder(&mut tree, &ids(&["p"]), &id("A"), &id("gone")),
            ReorderOutcome::Aborted(AbortReason::TargetMissing)
        );
        assert_eq!(
            reorder(&mut tree, &ids(&["nope"]), &id("A"), &id("B")),
            ReorderOutcome::Aborted(AbortReason::StalePath)
        );
        assert_eq!(tree.sibling_ids(&ids(&["p"])), Some(ids(&["A", "B", "C", "D"])));
    }

    #[test]
    fn test_second_drag_builds_on_latest_order() {
        let mut tree = flat_tree();
        let first = reorder(&mut tree, &ids(&["p"]), &id("A"), &id("C"));
        let second = reorder(&mut tree, &ids(&["p"]), &id("D"), &id("B"));

        assert_eq!(first.update().unwrap().ordered_ids(), ids(&["B", "C", "A", "D"]));
        assert_eq!(second.update().unwrap().ordered_ids(), ids(&["D", "B", "C", "A"]));
    }

    #[test]
    fn test_drag_session_is_scoped_to_one_level() {
        let mut tree = GlTree::from_records(vec![
            GroupingRecord::new("r1", "R1")
                .with_children(vec![GroupingRecord::new("x", "X"), GroupingRecord::new("y", "Y")]),
            GroupingRecord::new("r2", "R2"),
        ])
        .unwrap();

        let session = DragSession::begin_drag(&tree, &id("x")).unwrap();
        assert_eq!(session.path(), ids(&["r1"]).as_slice());
        assert!(session.accepts(&tree, &id("y")));
        assert!(!session.accepts(&tree, &id("r2")));

        let outcome = session.complete_drag(&mut tree, &id("r2"));
        assert_eq!(outcome, ReorderOutcome::Aborted(AbortReason::TargetMissing));
        assert_eq!(tree.parent_of(&id("x")), Some(&id("r1")));
    }
}
