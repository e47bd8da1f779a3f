use std::collections::{HashMap, VecDeque};

use crate::model::{AccountId, GroupingDraft, GroupingId};
use crate::reorder::IndexUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Reorder,
    Create,
    Update,
    Delete,
    Attach,
    Detach,
}

/// A request to the remote service, queued in the order the user made it.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Reorder(IndexUpdate),
    Create {
        parent: Option<GroupingId>,
        draft: GroupingDraft,
    },
    Update {
        id: GroupingId,
        draft: GroupingDraft,
    },
    Delete {
        id: GroupingId,
    },
    Attach {
        grouping: GroupingId,
        account: AccountId,
    },
    Detach {
        grouping: GroupingId,
        account: AccountId,
    },
}

impl Mutation {
    pub fn kind(&self) -> OpKind {
        match self {
            Mutation::Reorder(_) => OpKind::Reorder,
            Mutation::Create { .. } => OpKind::Create,
            Mutation::Update { .. } => OpKind::Update,
            Mutation::Delete { .. } => OpKind::Delete,
            Mutation::Attach { .. } => OpKind::Attach,
            Mutation::Detach { .. } => OpKind::Detach,
        }
    }

    /// Grouping whose controls are disabled while this request is pending.
    /// Reorders and creates key on the parent of the affected list.
    pub fn subject(&self) -> Option<&GroupingId> {
        match self {
            Mutation::Reorder(update) => update.parent.as_ref(),
            Mutation::Create { parent, .. } => parent.as_ref(),
            Mutation::Update { id, .. } | Mutation::Delete { id } => Some(id),
            Mutation::Attach { grouping, .. } | Mutation::Detach { grouping, .. } => Some(grouping),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self.kind() {
            OpKind::Reorder => "reorder",
            OpKind::Create => "create",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
            OpKind::Attach => "attach account",
            OpKind::Detach => "detach account",
        }
    }
}

type PendingKey = (OpKind, Option<GroupingId>);

/// FIFO queue of unsent mutations with per-operation pending flags.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<Mutation>,
    pending: HashMap<PendingKey, usize>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: Mutation) {
        *self.pending.entry(key_of(&mutation)).or_insert(0) += 1;
        self.queue.push_back(mutation);
    }

    /// Next mutation to send. Its pending flag stays set until `complete`.
    pub fn pop_front(&mut self) -> Option<Mutation> {
        self.queue.pop_front()
    }

    /// Clears the pending flag of a resolved mutation, whatever the outcome.
    pub fn complete(&mut self, mutation: &Mutation) {
        let key = key_of(mutation);
        if let Some(count) = self.pending.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&key);
            }
        }
    }

    pub fn is_pending(&self, kind: OpKind, subject: Option<&GroupingId>) -> bool {
        self.pending.contains_key(&(kind, subject.cloned()))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mutation> {
        self.queue.iter()
    }
}

fn key_of(mutation: &Mutation) -> PendingKey {
    (mutation.kind(), mutation.subject().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete(id: &str) -> Mutation {
        Mutation::Delete {
            id: GroupingId::from(id),
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut outbox = Outbox::new();
        outbox.push(delete("a"));
        outbox.push(delete("b"));
        assert_eq!(outbox.len(), 2);
        assert_eq!(outbox.pop_front(), Some(delete("a")));
        assert_eq!(outbox.pop_front(), Some(delete("b")));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_pending_flag_cleared_on_complete() {
        let mut outbox = Outbox::new();
        let id = GroupingId::from("a");
        outbox.push(delete("a"));
        assert!(outbox.is_pending(OpKind::Delete, Some(&id)));
        assert!(!outbox.is_pending(OpKind::Update, Some(&id)));

        let mutation = outbox.pop_front().unwrap();
        assert!(outbox.is_pending(OpKind::Delete, Some(&id)));
        outbox.complete(&mutation);
        assert!(!outbox.is_pending(OpKind::Delete, Some(&id)));
    }

    #[test]
    fn test_pending_counts_repeated_requests() {
        let mut outbox = Outbox::new();
        let update = IndexUpdate::from_order(None, vec![GroupingId::from("x")]);
        outbox.push(Mutation::Reorder(update.clone()));
        outbox.push(Mutation::Reorder(update));

        let first = outbox.pop_front().unwrap();
        outbox.complete(&first);
        assert!(outbox.is_pending(OpKind::Reorder, None));
        let second = outbox.pop_front().unwrap();
        outbox.complete(&second);
        assert!(!outbox.is_pending(OpKind::Reorder, None));
    }
}
