use anyhow::Result;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::model::GroupingNode;
use crate::outbox::Mutation;

/// Queues a request. It is sent by the next `dispatch_pending`.
pub fn queue(app: &mut AppState, mutation: Mutation) {
    debug!(op = mutation.describe(), subject = ?mutation.subject(), "queued request");
    app.outbox.push(mutation);
}

/// Sends every queued request in order, reconciling the local tree with each
/// result. Failures are reported on the status line and never abort the loop.
/// A failed reorder triggers one refetch after the queue is drained.
pub fn dispatch_pending(app: &mut AppState) {
    let mut needs_resync = false;
    while let Some(mutation) = app.outbox.pop_front() {
        let result = send(app, &mutation);
        app.outbox.complete(&mutation);
        if let Err(err) = result {
            warn!(op = mutation.describe(), %err, "request failed");
            app.set_message(format!("Could not {}: {}", mutation.describe(), err));
            needs_resync |= matches!(mutation, Mutation::Reorder(_));
        }
    }
    if needs_resync {
        app.resync();
    }
}

fn send(app: &mut AppState, mutation: &Mutation) -> Result<()> {
    match mutation {
        Mutation::Reorder(update) => {
            app.api.reorder_siblings(update)?;
        }
        Mutation::Create { parent, draft } => {
            let record = app.api.create_grouping(parent.as_ref(), draft)?;
            let node = GroupingNode {
                description: record.description.clone(),
                general_ledger_type: record.general_ledger_type,
                ..GroupingNode::new(record.id.as_str(), record.name.as_str())
            };
            if let Err(err) = app.tree.insert_grouping(parent.as_ref(), node, app.config.max_depth) {
                warn!(%err, "created grouping does not fit the local tree, refetching");
                app.resync();
            }
            if let Some(parent) = parent {
                app.expansion.toggle_node(parent, true);
            }
            app.reveal(&record.id);
            info!(id = %record.id, "grouping created");
            app.set_message(format!("Created {}", record.name));
        }
        Mutation::Update { id, draft } => {
            app.api.update_grouping(id, draft)?;
            app.tree.update_grouping(id, draft)?;
            app.set_message(format!("Saved {}", draft.name));
        }
        Mutation::Delete { id } => {
            app.api.delete_grouping(id)?;
            if let Err(err) = app.tree.remove_grouping(id) {
                warn!(%err, "local tree disagrees with delete, refetching");
                app.resync();
            }
            app.expansion.forget(id);
            app.clamp_cursor();
            app.set_message("Grouping removed");
        }
        Mutation::Attach { grouping, account } => {
            let attached = app.api.attach_account(grouping, account)?;
            app.set_message(format!("Attached {}", attached.name));
            app.tree.attach_account(grouping, attached)?;
            app.expansion.toggle_node(grouping, true);
        }
        Mutation::Detach { grouping, account } => {
            app.api.detach_account(grouping, account)?;
            app.tree.detach_account(grouping, account)?;
            app.clamp_cursor();
            app.set_message("Account detached");
        }
    }
    Ok(())
}

/// Discards local state in favour of a fresh fetch.
pub fn refresh(app: &mut AppState) {
    match app.refresh() {
        Ok(()) => app.set_message(format!("Loaded {} groupings", app.tree.len())),
        Err(err) => {
            warn!(%err, "refresh failed");
            app.set_message(format!("Could not load groupings: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{create_test_app, id};
    use crate::model::{AccountId, GroupingDraft};
    use crate::outbox::OpKind;

    #[test]
    fn test_create_reveals_new_grouping() {
        let mut app = create_test_app();
        queue(
            &mut app,
            Mutation::Create {
                parent: Some(id("c2")),
                draft: GroupingDraft::named("Land"),
            },
        );
        assert!(app.outbox.is_pending(OpKind::Create, Some(&id("c2"))));
        dispatch_pending(&mut app);

        assert!(!app.outbox.is_pending(OpKind::Create, Some(&id("c2"))));
        let new_id = app.tree.children_of(Some(&id("c2")))[1].id.clone();
        assert_eq!(app.tree.depth(&new_id), Some(2));
        assert!(app.expansion.is_expanded(&id("r1")));
        assert!(app.expansion.is_expanded(&id("c2")));
        assert_eq!(app.expansion.target_node_id(), Some(&new_id));
    }

    #[test]
    fn test_failed_delete_reports_and_clears_pending() {
        let mut app = create_test_app();
        // Bypass the client gate to hit the server-side check.
        queue(&mut app, Mutation::Delete { id: id("c2") });
        dispatch_pending(&mut app);

        assert!(!app.is_delete_pending(&id("c2")));
        assert!(app.tree.contains(&id("c2")));
        assert!(app.message.as_deref().unwrap().starts_with("Could not delete"));
    }

    #[test]
    fn test_detach_then_remove() {
        let mut app = create_test_app();
        queue(
            &mut app,
            Mutation::Detach {
                grouping: id("c1"),
                account: AccountId::from("a1"),
            },
        );
        dispatch_pending(&mut app);
        assert!(app.tree.can_delete(&id("c1")));

        queue(&mut app, Mutation::Delete { id: id("c1") });
        dispatch_pending(&mut app);
        assert!(!app.tree.contains(&id("c1")));
    }
}
