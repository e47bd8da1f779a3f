use anyhow::Result;
use tracing::warn;

use crate::app::{AppMode, AppState, ConfirmTarget};
use crate::model::GroupingId;
use crate::outbox::Mutation;

use super::sync::queue;

pub fn close_dialog(app: &mut AppState) {
    app.mode = AppMode::Normal;
}

pub fn confirm_yes(app: &mut AppState) {
    let AppMode::Confirm(target) = &app.mode else {
        return;
    };
    let mutation = match target.clone() {
        ConfirmTarget::Grouping(id) => {
            // The gate may have changed while the prompt was open.
            if !app.tree.can_delete(&id) || app.is_delete_pending(&id) {
                app.set_message("Remove: grouping is no longer empty");
                app.mode = AppMode::Normal;
                return;
            }
            Mutation::Delete { id }
        }
        ConfirmTarget::Account { grouping, account } => Mutation::Detach { grouping, account },
    };
    queue(app, mutation);
    app.mode = AppMode::Normal;
}

/// Fetches the account catalog and offers the accounts not attached anywhere.
pub fn open_account_picker(app: &mut AppState, grouping: &GroupingId) -> Result<()> {
    let catalog = match app.api.list_accounts() {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!(%err, "failed to load account catalog");
            app.set_message(format!("Could not load accounts: {}", err));
            app.mode = AppMode::Normal;
            return Ok(());
        }
    };
    let accounts: Vec<_> = catalog
        .into_iter()
        .filter(|account| app.tree.account_owner(&account.id).is_none())
        .collect();

    if accounts.is_empty() {
        app.set_message("No unattached accounts available");
        app.mode = AppMode::Normal;
        return Ok(());
    }
    app.mode = AppMode::AccountPicker {
        grouping: grouping.clone(),
        accounts,
        selected: 0,
    };
    Ok(())
}

pub fn picker_up(app: &mut AppState) {
    if let AppMode::AccountPicker { selected, .. } = &mut app.mode {
        *selected = selected.saturating_sub(1);
    }
}

pub fn picker_down(app: &mut AppState) {
    if let AppMode::AccountPicker {
        selected, accounts, ..
    } = &mut app.mode
    {
        if *selected + 1 < accounts.len() {
            *selected += 1;
        }
    }
}

pub fn picker_select(app: &mut AppState) {
    let AppMode::AccountPicker {
        grouping,
        accounts,
        selected,
    } = &app.mode
    else {
        return;
    };
    let Some(account) = accounts.get(*selected) else {
        return;
    };
    let mutation = Mutation::Attach {
        grouping: grouping.clone(),
        account: account.id.clone(),
    };
    queue(app, mutation);
    app.mode = AppMode::Normal;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{create_test_app, id};
    use crate::model::AccountId;

    #[test]
    fn test_picker_offers_only_unattached_accounts() {
        let mut app = create_test_app();
        open_account_picker(&mut app, &id("r2")).unwrap();
        let AppMode::AccountPicker { accounts, .. } = &app.mode else {
            panic!("picker should be open");
        };
        let ids: Vec<_> = accounts.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec![AccountId::from("a2")]);

        picker_down(&mut app);
        picker_select(&mut app);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(
            app.outbox.iter().next(),
            Some(&Mutation::Attach {
                grouping: id("r2"),
                account: AccountId::from("a2"),
            })
        );
    }

    #[test]
    fn test_confirm_rechecks_the_delete_gate() {
        let mut app = create_test_app();
        app.mode = AppMode::Confirm(ConfirmTarget::Grouping(id("c2")));
        confirm_yes(&mut app);
        assert!(app.outbox.is_empty());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_confirm_queues_delete() {
        let mut app = create_test_app();
        app.mode = AppMode::Confirm(ConfirmTarget::Grouping(id("r2")));
        confirm_yes(&mut app);
        assert!(app.is_delete_pending(&id("r2")));
    }
}
