#![allow(dead_code)]

use gldef_rs::api::{ApiError, ApiResult, GlDefinitionApi, InMemoryApi};
use gldef_rs::app::AppState;
use gldef_rs::config::AppConfig;
use gldef_rs::io::Snapshot;
use gldef_rs::model::{
    AccountId, AccountRef, GroupingDraft, GroupingId, GroupingRecord,
};
use gldef_rs::reorder::IndexUpdate;
use std::cell::Cell;
use std::rc::Rc;

pub fn id(s: &str) -> GroupingId {
    GroupingId::from(s)
}

/// Root groupings `A`..`D`, all leaves.
pub fn flat_snapshot() -> Snapshot {
    Snapshot {
        groupings: ["A", "B", "C", "D"]
            .iter()
            .map(|name| GroupingRecord::new(*name, *name))
            .collect(),
        accounts: Vec::new(),
    }
}

/// `r1 -> c1 -> a1`, the smallest chart with an attached account.
pub fn account_snapshot() -> Snapshot {
    Snapshot {
        groupings: vec![GroupingRecord::new("r1", "Root").with_children(vec![
            GroupingRecord::new("c1", "Child").with_accounts(vec![AccountRef::new("a1", "Cash")]),
        ])],
        accounts: Vec::new(),
    }
}

pub fn create_app(snapshot: Snapshot, max_depth: usize) -> AppState {
    let api = InMemoryApi::from_snapshot(snapshot, max_depth).unwrap();
    create_app_with_api(Box::new(api), max_depth)
}

pub fn create_app_with_api(api: Box<dyn GlDefinitionApi>, max_depth: usize) -> AppState {
    let config = AppConfig {
        max_depth,
        ..AppConfig::default()
    };
    let mut app = AppState::new(config, api);
    app.refresh().unwrap();
    app
}

/// Root ids in display order.
pub fn root_ids(app: &AppState) -> Vec<GroupingId> {
    app.tree.sibling_ids(&[]).unwrap()
}

/// Wraps `InMemoryApi` and fails every mutation while the shared flag is set.
/// `fail_next` fails only that many upcoming mutations; `failing_fetches`
/// breaks `fetch_tree` as well.
pub struct FlakyApi {
    inner: InMemoryApi,
    failing: Rc<Cell<bool>>,
    fail_next: Rc<Cell<usize>>,
    failing_fetches: Rc<Cell<bool>>,
}

impl FlakyApi {
    pub fn new(snapshot: Snapshot, max_depth: usize) -> (Self, Rc<Cell<bool>>) {
        let failing = Rc::new(Cell::new(false));
        let api = Self {
            inner: InMemoryApi::from_snapshot(snapshot, max_depth).unwrap(),
            failing: Rc::clone(&failing),
            fail_next: Rc::new(Cell::new(0)),
            failing_fetches: Rc::new(Cell::new(false)),
        };
        (api, failing)
    }

    pub fn fail_next(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.fail_next)
    }

    pub fn failing_fetches(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.failing_fetches)
    }

    fn check(&self) -> ApiResult<()> {
        let budget = self.fail_next.get();
        if budget > 0 {
            self.fail_next.set(budget - 1);
            return Err(ApiError::Unavailable("connection reset".to_string()));
        }
        if self.failing.get() {
            Err(ApiError::Unavailable("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

impl GlDefinitionApi for FlakyApi {
    fn fetch_tree(&mut self) -> ApiResult<Vec<GroupingRecord>> {
        if self.failing_fetches.get() {
            return Err(ApiError::Unavailable("connection reset".to_string()));
        }
        self.inner.fetch_tree()
    }

    fn list_accounts(&mut self) -> ApiResult<Vec<AccountRef>> {
        self.inner.list_accounts()
    }

    fn reorder_siblings(&mut self, update: &IndexUpdate) -> ApiResult<()> {
        self.check()?;
        self.inner.reorder_siblings(update)
    }

    fn create_grouping(
        &mut self,
        parent: Option<&GroupingId>,
        draft: &GroupingDraft,
    ) -> ApiResult<GroupingRecord> {
        self.check()?;
        self.inner.create_grouping(parent, draft)
    }

    fn update_grouping(&mut self, id: &GroupingId, draft: &GroupingDraft) -> ApiResult<()> {
        self.check()?;
        self.inner.update_grouping(id, draft)
    }

    fn delete_grouping(&mut self, id: &GroupingId) -> ApiResult<()> {
        self.check()?;
        self.inner.delete_grouping(id)
    }

    fn attach_account(
        &mut self,
        grouping: &GroupingId,
        account: &AccountId,
    ) -> ApiResult<AccountRef> {
        self.check()?;
        self.inner.attach_account(grouping, account)
    }

    fn detach_account(&mut self, grouping: &GroupingId, account: &AccountId) -> ApiResult<()> {
        self.check()?;
        self.inner.detach_account(grouping, account)
    }
}
