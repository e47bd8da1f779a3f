//! The remote GL definition service, seen from the client.
//!
//! `GlDefinitionApi` is the seam to the real REST service. `InMemoryApi` is an
//! authoritative stand-in that enforces the same rules the server does, and
//! `JsonFileApi` writes that state back to a JSON file after each change.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::TreeError;
use crate::io::{load_snapshot, save_snapshot, Snapshot};
use crate::model::{AccountId, AccountRef, GroupingDraft, GroupingId, GroupingNode, GroupingRecord};
use crate::reorder::IndexUpdate;
use crate::tree::GlTree;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request rejected: {0}")]
    Rejected(#[from] TreeError),

    #[error("Account {0} is not in the account catalog")]
    UnknownAccount(AccountId),

    #[error("Name must not be empty")]
    EmptyName,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization/Deserialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

pub trait GlDefinitionApi {
    /// Root groupings with nested children and accounts.
    fn fetch_tree(&mut self) -> ApiResult<Vec<GroupingRecord>>;

    /// Every account that can be attached to a grouping.
    fn list_accounts(&mut self) -> ApiResult<Vec<AccountRef>>;

    fn reorder_siblings(&mut self, update: &IndexUpdate) -> ApiResult<()>;

    /// Creates a grouping under `parent` (a root for `None`) and returns it
    /// with its server-assigned id.
    fn create_grouping(
        &mut self,
        parent: Option<&GroupingId>,
        draft: &GroupingDraft,
    ) -> ApiResult<GroupingRecord>;

    fn update_grouping(&mut self, id: &GroupingId, draft: &GroupingDraft) -> ApiResult<()>;

    /// Fails for groupings that still hold children or accounts.
    fn delete_grouping(&mut self, id: &GroupingId) -> ApiResult<()>;

    fn attach_account(&mut self, grouping: &GroupingId, account: &AccountId)
        -> ApiResult<AccountRef>;

    fn detach_account(&mut self, grouping: &GroupingId, account: &AccountId) -> ApiResult<()>;
}

#[derive(Debug, Clone)]
pub struct InMemoryApi {
    tree: GlTree,
    catalog: Vec<AccountRef>,
    max_depth: usize,
}

impl InMemoryApi {
    pub fn new(max_depth: usize) -> Self {
        Self {
            tree: GlTree::new(),
            catalog: Vec::new(),
            max_depth,
        }
    }

    /// Seeds the service. Accounts already attached in `groupings` are added
    /// to the catalog if missing.
    pub fn from_snapshot(snapshot: Snapshot, max_depth: usize) -> ApiResult<Self> {
        let tree = GlTree::from_records(snapshot.groupings)?;
        let mut catalog = snapshot.accounts;
        for node in tree.iter() {
            for account in &node.accounts {
                if !catalog.iter().any(|a| a.id == account.id) {
                    catalog.push(account.clone());
                }
            }
        }
        Ok(Self {
            tree,
            catalog,
            max_depth,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            groupings: self.tree.to_records(),
            accounts: self.catalog.clone(),
        }
    }

    pub fn tree(&self) -> &GlTree {
        &self.tree
    }
}

impl GlDefinitionApi for InMemoryApi {
    fn fetch_tree(&mut self) -> ApiResult<Vec<GroupingRecord>> {
        Ok(self.tree.to_records())
    }

    fn list_accounts(&mut self) -> ApiResult<Vec<AccountRef>> {
        Ok(self.catalog.clone())
    }

    // Last write wins: the order in the request replaces whatever is stored.
    fn reorder_siblings(&mut self, update: &IndexUpdate) -> ApiResult<()> {
        let order = update.ordered_ids();
        self.tree.apply_order(update.parent.as_ref(), &order)?;
        debug!(parent = ?update.parent, count = order.len(), "stored sibling order");
        Ok(())
    }

    fn create_grouping(
        &mut self,
        parent: Option<&GroupingId>,
        draft: &GroupingDraft,
    ) -> ApiResult<GroupingRecord> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::EmptyName);
        }
        let id = GroupingId::new(Uuid::new_v4().to_string());
        let node = GroupingNode {
            description: draft.description.clone(),
            general_ledger_type: draft.general_ledger_type,
            ..GroupingNode::new(id.as_str(), draft.name.trim())
        };
        self.tree.insert_grouping(parent, node, self.max_depth)?;

        let created = self
            .tree
            .get(&id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        info!(%id, parent = ?parent, "created grouping");
        Ok(GroupingRecord {
            id: created.id.clone(),
            name: created.name.clone(),
            description: created.description.clone(),
            depth: Some(created.depth),
            children: Vec::new(),
            accounts: Vec::new(),
            general_ledger_type: created.general_ledger_type,
            entries_id: None,
        })
    }

    fn update_grouping(&mut self, id: &GroupingId, draft: &GroupingDraft) -> ApiResult<()> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::EmptyName);
        }
        let draft = GroupingDraft {
            name: draft.name.trim().to_string(),
            ..draft.clone()
        };
        self.tree.update_grouping(id, &draft)?;
        Ok(())
    }

    fn delete_grouping(&mut self, id: &GroupingId) -> ApiResult<()> {
        self.tree.remove_grouping(id)?;
        info!(%id, "deleted grouping");
        Ok(())
    }

    fn attach_account(
        &mut self,
        grouping: &GroupingId,
        account: &AccountId,
    ) -> ApiResult<AccountRef> {
        let account_ref = self
            .catalog
            .iter()
            .find(|a| &a.id == account)
            .cloned()
            .ok_or_else(|| ApiError::UnknownAccount(account.clone()))?;
        self.tree.attach_account(grouping, account_ref.clone())?;
        Ok(account_ref)
    }

    fn detach_account(&mut self, grouping: &GroupingId, account: &AccountId) -> ApiResult<()> {
        self.tree.detach_account(grouping, account)?;
        Ok(())
    }
}

/// `InMemoryApi` persisted to a JSON file after every successful mutation.
#[derive(Debug, Clone)]
pub struct JsonFileApi {
    inner: InMemoryApi,
    path: PathBuf,
}

impl JsonFileApi {
    pub fn open(path: &Path, max_depth: usize) -> ApiResult<Self> {
        let snapshot = load_snapshot(path)?;
        info!(path = %path.display(), groupings = snapshot.groupings.len(), "opened data file");
        Ok(Self {
            inner: InMemoryApi::from_snapshot(snapshot, max_depth)?,
            path: path.to_path_buf(),
        })
    }

    /// Applies `change` to a staged copy and keeps it only once the file
    /// has been written, so a failed save leaves the service untouched.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut InMemoryApi) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let mut staged = self.inner.clone();
        let value = change(&mut staged)?;
        save_snapshot(&self.path, &staged.snapshot())?;
        self.inner = staged;
        Ok(value)
    }
}

impl GlDefinitionApi for JsonFileApi {
    fn fetch_tree(&mut self) -> ApiResult<Vec<GroupingRecord>> {
        self.inner.fetch_tree()
    }

    fn list_accounts(&mut self) -> ApiResult<Vec<AccountRef>> {
        self.inner.list_accounts()
    }

    fn reorder_siblings(&mut self, update: &IndexUpdate) -> ApiResult<()> {
        self.commit(|api| api.reorder_siblings(update))
    }

    fn create_grouping(
        &mut self,
        parent: Option<&GroupingId>,
        draft: &GroupingDraft,
    ) -> ApiResult<GroupingRecord> {
        self.commit(|api| api.create_grouping(parent, draft))
    }

    fn update_grouping(&mut self, id: &GroupingId, draft: &GroupingDraft) -> ApiResult<()> {
        self.commit(|api| api.update_grouping(id, draft))
    }

    fn delete_grouping(&mut self, id: &GroupingId) -> ApiResult<()> {
        self.commit(|api| api.delete_grouping(id))
    }

    fn attach_account(
        &mut self,
        grouping: &GroupingId,
        account: &AccountId,
    ) -> ApiResult<AccountRef> {
        self.commit(|api| api.attach_account(grouping, account))
    }

    fn detach_account(&mut self, grouping: &GroupingId, account: &AccountId) -> ApiResult<()> {
        self.commit(|api| api.detach_account(grouping, account))
    }
}
