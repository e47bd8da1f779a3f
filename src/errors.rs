use thiserror::Error;

use crate::model::{AccountId, GroupingId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Grouping with ID {0} not found")]
    NodeNotFound(GroupingId),

    #[error("Duplicate grouping ID {0}")]
    DuplicateId(GroupingId),

    #[error("Cannot add a child under {id}: depth {depth} reached the limit of {max_depth}")]
    DepthExceeded {
        id: GroupingId,
        depth: usize,
        max_depth: usize,
    },

    #[error("Cannot remove {0}: it still has child groupings or accounts")]
    HasDescendants(GroupingId),

    #[error("Account {account} is already attached to {grouping}")]
    AccountAlreadyAttached {
        account: AccountId,
        grouping: GroupingId,
    },

    #[error("Account {account} is not attached to {grouping}")]
    AccountNotAttached {
        account: AccountId,
        grouping: GroupingId,
    },

    #[error("Order for sibling list does not match its current members")]
    OrderMismatch,
}

pub type TreeResult<T> = Result<T, TreeError>;
