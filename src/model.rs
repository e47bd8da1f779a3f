use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, server-assigned identifier of a grouping node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupingId(pub String);

impl GroupingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Classification tag of a grouping. Display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneralLedgerType {
    #[default]
    Assets,
    Liabilities,
    Equity,
    Income,
    Expenses,
}

impl GeneralLedgerType {
    pub const ALL: [GeneralLedgerType; 5] = [
        GeneralLedgerType::Assets,
        GeneralLedgerType::Liabilities,
        GeneralLedgerType::Equity,
        GeneralLedgerType::Income,
        GeneralLedgerType::Expenses,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GeneralLedgerType::Assets => "Assets",
            GeneralLedgerType::Liabilities => "Liabilities",
            GeneralLedgerType::Equity => "Equity",
            GeneralLedgerType::Income => "Income",
            GeneralLedgerType::Expenses => "Expenses",
        }
    }

    /// Next type in declaration order, wrapping around. Used by the form.
    pub fn cycle(self) -> Self {
        let pos = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

/// A leaf account attached to one grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: AccountId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl AccountRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(id),
            name: name.into(),
            icon: None,
        }
    }
}

/// Payload stored in each arena slot. Children live in the arena itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingNode {
    pub id: GroupingId,
    pub name: String,
    pub description: Option<String>,
    pub depth: usize,
    pub accounts: Vec<AccountRef>,
    pub general_ledger_type: GeneralLedgerType,
    pub entries_id: Option<GroupingId>,
}

impl GroupingNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: GroupingId::new(id),
            name: name.into(),
            description: None,
            depth: 0,
            accounts: Vec::new(),
            general_ledger_type: GeneralLedgerType::default(),
            entries_id: None,
        }
    }
}

/// Nested wire shape of a grouping as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingRecord {
    pub id: GroupingId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub depth: Option<usize>,
    #[serde(default)]
    pub children: Vec<GroupingRecord>,
    #[serde(default)]
    pub accounts: Vec<AccountRef>,
    #[serde(default)]
    pub general_ledger_type: GeneralLedgerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries_id: Option<GroupingId>,
}

impl GroupingRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: GroupingId::new(id),
            name: name.into(),
            description: None,
            depth: None,
            children: Vec::new(),
            accounts: Vec::new(),
            general_ledger_type: GeneralLedgerType::default(),
            entries_id: None,
        }
    }

    pub fn with_children(mut self, children: Vec<GroupingRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<AccountRef>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_entries_id(mut self, entries_id: impl Into<String>) -> Self {
        self.entries_id = Some(GroupingId::new(entries_id));
        self
    }
}

/// Editable fields of a grouping, used by create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub general_ledger_type: GeneralLedgerType,
}

impl GroupingDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_camel_case_keys() {
        let json = r#"{
            "id": "r1",
            "name": "Assets",
            "generalLedgerType": "Assets",
            "entriesId": "e1",
            "children": [{ "id": "c1", "name": "Cash" }]
        }"#;
        let record: GroupingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, GroupingId::from("r1"));
        assert_eq!(record.entries_id, Some(GroupingId::from("e1")));
        assert_eq!(record.children.len(), 1);
        assert!(record.children[0].accounts.is_empty());
        assert_eq!(record.children[0].general_ledger_type, GeneralLedgerType::Assets);
    }

    #[test]
    fn test_gl_type_cycle_wraps() {
        assert_eq!(GeneralLedgerType::Assets.cycle(), GeneralLedgerType::Liabilities);
        assert_eq!(GeneralLedgerType::Expenses.cycle(), GeneralLedgerType::Assets);
    }
}
