use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::api::ApiResult;
use crate::model::{AccountRef, GroupingRecord};

/// On-disk shape of the JSON-file backend: the grouping tree plus the
/// account catalog the picker offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub groupings: Vec<GroupingRecord>,
    #[serde(default)]
    pub accounts: Vec<AccountRef>,
}

/// Loads a snapshot. A missing file yields an empty snapshot.
pub fn load_snapshot(path: &Path) -> ApiResult<Snapshot> {
    if !path.exists() {
        return Ok(Snapshot::default());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Snapshot::default());
    }
    Ok(serde_json::from_str(&content)?)
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> ApiResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot = load_snapshot(&dir.path().join("absent.json")).unwrap();
        assert!(snapshot.groupings.is_empty());
        assert!(snapshot.accounts.is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tree.json");
        let snapshot = Snapshot {
            groupings: vec![GroupingRecord::new("r1", "Assets")],
            accounts: vec![AccountRef::new("a1", "Cash")],
        };

        save_snapshot(&path, &snapshot).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"groupings\""));
        assert!(content.contains("\"generalLedgerType\": \"Assets\""));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_snapshot(&path).is_err());
    }
}
