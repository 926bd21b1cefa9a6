//! JSON persistence of a [`MemoryLedger`](crate::MemoryLedger).
//!
//! Values are opaque bytes, so they are stored hex-encoded.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// One committed key in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub version: u64,
    /// Hex-encoded value bytes.
    pub value: String,
}

/// Full committed state of a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub height: u64,
    pub entries: BTreeMap<String, SnapshotEntry>,
}

impl LedgerSnapshot {
    /// Read a snapshot file. A missing file yields an empty snapshot.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] on read failure and
    /// [`StoreError::Snapshot`] if the file is not a snapshot document.
    pub fn load_or_default(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| StoreError::Snapshot(e.to_string()))
    }

    /// Write the snapshot, replacing the file atomically via a sibling
    /// temporary file.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] on write failure.
    pub fn save(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(self).map_err(|e| StoreError::Snapshot(e.to_string()))?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryLedger, RecordStore};

    #[test]
    fn missing_file_is_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = LedgerSnapshot::load_or_default(dir.path().join("none.json")).unwrap();
        assert_eq!(snapshot, LedgerSnapshot::default());
    }

    #[test]
    fn save_then_load() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin();
        tx.put("ABCD", br#"{"reservePrice":3500}"#.to_vec()).unwrap();
        tx.commit("seed").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        ledger.snapshot().unwrap().save(&path).unwrap();

        let loaded = LedgerSnapshot::load_or_default(&path).unwrap();
        assert_eq!(loaded, ledger.snapshot().unwrap());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn garbage_file_is_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            LedgerSnapshot::load_or_default(&path),
            Err(StoreError::Snapshot(_))
        ));
    }
}
