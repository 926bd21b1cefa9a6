//! Versioned in-memory ledger with optimistic transactions.
//!
//! Every key carries the ledger height at which it was last written.
//! A [`Transaction`] remembers the version of every committed key it
//! reads; [`Transaction::commit`] re-checks those versions under the
//! write lock and applies all buffered writes only if none changed.
//! Concurrent operations on overlapping keys therefore serialize: the
//! later committer aborts with [`StoreError::Conflict`] and may be re-run
//! from a clean read.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lineage_types::TxId;

use crate::error::{StoreError, StoreResult};
use crate::receipt::CommitReceipt;
use crate::snapshot::{LedgerSnapshot, SnapshotEntry};
use crate::traits::RecordStore;

/// A committed value and the ledger height that wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub version: u64,
    pub value: Vec<u8>,
}

#[derive(Debug, Default)]
struct LedgerState {
    entries: HashMap<String, VersionedValue>,
    /// Number of committed write transactions.
    height: u64,
}

/// Shared, versioned key-value state.
///
/// Reads and commits are safe from many threads; wrap in an `Arc` to share.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    /// Create an empty ledger at height 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("ledger lock poisoned".into()))
    }

    /// Open a transaction against the current committed state.
    #[must_use]
    pub fn begin(&self) -> Transaction<'_> {
        Transaction {
            ledger: self,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Committed value and version under `key`, outside any transaction.
    pub fn get_committed(&self, key: &str) -> StoreResult<Option<VersionedValue>> {
        Ok(self.read_state()?.entries.get(key).cloned())
    }

    /// Committed version of `key`, if present.
    pub fn version(&self, key: &str) -> StoreResult<Option<u64>> {
        Ok(self.read_state()?.entries.get(key).map(|v| v.version))
    }

    /// Number of committed write transactions.
    pub fn height(&self) -> StoreResult<u64> {
        Ok(self.read_state()?.height)
    }

    /// Sorted list of all committed keys.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let state = self.read_state()?;
        let mut keys: Vec<String> = state.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.entries.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_state()?.entries.is_empty())
    }

    /// Capture the committed state for persistence.
    pub fn snapshot(&self) -> StoreResult<LedgerSnapshot> {
        let state = self.read_state()?;
        let entries = state
            .entries
            .iter()
            .map(|(key, v)| {
                (
                    key.clone(),
                    SnapshotEntry {
                        version: v.version,
                        value: hex::encode(&v.value),
                    },
                )
            })
            .collect();
        Ok(LedgerSnapshot {
            height: state.height,
            entries,
        })
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// # Errors
    /// Returns [`StoreError::Snapshot`] if a value is not valid hex or a
    /// version is above the snapshot height.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> StoreResult<Self> {
        let mut entries = HashMap::with_capacity(snapshot.entries.len());
        for (key, entry) in snapshot.entries {
            if entry.version > snapshot.height {
                return Err(StoreError::Snapshot(format!(
                    "key {key} has version {} above height {}",
                    entry.version, snapshot.height
                )));
            }
            let value = hex::decode(&entry.value)
                .map_err(|e| StoreError::Snapshot(format!("key {key}: {e}")))?;
            entries.insert(
                key,
                VersionedValue {
                    version: entry.version,
                    value,
                },
            );
        }
        Ok(Self {
            state: RwLock::new(LedgerState {
                entries,
                height: snapshot.height,
            }),
        })
    }
}

/// One atomic, isolated unit of work against a [`MemoryLedger`].
///
/// Reads see this transaction's own writes first, then committed state.
/// Nothing is visible to other transactions until [`commit`](Self::commit)
/// succeeds; dropping the transaction discards its writes.
#[derive(Debug)]
pub struct Transaction<'a> {
    ledger: &'a MemoryLedger,
    /// Committed version observed per key (`None` = key was absent).
    reads: BTreeMap<String, Option<u64>>,
    /// Buffered writes, applied together at commit.
    writes: BTreeMap<String, Vec<u8>>,
}

impl Transaction<'_> {
    /// Keys read from committed state, in sorted order.
    #[must_use]
    pub fn read_keys(&self) -> Vec<String> {
        self.reads.keys().cloned().collect()
    }

    /// Keys written by this transaction, in sorted order.
    #[must_use]
    pub fn write_keys(&self) -> Vec<String> {
        self.writes.keys().cloned().collect()
    }

    /// Check that every key this transaction read is still at the version
    /// it observed. Writes are left buffered.
    ///
    /// A failure computed from a stale read set is not a real outcome; the
    /// operation must be re-run.
    ///
    /// # Errors
    /// Returns [`StoreError::Conflict`] naming the first changed key.
    pub fn validate(&self) -> StoreResult<()> {
        let state = self.ledger.read_state()?;
        self.check_reads(&state)
    }

    fn check_reads(&self, state: &LedgerState) -> StoreResult<()> {
        for (key, observed) in &self.reads {
            let current = state.entries.get(key).map(|v| v.version);
            if current != *observed {
                return Err(StoreError::Conflict {
                    key: key.clone(),
                    observed: *observed,
                    current,
                });
            }
        }
        Ok(())
    }

    /// Validate the read set and apply every buffered write.
    ///
    /// A transaction with no writes commits without advancing the height.
    ///
    /// # Errors
    /// Returns [`StoreError::Conflict`] if any key read by this
    /// transaction has been committed since; nothing is applied.
    pub fn commit(self, operation: &str) -> StoreResult<CommitReceipt> {
        let ledger = self.ledger;
        let mut state = ledger.write_state()?;

        if let Err(err) = self.check_reads(&state) {
            tracing::warn!(operation, error = %err, "Transaction aborted on read conflict");
            return Err(err);
        }

        if !self.writes.is_empty() {
            state.height += 1;
        }
        let height = state.height;
        let receipt = CommitReceipt::new(
            TxId::new(),
            operation,
            height,
            self.read_keys(),
            &self.writes,
        );

        for (key, value) in self.writes {
            state.entries.insert(
                key,
                VersionedValue {
                    version: height,
                    value,
                },
            );
        }

        tracing::debug!(
            tx = %receipt.tx_id,
            operation,
            height,
            writes = receipt.write_keys.len(),
            "Transaction committed"
        );
        Ok(receipt)
    }

    /// Discard all buffered writes.
    pub fn rollback(self) {
        tracing::debug!(writes = self.writes.len(), "Transaction rolled back");
    }
}

impl RecordStore for Transaction<'_> {
    fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }
        let committed = self.ledger.get_committed(key)?;
        // Keep the first observation: a later read must not mask a conflict.
        self.reads
            .entry(key.to_string())
            .or_insert_with(|| committed.as_ref().map(|v| v.version));
        Ok(committed.map(|v| v.value))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }
}
