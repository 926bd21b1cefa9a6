//! Commit receipts for the ledger audit trail.
//!
//! Every committed transaction produces a [`CommitReceipt`] naming the
//! operation, the keys it read and wrote, and a SHA-256 digest over the
//! exact bytes written, so the write set can be checked independently.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lineage_types::TxId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Proof that a transaction committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub tx_id: TxId,
    /// Name of the operation that ran in the transaction.
    pub operation: String,
    /// Ledger height after the commit.
    pub height: u64,
    /// Keys read from committed state, sorted.
    pub read_keys: Vec<String>,
    /// Keys written, sorted.
    pub write_keys: Vec<String>,
    /// SHA-256 over the sorted (key, value) write set.
    pub write_set_hash: [u8; 32],
    /// Taken from the UUIDv7 timestamp of `tx_id`.
    pub committed_at: DateTime<Utc>,
}

impl CommitReceipt {
    #[must_use]
    pub fn new(
        tx_id: TxId,
        operation: &str,
        height: u64,
        read_keys: Vec<String>,
        writes: &BTreeMap<String, Vec<u8>>,
    ) -> Self {
        Self {
            tx_id,
            operation: operation.to_string(),
            height,
            read_keys,
            write_keys: writes.keys().cloned().collect(),
            write_set_hash: compute_write_set_hash(writes),
            committed_at: i64::try_from(tx_id.timestamp_ms())
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .unwrap_or_else(Utc::now),
        }
    }

    #[must_use]
    pub fn write_set_hash_hex(&self) -> String {
        hex::encode(self.write_set_hash)
    }

    /// Recompute the digest over `writes` and compare.
    #[must_use]
    pub fn verify(&self, writes: &BTreeMap<String, Vec<u8>>) -> bool {
        compute_write_set_hash(writes) == self.write_set_hash
    }
}

impl std::fmt::Display for CommitReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} height={} writes=[{}] hash={}",
            self.tx_id,
            self.operation,
            self.height,
            self.write_keys.join(","),
            &self.write_set_hash_hex()[..16],
        )
    }
}

/// Deterministic digest of a write set. Keys and values are
/// length-prefixed so no two distinct write sets share an encoding.
#[must_use]
pub fn compute_write_set_hash(writes: &BTreeMap<String, Vec<u8>>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"lineage:write_set:v1:");
    hasher.update((writes.len() as u64).to_le_bytes());
    for (key, value) in writes {
        hasher.update((key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value);
    }
    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}
