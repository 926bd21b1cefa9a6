//! # lineage-store
//!
//! The record store the auction engine runs against, and the host ledger
//! that gives each operation atomic, isolated execution.
//!
//! ## Layers
//!
//! - [`RecordStore`]: the untyped `get` / `put` contract the engine
//!   consumes. No caching, no transactions of its own.
//! - [`RecordAdapter`]: typed loads and saves over any `RecordStore`,
//!   using the [`Record`](lineage_types::Record) codec.
//! - [`MemoryLedger`]: versioned key-value state. [`MemoryLedger::begin`]
//!   opens a [`Transaction`] that buffers writes and validates its read
//!   set at commit (optimistic concurrency, conflict-abort).
//! - [`CommitReceipt`]: proof of what a committed transaction wrote.
//! - [`LedgerSnapshot`]: JSON persistence of the whole ledger.
//!
//! ## Transaction Flow
//!
//! ```text
//! begin() → get/put (buffered) → commit(): validate read versions
//!     → apply all writes at height+1 → CommitReceipt
//! ```
//!
//! A transaction that is dropped, or whose commit fails, leaves the
//! ledger untouched.

pub mod adapter;
pub mod error;
pub mod memory;
pub mod receipt;
pub mod snapshot;
pub mod traits;

pub use adapter::RecordAdapter;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryLedger, Transaction, VersionedValue};
pub use receipt::CommitReceipt;
pub use snapshot::{LedgerSnapshot, SnapshotEntry};
pub use traits::RecordStore;
