//! Host runtime: runs each invocation in its own ledger transaction.
//!
//! An invocation either commits every write its operation made or none of
//! them. Transactions that lose a read-set race at commit are re-run from
//! scratch against fresh state, up to `max_conflict_retries` times; any
//! other error is returned to the caller as-is.

use std::path::Path;

use lineage_store::{CommitReceipt, LedgerSnapshot, MemoryLedger, Transaction};
use lineage_types::{AuctionConfig, Result};
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::operation::Operation;

/// A committed invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub operation: Operation,
    /// Bytes returned by the operation (`query` only).
    pub payload: Option<Vec<u8>>,
    pub receipt: CommitReceipt,
    /// Number of times the operation ran, including the committed run.
    pub attempts: u32,
}

/// Ledger, dispatch table, and configuration for one engine instance.
#[derive(Debug)]
pub struct AuctionRuntime {
    ledger: MemoryLedger,
    dispatcher: Dispatcher,
    config: AuctionConfig,
}

impl AuctionRuntime {
    /// Runtime over an empty ledger.
    pub fn new(config: AuctionConfig) -> Result<Self> {
        Self::with_ledger(MemoryLedger::new(), config)
    }

    pub fn with_ledger(ledger: MemoryLedger, config: AuctionConfig) -> Result<Self> {
        Ok(Self {
            ledger,
            dispatcher: Dispatcher::new()?,
            config,
        })
    }

    /// Runtime over the snapshot at `path`; a missing file gives an empty
    /// ledger.
    pub fn open(path: impl AsRef<Path>, config: AuctionConfig) -> Result<Self> {
        let snapshot = LedgerSnapshot::load_or_default(path)?;
        Self::with_ledger(MemoryLedger::from_snapshot(snapshot)?, config)
    }

    /// Write the committed ledger state to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.ledger.snapshot()?.save(path)?;
        Ok(())
    }

    #[must_use]
    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }

    #[must_use]
    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run operation `name` with `args` and commit its writes.
    ///
    /// # Errors
    /// Returns the operation's error, or [`AuctionError::TxConflict`] once
    /// retries are exhausted. On error nothing is committed.
    ///
    /// [`AuctionError::TxConflict`]: lineage_types::AuctionError::TxConflict
    pub fn invoke(&self, name: &str, args: &[String]) -> Result<Invocation> {
        let operation = self.dispatcher.resolve(name)?;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.attempt(operation, args) {
                Ok((payload, receipt)) => {
                    if !operation.is_read_only() {
                        info!(
                            %operation,
                            tx = %receipt.tx_id,
                            height = receipt.height,
                            attempts,
                            "Invocation committed"
                        );
                    }
                    return Ok(Invocation {
                        operation,
                        payload,
                        receipt,
                        attempts,
                    });
                }
                Err(err) if err.is_retryable() && attempts <= self.config.max_conflict_retries => {
                    warn!(%operation, attempts, error = %err, "Retrying after conflict");
                }
                Err(err) => {
                    warn!(%operation, kind = %err.kind(), error = %err, "Invocation failed");
                    return Err(err);
                }
            }
        }
    }

    /// One transactional run.
    fn attempt(
        &self,
        operation: Operation,
        args: &[String],
    ) -> Result<(Option<Vec<u8>>, CommitReceipt)> {
        let mut tx = self.ledger.begin();
        let outcome = self
            .dispatcher
            .dispatch(operation, &mut tx, &self.config, args);
        finish(tx, operation, outcome)
    }
}

/// Commit a successful run, or report a failed one. A failure is only
/// returned if the state it was computed from is still current; otherwise
/// the run surfaces as [`AuctionError::TxConflict`] and is retried. The
/// transaction's writes are discarded on every error path.
///
/// [`AuctionError::TxConflict`]: lineage_types::AuctionError::TxConflict
fn finish(
    tx: Transaction<'_>,
    operation: Operation,
    outcome: Result<Option<Vec<u8>>>,
) -> Result<(Option<Vec<u8>>, CommitReceipt)> {
    match outcome {
        Ok(payload) => {
            let receipt = tx.commit(operation.name())?;
            Ok((payload, receipt))
        }
        Err(err) => {
            if let Err(conflict) = tx.validate() {
                debug!(%operation, error = %err, "Discarding failure computed from stale reads");
                return Err(conflict.into());
            }
            Err(err)
        }
    }
}
