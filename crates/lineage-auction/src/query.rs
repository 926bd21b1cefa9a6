//! Raw reads (`query`).

use lineage_store::{RecordAdapter, RecordStore};
use lineage_types::{AuctionConfig, Result};
use tracing::debug;

use crate::operation::{Operation, expect_args};

/// The bytes stored under `key`, unmodified and undecoded.
pub fn query<S: RecordStore + ?Sized>(store: &mut S, key: &str) -> Result<Vec<u8>> {
    let bytes = RecordAdapter::new(store).load_raw(key)?;
    debug!(key, len = bytes.len(), "Query");
    Ok(bytes)
}

pub(crate) fn handle_query(
    store: &mut dyn RecordStore,
    _config: &AuctionConfig,
    args: &[String],
) -> Result<Option<Vec<u8>>> {
    let [key] = expect_args::<1>(Operation::Query, args)?;
    query(store, key).map(Some)
}
