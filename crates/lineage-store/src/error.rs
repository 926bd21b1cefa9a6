use lineage_types::AuctionError;

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A key read by this transaction was committed by another one.
    #[error("read conflict on key {key}: observed version {observed:?}, current {current:?}")]
    Conflict {
        key: String,
        observed: Option<u64>,
        current: Option<u64>,
    },

    /// A snapshot file is malformed.
    #[error("corrupt snapshot: {0}")]
    Snapshot(String),

    /// I/O error from the snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AuctionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { key, .. } => Self::TxConflict { key },
            other => Self::Store(other.to_string()),
        }
    }
}
