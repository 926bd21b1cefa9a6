//! Error types for the Lineage auction engine.
//!
//! All errors use the `LA_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Argument / dispatch errors
//! - 2xx: Record lookup errors
//! - 3xx: Auction rule errors
//! - 4xx: Invariant errors
//! - 5xx: Codec errors
//! - 6xx: Store errors
//! - 9xx: General / internal errors

use std::fmt;

use thiserror::Error;

use crate::{Amount, RecordKind};

/// Central error enum for all Lineage operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Argument / Dispatch Errors (1xx)
    // =================================================================
    /// Wrong number or shape of call arguments. Raised before any store access.
    #[error("LA_ERR_100: Invalid arguments for {operation}: {reason}")]
    Validation {
        operation: &'static str,
        reason: String,
    },

    /// No operation is registered under this name.
    #[error("LA_ERR_101: Unknown operation: {0}")]
    UnknownOperation(String),

    // =================================================================
    // Record Lookup Errors (2xx)
    // =================================================================
    /// A referenced key is absent (or empty) in the store.
    #[error("LA_ERR_200: {kind} does not exist: {key}")]
    NotFound { kind: RecordKind, key: String },

    /// A create operation targeted a key that already holds a record.
    #[error("LA_ERR_201: {kind} already exists: {key}")]
    Conflict { kind: RecordKind, key: String },

    // =================================================================
    // Auction Rule Errors (3xx)
    // =================================================================
    /// The bid is higher than the bidder's balance at submission time.
    #[error("LA_ERR_300: Insufficient funds: bid {bid}, balance {balance}")]
    InsufficientFunds { bid: Amount, balance: Amount },

    /// The bidder currently owns the asset being auctioned.
    #[error("LA_ERR_301: Owner cannot bid on own asset: member {member}, asset {asset}")]
    SelfDealing { member: String, asset: String },

    /// Bidding was closed on a listing that holds no offers.
    #[error("LA_ERR_302: No offers on listing {0}")]
    NoOffers(String),

    /// The listing has already reached a terminal state.
    #[error("LA_ERR_303: Listing {listing} is closed (state {state})")]
    ListingClosed { listing: String, state: String },

    // =================================================================
    // Invariant Errors (4xx)
    // =================================================================
    /// An update would break a ledger invariant (negative balance,
    /// overflow, money not conserved).
    #[error("LA_ERR_400: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    // =================================================================
    // Codec Errors (5xx)
    // =================================================================
    /// Stored bytes do not match the expected record schema.
    #[error("LA_ERR_500: Cannot decode {kind} at {key}: {reason}")]
    Decode {
        kind: RecordKind,
        key: String,
        reason: String,
    },

    /// A string argument could not be coerced to an integer amount.
    #[error("LA_ERR_501: Field {field} is not a non-negative integer: {value:?}")]
    Type { field: &'static str, value: String },

    // =================================================================
    // Store Errors (6xx)
    // =================================================================
    /// The backing store failed (unavailable backend, I/O, corrupt snapshot).
    #[error("LA_ERR_600: Store error: {0}")]
    Store(String),

    /// A concurrent transaction committed a key this transaction read.
    #[error("LA_ERR_601: Transaction conflict on key {key}")]
    TxConflict { key: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid config file, inconsistent dispatch table, etc.).
    #[error("LA_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (config or snapshot files).
    #[error("LA_ERR_901: I/O error: {0}")]
    Io(String),
}

/// Error classes surfaced to external callers together with the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    InsufficientFunds,
    SelfDealing,
    NoOffers,
    ListingClosed,
    InvariantViolation,
    Decode,
    Type,
    Store,
    Configuration,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "ValidationError",
            Self::NotFound => "NotFoundError",
            Self::Conflict => "ConflictError",
            Self::InsufficientFunds => "InsufficientFundsError",
            Self::SelfDealing => "SelfDealingError",
            Self::NoOffers => "NoOffersError",
            Self::ListingClosed => "ListingClosedError",
            Self::InvariantViolation => "InvariantViolationError",
            Self::Decode => "DecodeError",
            Self::Type => "TypeError",
            Self::Store => "StoreError",
            Self::Configuration => "ConfigurationError",
            Self::Io => "IoError",
        };
        f.write_str(name)
    }
}

impl AuctionError {
    /// The taxonomy class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::UnknownOperation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::SelfDealing { .. } => ErrorKind::SelfDealing,
            Self::NoOffers(_) => ErrorKind::NoOffers,
            Self::ListingClosed { .. } => ErrorKind::ListingClosed,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Type { .. } => ErrorKind::Type,
            Self::Store(_) | Self::TxConflict { .. } => ErrorKind::Store,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether re-running the operation from a fresh read may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TxConflict { .. })
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<std::io::Error> for AuctionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
