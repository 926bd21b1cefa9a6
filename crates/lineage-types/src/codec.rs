//! Byte codec for ledger records.
//!
//! The store is untyped: every record is an opaque byte blob under a
//! caller-chosen key. The [`Record`] trait maps each record type to and
//! from its canonical encoding, a flat JSON object with camelCase field
//! names and integer amounts. Decoding is tolerant of the legacy shapes
//! described on each record type; encoding is always canonical, so
//! `encode(decode(bytes)) == bytes` holds for canonical input.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::amount::NOT_AN_AMOUNT;
use crate::{AuctionError, Result};

/// The record shapes stored in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Member,
    Asset,
    Listing,
    /// A key read without an expected shape (e.g. `query`).
    Raw,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "Member"),
            Self::Asset => write!(f, "Asset"),
            Self::Listing => write!(f, "Listing"),
            Self::Raw => write!(f, "Key"),
        }
    }
}

/// A typed, key-addressable value in the store.
pub trait Record: Serialize + DeserializeOwned {
    /// Shape tag used in error messages.
    const KIND: RecordKind;

    /// Encode to the canonical byte representation.
    ///
    /// # Errors
    /// Returns [`AuctionError::Decode`] if serialization fails.
    fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| AuctionError::Decode {
            kind: Self::KIND,
            key: String::new(),
            reason: format!("encode failed: {e}"),
        })
    }

    /// Decode the bytes stored under `key`.
    ///
    /// # Errors
    /// Returns [`AuctionError::Type`] if a stored amount is not a
    /// non-negative integer, and [`AuctionError::Decode`] if the bytes
    /// otherwise do not match the schema.
    fn decode(key: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| decode_error(Self::KIND, key, &e))
    }
}

fn decode_error(kind: RecordKind, key: &str, err: &serde_json::Error) -> AuctionError {
    let message = err.to_string();
    // serde_json appends the input position to custom messages.
    let detail = message
        .rsplit_once(" at line ")
        .map_or(message.as_str(), |(head, _)| head);
    match detail.strip_prefix(NOT_AN_AMOUNT) {
        Some(value) => AuctionError::Type {
            field: "amount",
            value: value.to_string(),
        },
        None => AuctionError::Decode {
            kind,
            key: key.to_string(),
            reason: message,
        },
    }
}
