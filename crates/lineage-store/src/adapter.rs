//! Typed record access over an untyped [`RecordStore`].
//!
//! Absent keys and keys holding zero bytes are both treated as "no
//! record": a `put` of an empty value is how legacy callers cleared state.

use lineage_types::{AuctionError, Record, RecordKind, Result};

use crate::traits::RecordStore;

/// Loads and saves [`Record`]s through any store.
pub struct RecordAdapter<'s, S: RecordStore + ?Sized> {
    store: &'s mut S,
}

impl<'s, S: RecordStore + ?Sized> RecordAdapter<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Raw bytes under `key`; `None` if absent or empty.
    pub fn raw(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(key)?.filter(|bytes| !bytes.is_empty()))
    }

    pub fn exists(&mut self, key: &str) -> Result<bool> {
        Ok(self.raw(key)?.is_some())
    }

    /// Decode the record under `key`, if any.
    pub fn try_load<R: Record>(&mut self, key: &str) -> Result<Option<R>> {
        self.raw(key)?
            .map(|bytes| R::decode(key, &bytes))
            .transpose()
    }

    /// Decode the record under `key`.
    ///
    /// # Errors
    /// Returns [`AuctionError::NotFound`] if the key is absent or empty,
    /// [`AuctionError::Decode`] if the bytes do not match `R`.
    pub fn load<R: Record>(&mut self, key: &str) -> Result<R> {
        self.try_load(key)?.ok_or_else(|| AuctionError::NotFound {
            kind: R::KIND,
            key: key.to_string(),
        })
    }

    /// Raw bytes under `key`, failing if absent or empty.
    pub fn load_raw(&mut self, key: &str) -> Result<Vec<u8>> {
        self.raw(key)?.ok_or_else(|| AuctionError::NotFound {
            kind: RecordKind::Raw,
            key: key.to_string(),
        })
    }

    /// Encode `record` and write it under `key`.
    pub fn save<R: Record>(&mut self, key: &str, record: &R) -> Result<()> {
        let bytes = record.encode()?;
        self.store.put(key, bytes)?;
        Ok(())
    }
}
