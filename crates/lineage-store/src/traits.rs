use crate::error::StoreResult;

/// Untyped keyed store consumed by the auction engine.
///
/// Implementations must satisfy:
/// - `get` returns exactly the bytes last `put` under the key as seen by
///   the caller's execution context, or `None`.
/// - No caching across execution contexts; atomicity is provided by the
///   caller (see [`Transaction`](crate::Transaction)).
/// - All backend errors are propagated, never silently ignored.
pub trait RecordStore {
    /// Read the bytes stored under `key`. Returns `Ok(None)` if absent.
    fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        (**self).put(key, value)
    }
}
