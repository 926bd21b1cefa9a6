//! Backend failures surface as `StoreError` and are never mistaken for
//! missing records.

use lineage_auction::{Dispatcher, close_bidding, make_offer, query};
use lineage_store::{RecordStore, StoreError, StoreResult};
use lineage_types::*;

/// A store whose backend is down.
struct Unavailable;

impl RecordStore for Unavailable {
    fn get(&mut self, _key: &str) -> StoreResult<Option<Vec<u8>>> {
        Err(StoreError::Unavailable("backend offline".into()))
    }

    fn put(&mut self, _key: &str, _value: Vec<u8>) -> StoreResult<()> {
        Err(StoreError::Unavailable("backend offline".into()))
    }
}

/// Reads succeed from a fixed map; every write fails.
struct ReadOnly(std::collections::HashMap<String, Vec<u8>>);

impl RecordStore for ReadOnly {
    fn get(&mut self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.0.get(key).cloned())
    }

    fn put(&mut self, key: &str, _value: Vec<u8>) -> StoreResult<()> {
        Err(StoreError::Unavailable(format!("write to {key} refused")))
    }
}

#[test]
fn read_failure_is_store_error() {
    let err = query(&mut Unavailable, "ABCD").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store, "Got: {err:?}");

    let err = close_bidding(&mut Unavailable, &ListingId::from("ABCD")).unwrap_err();
    assert!(matches!(err, AuctionError::Store(ref msg) if msg.contains("offline")), "Got: {err:?}");
}

#[test]
fn write_failure_is_store_error() {
    let mut records = std::collections::HashMap::new();
    records.insert("m".to_string(), Member::dummy(100).encode().unwrap());
    records.insert("s".to_string(), Member::dummy(0).encode().unwrap());
    records.insert("a".to_string(), Asset::new(MemberId::from("s")).encode().unwrap());
    records.insert("L".to_string(), Listing::dummy("a", 10).encode().unwrap());
    let mut store = ReadOnly(records);

    let err = make_offer(&mut store, Amount(50), &ListingId::from("L"), &MemberId::from("m"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store, "Got: {err:?}");
}

#[test]
fn dispatcher_propagates_store_errors() {
    let dispatcher = Dispatcher::new().unwrap();
    let err = dispatcher
        .invoke(&mut Unavailable, &AuctionConfig::default(), "initLedger", &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store, "Got: {err:?}");
}
