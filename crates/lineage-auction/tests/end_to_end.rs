//! End-to-end tests: seed → offer → close through the runtime, exactly as
//! an external caller drives the engine.

use lineage_auction::AuctionRuntime;
use lineage_types::constants::{SEED_ASSET, SEED_LISTING, SEED_MEMBER_A, SEED_MEMBER_B, SEED_MEMBER_C};
use lineage_types::*;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn seeded() -> AuctionRuntime {
    let runtime = AuctionRuntime::new(AuctionConfig::default()).unwrap();
    runtime.invoke("initLedger", &[]).unwrap();
    runtime
}

fn read<R: Record>(runtime: &AuctionRuntime, key: &str) -> R {
    let inv = runtime.invoke("query", &args(&[key])).unwrap();
    R::decode(key, &inv.payload.unwrap()).unwrap()
}

fn balance(runtime: &AuctionRuntime, key: &str) -> u64 {
    read::<Member>(runtime, key).balance.value()
}

fn total_balance(runtime: &AuctionRuntime) -> u64 {
    [SEED_MEMBER_A, SEED_MEMBER_B, SEED_MEMBER_C]
        .iter()
        .map(|key| balance(runtime, key))
        .sum()
}

// ---------------------------------------------------------------------------
// Seed scenario
// ---------------------------------------------------------------------------

#[test]
fn seed_offer_close_transfers_asset_and_money() {
    let runtime = seeded();

    runtime
        .invoke("makeOffer", &args(&["4000", SEED_LISTING, SEED_MEMBER_B]))
        .unwrap();
    let close = runtime.invoke("closeBidding", &args(&[SEED_LISTING])).unwrap();
    assert!(close.payload.is_none());
    assert_eq!(
        close.receipt.write_keys,
        vec![
            SEED_ASSET.to_string(),
            SEED_LISTING.to_string(),
            SEED_MEMBER_A.to_string(),
            SEED_MEMBER_B.to_string(),
        ]
    );

    assert_eq!(read::<Asset>(&runtime, SEED_ASSET).owner.as_str(), SEED_MEMBER_B);
    assert_eq!(balance(&runtime, SEED_MEMBER_A), 9000);
    assert_eq!(balance(&runtime, SEED_MEMBER_B), 1000);

    let listing: Listing = read(&runtime, SEED_LISTING);
    assert_eq!(listing.listing_state, ListingState::Sold);
    assert!(listing.offers.is_none());

    let raw = runtime.invoke("query", &args(&[SEED_LISTING])).unwrap().payload.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert!(json["offers"].is_null());
    assert_eq!(json["listingState"], "SOLD");
}

#[test]
fn competing_offers_highest_wins() {
    let runtime = seeded();
    runtime
        .invoke("makeOffer", &args(&["3600", SEED_LISTING, SEED_MEMBER_B]))
        .unwrap();
    runtime
        .invoke("makeOffer", &args(&["4200", SEED_LISTING, SEED_MEMBER_C]))
        .unwrap();
    runtime
        .invoke("makeOffer", &args(&["4100", SEED_LISTING, SEED_MEMBER_B]))
        .unwrap();
    runtime.invoke("closeBidding", &args(&[SEED_LISTING])).unwrap();

    assert_eq!(read::<Asset>(&runtime, SEED_ASSET).owner.as_str(), SEED_MEMBER_C);
    assert_eq!(balance(&runtime, SEED_MEMBER_C), 800);
    assert_eq!(balance(&runtime, SEED_MEMBER_B), 5000);
    assert_eq!(balance(&runtime, SEED_MEMBER_A), 9200);
    assert_eq!(total_balance(&runtime), 15_000);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn winner_selection_example() {
    let runtime = AuctionRuntime::new(AuctionConfig::default()).unwrap();
    for (key, balance) in [("seller", "0"), ("b1", "100"), ("b2", "100"), ("b3", "100")] {
        runtime
            .invoke("createMember", &args(&[key, "f", "l", balance]))
            .unwrap();
    }
    runtime.invoke("createAsset", &args(&["a1", "seller"])).unwrap();
    runtime
        .invoke("createListing", &args(&["L1", "20", "", "FOR_SALE", "", "a1", ""]))
        .unwrap();
    for (bid, member) in [("10", "b1"), ("50", "b2"), ("30", "b3")] {
        runtime.invoke("makeOffer", &args(&[bid, "L1", member])).unwrap();
    }
    runtime.invoke("closeBidding", &args(&["L1"])).unwrap();

    assert_eq!(read::<Asset>(&runtime, "a1").owner.as_str(), "b2");
    assert_eq!(balance(&runtime, "seller"), 50);
}

#[test]
fn tie_goes_to_first_submitted() {
    let runtime = AuctionRuntime::new(AuctionConfig::default()).unwrap();
    for key in ["seller", "b1", "b2"] {
        runtime.invoke("createMember", &args(&[key, "f", "l", "100"])).unwrap();
    }
    runtime.invoke("createAsset", &args(&["a1", "seller"])).unwrap();
    runtime
        .invoke("createListing", &args(&["L1", "20", "", "FOR_SALE", "", "a1", ""]))
        .unwrap();
    runtime.invoke("makeOffer", &args(&["50", "L1", "b1"])).unwrap();
    runtime.invoke("makeOffer", &args(&["50", "L1", "b2"])).unwrap();
    runtime.invoke("closeBidding", &args(&["L1"])).unwrap();

    assert_eq!(read::<Asset>(&runtime, "a1").owner.as_str(), "b1");
    assert_eq!(balance(&runtime, "b1"), 50);
    assert_eq!(balance(&runtime, "b2"), 100);
}

#[test]
fn owner_cannot_bid_on_own_listing() {
    let runtime = seeded();
    let err = runtime
        .invoke("makeOffer", &args(&["4000", SEED_LISTING, SEED_MEMBER_A]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfDealing, "Got: {err:?}");
    assert!(read::<Listing>(&runtime, SEED_LISTING).offers.is_none());
}

#[test]
fn reserve_not_met_leaves_balances_and_owner() {
    let runtime = seeded();
    runtime
        .invoke("makeOffer", &args(&["3000", SEED_LISTING, SEED_MEMBER_B]))
        .unwrap();
    runtime.invoke("closeBidding", &args(&[SEED_LISTING])).unwrap();

    let listing: Listing = read(&runtime, SEED_LISTING);
    assert_eq!(listing.listing_state, ListingState::ReserveNotMet);
    assert_eq!(listing.offer_count(), 1);
    assert_eq!(read::<Asset>(&runtime, SEED_ASSET).owner.as_str(), SEED_MEMBER_A);
    assert_eq!(balance(&runtime, SEED_MEMBER_A), 5000);
    assert_eq!(balance(&runtime, SEED_MEMBER_B), 5000);

    let err = runtime
        .invoke("makeOffer", &args(&["4000", SEED_LISTING, SEED_MEMBER_C]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ListingClosed, "Got: {err:?}");
}

#[test]
fn insufficient_funds_leaves_offers_unchanged() {
    let runtime = AuctionRuntime::new(AuctionConfig::default()).unwrap();
    runtime.invoke("createMember", &args(&["seller", "f", "l", "0"])).unwrap();
    runtime.invoke("createMember", &args(&["poor", "f", "l", "100"])).unwrap();
    runtime.invoke("createAsset", &args(&["a1", "seller"])).unwrap();
    runtime
        .invoke("createListing", &args(&["L1", "20", "", "FOR_SALE", "", "a1", ""]))
        .unwrap();
    let before = runtime.invoke("query", &args(&["L1"])).unwrap().payload;

    let err = runtime.invoke("makeOffer", &args(&["150", "L1", "poor"])).unwrap_err();
    assert!(
        matches!(err, AuctionError::InsufficientFunds { bid: Amount(150), balance: Amount(100) }),
        "Got: {err:?}"
    );
    assert_eq!(runtime.invoke("query", &args(&["L1"])).unwrap().payload, before);
}

#[test]
fn close_without_offers_is_terminal_failure() {
    let runtime = seeded();
    let height = runtime.ledger().height().unwrap();
    let err = runtime.invoke("closeBidding", &args(&[SEED_LISTING])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoOffers, "Got: {err:?}");
    assert_eq!(runtime.ledger().height().unwrap(), height);
    assert_eq!(
        read::<Listing>(&runtime, SEED_LISTING).listing_state,
        ListingState::ForSale
    );
}

#[test]
fn buyer_spent_elsewhere_before_close() {
    // B bids on two listings; the first sale drains B below the second bid.
    let runtime = seeded();
    runtime.invoke("createAsset", &args(&["5678", SEED_MEMBER_C])).unwrap();
    runtime
        .invoke("createListing", &args(&["EFGH", "100", "", "FOR_SALE", "", "5678", "Horse"]))
        .unwrap();
    runtime
        .invoke("makeOffer", &args(&["4000", SEED_LISTING, SEED_MEMBER_B]))
        .unwrap();
    runtime.invoke("makeOffer", &args(&["3000", "EFGH", SEED_MEMBER_B])).unwrap();

    runtime.invoke("closeBidding", &args(&[SEED_LISTING])).unwrap();
    let err = runtime.invoke("closeBidding", &args(&["EFGH"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvariantViolation, "Got: {err:?}");
    assert_eq!(balance(&runtime, SEED_MEMBER_B), 1000);
    assert_eq!(read::<Asset>(&runtime, "5678").owner.as_str(), SEED_MEMBER_C);
    assert_eq!(total_balance(&runtime), 15_000);
}

// ---------------------------------------------------------------------------
// Argument and policy errors
// ---------------------------------------------------------------------------

#[test]
fn wrong_arity_rejected_for_every_operation() {
    let runtime = seeded();
    let height = runtime.ledger().height().unwrap();
    for (name, argc) in [
        ("initLedger", 1),
        ("createMember", 3),
        ("createAsset", 1),
        ("createListing", 6),
        ("makeOffer", 2),
        ("closeBidding", 0),
        ("query", 2),
    ] {
        let err = runtime.invoke(name, &vec![String::from("x"); argc]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{name} got: {err:?}");
    }
    assert_eq!(runtime.ledger().height().unwrap(), height);
}

#[test]
fn duplicate_create_policy() {
    let strict = seeded();
    let err = strict
        .invoke("createMember", &args(&[SEED_MEMBER_A, "x", "y", "1"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict, "Got: {err:?}");
    assert_eq!(balance(&strict, SEED_MEMBER_A), 5000);

    let legacy = AuctionRuntime::new(AuctionConfig::legacy()).unwrap();
    legacy.invoke("initLedger", &[]).unwrap();
    legacy
        .invoke("createMember", &args(&[SEED_MEMBER_A, "x", "y", "1"]))
        .unwrap();
    assert_eq!(balance(&legacy, SEED_MEMBER_A), 1);
}

#[test]
fn legacy_string_amounts_in_stored_records() {
    // Records written by older clients carry amounts as strings and the
    // asset under `animal`.
    let runtime = AuctionRuntime::new(AuctionConfig::default()).unwrap();
    let mut tx = runtime.ledger().begin();
    {
        use lineage_store::RecordStore;
        tx.put("s", br#"{"firstName":"s","lastName":"","balance":"10"}"#.to_vec()).unwrap();
        tx.put("b", br#"{"firstName":"b","lastName":"","balance":"500"}"#.to_vec()).unwrap();
        tx.put("a", br#"{"owner":"s"}"#.to_vec()).unwrap();
        tx.put(
            "L",
            br#"{"reservePrice":"100","description":"","listingState":"FOR_SALE","offers":"","animal":"a"}"#
                .to_vec(),
        )
        .unwrap();
    }
    tx.commit("legacy").unwrap();

    runtime.invoke("makeOffer", &args(&["200", "L", "b"])).unwrap();
    runtime.invoke("closeBidding", &args(&["L"])).unwrap();

    assert_eq!(balance(&runtime, "s"), 210);
    assert_eq!(balance(&runtime, "b"), 300);
    let raw = runtime.invoke("query", &args(&["s"])).unwrap().payload.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(json["balance"], 210);
}
