//! Offer submission (`makeOffer`).
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the listing exists and is still `FOR_SALE`
//! 2. the listed asset exists
//! 3. the bidder exists
//! 4. the bid does not exceed the bidder's balance
//! 5. the bidder does not own the asset
//!
//! Funds are checked, not reserved. Nothing is written unless every check
//! passes.

use lineage_store::{RecordAdapter, RecordStore};
use lineage_types::{
    Amount, Asset, AuctionConfig, AuctionError, Listing, ListingId, Member, MemberId, Offer, Result,
};
use tracing::{debug, info};

use crate::operation::{Operation, expect_args};

/// Append an offer to an open listing and return it.
pub fn make_offer<S: RecordStore + ?Sized>(
    store: &mut S,
    bid_price: Amount,
    listing_key: &ListingId,
    member_key: &MemberId,
) -> Result<Offer> {
    let mut records = RecordAdapter::new(store);

    let mut listing: Listing = records.load(listing_key.as_str())?;
    if !listing.is_open() {
        return Err(AuctionError::ListingClosed {
            listing: listing_key.to_string(),
            state: listing.listing_state.to_string(),
        });
    }
    let asset: Asset = records.load(listing.asset.as_str())?;
    let member: Member = records.load(member_key.as_str())?;

    if !member.can_afford(bid_price) {
        debug!(member = %member_key, bid = %bid_price, balance = %member.balance, "Bid exceeds balance");
        return Err(AuctionError::InsufficientFunds {
            bid: bid_price,
            balance: member.balance,
        });
    }
    if asset.is_owned_by(member_key) {
        return Err(AuctionError::SelfDealing {
            member: member_key.to_string(),
            asset: listing.asset.to_string(),
        });
    }

    let offer = Offer::new(bid_price, listing_key.clone(), member_key.clone());
    listing.push_offer(offer.clone());
    records.save(listing_key.as_str(), &listing)?;

    info!(
        listing = %listing_key,
        member = %member_key,
        bid = %bid_price,
        offers = listing.offer_count(),
        "Offer accepted"
    );
    Ok(offer)
}

pub(crate) fn handle_make_offer(
    store: &mut dyn RecordStore,
    _config: &AuctionConfig,
    args: &[String],
) -> Result<Option<Vec<u8>>> {
    let [bid_price, listing_key, member_key] = expect_args::<3>(Operation::MakeOffer, args)?;
    let bid_price = Amount::parse_arg("bidPrice", bid_price)?;
    make_offer(
        store,
        bid_price,
        &ListingId::new(listing_key.clone()),
        &MemberId::new(member_key.clone()),
    )?;
    Ok(None)
}
