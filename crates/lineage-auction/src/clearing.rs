//! Auction clearing (`closeBidding`).
//!
//! Closing a listing picks the highest offer (earliest submission wins a
//! tie) and either:
//!
//! - marks the listing `RESERVE_NOT_MET` and keeps its offers, when the
//!   best bid is below the reserve price; or
//! - settles the sale: debits the buyer, credits the seller, hands the
//!   asset to the buyer and marks the listing `SOLD` with its offers
//!   cleared.
//!
//! Every check runs before the first write, so a failed close leaves the
//! store untouched. The transfer is a closed two-party movement: the sum
//! of the buyer's and seller's balances is the same before and after.

use lineage_store::{RecordAdapter, RecordStore};
use lineage_types::{
    Amount, Asset, AssetId, AuctionConfig, AuctionError, Listing, ListingId, ListingState, Member,
    MemberId, Offer, Result,
};
use tracing::{debug, info, warn};

use crate::operation::{Operation, expect_args};

/// Result of closing a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearingOutcome {
    /// The asset changed hands.
    Sold(Settlement),
    /// The best bid was below the reserve; no money or ownership moved.
    ReserveNotMet { best_bid: Amount, reserve_price: Amount },
}

impl ClearingOutcome {
    /// Final state written to the listing.
    #[must_use]
    pub fn listing_state(&self) -> ListingState {
        match self {
            Self::Sold(_) => ListingState::Sold,
            Self::ReserveNotMet { .. } => ListingState::ReserveNotMet,
        }
    }
}

/// The transfer performed by a successful close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub winning_offer: Offer,
    pub asset: AssetId,
    pub seller: MemberId,
    pub buyer_balance: Amount,
    pub seller_balance: Amount,
}

impl Settlement {
    #[must_use]
    pub fn buyer(&self) -> &MemberId {
        &self.winning_offer.member
    }

    #[must_use]
    pub fn price(&self) -> Amount {
        self.winning_offer.bid_price
    }
}

/// Highest bid in `offers`; among equal bids the earliest submitted wins.
#[must_use]
pub fn select_winner(offers: &[Offer]) -> Option<&Offer> {
    offers
        .iter()
        .reduce(|best, offer| if offer.bid_price > best.bid_price { offer } else { best })
}

/// New `(buyer, seller)` balances after moving `price` from buyer to seller.
///
/// # Errors
/// Returns [`AuctionError::InvariantViolation`] if the buyer cannot cover
/// `price`, the seller's balance would overflow, or the two-party total
/// changes.
pub fn transfer(buyer: Amount, seller: Amount, price: Amount) -> Result<(Amount, Amount)> {
    let buyer_after = buyer.checked_sub(price).ok_or_else(|| AuctionError::InvariantViolation {
        reason: format!("buyer balance {buyer} cannot cover winning bid {price}"),
    })?;
    let seller_after = seller.checked_add(price).ok_or_else(|| AuctionError::InvariantViolation {
        reason: format!("seller balance {seller} overflows when credited {price}"),
    })?;

    let before = u128::from(buyer.value()) + u128::from(seller.value());
    let after = u128::from(buyer_after.value()) + u128::from(seller_after.value());
    if before != after {
        return Err(AuctionError::InvariantViolation {
            reason: format!("money not conserved: {before} before, {after} after"),
        });
    }
    Ok((buyer_after, seller_after))
}

/// Close bidding on `listing_key`.
pub fn close_bidding<S: RecordStore + ?Sized>(
    store: &mut S,
    listing_key: &ListingId,
) -> Result<ClearingOutcome> {
    let mut records = RecordAdapter::new(store);

    let mut listing: Listing = records.load(listing_key.as_str())?;
    if !listing.is_open() {
        return Err(AuctionError::ListingClosed {
            listing: listing_key.to_string(),
            state: listing.listing_state.to_string(),
        });
    }

    let Some(winner) = select_winner(listing.offers()).cloned() else {
        warn!(listing = %listing_key, "Close requested with no offers");
        return Err(AuctionError::NoOffers(listing_key.to_string()));
    };
    debug!(
        listing = %listing_key,
        member = %winner.member,
        bid = %winner.bid_price,
        offers = listing.offer_count(),
        "Winner selected"
    );

    if winner.bid_price < listing.reserve_price {
        let outcome = ClearingOutcome::ReserveNotMet {
            best_bid: winner.bid_price,
            reserve_price: listing.reserve_price,
        };
        listing.listing_state = outcome.listing_state();
        records.save(listing_key.as_str(), &listing)?;
        info!(
            listing = %listing_key,
            best_bid = %winner.bid_price,
            reserve = %listing.reserve_price,
            offers = listing.offer_count(),
            "Reserve not met"
        );
        return Ok(outcome);
    }

    let asset_key = listing.asset.clone();
    let mut buyer: Member = records.load(winner.member.as_str())?;
    let mut asset: Asset = records.load(asset_key.as_str())?;
    let seller_key = asset.owner.clone();
    let mut seller: Member = records.load(seller_key.as_str())?;

    // Ownership may have moved to the bidder since the offer was accepted.
    if seller_key == winner.member {
        return Err(AuctionError::SelfDealing {
            member: winner.member.to_string(),
            asset: asset_key.to_string(),
        });
    }

    let (buyer_balance, seller_balance) =
        transfer(buyer.balance, seller.balance, winner.bid_price)?;
    buyer.balance = buyer_balance;
    seller.balance = seller_balance;
    asset.owner = winner.member.clone();
    listing.offers = None;
    listing.listing_state = ListingState::Sold;

    records.save(winner.member.as_str(), &buyer)?;
    records.save(seller_key.as_str(), &seller)?;
    records.save(listing_key.as_str(), &listing)?;
    records.save(asset_key.as_str(), &asset)?;

    info!(
        listing = %listing_key,
        asset = %asset_key,
        buyer = %winner.member,
        seller = %seller_key,
        price = %winner.bid_price,
        "Listing sold"
    );

    Ok(ClearingOutcome::Sold(Settlement {
        winning_offer: winner,
        asset: asset_key,
        seller: seller_key,
        buyer_balance,
        seller_balance,
    }))
}

pub(crate) fn handle_close_bidding(
    store: &mut dyn RecordStore,
    _config: &AuctionConfig,
    args: &[String],
) -> Result<Option<Vec<u8>>> {
    let [listing_key] = expect_args::<1>(Operation::CloseBidding, args)?;
    close_bidding(store, &ListingId::new(listing_key.clone()))?;
    Ok(None)
}
