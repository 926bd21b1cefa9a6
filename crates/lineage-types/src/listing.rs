//! Listing records and the offers embedded in them.
//!
//! A [`Listing`] is the auction unit: a reserve price, a lifecycle state,
//! and the ordered sequence of competing [`Offer`]s. Offers are never
//! stored on their own.
//!
//! State machine: `FOR_SALE → {RESERVE_NOT_MET, SOLD}`; both targets are
//! terminal.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::{Amount, AssetId, ListingId, MemberId, Record, RecordKind};

/// Lifecycle state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingState {
    /// Accepting offers.
    ForSale,
    /// Closed; the best offer was below the reserve price.
    ReserveNotMet,
    /// Closed; ownership and money were transferred.
    Sold,
}

impl ListingState {
    pub const ALL: [Self; 3] = [Self::ForSale, Self::ReserveNotMet, Self::Sold];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForSale => "FOR_SALE",
            Self::ReserveNotMet => "RESERVE_NOT_MET",
            Self::Sold => "SOLD",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::ForSale)
    }
}

impl fmt::Display for ListingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s.trim())
            .ok_or_else(|| format!("unknown listing state {s:?}"))
    }
}

/// A bid by a member against a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub bid_price: Amount,
    pub listing: ListingId,
    pub member: MemberId,
}

impl Offer {
    #[must_use]
    pub fn new(bid_price: Amount, listing: ListingId, member: MemberId) -> Self {
        Self {
            bid_price,
            listing,
            member,
        }
    }
}

/// The auction unit.
///
/// Decoding accepts the legacy field name `animal` for `asset`, and for
/// `offers` accepts a missing field, `null`, an empty string, an array, or
/// a string holding a JSON array. Absent offers encode as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub reserve_price: Amount,
    #[serde(default)]
    pub description: String,
    pub listing_state: ListingState,
    #[serde(default, deserialize_with = "deserialize_offers")]
    pub offers: Option<Vec<Offer>>,
    #[serde(alias = "animal")]
    pub asset: AssetId,
    #[serde(default)]
    pub species: String,
}

impl Listing {
    /// A fresh `FOR_SALE` listing with no offers.
    #[must_use]
    pub fn for_sale(
        asset: AssetId,
        reserve_price: Amount,
        description: impl Into<String>,
        species: impl Into<String>,
    ) -> Self {
        Self {
            reserve_price,
            description: description.into(),
            listing_state: ListingState::ForSale,
            offers: None,
            asset,
            species: species.into(),
        }
    }

    /// Whether the listing still accepts offers and can be closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.listing_state == ListingState::ForSale
    }

    /// Offers in submission order (empty when absent).
    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        self.offers.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn offer_count(&self) -> usize {
        self.offers().len()
    }

    /// Append an offer, initializing the sequence if absent.
    pub fn push_offer(&mut self, offer: Offer) {
        self.offers.get_or_insert_with(Vec::new).push(offer);
    }
}

impl Record for Listing {
    const KIND: RecordKind = RecordKind::Listing;
}

/// Parse the textual offers form carried by call arguments and legacy records.
///
/// Blank text and `null` mean "absent".
///
/// # Errors
/// Returns the JSON error if the text is neither blank nor an offer array.
pub fn parse_offers_text(text: &str) -> Result<Option<Vec<Offer>>, serde_json::Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str::<Vec<Offer>>(trimmed).map(Some)
}

fn deserialize_offers<'de, D>(deserializer: D) -> Result<Option<Vec<Offer>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OffersRepr {
        List(Vec<Offer>),
        Text(String),
    }

    match Option::<OffersRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(OffersRepr::List(offers)) => Ok(Some(offers)),
        Some(OffersRepr::Text(text)) => parse_offers_text(&text).map_err(de::Error::custom),
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Listing {
    pub fn dummy(asset: &str, reserve_price: u64) -> Self {
        Self::for_sale(AssetId::from(asset), Amount(reserve_price), "test listing", "Horse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(bid: u64, member: &str) -> Offer {
        Offer::new(Amount(bid), ListingId::from("L"), MemberId::from(member))
    }

    #[test]
    fn state_strings() {
        assert_eq!(ListingState::ForSale.to_string(), "FOR_SALE");
        assert_eq!(
            "RESERVE_NOT_MET".parse::<ListingState>().unwrap(),
            ListingState::ReserveNotMet
        );
        assert!("OPEN".parse::<ListingState>().is_err());
        assert!(!ListingState::ForSale.is_terminal());
        assert!(ListingState::Sold.is_terminal());
        assert!(ListingState::ReserveNotMet.is_terminal());
    }

    #[test]
    fn push_offer_initializes_absent_sequence() {
        let mut listing = Listing::dummy("a", 10);
        assert!(listing.offers.is_none());
        listing.push_offer(offer(5, "m1"));
        listing.push_offer(offer(7, "m2"));
        assert_eq!(listing.offer_count(), 2);
        assert_eq!(listing.offers()[0].member, MemberId::from("m1"));
    }

    #[test]
    fn decodes_legacy_seed_shape() {
        // Seed records historically used `animal` and an empty-string offers field.
        let bytes = br#"{"reservePrice":3500,"description":"the fastest horse in the world","species":"Horse","listingState":"FOR_SALE","offers":"","animal":"animalname"}"#;
        let listing = Listing::decode("ABCD", bytes).unwrap();
        assert_eq!(listing.asset, AssetId::from("animalname"));
        assert!(listing.offers.is_none());
        assert!(listing.is_open());
    }

    #[test]
    fn decodes_offers_from_string_and_strings_amounts() {
        let bytes = br#"{"reservePrice":"20","listingState":"FOR_SALE","offers":"[{\"bidPrice\":\"10\",\"listing\":\"L\",\"member\":\"m\"}]","asset":"a"}"#;
        let listing = Listing::decode("L", bytes).unwrap();
        assert_eq!(listing.reserve_price, Amount(20));
        assert_eq!(listing.offers(), &[offer(10, "m")]);
        assert_eq!(listing.description, "");
    }

    #[test]
    fn missing_offers_is_absent() {
        let listing =
            Listing::decode("L", br#"{"reservePrice":1,"listingState":"SOLD","asset":"a"}"#).unwrap();
        assert!(listing.offers.is_none());
    }

    #[test]
    fn malformed_offers_fail() {
        let bytes = br#"{"reservePrice":1,"listingState":"FOR_SALE","offers":"garbage","asset":"a"}"#;
        assert!(Listing::decode("L", bytes).is_err());
        let bytes = br#"{"reservePrice":1,"listingState":"FOR_SALE","offers":[{"bidPrice":-3,"listing":"L","member":"m"}],"asset":"a"}"#;
        assert!(Listing::decode("L", bytes).is_err());
    }

    #[test]
    fn parse_offers_text_blank_is_absent() {
        assert_eq!(parse_offers_text("").unwrap(), None);
        assert_eq!(parse_offers_text("  null ").unwrap(), None);
        assert_eq!(parse_offers_text("[]").unwrap(), Some(vec![]));
    }
}
