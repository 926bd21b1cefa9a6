//! Ledger seeding and record creation: `initLedger`, `createMember`,
//! `createAsset`, `createListing`.

use lineage_store::{RecordAdapter, RecordStore};
use lineage_types::{
    Amount, Asset, AssetId, AuctionConfig, AuctionError, CreatePolicy, Listing, ListingId,
    ListingState, Member, MemberId, Offer, Record, Result, SeedConfig, parse_offers_text,
};
use tracing::{info, warn};

use crate::operation::{Operation, expect_args};

/// Fields of a `createListing` call after argument coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub reserve_price: Amount,
    pub description: String,
    pub listing_state: ListingState,
    pub offers: Option<Vec<Offer>>,
    pub asset: AssetId,
    pub species: String,
}

impl NewListing {
    fn into_listing(self) -> Listing {
        Listing {
            reserve_price: self.reserve_price,
            description: self.description,
            listing_state: self.listing_state,
            offers: self.offers,
            asset: self.asset,
            species: self.species,
        }
    }
}

// ---------------------------------------------------------------------------
// Typed operations
// ---------------------------------------------------------------------------

/// Write the demo records. Existing values under the seed keys are replaced
/// regardless of the create policy.
pub fn init_ledger<S: RecordStore + ?Sized>(store: &mut S, seed: &SeedConfig) -> Result<()> {
    let mut records = RecordAdapter::new(store);

    for member in &seed.members {
        records.save(
            &member.key,
            &Member::new(
                member.first_name.clone(),
                member.last_name.clone(),
                Amount(member.balance),
            ),
        )?;
    }
    records.save(&seed.asset_key, &Asset::new(MemberId::new(seed.asset_owner.clone())))?;
    records.save(
        &seed.listing_key,
        &Listing::for_sale(
            AssetId::new(seed.asset_key.clone()),
            Amount(seed.reserve_price),
            seed.description.clone(),
            seed.species.clone(),
        ),
    )?;

    info!(
        members = seed.members.len(),
        asset = %seed.asset_key,
        listing = %seed.listing_key,
        "Ledger seeded"
    );
    Ok(())
}

pub fn create_member<S: RecordStore + ?Sized>(
    store: &mut S,
    config: &AuctionConfig,
    key: &MemberId,
    member: &Member,
) -> Result<()> {
    let mut records = RecordAdapter::new(store);
    guard_create::<Member, _>(&mut records, config, key.as_str())?;
    records.save(key.as_str(), member)?;
    info!(member = %key, balance = %member.balance, "Member created");
    Ok(())
}

/// Create an asset. With `verify_references`, the owner must be an
/// existing member.
pub fn create_asset<S: RecordStore + ?Sized>(
    store: &mut S,
    config: &AuctionConfig,
    key: &AssetId,
    asset: &Asset,
) -> Result<()> {
    let mut records = RecordAdapter::new(store);
    guard_create::<Asset, _>(&mut records, config, key.as_str())?;
    if config.verify_references {
        records.load::<Member>(asset.owner.as_str())?;
    }
    records.save(key.as_str(), asset)?;
    info!(asset = %key, owner = %asset.owner, "Asset created");
    Ok(())
}

/// Create a listing. With `verify_references`, the listed asset must exist.
pub fn create_listing<S: RecordStore + ?Sized>(
    store: &mut S,
    config: &AuctionConfig,
    key: &ListingId,
    listing: NewListing,
) -> Result<()> {
    let mut records = RecordAdapter::new(store);
    guard_create::<Listing, _>(&mut records, config, key.as_str())?;
    if config.verify_references {
        records.load::<Asset>(listing.asset.as_str())?;
    }
    let listing = listing.into_listing();
    records.save(key.as_str(), &listing)?;
    info!(
        listing = %key,
        asset = %listing.asset,
        reserve = %listing.reserve_price,
        state = %listing.listing_state,
        "Listing created"
    );
    Ok(())
}

/// Apply the create policy to `key`.
fn guard_create<R: Record, S: RecordStore + ?Sized>(
    records: &mut RecordAdapter<'_, S>,
    config: &AuctionConfig,
    key: &str,
) -> Result<()> {
    if !records.exists(key)? {
        return Ok(());
    }
    match config.create_policy {
        CreatePolicy::Reject => Err(AuctionError::Conflict {
            kind: R::KIND,
            key: key.to_string(),
        }),
        CreatePolicy::Overwrite => {
            warn!(kind = %R::KIND, key, "Overwriting existing record");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// String-argument handlers
// ---------------------------------------------------------------------------

pub(crate) fn handle_init_ledger(
    store: &mut dyn RecordStore,
    config: &AuctionConfig,
    args: &[String],
) -> Result<Option<Vec<u8>>> {
    expect_args::<0>(Operation::InitLedger, args)?;
    init_ledger(store, &config.seed)?;
    Ok(None)
}

pub(crate) fn handle_create_member(
    store: &mut dyn RecordStore,
    config: &AuctionConfig,
    args: &[String],
) -> Result<Option<Vec<u8>>> {
    let [key, first_name, last_name, balance] = expect_args::<4>(Operation::CreateMember, args)?;
    let balance = Amount::parse_arg("balance", balance)?;
    create_member(
        store,
        config,
        &MemberId::new(key.clone()),
        &Member::new(first_name.clone(), last_name.clone(), balance),
    )?;
    Ok(None)
}

pub(crate) fn handle_create_asset(
    store: &mut dyn RecordStore,
    config: &AuctionConfig,
    args: &[String],
) -> Result<Option<Vec<u8>>> {
    let [key, owner] = expect_args::<2>(Operation::CreateAsset, args)?;
    create_asset(
        store,
        config,
        &AssetId::new(key.clone()),
        &Asset::new(MemberId::new(owner.clone())),
    )?;
    Ok(None)
}

pub(crate) fn handle_create_listing(
    store: &mut dyn RecordStore,
    config: &AuctionConfig,
    args: &[String],
) -> Result<Option<Vec<u8>>> {
    let [key, reserve_price, description, listing_state, offers, asset, species] =
        expect_args::<7>(Operation::CreateListing, args)?;

    let reserve_price = Amount::parse_arg("reservePrice", reserve_price)?;
    let listing_state: ListingState =
        listing_state.parse().map_err(|reason| AuctionError::Validation {
            operation: Operation::CreateListing.name(),
            reason,
        })?;
    let offers = parse_offers_text(offers).map_err(|e| AuctionError::Validation {
        operation: Operation::CreateListing.name(),
        reason: format!("offers is not an offer array: {e}"),
    })?;

    create_listing(
        store,
        config,
        &ListingId::new(key.clone()),
        NewListing {
            reserve_price,
            description: description.clone(),
            listing_state,
            offers,
            asset: AssetId::new(asset.clone()),
            species: species.clone(),
        },
    )?;
    Ok(None)
}
