//! System-wide constants for the Lineage auction engine.

/// Seed member keys written by `initLedger`.
pub const SEED_MEMBER_A: &str = "memberA@lineagecodemember";
pub const SEED_MEMBER_B: &str = "memberB@lineagecodemember";
pub const SEED_MEMBER_C: &str = "memberC@lineagecodemember";

/// Seed asset key written by `initLedger`.
pub const SEED_ASSET: &str = "1234";

/// Seed listing key written by `initLedger`.
pub const SEED_LISTING: &str = "ABCD";

/// Starting balance of every seed member.
pub const SEED_MEMBER_BALANCE: u64 = 5000;

/// Reserve price of the seed listing.
pub const SEED_RESERVE_PRICE: u64 = 3500;

pub const SEED_LISTING_DESCRIPTION: &str = "the fastest horse in the world";

pub const SEED_LISTING_SPECIES: &str = "Horse";

/// Default number of times the runtime re-runs an operation after a
/// transaction conflict.
pub const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Lineage";
