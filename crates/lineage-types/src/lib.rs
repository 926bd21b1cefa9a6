//! # lineage-types
//!
//! Shared types, errors, and configuration for the **Lineage** auction
//! clearing engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`MemberId`], [`AssetId`], [`ListingId`], [`TxId`]
//! - **Money**: [`Amount`], a strict non-negative integer
//! - **Record model**: [`Member`], [`Asset`], [`Listing`], [`ListingState`], [`Offer`]
//! - **Codec**: the [`Record`] trait and [`RecordKind`]
//! - **Configuration**: [`AuctionConfig`], [`CreatePolicy`], [`SeedConfig`]
//! - **Errors**: [`AuctionError`] with `LA_ERR_` prefix codes
//! - **Constants**: seed data and runtime defaults

pub mod amount;
pub mod asset;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod listing;
pub mod member;

// Re-export all primary types at crate root for ergonomic imports:
//   use lineage_types::{Member, Listing, Offer, Amount, ...};

pub use amount::*;
pub use asset::*;
pub use codec::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use listing::*;
pub use member::*;

// Constants are accessed via `lineage_types::constants::FOO`
// (not re-exported to avoid name collisions).
