//! # lineage-auction
//!
//! The auction engine: record creation, offer submission, and the clearing
//! algorithm that settles a listing against the highest bid.
//!
//! ## Operations
//!
//! | Name            | Args | Effect                                        |
//! |-----------------|------|-----------------------------------------------|
//! | `initLedger`    | 0    | write the demo members, asset and listing     |
//! | `createMember`  | 4    | key, first name, last name, balance           |
//! | `createAsset`   | 2    | key, owner member key                         |
//! | `createListing` | 7    | key, reserve, description, state, offers, asset key, species |
//! | `makeOffer`     | 3    | bid, listing key, member key                  |
//! | `closeBidding`  | 1    | listing key                                   |
//! | `query`         | 1    | key; returns the stored bytes                 |
//!
//! Each operation is available typed (e.g. [`close_bidding`]) for
//! in-process callers, and by name through the [`Dispatcher`] for callers
//! that pass string arguments. The [`AuctionRuntime`] wraps every
//! dispatched call in a ledger transaction so it commits entirely or not
//! at all.
//!
//! ## Invariants
//!
//! - A sale moves exactly the winning bid from buyer to seller; the sum
//!   of all member balances never changes.
//! - Balances never go negative.
//! - `SOLD` and `RESERVE_NOT_MET` are terminal.
//! - A failed operation writes nothing.

pub mod clearing;
pub mod dispatch;
pub mod offers;
pub mod operation;
pub mod query;
pub mod registry;
pub mod runtime;

pub use clearing::{ClearingOutcome, Settlement, close_bidding, select_winner, transfer};
pub use dispatch::{Dispatcher, HANDLERS, Handler};
pub use offers::make_offer;
pub use operation::Operation;
pub use query::query;
pub use registry::{NewListing, create_asset, create_listing, create_member, init_ledger};
pub use runtime::{AuctionRuntime, Invocation};
