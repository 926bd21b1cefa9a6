//! Name-to-handler routing for external callers.
//!
//! The table is built once and checked for completeness when the
//! [`Dispatcher`] is constructed: every [`Operation`] must have exactly
//! one handler. Unknown names are reported to the caller, never ignored.

use std::collections::HashMap;

use lineage_store::RecordStore;
use lineage_types::{AuctionConfig, AuctionError, Result};
use tracing::debug;

use crate::operation::Operation;
use crate::{clearing, offers, query, registry};

/// Handler signature: string arguments in, optional payload out.
pub type Handler = fn(&mut dyn RecordStore, &AuctionConfig, &[String]) -> Result<Option<Vec<u8>>>;

/// Built-in handlers.
pub const HANDLERS: [(Operation, Handler); 7] = [
    (Operation::InitLedger, registry::handle_init_ledger),
    (Operation::CreateMember, registry::handle_create_member),
    (Operation::CreateAsset, registry::handle_create_asset),
    (Operation::CreateListing, registry::handle_create_listing),
    (Operation::MakeOffer, offers::handle_make_offer),
    (Operation::CloseBidding, clearing::handle_close_bidding),
    (Operation::Query, query::handle_query),
];

/// Routes operation names to handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: HashMap<Operation, Handler>,
}

impl Dispatcher {
    /// Dispatcher over the built-in handlers.
    pub fn new() -> Result<Self> {
        Self::from_table(&HANDLERS)
    }

    /// Build a dispatcher from an explicit table.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] if an operation is missing
    /// or registered twice.
    pub fn from_table(entries: &[(Operation, Handler)]) -> Result<Self> {
        let mut table = HashMap::with_capacity(entries.len());
        for (operation, handler) in entries {
            if table.insert(*operation, *handler).is_some() {
                return Err(AuctionError::Configuration(format!(
                    "operation {operation} registered twice"
                )));
            }
        }
        if let Some(missing) = Operation::ALL.into_iter().find(|op| !table.contains_key(op)) {
            return Err(AuctionError::Configuration(format!(
                "no handler registered for {missing}"
            )));
        }
        Ok(Self { table })
    }

    /// Look up an operation by wire name.
    pub fn resolve(&self, name: &str) -> Result<Operation> {
        name.parse::<Operation>()
            .ok()
            .filter(|op| self.table.contains_key(op))
            .ok_or_else(|| AuctionError::UnknownOperation(name.to_string()))
    }

    /// Registered operations in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::ALL.into_iter().filter(|op| self.table.contains_key(op))
    }

    /// Run `operation` against `store`.
    pub fn dispatch(
        &self,
        operation: Operation,
        store: &mut dyn RecordStore,
        config: &AuctionConfig,
        args: &[String],
    ) -> Result<Option<Vec<u8>>> {
        let handler = self
            .table
            .get(&operation)
            .ok_or_else(|| AuctionError::UnknownOperation(operation.name().to_string()))?;
        debug!(%operation, args = args.len(), "Dispatching");
        handler(store, config, args)
    }

    /// Resolve `name` and run it against `store`.
    pub fn invoke(
        &self,
        store: &mut dyn RecordStore,
        config: &AuctionConfig,
        name: &str,
        args: &[String],
    ) -> Result<Option<Vec<u8>>> {
        let operation = self.resolve(name)?;
        self.dispatch(operation, store, config, args)
    }
}
