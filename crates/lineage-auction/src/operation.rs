//! The closed set of operations exposed to external callers.

use std::fmt;
use std::str::FromStr;

use lineage_types::{AuctionError, Result};

/// One callable auction operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Operation {
    InitLedger,
    CreateMember,
    CreateAsset,
    CreateListing,
    MakeOffer,
    CloseBidding,
    Query,
}

impl Operation {
    pub const ALL: [Self; 7] = [
        Self::InitLedger,
        Self::CreateMember,
        Self::CreateAsset,
        Self::CreateListing,
        Self::MakeOffer,
        Self::CloseBidding,
        Self::Query,
    ];

    /// Wire name used by callers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::InitLedger => "initLedger",
            Self::CreateMember => "createMember",
            Self::CreateAsset => "createAsset",
            Self::CreateListing => "createListing",
            Self::MakeOffer => "makeOffer",
            Self::CloseBidding => "closeBidding",
            Self::Query => "query",
        }
    }

    /// Exact number of string arguments, including the record key.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::InitLedger => 0,
            Self::CreateMember => 4,
            Self::CreateAsset => 2,
            Self::CreateListing => 7,
            Self::MakeOffer => 3,
            Self::CloseBidding | Self::Query => 1,
        }
    }

    /// Whether the operation only reads the store.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        self == Self::Query
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| AuctionError::UnknownOperation(s.to_string()))
    }
}

/// Check the argument count of `operation` and return the arguments as a
/// fixed-size array for destructuring.
///
/// # Errors
/// Returns [`AuctionError::Validation`] if `args.len() != N`.
pub(crate) fn expect_args<const N: usize>(
    operation: Operation,
    args: &[String],
) -> Result<&[String; N]> {
    debug_assert_eq!(operation.arity(), N, "arity table out of sync for {operation}");
    <&[String; N]>::try_from(args).map_err(|_| AuctionError::Validation {
        operation: operation.name(),
        reason: format!(
            "Incorrect number of arguments. Expecting {N}, got {}",
            args.len()
        ),
    })
}
