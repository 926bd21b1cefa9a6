//! Money amounts for member balances, reserve prices, and bids.
//!
//! An [`Amount`] is a strict non-negative integer. Stored records may carry
//! amounts either as JSON integers or as decimal-digit strings (the
//! representation produced by string-typed call arguments); both decode
//! to the same value, and encoding always emits a JSON integer.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{AuctionError, Result};

/// A non-negative integer quantity of money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Amount(pub u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Coerce a string call argument into an amount.
    ///
    /// # Errors
    /// Returns [`AuctionError::Type`] naming `field` if `raw` is not a
    /// non-negative decimal integer.
    pub fn parse_arg(field: &'static str, raw: &str) -> Result<Self> {
        raw.parse().map_err(|_| AuctionError::Type {
            field,
            value: raw.to_string(),
        })
    }
}

/// Error returned when a string is not a non-negative decimal integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError(String);

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a non-negative integer amount: {:?}", self.0)
    }
}

impl std::error::Error for ParseAmountError {}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        // u64::from_str accepts a leading '+', which is not a plain digit string.
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseAmountError(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

/// Message prefix for a stored value that cannot be coerced to an amount.
/// [`Record::decode`](crate::Record::decode) maps it to [`AuctionError::Type`].
pub(crate) const NOT_AN_AMOUNT: &str = "not an amount: ";

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal-digit string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
        Ok(Amount(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Amount, E> {
        u64::try_from(v)
            .map(Amount)
            .map_err(|_| E::custom(format!("{NOT_AN_AMOUNT}{v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Amount, E> {
        Err(E::custom(format!("{NOT_AN_AMOUNT}{v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
        v.parse().map_err(|_| E::custom(format!("{NOT_AN_AMOUNT}{v}")))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
