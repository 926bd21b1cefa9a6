//! Member records: parties holding a cash balance.

use serde::{Deserialize, Serialize};

use crate::{Amount, Record, RecordKind};

/// A party that can own assets and bid on listings.
///
/// Missing name fields decode as empty strings; `balance` is required and
/// may be stored as an integer or a decimal-digit string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub balance: Amount,
}

impl Member {
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, balance: Amount) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            balance,
        }
    }

    /// Whether the member can cover `amount` from their balance.
    #[must_use]
    pub fn can_afford(&self, amount: Amount) -> bool {
        self.balance >= amount
    }
}

impl Record for Member {
    const KIND: RecordKind = RecordKind::Member;
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Member {
    pub fn dummy(balance: u64) -> Self {
        Self::new("Test", "Member", Amount(balance))
    }
}
