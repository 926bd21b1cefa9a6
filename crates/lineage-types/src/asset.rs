//! Asset records: the single item put up for auction.

use serde::{Deserialize, Serialize};

use crate::{MemberId, Record, RecordKind};

/// An auctionable item. Only its current owner is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub owner: MemberId,
}

impl Asset {
    #[must_use]
    pub fn new(owner: MemberId) -> Self {
        Self { owner }
    }

    #[must_use]
    pub fn is_owned_by(&self, member: &MemberId) -> bool {
        &self.owner == member
    }
}

impl Record for Asset {
    const KIND: RecordKind = RecordKind::Asset;
}
