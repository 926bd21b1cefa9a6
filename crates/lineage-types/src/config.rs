//! Configuration for the auction engine and its host runtime.
//!
//! Every field has a default, so a config file only needs to name the
//! values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AuctionError, Result, constants};

/// What a create operation does when its key already holds a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatePolicy {
    /// Fail with `LA_ERR_201` and write nothing.
    #[default]
    Reject,
    /// Replace the stored record (legacy behavior).
    Overwrite,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Duplicate-key behavior of `createMember`, `createAsset`, `createListing`.
    pub create_policy: CreatePolicy,
    /// Require `createAsset` owners and `createListing` assets to exist.
    pub verify_references: bool,
    /// Re-runs allowed after a transaction conflict before giving up.
    pub max_conflict_retries: u32,
    /// Records written by `initLedger`.
    pub seed: SeedConfig,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            create_policy: CreatePolicy::Reject,
            verify_references: true,
            max_conflict_retries: constants::DEFAULT_MAX_CONFLICT_RETRIES,
            seed: SeedConfig::default(),
        }
    }
}

impl AuctionConfig {
    /// Settings matching the historical chaincode: silent overwrites and
    /// no reference checks on create.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            create_policy: CreatePolicy::Overwrite,
            verify_references: false,
            ..Self::default()
        }
    }

    /// Parse a JSON config document.
    ///
    /// # Errors
    /// Returns [`AuctionError::Configuration`] on malformed JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AuctionError::Configuration(e.to_string()))
    }

    /// Load a JSON config file.
    ///
    /// # Errors
    /// Returns [`AuctionError::Io`] if the file cannot be read and
    /// [`AuctionError::Configuration`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Seed member written by `initLedger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedMember {
    pub key: String,
    pub first_name: String,
    pub last_name: String,
    pub balance: u64,
}

/// Records written by `initLedger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub members: Vec<SeedMember>,
    pub asset_key: String,
    /// Key of the seed member owning the seed asset.
    pub asset_owner: String,
    pub listing_key: String,
    pub reserve_price: u64,
    pub description: String,
    pub species: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let member = |key: &str, first: &str, last: &str| SeedMember {
            key: key.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            balance: constants::SEED_MEMBER_BALANCE,
        };
        Self {
            members: vec![
                member(constants::SEED_MEMBER_A, "firstname1", "lastname1"),
                member(constants::SEED_MEMBER_B, "firstname2", "lastname2"),
                member(constants::SEED_MEMBER_C, "firstname3", "lastname3"),
            ],
            asset_key: constants::SEED_ASSET.to_string(),
            asset_owner: constants::SEED_MEMBER_A.to_string(),
            listing_key: constants::SEED_LISTING.to_string(),
            reserve_price: constants::SEED_RESERVE_PRICE,
            description: constants::SEED_LISTING_DESCRIPTION.to_string(),
            species: constants::SEED_LISTING_SPECIES.to_string(),
        }
    }
}
