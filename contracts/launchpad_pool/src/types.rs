//! # Types
//!
//! Shared data structures used across all modules of the launchpad engine.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Pool` is internally stored as two separate entries:
//!
//! - [`PoolConfig`]: written once at creation; never mutated.
//! - [`PoolState`]: written on every successful investment.
//!
//! The public API exposes the reconstructed [`Pool`] struct for convenience.
//!
//! ### Phases are derived, not stored
//!
//! [`PoolPhase`] is computed from the pool window, the engine's cliff and the
//! caller-supplied `now`:
//!
//! ```text
//! Upcoming ──► Active ──► PostWindow ──► CliffElapsed
//! ```
//!
//! There is no explicit close; transitions are purely time-driven.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Token and payment amounts, 18-decimal fixed point.
pub type Amount = u128;

/// Seconds since the Unix epoch, supplied by the host on every call.
pub type Timestamp = u64;

/// `1.0` in 18-decimal fixed point (`10^18`).
pub const WAD: Amount = 1_000_000_000_000_000_000;

/// Opaque account or asset identifier (address-equivalent).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Address {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Arguments to `create_pool`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// Asset being sold.
    pub token: Address,
    /// Payment units per whole token.
    #[serde(with = "decimal")]
    pub token_price: Amount,
    #[serde(with = "decimal")]
    pub soft_cap: Amount,
    #[serde(with = "decimal")]
    pub hard_cap: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// Immutable pool configuration, written once at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub id: u64,
    pub creator: Address,
    pub token: Address,
    #[serde(with = "decimal")]
    pub token_price: Amount,
    #[serde(with = "decimal")]
    pub soft_cap: Amount,
    #[serde(with = "decimal")]
    pub hard_cap: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub created_at: Timestamp,
}

/// Mutable pool state, updated on investments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    #[serde(with = "decimal")]
    pub total_raised: Amount,
}

/// Full representation of a fundraising pool.
///
/// Used as the public API return type; reconstructed internally from
/// the split `PoolConfig` + `PoolState` entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Sequential identifier, never reused.
    pub id: u64,
    /// Caller that created the pool.
    pub creator: Address,
    /// Asset distributed to investors.
    pub token: Address,
    /// Payment units per whole token (18 decimals).
    #[serde(with = "decimal")]
    pub token_price: Amount,
    /// Minimum viable raise.
    #[serde(with = "decimal")]
    pub soft_cap: Amount,
    /// Absolute maximum raise.
    #[serde(with = "decimal")]
    pub hard_cap: Amount,
    /// First instant investments are accepted (inclusive).
    pub start_time: Timestamp,
    /// Last instant investments are accepted (inclusive).
    pub end_time: Timestamp,
    pub created_at: Timestamp,
    /// Sum of all investments; never exceeds `hard_cap`.
    #[serde(with = "decimal")]
    pub total_raised: Amount,
}

impl Pool {
    pub(crate) fn from_parts(config: &PoolConfig, state: &PoolState) -> Self {
        Self {
            id: config.id,
            creator: config.creator.clone(),
            token: config.token.clone(),
            token_price: config.token_price,
            soft_cap: config.soft_cap,
            hard_cap: config.hard_cap,
            start_time: config.start_time,
            end_time: config.end_time,
            created_at: config.created_at,
            total_raised: state.total_raised,
        }
    }

    /// Whether `now` falls inside the inclusive investment window.
    pub fn is_open(&self, now: Timestamp) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    pub fn soft_cap_reached(&self) -> bool {
        self.total_raised >= self.soft_cap
    }

    /// Room left under the hard cap.
    pub fn remaining_capacity(&self) -> Amount {
        self.hard_cap.saturating_sub(self.total_raised)
    }
}

/// Time-driven lifecycle position of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolPhase {
    /// Before `start_time`.
    Upcoming,
    /// Accepting investments.
    Active,
    /// Window closed; vesting clock running.
    PostWindow,
    /// Claims permitted.
    CliffElapsed,
}

/// Per-investor vesting view, derived from the ledger on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub pool_id: u64,
    pub investor: Address,
    /// Tokens owed: `investment / token_price`, rounded down.
    #[serde(with = "decimal")]
    pub total_entitlement: Amount,
    /// First instant any tokens vest.
    pub cliff_end: Timestamp,
    /// Instant the whole entitlement is vested.
    pub vesting_end: Timestamp,
    /// Tokens already released.
    #[serde(with = "decimal")]
    pub claimed_amount: Amount,
}

impl VestingSchedule {
    pub fn remaining(&self) -> Amount {
        self.total_entitlement.saturating_sub(self.claimed_amount)
    }

    pub fn is_fully_claimed(&self) -> bool {
        self.total_entitlement > 0 && self.claimed_amount >= self.total_entitlement
    }
}

/// A single recorded vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub support: bool,
    pub cast_at: Timestamp,
}

/// A governance proposal open for yes/no voting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub title: String,
    pub description: String,
    pub created_at: Timestamp,
    pub yes_votes: u64,
    pub no_votes: u64,
    /// At most one entry per voter.
    pub votes: BTreeMap<Address, VoteRecord>,
}

/// Serde adapter writing an [`Amount`] as a decimal string.
///
/// Amounts routinely exceed 2^53, which JSON consumers backed by doubles
/// cannot represent exactly. Input must be a string too.
pub mod decimal {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid amount: {raw}")))
    }
}
