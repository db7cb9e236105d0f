//! # Storage
//!
//! Typed helpers over the engine's registries.
//!
//! ## Counters
//!
//! | Field            | Type  | Description                          |
//! |------------------|-------|--------------------------------------|
//! | `pool_count`     | `u64` | Auto-increment pool ID counter       |
//! | `proposal_count` | `u64` | Auto-increment proposal ID counter   |
//!
//! ## Per-entity maps
//!
//! | Field          | Key                   | Value        | Description                    |
//! |----------------|-----------------------|--------------|--------------------------------|
//! | `pool_configs` | pool id               | `PoolConfig` | Immutable pool configuration   |
//! | `pool_states`  | pool id               | `PoolState`  | Mutable pool state             |
//! | `investments`  | pool id → investor    | `Amount`     | Cumulative contribution        |
//! | `claims`       | pool id → investor    | `Amount`     | Tokens released so far         |
//! | `proposals`    | proposal id           | `Proposal`   | Proposal with its vote records |
//!
//! Investments and claims are keyed pool-first so that a pool's investors can
//! be walked in order without scanning the whole ledger.
//!
//! ## Snapshots
//!
//! [`Snapshot`] is the persisted image of an engine. It carries
//! [`STORAGE_VERSION`]; `LaunchpadPool::restore` refuses any other version.
//! Bump the version whenever a field above changes shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, Pool, PoolConfig, PoolState, Proposal};
use crate::vesting::EngineParams;

/// Current layout version of [`Snapshot`].
pub const STORAGE_VERSION: u32 = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Storage {
    pool_count: u64,
    proposal_count: u64,
    pool_configs: BTreeMap<u64, PoolConfig>,
    pool_states: BTreeMap<u64, PoolState>,
    investments: BTreeMap<u64, BTreeMap<Address, Amount>>,
    claims: BTreeMap<u64, BTreeMap<Address, Amount>>,
    proposals: BTreeMap<u64, Proposal>,
}

/// Versioned, serializable image of an engine's full state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    version: u32,
    pub(crate) params: EngineParams,
    pub(crate) storage: Storage,
}

impl Snapshot {
    pub(crate) fn new(params: EngineParams, storage: Storage) -> Self {
        Self {
            version: STORAGE_VERSION,
            params,
            storage,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }
}

impl Storage {
    // ── Pools ────────────────────────────────────────────────────────

    /// Reads, increments, and stores the pool counter.
    /// Returns the ID to use for the *current* pool (pre-increment value).
    pub fn get_and_increment_pool_id(&mut self) -> u64 {
        let current = self.pool_count;
        self.pool_count = current + 1;
        current
    }

    pub fn pool_count(&self) -> u64 {
        self.pool_count
    }

    /// Save both the immutable config and initial mutable state for a new pool.
    pub fn save_pool(&mut self, config: PoolConfig, state: PoolState) {
        let id = config.id;
        self.pool_configs.insert(id, config);
        self.pool_states.insert(id, state);
    }

    /// Load the full `Pool` by combining config and state.
    pub fn load_pool(&self, id: u64) -> Option<Pool> {
        let config = self.load_pool_config(id)?;
        let state = self.load_pool_state(id)?;
        Some(Pool::from_parts(config, state))
    }

    /// Load only the immutable pool configuration.
    pub fn load_pool_config(&self, id: u64) -> Option<&PoolConfig> {
        self.pool_configs.get(&id)
    }

    /// Load only the mutable pool state.
    pub fn load_pool_state(&self, id: u64) -> Option<&PoolState> {
        self.pool_states.get(&id)
    }

    /// Save only the mutable pool state.
    pub fn save_pool_state(&mut self, id: u64, state: PoolState) {
        self.pool_states.insert(id, state);
    }

    // ── Investments ──────────────────────────────────────────────────

    /// Cumulative contribution of `investor` to `pool_id`; zero if none.
    pub fn investment(&self, pool_id: u64, investor: &Address) -> Amount {
        self.investments
            .get(&pool_id)
            .and_then(|by_investor| by_investor.get(investor))
            .copied()
            .unwrap_or(0)
    }

    pub fn save_investment(&mut self, pool_id: u64, investor: &Address, amount: Amount) {
        self.investments
            .entry(pool_id)
            .or_default()
            .insert(investor.clone(), amount);
    }

    /// All investors of a pool in address order.
    pub fn investors(&self, pool_id: u64) -> impl Iterator<Item = (&Address, Amount)> {
        self.investments
            .get(&pool_id)
            .into_iter()
            .flat_map(|by_investor| by_investor.iter().map(|(a, v)| (a, *v)))
    }

    // ── Claims ───────────────────────────────────────────────────────

    pub fn claimed(&self, pool_id: u64, investor: &Address) -> Amount {
        self.claims
            .get(&pool_id)
            .and_then(|by_investor| by_investor.get(investor))
            .copied()
            .unwrap_or(0)
    }

    pub fn save_claimed(&mut self, pool_id: u64, investor: &Address, amount: Amount) {
        self.claims
            .entry(pool_id)
            .or_default()
            .insert(investor.clone(), amount);
    }

    // ── Proposals ────────────────────────────────────────────────────

    pub fn get_and_increment_proposal_id(&mut self) -> u64 {
        let current = self.proposal_count;
        self.proposal_count = current + 1;
        current
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposal_count
    }

    pub fn save_proposal(&mut self, proposal: Proposal) {
        self.proposals.insert(proposal.id, proposal);
    }

    pub fn load_proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn load_proposal_mut(&mut self, id: u64) -> Option<&mut Proposal> {
        self.proposals.get_mut(&id)
    }
}
