//! # Launchpad Pool Engine
//!
//! State machine behind a token-launchpad fundraising contract. It exposes
//! the single engine type [`LaunchpadPool`] whose entry points cover the
//! full pool lifecycle plus a standalone proposal vote:
//!
//! | Phase        | Entry Point(s)                                             |
//! |--------------|------------------------------------------------------------|
//! | Registration | [`LaunchpadPool::create_pool`]                             |
//! | Funding      | [`LaunchpadPool::invest`]                                  |
//! | Vesting      | [`LaunchpadPool::claim_tokens`]                            |
//! | Governance   | [`LaunchpadPool::create_proposal`], [`LaunchpadPool::vote`] |
//! | Queries      | `get_pool`, `get_investment`, `get_vesting_schedule`, `get_vote`, ... |
//!
//! ## Host contract
//!
//! The engine does no I/O and owns no clock. The host passes the current
//! time and the caller identity into every call, serializes calls, and
//! commits the returned state. A failed call leaves the engine unchanged:
//! every entry point validates completely before its first write.
//!
//! Storage access is delegated to `storage`, release math to [`vesting`].
//! This file contains the public entry points and event construction.

use thiserror::Error;
use tracing::debug;

mod events;
pub mod fees;
mod governance;
mod ledger;
mod registry;
mod storage;
mod types;
pub mod vesting;

#[cfg(test)]
mod test_governance;
#[cfg(test)]
mod test_vesting;

pub use events::{
    InvestmentMade, LaunchpadEvent, PoolCreated, ProposalCreated, Receipt, TokensClaimed, VoteCast,
};
pub use fees::{ChainId, FeeEstimateError, FeeEstimator, FixedFeeTable};
pub use storage::{Snapshot, STORAGE_VERSION};
pub use types::decimal;
pub use types::{
    Address, Amount, Pool, PoolParams, PoolPhase, Proposal, Timestamp, VestingSchedule,
    VoteRecord, WAD,
};
pub use vesting::{EngineParams, VestingCurve};

use storage::Storage;
use types::{PoolConfig, PoolState};

/// Every way an entry point can reject a call.
///
/// Discriminants are stable so hosts can persist them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Error)]
#[repr(u32)]
pub enum Error {
    #[error("pool not found")]
    PoolNotFound = 1,
    #[error("proposal not found")]
    ProposalNotFound = 2,
    #[error("vote not found")]
    VoteNotFound = 3,
    #[error("invalid cap configuration")]
    InvalidCapConfiguration = 4,
    #[error("start time must be before end time")]
    InvalidTimeWindow = 5,
    #[error("pool not active")]
    PoolNotActive = 6,
    #[error("investment must be positive")]
    ZeroInvestment = 7,
    #[error("hard cap exceeded")]
    HardCapExceeded = 8,
    #[error("no investment in pool")]
    NoEntitlement = 9,
    #[error("cliff period not over")]
    CliffNotElapsed = 10,
    #[error("nothing to claim")]
    NothingToClaim = 11,
    #[error("already voted")]
    DuplicateVote = 12,
    #[error("token price must be positive")]
    InvalidTokenPrice = 13,
    #[error("numeric overflow")]
    ArithmeticOverflow = 14,
    #[error("invalid vesting configuration")]
    InvalidVestingConfig = 15,
    #[error("unsupported snapshot version")]
    UnsupportedSnapshotVersion = 16,
}

impl Error {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// The pool ledger, vesting engine and governance registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchpadPool {
    params: EngineParams,
    storage: Storage,
}

impl LaunchpadPool {
    pub fn new(params: EngineParams) -> Self {
        Self {
            params,
            storage: Storage::default(),
        }
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    // ─────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────

    /// Capture the full engine state for persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.params, self.storage.clone())
    }

    /// Rebuild an engine from a persisted [`Snapshot`].
    ///
    /// Rejects snapshots written under another layout version and re-checks
    /// the vesting parameters they carry.
    pub fn restore(snapshot: Snapshot) -> Result<Self, Error> {
        if snapshot.version() != STORAGE_VERSION {
            return Err(Error::UnsupportedSnapshotVersion);
        }
        let params = EngineParams::new(snapshot.params.cliff_duration(), snapshot.params.curve())?;
        Ok(Self {
            params,
            storage: snapshot.storage,
        })
    }

    // ─────────────────────────────────────────────────────────
    // Pool registry
    // ─────────────────────────────────────────────────────────

    /// Register a new fundraising pool with `total_raised = 0`.
    ///
    /// Fails with `InvalidCapConfiguration` unless `0 < soft_cap <= hard_cap`,
    /// with `InvalidTimeWindow` unless `start_time < end_time`, and with
    /// `InvalidTokenPrice` for a zero price.
    pub fn create_pool(
        &mut self,
        now: Timestamp,
        creator: &Address,
        params: PoolParams,
    ) -> Result<Receipt<u64>, Error> {
        registry::validate_pool_params(&params)?;

        let id = self.storage.get_and_increment_pool_id();
        let config = PoolConfig {
            id,
            creator: creator.clone(),
            token: params.token,
            token_price: params.token_price,
            soft_cap: params.soft_cap,
            hard_cap: params.hard_cap,
            start_time: params.start_time,
            end_time: params.end_time,
            created_at: now,
        };
        let event = PoolCreated {
            pool_id: id,
            creator: config.creator.clone(),
            token: config.token.clone(),
            token_price: config.token_price,
            soft_cap: config.soft_cap,
            hard_cap: config.hard_cap,
            start_time: config.start_time,
            end_time: config.end_time,
        };
        self.storage.save_pool(config, PoolState::default());

        debug!(pool_id = id, creator = %creator, token = %event.token, "pool created");
        Ok(Receipt::new(id, event))
    }

    /// Retrieve a pool by its ID.
    pub fn get_pool(&self, pool_id: u64) -> Result<Pool, Error> {
        self.storage.load_pool(pool_id).ok_or(Error::PoolNotFound)
    }

    pub fn pool_count(&self) -> u64 {
        self.storage.pool_count()
    }

    /// Where `pool_id` sits in its time-driven lifecycle at `now`.
    pub fn pool_phase(&self, pool_id: u64, now: Timestamp) -> Result<PoolPhase, Error> {
        let pool = self.get_pool(pool_id)?;
        registry::phase(&pool, now, &self.params)
    }

    // ─────────────────────────────────────────────────────────
    // Investment ledger
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` to a pool's raise.
    ///
    /// Checked in order: pool exists, `now` within `[start_time, end_time]`,
    /// `amount > 0`, `total_raised + amount <= hard_cap`. Returns the
    /// investor's cumulative contribution. Transfer of the payment itself is
    /// the host's job and must commit together with this call.
    pub fn invest(
        &mut self,
        now: Timestamp,
        investor: &Address,
        pool_id: u64,
        amount: Amount,
    ) -> Result<Receipt<Amount>, Error> {
        let pool = self.get_pool(pool_id)?;
        let total_raised = ledger::admit(&pool, now, amount)?;
        let cumulative = self
            .storage
            .investment(pool_id, investor)
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;

        self.storage
            .save_pool_state(pool_id, PoolState { total_raised });
        self.storage.save_investment(pool_id, investor, cumulative);

        debug!(pool_id, investor = %investor, amount, total_raised, "investment recorded");
        Ok(Receipt::new(
            cumulative,
            InvestmentMade {
                pool_id,
                investor: investor.clone(),
                amount,
            },
        ))
    }

    /// Cumulative contribution; zero for addresses that never invested.
    pub fn get_investment(&self, investor: &Address, pool_id: u64) -> Amount {
        self.storage.investment(pool_id, investor)
    }

    /// Every investor of a pool with their cumulative contribution.
    pub fn investors(&self, pool_id: u64) -> Result<Vec<(Address, Amount)>, Error> {
        self.get_pool(pool_id)?;
        Ok(self
            .storage
            .investors(pool_id)
            .map(|(investor, amount)| (investor.clone(), amount))
            .collect())
    }

    // ─────────────────────────────────────────────────────────
    // Vesting
    // ─────────────────────────────────────────────────────────

    /// Release everything vested but not yet claimed.
    ///
    /// Fails with `NoEntitlement` when the investor never contributed, with
    /// `CliffNotElapsed` before `end_time + cliff_duration`, and with
    /// `NothingToClaim` when the unclaimed vested remainder is zero.
    /// Returns the amount released.
    pub fn claim_tokens(
        &mut self,
        now: Timestamp,
        investor: &Address,
        pool_id: u64,
    ) -> Result<Receipt<Amount>, Error> {
        let config = self
            .storage
            .load_pool_config(pool_id)
            .ok_or(Error::PoolNotFound)?;
        let (pool_end, token_price) = (config.end_time, config.token_price);

        let invested = self.storage.investment(pool_id, investor);
        if invested == 0 {
            return Err(Error::NoEntitlement);
        }
        if now < self.params.cliff_end(pool_end)? {
            return Err(Error::CliffNotElapsed);
        }

        let entitlement = vesting::entitlement(invested, token_price)?;
        let vested = vesting::vested_amount(entitlement, pool_end, now, &self.params)?;
        let claimed = self.storage.claimed(pool_id, investor);
        let releasable = vested.saturating_sub(claimed);
        if releasable == 0 {
            return Err(Error::NothingToClaim);
        }

        self.storage
            .save_claimed(pool_id, investor, claimed + releasable);

        debug!(pool_id, investor = %investor, releasable, entitlement, "tokens claimed");
        Ok(Receipt::new(
            releasable,
            TokensClaimed {
                pool_id,
                investor: investor.clone(),
                amount: releasable,
            },
        ))
    }

    /// Vesting view for `investor` in `pool_id`, computed from the ledger.
    ///
    /// Available before any claim; an address without investment gets a zero
    /// entitlement rather than an error.
    pub fn get_vesting_schedule(
        &self,
        investor: &Address,
        pool_id: u64,
    ) -> Result<VestingSchedule, Error> {
        let config = self
            .storage
            .load_pool_config(pool_id)
            .ok_or(Error::PoolNotFound)?;
        let invested = self.storage.investment(pool_id, investor);

        Ok(VestingSchedule {
            pool_id,
            investor: investor.clone(),
            total_entitlement: vesting::entitlement(invested, config.token_price)?,
            cliff_end: self.params.cliff_end(config.end_time)?,
            vesting_end: self.params.vesting_end(config.end_time)?,
            claimed_amount: self.storage.claimed(pool_id, investor),
        })
    }

    /// Amount `claim_tokens` would release at `now`; zero before the cliff.
    pub fn claimable(
        &self,
        now: Timestamp,
        investor: &Address,
        pool_id: u64,
    ) -> Result<Amount, Error> {
        let pool_end = self
            .storage
            .load_pool_config(pool_id)
            .ok_or(Error::PoolNotFound)?
            .end_time;
        let schedule = self.get_vesting_schedule(investor, pool_id)?;
        let vested =
            vesting::vested_amount(schedule.total_entitlement, pool_end, now, &self.params)?;
        Ok(vested.saturating_sub(schedule.claimed_amount))
    }

    // ─────────────────────────────────────────────────────────
    // Governance
    // ─────────────────────────────────────────────────────────

    /// Open a new proposal. Anyone may propose.
    pub fn create_proposal(
        &mut self,
        now: Timestamp,
        proposer: &Address,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Receipt<u64> {
        let id = self.storage.get_and_increment_proposal_id();
        self.storage.save_proposal(Proposal::new(
            id,
            proposer.clone(),
            title.into(),
            description.into(),
            now,
        ));

        debug!(proposal_id = id, proposer = %proposer, "proposal created");
        Receipt::new(
            id,
            ProposalCreated {
                proposal_id: id,
                proposer: proposer.clone(),
            },
        )
    }

    /// Cast `voter`'s single vote on a proposal.
    pub fn vote(
        &mut self,
        now: Timestamp,
        voter: &Address,
        proposal_id: u64,
        support: bool,
    ) -> Result<Receipt<()>, Error> {
        let proposal = self
            .storage
            .load_proposal_mut(proposal_id)
            .ok_or(Error::ProposalNotFound)?;
        proposal.record_vote(voter, support, now)?;

        debug!(proposal_id, voter = %voter, support, "vote cast");
        Ok(Receipt::new(
            (),
            VoteCast {
                proposal_id,
                voter: voter.clone(),
                support,
            },
        ))
    }

    /// The recorded choice of `voter`.
    ///
    /// Never-voted is `VoteNotFound`, distinct from a recorded `false`.
    pub fn get_vote(&self, proposal_id: u64, voter: &Address) -> Result<bool, Error> {
        self.storage
            .load_proposal(proposal_id)
            .ok_or(Error::ProposalNotFound)?
            .vote_of(voter)
            .ok_or(Error::VoteNotFound)
    }

    pub fn get_proposal(&self, proposal_id: u64) -> Result<Proposal, Error> {
        self.storage
            .load_proposal(proposal_id)
            .cloned()
            .ok_or(Error::ProposalNotFound)
    }

    pub fn proposal_count(&self) -> u64 {
        self.storage.proposal_count()
    }
}
