//! The trusted host around a [`LaunchpadPool`].
//!
//! Supplies the clock and caller identity, runs one command at a time, and
//! commits every state change to SQLite before exposing it. A mutating
//! command executes against a clone of the engine; the clone replaces the
//! live engine only after its snapshot and event are durably written.
//!
//! Every new time is written to the `host_clock` table before the engine
//! sees it, whether the command turns out to be a read, a rejection or a
//! commit. A restarted host therefore never hands out an earlier instant.

use launchpad_pool::{
    EngineParams, FeeEstimator, FixedFeeTable, LaunchpadPool, PoolParams, Receipt, Timestamp,
};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::commands::{Command, Outcome, Output, Request};
use crate::db;
use crate::errors::Result;
use crate::events::StoredEvent;

struct Engine {
    state: LaunchpadPool,
    /// Highest time handed to the engine so far.
    clock: Timestamp,
    /// Highest time known to be on disk.
    persisted: Timestamp,
}

impl Engine {
    /// Resolve the invocation time, never letting the clock run backwards.
    fn tick(&mut self, requested: Option<Timestamp>) -> Timestamp {
        let candidate = requested.unwrap_or_else(wall_clock);
        if candidate < self.clock {
            warn!(
                requested = candidate,
                clock = self.clock,
                "Clock would move backwards; clamping"
            );
            return self.clock;
        }
        self.clock = candidate;
        candidate
    }
}

fn wall_clock() -> Timestamp {
    chrono::Utc::now().timestamp().max(0) as Timestamp
}

pub struct Host {
    pool: SqlitePool,
    engine: Mutex<Engine>,
    fees: FixedFeeTable,
}

impl Host {
    /// Restore the last committed engine from `pool`, or start an empty one
    /// with `params`.
    pub async fn open(pool: SqlitePool, params: EngineParams, fees: FixedFeeTable) -> Result<Self> {
        let clock = db::load_clock(&pool).await?.unwrap_or(0);
        let state = match db::load_snapshot(&pool).await? {
            Some(snapshot) => {
                let state = LaunchpadPool::restore(snapshot)?;
                if state.params() != &params {
                    warn!(
                        "Configured vesting parameters differ from the snapshot; keeping the snapshot's"
                    );
                }
                info!(
                    pools = state.pool_count(),
                    proposals = state.proposal_count(),
                    clock,
                    "Restored engine snapshot"
                );
                state
            }
            None => {
                info!(clock, "No snapshot found; starting with an empty engine");
                LaunchpadPool::new(params)
            }
        };

        Ok(Self {
            pool,
            engine: Mutex::new(Engine {
                state,
                clock,
                persisted: clock,
            }),
            fees,
        })
    }

    /// Copy of the live engine, for inspection.
    pub async fn engine(&self) -> LaunchpadPool {
        self.engine.lock().await.state.clone()
    }

    /// Run one command to completion.
    pub async fn execute(&self, request: Request) -> Result<Outcome> {
        let mut engine = self.engine.lock().await;
        let now = engine.tick(request.at);
        if now > engine.persisted {
            db::save_clock(&self.pool, now).await?;
            engine.persisted = now;
        }
        let caller = request.caller;

        let outcome = match request.command {
            Command::CreatePool {
                token,
                token_price,
                soft_cap,
                hard_cap,
                start_time,
                end_time,
            } => {
                let params = PoolParams {
                    token,
                    token_price,
                    soft_cap,
                    hard_cap,
                    start_time,
                    end_time,
                };
                let receipt = self
                    .apply(&mut engine, now, |e| e.create_pool(now, &caller, params))
                    .await?;
                Outcome::committed(Output::Id(receipt.value), receipt.event)
            }
            Command::Invest { pool_id, amount } => {
                let receipt = self
                    .apply(&mut engine, now, |e| e.invest(now, &caller, pool_id, amount))
                    .await?;
                Outcome::committed(Output::Amount(receipt.value), receipt.event)
            }
            Command::ClaimTokens { pool_id } => {
                let receipt = self
                    .apply(&mut engine, now, |e| e.claim_tokens(now, &caller, pool_id))
                    .await?;
                Outcome::committed(Output::Amount(receipt.value), receipt.event)
            }
            Command::CreateProposal { title, description } => {
                let receipt = self
                    .apply(&mut engine, now, |e| {
                        Ok(e.create_proposal(now, &caller, title, description))
                    })
                    .await?;
                Outcome::committed(Output::Id(receipt.value), receipt.event)
            }
            Command::Vote {
                proposal_id,
                support,
            } => {
                let receipt = self
                    .apply(&mut engine, now, |e| e.vote(now, &caller, proposal_id, support))
                    .await?;
                Outcome::committed(Output::Empty, receipt.event)
            }
            Command::GetPool { pool_id } => {
                Outcome::read(Output::Pool(engine.state.get_pool(pool_id)?))
            }
            Command::GetInvestment { pool_id, investor } => {
                let investor = investor.unwrap_or(caller);
                Outcome::read(Output::Amount(
                    engine.state.get_investment(&investor, pool_id),
                ))
            }
            Command::GetVestingSchedule { pool_id, investor } => {
                let investor = investor.unwrap_or(caller);
                Outcome::read(Output::Vesting(
                    engine.state.get_vesting_schedule(&investor, pool_id)?,
                ))
            }
            Command::GetVote { proposal_id, voter } => {
                let voter = voter.unwrap_or(caller);
                Outcome::read(Output::Flag(engine.state.get_vote(proposal_id, &voter)?))
            }
            Command::GetProposal { proposal_id } => {
                Outcome::read(Output::Proposal(engine.state.get_proposal(proposal_id)?))
            }
            Command::EstimateFee {
                src_chain,
                dest_chain,
            } => Outcome::read(Output::Amount(
                self.fees.estimate_fee(src_chain, dest_chain)?,
            )),
        };

        Ok(outcome)
    }

    /// Run `op` on a clone of the engine and commit the result.
    async fn apply<T>(
        &self,
        engine: &mut Engine,
        now: Timestamp,
        op: impl FnOnce(&mut LaunchpadPool) -> std::result::Result<Receipt<T>, launchpad_pool::Error>,
    ) -> Result<Receipt<T>> {
        let mut next = engine.state.clone();
        let receipt = op(&mut next)?;

        let stored = StoredEvent::from_engine(&receipt.event, now)?;
        db::commit(&self.pool, &next.snapshot(), &stored).await?;

        engine.state = next;
        Ok(receipt)
    }
}
