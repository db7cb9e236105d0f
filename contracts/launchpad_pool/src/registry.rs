//! Pool creation rules and phase derivation.

use crate::types::{Pool, PoolParams, PoolPhase, Timestamp};
use crate::vesting::EngineParams;
use crate::Error;

/// Check creation parameters before any id is assigned.
pub fn validate_pool_params(params: &PoolParams) -> Result<(), Error> {
    if params.soft_cap == 0 || params.hard_cap == 0 || params.soft_cap > params.hard_cap {
        return Err(Error::InvalidCapConfiguration);
    }
    if params.start_time >= params.end_time {
        return Err(Error::InvalidTimeWindow);
    }
    if params.token_price == 0 {
        return Err(Error::InvalidTokenPrice);
    }
    Ok(())
}

pub fn phase(pool: &Pool, now: Timestamp, params: &EngineParams) -> Result<PoolPhase, Error> {
    if now < pool.start_time {
        return Ok(PoolPhase::Upcoming);
    }
    if now <= pool.end_time {
        return Ok(PoolPhase::Active);
    }
    if now < params.cliff_end(pool.end_time)? {
        Ok(PoolPhase::PostWindow)
    } else {
        Ok(PoolPhase::CliffElapsed)
    }
}
