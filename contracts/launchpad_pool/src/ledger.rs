//! Investment admission against a pool's window and hard cap.

use crate::types::{Amount, Pool, Timestamp};
use crate::Error;

/// Validate an investment of `amount` into `pool` at `now`.
///
/// Checks run in a fixed order: window, amount, cap. Returns the pool's
/// `total_raised` after the investment.
pub fn admit(pool: &Pool, now: Timestamp, amount: Amount) -> Result<Amount, Error> {
    if !pool.is_open(now) {
        return Err(Error::PoolNotActive);
    }
    if amount == 0 {
        return Err(Error::ZeroInvestment);
    }
    let total_raised = pool
        .total_raised
        .checked_add(amount)
        .ok_or(Error::HardCapExceeded)?;
    if total_raised > pool.hard_cap {
        return Err(Error::HardCapExceeded);
    }
    Ok(total_raised)
}
