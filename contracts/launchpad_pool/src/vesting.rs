//! # Vesting
//!
//! Entitlement and release math. Nothing here touches storage; the entry
//! points in `lib.rs` feed it ledger values and write back the result.
//!
//! Every investor's schedule starts at the pool's `end_time`:
//!
//! ```text
//!   end_time          cliff_end                       vesting_end
//!      |── cliff_duration ──|                               |
//!      |   nothing vested   |  CliffRelease: everything     |
//!      |                    |  Linear: entitlement * (now - end_time) / duration
//! ```
//!
//! Amounts use floor rounding throughout, so the sum of all releases can
//! never exceed the entitlement.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::types::{Amount, Timestamp, WAD};
use crate::Error;

/// 30 days.
pub const DEFAULT_CLIFF_DURATION: u64 = 2_592_000;

/// 180 days.
pub const DEFAULT_LINEAR_DURATION: u64 = 15_552_000;

/// Shape of the release curve after the cliff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VestingCurve {
    /// Full entitlement unlocks at `cliff_end`.
    CliffRelease,
    /// Linear release over `duration` seconds measured from the pool's
    /// `end_time`; the portion accrued during the cliff unlocks at `cliff_end`.
    Linear { duration: u64 },
}

/// Engine-wide vesting parameters, applied uniformly to every pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineParams {
    cliff_duration: u64,
    curve: VestingCurve,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            cliff_duration: DEFAULT_CLIFF_DURATION,
            curve: VestingCurve::CliffRelease,
        }
    }
}

impl EngineParams {
    /// Fails with `InvalidVestingConfig` when a linear curve is shorter than
    /// the cliff or has zero length.
    pub fn new(cliff_duration: u64, curve: VestingCurve) -> Result<Self, Error> {
        if let VestingCurve::Linear { duration } = curve {
            if duration == 0 || duration < cliff_duration {
                return Err(Error::InvalidVestingConfig);
            }
        }
        Ok(Self {
            cliff_duration,
            curve,
        })
    }

    pub fn cliff_duration(&self) -> u64 {
        self.cliff_duration
    }

    pub fn curve(&self) -> VestingCurve {
        self.curve
    }

    pub fn cliff_end(&self, pool_end: Timestamp) -> Result<Timestamp, Error> {
        pool_end
            .checked_add(self.cliff_duration)
            .ok_or(Error::ArithmeticOverflow)
    }

    pub fn vesting_end(&self, pool_end: Timestamp) -> Result<Timestamp, Error> {
        match self.curve {
            VestingCurve::CliffRelease => self.cliff_end(pool_end),
            VestingCurve::Linear { duration } => pool_end
                .checked_add(duration)
                .ok_or(Error::ArithmeticOverflow),
        }
    }
}

/// Tokens owed for `invested` payment units at `token_price`.
pub fn entitlement(invested: Amount, token_price: Amount) -> Result<Amount, Error> {
    if token_price == 0 {
        return Err(Error::InvalidTokenPrice);
    }
    div_wad(invested, token_price).ok_or(Error::ArithmeticOverflow)
}

/// Portion of `entitlement` vested at `now`.
pub fn vested_amount(
    entitlement: Amount,
    pool_end: Timestamp,
    now: Timestamp,
    params: &EngineParams,
) -> Result<Amount, Error> {
    if now < params.cliff_end(pool_end)? {
        return Ok(0);
    }
    match params.curve {
        VestingCurve::CliffRelease => Ok(entitlement),
        VestingCurve::Linear { duration } => {
            let elapsed = now - pool_end;
            if elapsed >= duration {
                return Ok(entitlement);
            }
            Ok(mul_div_floor(entitlement, elapsed, duration))
        }
    }
}

/// `amount * 10^18 / divisor`, floored.
///
/// The product is formed in 256 bits, so only a quotient above `u128::MAX`
/// yields `None`.
pub(crate) fn div_wad(amount: Amount, divisor: Amount) -> Option<Amount> {
    if divisor == 0 {
        return None;
    }
    let scaled = U256::from(amount) * U256::from(WAD);
    Amount::try_from(scaled / U256::from(divisor)).ok()
}

/// `value * num / den` for `num < den`, floored.
fn mul_div_floor(value: Amount, num: u64, den: u64) -> Amount {
    let (num, den) = (Amount::from(num), Amount::from(den));
    // (q*den + r) * num / den == q*num + r*num/den, and r*num < den^2 fits in u128.
    (value / den) * num + (value % den) * num / den
}
