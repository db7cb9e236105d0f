//! Application configuration loaded from environment variables.

use launchpad_pool::{
    vesting::{DEFAULT_CLIFF_DURATION, DEFAULT_LINEAR_DURATION},
    ChainId, EngineParams, FixedFeeTable, VestingCurve,
};

use crate::errors::{HostError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Seconds between pool end and the first claimable instant
    pub cliff_duration_secs: u64,
    /// `cliff` or `linear`
    pub vesting_curve: String,
    /// Length of the linear release, measured from pool end
    pub vesting_duration_secs: u64,
    /// Static bridge fee quotes, `src:dest=fee` separated by commas
    pub bridge_fees: FixedFeeTable,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./launchpad.db".to_string()),
            cliff_duration_secs: env_var("CLIFF_DURATION_SECS")
                .unwrap_or_else(|_| DEFAULT_CLIFF_DURATION.to_string())
                .parse()
                .map_err(|_| HostError::Config("Invalid CLIFF_DURATION_SECS".to_string()))?,
            vesting_curve: env_var("VESTING_CURVE").unwrap_or_else(|_| "cliff".to_string()),
            vesting_duration_secs: env_var("VESTING_DURATION_SECS")
                .unwrap_or_else(|_| DEFAULT_LINEAR_DURATION.to_string())
                .parse()
                .map_err(|_| HostError::Config("Invalid VESTING_DURATION_SECS".to_string()))?,
            bridge_fees: parse_fee_table(&env_var("BRIDGE_FEES").unwrap_or_default())?,
        })
    }

    /// Engine parameters described by this configuration.
    pub fn engine_params(&self) -> Result<EngineParams> {
        let curve = match self.vesting_curve.as_str() {
            "cliff" => VestingCurve::CliffRelease,
            "linear" => VestingCurve::Linear {
                duration: self.vesting_duration_secs,
            },
            other => {
                return Err(HostError::Config(format!(
                    "Invalid VESTING_CURVE: {other} (expected cliff or linear)"
                )))
            }
        };
        EngineParams::new(self.cliff_duration_secs, curve)
            .map_err(|e| HostError::Config(format!("Invalid vesting parameters: {e}")))
    }
}

/// Parse `src:dest=fee[,src:dest=fee...]`. Blank input yields an empty table.
pub fn parse_fee_table(raw: &str) -> Result<FixedFeeTable> {
    let mut table = FixedFeeTable::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let invalid = || HostError::Config(format!("Invalid BRIDGE_FEES entry: {entry}"));
        let (route, fee) = entry.split_once('=').ok_or_else(invalid)?;
        let (src, dest) = route.split_once(':').ok_or_else(invalid)?;
        let src: ChainId = src.trim().parse().map_err(|_| invalid())?;
        let dest: ChainId = dest.trim().parse().map_err(|_| invalid())?;
        let fee = fee.trim().parse().map_err(|_| invalid())?;
        table.insert(src, dest, fee);
    }
    Ok(table)
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| HostError::Config(format!("Missing env var: {key}")))
}
