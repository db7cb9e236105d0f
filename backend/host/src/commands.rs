//! Line-delimited JSON command protocol.
//!
//! Each input line is one [`Request`]:
//!
//! ```json
//! {"caller": "0xinvestor", "at": 1700000000, "op": "invest", "pool_id": 0, "amount": "1000000000000000000"}
//! ```
//!
//! `at` is optional; without it the host uses the wall clock. Amounts are
//! decimal strings of 18-decimal fixed-point integers, in requests as well
//! as in responses and events. Each request produces one [`Response`] line.

use launchpad_pool::{
    decimal, Address, Amount, ChainId, LaunchpadEvent, Pool, Proposal, Timestamp,
    VestingSchedule,
};
use serde::{Deserialize, Serialize};

use crate::errors::HostError;

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Identity on whose behalf the command runs.
    pub caller: Address,
    /// Explicit invocation time, unix seconds.
    #[serde(default)]
    pub at: Option<Timestamp>,
    #[serde(flatten)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    CreatePool {
        token: Address,
        #[serde(deserialize_with = "decimal::deserialize")]
        token_price: Amount,
        #[serde(deserialize_with = "decimal::deserialize")]
        soft_cap: Amount,
        #[serde(deserialize_with = "decimal::deserialize")]
        hard_cap: Amount,
        start_time: Timestamp,
        end_time: Timestamp,
    },
    Invest {
        pool_id: u64,
        #[serde(deserialize_with = "decimal::deserialize")]
        amount: Amount,
    },
    ClaimTokens {
        pool_id: u64,
    },
    CreateProposal {
        title: String,
        #[serde(default)]
        description: String,
    },
    Vote {
        proposal_id: u64,
        support: bool,
    },
    GetPool {
        pool_id: u64,
    },
    /// `investor` defaults to the caller.
    GetInvestment {
        pool_id: u64,
        #[serde(default)]
        investor: Option<Address>,
    },
    /// `investor` defaults to the caller.
    GetVestingSchedule {
        pool_id: u64,
        #[serde(default)]
        investor: Option<Address>,
    },
    /// `voter` defaults to the caller.
    GetVote {
        proposal_id: u64,
        #[serde(default)]
        voter: Option<Address>,
    },
    GetProposal {
        proposal_id: u64,
    },
    EstimateFee {
        src_chain: ChainId,
        dest_chain: ChainId,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatePool { .. } => "create_pool",
            Self::Invest { .. } => "invest",
            Self::ClaimTokens { .. } => "claim_tokens",
            Self::CreateProposal { .. } => "create_proposal",
            Self::Vote { .. } => "vote",
            Self::GetPool { .. } => "get_pool",
            Self::GetInvestment { .. } => "get_investment",
            Self::GetVestingSchedule { .. } => "get_vesting_schedule",
            Self::GetVote { .. } => "get_vote",
            Self::GetProposal { .. } => "get_proposal",
            Self::EstimateFee { .. } => "estimate_fee",
        }
    }

    /// Whether the command changes engine state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::CreatePool { .. }
                | Self::Invest { .. }
                | Self::ClaimTokens { .. }
                | Self::CreateProposal { .. }
                | Self::Vote { .. }
        )
    }
}

/// Value produced by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Id(u64),
    Amount(#[serde(serialize_with = "decimal::serialize")] Amount),
    Flag(bool),
    Pool(Pool),
    Vesting(VestingSchedule),
    Proposal(Proposal),
    Empty,
}

/// A successful command: its value plus the event it emitted, if it mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub value: Output,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<LaunchpadEvent>,
}

impl Outcome {
    pub fn read(value: Output) -> Self {
        Self { value, event: None }
    }

    pub fn committed(value: Output, event: LaunchpadEvent) -> Self {
        Self {
            value,
            event: Some(event),
        }
    }
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Ok(Outcome),
    Error { code: u32, message: String },
}

impl From<Result<Outcome, HostError>> for Response {
    fn from(result: Result<Outcome, HostError>) -> Self {
        match result {
            Ok(outcome) => Self::Ok(outcome),
            Err(e) => Self::Error {
                code: e.code(),
                message: e.to_string(),
            },
        }
    }
}
