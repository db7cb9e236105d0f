//! # Events
//!
//! Every state-changing entry point returns exactly one [`LaunchpadEvent`]
//! inside a [`Receipt`]. The host decides where events go; the engine keeps
//! no log of its own.
//!
//! | Topic      | Payload            | Emitted by        |
//! |------------|--------------------|-------------------|
//! | `created`  | [`PoolCreated`]    | `create_pool`     |
//! | `invested` | [`InvestmentMade`] | `invest`          |
//! | `claimed`  | [`TokensClaimed`]  | `claim_tokens`    |
//! | `proposed` | [`ProposalCreated`]| `create_proposal` |
//! | `voted`    | [`VoteCast`]       | `vote`            |

use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCreated {
    pub pool_id: u64,
    pub creator: Address,
    pub token: Address,
    #[serde(with = "crate::types::decimal")]
    pub token_price: Amount,
    #[serde(with = "crate::types::decimal")]
    pub soft_cap: Amount,
    #[serde(with = "crate::types::decimal")]
    pub hard_cap: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentMade {
    pub pool_id: u64,
    pub investor: Address,
    #[serde(with = "crate::types::decimal")]
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensClaimed {
    pub pool_id: u64,
    pub investor: Address,
    #[serde(with = "crate::types::decimal")]
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCreated {
    pub proposal_id: u64,
    pub proposer: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCast {
    pub proposal_id: u64,
    pub voter: Address,
    pub support: bool,
}

/// All events the engine can emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchpadEvent {
    PoolCreated(PoolCreated),
    InvestmentMade(InvestmentMade),
    TokensClaimed(TokensClaimed),
    ProposalCreated(ProposalCreated),
    VoteCast(VoteCast),
}

impl LaunchpadEvent {
    /// Short topic symbol identifying the event kind.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::PoolCreated(_) => "created",
            Self::InvestmentMade(_) => "invested",
            Self::TokensClaimed(_) => "claimed",
            Self::ProposalCreated(_) => "proposed",
            Self::VoteCast(_) => "voted",
        }
    }

    pub fn pool_id(&self) -> Option<u64> {
        match self {
            Self::PoolCreated(e) => Some(e.pool_id),
            Self::InvestmentMade(e) => Some(e.pool_id),
            Self::TokensClaimed(e) => Some(e.pool_id),
            Self::ProposalCreated(_) | Self::VoteCast(_) => None,
        }
    }

    pub fn proposal_id(&self) -> Option<u64> {
        match self {
            Self::ProposalCreated(e) => Some(e.proposal_id),
            Self::VoteCast(e) => Some(e.proposal_id),
            _ => None,
        }
    }

    /// The identity whose call produced the event.
    pub fn actor(&self) -> &Address {
        match self {
            Self::PoolCreated(e) => &e.creator,
            Self::InvestmentMade(e) => &e.investor,
            Self::TokensClaimed(e) => &e.investor,
            Self::ProposalCreated(e) => &e.proposer,
            Self::VoteCast(e) => &e.voter,
        }
    }

    pub fn amount(&self) -> Option<Amount> {
        match self {
            Self::InvestmentMade(e) => Some(e.amount),
            Self::TokensClaimed(e) => Some(e.amount),
            _ => None,
        }
    }
}

macro_rules! impl_from_event {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl From<$ty> for LaunchpadEvent {
                fn from(event: $ty) -> Self {
                    Self::$ty(event)
                }
            }
        )+
    };
}

impl_from_event!(PoolCreated, InvestmentMade, TokensClaimed, ProposalCreated, VoteCast);

/// Result of a committed state change: the operation's value plus the event
/// it emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt<T> {
    pub value: T,
    pub event: LaunchpadEvent,
}

impl<T> Receipt<T> {
    pub(crate) fn new(value: T, event: impl Into<LaunchpadEvent>) -> Self {
        Self {
            value,
            event: event.into(),
        }
    }
}
