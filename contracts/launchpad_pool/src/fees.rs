//! Cross-chain fee estimation seam.
//!
//! Bridging cost quotes come from an external price oracle. The engine only
//! defines the interface; no pool invariant depends on a quote.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::types::Amount;

pub type ChainId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeEstimateError {
    #[error("no fee quote for route {src} -> {dest}")]
    UnsupportedRoute { src: ChainId, dest: ChainId },
}

/// Source of cross-chain message fees.
pub trait FeeEstimator {
    fn estimate_fee(&self, src_chain: ChainId, dest_chain: ChainId)
        -> Result<Amount, FeeEstimateError>;
}

/// Static per-route fee table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedFeeTable {
    routes: BTreeMap<(ChainId, ChainId), Amount>,
}

impl FixedFeeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, src: ChainId, dest: ChainId, fee: Amount) -> Self {
        self.insert(src, dest, fee);
        self
    }

    /// Set the fee for `src -> dest`, replacing any previous quote.
    pub fn insert(&mut self, src: ChainId, dest: ChainId, fee: Amount) {
        self.routes.insert((src, dest), fee);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FeeEstimator for FixedFeeTable {
    fn estimate_fee(
        &self,
        src_chain: ChainId,
        dest_chain: ChainId,
    ) -> Result<Amount, FeeEstimateError> {
        self.routes
            .get(&(src_chain, dest_chain))
            .copied()
            .ok_or(FeeEstimateError::UnsupportedRoute {
                src: src_chain,
                dest: dest_chain,
            })
    }
}
