//! Vote recording on proposals.
//!
//! Proposals are independent of pools. There is no close, quorum or
//! execution step; a proposal just accumulates one vote per address.

use crate::types::{Address, Proposal, Timestamp, VoteRecord};
use crate::Error;

impl Proposal {
    pub(crate) fn new(
        id: u64,
        proposer: Address,
        title: String,
        description: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            proposer,
            title,
            description,
            created_at,
            yes_votes: 0,
            no_votes: 0,
            votes: Default::default(),
        }
    }

    /// The recorded choice of `voter`, if any.
    pub fn vote_of(&self, voter: &Address) -> Option<bool> {
        self.votes.get(voter).map(|record| record.support)
    }

    pub fn total_votes(&self) -> u64 {
        self.yes_votes.saturating_add(self.no_votes)
    }

    /// Record a vote; the proposal is untouched on error.
    pub(crate) fn record_vote(
        &mut self,
        voter: &Address,
        support: bool,
        cast_at: Timestamp,
    ) -> Result<(), Error> {
        if self.votes.contains_key(voter) {
            return Err(Error::DuplicateVote);
        }
        let tally = if support {
            &mut self.yes_votes
        } else {
            &mut self.no_votes
        };
        *tally = tally.checked_add(1).ok_or(Error::ArithmeticOverflow)?;
        self.votes
            .insert(voter.clone(), VoteRecord { support, cast_at });
        Ok(())
    }
}
