//! Vote tally
//!
//! Every ballot carries one base share plus any additional shares bought at
//! the vote round. The group says yes when strictly more than half of all
//! shares voted yes, no when strictly fewer, and ties otherwise.

use serde::{Deserialize, Serialize};

use crate::error::LogicError;
use crate::money::Currency;

/// Most additional shares any one player may hold
pub const MAX_ADDITIONAL_SHARES: u32 = 9;

/// One player's submission at the vote round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub vote_yes: bool,
    pub additional_shares: u32,
}

impl Ballot {
    pub fn unweighted(vote_yes: bool) -> Self {
        Self { vote_yes, additional_shares: 0 }
    }

    pub fn weight(&self) -> Result<u32, LogicError> {
        self.additional_shares.checked_add(1).ok_or(LogicError::Overflow)
    }
}

/// Group decision before any computer intervention
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Yes,
    No,
    Tie,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total_yes_weight: u32,
    pub total_weight: u32,
    pub decision: Decision,
}

pub fn tally(ballots: &[Ballot]) -> Result<Tally, LogicError> {
    let mut total_weight = 0u32;
    let mut total_yes_weight = 0u32;
    for ballot in ballots {
        let weight = ballot.weight()?;
        total_weight = total_weight.checked_add(weight).ok_or(LogicError::Overflow)?;
        if ballot.vote_yes {
            total_yes_weight += weight;
        }
    }

    // yes > total / 2, compared in integers
    let decision = match (2 * u64::from(total_yes_weight)).cmp(&u64::from(total_weight)) {
        std::cmp::Ordering::Greater => Decision::Yes,
        std::cmp::Ordering::Less => Decision::No,
        std::cmp::Ordering::Equal => Decision::Tie,
    };

    Ok(Tally { total_yes_weight, total_weight, decision })
}

/// How many additional shares a player can afford: `floor(balance / cost)`,
/// capped at `max_shares`.
pub fn share_limit(balance: Currency, cost_per_share: Currency, max_shares: u32) -> u32 {
    balance
        .whole_units(cost_per_share)
        .min(max_shares as u64) as u32
}

/// Submission-time check of a share purchase. Runs before the tally.
pub fn check_purchase(
    requested: u32,
    balance: Currency,
    cost_per_share: Currency,
    max_shares: u32,
) -> Result<(), LogicError> {
    let limit = share_limit(balance, cost_per_share, max_shares);
    if requested > limit {
        return Err(LogicError::PurchaseExceedsLimit { requested, limit });
    }
    Ok(())
}
