//! Running totals and final settlement
//!
//! Rounds before the vote round form game 1, rounds from the vote round on
//! form game 2. Each game keeps its own running total, extended by one
//! round's payoff at a time.

use serde::{Deserialize, Serialize};

use crate::error::LogicError;
use crate::money::Currency;
use crate::payoff::Tier;
use crate::treatment::Treatment;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Game 1, before the vote
    BeforeVote,
    /// Game 2, from the vote round on
    AfterVote,
}

pub fn phase_of(round: u32, vote_round: u32) -> Phase {
    if round < vote_round {
        Phase::BeforeVote
    } else {
        Phase::AfterVote
    }
}

/// 1-based index of `round` inside game 2, or 0 during game 1.
pub fn game2_round(round: u32, vote_round: u32) -> u32 {
    match phase_of(round, vote_round) {
        Phase::BeforeVote => 0,
        Phase::AfterVote => round - vote_round + 1,
    }
}

/// Payoff tier for `round`. Game 1 always uses the base game; game 2
/// follows the frozen treatment, which must exist by then.
pub fn tier_for_round(
    round: u32,
    vote_round: u32,
    treatment: Option<Treatment>,
) -> Result<Tier, LogicError> {
    match phase_of(round, vote_round) {
        Phase::BeforeVote => Ok(Tier::Base),
        Phase::AfterVote => treatment
            .map(Treatment::tier)
            .ok_or(LogicError::TreatmentUnresolved { round }),
    }
}

/// Extend a running total by one round. `previous` is `None` on the first
/// round of a game.
pub fn accumulate(previous: Option<Currency>, payoff: Currency) -> Result<Currency, LogicError> {
    previous.unwrap_or(Currency::ZERO).checked_add(payoff)
}

/// Breakdown of a player's final payment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub cum_payoff_game1: Currency,
    pub cum_payoff_game2: Currency,
    pub additional_shares: u32,
    pub share_cost: Currency,
    pub final_payoff: Currency,
}

pub fn settle(
    cum_payoff_game1: Currency,
    cum_payoff_game2: Currency,
    additional_shares: u32,
    cost_per_share: Currency,
) -> Result<Settlement, LogicError> {
    let share_cost = cost_per_share.checked_mul(additional_shares)?;
    let final_payoff = cum_payoff_game1
        .checked_add(cum_payoff_game2)?
        .checked_sub(share_cost)?;

    Ok(Settlement {
        cum_payoff_game1,
        cum_payoff_game2,
        additional_shares,
        share_cost,
        final_payoff,
    })
}
