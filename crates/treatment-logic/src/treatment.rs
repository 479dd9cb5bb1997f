//! Treatment resolution
//!
//! Runs once per group at the vote round. The computer first flips a coin
//! to decide whether it takes control. If it does, a second coin picks the
//! game and the vote is discarded. If it does not, the vote stands, except
//! that a tied vote is broken by its own, separate coin.

use serde::{Deserialize, Serialize};

use crate::error::LogicError;
use crate::payoff::Tier;
use crate::random::SeededRng;
use crate::vote::Decision;

/// Frozen outcome of the vote round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Treatment {
    EndoYes,
    EndoNo,
    ExoYes,
    ExoNo,
}

impl Treatment {
    /// Set membership in {ExoNo, EndoNo}.
    pub fn is_no(self) -> bool {
        matches!(self, Treatment::ExoNo | Treatment::EndoNo)
    }

    /// Whether the computer imposed this treatment
    pub fn is_exogenous(self) -> bool {
        matches!(self, Treatment::ExoYes | Treatment::ExoNo)
    }

    /// No treatments keep the base game, Yes treatments switch to the
    /// cooperative game.
    pub fn tier(self) -> Tier {
        if self.is_no() {
            Tier::Base
        } else {
            Tier::Cooperative
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Treatment::EndoYes => "EndoYes",
            Treatment::EndoNo => "EndoNo",
            Treatment::ExoYes => "ExoYes",
            Treatment::ExoNo => "ExoNo",
        }
    }
}

/// Everything drawn while resolving a group's treatment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub decision: Decision,
    pub treatment: Treatment,
    pub overridden: bool,
    /// Set only when the computer took control
    pub override_dice: Option<bool>,
    /// Set only when a tie stood without override
    pub tie_break_dice: Option<bool>,
}

pub fn resolve(decision: Decision, rng: &mut SeededRng) -> Resolution {
    let computer_control = rng.next_bool();

    if computer_control {
        let dice = rng.next_bool();
        log::debug!("computer overrides {:?} vote, dice = {}", decision, dice);
        return Resolution {
            decision,
            treatment: if dice { Treatment::ExoYes } else { Treatment::ExoNo },
            overridden: true,
            override_dice: Some(dice),
            tie_break_dice: None,
        };
    }

    let (treatment, tie_break_dice) = match decision {
        Decision::Yes => (Treatment::EndoYes, None),
        Decision::No => (Treatment::EndoNo, None),
        Decision::Tie => {
            let dice = rng.next_bool();
            log::debug!("tied vote broken by dice = {}", dice);
            let treatment = if dice { Treatment::EndoYes } else { Treatment::EndoNo };
            (treatment, Some(dice))
        }
    };

    Resolution {
        decision,
        treatment,
        overridden: false,
        override_dice: None,
        tie_break_dice,
    }
}

/// Resolve into `slot`, refusing to run a second time for the same group.
pub fn resolve_once<'a>(
    slot: &'a mut Option<Resolution>,
    decision: Decision,
    rng: &mut SeededRng,
) -> Result<&'a Resolution, LogicError> {
    if slot.is_some() {
        return Err(LogicError::AlreadyResolved);
    }
    Ok(slot.insert(resolve(decision, rng)))
}
