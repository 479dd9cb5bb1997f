//! Payoff matrices for the two games
//!
//! The base game is a standard Prisoner's Dilemma. The cooperative game
//! ("Game B") is identical except that defecting on a cooperator pays less,
//! which makes mutual cooperation the better bet while still taxing a
//! unilateral cooperator.

use serde::{Deserialize, Serialize};

use crate::error::LogicError;
use crate::money::Currency;

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    pub fn from_cooperate(cooperate: bool) -> Self {
        if cooperate {
            Move::Cooperate
        } else {
            Move::Defect
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Move::Cooperate => "Cooperate",
            Move::Defect => "Defect",
        }
    }
}

/// Endowment role, drawn once in round 1 and carried for the whole session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    High,
    Low,
}

/// Which payoff matrix is in force
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Base,
    Cooperative,
}

/// The four cells of the matrix, seen from the player being paid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    MutualCooperation,
    MutualDefection,
    /// Self defects, opponent cooperates
    Temptation,
    /// Self cooperates, opponent defects
    Sucker,
}

impl Outcome {
    pub fn of(own: Move, opponent: Move) -> Self {
        match (own, opponent) {
            (Move::Cooperate, Move::Cooperate) => Outcome::MutualCooperation,
            (Move::Defect, Move::Defect) => Outcome::MutualDefection,
            (Move::Defect, Move::Cooperate) => Outcome::Temptation,
            (Move::Cooperate, Move::Defect) => Outcome::Sucker,
        }
    }
}

/// Low-role amounts for every cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffSchedule {
    pub mutual_cooperation: Currency,
    pub mutual_defection: Currency,
    pub temptation: Currency,
    pub sucker: Currency,
    /// Temptation cell of the cooperative game
    pub cooperative_temptation: Currency,
}

impl Default for PayoffSchedule {
    fn default() -> Self {
        Self {
            mutual_cooperation: Currency::new(50),
            mutual_defection: Currency::new(40),
            temptation: Currency::new(60),
            sucker: Currency::new(10),
            cooperative_temptation: Currency::new(48),
        }
    }
}

impl PayoffSchedule {
    fn cell(&self, tier: Tier, outcome: Outcome) -> Currency {
        match (tier, outcome) {
            (_, Outcome::MutualCooperation) => self.mutual_cooperation,
            (_, Outcome::MutualDefection) => self.mutual_defection,
            (Tier::Base, Outcome::Temptation) => self.temptation,
            (Tier::Cooperative, Outcome::Temptation) => self.cooperative_temptation,
            (_, Outcome::Sucker) => self.sucker,
        }
    }
}

/// Payoff lookup for one experiment configuration.
///
/// With a role multiplier, high-role players earn `multiplier ×` the
/// low-role amount in every cell. Without one, roles are labels only and
/// everybody is paid on the low-role scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffTable {
    pub schedule: PayoffSchedule,
    pub high_role_multiplier: Option<u32>,
}

impl PayoffTable {
    pub fn role_scaled(schedule: PayoffSchedule, multiplier: u32) -> Self {
        Self { schedule, high_role_multiplier: Some(multiplier) }
    }

    pub fn flat(schedule: PayoffSchedule) -> Self {
        Self { schedule, high_role_multiplier: None }
    }

    pub fn lookup(
        &self,
        tier: Tier,
        own_role: Role,
        own: Move,
        opponent: Move,
    ) -> Result<Currency, LogicError> {
        let amount = self.schedule.cell(tier, Outcome::of(own, opponent));
        match (own_role, self.high_role_multiplier) {
            (Role::High, Some(multiplier)) => amount.checked_mul(multiplier),
            _ => Ok(amount),
        }
    }
}
