//! Round record definitions

use std::ops::RangeInclusive;

use serde::Serialize;
use treatment_logic::{
    Currency, Move, Resolution, Role, Settlement, Subgroup, Tally, Treatment,
};

/// Append-only, round-indexed record sequence.
///
/// Round `n` lives at position `n - 1`. Only the newest record is writable,
/// and only from inside this crate; closed rounds are read-only.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct History<T> {
    records: Vec<T>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<T> History<T> {
    pub(crate) fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut T> {
        self.records.last_mut()
    }

    /// Record of `round` (1-based)
    pub fn in_round(&self, round: u32) -> Option<&T> {
        let index = (round as usize).checked_sub(1)?;
        self.records.get(index)
    }

    /// Records of `first..=last`, clipped to what exists
    pub fn in_rounds(&self, rounds: RangeInclusive<u32>) -> &[T] {
        let start = (*rounds.start() as usize).saturating_sub(1).min(self.records.len());
        let end = (*rounds.end() as usize).min(self.records.len());
        if start >= end {
            return &[];
        }
        &self.records[start..end]
    }

    pub fn current(&self) -> Option<&T> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }
}

/// One player's state in one round
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlayerRound {
    pub round: u32,
    /// 1-based seat number, stable for the session
    pub id_in_group: u8,
    /// Drawn in round 1, copied forward afterwards
    pub role: Option<Role>,
    pub subgroup: Option<Subgroup>,
    pub opponent_id: Option<u8>,
    pub action: Option<Move>,
    /// Vote round only
    pub vote_yes: Option<bool>,
    /// Vote round only
    pub additional_shares: Option<u32>,
    pub payoff: Option<Currency>,
    pub opponent_action: Option<Move>,
    pub opponent_payoff: Option<Currency>,
    /// 1-based index inside game 2, 0 during game 1
    pub game2_round: u32,
    /// Set in game-1 rounds
    pub cum_payoff_game1: Option<Currency>,
    /// Set in game-2 rounds
    pub cum_payoff_game2: Option<Currency>,
    /// Last round only
    pub settlement: Option<Settlement>,
}

impl PlayerRound {
    pub(crate) fn open(round: u32, id_in_group: u8) -> Self {
        Self { round, id_in_group, ..Self::default() }
    }

    pub fn same_choice(&self) -> Option<bool> {
        Some(self.action? == self.opponent_action?)
    }
}

/// Group state in one round
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupRound {
    pub round: u32,
    pub matched: bool,
    /// Vote round only
    pub tally: Option<Tally>,
    /// Vote round only; written exactly once
    pub resolution: Option<Resolution>,
    /// Copy of the vote round's treatment, for display in later rounds
    pub treatment: Option<Treatment>,
    pub settled: bool,
}

impl GroupRound {
    pub(crate) fn open(round: u32, treatment: Option<Treatment>) -> Self {
        Self { round, treatment, ..Self::default() }
    }

    pub fn total_yes_weight(&self) -> Option<u32> {
        self.tally.map(|t| t.total_yes_weight)
    }

    pub fn total_weight(&self) -> Option<u32> {
        self.tally.map(|t| t.total_weight)
    }

    pub fn overridden(&self) -> Option<bool> {
        self.resolution.map(|r| r.overridden)
    }

    pub fn override_dice(&self) -> Option<bool> {
        self.resolution.and_then(|r| r.override_dice)
    }
}
