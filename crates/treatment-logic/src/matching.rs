//! Within-group pairing
//!
//! A group of four is split into two pairs every round. The pair that forms
//! subgroup A is one of the C(4,2) = 6 two-subsets, drawn uniformly by
//! ranking the subsets colexicographically and unranking a uniform rank.
//! The same draw, made once in round 1, decides who holds the high role.

use serde::{Deserialize, Serialize};

use crate::error::LogicError;
use crate::payoff::Role;
use crate::random::SeededRng;

/// Players per group
pub const GROUP_SIZE: usize = 4;

/// Number of distinct two-subsets of a group
pub const PAIR_COUNT: u32 = (GROUP_SIZE * (GROUP_SIZE - 1) / 2) as u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subgroup {
    A,
    B,
}

impl Subgroup {
    pub fn label(self) -> &'static str {
        match self {
            Subgroup::A => "A",
            Subgroup::B => "B",
        }
    }
}

/// Colexicographic combination unranking: rank → (a, b) with a < b.
///
/// rank = C(b,2) + a = b*(b−1)/2 + a
pub fn unrank_pair(rank: u32) -> (usize, usize) {
    let mut b = 1u32;
    while (b + 1) * b / 2 <= rank {
        b += 1;
    }
    let a = rank - b * (b - 1) / 2;
    (a as usize, b as usize)
}

/// Draw a uniformly random pair of seats.
pub fn draw_pair(rng: &mut SeededRng) -> (usize, usize) {
    unrank_pair(rng.next_below(PAIR_COUNT))
}

/// Put a random pair in subgroup A and the other two in B.
pub fn split_in_pairs(rng: &mut SeededRng) -> Result<[Subgroup; GROUP_SIZE], LogicError> {
    let (a, b) = draw_pair(rng);
    let mut subgroups = [Subgroup::B; GROUP_SIZE];
    subgroups[a] = Subgroup::A;
    subgroups[b] = Subgroup::A;
    check_even_split(&subgroups)?;
    Ok(subgroups)
}

/// Give a random pair the high role and the other two the low role.
pub fn assign_roles(rng: &mut SeededRng) -> [Role; GROUP_SIZE] {
    let (a, b) = draw_pair(rng);
    let mut roles = [Role::Low; GROUP_SIZE];
    roles[a] = Role::High;
    roles[b] = Role::High;
    roles
}

/// Both subgroups must hold exactly two players.
pub fn check_even_split(subgroups: &[Subgroup]) -> Result<(), LogicError> {
    if subgroups.len() != GROUP_SIZE {
        return Err(LogicError::WrongGroupSize {
            expected: GROUP_SIZE,
            actual: subgroups.len(),
        });
    }
    let in_a = subgroups.iter().filter(|s| **s == Subgroup::A).count();
    let in_b = subgroups.len() - in_a;
    if in_a != GROUP_SIZE / 2 {
        return Err(LogicError::UnevenSplit { in_a, in_b });
    }
    Ok(())
}

/// Seat of the other member of `seat`'s subgroup.
pub fn opponent_of(subgroups: &[Subgroup], seat: usize) -> Result<usize, LogicError> {
    let own = *subgroups.get(seat).ok_or(LogicError::NoOpponent { seat })?;
    subgroups
        .iter()
        .enumerate()
        .find(|(other, sub)| *other != seat && **sub == own)
        .map(|(other, _)| other)
        .ok_or(LogicError::NoOpponent { seat })
}
