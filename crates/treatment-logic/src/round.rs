//! Round execution for one group

use serde::{Deserialize, Serialize};

use crate::error::LogicError;
use crate::matching::{check_even_split, opponent_of, Subgroup, GROUP_SIZE};
use crate::money::Currency;
use crate::payoff::{Move, PayoffTable, Role, Tier};

/// What one seat sees after the round is played
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatResult {
    pub seat: usize,
    pub opponent: usize,
    pub own_move: Move,
    pub opponent_move: Move,
    pub payoff: Currency,
    pub opponent_payoff: Currency,
}

/// Inputs for one group-round, indexed by seat
#[derive(Clone, Copy, Debug)]
pub struct RoundInput<'a> {
    pub roles: &'a [Role; GROUP_SIZE],
    pub subgroups: &'a [Subgroup; GROUP_SIZE],
    pub moves: &'a [Option<Move>; GROUP_SIZE],
}

/// Pay every seat against the other member of its subgroup.
pub fn play_round(
    table: &PayoffTable,
    tier: Tier,
    input: RoundInput<'_>,
) -> Result<[SeatResult; GROUP_SIZE], LogicError> {
    check_even_split(input.subgroups)?;

    let mut moves = [Move::Cooperate; GROUP_SIZE];
    for (seat, submitted) in input.moves.iter().enumerate() {
        moves[seat] = submitted.ok_or(LogicError::MissingAction { seat })?;
    }

    let mut payoffs = [Currency::ZERO; GROUP_SIZE];
    let mut opponents = [0usize; GROUP_SIZE];
    for seat in 0..GROUP_SIZE {
        let opponent = opponent_of(input.subgroups, seat)?;
        opponents[seat] = opponent;
        payoffs[seat] = table.lookup(tier, input.roles[seat], moves[seat], moves[opponent])?;
    }

    Ok(std::array::from_fn(|seat| {
        let opponent = opponents[seat];
        SeatResult {
            seat,
            opponent,
            own_move: moves[seat],
            opponent_move: moves[opponent],
            payoff: payoffs[seat],
            opponent_payoff: payoffs[opponent],
        }
    }))
}
