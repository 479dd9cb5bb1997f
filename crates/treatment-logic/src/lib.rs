//! Treatment Logic for the vote-on-the-game Prisoner's Dilemma
//!
//! Core logic for a repeated Prisoner's Dilemma played in groups of four,
//! where the group votes halfway through on switching to a more cooperative
//! payoff game, and the computer may override the vote.
//! This crate is compiled to:
//! - Native (for the session layer and simulator)
//! - WASM (for the experiment frontend)

mod config;
mod error;
mod matching;
mod money;
mod payoff;
mod random;
mod round;
mod settlement;
mod treatment;
mod vote;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{default_vote_round, ExperimentConfig, Variant};
pub use error::LogicError;
pub use matching::{
    assign_roles, check_even_split, draw_pair, opponent_of, split_in_pairs, unrank_pair, Subgroup,
    GROUP_SIZE, PAIR_COUNT,
};
pub use money::Currency;
pub use payoff::{Move, Outcome, PayoffSchedule, PayoffTable, Role, Tier};
pub use random::{seed_from_u64, Purpose, SeededRng};
pub use round::{play_round, RoundInput, SeatResult};
pub use settlement::{accumulate, game2_round, phase_of, settle, tier_for_round, Phase, Settlement};
pub use treatment::{resolve, resolve_once, Resolution, Treatment};
pub use vote::{check_purchase, share_limit, tally, Ballot, Decision, Tally, MAX_ADDITIONAL_SHARES};
