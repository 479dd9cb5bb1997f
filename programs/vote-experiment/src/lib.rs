//! Vote Experiment - Prisoner's Dilemma with an endogenous game switch
//!
//! Session layer for a repeated Prisoner's Dilemma played in groups of
//! four. Halfway through, each group votes on switching to a more
//! cooperative payoff game; the computer may override the vote.
//!
//! Per round, each group goes through up to three barriers:
//!
//! 1. [`Session::arrive_for_matching`] - the last arrival draws roles
//!    (round 1 only) and splits the group into two pairs.
//! 2. [`Session::submit_vote`] - vote round only; the last ballot tallies
//!    the vote and resolves the treatment.
//! 3. [`Session::submit_action`] - the last choice pays every player,
//!    extends running totals, settles on the last round and opens the
//!    next round.
//!
//! Records are kept per player and per group in append-only round
//! histories; see [`state::History`].

mod barrier;
mod error;
mod instructions;
mod session;
pub mod state;

pub use barrier::{Arrival, Rendezvous, Step};
pub use error::{ExperimentError, Result};
pub use instructions::{GroupSummary, PlayerSummary, SessionSummary};
pub use session::{Group, PlayerSlot, Session};

pub use treatment_logic;
