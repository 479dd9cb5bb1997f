//! Group rendezvous
//!
//! Each group-round has one barrier per step. Members arrive in any order;
//! the arrival that completes the set is told to run the step's callback,
//! and that happens exactly once.

use serde::{Deserialize, Serialize};
use treatment_logic::GROUP_SIZE;

use crate::error::{ExperimentError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Start of round: roles (round 1) and pairing
    MatchInPairs,
    /// Vote round: tally and treatment
    Vote,
    /// End of round: payoffs
    Results,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrival {
    /// Still waiting on `remaining` members
    Waiting { remaining: usize },
    /// Last member arrived; the caller runs the callback now
    Released,
}

#[derive(Clone, Debug)]
pub struct Rendezvous {
    step: Step,
    round: u32,
    arrived: [bool; GROUP_SIZE],
    released: bool,
}

impl Rendezvous {
    pub fn new(step: Step, round: u32) -> Self {
        Self { step, round, arrived: [false; GROUP_SIZE], released: false }
    }

    pub fn has_arrived(&self, seat: usize) -> bool {
        self.arrived.get(seat).copied().unwrap_or(false)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn remaining(&self) -> usize {
        self.arrived.iter().filter(|a| !**a).count()
    }

    /// Check that `seat` may arrive, without recording anything.
    pub fn check(&self, seat: usize) -> Result<()> {
        if seat >= GROUP_SIZE {
            let id = seat.checked_add(1).and_then(|id| u8::try_from(id).ok());
            return Err(ExperimentError::UnknownPlayer(id.unwrap_or(u8::MAX)));
        }
        if self.has_arrived(seat) {
            return Err(ExperimentError::AlreadySubmitted {
                player: seat as u8 + 1,
                step: self.step,
            });
        }
        if self.released {
            return Err(ExperimentError::BarrierAlreadyReleased {
                step: self.step,
                round: self.round,
            });
        }
        Ok(())
    }

    pub fn arrive(&mut self, seat: usize) -> Result<Arrival> {
        self.check(seat)?;
        self.arrived[seat] = true;

        match self.remaining() {
            0 => {
                self.released = true;
                Ok(Arrival::Released)
            }
            remaining => Ok(Arrival::Waiting { remaining }),
        }
    }
}

/// The three barriers of one group-round
#[derive(Clone, Debug)]
pub struct RoundBarriers {
    pub match_in_pairs: Rendezvous,
    pub vote: Rendezvous,
    pub results: Rendezvous,
}

impl RoundBarriers {
    pub fn new(round: u32) -> Self {
        Self {
            match_in_pairs: Rendezvous::new(Step::MatchInPairs, round),
            vote: Rendezvous::new(Step::Vote, round),
            results: Rendezvous::new(Step::Results, round),
        }
    }

    pub fn get(&self, step: Step) -> &Rendezvous {
        match step {
            Step::MatchInPairs => &self.match_in_pairs,
            Step::Vote => &self.vote,
            Step::Results => &self.results,
        }
    }

    pub fn get_mut(&mut self, step: Step) -> &mut Rendezvous {
        match step {
            Step::MatchInPairs => &mut self.match_in_pairs,
            Step::Vote => &mut self.vote,
            Step::Results => &mut self.results,
        }
    }
}
