//! Session error codes

use thiserror::Error;
use treatment_logic::LogicError;

use crate::barrier::Step;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Logic(#[from] LogicError),

    #[error("Unknown group {0}")]
    UnknownGroup(u32),

    #[error("Unknown player {0}; ids in group run from 1 to 4")]
    UnknownPlayer(u8),

    #[error("Player {player} has already submitted for {step:?} this round")]
    AlreadySubmitted { player: u8, step: Step },

    #[error("Round {round} is not the vote round")]
    NotVoteRound { round: u32 },

    #[error("Players have not been matched for round {round} yet")]
    NotMatched { round: u32 },

    #[error("The group vote has not been resolved yet")]
    VoteNotResolved,

    #[error("The session has already finished")]
    SessionFinished,

    #[error("Barrier {step:?} for round {round} was released twice")]
    BarrierAlreadyReleased { step: Step, round: u32 },

    #[error("Round record for round {round} is missing")]
    MissingRecord { round: u32 },

    #[error("Player {player} reached the vote barrier without a recorded vote")]
    MissingVote { player: u8 },

    #[error("Group {group} stopped after an invariant violation: {reason}")]
    GroupHalted { group: u32, reason: String },
}

impl ExperimentError {
    /// Validation errors are reported to the submitting player and leave all
    /// state untouched. Anything else is fatal for the group.
    pub fn is_validation(&self) -> bool {
        match self {
            ExperimentError::Logic(e) => e.is_validation(),
            ExperimentError::UnknownGroup(_)
            | ExperimentError::UnknownPlayer(_)
            | ExperimentError::AlreadySubmitted { .. }
            | ExperimentError::NotVoteRound { .. }
            | ExperimentError::NotMatched { .. }
            | ExperimentError::VoteNotResolved
            | ExperimentError::SessionFinished => true,
            ExperimentError::BarrierAlreadyReleased { .. }
            | ExperimentError::MissingRecord { .. }
            | ExperimentError::MissingVote { .. }
            | ExperimentError::GroupHalted { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExperimentError>;
