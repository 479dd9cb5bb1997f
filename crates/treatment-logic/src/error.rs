//! Error codes for the core engine

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("Your purchase exceeds your limit! Requested {requested} additional shares, limit is {limit}")]
    PurchaseExceedsLimit { requested: u32, limit: u32 },

    #[error("Additional vote shares cannot be purchased in this experiment")]
    SharePurchaseDisabled,

    #[error("Expected a group of {expected} players, got {actual}")]
    WrongGroupSize { expected: usize, actual: usize },

    #[error("Uneven subgroup split: {in_a} players in A, {in_b} in B")]
    UnevenSplit { in_a: usize, in_b: usize },

    #[error("Player at seat {seat} has no opponent in its subgroup")]
    NoOpponent { seat: usize },

    #[error("Player at seat {seat} has not submitted an action")]
    MissingAction { seat: usize },

    #[error("Treatment has not been resolved for round {round}")]
    TreatmentUnresolved { round: u32 },

    #[error("Treatment has already been resolved for this group")]
    AlreadyResolved,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LogicError {
    /// Validation errors go back to the submitting player, who may resubmit.
    /// Everything else is an invariant violation and must stop the round.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LogicError::PurchaseExceedsLimit { .. } | LogicError::SharePurchaseDisabled
        )
    }
}
