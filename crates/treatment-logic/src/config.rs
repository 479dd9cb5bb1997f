//! Experiment configuration
//!
//! Two presets match the two experiment apps: asymmetric pay (high-role
//! players earn double, one vote each) and equal pay (flat payoffs, votes
//! weighted by purchased shares).

use serde::{Deserialize, Serialize};

use crate::error::LogicError;
use crate::money::Currency;
use crate::payoff::{PayoffSchedule, PayoffTable};
use crate::vote::MAX_ADDITIONAL_SHARES;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Role-scaled payoffs, one unweighted vote per player
    AsymmetricPay,
    /// Flat payoffs, votes weighted by purchased shares
    EqualPay,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub variant: Variant,
    pub num_rounds: u32,
    /// First round of game 2; the vote is held here
    pub vote_round: u32,
    pub payoffs: PayoffSchedule,
    /// Applied to high-role payoffs under asymmetric pay
    pub high_role_multiplier: u32,
    pub cost_per_share: Currency,
    pub max_additional_shares: u32,
}

/// JSON form: everything but the variant may be omitted
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    variant: Variant,
    num_rounds: Option<u32>,
    vote_round: Option<u32>,
    payoffs: Option<PayoffSchedule>,
    high_role_multiplier: Option<u32>,
    cost_per_share: Option<Currency>,
    max_additional_shares: Option<u32>,
}

/// Game 2 starts halfway through the session.
pub fn default_vote_round(num_rounds: u32) -> u32 {
    num_rounds / 2 + 1
}

impl ExperimentConfig {
    pub fn asymmetric_pay() -> Self {
        Self::preset(Variant::AsymmetricPay, 2)
    }

    pub fn equal_pay() -> Self {
        Self::preset(Variant::EqualPay, 8)
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::AsymmetricPay => Self::asymmetric_pay(),
            Variant::EqualPay => Self::equal_pay(),
        }
    }

    fn preset(variant: Variant, num_rounds: u32) -> Self {
        Self {
            variant,
            num_rounds,
            vote_round: default_vote_round(num_rounds),
            payoffs: PayoffSchedule::default(),
            high_role_multiplier: 2,
            cost_per_share: Currency::new(10),
            max_additional_shares: MAX_ADDITIONAL_SHARES,
        }
    }

    /// Parse a JSON config; omitted fields come from the variant's preset.
    /// An explicit `num_rounds` without `vote_round` moves the vote to the
    /// halfway point of the new length.
    pub fn from_json(json: &str) -> Result<Self, LogicError> {
        let raw: RawConfig = serde_json::from_str(json)
            .map_err(|e| LogicError::InvalidConfig(e.to_string()))?;
        let preset = Self::for_variant(raw.variant);
        let num_rounds = raw.num_rounds.unwrap_or(preset.num_rounds);

        let config = Self {
            variant: raw.variant,
            num_rounds,
            vote_round: raw.vote_round.unwrap_or_else(|| default_vote_round(num_rounds)),
            payoffs: raw.payoffs.unwrap_or(preset.payoffs),
            high_role_multiplier: raw.high_role_multiplier.unwrap_or(preset.high_role_multiplier),
            cost_per_share: raw.cost_per_share.unwrap_or(preset.cost_per_share),
            max_additional_shares: raw
                .max_additional_shares
                .unwrap_or(preset.max_additional_shares),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LogicError> {
        let invalid = |msg: String| Err(LogicError::InvalidConfig(msg));

        if self.vote_round < 2 || self.vote_round > self.num_rounds {
            return invalid(format!(
                "vote_round {} must be in 2..={}",
                self.vote_round, self.num_rounds
            ));
        }
        if self.max_additional_shares > MAX_ADDITIONAL_SHARES {
            return invalid(format!(
                "max_additional_shares {} must be at most {}",
                self.max_additional_shares, MAX_ADDITIONAL_SHARES
            ));
        }
        if self.high_role_multiplier == 0 {
            return invalid("high_role_multiplier must be at least 1".to_string());
        }
        if self.weighted_votes() && self.cost_per_share <= Currency::ZERO {
            return invalid(format!(
                "cost_per_share must be positive, got {}",
                self.cost_per_share
            ));
        }
        if self.payoffs.cooperative_temptation >= self.payoffs.temptation {
            return invalid(format!(
                "cooperative temptation {} must be below base temptation {}",
                self.payoffs.cooperative_temptation, self.payoffs.temptation
            ));
        }
        Ok(())
    }

    /// Whether players may buy additional vote shares
    pub fn weighted_votes(&self) -> bool {
        self.variant == Variant::EqualPay
    }

    pub fn payoff_table(&self) -> PayoffTable {
        match self.variant {
            Variant::AsymmetricPay => {
                PayoffTable::role_scaled(self.payoffs, self.high_role_multiplier)
            }
            Variant::EqualPay => PayoffTable::flat(self.payoffs),
        }
    }

    pub fn is_last_round(&self, round: u32) -> bool {
        round == self.num_rounds
    }
}
