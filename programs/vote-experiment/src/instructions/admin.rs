//! Session setup and export

use serde::Serialize;
use treatment_logic::{ExperimentConfig, LogicError, Role, Settlement, Treatment, Variant};

use crate::error::Result;
use crate::session::{Group, Session};
use crate::state::{GroupRound, PlayerRound};

impl Session {
    /// Create a session of `group_count` groups of four.
    ///
    /// Every group draws from its own stream of `seed`.
    pub fn new(config: ExperimentConfig, seed: [u8; 32], group_count: u32) -> Result<Self> {
        config.validate()?;
        if group_count == 0 {
            return Err(LogicError::InvalidConfig("a session needs at least one group".to_string()).into());
        }

        let table = config.payoff_table();
        let groups = (0..group_count).map(|index| Group::new(index, &seed)).collect();

        log::info!(
            "Session created: {:?}, {} groups, {} rounds, vote in round {}",
            config.variant,
            group_count,
            config.num_rounds,
            config.vote_round
        );

        Ok(Self { config, table, seed, groups })
    }

    /// Serializable snapshot of every record written so far
    pub fn summary(&self) -> SessionSummary<'_> {
        SessionSummary {
            variant: self.config.variant,
            num_rounds: self.config.num_rounds,
            vote_round: self.config.vote_round,
            groups: self
                .groups
                .iter()
                .map(|group| GroupSummary {
                    index: group.index(),
                    finished: group.is_finished(),
                    halted: group.halted_reason(),
                    treatment: group.treatment(self.config.vote_round),
                    rounds: group.history().iter().collect(),
                    players: group
                        .players()
                        .iter()
                        .map(|slot| PlayerSummary {
                            id_in_group: slot.id_in_group(),
                            role: slot.history().in_round(1).and_then(|r| r.role),
                            settlement: slot.history().current().and_then(|r| r.settlement),
                            rounds: slot.history().iter().collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionSummary<'a> {
    pub variant: Variant,
    pub num_rounds: u32,
    pub vote_round: u32,
    pub groups: Vec<GroupSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct GroupSummary<'a> {
    pub index: u32,
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halted: Option<&'a str>,
    pub treatment: Option<Treatment>,
    pub rounds: Vec<&'a GroupRound>,
    pub players: Vec<PlayerSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PlayerSummary<'a> {
    pub id_in_group: u8,
    pub role: Option<Role>,
    pub settlement: Option<Settlement>,
    pub rounds: Vec<&'a PlayerRound>,
}
