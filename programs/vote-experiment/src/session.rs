//! Session, group and player containers

use treatment_logic::{
    ExperimentConfig, PayoffTable, Purpose, SeededRng, Treatment, GROUP_SIZE,
};

use crate::barrier::RoundBarriers;
use crate::error::{ExperimentError, Result};
use crate::state::{GroupRound, History, PlayerRound};

/// One participant and everything they did, round by round
#[derive(Clone, Debug)]
pub struct PlayerSlot {
    id_in_group: u8,
    history: History<PlayerRound>,
}

impl PlayerSlot {
    pub(crate) fn new(id_in_group: u8) -> Self {
        Self { id_in_group, history: History::default() }
    }

    pub fn id_in_group(&self) -> u8 {
        self.id_in_group
    }

    pub fn history(&self) -> &History<PlayerRound> {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut History<PlayerRound> {
        &mut self.history
    }

    pub(crate) fn current_mut(&mut self) -> Result<&mut PlayerRound> {
        let round = self.history.len() as u32;
        self.history
            .current_mut()
            .ok_or(ExperimentError::MissingRecord { round })
    }

    pub fn current(&self) -> Result<&PlayerRound> {
        let round = self.history.len() as u32;
        self.history
            .current()
            .ok_or(ExperimentError::MissingRecord { round })
    }

    /// Record of `round`; a missing past record is a bookkeeping bug
    pub fn in_round(&self, round: u32) -> Result<&PlayerRound> {
        self.history
            .in_round(round)
            .ok_or(ExperimentError::MissingRecord { round })
    }
}

/// Four players sharing pairings, a vote and a treatment
#[derive(Clone, Debug)]
pub struct Group {
    index: u32,
    rng: SeededRng,
    pub(crate) players: [PlayerSlot; GROUP_SIZE],
    pub(crate) history: History<GroupRound>,
    pub(crate) barriers: RoundBarriers,
    pub(crate) finished: bool,
    pub(crate) halted: Option<String>,
}

impl Group {
    pub(crate) fn new(index: u32, seed: &[u8; 32]) -> Self {
        let mut group = Self {
            index,
            rng: SeededRng::for_group(seed, index),
            players: std::array::from_fn(|seat| PlayerSlot::new(seat as u8 + 1)),
            history: History::default(),
            barriers: RoundBarriers::new(1),
            finished: false,
            halted: None,
        };
        group.open_round(1, None);
        group
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn current_round(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn players(&self) -> &[PlayerSlot; GROUP_SIZE] {
        &self.players
    }

    pub fn player(&self, id_in_group: u8) -> Result<&PlayerSlot> {
        seat_of(id_in_group).map(|seat| &self.players[seat])
    }

    pub fn history(&self) -> &History<GroupRound> {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn halted_reason(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    pub(crate) fn stream(&self, round: u32, purpose: Purpose) -> SeededRng {
        self.rng.for_round(round, purpose)
    }

    pub(crate) fn current_mut(&mut self) -> Result<&mut GroupRound> {
        let round = self.current_round();
        self.history
            .current_mut()
            .ok_or(ExperimentError::MissingRecord { round })
    }

    pub fn current(&self) -> Result<&GroupRound> {
        self.history
            .current()
            .ok_or(ExperimentError::MissingRecord { round: self.current_round() })
    }

    /// Append fresh records for `round` for the group and all members.
    pub(crate) fn open_round(&mut self, round: u32, treatment: Option<Treatment>) {
        self.history.push(GroupRound::open(round, treatment));
        for slot in &mut self.players {
            let id = slot.id_in_group();
            slot.history_mut().push(PlayerRound::open(round, id));
        }
        self.barriers = RoundBarriers::new(round);
    }

    /// Refuse further work once finished or halted.
    pub(crate) fn ensure_live(&self) -> Result<()> {
        if let Some(reason) = &self.halted {
            return Err(ExperimentError::GroupHalted {
                group: self.index,
                reason: reason.clone(),
            });
        }
        if self.finished {
            return Err(ExperimentError::SessionFinished);
        }
        Ok(())
    }
}

/// 1-based id to 0-based seat
pub(crate) fn seat_of(id_in_group: u8) -> Result<usize> {
    match id_in_group {
        1..=4 => Ok(id_in_group as usize - 1),
        _ => Err(ExperimentError::UnknownPlayer(id_in_group)),
    }
}

/// A running experiment session
#[derive(Clone, Debug)]
pub struct Session {
    pub(crate) config: ExperimentConfig,
    pub(crate) table: PayoffTable,
    pub(crate) seed: [u8; 32],
    pub(crate) groups: Vec<Group>,
}

impl Session {
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: u32) -> Result<&Group> {
        self.groups
            .get(index as usize)
            .ok_or(ExperimentError::UnknownGroup(index))
    }

    pub(crate) fn group_mut(&mut self, index: u32) -> Result<&mut Group> {
        self.groups
            .get_mut(index as usize)
            .ok_or(ExperimentError::UnknownGroup(index))
    }

    pub fn is_finished(&self) -> bool {
        self.groups.iter().all(Group::is_finished)
    }
}
