//! Player instructions
//!
//! Every submission is validated before anything is written. The member
//! whose arrival completes a barrier runs that barrier's group callback.

use treatment_logic::{check_purchase, LogicError, Move};

use crate::barrier::Arrival;
use crate::error::{ExperimentError, Result};
use crate::session::{seat_of, Group, Session};

/// Run a barrier callback. An invariant violation halts the group for good.
fn run_callback(group: &mut Group, callback: impl FnOnce(&mut Group) -> Result<()>) -> Result<()> {
    callback(&mut *group).map_err(|e| {
        log::error!("Group {} halted: {}", group.index(), e);
        group.halted = Some(e.to_string());
        e
    })
}

impl Session {
    /// Arrive at the start-of-round wait page
    pub fn arrive_for_matching(&mut self, group_index: u32, id_in_group: u8) -> Result<Arrival> {
        let seat = seat_of(id_in_group)?;
        let group = self.group_mut(group_index)?;
        group.ensure_live()?;

        let arrival = group.barriers.match_in_pairs.arrive(seat)?;
        if arrival == Arrival::Released {
            run_callback(group, Group::match_in_pairs)?;
        }
        Ok(arrival)
    }

    /// Submit the vote-round ballot.
    ///
    /// Additional shares are only for sale under equal pay, and never more
    /// than the game-1 earnings cover.
    pub fn submit_vote(
        &mut self,
        group_index: u32,
        id_in_group: u8,
        vote_yes: bool,
        additional_shares: u32,
    ) -> Result<Arrival> {
        let seat = seat_of(id_in_group)?;
        let config = &self.config;
        let group = self
            .groups
            .get_mut(group_index as usize)
            .ok_or(ExperimentError::UnknownGroup(group_index))?;
        group.ensure_live()?;

        let round = group.current_round();
        if round != config.vote_round {
            return Err(ExperimentError::NotVoteRound { round });
        }
        group.barriers.vote.check(seat)?;

        if config.weighted_votes() {
            let game1 = group.players[seat]
                .in_round(round - 1)?
                .cum_payoff_game1
                .ok_or(ExperimentError::MissingRecord { round: round - 1 })?;
            check_purchase(
                additional_shares,
                game1,
                config.cost_per_share,
                config.max_additional_shares,
            )
            .inspect_err(|e| {
                log::warn!("Group {} player {} vote rejected: {}", group_index, id_in_group, e)
            })?;
        } else if additional_shares > 0 {
            log::warn!(
                "Group {} player {} tried to buy {} shares without share sales",
                group_index,
                id_in_group,
                additional_shares
            );
            return Err(LogicError::SharePurchaseDisabled.into());
        }

        let record = group.players[seat].current_mut()?;
        record.vote_yes = Some(vote_yes);
        record.additional_shares = Some(additional_shares);

        let arrival = group.barriers.vote.arrive(seat)?;
        if arrival == Arrival::Released {
            run_callback(group, Group::resolve_vote)?;
        }
        Ok(arrival)
    }

    /// Submit this round's cooperate/defect choice. The last submission
    /// settles the round and opens the next one.
    pub fn submit_action(&mut self, group_index: u32, id_in_group: u8, action: Move) -> Result<Arrival> {
        let seat = seat_of(id_in_group)?;
        let Session { config, table, groups, .. } = self;
        let group = groups
            .get_mut(group_index as usize)
            .ok_or(ExperimentError::UnknownGroup(group_index))?;
        group.ensure_live()?;

        let round = group.current_round();
        if !group.barriers.match_in_pairs.is_released() {
            return Err(ExperimentError::NotMatched { round });
        }
        if round == config.vote_round && !group.barriers.vote.is_released() {
            return Err(ExperimentError::VoteNotResolved);
        }
        group.barriers.results.check(seat)?;

        group.players[seat].current_mut()?.action = Some(action);

        let arrival = group.barriers.results.arrive(seat)?;
        if arrival == Arrival::Released {
            run_callback(group, |g| {
                g.settle_round(config, table)?;
                g.advance(config)
            })?;
        }
        Ok(arrival)
    }

    /// Current opponent of a player, once the round is matched
    pub fn opponent_of(&self, group_index: u32, id_in_group: u8) -> Result<Option<u8>> {
        let group = self.group(group_index)?;
        Ok(group.player(id_in_group)?.current()?.opponent_id)
    }
}
