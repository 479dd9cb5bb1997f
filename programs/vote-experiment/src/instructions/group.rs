//! Group barrier callbacks
//!
//! Each runs once per group-round, after the matching barrier releases.
//! They compute everything first and only then write, so an error leaves
//! the round's records as they were.

use treatment_logic::{
    accumulate, assign_roles, game2_round, opponent_of, phase_of, play_round, resolve_once, settle,
    split_in_pairs, tally, tier_for_round, Ballot, Currency, ExperimentConfig, Move, PayoffTable,
    Phase, Purpose, Role, RoundInput, Settlement, Subgroup, Treatment, GROUP_SIZE,
};

use crate::error::{ExperimentError, Result};
use crate::session::Group;

impl Group {
    /// Start of round: roles in round 1 (copied from round 1 later), then a
    /// fresh random split into subgroups A and B.
    pub(crate) fn match_in_pairs(&mut self) -> Result<()> {
        let round = self.current_round();

        let roles = if round == 1 {
            assign_roles(&mut self.stream(1, Purpose::Roles))
        } else {
            let mut roles = [Role::Low; GROUP_SIZE];
            for (seat, slot) in self.players.iter().enumerate() {
                roles[seat] = slot
                    .in_round(1)?
                    .role
                    .ok_or(ExperimentError::MissingRecord { round: 1 })?;
            }
            roles
        };

        let subgroups = split_in_pairs(&mut self.stream(round, Purpose::Pairing))?;
        let mut opponents = [0u8; GROUP_SIZE];
        for (seat, opponent) in opponents.iter_mut().enumerate() {
            *opponent = opponent_of(&subgroups, seat)? as u8 + 1;
        }

        for (seat, slot) in self.players.iter_mut().enumerate() {
            let record = slot.current_mut()?;
            record.role = Some(roles[seat]);
            record.subgroup = Some(subgroups[seat]);
            record.opponent_id = Some(opponents[seat]);
        }
        self.current_mut()?.matched = true;

        log::info!(
            "Group {} round {} matched: A = {:?}, B = {:?}",
            self.index(),
            round,
            seats_in(&subgroups, Subgroup::A),
            seats_in(&subgroups, Subgroup::B),
        );
        Ok(())
    }

    /// Vote round: tally ballots, then let the computer have its say.
    pub(crate) fn resolve_vote(&mut self) -> Result<()> {
        let round = self.current_round();

        let mut ballots = Vec::with_capacity(GROUP_SIZE);
        for slot in &self.players {
            let record = slot.current()?;
            let vote_yes = record.vote_yes.ok_or(ExperimentError::MissingVote {
                player: slot.id_in_group(),
            })?;
            ballots.push(Ballot {
                vote_yes,
                additional_shares: record.additional_shares.unwrap_or(0),
            });
        }

        let tally = tally(&ballots)?;
        let mut rng = self.stream(round, Purpose::Treatment);
        let group_index = self.index();
        let record = self.current_mut()?;
        let resolution = *resolve_once(&mut record.resolution, tally.decision, &mut rng)?;
        record.tally = Some(tally);
        record.treatment = Some(resolution.treatment);

        log::info!(
            "Group {} vote: {}/{} shares yes ({:?}), computer {} -> {}",
            group_index,
            tally.total_yes_weight,
            tally.total_weight,
            tally.decision,
            if resolution.overridden { "overrides" } else { "does not override" },
            resolution.treatment.label(),
        );
        Ok(())
    }

    /// Treatment frozen at the vote round, if the vote has happened
    pub fn treatment(&self, vote_round: u32) -> Option<Treatment> {
        self.history
            .in_round(vote_round)
            .and_then(|record| record.resolution)
            .map(|resolution| resolution.treatment)
    }

    /// End of round: pay every player, extend running totals, and settle
    /// on the last round.
    pub(crate) fn settle_round(&mut self, config: &ExperimentConfig, table: &PayoffTable) -> Result<()> {
        let round = self.current_round();
        let vote_round = config.vote_round;
        let tier = tier_for_round(round, vote_round, self.treatment(vote_round))?;

        let mut roles = [Role::Low; GROUP_SIZE];
        let mut subgroups = [Subgroup::A; GROUP_SIZE];
        let mut moves: [Option<Move>; GROUP_SIZE] = [None; GROUP_SIZE];
        for (seat, slot) in self.players.iter().enumerate() {
            let record = slot.current()?;
            let missing = ExperimentError::NotMatched { round };
            roles[seat] = record.role.ok_or_else(|| missing.clone())?;
            subgroups[seat] = record.subgroup.ok_or(missing)?;
            moves[seat] = record.action;
        }

        let results = play_round(
            table,
            tier,
            RoundInput { roles: &roles, subgroups: &subgroups, moves: &moves },
        )?;

        let mut updates: Vec<(Option<Currency>, Option<Currency>, Option<Settlement>)> =
            Vec::with_capacity(GROUP_SIZE);
        for (seat, slot) in self.players.iter().enumerate() {
            let payoff = results[seat].payoff;
            let (game1, game2) = match phase_of(round, vote_round) {
                Phase::BeforeVote => {
                    let previous = if round > 1 {
                        Some(running_total(slot.in_round(round - 1)?.cum_payoff_game1, round - 1)?)
                    } else {
                        None
                    };
                    (Some(accumulate(previous, payoff)?), None)
                }
                Phase::AfterVote => {
                    let previous = if round > vote_round {
                        Some(running_total(slot.in_round(round - 1)?.cum_payoff_game2, round - 1)?)
                    } else {
                        None
                    };
                    (None, Some(accumulate(previous, payoff)?))
                }
            };

            let settlement = if config.is_last_round(round) {
                let before_vote = vote_round - 1;
                let total_game1 = running_total(slot.in_round(before_vote)?.cum_payoff_game1, before_vote)?;
                let shares = slot.in_round(vote_round)?.additional_shares.unwrap_or(0);
                Some(settle(
                    total_game1,
                    running_total(game2, round)?,
                    shares,
                    config.cost_per_share,
                )?)
            } else {
                None
            };

            updates.push((game1, game2, settlement));
        }

        let group_index = self.index();
        for (seat, slot) in self.players.iter_mut().enumerate() {
            let result = &results[seat];
            let (game1, game2, settlement) = updates[seat];
            let record = slot.current_mut()?;
            record.payoff = Some(result.payoff);
            record.opponent_action = Some(result.opponent_move);
            record.opponent_payoff = Some(result.opponent_payoff);
            record.game2_round = game2_round(round, vote_round);
            record.cum_payoff_game1 = game1;
            record.cum_payoff_game2 = game2;
            record.settlement = settlement;

            log::debug!(
                "Group {} round {} player {}: {} vs {} -> {}",
                group_index,
                round,
                record.id_in_group,
                result.own_move.label(),
                result.opponent_move.label(),
                result.payoff,
            );
        }
        self.current_mut()?.settled = true;

        log::info!("Group {} round {} settled under {:?} game", group_index, round, tier);
        Ok(())
    }

    /// Close the settled round and open the next one, or finish.
    pub(crate) fn advance(&mut self, config: &ExperimentConfig) -> Result<()> {
        let round = self.current_round();
        if config.is_last_round(round) {
            self.finished = true;
            log::info!("Group {} finished after {} rounds", self.index(), round);
            return Ok(());
        }
        let treatment = self.current()?.treatment;
        self.open_round(round + 1, treatment);
        Ok(())
    }
}

fn running_total(total: Option<Currency>, round: u32) -> Result<Currency> {
    total.ok_or(ExperimentError::MissingRecord { round })
}

fn seats_in(subgroups: &[Subgroup; GROUP_SIZE], wanted: Subgroup) -> Vec<u8> {
    subgroups
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == wanted)
        .map(|(seat, _)| seat as u8 + 1)
        .collect()
}
