//! Whole-session flows driven through the public player API

use proptest::prelude::*;
use vote_experiment::treatment_logic::{
    seed_from_u64, Currency, Decision, ExperimentConfig, LogicError, Move, PayoffSchedule, Role,
    Subgroup, Tier, MAX_ADDITIONAL_SHARES,
};
use vote_experiment::{Arrival, ExperimentError, Session, Step};

const IDS: [u8; 4] = [1, 2, 3, 4];

fn session(config: ExperimentConfig, seed: u64) -> Session {
    Session::new(config, seed_from_u64(seed), 1).unwrap()
}

fn match_all(session: &mut Session) {
    for id in IDS {
        session.arrive_for_matching(0, id).unwrap();
    }
}

fn vote_all(session: &mut Session, ballots: [(bool, u32); 4]) {
    for (id, (vote_yes, shares)) in IDS.into_iter().zip(ballots) {
        session.submit_vote(0, id, vote_yes, shares).unwrap();
    }
}

fn act_all(session: &mut Session, actions: [Move; 4]) {
    for (id, action) in IDS.into_iter().zip(actions) {
        session.submit_action(0, id, action).unwrap();
    }
}

/// Play to the end; `ballots` at the vote round, `actions` every round.
fn play_out(session: &mut Session, ballots: [(bool, u32); 4], actions: [Move; 4]) {
    while !session.is_finished() {
        let round = session.group(0).unwrap().current_round();
        match_all(session);
        if round == session.config().vote_round {
            vote_all(session, ballots);
        }
        act_all(session, actions);
    }
}

/// One game-1 round, everyone cooperating for 95 points, then the vote.
fn rich_first_round() -> ExperimentConfig {
    ExperimentConfig {
        num_rounds: 2,
        vote_round: 2,
        payoffs: PayoffSchedule {
            mutual_cooperation: Currency::new(95),
            temptation: Currency::new(100),
            ..PayoffSchedule::default()
        },
        ..ExperimentConfig::equal_pay()
    }
}

#[test]
fn test_equal_pay_full_cooperation() {
    let mut session = session(ExperimentConfig::equal_pay(), 7);
    play_out(&mut session, [(true, 0); 4], [Move::Cooperate; 4]);

    let group = session.group(0).unwrap();
    assert!(group.is_finished());
    assert_eq!(group.history().len(), 8);

    for slot in group.players() {
        for round in 1..=8 {
            let record = slot.in_round(round).unwrap();
            assert_eq!(record.payoff, Some(Currency::new(50)));
            assert_eq!(record.same_choice(), Some(true));
            if round <= 4 {
                assert_eq!(record.game2_round, 0);
                assert_eq!(record.cum_payoff_game1, Some(Currency::new(50 * round as i64)));
                assert_eq!(record.cum_payoff_game2, None);
            } else {
                assert_eq!(record.game2_round, round - 4);
                assert_eq!(record.cum_payoff_game1, None);
                assert_eq!(record.cum_payoff_game2, Some(Currency::new(50 * (round - 4) as i64)));
            }
        }
        let settlement = slot.current().unwrap().settlement.unwrap();
        assert_eq!(settlement.cum_payoff_game1, Currency::new(200));
        assert_eq!(settlement.cum_payoff_game2, Currency::new(200));
        assert_eq!(settlement.final_payoff, Currency::new(400));
    }
}

#[test]
fn test_asymmetric_pay_scales_high_role() {
    let mut session = session(ExperimentConfig::asymmetric_pay(), 3);
    play_out(&mut session, [(false, 0); 4], [Move::Defect; 4]);

    let group = session.group(0).unwrap();
    let mut high = 0;
    for slot in group.players() {
        let role = slot.in_round(1).unwrap().role.unwrap();
        assert_eq!(slot.in_round(2).unwrap().role, Some(role));
        let expected = match role {
            Role::High => {
                high += 1;
                80
            }
            Role::Low => 40,
        };
        let settlement = slot.current().unwrap().settlement.unwrap();
        assert_eq!(settlement.cum_payoff_game1, Currency::new(expected));
        assert_eq!(settlement.cum_payoff_game2, Currency::new(expected));
        assert_eq!(settlement.additional_shares, 0);
        assert_eq!(settlement.final_payoff, Currency::new(2 * expected));
    }
    assert_eq!(high, 2);
}

#[test]
fn test_share_purchase_capped_by_game1_earnings() {
    let mut session = session(rich_first_round(), 11);
    match_all(&mut session);
    act_all(&mut session, [Move::Cooperate; 4]);
    match_all(&mut session);

    let err = session.submit_vote(0, 1, true, 10).unwrap_err();
    assert_eq!(
        err,
        ExperimentError::Logic(LogicError::PurchaseExceedsLimit { requested: 10, limit: 9 })
    );
    assert!(err.is_validation());
    assert!(err.to_string().contains("exceeds your limit"));

    // Nothing was written, so the player can try again
    let record = session.group(0).unwrap().player(1).unwrap().current().unwrap().clone();
    assert_eq!(record.vote_yes, None);
    assert_eq!(record.additional_shares, None);
    assert_eq!(
        session.submit_vote(0, 1, true, 9).unwrap(),
        Arrival::Waiting { remaining: 3 }
    );

    for id in [2, 3, 4] {
        session.submit_vote(0, id, false, 0).unwrap();
    }
    let vote = session.group(0).unwrap().current().unwrap().clone();
    let tally = vote.tally.unwrap();
    assert_eq!(tally.total_yes_weight, 10);
    assert_eq!(tally.total_weight, 13);
    assert_eq!(tally.decision, Decision::Yes);

    act_all(&mut session, [Move::Cooperate; 4]);
    let buyer = session.group(0).unwrap().player(1).unwrap().current().unwrap().clone();
    let settlement = buyer.settlement.unwrap();
    assert_eq!(settlement.share_cost, Currency::new(90));
    assert_eq!(
        settlement.final_payoff.points(),
        95 + settlement.cum_payoff_game2.points() - 90
    );
}

#[test]
fn test_asymmetric_pay_has_no_share_sales() {
    let mut session = session(ExperimentConfig::asymmetric_pay(), 5);
    match_all(&mut session);
    act_all(&mut session, [Move::Cooperate; 4]);
    match_all(&mut session);

    let err = session.submit_vote(0, 2, true, 1).unwrap_err();
    assert_eq!(err, ExperimentError::Logic(LogicError::SharePurchaseDisabled));
    session.submit_vote(0, 2, true, 0).unwrap();
}

#[test]
fn test_vote_round_ordering() {
    let mut session = session(ExperimentConfig::asymmetric_pay(), 9);
    match_all(&mut session);
    act_all(&mut session, [Move::Cooperate; 4]);
    match_all(&mut session);

    assert_eq!(
        session.submit_action(0, 1, Move::Cooperate).unwrap_err(),
        ExperimentError::VoteNotResolved
    );
    session.submit_vote(0, 1, true, 0).unwrap();
    assert_eq!(
        session.submit_vote(0, 1, false, 0).unwrap_err(),
        ExperimentError::AlreadySubmitted { player: 1, step: Step::Vote }
    );
    let record = session.group(0).unwrap().player(1).unwrap().current().unwrap().clone();
    assert_eq!(record.vote_yes, Some(true));
}

#[test]
fn test_tied_vote_resolves_consistently() {
    for seed in 0..20 {
        let mut session = session(ExperimentConfig::asymmetric_pay(), seed);
        play_out(
            &mut session,
            [(true, 0), (false, 0), (true, 0), (false, 0)],
            [Move::Cooperate; 4],
        );
        let group = session.group(0).unwrap();
        let vote = group.history().in_round(2).unwrap();
        let resolution = vote.resolution.unwrap();
        assert_eq!(resolution.decision, Decision::Tie);
        assert_eq!(vote.treatment, Some(resolution.treatment));
        if resolution.overridden {
            assert!(resolution.treatment.is_exogenous());
            assert!(resolution.override_dice.is_some());
            assert_eq!(resolution.tie_break_dice, None);
        } else {
            assert!(!resolution.treatment.is_exogenous());
            assert!(resolution.tie_break_dice.is_some());
        }
    }
}

#[test]
fn test_treatment_sets_game2_payoffs() {
    // Seat 1 defects on a cooperator only if paired with seats 3 or 4
    let actions = [Move::Defect, Move::Defect, Move::Cooperate, Move::Cooperate];
    for seed in 0..20 {
        let mut session = session(ExperimentConfig::equal_pay(), seed);
        play_out(&mut session, [(true, 0); 4], actions);

        let group = session.group(0).unwrap();
        let treatment = group.treatment(5).unwrap();
        for round in 5..=8 {
            assert_eq!(group.history().in_round(round).unwrap().treatment, Some(treatment));
            let record = group.player(1).unwrap().in_round(round).unwrap();
            if record.opponent_action == Some(Move::Cooperate) {
                let expected = match treatment.tier() {
                    Tier::Base => 60,
                    Tier::Cooperative => 48,
                };
                assert_eq!(record.payoff, Some(Currency::new(expected)));
            }
        }
    }
}

/// Running totals must be prefix sums of the round payoffs, and the final
/// payment must be both games minus the share cost.
fn assert_totals_consistent(session: &Session) {
    let vote_round = session.config().vote_round;
    let cost = session.config().cost_per_share.points();
    let group = session.group(0).unwrap();
    for slot in group.players() {
        let payoffs: Vec<i64> = slot
            .history()
            .iter()
            .map(|record| record.payoff.unwrap().points())
            .collect();
        let game1_rounds = vote_round as usize - 1;
        for round in 1..vote_round {
            let expected: i64 = payoffs[..round as usize].iter().sum();
            assert_eq!(
                slot.in_round(round).unwrap().cum_payoff_game1,
                Some(Currency::new(expected))
            );
        }
        for round in vote_round..=session.config().num_rounds {
            let expected: i64 = payoffs[game1_rounds..round as usize].iter().sum();
            assert_eq!(
                slot.in_round(round).unwrap().cum_payoff_game2,
                Some(Currency::new(expected))
            );
        }

        let shares = slot.in_round(vote_round).unwrap().additional_shares.unwrap();
        let settlement = slot.current().unwrap().settlement.unwrap();
        let game1: i64 = payoffs[..game1_rounds].iter().sum();
        let game2: i64 = payoffs[game1_rounds..].iter().sum();
        assert_eq!(settlement.additional_shares, shares);
        assert_eq!(settlement.final_payoff.points(), game1 + game2 - cost * shares as i64);
    }
}

#[test]
fn test_running_totals_are_prefix_sums() {
    let actions = [Move::Defect, Move::Cooperate, Move::Cooperate, Move::Defect];
    let mut session = session(ExperimentConfig::equal_pay(), 21);
    play_out(&mut session, [(true, 2), (false, 0), (true, 1), (false, 3)], actions);
    assert_totals_consistent(&session);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_sessions_keep_totals_consistent(
        seed in any::<u64>(),
        votes in any::<[bool; 4]>(),
        // Four rounds at 10 points or more always afford 4 shares
        shares in prop::array::uniform4(0u32..=4),
        choices in prop::array::uniform8(any::<[bool; 4]>()),
    ) {
        let mut session = session(ExperimentConfig::equal_pay(), seed);
        for cooperate in choices {
            let round = session.group(0).unwrap().current_round();
            match_all(&mut session);
            if round == 5 {
                let mut ballots = [(false, 0); 4];
                for (seat, ballot) in ballots.iter_mut().enumerate() {
                    *ballot = (votes[seat], shares[seat]);
                }
                vote_all(&mut session, ballots);
            }
            act_all(&mut session, cooperate.map(Move::from_cooperate));
        }
        prop_assert!(session.is_finished());
        assert_totals_consistent(&session);
    }
}

#[test]
fn test_pairings_are_symmetric_every_round() {
    let mut session = session(ExperimentConfig::equal_pay(), 33);
    play_out(&mut session, [(false, 0); 4], [Move::Cooperate; 4]);

    let group = session.group(0).unwrap();
    for round in 1..=8 {
        assert!(group.history().in_round(round).unwrap().matched);
        let mut in_a = 0;
        for slot in group.players() {
            let record = slot.in_round(round).unwrap();
            let opponent = group.player(record.opponent_id.unwrap()).unwrap().in_round(round).unwrap();
            assert_ne!(opponent.id_in_group, record.id_in_group);
            assert_eq!(opponent.opponent_id, Some(record.id_in_group));
            assert_eq!(opponent.subgroup, record.subgroup);
            assert_eq!(record.opponent_action, opponent.action);
            assert_eq!(record.opponent_payoff, opponent.payoff);
            if record.subgroup == Some(Subgroup::A) {
                in_a += 1;
            }
        }
        assert_eq!(in_a, 2);
    }
}

#[test]
fn test_finished_group_rejects_submissions() {
    let mut session = session(ExperimentConfig::asymmetric_pay(), 1);
    play_out(&mut session, [(true, 0); 4], [Move::Cooperate; 4]);
    assert_eq!(
        session.arrive_for_matching(0, 1).unwrap_err(),
        ExperimentError::SessionFinished
    );
}

#[test]
fn test_same_seed_same_session() {
    let run = |seed| {
        let mut session = Session::new(ExperimentConfig::equal_pay(), seed_from_u64(seed), 3).unwrap();
        for group in 0..3 {
            while !session.group(group).unwrap().is_finished() {
                let round = session.group(group).unwrap().current_round();
                for id in IDS {
                    session.arrive_for_matching(group, id).unwrap();
                }
                if round == 5 {
                    for id in IDS {
                        session.submit_vote(group, id, id % 2 == 0, u32::from(id)).unwrap();
                    }
                }
                for id in IDS {
                    let action = Move::from_cooperate(id <= 2);
                    session.submit_action(group, id, action).unwrap();
                }
            }
        }
        serde_json::to_value(session.summary()).unwrap()
    };

    assert_eq!(run(99), run(99));
}

/// Game-1 payoffs big enough that the second round's running total
/// overflows.
fn overflowing_schedule() -> ExperimentConfig {
    ExperimentConfig {
        payoffs: PayoffSchedule {
            mutual_cooperation: Currency::new(i64::MAX / 2 + 1),
            temptation: Currency::new(i64::MAX),
            ..PayoffSchedule::default()
        },
        ..ExperimentConfig::equal_pay()
    }
}

#[test]
fn test_overflow_halts_the_group() {
    let mut session = Session::new(overflowing_schedule(), seed_from_u64(4), 2).unwrap();
    for round in 1..=2 {
        for group in 0..2 {
            for id in IDS {
                session.arrive_for_matching(group, id).unwrap();
            }
        }
        for id in [1, 2, 3] {
            session.submit_action(0, id, Move::Cooperate).unwrap();
        }
        let last = session.submit_action(0, 4, Move::Cooperate);
        if round == 1 {
            assert_eq!(last.unwrap(), Arrival::Released);
        } else {
            assert_eq!(last.unwrap_err(), ExperimentError::Logic(LogicError::Overflow));
        }
        act_all_in(&mut session, 1, [Move::Defect; 4]);
    }

    let halted = ExperimentError::GroupHalted {
        group: 0,
        reason: "Arithmetic overflow".to_string(),
    };
    assert_eq!(session.arrive_for_matching(0, 1).unwrap_err(), halted);
    assert_eq!(session.submit_action(0, 1, Move::Cooperate).unwrap_err(), halted);
    assert!(!halted.is_validation());

    // The failed round wrote nothing and the group stayed in it
    let group = session.group(0).unwrap();
    assert_eq!(group.current_round(), 2);
    assert_eq!(group.halted_reason(), Some("Arithmetic overflow"));
    assert!(!group.current().unwrap().settled);
    assert_eq!(group.player(1).unwrap().current().unwrap().payoff, None);

    // The other group keeps going
    assert_eq!(session.group(1).unwrap().current_round(), 3);
    session.arrive_for_matching(1, 1).unwrap();

    let summary = serde_json::to_value(session.summary()).unwrap();
    assert_eq!(summary["groups"][0]["halted"], "Arithmetic overflow");
    assert!(summary["groups"][1].get("halted").is_none());
}

fn act_all_in(session: &mut Session, group: u32, actions: [Move; 4]) {
    for (id, action) in IDS.into_iter().zip(actions) {
        session.submit_action(group, id, action).unwrap();
    }
}

#[test]
fn test_share_cap_never_exceeds_nine() {
    let mut session = session(ExperimentConfig::equal_pay(), 8);
    for _ in 1..5 {
        match_all(&mut session);
        act_all(&mut session, [Move::Cooperate; 4]);
    }
    match_all(&mut session);

    // 200 points would buy 20 shares without the cap
    let err = session.submit_vote(0, 1, true, MAX_ADDITIONAL_SHARES + 1).unwrap_err();
    assert_eq!(
        err,
        ExperimentError::Logic(LogicError::PurchaseExceedsLimit { requested: 10, limit: 9 })
    );
    vote_all(&mut session, [(true, MAX_ADDITIONAL_SHARES); 4]);
    let tally = session.group(0).unwrap().current().unwrap().tally.unwrap();
    assert_eq!(tally.total_weight, 40);
}
