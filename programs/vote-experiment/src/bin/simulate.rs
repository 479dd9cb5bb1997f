//! Bot-driven session simulator
//!
//! Plays whole sessions with scripted participants and prints the session
//! summary as JSON.
//!
//! Usage: simulate --variant equal-pay --groups 10 --seed 42 --bot reciprocal

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use vote_experiment::treatment_logic::{
    seed_from_u64, share_limit, ExperimentConfig, Move, SeededRng, Variant,
};
use vote_experiment::Session;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    AsymmetricPay,
    EqualPay,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::AsymmetricPay => Variant::AsymmetricPay,
            VariantArg::EqualPay => Variant::EqualPay,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Bot {
    /// Always cooperates, votes yes, buys no shares
    Cooperator,
    /// Always defects, votes no, buys every affordable share
    Defector,
    /// Coin flips for everything
    Random,
    /// Tit-for-tat against whoever it was paired with last round
    Reciprocal,
}

#[derive(Parser, Debug)]
#[command(about = "Simulate sessions of the vote-on-the-game Prisoner's Dilemma")]
struct Args {
    /// JSON config; overrides --variant
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "equal-pay")]
    variant: VariantArg,
    #[arg(long, default_value_t = 1)]
    groups: u32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, value_enum, default_value = "random")]
    bot: Bot,
    /// Write the summary here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<ExperimentConfig> {
    match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(ExperimentConfig::from_json(&json)?)
        }
        None => Ok(ExperimentConfig::for_variant(args.variant.into())),
    }
}

fn choose_action(bot: Bot, session: &Session, group: u32, id: u8, rng: &mut SeededRng) -> anyhow::Result<Move> {
    Ok(match bot {
        Bot::Cooperator => Move::Cooperate,
        Bot::Defector => Move::Defect,
        Bot::Random => Move::from_cooperate(rng.next_bool()),
        Bot::Reciprocal => {
            let slot = session.group(group)?.player(id)?;
            let round = slot.current()?.round;
            slot.history()
                .in_round(round.saturating_sub(1))
                .and_then(|previous| previous.opponent_action)
                .unwrap_or(Move::Cooperate)
        }
    })
}

fn choose_ballot(bot: Bot, session: &Session, group: u32, id: u8, rng: &mut SeededRng) -> anyhow::Result<(bool, u32)> {
    let config = session.config();
    let limit = if config.weighted_votes() {
        let round = config.vote_round - 1;
        let game1 = session
            .group(group)?
            .player(id)?
            .in_round(round)?
            .cum_payoff_game1
            .with_context(|| format!("no game-1 total for player {} in round {}", id, round))?;
        share_limit(game1, config.cost_per_share, config.max_additional_shares)
    } else {
        0
    };

    Ok(match bot {
        Bot::Cooperator | Bot::Reciprocal => (true, 0),
        Bot::Defector => (false, limit),
        Bot::Random => (rng.next_bool(), rng.next_below(limit + 1)),
    })
}

fn play_group(session: &mut Session, group: u32, bot: Bot, rng: &mut SeededRng) -> anyhow::Result<()> {
    while !session.group(group)?.is_finished() {
        let round = session.group(group)?.current_round();

        for id in 1..=4 {
            session.arrive_for_matching(group, id)?;
        }
        if round == session.config().vote_round {
            for id in 1..=4 {
                let (vote_yes, shares) = choose_ballot(bot, session, group, id, rng)?;
                session
                    .submit_vote(group, id, vote_yes, shares)
                    .with_context(|| format!("group {} player {} vote", group, id))?;
            }
        }
        // Choices are made against the same snapshot, then submitted
        let mut actions = [Move::Cooperate; 4];
        for (seat, action) in actions.iter_mut().enumerate() {
            *action = choose_action(bot, session, group, seat as u8 + 1, rng)?;
        }
        for (seat, action) in actions.into_iter().enumerate() {
            session.submit_action(group, seat as u8 + 1, action)?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let mut session = Session::new(config, seed_from_u64(args.seed), args.groups)?;
    // Bots draw from a stream the session never touches
    let mut rng = SeededRng::for_group(&seed_from_u64(!args.seed), 0);

    for group in 0..args.groups {
        play_group(&mut session, group, args.bot, &mut rng)?;
    }

    let json = serde_json::to_string_pretty(&session.summary())?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            log::info!("Summary written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
