//! Headless battle driver.
//!
//! Loads a content directory, plays one battle to the end with scripted
//! party input and prints the outcome with a digest of the event stream.
mod config;
mod host;

use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_content::{ContentFactory, shipped_data_dir};
use battle_core::{
    ActionItem, ActorId, BattleContext, BattleHost, BattleOptions, BattleSession, PcgRng,
    TroopId,
};
use clap::Parser;
use config::SimConfig;
use host::AnimatedHost;
use tracing::info;

/// Plays one battle without a frontend.
#[derive(Parser, Debug)]
#[command(name = "battle-sim")]
#[command(about = "Run a battle headlessly and print its outcome", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory (defaults to the shipped data)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Troop to fight
    #[arg(long, default_value_t = 1)]
    troop: u16,

    /// Party members by actor id
    #[arg(long, value_delimiter = ',', default_values_t = [1u16, 2, 3])]
    party: Vec<u16>,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Try to escape on the first command phase
    #[arg(long)]
    flee: bool,

    /// Forbid escaping
    #[arg(long)]
    no_escape: bool,

    /// Keep the party alive after a defeat
    #[arg(long)]
    can_lose: bool,

    /// Tick budget (overrides BATTLE_SIM_MAX_TICKS)
    #[arg(long)]
    max_ticks: Option<u32>,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SimConfig::from_env();
    if let Some(max_ticks) = cli.max_ticks {
        config.max_ticks = max_ticks;
    }

    run(&cli, &config)
}

fn run(cli: &Cli, config: &SimConfig) -> Result<()> {
    let factory = ContentFactory::new(cli.data.clone().unwrap_or_else(shipped_data_dir));
    let rules = factory.load_config()?;
    let catalog = factory.load_catalog()?;
    let actors: Vec<ActorId> = cli.party.iter().copied().map(ActorId).collect();
    let mut units = factory.build_combatants(&catalog, &rules, &actors, TroopId(cli.troop))?;

    let attack = ActionItem::Skill(rules.attack_skill);
    let options = BattleOptions::new(!cli.no_escape, cli.can_lose);
    let mut session = BattleSession::new(rules, options, &units, Box::new(PcgRng::new(cli.seed)))
        .context("Failed to set up battle")?;
    let mut host = AnimatedHost::new(config.busy_ticks);

    let encounter = session.on_encounter(&units);
    session.start_battle(&mut BattleContext::new(&mut units, &catalog, &mut host))?;
    info!(
        seed = cli.seed,
        troop = cli.troop,
        preemptive = encounter.preemptive,
        surprise = encounter.surprise,
        "simulation started"
    );

    let mut flee_pending = cli.flee;
    let mut ticks = 0;
    while !session.is_finished() {
        if ticks == config.max_ticks {
            anyhow::bail!(
                "Battle stalled in phase {} after {} ticks",
                session.phase(),
                ticks
            );
        }
        ticks += 1;
        host.advance();

        let mut ctx = BattleContext::new(&mut units, &catalog, &mut host);
        if session.is_inputting() && !ctx.host.is_busy() {
            if flee_pending {
                flee_pending = false;
                let escaped = session.process_escape(&mut ctx)?;
                info!(escaped, "escape attempted");
                continue;
            }
            if session.actor(ctx.units).is_some() {
                session.input_action(ctx.units, attack, None)?;
            }
            session.select_next_command(&mut ctx)?;
        } else {
            session.update(&mut ctx);
        }

        for event in session.take_reserved_events() {
            info!(%event, "battle event reserved");
        }
    }

    let outcome = session
        .outcome()
        .context("Finished battle has no outcome")?;
    let digest = host.log.digest().context("Failed to encode event log")?;

    println!("outcome: {outcome}");
    println!("ticks:   {ticks}");
    println!("events:  {}", host.log.events().len());
    if let Some(rewards) = session.rewards() {
        let items: Vec<String> = rewards.items.iter().map(ToString::to_string).collect();
        println!("exp:     {}", rewards.exp);
        println!("gold:    {}", rewards.gold);
        println!("items:   [{}]", items.join(", "));
    }
    println!("digest:  {}", hex::encode(digest));
    Ok(())
}
