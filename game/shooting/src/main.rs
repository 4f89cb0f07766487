//! Headless shooting demo.
//!
//! Spawns a player facing a line of enemies, holds the fire button, and runs
//! the fixed-timestep loop until the configured tick count is reached.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use engine_runtime::{FrameInput, TickLoop};
use game_components::{HealthComponent, TargetType};
use game_shooting::{DemoConfig, ShootingWorld};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shooting_demo", about = "Headless player shooting demo")]
struct Args {
    /// JSON demo config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run (overrides the config)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Ticks per second (overrides the config)
    #[arg(long)]
    tick_rate: Option<f64>,

    /// Hold the pause toggle for the whole run
    #[arg(long)]
    paused: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("shooting_demo=info".parse()?)
                .add_directive("game_shooting=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.tick.max_ticks = ticks;
    }
    if let Some(rate) = args.tick_rate {
        config.tick.tick_rate = rate;
    }

    let (mut world, player) = ShootingWorld::from_config(&config)?;

    let tally: Rc<RefCell<BTreeMap<TargetType, u32>>> = Rc::default();
    let counter = Rc::clone(&tally);
    world.kills.subscribe(move |kind| {
        *counter.borrow_mut().entry(*kind).or_default() += 1;
    });

    let input = FrameInput {
        primary_action: true,
        paused: args.paused,
    };
    let mut tick_loop = TickLoop::new(config.tick.clone());
    tick_loop.run(&mut world.root, |_| input)?;

    info!(
        ticks = tick_loop.tick_count(),
        entities = world.root.entity_count(),
        player_health = player.body.borrow().current_health(),
        kills = ?tally.borrow(),
        "demo finished"
    );
    Ok(())
}
