//! Kitchen Bot
//!
//! Runs the decision core against the sandbox kitchen for a fixed number of
//! turns and reports how the team did.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kitchen_core::config::DEFAULT_CONFIG_PATH;
use kitchen_core::{
    generate_orders, BotConfig, DecisionLog, Fleet, KitchenApi, Layout, Sandbox, SandboxRules,
};

const DEFAULT_LAYOUT: &str = include_str!("../layouts/kitchen.txt");
const DEFAULT_ENEMY_LAYOUT: &str = include_str!("../layouts/enemy.txt");

/// Command line arguments for the bot
#[derive(Parser, Debug)]
#[command(name = "kitchen_bot")]
#[command(about = "Plays a sandbox kitchen game with the order-serving bot")]
struct Args {
    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of turns to play
    #[arg(long, default_value_t = 400)]
    turns: u32,

    /// ASCII kitchen layout (built-in kitchen if omitted)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Enemy kitchen layout for raids (built-in if omitted)
    #[arg(long)]
    enemy: Option<PathBuf>,

    /// TOML tuning file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every decision as JSON lines to this file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Number of customer orders spread over the game
    #[arg(long, default_value_t = 20)]
    orders: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let home = match &args.layout {
        Some(path) => Layout::from_file(path)
            .with_context(|| format!("loading layout {}", path.display()))?,
        None => Layout::parse(DEFAULT_LAYOUT).context("parsing built-in layout")?,
    };
    let enemy = match &args.enemy {
        Some(path) => Layout::from_file(path)
            .with_context(|| format!("loading enemy layout {}", path.display()))?,
        None => Layout::parse(DEFAULT_ENEMY_LAYOUT).context("parsing built-in enemy layout")?,
    };

    let rules = SandboxRules {
        prices: config.prices.clone(),
        ..SandboxRules::default()
    };
    let mut sandbox = Sandbox::new(home, rules).with_enemy(enemy);
    let mut order_rng = SmallRng::seed_from_u64(config.seed);
    for order in generate_orders(&mut order_rng, args.orders, args.turns, &config.prices) {
        sandbox.add_order(order);
    }

    let mut log = match &args.trace {
        Some(path) => DecisionLog::new(path)
            .with_context(|| format!("creating trace file {}", path.display()))?,
        None => DecisionLog::null(),
    };

    info!(
        seed = config.seed,
        turns = args.turns,
        orders = args.orders,
        policy = ?config.assignment.policy,
        "Starting game"
    );

    let mut fleet = Fleet::new(config);
    for _ in 0..args.turns {
        fleet.play_turn(&mut sandbox);
        log.log_batch(&fleet.drain_events())
            .context("writing decision trace")?;
        sandbox.advance_turn();
    }
    log.flush().context("flushing decision trace")?;

    let stats = sandbox.stats();
    info!(
        money = sandbox.money(),
        served = stats.served,
        expired = stats.expired,
        rewards = stats.rewards,
        penalties = stats.penalties,
        decisions = log.event_count(),
        "Game over"
    );
    Ok(())
}

/// Explicit path must load; the default path is optional.
fn load_config(path: Option<&Path>) -> Result<BotConfig> {
    match path {
        Some(path) => BotConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            BotConfig::from_file(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("loading config {}", DEFAULT_CONFIG_PATH))
        }
        None => Ok(BotConfig::default()),
    }
}
