use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use memory_match::autoplay::{play_to_completion, PerfectMemory, RandomStrategy, Strategy};
use memory_match::config::{BoardSize, GameConfig};
use memory_match::engine::MatchEngine;
use memory_match::generator::{generate, Difficulty};
use memory_match::item::{demo_pool, load_items};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare automated memory strategies", long_about = None)]
struct Args {
    /// Number of boards to play per strategy
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// TOML file with game settings; flags below override it
    #[clap(long)]
    config: Option<PathBuf>,

    /// Board size as ROWSxCOLUMNS
    #[clap(long)]
    size: Option<BoardSize>,

    /// Only use items from this year on
    #[clap(long)]
    from_year: Option<i32>,

    /// Only use items before this year
    #[clap(long)]
    to_year: Option<i32>,

    /// easy: both tiles of a pair look the same; hard: match front with back
    #[clap(long)]
    difficulty: Option<Difficulty>,

    /// Seed of the first board; board i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// JSON file with the item pool (defaults to the built-in emoji pool)
    #[clap(long)]
    items: Option<PathBuf>,

    /// Give up on a board after this many clicks
    #[clap(long, default_value_t = 10_000)]
    max_clicks: usize,
}

fn build_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_toml(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(size) = args.size {
        config.board = size;
    }
    if let Some(start) = args.from_year {
        config.years.start = start;
    }
    if let Some(end) = args.to_year {
        config.years.end = end;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    config.validate().context("Invalid game settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = build_config(&args)?;

    let pool = match &args.items {
        Some(path) => load_items(path)
            .with_context(|| format!("Failed to load items from {}", path.display()))?,
        None => demo_pool(),
    };
    let pair_count = config.pair_count();

    let mut strategies: Vec<Box<dyn Strategy>> =
        vec![Box::new(RandomStrategy), Box::new(PerfectMemory::default())];
    let mut all_moves: HashMap<&'static str, Vec<u32>> = HashMap::new();

    info!(
        "Evaluating {} strategies on {} boards of {} pairs ({}, {})",
        strategies.len(),
        args.boards,
        pair_count,
        config.years,
        config.difficulty
    );

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx as u64;
        let mut rng = SmallRng::seed_from_u64(current_seed);
        let tiles = generate(
            &pool,
            pair_count,
            config.years.filter(),
            config.difficulty,
            &mut rng,
        )
        .context("Failed to generate board")?;

        for strategy in strategies.iter_mut() {
            strategy.reset();
            let mut engine = MatchEngine::new(tiles.clone());
            let mut play_rng = SmallRng::seed_from_u64(current_seed);
            let outcome =
                play_to_completion(&mut engine, strategy.as_mut(), &mut play_rng, args.max_clicks);

            if !outcome.won {
                warn!(
                    "Strategy {} gave up on board {} (seed {}) after {} clicks",
                    strategy.name(),
                    board_idx,
                    current_seed,
                    outcome.clicks.len()
                );
                continue;
            }
            println!(
                "  Board {:<4} Strategy: {:<16} Moves: {}",
                board_idx,
                strategy.name(),
                outcome.moves
            );
            all_moves.entry(strategy.name()).or_default().push(outcome.moves);
        }
    }

    println!("\n--- Average Moves ---");
    let mut averages: Vec<(&str, f64)> = all_moves
        .iter()
        .map(|(name, moves)| {
            let total: u32 = moves.iter().sum();
            (*name, total as f64 / moves.len() as f64)
        })
        .collect();
    averages.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    for (name, avg) in averages {
        println!("Strategy {:<16}: Average Moves = {:.2}", name, avg);
    }
    Ok(())
}
