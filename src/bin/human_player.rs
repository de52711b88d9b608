use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use memory_match::config::{BoardSize, GameConfig};
use memory_match::engine::Event;
use memory_match::error::{ItemError, SessionError};
use memory_match::generator::{Difficulty, YearRange};
use memory_match::item::{demo_pool, load_items_async, Item};
use memory_match::scheduler::TokioScheduler;
use memory_match::session::Session;
use memory_match::view::{to_terminal_string, win_summary};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play memory in the terminal", long_about = None)]
struct Args {
    /// JSON file with the item pool (defaults to the built-in emoji pool)
    #[clap(long)]
    items: Option<PathBuf>,

    /// TOML file with game settings; flags below override it
    #[clap(long)]
    config: Option<PathBuf>,

    /// Board size as ROWSxCOLUMNS, e.g. 4x4
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

    /// Seed for reproducible boards
    #[clap(long)]
    seed: Option<u64>,
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

async fn load_pool(path: Option<PathBuf>) -> Result<Vec<Item>, ItemError> {
    match path {
        Some(path) => load_items_async(path).await,
        None => Ok(demo_pool()),
    }
}

fn print_event(event: &Event) {
    match event {
        Event::Matched(_) => println!("Pair found!"),
        Event::MismatchPending(_) => println!("No match."),
        Event::GameWon { moves, elapsed } => {
            println!("---------------------");
            println!("🎉 ALL PAIRS FOUND! 🎉");
            println!("{}", win_summary(*moves, *elapsed));
            println!("---------------------");
            println!("Type 'n' for a new game.");
        }
        _ => {}
    }
}

fn draw(session: &Session<TokioScheduler>) {
    if let Some(view) = session.view() {
        println!("{}", to_terminal_string(&view, session.config().board.columns));
    }
}

fn prompt() {
    print!("Tile number, 'n' new game, 'h' help, 'q' quit: ");
    std::io::stdout().flush().ok();
}

fn print_help() {
    println!("  <number>          turn over a tile");
    println!("  n                 new game");
    println!("  size <R>x<C>      change the board size");
    println!("  years <from> <to> only use items from [from, to)");
    println!("  years all         use every item");
    println!("  easy | hard       change the difficulty");
    println!("  q                 quit");
}

enum Flow {
    Continue,
    Quit,
}

/// Parses one input line and applies it to the session.
fn handle_line(session: &mut Session<TokioScheduler>, line: &str) -> Flow {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let result = match parts.as_slice() {
        [] => return Flow::Continue,
        ["q"] => return Flow::Quit,
        ["h"] => {
            print_help();
            return Flow::Continue;
        }
        ["n"] => session.new_game().map(|_| ()),
        ["size", size] => match size.parse::<BoardSize>() {
            Ok(board) => {
                let config = GameConfig {
                    board,
                    ..session.config().clone()
                };
                session.reconfigure(config).map(|_| ())
            }
            Err(err) => {
                println!("{}", err);
                return Flow::Continue;
            }
        },
        ["years", "all"] => {
            let config = GameConfig {
                years: YearRange::ALL,
                ..session.config().clone()
            };
            session.reconfigure(config).map(|_| ())
        }
        ["years", from, to] => match (from.parse::<i32>(), to.parse::<i32>()) {
            (Ok(start), Ok(end)) => {
                let config = GameConfig {
                    years: YearRange::new(start, end),
                    ..session.config().clone()
                };
                session.reconfigure(config).map(|_| ())
            }
            _ => {
                println!("Years must be whole numbers, e.g. 'years 1600 1700'.");
                return Flow::Continue;
            }
        },
        [word] if word.parse::<Difficulty>().is_ok() => {
            let config = GameConfig {
                difficulty: word.parse().unwrap_or_default(),
                ..session.config().clone()
            };
            session.reconfigure(config).map(|_| ())
        }
        [number] => match number.parse::<usize>() {
            Ok(index) => session.click(index).map(|_| ()),
            Err(_) => {
                println!("Unknown command '{}'. Type 'h' for help.", number);
                return Flow::Continue;
            }
        },
        _ => {
            println!("Unknown command. Type 'h' for help.");
            return Flow::Continue;
        }
    };

    match result {
        Ok(()) => draw(session),
        Err(SessionError::NotReady) if session.pool_len() == 0 => {
            println!("Still loading items, please wait.")
        }
        Err(err) => println!("{}", err),
    }
    Flow::Continue
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = build_config(&args)?;

    let (scheduler, mut due) = TokioScheduler::new();
    let mut session = match args.seed {
        Some(seed) => Session::with_seed(config, scheduler, seed)?,
        None => Session::new(config, scheduler)?,
    };
    session.subscribe(print_event);

    println!("Welcome to Memory!");
    println!("Loading items...");

    let loader = load_pool(args.items.clone());
    tokio::pin!(loader);
    let mut loaded = false;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            result = &mut loader, if !loaded => {
                loaded = true;
                let items = result.context("Failed to load items")?;
                match session.load_items(items) {
                    Ok(_) => draw(&session),
                    Err(err) => println!("{}", err),
                }
                prompt();
            }
            Some(ticket) = due.recv() => {
                if !session.on_timeout(ticket).is_empty() {
                    println!();
                    draw(&session);
                    prompt();
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Error reading input")? else {
                    break;
                };
                if let Flow::Quit = handle_line(&mut session, line.trim()) {
                    break;
                }
                prompt();
            }
        }
    }

    println!("Thanks for playing!");
    Ok(())
}
