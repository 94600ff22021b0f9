use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use twentyone::{EngineError, HandEngine, Step, TableRules};

mod render;
mod shoe;

use render::{ConsoleTable, TallyObserver};
use shoe::Shoe;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "twentyone", about = "Player-vs-dealer blackjack rounds in the terminal")]
struct Cli {
    /// Shoe shuffle seed (random when omitted)
    #[arg(long, env = "TWENTYONE_SEED")]
    seed: Option<u64>,

    /// Number of decks in the shoe
    #[arg(long, env = "TWENTYONE_DECKS", default_value = "6")]
    decks: u8,

    /// JSON file with table rules; flags below override its fields
    #[arg(long, env = "TWENTYONE_RULES")]
    rules_file: Option<PathBuf>,

    /// A total at or above this busts
    #[arg(long)]
    bust_threshold: Option<u8>,

    /// Total that ends the round on the initial deal
    #[arg(long)]
    blackjack_value: Option<u8>,

    /// Dealer draws while below this total
    #[arg(long)]
    dealer_draw_threshold: Option<u8>,

    /// Also demote the dealer's aces from 11 to 1 to avoid a bust
    #[arg(long, action = clap::ArgAction::Set)]
    dealer_ace_correction: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play rounds interactively
    Play,

    /// Auto-play rounds and print the outcome tally as JSON
    Simulate {
        /// Rounds to play
        #[arg(long, default_value = "10000")]
        rounds: u32,

        /// Player stands at or above this total
        #[arg(long, default_value = "17")]
        stand_on: u8,
    },
}

enum Input {
    Hit,
    Stand,
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), BoxErr> {
    let rules = load_rules(&cli)?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("Shoe: {} deck(s), seed {seed}", cli.decks);
    log::debug!("Rules: {rules:?}");

    let mut engine = HandEngine::new(Shoe::new(cli.decks, seed), rules)?;

    match cli.command {
        Command::Play => {
            engine.subscribe(Box::new(ConsoleTable::default()));
            play(&mut engine)
        }
        Command::Simulate { rounds, stand_on } => {
            let (observer, tally) = TallyObserver::new(rules);
            engine.subscribe(Box::new(observer));
            simulate(&mut engine, rounds, stand_on)?;

            let tally = tally.lock().map_err(|_| "tally lock poisoned")?;
            println!("{}", serde_json::to_string_pretty(&*tally)?);
            Ok(())
        }
    }
}

fn load_rules(cli: &Cli) -> Result<TableRules, BoxErr> {
    let mut rules = match &cli.rules_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
            serde_json::from_str(&raw)?
        }
        None => TableRules::default(),
    };

    if let Some(value) = cli.bust_threshold {
        rules.bust_threshold = value;
    }
    if let Some(value) = cli.blackjack_value {
        rules.blackjack_value = value;
    }
    if let Some(value) = cli.dealer_draw_threshold {
        rules.dealer_draw_threshold = value;
    }
    if let Some(value) = cli.dealer_ace_correction {
        rules.dealer_ace_correction = value;
    }

    rules.validate()?;
    Ok(rules)
}

fn prepare_shoe(engine: &mut HandEngine<Shoe>) {
    if engine.source().past_cut() {
        log::info!("Cut card reached, reshuffling");
        engine.source_mut().shuffle();
    }
}

/// Starts a round, reshuffling and retrying once if the shoe ran dry mid-deal.
fn start(engine: &mut HandEngine<Shoe>) -> Result<Step, BoxErr> {
    prepare_shoe(engine);
    match engine.start_round() {
        Err(EngineError::Source(e)) => {
            log::warn!("Round abandoned ({e}), reshuffling");
            engine.source_mut().shuffle();
            Ok(engine.start_round()?)
        }
        other => Ok(other?),
    }
}

/// Feeds one player input to the engine. Rejected inputs and abandoned
/// rounds are logged and yield `None`.
fn apply(engine: &mut HandEngine<Shoe>, input: Input) -> Result<Option<Step>, BoxErr> {
    let result = match input {
        Input::Hit => engine.player_draw(),
        Input::Stand => engine.player_end_turn().map(Step::Finished),
    };
    match result {
        Ok(step) => Ok(Some(step)),
        Err(e @ EngineError::OutOfTurn { .. }) => {
            log::warn!("Ignored input: {e}");
            Ok(None)
        }
        Err(EngineError::Source(e)) => {
            log::warn!("Round abandoned: {e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn prompt(text: &str) -> Result<(), BoxErr> {
    print!("{text}");
    io::stdout().flush()?;
    Ok(())
}

fn play(engine: &mut HandEngine<Shoe>) -> Result<(), BoxErr> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        prompt("[enter] deal, (q)uit > ")?;
        match lines.next() {
            None => return Ok(()),
            Some(line) => {
                if matches!(line?.trim(), "q" | "quit") {
                    return Ok(());
                }
            }
        }

        let mut step = Some(start(engine)?);
        while let Some(Step::PlayerTurn { .. }) = step {
            prompt("(h)it, (s)tand, (q)uit > ")?;
            let Some(line) = lines.next() else {
                engine.abandon_round();
                return Ok(());
            };
            let input = match line?.trim() {
                "h" | "hit" => Input::Hit,
                "s" | "stand" => Input::Stand,
                "q" | "quit" => {
                    engine.abandon_round();
                    return Ok(());
                }
                other => {
                    println!("Unknown command {other:?}");
                    continue;
                }
            };
            step = apply(engine, input)?;
        }
    }
}

fn simulate(engine: &mut HandEngine<Shoe>, rounds: u32, stand_on: u8) -> Result<(), BoxErr> {
    for round in 0..rounds {
        let mut step = Some(start(engine)?);
        while let Some(Step::PlayerTurn { player_total, .. }) = step {
            let input = if player_total >= stand_on {
                Input::Stand
            } else {
                Input::Hit
            };
            step = apply(engine, input)?;
        }
        if (round + 1) % 1000 == 0 {
            log::info!("Simulated {} rounds", round + 1);
        }
    }
    Ok(())
}
