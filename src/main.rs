//! Ludo Offers - Main Binary
//!
//! Console front end: play against the heuristic, run parallel simulations,
//! or validate board files.

use clap::{Parser, Subcommand, ValueEnum};
use ludo_offers::{
    core::{PawnId, Team},
    game::{
        AnimationRequest, BoardCommand, GameLoop, GameState, InputEvent, OutputMode, RandomController,
        VerbosityLevel,
    },
    loader::BoardConfig,
    tournament::{self, SimulationOptions},
    Result,
};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Controller type for automated seats
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Makes random choices
    Random,
    /// Capture first, then deploy on a six, then most advanced pawn
    Heuristic,
}

impl From<ControllerType> for tournament::ControllerType {
    fn from(kind: ControllerType) -> Self {
        match kind {
            ControllerType::Random => tournament::ControllerType::Random,
            ControllerType::Heuristic => tournament::ControllerType::Heuristic,
        }
    }
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "ludo")]
#[command(about = "Ludo Offers - race-track board game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the console; human seats read commands from stdin
    Play {
        /// Board file (.json); defaults to the classic board
        #[arg(long, value_name = "BOARD")]
        board: Option<PathBuf>,

        /// Teams controlled from stdin
        #[arg(long = "human", value_name = "TEAM")]
        humans: Vec<Team>,

        /// Controller for the remaining teams
        #[arg(long, value_enum, default_value = "heuristic")]
        ai: ControllerType,

        /// Set random seed for deterministic play
        #[arg(long)]
        seed: Option<u64>,

        /// Delay per animated board command, in milliseconds
        #[arg(long, default_value_t = 150)]
        delay_ms: u64,

        /// Maximum team turns
        #[arg(long, default_value_t = 1000)]
        max_turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Also record the game log and write it to this file when the game ends
        #[arg(long, value_name = "FILE")]
        transcript: Option<PathBuf>,
    },

    /// Run many automated games in parallel and print statistics
    Simulate {
        /// Board file (.json); defaults to the classic board
        #[arg(long, value_name = "BOARD")]
        board: Option<PathBuf>,

        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Base seed; game i uses a seed derived from it
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Maximum team turns per game
        #[arg(long, default_value_t = 1000)]
        max_turns: u32,

        /// Controller for every team without an override
        #[arg(long, value_enum, default_value = "heuristic")]
        controller: ControllerType,

        /// Teams that use the random controller instead
        #[arg(long = "random", value_name = "TEAM")]
        random_teams: Vec<Team>,
    },

    /// Check board files and report the first problem in each
    Validate {
        #[arg(value_name = "BOARD", required = true)]
        boards: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            board,
            humans,
            ai,
            seed,
            delay_ms,
            max_turns,
            verbosity,
            transcript,
        } => {
            let options = PlayOptions {
                humans,
                ai,
                seed,
                delay: Duration::from_millis(delay_ms),
                max_turns,
                verbosity: verbosity.into(),
                transcript,
            };
            run_play(board, options).await?
        }
        Commands::Simulate {
            board,
            games,
            seed,
            max_turns,
            controller,
            random_teams,
        } => {
            let config = load_board(board.as_deref()).await?;
            let options = SimulationOptions {
                games,
                base_seed: seed,
                max_turns,
                default_controller: controller.into(),
                overrides: random_teams
                    .into_iter()
                    .map(|team| (team, tournament::ControllerType::Random))
                    .collect(),
            };
            println!("=== Ludo Offers - Simulation Mode ===\n");
            println!("Running {games} games (seed {seed})\n");
            let report = tokio::task::spawn_blocking(move || tournament::run_simulation(&config, &options))
                .await
                .map_err(|e| ludo_offers::LudoError::InvalidAction(format!("simulation task failed: {e}")))??;
            report.print();
        }
        Commands::Validate { boards } => run_validate(&boards).await?,
    }

    Ok(())
}

async fn load_board(path: Option<&Path>) -> Result<BoardConfig> {
    match path {
        Some(path) => BoardConfig::load_from_file_async(path).await,
        None => Ok(BoardConfig::classic()),
    }
}

struct PlayOptions {
    humans: Vec<Team>,
    ai: ControllerType,
    seed: Option<u64>,
    delay: Duration,
    max_turns: u32,
    verbosity: VerbosityLevel,
    transcript: Option<PathBuf>,
}

async fn run_play(board: Option<PathBuf>, options: PlayOptions) -> Result<()> {
    let PlayOptions {
        humans,
        ai,
        seed,
        delay,
        max_turns,
        verbosity,
        transcript,
    } = options;

    let config = load_board(board.as_deref()).await?;
    let mut game = GameState::from_config(&config)?;
    let seed = seed.unwrap_or_else(rand::random);
    game.seed_rng(seed);
    if transcript.is_some() {
        game.logger.set_output_mode(OutputMode::Both);
    }

    println!("=== Ludo Offers ===");
    println!("Seed: {seed}");
    if !humans.is_empty() {
        println!("Commands: 'r' to roll, a pawn number to select it, 'q' to quit\n");
    }

    let teams = game.turn.turn_order.clone();
    let mut game_loop = GameLoop::new(&mut game)
        .with_verbosity(verbosity)
        .with_max_turns(max_turns);
    for (i, team) in teams.iter().enumerate() {
        if humans.contains(team) {
            game_loop = game_loop.with_human(*team);
        } else if let ControllerType::Random = ai {
            let controller_seed = seed.wrapping_add(i as u64 + 1);
            game_loop = game_loop.with_controller(Box::new(RandomController::with_seed(*team, controller_seed)));
        }
    }

    let (input_tx, mut input_rx) = mpsc::channel(16);
    spawn_stdin_reader(input_tx);

    let (anim_tx, anim_rx) = mpsc::channel(16);
    let animator = tokio::spawn(console_animator(anim_rx, delay));

    let result = game_loop.run(&mut input_rx, Some(&anim_tx)).await?;
    drop(game_loop);
    drop(anim_tx);
    let _ = animator.await;

    println!("\nGame over: {:?} after {} turns", result.end_reason, result.turns_played);
    if let Some(path) = transcript {
        tokio::fs::write(&path, game.logger.transcript()).await?;
        println!("Transcript written to {}", path.display());
    }
    Ok(())
}

/// Forward stdin lines as input events until stdin closes or the game stops listening
fn spawn_stdin_reader(tx: mpsc::Sender<InputEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let event = match line.trim().to_lowercase().as_str() {
                "" | "r" | "roll" => InputEvent::RollRequested,
                "q" | "quit" => InputEvent::Quit,
                other => match other.parse::<u32>() {
                    Ok(id) => InputEvent::PawnSelected(PawnId::new(id)),
                    Err(_) => {
                        eprintln!("unrecognised command '{other}'");
                        continue;
                    }
                },
            };
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
    });
}

/// Print each board command, wait, then report it done
async fn console_animator(mut rx: mpsc::Receiver<AnimationRequest>, delay: Duration) {
    while let Some(request) = rx.recv().await {
        match request.command {
            BoardCommand::MovePawn { pawn, cell } => println!("    pawn {pawn} -> {cell}"),
            BoardCommand::PlayCapture { pawn } => println!("    *** pawn {pawn} captured ***"),
            BoardCommand::ReturnToStart { pawn } => println!("    pawn {pawn} returns to start"),
        }
        tokio::time::sleep(delay).await;
        let _ = request.done.send(());
    }
}

async fn run_validate(boards: &[PathBuf]) -> Result<()> {
    let mut failures = 0;
    for path in boards {
        match BoardConfig::load_from_file_async(path).await {
            Ok(config) => println!(
                "{}: ok ({} teams, ring {}, {} offers)",
                path.display(),
                config.teams.len(),
                config.ring_size,
                config.offers.len()
            ),
            Err(e) => {
                failures += 1;
                println!("{}: {}", path.display(), e);
            }
        }
    }
    if failures > 0 {
        return Err(ludo_offers::LudoError::InvalidConfig(format!(
            "{failures} of {} board files are invalid",
            boards.len()
        )));
    }
    Ok(())
}
