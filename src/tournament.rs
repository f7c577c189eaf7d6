//! Simulation mode for running many automated games in parallel
//!
//! Games are executed concurrently with rayon. Each game gets its own seed
//! derived from a base seed, so a run is reproducible regardless of how
//! rayon schedules the games.

use crate::{
    core::Team,
    game::{
        GameEndReason, GameLoop, GameState, HeuristicController, PlayerController,
        RandomController, VerbosityLevel,
    },
    loader::BoardConfig,
    Result,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Controller type for simulated seats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    Random,
    Heuristic,
}

/// Options for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub games: usize,
    pub base_seed: u64,
    pub max_turns: u32,
    /// Controller used for every team without an override
    pub default_controller: ControllerType,
    pub overrides: Vec<(Team, ControllerType)>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            games: 100,
            base_seed: 42,
            max_turns: 1000,
            default_controller: ControllerType::Heuristic,
            overrides: Vec::new(),
        }
    }
}

/// Aggregated results of a simulation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationReport {
    pub games: usize,
    pub wins: BTreeMap<Team, usize>,
    /// Games abandoned at the turn limit
    pub turn_limit_draws: usize,
    pub total_turns: u64,
    pub elapsed: Duration,
}

impl SimulationReport {
    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }

    pub fn print(&self) {
        println!("=== Simulation Complete ===");
        println!("Total games played: {}", self.games);
        println!("Elapsed time: {:.2}s", self.elapsed.as_secs_f64());
        if self.elapsed.as_secs_f64() > 0.0 {
            println!(
                "Games per second: {:.2}",
                self.games as f64 / self.elapsed.as_secs_f64()
            );
        }
        println!("Average turns: {:.1}\n", self.average_turns());

        println!("=== Team Win Rates ===");
        for (team, wins) in &self.wins {
            println!(
                "  {}: {} ({:.1}%)",
                team,
                wins,
                percent(*wins, self.games)
            );
        }
        println!(
            "  turn limit: {} ({:.1}%)",
            self.turn_limit_draws,
            percent(self.turn_limit_draws, self.games)
        );
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Seed of the `game_idx`-th game of a run
pub fn game_seed(base_seed: u64, game_idx: usize) -> u64 {
    base_seed.wrapping_add((game_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn make_controller(kind: ControllerType, team: Team, seed: u64) -> Box<dyn PlayerController> {
    match kind {
        ControllerType::Random => Box::new(RandomController::with_seed(team, seed)),
        ControllerType::Heuristic => Box::new(HeuristicController::new(team)),
    }
}

/// Play one silent game; returns (winner, turns played)
fn play_one(
    config: &BoardConfig,
    options: &SimulationOptions,
    game_idx: usize,
) -> Result<(Option<Team>, u32)> {
    let mut game = GameState::from_config(config)?;
    let seed = game_seed(options.base_seed, game_idx);
    game.seed_rng(seed);

    let teams = game.turn.turn_order.clone();
    let mut game_loop = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Silent)
        .with_max_turns(options.max_turns);
    for (i, team) in teams.iter().enumerate() {
        let kind = options
            .overrides
            .iter()
            .find(|(t, _)| t == team)
            .map(|(_, k)| *k)
            .unwrap_or(options.default_controller);
        let controller_seed = seed.wrapping_add(0x1234_5678_9ABC_DEF0).wrapping_add(i as u64);
        game_loop = game_loop.with_controller(make_controller(kind, *team, controller_seed));
    }

    let result = game_loop.run_headless()?;
    let winner = match result.end_reason {
        GameEndReason::TeamFinished(team) => Some(team),
        GameEndReason::TurnLimit | GameEndReason::Cancelled => None,
    };
    Ok((winner, result.turns_played))
}

/// Play `options.games` games in parallel and aggregate the outcomes
pub fn run_simulation(config: &BoardConfig, options: &SimulationOptions) -> Result<SimulationReport> {
    config.validate()?;
    let start = Instant::now();

    let outcomes: Vec<Result<(Option<Team>, u32)>> = (0..options.games)
        .into_par_iter()
        .map(|game_idx| play_one(config, options, game_idx))
        .collect();

    let mut report = SimulationReport {
        games: outcomes.len(),
        ..SimulationReport::default()
    };
    for team in config.resolved_turn_order() {
        report.wins.insert(team, 0);
    }
    for outcome in outcomes {
        let (winner, turns) = outcome?;
        report.total_turns += u64::from(turns);
        match winner {
            Some(team) => *report.wins.entry(team).or_insert(0) += 1,
            None => report.turn_limit_draws += 1,
        }
    }
    report.elapsed = start.elapsed();
    Ok(report)
}
