//! Random AI controller for testing and baseline gameplay
//!
//! Picks uniformly among the legal pawns.
//! Serves as a baseline for the heuristic.

use crate::core::{PawnId, Team};
use crate::game::controller::{GameStateView, PlayerController};
use rand::Rng;

/// A controller that makes random choices
pub struct RandomController {
    team: Team,
    rng: Box<dyn rand::RngCore>,
}

impl RandomController {
    /// Create a new random controller with default RNG
    pub fn new(team: Team) -> Self {
        RandomController {
            team,
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(team: Team, seed: u64) -> Self {
        use rand::SeedableRng;
        RandomController {
            team,
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl PlayerController for RandomController {
    fn team(&self) -> Team {
        self.team
    }

    fn choose_pawn(&mut self, view: &GameStateView, roll: u8, legal: &[PawnId]) -> Option<PawnId> {
        if legal.is_empty() {
            return None;
        }
        let pawn = legal[self.rng.gen_range(0..legal.len())];
        view.logger().controller_choice(
            "RANDOM",
            &format!("{} moves pawn {} with {}", self.team, pawn, roll),
        );
        Some(pawn)
    }

    fn on_game_end(&mut self, view: &GameStateView, won: bool) {
        let outcome = if won { "wins" } else { "loses" };
        view.logger()
            .normal(&format!("random controller for {} {}", self.team, outcome));
    }
}
