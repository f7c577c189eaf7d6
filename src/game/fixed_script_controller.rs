//! Fixed script controller for deterministic testing
//!
//! This controller follows a predetermined sequence of choices, making it ideal
//! for testing specific game scenarios. Once the script is exhausted, it defaults
//! to choosing the first option (index 0).

use crate::core::{PawnId, Team};
use crate::game::controller::{GameStateView, PlayerController};

/// A controller that follows a fixed script of choices for testing
///
/// The script is a sequence of indices into the legal pawn list. When the
/// script is exhausted, the controller always chooses index 0.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FixedScriptController {
    team: Team,
    /// The predetermined sequence of choice indices
    script: Vec<usize>,
    /// Current position in the script
    pub current_index: usize,
}

impl FixedScriptController {
    /// Create a new scripted controller with a predetermined sequence of choices
    ///
    /// # Example
    /// ```
    /// use ludo_offers::core::Team;
    /// use ludo_offers::game::FixedScriptController;
    ///
    /// let controller = FixedScriptController::new(
    ///     Team::Red,
    ///     vec![0, 1, 2, 0]  // Will choose options 0, 1, 2, 0, then default to 0
    /// );
    /// ```
    pub fn new(team: Team, script: Vec<usize>) -> Self {
        FixedScriptController {
            team,
            script,
            current_index: 0,
        }
    }

    /// Next index from the script, or 0 once it is exhausted
    fn next_choice(&mut self) -> usize {
        match self.script.get(self.current_index) {
            Some(choice) => {
                self.current_index += 1;
                *choice
            }
            None => 0,
        }
    }
}

impl PlayerController for FixedScriptController {
    fn team(&self) -> Team {
        self.team
    }

    fn choose_pawn(&mut self, view: &GameStateView, roll: u8, legal: &[PawnId]) -> Option<PawnId> {
        let choice_index = self.next_choice();
        let pawn = legal.get(choice_index).or_else(|| legal.first()).copied()?;
        view.logger().controller_choice(
            "SCRIPT",
            &format!(
                "{} moves pawn {} with {} (choice {})",
                self.team, pawn, roll, choice_index
            ),
        );
        Some(pawn)
    }
}
