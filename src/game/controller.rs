//! Player controller trait and game state view
//!
//! This module defines the interface between the game engine and automated
//! players. The engine calls the controller when a pawn has to be picked,
//! and the controller inspects a read-only view of the game state to make
//! its choice.

use crate::core::{Board, Pawn, PawnId, Team, TeamPath, Zone};
use crate::game::capture::is_capture_landing;
use crate::game::movement::{resolve_move, MoveResolution};
use crate::game::{GameLogger, GameState};

/// Read-only view of game state for controllers
///
/// This provides access to game information without allowing mutation.
/// Controllers should only inspect this view to make decisions.
pub struct GameStateView<'a> {
    game: &'a GameState,
    team: Team,
}

impl<'a> GameStateView<'a> {
    /// Create a new view of the game state from a team's perspective
    pub fn new(game: &'a GameState, team: Team) -> Self {
        GameStateView { game, team }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn board(&self) -> &Board {
        &self.game.board
    }

    pub fn turn_id(&self) -> u32 {
        self.game.turn.turn_id
    }

    pub fn logger(&self) -> &GameLogger {
        &self.game.logger
    }

    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.game.pawns.get(id).ok()
    }

    /// This team's pawns in registration order
    pub fn own_pawns(&self) -> impl Iterator<Item = (PawnId, &Pawn)> {
        let team = self.team;
        self.game.pawns.iter().filter(move |(_, p)| p.team == team)
    }

    pub fn path(&self) -> Option<&TeamPath> {
        self.game.board.team_path(self.team)
    }

    /// Where a pawn would end up, without touching the game
    pub fn simulate_move(&self, id: PawnId, steps: u8) -> MoveResolution {
        match (self.pawn(id), self.game.board.team_path(self.team)) {
            (Some(pawn), Some(path)) if pawn.team == self.team => {
                resolve_move(pawn.zone, steps, path, self.game.board.ring_size())
            }
            _ => MoveResolution::Rejected,
        }
    }

    /// Would a pawn of this team landing in `zone` capture someone?
    pub fn would_capture(&self, zone: Zone) -> bool {
        zone.ring_index()
            .map(|idx| is_capture_landing(&self.game.board, &self.game.pawns, self.team, idx))
            .unwrap_or(false)
    }
}

/// Player controller trait
///
/// Implement this trait to create AI players. Human seats are fed through
/// the game loop's input channel instead.
pub trait PlayerController {
    /// Get the team this controller is responsible for
    fn team(&self) -> Team;

    /// Choose which pawn moves `roll` steps
    ///
    /// `legal` is never empty. Returning None (or a pawn outside `legal`)
    /// makes the game loop fall back to the first legal pawn.
    fn choose_pawn(&mut self, view: &GameStateView, roll: u8, legal: &[PawnId]) -> Option<PawnId>;

    /// Called when the game ends (for cleanup/logging)
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}
