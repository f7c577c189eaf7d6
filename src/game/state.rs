//! Main game state structure

use crate::core::{Board, EntityStore, Pawn, PawnId, Team, TeamPath, Zone};
use crate::game::{BoardCommand, GameEvent, GameLogger, TurnState};
use crate::loader::BoardConfig;
use crate::{LudoError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Complete game state
///
/// The single writer of pawn and turn data. Rules run as synchronous
/// methods on this struct; what they want animated or announced is queued
/// in the command and event outboxes for the game loop to drain.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Static topology
    pub board: Board,

    /// Pawn registry, in team order
    pub pawns: EntityStore<Pawn>,

    pub turn: TurnState,

    /// Seed the RNG was last initialised with
    pub rng_seed: u64,

    /// Dice and ability randomness
    pub rng: ChaCha12Rng,

    pub logger: GameLogger,

    commands: Vec<BoardCommand>,
    events: Vec<GameEvent>,
}

/// Serializable picture of the mutable part of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn: TurnState,
    pub pawns: EntityStore<Pawn>,
}

impl GameState {
    /// Create a game from a board, its pawns and a turn order
    pub fn new(board: Board, pawns: EntityStore<Pawn>, turn_order: SmallVec<[Team; 4]>) -> Self {
        GameState {
            board,
            pawns,
            turn: TurnState::new(turn_order),
            rng_seed: 0,
            rng: ChaCha12Rng::seed_from_u64(0),
            logger: GameLogger::new(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Validate a configuration and build a fresh game from it
    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        let (board, pawns) = config.build()?;
        Ok(GameState::new(board, pawns, config.resolved_turn_order()))
    }

    /// Set the RNG seed for deterministic gameplay
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng_seed = seed;
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Roll a six-sided die from the game RNG
    pub fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }

    pub fn active_team(&self) -> Team {
        self.turn.active_team()
    }

    pub fn get_pawn(&self, id: PawnId) -> Result<&Pawn> {
        self.pawns.get(id)
    }

    pub fn get_pawn_mut(&mut self, id: PawnId) -> Result<&mut Pawn> {
        self.pawns.get_mut(id)
    }

    pub fn team_path(&self, team: Team) -> Result<&TeamPath> {
        self.board
            .team_path(team)
            .ok_or_else(|| LudoError::UnknownTeam(team.to_string()))
    }

    /// IDs of a team's pawns in registration order
    pub fn team_pawns(&self, team: Team) -> SmallVec<[PawnId; 4]> {
        self.pawns
            .iter()
            .filter(|(_, p)| p.team == team)
            .map(|(id, _)| id)
            .collect()
    }

    /// A team has won when every one of its pawns is finished
    pub fn has_team_finished(&self, team: Team) -> bool {
        let mut any = false;
        for (_, pawn) in self.pawns.iter().filter(|(_, p)| p.team == team) {
            if !pawn.zone.is_finished() {
                return false;
            }
            any = true;
        }
        any
    }

    /// Place a pawn directly (setup and tests)
    pub fn place_pawn(&mut self, id: PawnId, zone: Zone) -> Result<()> {
        self.get_pawn_mut(id)?.zone = zone;
        Ok(())
    }

    pub fn is_game_over(&self) -> bool {
        self.turn.is_game_over()
    }

    pub fn winner(&self) -> Option<Team> {
        self.turn.winner
    }

    pub(crate) fn push_command(&mut self, command: BoardCommand) {
        self.commands.push(command);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the animator commands queued since the last drain
    pub fn drain_commands(&mut self) -> Vec<BoardCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Take the observer events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            turn: self.turn.clone(),
            pawns: self.pawns.clone(),
        }
    }
}
