//! Turn phases, queued follow-on actions and turn bookkeeping

use crate::core::{PawnId, Team};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Phase of the active team's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// A roll request is accepted only here
    WaitingRoll,
    /// Rolled; waiting for a pawn from the legal set
    ChoosingPawn,
    /// A move was committed; queued follow-ons and turn end are pending
    Moving,
    /// A team won; nothing is accepted any more
    GameOver,
}

/// A follow-on action produced by captures and offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuedAction {
    /// Six-step bonus move for a pawn whose capture counted as six
    BonusSix(PawnId),
    /// Extra steps granted by an offer
    ExtraMove { pawn: PawnId, steps: u8 },
    /// Deploy one start pawn of the active team (native offer)
    NativeDeploy,
    /// Deploy one start pawn of the active team (roll check passed)
    RollCheckDeploy,
}

/// Follow-on actions waiting for the current move to finish
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedActions {
    pub bonus_six: Option<PawnId>,
    pub extra_moves: SmallVec<[(PawnId, u8); 2]>,
    pub native_deploys: u8,
    pub roll_check_deploys: u8,
}

impl QueuedActions {
    pub fn is_empty(&self) -> bool {
        self.bonus_six.is_none()
            && self.extra_moves.is_empty()
            && self.native_deploys == 0
            && self.roll_check_deploys == 0
    }

    pub fn clear(&mut self) {
        *self = QueuedActions::default();
    }

    /// Take the next action in resolution order: bonus six, extra move,
    /// native deploy, roll-check deploy
    pub fn pop_next(&mut self) -> Option<QueuedAction> {
        if let Some(pawn) = self.bonus_six.take() {
            return Some(QueuedAction::BonusSix(pawn));
        }
        if !self.extra_moves.is_empty() {
            let (pawn, steps) = self.extra_moves.remove(0);
            return Some(QueuedAction::ExtraMove { pawn, steps });
        }
        if self.native_deploys > 0 {
            self.native_deploys -= 1;
            return Some(QueuedAction::NativeDeploy);
        }
        if self.roll_check_deploys > 0 {
            self.roll_check_deploys -= 1;
            return Some(QueuedAction::RollCheckDeploy);
        }
        None
    }
}

/// Turn bookkeeping, mutated only by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Fixed order teams take turns in
    pub turn_order: SmallVec<[Team; 4]>,

    /// Index of the active team in `turn_order`
    pub active_idx: usize,

    /// Incremented once per team turn, never per roll
    pub turn_id: u32,

    pub phase: TurnPhase,

    /// Die value of the current roll
    pub roll: Option<u8>,

    /// Pawns that may move for the current roll
    pub legal_pawns: SmallVec<[PawnId; 4]>,

    pub queue: QueuedActions,

    /// A rolled six does not grant another roll this team turn
    pub suppress_six_extra_roll: bool,

    /// A capture granted the team one more roll
    pub extra_roll_granted: bool,

    /// Set while a bonus-six move resolves
    pub in_bonus_move: bool,

    pub winner: Option<Team>,
}

impl TurnState {
    pub fn new(turn_order: SmallVec<[Team; 4]>) -> Self {
        TurnState {
            turn_order,
            active_idx: 0,
            turn_id: 0,
            phase: TurnPhase::WaitingRoll,
            roll: None,
            legal_pawns: SmallVec::new(),
            queue: QueuedActions::default(),
            suppress_six_extra_roll: false,
            extra_roll_granted: false,
            in_bonus_move: false,
            winner: None,
        }
    }

    pub fn active_team(&self) -> Team {
        self.turn_order[self.active_idx]
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    /// Does the active team roll again once the current move settles?
    pub fn earns_another_roll(&self) -> bool {
        let six = self.roll == Some(6) && !self.suppress_six_extra_roll;
        six || self.extra_roll_granted
    }

    /// Same team rolls again; turn id is unchanged
    pub fn roll_again(&mut self) {
        self.phase = TurnPhase::WaitingRoll;
        self.roll = None;
        self.legal_pawns.clear();
        self.extra_roll_granted = false;
    }

    /// Hand the turn to the next team in order
    pub fn next_team(&mut self) -> Team {
        self.active_idx = (self.active_idx + 1) % self.turn_order.len();
        self.turn_id += 1;
        self.phase = TurnPhase::WaitingRoll;
        self.roll = None;
        self.legal_pawns.clear();
        self.queue.clear();
        self.suppress_six_extra_roll = false;
        self.extra_roll_granted = false;
        self.in_bonus_move = false;
        self.active_team()
    }

    pub fn end_game(&mut self, winner: Team) {
        self.winner = Some(winner);
        self.phase = TurnPhase::GameOver;
        self.queue.clear();
        self.legal_pawns.clear();
    }
}
