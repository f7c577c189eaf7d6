//! Turn orchestration
//!
//! The state machine runs WaitingRoll -> (ChoosingPawn) -> Moving and back,
//! ending in GameOver. Callers feed it rolls and selections, then call
//! [`GameState::advance`] until it reports something other than a queued
//! action.

use crate::core::{PawnId, Team};
use crate::game::movement::resolve_move;
use crate::game::abilities::ROLL_CHECK_THRESHOLD;
use crate::game::{GameEvent, GameState, MoveKind, QueuedAction, TurnPhase};
use smallvec::SmallVec;

/// Result of feeding a die roll to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// Not waiting for a roll (or the value is not a die face)
    Ignored,
    /// Nothing can move; the turn passes on the next advance
    NoLegalMove,
    /// Exactly one pawn could move and it was moved
    Moved(PawnId),
    /// The active side must pick one of these pawns
    ChoosePawn(SmallVec<[PawnId; 4]>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Moved,
    /// Not choosing, or the pawn is not in the legal set
    Rejected,
}

/// What one call to [`GameState::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Ran a follow-on action; call advance again
    QueuedAction(QueuedAction),
    /// The same team rolls again
    RollAgain,
    /// The turn passed to this team
    NextTeam(Team),
    GameOver(Team),
    /// Still waiting for a roll or a selection
    Idle,
}

impl GameState {
    /// Pawns of `team` that have a legal move for `roll`
    pub fn legal_pawns(&self, team: Team, roll: u8) -> SmallVec<[PawnId; 4]> {
        let Some(path) = self.board.team_path(team) else {
            return SmallVec::new();
        };
        let ring_size = self.board.ring_size();
        self.pawns
            .iter()
            .filter(|(_, p)| p.team == team)
            .filter(|(_, p)| resolve_move(p.zone, roll, path, ring_size).is_legal())
            .map(|(id, _)| id)
            .collect()
    }

    /// Feed a die roll for the active team
    ///
    /// A single legal pawn moves automatically unless the roll is a six,
    /// where the choice between deploying and advancing is left to the
    /// player.
    pub fn request_roll(&mut self, value: u8) -> RollOutcome {
        if self.turn.phase != TurnPhase::WaitingRoll || !(1..=6).contains(&value) {
            return RollOutcome::Ignored;
        }

        let team = self.active_team();
        self.turn.roll = Some(value);
        self.push_event(GameEvent::Rolled { team, value });
        log_if_verbose!(self.logger, normal, "{} rolls {}", team, value);

        self.consume_roll_checks(team, value);

        let legal = self.legal_pawns(team, value);
        self.turn.legal_pawns = legal.clone();

        if legal.is_empty() {
            self.turn.phase = TurnPhase::Moving;
            self.push_event(GameEvent::TurnPassed { team, roll: value });
            log_if_verbose!(self.logger, normal, "{} has no legal move for {}", team, value);
            return RollOutcome::NoLegalMove;
        }

        if legal.len() == 1 && value != 6 {
            let pawn = legal[0];
            self.start_move(pawn, value);
            return RollOutcome::Moved(pawn);
        }

        for (id, pawn) in self.pawns.iter_mut() {
            pawn.selectable = legal.contains(&id);
        }
        self.turn.phase = TurnPhase::ChoosingPawn;
        RollOutcome::ChoosePawn(legal)
    }

    /// Pick the pawn to move while choosing
    pub fn select_pawn(&mut self, pawn: PawnId) -> SelectOutcome {
        if self.turn.phase != TurnPhase::ChoosingPawn || !self.turn.legal_pawns.contains(&pawn) {
            log_if_verbose!(self.logger, verbose, "selection of pawn {} ignored", pawn);
            return SelectOutcome::Rejected;
        }
        let Some(roll) = self.turn.roll else {
            return SelectOutcome::Rejected;
        };

        for (_, p) in self.pawns.iter_mut() {
            p.selectable = false;
        }
        self.start_move(pawn, roll);
        SelectOutcome::Moved
    }

    /// Settle the current move one step at a time
    pub fn advance(&mut self) -> Progress {
        match self.turn.phase {
            TurnPhase::GameOver => {
                return self.turn.winner.map(Progress::GameOver).unwrap_or(Progress::Idle);
            }
            TurnPhase::Moving => {}
            TurnPhase::WaitingRoll | TurnPhase::ChoosingPawn => return Progress::Idle,
        }

        // Queued deploys still resolve after a passed roll
        if let Some(action) = self.turn.queue.pop_next() {
            self.run_queued_action(action);
            return Progress::QueuedAction(action);
        }

        let passed = self.turn.legal_pawns.is_empty();
        let again = if passed {
            self.turn.extra_roll_granted
        } else {
            self.turn.earns_another_roll()
        };

        if again {
            self.turn.roll_again();
            log_if_verbose!(self.logger, verbose, "{} rolls again", self.active_team());
            return Progress::RollAgain;
        }

        Progress::NextTeam(self.end_team_turn())
    }

    fn start_move(&mut self, pawn: PawnId, roll: u8) {
        self.turn.phase = TurnPhase::Moving;
        self.commit_move(pawn, roll, MoveKind::Roll);
    }

    /// Pending roll checks of `team` resolve against this roll
    fn consume_roll_checks(&mut self, team: Team, value: u8) {
        let mut deploys = 0u8;
        for (_, pawn) in self.pawns.iter_mut() {
            if pawn.team == team && pawn.roll_check_pending {
                pawn.roll_check_pending = false;
                if value >= ROLL_CHECK_THRESHOLD {
                    deploys += 1;
                }
            }
        }
        if deploys > 0 {
            self.turn.queue.roll_check_deploys += deploys;
            log_if_verbose!(
                self.logger,
                normal,
                "{} roll check passed ({} deploys queued)",
                team,
                deploys
            );
        }
    }

    fn end_team_turn(&mut self) -> Team {
        for (_, pawn) in self.pawns.iter_mut() {
            pawn.protection_turns = pawn.protection_turns.saturating_sub(1);
        }
        let team = self.turn.next_team();
        self.push_event(GameEvent::TurnStarted {
            team,
            turn_id: self.turn.turn_id,
        });
        log_if_verbose!(self.logger, verbose, "turn {}: {} to roll", self.turn.turn_id, team);
        team
    }
}
