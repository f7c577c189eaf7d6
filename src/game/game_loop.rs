//! Game loop implementation
//!
//! Drives a [`GameState`] from the first roll to a result. Automated seats
//! are asked for their choice synchronously; human seats are fed through an
//! input channel. Board commands go to an optional animator and each one
//! is awaited before the next state transition.

use crate::core::{PawnId, Team};
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::events::{BoardCommand, GameObserver};
use crate::game::heuristic_controller::HeuristicController;
use crate::game::turn::{Progress, RollOutcome, SelectOutcome};
use crate::game::{GameState, VerbosityLevel};
use crate::{LudoError, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Input from a human seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    RollRequested,
    PawnSelected(PawnId),
    Quit,
}

/// One board command handed to the animator
///
/// The animator signals `done` when the command has finished playing.
#[derive(Debug)]
pub struct AnimationRequest {
    pub command: BoardCommand,
    pub done: oneshot::Sender<()>,
}

/// Handle for cancelling a running game from elsewhere
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx: Arc::new(tx) }, rx)
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Who decides for a team
pub enum Seat {
    Automated(Box<dyn PlayerController>),
    Human,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Winning team (None if the game did not finish)
    pub winner: Option<Team>,
    /// Team turns started, i.e. the final turn id
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    /// Every pawn of this team reached the finish
    TeamFinished(Team),
    /// Game reached maximum turn limit
    TurnLimit,
    /// Cancelled through a [`CancelHandle`] or a Quit input
    Cancelled,
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    seats: Vec<(Team, Seat)>,
    observers: Vec<Box<dyn GameObserver + 'a>>,
    /// Maximum team turns before giving up
    max_turns: u32,
    /// Verbosity level for output (cached from game.logger)
    pub verbosity: VerbosityLevel,
    cancel: CancelHandle,
    cancel_rx: watch::Receiver<bool>,
}

impl<'a> GameLoop<'a> {
    /// Create a game loop; every team starts with a heuristic seat
    pub fn new(game: &'a mut GameState) -> Self {
        let verbosity = game.logger.verbosity();
        let seats = game
            .turn
            .turn_order
            .iter()
            .map(|team| {
                let seat = Seat::Automated(Box::new(HeuristicController::new(*team)));
                (*team, seat)
            })
            .collect();
        let (cancel, cancel_rx) = CancelHandle::new();
        GameLoop {
            game,
            seats,
            observers: Vec::new(),
            max_turns: 1000,
            verbosity,
            cancel,
            cancel_rx,
        }
    }

    /// Set maximum team turns before the game is abandoned
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set verbosity level for output
    ///
    /// This sets the verbosity on both the game loop and the game's centralized logger,
    /// which is accessed by controllers via GameStateView.
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Seat a controller for the team it reports
    pub fn with_controller(self, controller: Box<dyn PlayerController>) -> Self {
        let team = controller.team();
        self.with_seat(team, Seat::Automated(controller))
    }

    pub fn with_human(self, team: Team) -> Self {
        self.with_seat(team, Seat::Human)
    }

    /// Replace the seat of `team`; teams not in the turn order are ignored
    pub fn with_seat(mut self, team: Team, seat: Seat) -> Self {
        if let Some(slot) = self.seats.iter_mut().find(|(t, _)| *t == team) {
            slot.1 = seat;
        }
        self
    }

    pub fn with_observer(mut self, observer: impl GameObserver + 'a) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run to completion with automated seats only
    ///
    /// Board commands are discarded.
    pub fn run_headless(&mut self) -> Result<GameResult> {
        loop {
            if let Some(result) = self.check_end() {
                self.finish(&result);
                return Ok(result);
            }

            let team = self.game.active_team();
            let idx = self.seat_index(team)?;
            if matches!(self.seats[idx].1, Seat::Human) {
                return Err(LudoError::InvalidAction(format!(
                    "{} has a human seat; use the async driver",
                    team
                )));
            }

            let roll = self.game.roll_die();
            self.play_automated(idx, roll);
            self.dispatch_events();
            self.game.drain_commands();

            loop {
                let progress = self.game.advance();
                self.dispatch_events();
                self.game.drain_commands();
                if !matches!(progress, Progress::QueuedAction(_)) {
                    break;
                }
            }
        }
    }

    /// Run to completion, reading human input and awaiting each animation
    pub async fn run(
        &mut self,
        input: &mut mpsc::Receiver<InputEvent>,
        animator: Option<&mpsc::Sender<AnimationRequest>>,
    ) -> Result<GameResult> {
        loop {
            if let Some(result) = self.check_end() {
                self.finish(&result);
                return Ok(result);
            }

            let team = self.game.active_team();
            let idx = self.seat_index(team)?;
            let still_running = if matches!(self.seats[idx].1, Seat::Human) {
                self.human_turn(team, input, animator).await?
            } else {
                let roll = self.game.roll_die();
                self.play_automated(idx, roll);
                true
            };
            if !still_running {
                continue;
            }

            self.dispatch_events();
            if !self.animate(animator).await? {
                continue;
            }
            self.settle(animator).await?;
        }
    }

    fn seat_index(&self, team: Team) -> Result<usize> {
        self.seats
            .iter()
            .position(|(t, _)| *t == team)
            .ok_or_else(|| LudoError::UnknownTeam(team.to_string()))
    }

    fn check_end(&self) -> Option<GameResult> {
        let turns_played = self.game.turn.turn_id;
        let end_reason = if let Some(winner) = self.game.winner() {
            GameEndReason::TeamFinished(winner)
        } else if *self.cancel_rx.borrow() {
            GameEndReason::Cancelled
        } else if turns_played >= self.max_turns {
            GameEndReason::TurnLimit
        } else {
            return None;
        };
        Some(GameResult {
            winner: self.game.winner(),
            turns_played,
            end_reason,
        })
    }

    /// Roll for an automated seat and apply its choice
    fn play_automated(&mut self, idx: usize, roll: u8) {
        let team = self.seats[idx].0;
        let RollOutcome::ChoosePawn(legal) = self.game.request_roll(roll) else {
            return;
        };

        let choice = match &mut self.seats[idx].1 {
            Seat::Automated(controller) => {
                let view = GameStateView::new(&*self.game, team);
                controller.choose_pawn(&view, roll, &legal)
            }
            Seat::Human => None,
        };

        let pawn = match choice.filter(|p| legal.contains(p)) {
            Some(pawn) => pawn,
            None => {
                log_if_verbose!(
                    self.game.logger,
                    verbose,
                    "{} made no usable choice; taking the first legal pawn",
                    team
                );
                match legal.first() {
                    Some(pawn) => *pawn,
                    None => return,
                }
            }
        };
        self.game.select_pawn(pawn);
    }

    /// Wait for a roll request, then for a selection if one is needed
    ///
    /// Returns false when the game was cancelled while waiting.
    async fn human_turn(
        &mut self,
        team: Team,
        input: &mut mpsc::Receiver<InputEvent>,
        animator: Option<&mpsc::Sender<AnimationRequest>>,
    ) -> Result<bool> {
        loop {
            match self.next_input(input).await? {
                Some(InputEvent::RollRequested) => break,
                Some(InputEvent::PawnSelected(pawn)) => {
                    log_if_verbose!(self.game.logger, verbose, "pawn {} selected before rolling", pawn);
                }
                Some(InputEvent::Quit) | None => {
                    self.cancel.cancel();
                    return Ok(false);
                }
            }
        }

        let roll = self.game.roll_die();
        let RollOutcome::ChoosePawn(legal) = self.game.request_roll(roll) else {
            return Ok(true);
        };
        self.dispatch_events();
        if !self.animate(animator).await? {
            return Ok(false);
        }

        let options: Vec<String> = legal.iter().map(|p| p.to_string()).collect();
        self.game.logger.minimal(&format!(
            "{} rolled {}: choose a pawn ({})",
            team,
            roll,
            options.join(", ")
        ));

        loop {
            match self.next_input(input).await? {
                Some(InputEvent::PawnSelected(pawn)) => {
                    if self.game.select_pawn(pawn) == SelectOutcome::Moved {
                        return Ok(true);
                    }
                }
                Some(InputEvent::RollRequested) => {
                    log_if_verbose!(self.game.logger, verbose, "{} must choose a pawn first", team);
                }
                Some(InputEvent::Quit) | None => {
                    self.cancel.cancel();
                    return Ok(false);
                }
            }
        }
    }

    /// Next input event, or None once the game is cancelled
    async fn next_input(
        &mut self,
        input: &mut mpsc::Receiver<InputEvent>,
    ) -> Result<Option<InputEvent>> {
        tokio::select! {
            biased;
            _ = self.cancel_rx.changed() => Ok(None),
            event = input.recv() => event.map(Some).ok_or(LudoError::ChannelClosed("input")),
        }
    }

    /// Play queued board commands one at a time
    ///
    /// Returns false when the game was cancelled mid-animation.
    async fn animate(&mut self, animator: Option<&mpsc::Sender<AnimationRequest>>) -> Result<bool> {
        let commands = self.game.drain_commands();
        let Some(animator) = animator else {
            return Ok(true);
        };

        for command in commands {
            if self.cancel.is_cancelled() {
                return Ok(false);
            }
            let (done, finished) = oneshot::channel();
            let request = AnimationRequest { command, done };
            tokio::select! {
                biased;
                _ = self.cancel_rx.changed() => return Ok(false),
                sent = animator.send(request) => sent.map_err(|_| LudoError::ChannelClosed("animator"))?,
            }
            tokio::select! {
                biased;
                _ = self.cancel_rx.changed() => return Ok(false),
                res = finished => res.map_err(|_| LudoError::ChannelClosed("animation completion"))?,
            }
        }
        Ok(true)
    }

    /// Advance until the move and its follow-ons have settled
    async fn settle(&mut self, animator: Option<&mpsc::Sender<AnimationRequest>>) -> Result<()> {
        loop {
            let progress = self.game.advance();
            self.dispatch_events();
            if !self.animate(animator).await? {
                return Ok(());
            }
            if !matches!(progress, Progress::QueuedAction(_)) {
                return Ok(());
            }
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.game.drain_events() {
            for observer in self.observers.iter_mut() {
                observer.on_event(&event);
            }
        }
    }

    fn finish(&mut self, result: &GameResult) {
        for (team, seat) in self.seats.iter_mut() {
            if let Seat::Automated(controller) = seat {
                let view = GameStateView::new(&*self.game, *team);
                controller.on_game_end(&view, result.winner == Some(*team));
            }
        }

        let message = match result.end_reason {
            GameEndReason::TeamFinished(team) => {
                format!("{} wins after {} turns", team, result.turns_played)
            }
            GameEndReason::TurnLimit => format!("turn limit reached ({} turns)", result.turns_played),
            GameEndReason::Cancelled => "game cancelled".to_string(),
        };
        self.game.logger.minimal(&message);
    }
}
