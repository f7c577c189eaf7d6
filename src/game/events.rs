//! Events for observers and commands for the animator
//!
//! Events are notifications only; nothing in the engine depends on anyone
//! listening. Commands are the ordered instructions the animator plays
//! back, each answered with a completion signal by the async game loop.

use crate::core::{AbilityKind, Cell, PawnId, Team, Zone};
use serde::{Deserialize, Serialize};

/// Something that happened in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TurnStarted {
        team: Team,
        turn_id: u32,
    },
    Rolled {
        team: Team,
        value: u8,
    },
    PawnMoved {
        pawn: PawnId,
        from: Zone,
        to: Zone,
    },
    PawnCaptured {
        mover: PawnId,
        captured: PawnId,
    },
    CaptureBlocked {
        mover: PawnId,
        protected: PawnId,
    },
    OfferTriggered {
        pawn: PawnId,
        ability: AbilityKind,
        native: bool,
    },
    /// The pawn already consumed an offer this team turn
    OfferRefused {
        pawn: PawnId,
        ability: AbilityKind,
    },
    /// No legal pawn for the roll
    TurnPassed {
        team: Team,
        roll: u8,
    },
    TeamWon {
        team: Team,
    },
}

/// Instruction for the animation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardCommand {
    /// Step a pawn onto the next cell of its walk
    MovePawn { pawn: PawnId, cell: Cell },
    /// Play the capture effect on a pawn
    PlayCapture { pawn: PawnId },
    /// Put a captured pawn back in its start area
    ReturnToStart { pawn: PawnId },
}

/// Subscriber for game events (logging, UI, statistics)
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<T: GameObserver + ?Sized> GameObserver for &mut T {
    fn on_event(&mut self, event: &GameEvent) {
        (**self).on_event(event);
    }
}

/// Observer that records every event it sees
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub events: Vec<GameEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        EventRecorder::default()
    }

    pub fn captures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::PawnCaptured { .. }))
            .count()
    }
}

impl GameObserver for EventRecorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
