//! Rules, turn flow, controllers and the game loop

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// When verbose-logging feature is disabled, this becomes a no-op at compile time,
/// eliminating all format! allocations in benchmark builds.
macro_rules! log_if_verbose {
    ($logger:expr, $level:ident, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.$level(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

pub mod abilities;
pub mod actions;
pub mod capture;
pub mod controller;
pub mod events;
pub mod fixed_script_controller;
pub mod game_loop;
pub mod heuristic_controller;
pub mod logger;
pub mod movement;
pub mod phase;
pub mod random_controller;
pub mod state;
pub mod turn;

pub use abilities::{offer_effect, OfferEffect};
pub use actions::MoveKind;
pub use capture::{find_capture, CaptureCheck};
pub use controller::{GameStateView, PlayerController};
pub use events::{BoardCommand, EventRecorder, GameEvent, GameObserver};
pub use fixed_script_controller::FixedScriptController;
pub use game_loop::{
    AnimationRequest, CancelHandle, GameEndReason, GameLoop, GameResult, InputEvent, Seat,
};
pub use heuristic_controller::{progress_score, HeuristicController};
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use movement::{resolve_move, MoveResolution, DEPLOY_ROLL};
pub use phase::{QueuedAction, QueuedActions, TurnPhase, TurnState};
pub use random_controller::RandomController;
pub use state::{GameSnapshot, GameState};
pub use turn::{Progress, RollOutcome, SelectOutcome};
