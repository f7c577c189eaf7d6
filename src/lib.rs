//! Ludo Offers - rules engine for a four-team race-track board game
//!
//! Pawns travel a shared ring, divert into a private safe lane and finish.
//! Landing on an occupied ring cell captures the opponent, and landing on
//! an offer cell grants one of four temporary abilities. The engine is a
//! set of synchronous state transitions; animation and input are external
//! collaborators reached through channels by the async game loop.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod tournament;

pub use error::{LudoError, Result};
