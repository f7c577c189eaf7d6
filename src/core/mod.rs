//! Core game types and entities

pub mod board;
pub mod entity;
pub mod pawn;
pub mod team;

pub use board::{AbilityKind, AbilityOffer, Board, Cell, TeamPath};
pub use entity::{EntityStore, PawnId};
pub use pawn::{Pawn, Zone};
pub use team::{Element, Team};
