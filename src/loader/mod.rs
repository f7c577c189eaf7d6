//! Board configuration loading
//!
//! Boards are described in JSON and validated before a game is built.

pub mod board_config;

pub use board_config::{BoardConfig, OfferConfig, TeamConfig};
