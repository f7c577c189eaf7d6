//! Error types for the Ludo offers engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LudoError {
    #[error("Invalid board configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    #[error("Pawn not found: {0}")]
    PawnNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),
}

pub type Result<T> = std::result::Result<T, LudoError>;
