//! Pawn state: zone and ability flags

use crate::core::Team;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a pawn currently is
///
/// Exactly one variant holds at any time. `OnRing(i)` requires
/// `i < ring_size`; `InSafeLane(i)` requires `i < safe_lane_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Start,
    OnRing(usize),
    InSafeLane(usize),
    Finished,
}

impl Zone {
    pub fn is_start(&self) -> bool {
        matches!(self, Zone::Start)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Zone::Finished)
    }

    pub fn ring_index(&self) -> Option<usize> {
        match self {
            Zone::OnRing(idx) => Some(*idx),
            _ => None,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Start => write!(f, "start"),
            Zone::OnRing(idx) => write!(f, "ring {}", idx),
            Zone::InSafeLane(idx) => write!(f, "lane {}", idx),
            Zone::Finished => write!(f, "finish"),
        }
    }
}

/// A single pawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub team: Team,

    pub zone: Zone,

    /// UI hint: pawn is in the legal set while a selection is pending
    pub selectable: bool,

    /// Team turns of capture immunity left
    pub protection_turns: u8,

    /// Next capture by this pawn grants its team another roll
    pub extra_roll_on_capture: bool,

    /// Next capture by this pawn queues a bonus six-step move
    pub capture_counts_as_six: bool,

    /// Team's next roll of 4+ deploys an extra pawn from start
    pub roll_check_pending: bool,

    /// Turn id of the last offer this pawn consumed
    pub last_offer_turn: Option<u32>,
}

impl Pawn {
    pub fn new(team: Team) -> Self {
        Pawn {
            team,
            zone: Zone::Start,
            selectable: false,
            protection_turns: 0,
            extra_roll_on_capture: false,
            capture_counts_as_six: false,
            roll_check_pending: false,
            last_offer_turn: None,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.protection_turns > 0
    }

    /// Consume the per-turn offer fence
    ///
    /// Succeeds at most once per `turn_id`.
    pub fn try_consume_offer(&mut self, turn_id: u32) -> bool {
        if self.last_offer_turn == Some(turn_id) {
            return false;
        }
        self.last_offer_turn = Some(turn_id);
        true
    }

    pub fn reset_offer_fence(&mut self) {
        self.last_offer_turn = None;
    }

    /// Send the pawn back to start after a capture
    pub fn send_to_start(&mut self) {
        self.reset_offer_fence();
        self.zone = Zone::Start;
    }
}
