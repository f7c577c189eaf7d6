//! Static board topology: ring, team paths, safe stars and offer cells
//!
//! Everything here is immutable once the game starts. It is built by
//! `loader::BoardConfig` and shared by the rules modules.

use crate::core::{Element, Team, Zone};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical cell a pawn can stand on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Ring(usize),
    Lane { team: Team, index: usize },
    Finish(Team),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Ring(idx) => write!(f, "ring {}", idx),
            Cell::Lane { team, index } => write!(f, "{} lane {}", team, index),
            Cell::Finish(team) => write!(f, "{} finish", team),
        }
    }
}

/// The four ability families an offer cell can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// Capture immunity for a number of team turns
    Protection,
    /// Deploy another pawn from start
    ExtraDeploy,
    /// Additional forward steps after the current move
    ExtraMove,
    /// Rewards attached to this pawn's next capture
    CaptureSynergy,
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AbilityKind::Protection => "protection",
            AbilityKind::ExtraDeploy => "extra deploy",
            AbilityKind::ExtraMove => "extra move",
            AbilityKind::CaptureSynergy => "capture synergy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityOffer {
    pub kind: AbilityKind,
    pub element: Element,
}

impl AbilityOffer {
    pub fn new(kind: AbilityKind, element: Element) -> Self {
        AbilityOffer { kind, element }
    }

    /// Native offers match the team's affinity and use the stronger variant
    pub fn is_native_to(&self, team: Team) -> bool {
        team.element() == self.element
    }
}

/// A team's private route: ring entry, safe lane, finish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPath {
    pub team: Team,
    /// Ring index a deployed pawn lands on
    pub entry_index: usize,
    pub safe_lane_length: usize,
}

impl TeamPath {
    /// Ring index immediately before this team's safe-lane entrance
    pub fn lane_entrance(&self, ring_size: usize) -> usize {
        (self.entry_index + ring_size - 2) % ring_size
    }

    pub fn lane_cell(&self, index: usize) -> Cell {
        Cell::Lane {
            team: self.team,
            index,
        }
    }

    pub fn finish_cell(&self) -> Cell {
        Cell::Finish(self.team)
    }
}

/// Immutable board topology
#[derive(Debug, Clone)]
pub struct Board {
    ring_size: usize,
    pawns_per_team: usize,
    paths: Vec<TeamPath>,
    safe_stars: FxHashSet<usize>,
    offers: FxHashMap<Cell, AbilityOffer>,
}

impl Board {
    /// Assemble a board from already-validated parts
    ///
    /// Use `loader::BoardConfig` to build one from configuration with
    /// validation.
    pub fn new(
        ring_size: usize,
        pawns_per_team: usize,
        paths: Vec<TeamPath>,
        safe_stars: FxHashSet<usize>,
        offers: FxHashMap<Cell, AbilityOffer>,
    ) -> Self {
        Board {
            ring_size,
            pawns_per_team,
            paths,
            safe_stars,
            offers,
        }
    }

    pub fn ring_size(&self) -> usize {
        self.ring_size
    }

    pub fn pawns_per_team(&self) -> usize {
        self.pawns_per_team
    }

    pub fn paths(&self) -> &[TeamPath] {
        &self.paths
    }

    pub fn team_path(&self, team: Team) -> Option<&TeamPath> {
        self.paths.iter().find(|p| p.team == team)
    }

    /// Safe stars are immune to capture
    pub fn is_safe_star(&self, ring_index: usize) -> bool {
        self.safe_stars.contains(&ring_index)
    }

    pub fn offer_at(&self, cell: Cell) -> Option<&AbilityOffer> {
        self.offers.get(&cell)
    }

    pub fn offer_count(&self) -> usize {
        self.offers.len()
    }

    /// Physical cell for a zone, if the zone is on the board
    pub fn cell_for(&self, team: Team, zone: Zone) -> Option<Cell> {
        match zone {
            Zone::Start => None,
            Zone::OnRing(idx) => Some(Cell::Ring(idx)),
            Zone::InSafeLane(idx) => Some(Cell::Lane { team, index: idx }),
            Zone::Finished => Some(Cell::Finish(team)),
        }
    }
}
