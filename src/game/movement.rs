//! Movement resolver
//!
//! Pure mapping from a pawn's zone and a step count to its new zone.
//! Moves are all-or-nothing: an illegal roll never advances a pawn
//! partially. The traversed cells are returned so the animator can replay
//! the walk one cell at a time; only the final cell matters for state.

use crate::core::{Cell, TeamPath, Zone};
use smallvec::SmallVec;

/// Steps a pawn must roll to leave start
pub const DEPLOY_ROLL: u8 = 6;

/// Cells visited by a move, in order, ending at the landing cell
pub type MovePath = SmallVec<[Cell; 8]>;

/// Outcome of resolving a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResolution {
    /// The move has no effect
    Rejected,
    /// The pawn ends in `to` after walking `path`
    Moved { to: Zone, path: MovePath },
}

impl MoveResolution {
    pub fn is_legal(&self) -> bool {
        matches!(self, MoveResolution::Moved { .. })
    }

    pub fn destination(&self) -> Option<Zone> {
        match self {
            MoveResolution::Moved { to, .. } => Some(*to),
            MoveResolution::Rejected => None,
        }
    }
}

/// Resolve a move of `steps` for a pawn currently in `zone`
pub fn resolve_move(zone: Zone, steps: u8, path: &TeamPath, ring_size: usize) -> MoveResolution {
    if steps == 0 || ring_size == 0 {
        return MoveResolution::Rejected;
    }
    let steps = steps as usize;

    match zone {
        Zone::Start => {
            if steps != DEPLOY_ROLL as usize {
                return MoveResolution::Rejected;
            }
            let mut cells = MovePath::new();
            cells.push(Cell::Ring(path.entry_index));
            MoveResolution::Moved {
                to: Zone::OnRing(path.entry_index),
                path: cells,
            }
        }

        Zone::OnRing(idx) => {
            let entrance = path.lane_entrance(ring_size);
            let to_entrance = (entrance + ring_size - idx) % ring_size;

            let mut cells = MovePath::new();

            if steps <= to_entrance {
                for step in 1..=steps {
                    cells.push(Cell::Ring((idx + step) % ring_size));
                }
                return MoveResolution::Moved {
                    to: Zone::OnRing((idx + steps) % ring_size),
                    path: cells,
                };
            }

            // +1 for the finish cell
            let remaining_path = to_entrance + path.safe_lane_length + 1;
            if steps > remaining_path {
                return MoveResolution::Rejected;
            }

            for step in 1..=to_entrance {
                cells.push(Cell::Ring((idx + step) % ring_size));
            }
            let lane_target = steps - to_entrance - 1;
            walk_lane(path, 0, lane_target, cells)
        }

        Zone::InSafeLane(idx) => {
            let remaining = path.safe_lane_length.saturating_sub(idx);
            if steps > remaining {
                return MoveResolution::Rejected;
            }
            walk_lane(path, idx + 1, idx + steps, MovePath::new())
        }

        Zone::Finished => MoveResolution::Rejected,
    }
}

/// Walk lane cells `from..=target`; a target equal to the lane length is
/// the finish cell.
fn walk_lane(path: &TeamPath, from: usize, target: usize, mut cells: MovePath) -> MoveResolution {
    let lane_len = path.safe_lane_length;
    for lane_idx in (from..=target).filter(|idx| *idx < lane_len) {
        cells.push(path.lane_cell(lane_idx));
    }

    let to = if target >= lane_len {
        cells.push(path.finish_cell());
        Zone::Finished
    } else {
        Zone::InSafeLane(target)
    };

    MoveResolution::Moved { to, path: cells }
}
