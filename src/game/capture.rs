//! Capture detection
//!
//! A capture can only happen on a ring cell that is not a safe star. The
//! first opposing on-ring pawn sharing the cell is the target; if it is
//! protected the capture is cancelled outright. Game rules keep at most
//! one opposing pawn per ring cell, so "first" needs no tie-break.

use crate::core::{Board, EntityStore, Pawn, PawnId, Team, Zone};

/// What a landing on a ring cell means for the pawns already there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCheck {
    /// Nothing to capture (empty cell, safe star, or friendly pawns only)
    NoTarget,
    /// The occupant is protected; nothing changes
    Blocked { protected: PawnId },
    /// The occupant is sent back to start
    Capture { captured: PawnId },
}

/// Look for a capture target for `mover` standing in `landing`
pub fn find_capture(
    board: &Board,
    pawns: &EntityStore<Pawn>,
    mover: PawnId,
    landing: Zone,
) -> CaptureCheck {
    let Some(ring_index) = landing.ring_index() else {
        return CaptureCheck::NoTarget;
    };
    if board.is_safe_star(ring_index) {
        return CaptureCheck::NoTarget;
    }
    let Ok(mover_pawn) = pawns.get(mover) else {
        return CaptureCheck::NoTarget;
    };

    let target = pawns.iter().find(|(id, other)| {
        *id != mover && other.team != mover_pawn.team && other.zone == Zone::OnRing(ring_index)
    });

    match target {
        Some((id, other)) if other.is_protected() => CaptureCheck::Blocked { protected: id },
        Some((id, _)) => CaptureCheck::Capture { captured: id },
        None => CaptureCheck::NoTarget,
    }
}

/// Would landing on `ring_index` capture an opponent of `team`?
///
/// Used by the heuristic on positions that have not been committed yet.
pub fn is_capture_landing(
    board: &Board,
    pawns: &EntityStore<Pawn>,
    team: Team,
    ring_index: usize,
) -> bool {
    if board.is_safe_star(ring_index) {
        return false;
    }
    pawns
        .iter()
        .find(|(_, other)| other.team != team && other.zone == Zone::OnRing(ring_index))
        .map(|(_, other)| !other.is_protected())
        .unwrap_or(false)
}
