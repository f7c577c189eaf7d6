//! Heuristic AI controller
//!
//! Ranks the pawns that can move with a fixed priority list:
//! 1. a move that captures, preferring the most advanced capturer
//! 2. on a six, deploying a pawn from start
//! 3. otherwise, the move that leaves the pawn furthest along its route
//!
//! Ties go to the lowest pawn id.

use crate::core::{PawnId, Team, TeamPath, Zone};
use crate::game::controller::{GameStateView, PlayerController};
use smallvec::SmallVec;

/// How far along its route a pawn in `zone` is
///
/// Start is -1, ring cells count from the team's entry, safe-lane cells
/// continue after a full lap, and finished is the maximum.
pub fn progress_score(zone: Zone, path: &TeamPath, ring_size: usize) -> i32 {
    match zone {
        Zone::Start => -1,
        Zone::OnRing(idx) => ((idx + ring_size - path.entry_index) % ring_size) as i32,
        Zone::InSafeLane(idx) => (ring_size + idx) as i32,
        Zone::Finished => i32::MAX,
    }
}

/// One legal option and how it scores
#[derive(Debug, Clone, Copy)]
struct Candidate {
    pawn: PawnId,
    /// Progress after the move
    score: i32,
    captures: bool,
    deploys: bool,
}

/// Highest score wins; equal scores go to the lower id
fn most_advanced<'a>(pool: impl Iterator<Item = &'a Candidate>) -> Option<PawnId> {
    pool.max_by(|a, b| a.score.cmp(&b.score).then(b.pawn.cmp(&a.pawn)))
        .map(|c| c.pawn)
}

/// Controller that picks pawns by the priority list above
pub struct HeuristicController {
    team: Team,
}

impl HeuristicController {
    pub fn new(team: Team) -> Self {
        HeuristicController { team }
    }

    fn candidates(view: &GameStateView, roll: u8) -> SmallVec<[Candidate; 4]> {
        let Some(path) = view.path() else {
            return SmallVec::new();
        };
        let ring_size = view.board().ring_size();

        view.own_pawns()
            .filter(|(_, p)| !p.zone.is_finished())
            .filter_map(|(id, pawn)| {
                let to = view.simulate_move(id, roll).destination()?;
                Some(Candidate {
                    pawn: id,
                    score: progress_score(to, path, ring_size),
                    captures: view.would_capture(to),
                    deploys: pawn.zone.is_start(),
                })
            })
            .collect()
    }

    /// Best pawn to move for `roll`, if any can move
    pub fn best_pawn(view: &GameStateView, roll: u8) -> Option<PawnId> {
        let candidates = Self::candidates(view, roll);

        if let Some(pawn) = most_advanced(candidates.iter().filter(|c| c.captures)) {
            return Some(pawn);
        }
        if roll == 6 {
            if let Some(c) = candidates.iter().find(|c| c.deploys) {
                return Some(c.pawn);
            }
        }
        most_advanced(candidates.iter())
    }
}

impl PlayerController for HeuristicController {
    fn team(&self) -> Team {
        self.team
    }

    fn choose_pawn(&mut self, view: &GameStateView, roll: u8, legal: &[PawnId]) -> Option<PawnId> {
        let choice = Self::best_pawn(view, roll).filter(|p| legal.contains(p));
        if let Some(pawn) = choice {
            view.logger().controller_choice(
                "HEURISTIC",
                &format!("{} moves pawn {} with {}", self.team, pawn, roll),
            );
        }
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use crate::loader::BoardConfig;

    fn game() -> GameState {
        let mut config = BoardConfig::classic();
        config.offers.clear();
        GameState::from_config(&config).unwrap()
    }

    #[test]
    fn test_progress_score() {
        let path = TeamPath {
            team: Team::Green,
            entry_index: 13,
            safe_lane_length: 4,
        };
        assert_eq!(progress_score(Zone::Start, &path, 52), -1);
        assert_eq!(progress_score(Zone::OnRing(13), &path, 52), 0);
        assert_eq!(progress_score(Zone::OnRing(2), &path, 52), 41);
        assert_eq!(progress_score(Zone::InSafeLane(1), &path, 52), 53);
        assert_eq!(progress_score(Zone::Finished, &path, 52), i32::MAX);
    }

    #[test]
    fn test_prefers_capture() {
        let mut game = game();
        let red = game.team_pawns(Team::Red);
        let blue = game.team_pawns(Team::Blue)[0];
        game.place_pawn(red[0], Zone::OnRing(2)).unwrap();
        game.place_pawn(red[1], Zone::OnRing(30)).unwrap();
        game.place_pawn(blue, Zone::OnRing(5)).unwrap();

        let view = GameStateView::new(&game, Team::Red);
        assert_eq!(HeuristicController::best_pawn(&view, 3), Some(red[0]));
    }

    #[test]
    fn test_skips_protected_capture() {
        let mut game = game();
        let red = game.team_pawns(Team::Red);
        let blue = game.team_pawns(Team::Blue)[0];
        game.place_pawn(red[0], Zone::OnRing(2)).unwrap();
        game.place_pawn(red[1], Zone::OnRing(30)).unwrap();
        game.place_pawn(blue, Zone::OnRing(5)).unwrap();
        game.get_pawn_mut(blue).unwrap().protection_turns = 2;

        let view = GameStateView::new(&game, Team::Red);
        assert_eq!(HeuristicController::best_pawn(&view, 3), Some(red[1]));
    }

    #[test]
    fn test_deploys_on_six_without_capture() {
        let mut game = game();
        let red = game.team_pawns(Team::Red);
        game.place_pawn(red[0], Zone::OnRing(40)).unwrap();

        let view = GameStateView::new(&game, Team::Red);
        assert_eq!(HeuristicController::best_pawn(&view, 6), Some(red[1]));
    }

    #[test]
    fn test_otherwise_most_advanced() {
        let mut game = game();
        let red = game.team_pawns(Team::Red);
        game.place_pawn(red[0], Zone::OnRing(10)).unwrap();
        game.place_pawn(red[1], Zone::OnRing(20)).unwrap();
        game.place_pawn(red[2], Zone::InSafeLane(0)).unwrap();

        let view = GameStateView::new(&game, Team::Red);
        assert_eq!(HeuristicController::best_pawn(&view, 2), Some(red[2]));
        // Lane pawn cannot move 5; the ring pawns compete
        assert_eq!(HeuristicController::best_pawn(&view, 5), Some(red[1]));
    }

    #[test]
    fn test_no_candidates() {
        let game = game();
        let view = GameStateView::new(&game, Team::Red);
        assert_eq!(HeuristicController::best_pawn(&view, 4), None);
    }

    #[test]
    fn test_choice_logged() {
        let mut game = game();
        game.logger.enable_capture();
        let red = game.team_pawns(Team::Red);
        let mut controller = HeuristicController::new(Team::Red);
        let view = GameStateView::new(&game, Team::Red);
        assert_eq!(controller.choose_pawn(&view, 6, &red), Some(red[0]));
        assert!(game
            .logger
            .logs()
            .iter()
            .any(|l| l.category == Some("controller_choice") && l.controller == Some("HEURISTIC")));
    }
}
