//! Committing moves and resolving their consequences
//!
//! A committed move runs, in order: zone update, capture, offer, win
//! check. Queued follow-on actions come back through the same path.

use crate::core::{PawnId, Team, Zone};
use crate::game::abilities::{offer_effect, OfferEffect, BONUS_SIX_STEPS};
use crate::game::capture::{find_capture, CaptureCheck};
use crate::game::movement::{resolve_move, MoveResolution, DEPLOY_ROLL};
use crate::game::{BoardCommand, GameEvent, GameState, QueuedAction};
use std::fmt;

/// Why a pawn is being moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The team's die roll
    Roll,
    /// Six-step bonus after a capture that counts as six
    BonusSix,
    /// Extra steps granted by an offer
    ExtraMove,
    /// Start pawn deployed by an offer
    Deploy,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveKind::Roll => "roll",
            MoveKind::BonusSix => "bonus six",
            MoveKind::ExtraMove => "extra move",
            MoveKind::Deploy => "deploy",
        };
        f.write_str(name)
    }
}

impl GameState {
    /// Move a pawn `steps` cells and resolve capture, offer and victory
    ///
    /// Returns false, leaving everything untouched, when the move is
    /// illegal or the pawn is unknown.
    pub fn commit_move(&mut self, pawn_id: PawnId, steps: u8, kind: MoveKind) -> bool {
        let Ok(pawn) = self.pawns.get(pawn_id) else {
            return false;
        };
        let (team, from) = (pawn.team, pawn.zone);
        let Some(path) = self.board.team_path(team).copied() else {
            return false;
        };

        let MoveResolution::Moved { to, path: cells } =
            resolve_move(from, steps, &path, self.board.ring_size())
        else {
            log_if_verbose!(
                self.logger,
                verbose,
                "{} pawn {} cannot move {} from {}",
                team,
                pawn_id,
                steps,
                from
            );
            return false;
        };

        if let Ok(pawn) = self.pawns.get_mut(pawn_id) {
            pawn.zone = to;
        }
        for cell in cells {
            self.push_command(BoardCommand::MovePawn { pawn: pawn_id, cell });
        }
        self.push_event(GameEvent::PawnMoved {
            pawn: pawn_id,
            from,
            to,
        });
        log_if_verbose!(
            self.logger,
            normal,
            "{} pawn {} moves {} ({}): {} -> {}",
            team,
            pawn_id,
            steps,
            kind,
            from,
            to
        );

        self.resolve_capture(pawn_id, to);
        self.resolve_offer(pawn_id, to);

        if self.has_team_finished(team) {
            self.declare_winner(team);
        }
        true
    }

    /// Deploy the first start pawn of `team` as if it rolled a six
    pub fn deploy_from_start(&mut self, team: Team) -> bool {
        let candidate = self
            .pawns
            .iter()
            .find(|(_, p)| p.team == team && p.zone == Zone::Start)
            .map(|(id, _)| id);

        match candidate {
            Some(pawn_id) => self.commit_move(pawn_id, DEPLOY_ROLL, MoveKind::Deploy),
            None => {
                log_if_verbose!(self.logger, verbose, "{} has no pawn left in start", team);
                false
            }
        }
    }

    /// Run one follow-on action through the normal move path
    pub(crate) fn run_queued_action(&mut self, action: QueuedAction) -> bool {
        match action {
            QueuedAction::BonusSix(pawn_id) => {
                self.turn.in_bonus_move = true;
                let moved = self.commit_move(pawn_id, BONUS_SIX_STEPS, MoveKind::BonusSix);
                self.turn.in_bonus_move = false;
                moved
            }
            QueuedAction::ExtraMove { pawn, steps } => {
                self.commit_move(pawn, steps, MoveKind::ExtraMove)
            }
            QueuedAction::NativeDeploy | QueuedAction::RollCheckDeploy => {
                let team = self.active_team();
                self.deploy_from_start(team)
            }
        }
    }

    fn resolve_capture(&mut self, mover: PawnId, landing: Zone) {
        match find_capture(&self.board, &self.pawns, mover, landing) {
            CaptureCheck::NoTarget => {}
            CaptureCheck::Blocked { protected } => {
                self.push_event(GameEvent::CaptureBlocked { mover, protected });
                log_if_verbose!(
                    self.logger,
                    normal,
                    "pawn {} is protected; capture by pawn {} prevented",
                    protected,
                    mover
                );
            }
            CaptureCheck::Capture { captured } => {
                if let Ok(pawn) = self.pawns.get_mut(captured) {
                    pawn.send_to_start();
                }
                self.push_command(BoardCommand::PlayCapture { pawn: captured });
                self.push_command(BoardCommand::ReturnToStart { pawn: captured });
                self.push_event(GameEvent::PawnCaptured { mover, captured });
                log_if_verbose!(
                    self.logger,
                    normal,
                    "pawn {} captures pawn {} at {}",
                    mover,
                    captured,
                    landing
                );
                self.apply_capture_rewards(mover);
            }
        }
    }

    /// Pay out capture-synergy flags carried by the capturing pawn
    fn apply_capture_rewards(&mut self, mover: PawnId) {
        let in_bonus_move = self.turn.in_bonus_move;
        let Ok(pawn) = self.pawns.get_mut(mover) else {
            return;
        };

        // A capture during the bonus move never queues another bonus
        if pawn.capture_counts_as_six && !in_bonus_move {
            pawn.capture_counts_as_six = false;
            self.turn.queue.bonus_six = Some(mover);
            self.turn.suppress_six_extra_roll = true;
            log_if_verbose!(self.logger, normal, "pawn {} capture counts as six", mover);
        }

        if pawn.extra_roll_on_capture {
            pawn.extra_roll_on_capture = false;
            self.turn.extra_roll_granted = true;
            log_if_verbose!(self.logger, normal, "pawn {} capture grants another roll", mover);
        }
    }

    fn resolve_offer(&mut self, pawn_id: PawnId, landing: Zone) {
        if !matches!(landing, Zone::OnRing(_) | Zone::InSafeLane(_)) {
            return;
        }
        let Ok(pawn) = self.pawns.get(pawn_id) else {
            return;
        };
        let team = pawn.team;
        let Some(offer) = self
            .board
            .cell_for(team, landing)
            .and_then(|cell| self.board.offer_at(cell))
            .copied()
        else {
            return;
        };

        let turn_id = self.turn.turn_id;
        let consumed = self
            .pawns
            .get_mut(pawn_id)
            .map(|p| p.try_consume_offer(turn_id))
            .unwrap_or(false);
        if !consumed {
            self.push_event(GameEvent::OfferRefused {
                pawn: pawn_id,
                ability: offer.kind,
            });
            log_if_verbose!(
                self.logger,
                verbose,
                "pawn {} already took an offer this turn (turn {})",
                pawn_id,
                turn_id
            );
            return;
        }

        let native = offer.is_native_to(team);
        let effect = offer_effect(&offer, team, &mut self.rng);
        self.push_event(GameEvent::OfferTriggered {
            pawn: pawn_id,
            ability: offer.kind,
            native,
        });
        log_if_verbose!(
            self.logger,
            normal,
            "pawn {} triggered {} (native={}) at {}",
            pawn_id,
            offer.kind,
            native,
            landing
        );
        self.apply_offer_effect(pawn_id, effect);
    }

    fn apply_offer_effect(&mut self, pawn_id: PawnId, effect: OfferEffect) {
        match effect {
            OfferEffect::DeployNow => {
                self.turn.queue.native_deploys += 1;
                self.turn.suppress_six_extra_roll = true;
            }
            OfferEffect::ExtraMove { steps } => {
                self.turn.queue.extra_moves.push((pawn_id, steps));
            }
            OfferEffect::Protection { turns } => {
                if let Ok(pawn) = self.pawns.get_mut(pawn_id) {
                    pawn.protection_turns = pawn.protection_turns.max(turns);
                    log_if_verbose!(
                        self.logger,
                        normal,
                        "pawn {} protected for {} turns",
                        pawn_id,
                        pawn.protection_turns
                    );
                }
            }
            OfferEffect::RollCheck => {
                if let Ok(pawn) = self.pawns.get_mut(pawn_id) {
                    pawn.roll_check_pending = true;
                }
            }
            OfferEffect::CaptureCountsAsSix => {
                if let Ok(pawn) = self.pawns.get_mut(pawn_id) {
                    pawn.capture_counts_as_six = true;
                }
            }
            OfferEffect::ExtraRollOnCapture => {
                if let Ok(pawn) = self.pawns.get_mut(pawn_id) {
                    pawn.extra_roll_on_capture = true;
                }
            }
        }
    }

    fn declare_winner(&mut self, team: Team) {
        self.turn.end_game(team);
        self.push_event(GameEvent::TeamWon { team });
        log_if_verbose!(self.logger, minimal, "{} wins: all pawns finished", team);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AbilityKind, Cell, Element};
    use crate::game::TurnPhase;
    use crate::loader::{BoardConfig, OfferConfig};

    fn game_with_offers(offers: Vec<OfferConfig>) -> GameState {
        let mut config = BoardConfig::classic();
        config.offers = offers;
        let mut game = GameState::from_config(&config).unwrap();
        game.seed_rng(1);
        game.logger.enable_capture();
        game
    }

    fn offer(ring: usize, ability: AbilityKind, element: Element) -> OfferConfig {
        OfferConfig {
            cell: Cell::Ring(ring),
            ability,
            element,
        }
    }

    #[test]
    fn test_illegal_move_changes_nothing() {
        let mut game = game_with_offers(vec![]);
        let red = game.team_pawns(Team::Red)[0];
        let before = game.snapshot();
        assert!(!game.commit_move(red, 3, MoveKind::Roll));
        assert_eq!(game.snapshot(), before);
        assert!(game.drain_commands().is_empty());
    }

    #[test]
    fn test_move_emits_one_command_per_cell() {
        let mut game = game_with_offers(vec![]);
        let red = game.team_pawns(Team::Red)[0];
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        assert!(game.commit_move(red, 3, MoveKind::Roll));

        let commands = game.drain_commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[2],
            BoardCommand::MovePawn {
                pawn: red,
                cell: Cell::Ring(5)
            }
        );
    }

    #[test]
    fn test_capture_sends_opponent_home() {
        let mut game = game_with_offers(vec![]);
        let red = game.team_pawns(Team::Red)[0];
        let blue = game.team_pawns(Team::Blue)[0];
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        game.place_pawn(blue, Zone::OnRing(5)).unwrap();
        game.get_pawn_mut(blue).unwrap().last_offer_turn = Some(0);

        assert!(game.commit_move(red, 3, MoveKind::Roll));

        let captured = game.get_pawn(blue).unwrap();
        assert_eq!(captured.zone, Zone::Start);
        assert_eq!(captured.last_offer_turn, None);
        assert!(game
            .drain_events()
            .contains(&GameEvent::PawnCaptured { mover: red, captured: blue }));
    }

    #[test]
    fn test_offer_fence_blocks_second_trigger_same_turn() {
        let mut game = game_with_offers(vec![offer(5, AbilityKind::ExtraMove, Element::Air)]);
        let red = game.team_pawns(Team::Red)[0];
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        assert!(game.commit_move(red, 3, MoveKind::Roll));
        assert_eq!(game.turn.queue.extra_moves.len(), 1);

        // Walk back onto the offer cell in the same team turn
        game.turn.queue.clear();
        game.place_pawn(red, Zone::OnRing(4)).unwrap();
        assert!(game.commit_move(red, 1, MoveKind::Roll));
        assert!(game.turn.queue.is_empty());
        assert!(game.drain_events().iter().any(|e| matches!(e, GameEvent::OfferRefused { .. })));
    }

    #[test]
    fn test_native_deploy_suppresses_six_reroll() {
        let mut game = game_with_offers(vec![offer(5, AbilityKind::ExtraDeploy, Element::Fire)]);
        let red = game.team_pawns(Team::Red)[0];
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        assert!(game.commit_move(red, 3, MoveKind::Roll));
        assert_eq!(game.turn.queue.native_deploys, 1);
        assert!(game.turn.suppress_six_extra_roll);
    }

    #[test]
    fn test_foreign_deploy_sets_roll_check() {
        let mut game = game_with_offers(vec![offer(5, AbilityKind::ExtraDeploy, Element::Water)]);
        let red = game.team_pawns(Team::Red)[0];
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        assert!(game.commit_move(red, 3, MoveKind::Roll));
        assert!(game.get_pawn(red).unwrap().roll_check_pending);
        assert_eq!(game.turn.queue.native_deploys, 0);
    }

    #[test]
    fn test_protection_keeps_larger_value() {
        let mut game = game_with_offers(vec![offer(5, AbilityKind::Protection, Element::Water)]);
        let red = game.team_pawns(Team::Red)[0];
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        game.get_pawn_mut(red).unwrap().protection_turns = 9;
        assert!(game.commit_move(red, 3, MoveKind::Roll));
        assert_eq!(game.get_pawn(red).unwrap().protection_turns, 9);
    }

    #[test]
    fn test_capture_counts_as_six_queues_bonus_once() {
        let mut game = game_with_offers(vec![]);
        let red = game.team_pawns(Team::Red)[0];
        let blue = game.team_pawns(Team::Blue);
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        game.place_pawn(blue[0], Zone::OnRing(5)).unwrap();
        game.place_pawn(blue[1], Zone::OnRing(11)).unwrap();
        game.get_pawn_mut(red).unwrap().capture_counts_as_six = true;
        game.turn.phase = TurnPhase::Moving;

        assert!(game.commit_move(red, 3, MoveKind::Roll));
        assert_eq!(game.turn.queue.bonus_six, Some(red));
        assert!(game.turn.suppress_six_extra_roll);

        // The bonus move captures again but queues nothing further
        game.get_pawn_mut(red).unwrap().capture_counts_as_six = true;
        let action = game.turn.queue.pop_next().unwrap();
        assert!(game.run_queued_action(action));
        assert_eq!(game.get_pawn(blue[1]).unwrap().zone, Zone::Start);
        assert_eq!(game.turn.queue.bonus_six, None);
    }

    #[test]
    fn test_extra_roll_on_capture_is_consumed() {
        let mut game = game_with_offers(vec![]);
        let red = game.team_pawns(Team::Red)[0];
        let blue = game.team_pawns(Team::Blue)[0];
        game.place_pawn(red, Zone::OnRing(2)).unwrap();
        game.place_pawn(blue, Zone::OnRing(5)).unwrap();
        game.get_pawn_mut(red).unwrap().extra_roll_on_capture = true;

        assert!(game.commit_move(red, 3, MoveKind::Roll));
        assert!(game.turn.extra_roll_granted);
        assert!(!game.get_pawn(red).unwrap().extra_roll_on_capture);
    }

    #[test]
    fn test_deploy_from_start_with_no_start_pawns() {
        let mut game = game_with_offers(vec![]);
        for id in game.team_pawns(Team::Red) {
            game.place_pawn(id, Zone::InSafeLane(0)).unwrap();
        }
        assert!(!game.deploy_from_start(Team::Red));
    }

    #[test]
    fn test_last_pawn_home_wins() {
        let mut game = game_with_offers(vec![]);
        let red = game.team_pawns(Team::Red);
        for id in &red[1..] {
            game.place_pawn(*id, Zone::Finished).unwrap();
        }
        game.place_pawn(red[0], Zone::InSafeLane(3)).unwrap();

        assert!(game.commit_move(red[0], 1, MoveKind::Roll));
        assert_eq!(game.winner(), Some(Team::Red));
        assert!(game.is_game_over());
        assert!(game.logger.logs().iter().any(|l| l.message.contains("red wins")));
    }
}
