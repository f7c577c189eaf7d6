//! Offer effects and queued follow-on actions through the turn API

use ludo_offers::core::{AbilityKind, Cell, Element, PawnId, Team, Zone};
use ludo_offers::game::{
    GameEvent, GameState, Progress, QueuedAction, RollOutcome, SelectOutcome,
};
use ludo_offers::loader::{BoardConfig, OfferConfig};
use ludo_offers::Result;

fn game_with_offer(ring: usize, ability: AbilityKind, element: Element) -> Result<GameState> {
    let mut config = BoardConfig::classic();
    config.offers = vec![OfferConfig {
        cell: Cell::Ring(ring),
        ability,
        element,
    }];
    let mut game = GameState::from_config(&config)?;
    game.seed_rng(2024);
    Ok(game)
}

fn red(game: &GameState) -> Vec<PawnId> {
    game.team_pawns(Team::Red).to_vec()
}

fn pass_turn(game: &mut GameState) {
    assert_eq!(game.request_roll(1), RollOutcome::NoLegalMove);
    assert!(matches!(game.advance(), Progress::NextTeam(_)));
}

#[test]
fn native_deploy_runs_and_cancels_six_reroll() -> Result<()> {
    let mut game = game_with_offer(10, AbilityKind::ExtraDeploy, Element::Fire)?;
    let pawns = red(&game);
    game.place_pawn(pawns[0], Zone::OnRing(4))?;

    assert!(matches!(game.request_roll(6), RollOutcome::ChoosePawn(_)));
    assert_eq!(game.select_pawn(pawns[0]), SelectOutcome::Moved);
    assert_eq!(game.get_pawn(pawns[0])?.zone, Zone::OnRing(10));

    assert_eq!(
        game.advance(),
        Progress::QueuedAction(QueuedAction::NativeDeploy)
    );
    assert_eq!(game.get_pawn(pawns[1])?.zone, Zone::OnRing(0));
    assert_eq!(game.advance(), Progress::NextTeam(Team::Green));
    Ok(())
}

#[test]
fn foreign_deploy_waits_for_next_roll() -> Result<()> {
    let mut game = game_with_offer(10, AbilityKind::ExtraDeploy, Element::Earth)?;
    let pawns = red(&game);
    game.place_pawn(pawns[0], Zone::OnRing(7))?;

    assert_eq!(game.request_roll(3), RollOutcome::Moved(pawns[0]));
    assert!(game.get_pawn(pawns[0])?.roll_check_pending);
    assert_eq!(game.advance(), Progress::NextTeam(Team::Green));
    for _ in 0..3 {
        pass_turn(&mut game);
    }

    assert_eq!(game.request_roll(5), RollOutcome::Moved(pawns[0]));
    assert_eq!(
        game.advance(),
        Progress::QueuedAction(QueuedAction::RollCheckDeploy)
    );
    assert_eq!(game.get_pawn(pawns[1])?.zone, Zone::OnRing(0));
    Ok(())
}

#[test]
fn extra_move_follows_the_roll() -> Result<()> {
    let mut game = game_with_offer(10, AbilityKind::ExtraMove, Element::Air)?;
    let pawns = red(&game);
    game.place_pawn(pawns[0], Zone::OnRing(7))?;

    assert_eq!(game.request_roll(3), RollOutcome::Moved(pawns[0]));
    let Progress::QueuedAction(QueuedAction::ExtraMove { pawn, steps }) = game.advance() else {
        panic!("expected an extra move");
    };
    assert_eq!(pawn, pawns[0]);
    assert!((3..=6).contains(&steps), "non-native range, got {steps}");
    assert_eq!(
        game.get_pawn(pawns[0])?.zone,
        Zone::OnRing(10 + steps as usize)
    );
    assert_eq!(game.advance(), Progress::NextTeam(Team::Green));
    Ok(())
}

#[test]
fn native_protection_range() -> Result<()> {
    let mut game = game_with_offer(10, AbilityKind::Protection, Element::Fire)?;
    let pawns = red(&game);
    game.place_pawn(pawns[0], Zone::OnRing(7))?;

    game.request_roll(3);
    let turns = game.get_pawn(pawns[0])?.protection_turns;
    assert!((2..=5).contains(&turns), "native range, got {turns}");
    assert!(game.drain_events().contains(&GameEvent::OfferTriggered {
        pawn: pawns[0],
        ability: AbilityKind::Protection,
        native: true,
    }));
    Ok(())
}

#[test]
fn offer_can_be_taken_again_next_team_turn() -> Result<()> {
    let mut game = game_with_offer(10, AbilityKind::Protection, Element::Water)?;
    let pawns = red(&game);
    game.place_pawn(pawns[0], Zone::OnRing(7))?;

    game.request_roll(3);
    assert_eq!(game.get_pawn(pawns[0])?.last_offer_turn, Some(0));
    game.advance();
    for _ in 0..3 {
        pass_turn(&mut game);
    }

    game.place_pawn(pawns[0], Zone::OnRing(9))?;
    assert_eq!(game.request_roll(1), RollOutcome::Moved(pawns[0]));
    assert_eq!(game.get_pawn(pawns[0])?.last_offer_turn, Some(4));
    Ok(())
}

#[test]
fn capture_as_six_queues_single_bonus_and_suppresses_reroll() -> Result<()> {
    let mut game = game_with_offer(40, AbilityKind::CaptureSynergy, Element::Fire)?;
    let pawns = red(&game);
    let blue = game.team_pawns(Team::Blue);
    game.place_pawn(pawns[0], Zone::OnRing(3))?;
    game.place_pawn(blue[0], Zone::OnRing(9))?;
    game.place_pawn(blue[1], Zone::OnRing(15))?;
    game.get_pawn_mut(pawns[0])?.capture_counts_as_six = true;

    assert!(matches!(game.request_roll(6), RollOutcome::ChoosePawn(_)));
    assert_eq!(game.select_pawn(pawns[0]), SelectOutcome::Moved);
    assert_eq!(game.get_pawn(blue[0])?.zone, Zone::Start);

    assert_eq!(
        game.advance(),
        Progress::QueuedAction(QueuedAction::BonusSix(pawns[0]))
    );
    assert_eq!(game.get_pawn(pawns[0])?.zone, Zone::OnRing(15));
    assert_eq!(game.get_pawn(blue[1])?.zone, Zone::Start);

    // No second bonus, and the six does not earn another roll
    assert_eq!(game.advance(), Progress::NextTeam(Team::Green));
    Ok(())
}

#[test]
fn extra_roll_on_capture_keeps_the_turn() -> Result<()> {
    let mut game = game_with_offer(40, AbilityKind::CaptureSynergy, Element::Water)?;
    let pawns = red(&game);
    let blue = game.team_pawns(Team::Blue)[0];
    game.place_pawn(pawns[0], Zone::OnRing(2))?;
    game.place_pawn(blue, Zone::OnRing(5))?;
    game.get_pawn_mut(pawns[0])?.extra_roll_on_capture = true;

    assert_eq!(game.request_roll(3), RollOutcome::Moved(pawns[0]));
    assert_eq!(game.advance(), Progress::RollAgain);
    assert_eq!(game.active_team(), Team::Red);
    assert_eq!(game.turn.turn_id, 0);
    assert!(!game.get_pawn(pawns[0])?.extra_roll_on_capture);
    Ok(())
}

#[test]
fn synergy_offer_sets_flags_by_affinity() -> Result<()> {
    let mut native = game_with_offer(10, AbilityKind::CaptureSynergy, Element::Fire)?;
    let pawn = red(&native)[0];
    native.place_pawn(pawn, Zone::OnRing(7))?;
    native.request_roll(3);
    assert!(native.get_pawn(pawn)?.capture_counts_as_six);
    assert!(!native.get_pawn(pawn)?.extra_roll_on_capture);

    let mut foreign = game_with_offer(10, AbilityKind::CaptureSynergy, Element::Air)?;
    let pawn = red(&foreign)[0];
    foreign.place_pawn(pawn, Zone::OnRing(7))?;
    foreign.request_roll(3);
    assert!(!foreign.get_pawn(pawn)?.capture_counts_as_six);
    assert!(foreign.get_pawn(pawn)?.extra_roll_on_capture);
    Ok(())
}

#[test]
fn six_earns_another_roll() -> Result<()> {
    let mut game = game_with_offer(40, AbilityKind::ExtraMove, Element::Air)?;
    let pawns = red(&game);
    assert!(matches!(game.request_roll(6), RollOutcome::ChoosePawn(_)));
    game.select_pawn(pawns[0]);
    assert_eq!(game.advance(), Progress::RollAgain);
    assert_eq!(game.turn.turn_id, 0);
    assert_eq!(game.request_roll(2), RollOutcome::Moved(pawns[0]));
    assert_eq!(game.advance(), Progress::NextTeam(Team::Green));
    assert_eq!(game.turn.turn_id, 1);
    Ok(())
}
