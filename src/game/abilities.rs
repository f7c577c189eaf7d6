//! Offer abilities
//!
//! Landing on an offer cell grants one ability per pawn per team turn.
//! Each ability has a native variant (pawn's team affinity matches the
//! offer) and a weaker non-native one. This module decides *what* an offer
//! grants; `GameState` applies the effect to pawns and the turn queue.

use crate::core::{AbilityKind, AbilityOffer, Team};
use rand::Rng;

/// Steps of the bonus move granted by a capture that counts as six
pub const BONUS_SIX_STEPS: u8 = 6;

/// Minimum roll that turns a pending roll check into a deploy
pub const ROLL_CHECK_THRESHOLD: u8 = 4;

/// Concrete effect of a consumed offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferEffect {
    /// Raise protection to at least this many team turns
    Protection { turns: u8 },
    /// Deploy a start pawn now and suppress the six re-roll this turn
    DeployNow,
    /// Check the team's next roll; 4+ deploys a start pawn
    RollCheck,
    /// Move the same pawn again after the current move
    ExtraMove { steps: u8 },
    /// This pawn's next capture queues a six-step bonus move
    CaptureCountsAsSix,
    /// This pawn's next capture grants another roll
    ExtraRollOnCapture,
}

/// Protection length: native 2-5 team turns, non-native 1-3
pub fn roll_protection_turns<R: Rng + ?Sized>(rng: &mut R, native: bool) -> u8 {
    if native {
        rng.gen_range(2..=5)
    } else {
        rng.gen_range(1..=3)
    }
}

/// Extra move length: native 5-8 steps, non-native 3-6
pub fn roll_extra_steps<R: Rng + ?Sized>(rng: &mut R, native: bool) -> u8 {
    if native {
        rng.gen_range(5..=8)
    } else {
        rng.gen_range(3..=6)
    }
}

/// Decide the effect an offer has on a pawn of `team`
pub fn offer_effect<R: Rng + ?Sized>(offer: &AbilityOffer, team: Team, rng: &mut R) -> OfferEffect {
    let native = offer.is_native_to(team);
    match (offer.kind, native) {
        (AbilityKind::Protection, _) => OfferEffect::Protection {
            turns: roll_protection_turns(rng, native),
        },
        (AbilityKind::ExtraDeploy, true) => OfferEffect::DeployNow,
        (AbilityKind::ExtraDeploy, false) => OfferEffect::RollCheck,
        (AbilityKind::ExtraMove, _) => OfferEffect::ExtraMove {
            steps: roll_extra_steps(rng, native),
        },
        (AbilityKind::CaptureSynergy, true) => OfferEffect::CaptureCountsAsSix,
        (AbilityKind::CaptureSynergy, false) => OfferEffect::ExtraRollOnCapture,
    }
}
