//! Round generation and resolution

use serde::{Deserialize, Serialize};

use crate::door::{DoorName, DoorSet, PARTNER_DOOR_NAMES, PLAYER_DOOR_NAMES};
use crate::payoff;
use crate::random::RandomSource;

/// Fixed Bernoulli parameters of the scripted partner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartnerProfile {
    /// Probability the partner's suggestion names the player's correct door.
    pub truth_rate: f64,
    /// Probability the partner opens the door the player suggested.
    pub follow_rate: f64,
}

impl Default for PartnerProfile {
    fn default() -> Self {
        Self { truth_rate: 0.65, follow_rate: 0.60 }
    }
}

/// The immutable randomized setup for one round.
///
/// Created when a round starts and superseded by a [`RoundOutcome`] when it
/// resolves. The partner's behavior draws are fixed here, up front: the
/// suggestion it will send and whether it will follow the player's message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundContext {
    pub round_number: u32,
    pub player_doors: DoorSet,
    pub partner_doors: DoorSet,
    pub player_correct_door: DoorName,
    pub partner_correct_door: DoorName,
    pub partner_suggestion: DoorName,
    pub partner_follows_suggestion: bool,
}

/// The immutable resolved result of one round.
///
/// `partner_payoff` is tracked even though no display currently reads it;
/// the recorded data set is part of the experiment design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub round_number: u32,
    pub player_message: DoorName,
    pub player_door_choice: DoorName,
    pub told_truth: bool,
    pub player_chose_correct: bool,
    pub partner_door_choice: DoorName,
    pub partner_chose_correct: bool,
    pub partner_followed_suggestion: bool,
    pub partner_suggestion: DoorName,
    pub player_payoff: u32,
    pub partner_payoff: u32,
}

/// Generate the context for one round.
///
/// Consumes draws in a fixed order (player colors, partner colors, player
/// correct door, partner correct door, truth draw, follow draw) so a
/// scripted source can steer any single draw. Pure given the source.
pub fn generate_round(
    round_number: u32,
    profile: &PartnerProfile,
    rng: &mut dyn RandomSource,
) -> RoundContext {
    let player_doors = DoorSet::sample(PLAYER_DOOR_NAMES, rng);
    let partner_doors = DoorSet::sample(PARTNER_DOOR_NAMES, rng);

    let player_correct_door = player_doors.names()[rng.pick(2)];
    let partner_correct_door = partner_doors.names()[rng.pick(2)];

    let partner_tells_truth = rng.bernoulli(profile.truth_rate);
    let partner_suggestion = if partner_tells_truth {
        player_correct_door
    } else {
        player_doors.other(player_correct_door)
    };
    let partner_follows_suggestion = rng.bernoulli(profile.follow_rate);

    RoundContext {
        round_number,
        player_doors,
        partner_doors,
        player_correct_door,
        partner_correct_door,
        partner_suggestion,
        partner_follows_suggestion,
    }
}

/// Resolve a completed round into its outcome.
///
/// `player_message` is the door the player suggested to the partner (a
/// partner door); `player_door_choice` is the door the player opened (a
/// player door). The partner opens the suggested door when its follow draw
/// came up true, the other of its doors otherwise.
pub fn resolve_round(
    context: &RoundContext,
    player_message: DoorName,
    player_door_choice: DoorName,
) -> RoundOutcome {
    let told_truth = player_message == context.partner_correct_door;
    let player_chose_correct = player_door_choice == context.player_correct_door;
    let partner_door_choice = if context.partner_follows_suggestion {
        player_message
    } else {
        context.partner_doors.other(player_message)
    };
    let partner_chose_correct = partner_door_choice == context.partner_correct_door;
    let (player_payoff, partner_payoff) = payoff(player_chose_correct, partner_chose_correct);

    RoundOutcome {
        round_number: context.round_number,
        player_message,
        player_door_choice,
        told_truth,
        player_chose_correct,
        partner_door_choice,
        partner_chose_correct,
        partner_followed_suggestion: context.partner_follows_suggestion,
        partner_suggestion: context.partner_suggestion,
        player_payoff,
        partner_payoff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SeededRng, SequenceSource};
    use crate::{PAYOFF_BOTH, PAYOFF_SOLO};
    use proptest::prelude::*;

    /// Draws for one generated round: player colors, partner colors,
    /// player correct, partner correct, truth, follow.
    fn scripted_round(
        player_correct: f64,
        partner_correct: f64,
        truth: f64,
        follow: f64,
    ) -> RoundContext {
        let mut source = SequenceSource::new(vec![
            0.0,
            0.0,
            0.5,
            0.5,
            player_correct,
            partner_correct,
            truth,
            follow,
        ]);
        generate_round(1, &PartnerProfile::default(), &mut source)
    }

    #[test]
    fn test_generation_determinism() {
        let seed = [42u8; 32];
        let profile = PartnerProfile::default();

        let mut rng1 = SeededRng::new(&seed, 3);
        let mut rng2 = SeededRng::new(&seed, 3);

        assert_eq!(
            generate_round(3, &profile, &mut rng1),
            generate_round(3, &profile, &mut rng2),
        );
    }

    #[test]
    fn test_truthful_suggestion_names_player_correct_door() {
        // Truth draw 0.0 < 0.65
        let context = scripted_round(0.0, 0.0, 0.0, 0.0);
        assert_eq!(context.partner_suggestion, context.player_correct_door);
    }

    #[test]
    fn test_lying_suggestion_names_other_player_door() {
        // Truth draw 0.99 >= 0.65
        let context = scripted_round(0.0, 0.0, 0.99, 0.0);
        assert_ne!(context.partner_suggestion, context.player_correct_door);
        assert!(context.player_doors.contains(context.partner_suggestion));
    }

    #[test]
    fn test_truth_rate_statistical() {
        let seed = [42u8; 32];
        let mut rng = SeededRng::new(&seed, 0);
        let profile = PartnerProfile::default();

        let truthful = (0..5_000)
            .map(|i| generate_round(i, &profile, &mut rng))
            .filter(|context| context.partner_suggestion == context.player_correct_door)
            .count();
        let rate = truthful as f64 / 5_000.0;
        assert!(rate > 0.61 && rate < 0.69, "truth rate {} not ~0.65", rate);
    }

    #[test]
    fn test_follow_rate_statistical() {
        let seed = [42u8; 32];
        let mut rng = SeededRng::new(&seed, 1);
        let profile = PartnerProfile::default();

        let follows = (0..5_000)
            .map(|i| generate_round(i, &profile, &mut rng))
            .filter(|context| context.partner_follows_suggestion)
            .count();
        let rate = follows as f64 / 5_000.0;
        assert!(rate > 0.56 && rate < 0.64, "follow rate {} not ~0.60", rate);
    }

    #[test]
    fn test_resolution_follows_suggestion() {
        let context = scripted_round(0.0, 0.0, 0.0, 0.0);
        assert!(context.partner_follows_suggestion);

        let outcome = resolve_round(&context, DoorName::B, DoorName::C);
        assert_eq!(outcome.partner_door_choice, DoorName::B);
        assert!(outcome.partner_followed_suggestion);
    }

    #[test]
    fn test_resolution_ignores_suggestion() {
        let context = scripted_round(0.0, 0.0, 0.0, 0.99);
        assert!(!context.partner_follows_suggestion);

        let outcome = resolve_round(&context, DoorName::B, DoorName::C);
        assert_eq!(outcome.partner_door_choice, DoorName::A);
        assert!(!outcome.partner_followed_suggestion);
    }

    #[test]
    fn test_resolution_mutual_success() {
        // Player correct C (draw 0.0), partner correct A, partner follows
        let context = scripted_round(0.0, 0.0, 0.0, 0.0);

        let outcome = resolve_round(&context, DoorName::A, DoorName::C);
        assert!(outcome.told_truth);
        assert!(outcome.player_chose_correct);
        assert_eq!(outcome.partner_door_choice, DoorName::A);
        assert!(outcome.partner_chose_correct);
        assert_eq!(outcome.player_payoff, PAYOFF_BOTH);
        assert_eq!(outcome.partner_payoff, PAYOFF_BOTH);
    }

    #[test]
    fn test_resolution_mutual_failure() {
        // Partner correct A, partner ignores the suggestion: telling it A
        // sends it to B. Player opens D while C is correct.
        let context = scripted_round(0.0, 0.0, 0.0, 0.99);

        let outcome = resolve_round(&context, DoorName::A, DoorName::D);
        assert!(outcome.told_truth);
        assert!(!outcome.player_chose_correct);
        assert_eq!(outcome.partner_door_choice, DoorName::B);
        assert!(!outcome.partner_chose_correct);
        assert_eq!(outcome.player_payoff, 0);
        assert_eq!(outcome.partner_payoff, 0);
    }

    #[test]
    fn test_resolution_solo_success() {
        // Partner correct B (draw 0.99), suggestion sent is A, partner follows
        let context = scripted_round(0.0, 0.99, 0.0, 0.0);

        let outcome = resolve_round(&context, DoorName::A, DoorName::C);
        assert!(!outcome.told_truth);
        assert!(outcome.player_chose_correct);
        assert!(!outcome.partner_chose_correct);
        assert_eq!(outcome.player_payoff, PAYOFF_SOLO);
        assert_eq!(outcome.partner_payoff, 0);
    }

    #[test]
    fn test_outcome_serializes() {
        let context = scripted_round(0.0, 0.0, 0.0, 0.0);
        let outcome = resolve_round(&context, DoorName::A, DoorName::C);

        let json = serde_json::to_string(&outcome).unwrap();
        let back: RoundOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }

    proptest! {
        #[test]
        fn prop_context_invariants(seed in any::<[u8; 32]>(), round in 1u32..=10) {
            let mut rng = SeededRng::new(&seed, round);
            let context = generate_round(round, &PartnerProfile::default(), &mut rng);

            prop_assert!(context.player_doors.contains(context.player_correct_door));
            prop_assert!(context.partner_doors.contains(context.partner_correct_door));
            prop_assert!(context.player_doors.contains(context.partner_suggestion));
            prop_assert_eq!(context.round_number, round);

            let [player_first, player_second] = context.player_doors.doors();
            prop_assert_ne!(&player_first.color, &player_second.color);
            let [partner_first, partner_second] = context.partner_doors.doors();
            prop_assert_ne!(&partner_first.color, &partner_second.color);
        }

        #[test]
        fn prop_resolution_rules(
            seed in any::<[u8; 32]>(),
            message_second in proptest::bool::ANY,
            choice_second in proptest::bool::ANY,
        ) {
            let mut rng = SeededRng::new(&seed, 0);
            let context = generate_round(1, &PartnerProfile::default(), &mut rng);

            let message = context.partner_doors.names()[message_second as usize];
            let choice = context.player_doors.names()[choice_second as usize];
            let outcome = resolve_round(&context, message, choice);

            prop_assert_eq!(outcome.told_truth, message == context.partner_correct_door);
            prop_assert_eq!(outcome.player_chose_correct, choice == context.player_correct_door);
            if context.partner_follows_suggestion {
                prop_assert_eq!(outcome.partner_door_choice, message);
            } else {
                prop_assert_eq!(outcome.partner_door_choice, context.partner_doors.other(message));
            }
            prop_assert_eq!(
                (outcome.player_payoff, outcome.partner_payoff),
                crate::payoff(outcome.player_chose_correct, outcome.partner_chose_correct)
            );

            // Same inputs, same outcome
            prop_assert_eq!(resolve_round(&context, message, choice), outcome);
        }
    }
}
