//! Run aggregation for feedback and final results

use serde::{Deserialize, Serialize};

use round_logic::RoundOutcome;

use crate::state::{ExperimentConfig, FeedbackMode};

/// A running total as the participant may see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ScoreDisplay {
    Shown(u32),
    /// The without-feedback condition withholds totals until the end.
    Withheld,
}

/// Sum of player payoffs over the recorded rounds.
pub fn player_total(history: &[RoundOutcome]) -> u32 {
    history.iter().map(|outcome| outcome.player_payoff).sum()
}

/// Sum of partner payoffs over the recorded rounds.
pub fn partner_total(history: &[RoundOutcome]) -> u32 {
    history.iter().map(|outcome| outcome.partner_payoff).sum()
}

/// Aggregate view of a run, exportable as JSON alongside the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub feedback_mode: FeedbackMode,
    pub rounds_completed: usize,
    pub player_total: u32,
    pub partner_total: u32,
}

impl RunSummary {
    pub fn new(config: &ExperimentConfig, history: &[RoundOutcome]) -> Self {
        Self {
            feedback_mode: config.feedback_mode,
            rounds_completed: history.len(),
            player_total: player_total(history),
            partner_total: partner_total(history),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use round_logic::{generate_round, resolve_round, PartnerProfile, SeededRng};

    fn sample_history(rounds: u32) -> Vec<RoundOutcome> {
        let mut rng = SeededRng::new(&[42u8; 32], 0);
        (1..=rounds)
            .map(|round| {
                let context = generate_round(round, &PartnerProfile::default(), &mut rng);
                let message = context.partner_doors.names()[0];
                let choice = context.player_doors.names()[1];
                resolve_round(&context, message, choice)
            })
            .collect()
    }

    #[test]
    fn test_totals_sum_history() {
        let history = sample_history(10);
        let expected_player: u32 = history.iter().map(|o| o.player_payoff).sum();
        let expected_partner: u32 = history.iter().map(|o| o.partner_payoff).sum();

        assert_eq!(player_total(&history), expected_player);
        assert_eq!(partner_total(&history), expected_partner);
    }

    #[test]
    fn test_empty_history_totals_zero() {
        assert_eq!(player_total(&[]), 0);
        assert_eq!(partner_total(&[]), 0);
    }

    #[test]
    fn test_summary() {
        let config = ExperimentConfig {
            feedback_mode: FeedbackMode::Without,
            treatment_round: None,
            treatment_color: "#FF0000".to_string(),
        };
        let history = sample_history(10);
        let summary = RunSummary::new(&config, &history);

        assert_eq!(summary.feedback_mode, FeedbackMode::Without);
        assert_eq!(summary.rounds_completed, 10);
        assert_eq!(summary.player_total, player_total(&history));
        assert_eq!(summary.partner_total, partner_total(&history));
    }
}
