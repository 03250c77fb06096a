//! Experiment state, configuration, and protocol constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

use round_logic::RoundOutcome;

use crate::error::ExperimentError;

/// Rounds per run. A fixed constant of the protocol, not configurable.
pub const TOTAL_ROUNDS: u32 = 10;

/// Emulated latency of each waiting step of a round.
pub const WAIT_DURATION: Duration = Duration::from_millis(1000);

/// Ambient background before any treatment is applied.
pub const NEUTRAL_COLOR: &str = "#808080";

/// Ambient background while a wait continuation is outstanding.
pub const WAIT_COLOR: &str = "#2b2b2b";

/// Treatment color used when the intake form leaves it blank.
pub const DEFAULT_TREATMENT_COLOR: &str = "#FF0000";

/// Whether per-round results are shown immediately or withheld to the end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    With,
    Without,
}

/// Experiment phase state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Intake,
    Configuration,
    Instructions,
    Game,
    Survey,
    Results,
}

/// Validated per-run configuration, set once before the Instructions phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub feedback_mode: FeedbackMode,
    /// Round after which the treatment fires; None is the control condition.
    pub treatment_round: Option<u32>,
    pub treatment_color: String,
}

/// Raw intake-form values, validated by `configure()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigForm {
    pub feedback_mode: Option<FeedbackMode>,
    pub treatment_round: Option<u32>,
    pub treatment_color: Option<String>,
}

impl ConfigForm {
    /// Validate the form into a config. The feedback mode is required; a
    /// missing treatment color falls back to [`DEFAULT_TREATMENT_COLOR`].
    pub fn into_config(self) -> Result<ExperimentConfig, ExperimentError> {
        let feedback_mode = self.feedback_mode.ok_or(ExperimentError::MissingFeedbackMode)?;
        Ok(ExperimentConfig {
            feedback_mode,
            treatment_round: self.treatment_round,
            treatment_color: self
                .treatment_color
                .unwrap_or_else(|| DEFAULT_TREATMENT_COLOR.to_string()),
        })
    }
}

/// Mutable state of one experiment run.
///
/// Owned exclusively by the controller and replaced wholesale, never
/// partially reset, on restart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentState {
    pub phase: Phase,
    /// 0 outside the Game phase, 1-based during it.
    pub current_round_number: u32,
    /// Append-only record of resolved rounds, oldest first.
    pub history: Vec<RoundOutcome>,
    pub treatment_applied: bool,
    /// Ambient background color while no wait is outstanding.
    pub base_color: String,
    /// Opaque survey submission, retained for the run.
    pub survey: Option<serde_json::Value>,
}

impl Default for ExperimentState {
    fn default() -> Self {
        Self {
            phase: Phase::Intake,
            current_round_number: 0,
            history: Vec::new(),
            treatment_applied: false,
            base_color: NEUTRAL_COLOR.to_string(),
            survey: None,
        }
    }
}

/// Whether an operation was applied or silently ignored.
///
/// Operations submitted in the wrong state are ignored rather than
/// rejected: they leave the state untouched and never error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum OpStatus {
    Applied,
    Ignored,
}

impl OpStatus {
    pub fn applied(self) -> bool {
        self == OpStatus::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_requires_feedback_mode() {
        let form = ConfigForm { treatment_round: Some(5), ..Default::default() };
        assert_eq!(form.into_config(), Err(ExperimentError::MissingFeedbackMode));
    }

    #[test]
    fn test_form_defaults_treatment_color() {
        let form = ConfigForm {
            feedback_mode: Some(FeedbackMode::With),
            treatment_round: Some(5),
            treatment_color: None,
        };
        let config = form.into_config().unwrap();
        assert_eq!(config.treatment_color, DEFAULT_TREATMENT_COLOR);
    }

    #[test]
    fn test_form_keeps_explicit_values() {
        let form = ConfigForm {
            feedback_mode: Some(FeedbackMode::Without),
            treatment_round: None,
            treatment_color: Some("#00FF00".to_string()),
        };
        let config = form.into_config().unwrap();
        assert_eq!(config.feedback_mode, FeedbackMode::Without);
        assert_eq!(config.treatment_round, None);
        assert_eq!(config.treatment_color, "#00FF00");
    }

    #[test]
    fn test_initial_state() {
        let state = ExperimentState::default();
        assert_eq!(state.phase, Phase::Intake);
        assert_eq!(state.current_round_number, 0);
        assert!(state.history.is_empty());
        assert!(!state.treatment_applied);
        assert_eq!(state.base_color, NEUTRAL_COLOR);
        assert!(state.survey.is_none());
    }

    #[test]
    fn test_feedback_mode_serde_tokens() {
        assert_eq!(serde_json::to_string(&FeedbackMode::With).unwrap(), "\"with\"");
        assert_eq!(serde_json::to_string(&FeedbackMode::Without).unwrap(), "\"without\"");
    }
}
