//! One-shot treatment trigger

use crate::state::{ExperimentConfig, ExperimentState};

/// Decide whether the treatment fires after the given completed round.
///
/// True iff a treatment round is configured, it equals `round_number`, and
/// the treatment has not already been applied this run. Stateless; the
/// controller records the application and switches the ambient color
/// permanently.
pub fn should_apply(
    config: &ExperimentConfig,
    state: &ExperimentState,
    round_number: u32,
) -> bool {
    !state.treatment_applied && config.treatment_round == Some(round_number)
}
