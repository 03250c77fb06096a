//! Experiment error taxonomy

use thiserror::Error;

use round_logic::DoorName;

/// Errors the experiment core reports synchronously.
///
/// Only caller contract violations surface here; operations submitted in
/// the wrong phase are silent no-ops, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    /// The intake form did not select a feedback mode.
    #[error("missing feedbackMode")]
    MissingFeedbackMode,

    /// Instructions or game requested before a successful configure().
    #[error("experiment has not been configured")]
    NotConfigured,

    /// A door name outside the door set the current step accepts.
    /// Never silently substituted with a default door.
    #[error("{0} is not one of this step's doors")]
    UnknownDoor(DoorName),
}
