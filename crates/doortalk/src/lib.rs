//! Doortalk - repeated cheap-talk trust game experiment
//!
//! In-process engine for a behavioral-economics experiment: a participant
//! plays ten rounds against a scripted simulated partner, exchanging
//! non-binding door suggestions before both open doors for payoffs. This
//! crate owns the experiment flow (intake, configuration, instructions,
//! rounds, survey, results); the round math lives in `round-logic`, and
//! all rendering is left to whatever presentation layer consumes the
//! controller's data.

mod controller;
mod error;
mod instructions;
mod protocol;
mod results;
mod state;
mod treatment;

pub use controller::ExperimentController;
pub use error::ExperimentError;
pub use instructions::{default_catalogue, Audience, InstructionItem, InstructionSequencer};
pub use protocol::{Resume, RoundPhase, RoundProtocol, WaitKind, WaitTicket};
pub use results::{partner_total, player_total, RunSummary, ScoreDisplay};
pub use state::{
    ConfigForm, ExperimentConfig, ExperimentState, FeedbackMode, OpStatus, Phase,
    DEFAULT_TREATMENT_COLOR, NEUTRAL_COLOR, TOTAL_ROUNDS, WAIT_COLOR, WAIT_DURATION,
};
pub use treatment::should_apply;

// The round engine types surface throughout the boundary API.
pub use round_logic::{
    Door, DoorName, DoorSet, PartnerProfile, RandomSource, RoundContext, RoundOutcome, SeededRng,
    SequenceSource,
};
