//! Per-round two-phase message/choice protocol

use round_logic::{resolve_round, DoorName, RoundContext, RoundOutcome};

use crate::error::ExperimentError;
use crate::state::OpStatus;

/// Which waiting step a continuation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitKind {
    /// The simulated partner is "taking its turn" after the message.
    PartnerTurn,
    /// Round results are "being processed" after the door choice.
    Processing,
}

/// Handle for a deferred wait continuation.
///
/// The engine never sleeps: when a submission schedules a wait, the host
/// reads the ticket, waits [`crate::WAIT_DURATION`], and passes it back to
/// `resume()`. The generation stamp makes tickets from before a restart
/// stale, so a late continuation can never touch a reset run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitTicket {
    pub generation: u64,
    pub kind: WaitKind,
}

/// States of one round instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingMessage,
    WaitingPartner,
    AwaitingChoice,
    WaitingProcessing,
    Resolved,
}

/// Effect of resuming a wait continuation.
#[derive(Clone, Debug, PartialEq)]
pub enum Resume {
    /// The continuation did not match the round's current state.
    Ignored,
    /// Partner turn finished; the round now awaits the door choice.
    Advanced,
    /// Processing finished; the round resolved into its outcome.
    Resolved(RoundOutcome),
}

/// State machine for a single round.
///
/// Enforces the ordering message → wait → choice → wait → outcome. One
/// instance exists at a time; `Resolved` is terminal and the controller
/// replaces the instance for the next round.
#[derive(Clone, Debug)]
pub struct RoundProtocol {
    context: RoundContext,
    phase: RoundPhase,
    message: Option<DoorName>,
    choice: Option<DoorName>,
}

impl RoundProtocol {
    pub fn new(context: RoundContext) -> Self {
        Self {
            context,
            phase: RoundPhase::AwaitingMessage,
            message: None,
            choice: None,
        }
    }

    pub fn context(&self) -> &RoundContext {
        &self.context
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// The message recorded so far, if any.
    pub fn pending_message(&self) -> Option<DoorName> {
        self.message
    }

    /// The wait the host owes the round, if one is outstanding.
    pub fn wait_kind(&self) -> Option<WaitKind> {
        match self.phase {
            RoundPhase::WaitingPartner => Some(WaitKind::PartnerTurn),
            RoundPhase::WaitingProcessing => Some(WaitKind::Processing),
            _ => None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_kind().is_some()
    }

    /// Record the player's suggestion for the partner.
    ///
    /// Accepted only while awaiting the message; the door must be one of
    /// the partner's. Schedules the partner-turn wait.
    pub fn submit_message(&mut self, door: DoorName) -> Result<OpStatus, ExperimentError> {
        if self.phase != RoundPhase::AwaitingMessage {
            return Ok(OpStatus::Ignored);
        }
        if !self.context.partner_doors.contains(door) {
            return Err(ExperimentError::UnknownDoor(door));
        }
        self.message = Some(door);
        self.phase = RoundPhase::WaitingPartner;
        Ok(OpStatus::Applied)
    }

    /// Record the door the player opens.
    ///
    /// Accepted only while awaiting the choice; the door must be one of
    /// the player's. Schedules the processing wait.
    pub fn submit_choice(&mut self, door: DoorName) -> Result<OpStatus, ExperimentError> {
        if self.phase != RoundPhase::AwaitingChoice {
            return Ok(OpStatus::Ignored);
        }
        if !self.context.player_doors.contains(door) {
            return Err(ExperimentError::UnknownDoor(door));
        }
        self.choice = Some(door);
        self.phase = RoundPhase::WaitingProcessing;
        Ok(OpStatus::Applied)
    }

    /// Apply a due wait continuation.
    ///
    /// A kind that does not match the round's current waiting state is
    /// ignored. Resuming the processing wait produces the round's one
    /// outcome and leaves the instance terminal.
    pub fn resume(&mut self, kind: WaitKind) -> Resume {
        match (self.phase, kind) {
            (RoundPhase::WaitingPartner, WaitKind::PartnerTurn) => {
                self.phase = RoundPhase::AwaitingChoice;
                Resume::Advanced
            }
            (RoundPhase::WaitingProcessing, WaitKind::Processing) => {
                let (Some(message), Some(choice)) = (self.message, self.choice) else {
                    return Resume::Ignored;
                };
                self.phase = RoundPhase::Resolved;
                Resume::Resolved(resolve_round(&self.context, message, choice))
            }
            _ => Resume::Ignored,
        }
    }
}
