//! Top-level experiment flow controller

use std::time::Duration;

use log::{debug, info};

use round_logic::{
    generate_round, DoorName, PartnerProfile, RandomSource, RoundContext, RoundOutcome, SeededRng,
};

use crate::error::ExperimentError;
use crate::instructions::{default_catalogue, InstructionItem, InstructionSequencer};
use crate::protocol::{Resume, RoundProtocol, WaitTicket};
use crate::results::{player_total, RunSummary, ScoreDisplay};
use crate::state::{
    ConfigForm, ExperimentConfig, ExperimentState, FeedbackMode, OpStatus, Phase, NEUTRAL_COLOR,
    TOTAL_ROUNDS, WAIT_COLOR, WAIT_DURATION,
};
use crate::treatment;

/// Drives one participant through the experiment.
///
/// Owns the run's state, config, instruction sequencer, and the single
/// in-flight round protocol, and exposes the operation/query boundary the
/// presentation layer consumes. Strictly sequential: at most one round is
/// active, and its waits are deferred continuations the host resumes.
pub struct ExperimentController {
    state: ExperimentState,
    config: Option<ExperimentConfig>,
    sequencer: Option<InstructionSequencer>,
    round: Option<RoundProtocol>,
    profile: PartnerProfile,
    rng: Box<dyn RandomSource>,
    /// Bumped on restart; outstanding wait tickets from earlier runs no
    /// longer match and resume nothing.
    generation: u64,
}

impl ExperimentController {
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self::with_profile(rng, PartnerProfile::default())
    }

    pub fn with_profile(rng: Box<dyn RandomSource>, profile: PartnerProfile) -> Self {
        Self {
            state: ExperimentState::default(),
            config: None,
            sequencer: None,
            round: None,
            profile,
            rng,
            generation: 0,
        }
    }

    /// Controller seeded for a reproducible session.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::new(Box::new(SeededRng::new(&seed, 0)))
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Record the run configuration from the intake form.
    ///
    /// Accepted in Intake (first submission) and Configuration (amending
    /// the form before instructions start); ignored later. A form with no
    /// feedback mode is rejected.
    pub fn configure(&mut self, form: ConfigForm) -> Result<OpStatus, ExperimentError> {
        if !matches!(self.state.phase, Phase::Intake | Phase::Configuration) {
            return Ok(OpStatus::Ignored);
        }
        let config = form.into_config()?;
        info!(
            "configured run: feedback={:?} treatment_round={:?}",
            config.feedback_mode, config.treatment_round
        );
        self.config = Some(config);
        self.state.treatment_applied = false;
        self.state.base_color = NEUTRAL_COLOR.to_string();
        self.state.phase = Phase::Configuration;
        Ok(OpStatus::Applied)
    }

    /// Enter the Instructions phase, building the active sequence for the
    /// configured feedback mode.
    pub fn start_instructions(&mut self) -> Result<OpStatus, ExperimentError> {
        match self.state.phase {
            Phase::Configuration => {}
            Phase::Intake => return Err(ExperimentError::NotConfigured),
            _ => return Ok(OpStatus::Ignored),
        }
        let config = self.config.as_ref().ok_or(ExperimentError::NotConfigured)?;
        self.sequencer = Some(InstructionSequencer::new(
            default_catalogue(),
            config.feedback_mode,
        ));
        self.state.phase = Phase::Instructions;
        info!("instructions started");
        Ok(OpStatus::Applied)
    }

    /// Step to the next instruction screen. A no-op at the last screen.
    pub fn advance_instruction(&mut self) -> OpStatus {
        if self.state.phase != Phase::Instructions {
            return OpStatus::Ignored;
        }
        match self.sequencer.as_mut() {
            Some(sequencer) => sequencer.advance(),
            None => OpStatus::Ignored,
        }
    }

    /// Start the game. Enabled only on the last instruction screen.
    pub fn begin_game(&mut self) -> Result<OpStatus, ExperimentError> {
        if self.state.phase != Phase::Instructions {
            return Ok(OpStatus::Ignored);
        }
        if self.config.is_none() {
            return Err(ExperimentError::NotConfigured);
        }
        if !self.sequencer.as_ref().is_some_and(|s| s.is_last()) {
            return Ok(OpStatus::Ignored);
        }

        self.state.history.clear();
        self.state.current_round_number = 1;
        self.state.treatment_applied = false;
        self.state.base_color = NEUTRAL_COLOR.to_string();
        self.round = Some(self.next_round(1));
        self.state.phase = Phase::Game;
        info!("game started");
        Ok(OpStatus::Applied)
    }

    /// Forward the player's suggestion to the current round.
    pub fn submit_message(&mut self, door: DoorName) -> Result<OpStatus, ExperimentError> {
        if self.state.phase != Phase::Game {
            return Ok(OpStatus::Ignored);
        }
        match self.round.as_mut() {
            Some(round) => round.submit_message(door),
            None => Ok(OpStatus::Ignored),
        }
    }

    /// Forward the player's door choice to the current round.
    pub fn submit_choice(&mut self, door: DoorName) -> Result<OpStatus, ExperimentError> {
        if self.state.phase != Phase::Game {
            return Ok(OpStatus::Ignored);
        }
        match self.round.as_mut() {
            Some(round) => round.submit_choice(door),
            None => Ok(OpStatus::Ignored),
        }
    }

    /// Apply a wait continuation after its latency has elapsed.
    ///
    /// Tickets stamped before the last restart are stale and ignored, as
    /// is any ticket that no longer matches the round's waiting state.
    pub fn resume(&mut self, ticket: WaitTicket) -> OpStatus {
        if ticket.generation != self.generation {
            debug!("dropping stale wait ticket from generation {}", ticket.generation);
            return OpStatus::Ignored;
        }
        if self.state.phase != Phase::Game {
            return OpStatus::Ignored;
        }
        let Some(round) = self.round.as_mut() else {
            return OpStatus::Ignored;
        };
        match round.resume(ticket.kind) {
            Resume::Ignored => OpStatus::Ignored,
            Resume::Advanced => OpStatus::Applied,
            Resume::Resolved(outcome) => {
                self.finish_round(outcome);
                OpStatus::Applied
            }
        }
    }

    /// Record the survey submission; its content is opaque to the core.
    pub fn submit_survey(&mut self, response: serde_json::Value) -> OpStatus {
        if self.state.phase != Phase::Survey {
            return OpStatus::Ignored;
        }
        self.state.survey = Some(response);
        self.state.phase = Phase::Results;
        info!("survey submitted, run complete");
        OpStatus::Applied
    }

    /// Abandon the run unconditionally and return to Intake.
    ///
    /// State is replaced wholesale and the generation bumps, so an
    /// outstanding wait continuation can never touch the fresh run.
    pub fn restart(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = ExperimentState::default();
        self.config = None;
        self.sequencer = None;
        self.round = None;
        info!("experiment restarted");
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn config(&self) -> Option<&ExperimentConfig> {
        self.config.as_ref()
    }

    pub fn current_round_number(&self) -> u32 {
        self.state.current_round_number
    }

    /// The active round's setup, for door and suggestion display.
    pub fn round_context(&self) -> Option<&RoundContext> {
        self.round.as_ref().map(|round| round.context())
    }

    /// Full ordered history of resolved rounds, for the results table.
    pub fn history(&self) -> &[RoundOutcome] {
        &self.state.history
    }

    /// The most recent outcome, suppressed in the without-feedback
    /// condition.
    pub fn latest_outcome(&self) -> Option<&RoundOutcome> {
        match self.config.as_ref()?.feedback_mode {
            FeedbackMode::With => self.state.history.last(),
            FeedbackMode::Without => None,
        }
    }

    /// The player's running total, or the withheld sentinel.
    pub fn running_total(&self) -> ScoreDisplay {
        match self.config.as_ref().map(|config| config.feedback_mode) {
            Some(FeedbackMode::Without) => ScoreDisplay::Withheld,
            _ => ScoreDisplay::Shown(player_total(&self.state.history)),
        }
    }

    /// 1-based instruction progress `(current, total)`.
    pub fn instruction_progress(&self) -> Option<(usize, usize)> {
        let sequencer = self.sequencer.as_ref()?;
        Some((sequencer.current_index() + 1, sequencer.total()))
    }

    pub fn current_instruction(&self) -> Option<&InstructionItem> {
        self.sequencer.as_ref()?.current()
    }

    pub fn instructions_done(&self) -> bool {
        self.sequencer.as_ref().is_some_and(|s| s.is_last())
    }

    /// The wait the host owes the engine, if one is outstanding.
    pub fn pending_wait(&self) -> Option<WaitTicket> {
        if self.state.phase != Phase::Game {
            return None;
        }
        let kind = self.round.as_ref()?.wait_kind()?;
        Some(WaitTicket { generation: self.generation, kind })
    }

    /// How long the host should hold a ticket before resuming it.
    pub fn wait_duration(&self) -> Duration {
        WAIT_DURATION
    }

    /// Ambient background color: the wait color while a continuation is
    /// outstanding, otherwise the run's base color (which the treatment
    /// switches permanently).
    pub fn ambient_color(&self) -> &str {
        if self.round.as_ref().is_some_and(|round| round.is_waiting()) {
            WAIT_COLOR
        } else {
            &self.state.base_color
        }
    }

    pub fn treatment_applied(&self) -> bool {
        self.state.treatment_applied
    }

    /// Aggregate summary of the run so far. None before configuration.
    pub fn run_summary(&self) -> Option<RunSummary> {
        let config = self.config.as_ref()?;
        Some(RunSummary::new(config, &self.state.history))
    }

    /// Full run record (summary, history, survey) as JSON for export.
    pub fn export_run(&self) -> Option<serde_json::Value> {
        let summary = self.run_summary()?;
        Some(serde_json::json!({
            "summary": summary,
            "history": self.state.history,
            "survey": self.state.survey,
        }))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn next_round(&mut self, round_number: u32) -> RoundProtocol {
        RoundProtocol::new(generate_round(
            round_number,
            &self.profile,
            self.rng.as_mut(),
        ))
    }

    fn finish_round(&mut self, outcome: RoundOutcome) {
        info!(
            "round {} resolved: player {} partner {}",
            outcome.round_number, outcome.player_payoff, outcome.partner_payoff
        );
        self.state.history.push(outcome);

        let completed = self.state.current_round_number;
        if let Some(config) = self.config.as_ref() {
            if treatment::should_apply(config, &self.state, completed) {
                self.state.treatment_applied = true;
                self.state.base_color = config.treatment_color.clone();
                info!("treatment applied after round {}", completed);
            }
        }

        if completed >= TOTAL_ROUNDS {
            self.round = None;
            self.state.phase = Phase::Survey;
            info!("all {} rounds complete, entering survey", TOTAL_ROUNDS);
        } else {
            self.state.current_round_number = completed + 1;
            self.round = Some(self.next_round(completed + 1));
        }
    }
}
