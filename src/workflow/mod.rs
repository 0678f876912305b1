//! The practice-session workflow engine.
//!
//! A session is a fixed directed graph of five steps. Transitions are
//! sequential except the one conditional edge out of GiveFeedback, decided
//! by the pure [`route`] function. Each step produces a `StateUpdate`; the
//! engine applies it through the central merge policy and picks the
//! successor, so no step ever touches the state directly or chooses its own
//! follow-up by name.

mod steps;

pub use steps::{complete_question_list, extract_question_lines, fallback_questions};

use anyhow::Result;

use crate::config::SessionSettings;
use crate::console::SessionIo;
use crate::events::SessionLog;
use crate::reasoning::ReasoningService;
use crate::session::{SessionState, StateUpdate};

/// Named steps of the workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    GenerateQuestions,
    AskQuestion,
    AnalyzeAnswer,
    GiveFeedback,
    WrapUp,
}

/// How a single step execution ended.
pub(crate) enum StepRun {
    Advance(StateUpdate),
    /// The candidate interrupted at a blocking input point; the in-flight
    /// step's update is discarded so resume re-runs it from the top.
    Interrupted,
}

/// Terminal result of driving a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    /// The caller should checkpoint the state before exiting.
    Interrupted,
}

/// Decides the successor of GiveFeedback. Pure function of the state.
pub fn route(state: &SessionState) -> Step {
    if !state.user_wants_continue || state.current_index >= state.questions.len() {
        Step::WrapUp
    } else {
        Step::AskQuestion
    }
}

/// Derives where execution (re)starts from the shape of the state alone.
///
/// A restored checkpoint carries no step pointer; the invariants of the
/// state model identify the step following the last fully completed one.
pub fn entry_step(state: &SessionState) -> Step {
    if state.questions.is_empty() {
        return Step::GenerateQuestions;
    }
    if state.exchanges.len() == state.current_index {
        return route(state);
    }
    match state.last_exchange() {
        Some(exchange) if exchange.score.is_none() => Step::AnalyzeAnswer,
        _ => Step::GiveFeedback,
    }
}

/// Drives one session to completion or interruption.
///
/// The engine borrows a single shared reasoning service for its whole
/// lifetime and owns the only reference to the session state while running,
/// so no synchronization is involved anywhere.
pub struct WorkflowEngine<'a> {
    reasoning: &'a dyn ReasoningService,
    io: &'a mut dyn SessionIo,
    log: SessionLog,
    settings: SessionSettings,
}

impl<'a> WorkflowEngine<'a> {
    pub fn new(
        reasoning: &'a dyn ReasoningService,
        io: &'a mut dyn SessionIo,
        log: SessionLog,
        settings: SessionSettings,
    ) -> Self {
        Self {
            reasoning,
            io,
            log,
            settings,
        }
    }

    /// Runs the workflow from wherever `state` left off until the session
    /// completes or the candidate interrupts.
    pub fn run(&mut self, state: &mut SessionState) -> Result<SessionOutcome> {
        if state.session_complete {
            return Ok(SessionOutcome::Completed);
        }
        let mut step = entry_step(state);
        loop {
            let run = match step {
                Step::GenerateQuestions => self.generate_questions(state)?,
                Step::AskQuestion => self.ask_question(state)?,
                Step::AnalyzeAnswer => self.analyze_answer(state)?,
                Step::GiveFeedback => self.give_feedback(state)?,
                Step::WrapUp => self.wrap_up(state)?,
            };
            match run {
                StepRun::Advance(update) => state.apply(update)?,
                StepRun::Interrupted => return Ok(SessionOutcome::Interrupted),
            }
            step = match step {
                Step::GenerateQuestions => Step::AskQuestion,
                Step::AskQuestion => Step::AnalyzeAnswer,
                Step::AnalyzeAnswer => Step::GiveFeedback,
                Step::GiveFeedback => route(state),
                Step::WrapUp => return Ok(SessionOutcome::Completed),
            };
        }
    }

}
