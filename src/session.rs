//! Session state for interview practice runs.
//!
//! A `SessionState` is owned by exactly one running `WorkflowEngine` for the
//! lifetime of a session. Steps never mutate it directly; they return a
//! `StateUpdate` and the engine applies it through [`SessionState::apply`],
//! which enforces the per-field merge policy (append for the progress
//! sequences, overwrite for everything else).

use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of questions a session targets after generation.
pub const QUESTION_COUNT: usize = 5;

/// Stored in place of an answer the candidate left blank.
pub const NO_ANSWER_PLACEHOLDER: &str = "(no answer provided)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// One asked question together with the candidate's answer and, once the
/// analysis step has run, the score and raw feedback text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// 1-based position of the question within the session.
    pub question_number: usize,
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl Exchange {
    pub fn new(question_number: usize, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question_number,
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
            score: None,
            feedback: None,
        }
    }
}

/// Complete state of one practice session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: Uuid,
    pub company: String,
    pub position: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
    #[serde(default)]
    pub scores: Vec<u8>,
    #[serde(default)]
    pub weak_areas: Vec<String>,
    pub user_wants_continue: bool,
    pub session_complete: bool,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(
        company: impl Into<String>,
        position: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            company: company.into(),
            position: position.into(),
            difficulty,
            questions: Vec::new(),
            current_index: 0,
            exchanges: Vec::new(),
            scores: Vec::new(),
            weak_areas: Vec::new(),
            user_wants_continue: true,
            session_complete: false,
            started_at: now,
            updated_at: now,
        }
    }

    /// Applies a step's partial update under the central merge policy.
    ///
    /// Overwrite fields replace the old value when present; the progress
    /// sequences only ever grow, except for the generation-time reset. The
    /// monotonicity of `current_index` and the bounds invariant
    /// `current_index <= questions.len()` are checked here so no step can
    /// silently rewind a session.
    pub fn apply(&mut self, update: StateUpdate) -> Result<()> {
        if update.reset_progress {
            self.exchanges.clear();
            self.scores.clear();
            self.weak_areas.clear();
        }
        if let Some(questions) = update.questions {
            self.questions = questions;
        }
        if let Some(index) = update.current_index {
            ensure!(
                update.reset_progress || index >= self.current_index,
                "current_index may not decrease ({} -> {})",
                self.current_index,
                index
            );
            self.current_index = index;
        }
        ensure!(
            self.current_index <= self.questions.len(),
            "current_index {} exceeds question count {}",
            self.current_index,
            self.questions.len()
        );
        if let Some(annotation) = update.annotate_last_exchange {
            let exchange = self
                .exchanges
                .last_mut()
                .ok_or_else(|| anyhow::anyhow!("no exchange available to annotate"))?;
            ensure!(
                exchange.score.is_none(),
                "exchange {} was already analyzed",
                exchange.question_number
            );
            exchange.score = Some(annotation.score);
            exchange.feedback = Some(annotation.feedback);
        }
        self.exchanges.extend(update.new_exchanges);
        self.scores.extend(update.new_scores);
        self.weak_areas.extend(update.new_weak_areas);
        if let Some(flag) = update.user_wants_continue {
            self.user_wants_continue = flag;
        }
        if let Some(flag) = update.session_complete {
            self.session_complete = flag;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Exchange most recently appended, if any.
    pub fn last_exchange(&self) -> Option<&Exchange> {
        self.exchanges.last()
    }
}

/// Score and raw feedback attached to the newest exchange by the analysis
/// step. An exchange is annotated at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeAnnotation {
    pub score: u8,
    pub feedback: String,
}

/// Partial update produced by a single workflow step.
///
/// `Option` fields are overwrite-merged, the `new_*` vectors are
/// append-merged, and `reset_progress` is reserved for the generation step,
/// which starts the progress sequences over.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub questions: Option<Vec<String>>,
    pub current_index: Option<usize>,
    pub reset_progress: bool,
    pub new_exchanges: Vec<Exchange>,
    pub new_scores: Vec<u8>,
    pub new_weak_areas: Vec<String>,
    pub annotate_last_exchange: Option<ExchangeAnnotation>,
    pub user_wants_continue: Option<bool>,
    pub session_complete: Option<bool>,
}
