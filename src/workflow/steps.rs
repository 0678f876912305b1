//! Implementations of the five workflow steps.
//!
//! Every step returns a partial `StateUpdate` and leaves merging to the
//! engine. Reasoning failures never abort a session: generation falls back
//! to a fixed question set, analysis falls back to the default score with
//! the error text retained as feedback.

use anyhow::{anyhow, ensure, Result};
use serde_json::json;

use crate::console::{AnswerEvent, Decision};
use crate::events::EventType;
use crate::feedback::parse_evaluation;
use crate::report::SessionSummary;
use crate::session::{
    Exchange, ExchangeAnnotation, SessionState, StateUpdate, NO_ANSWER_PLACEHOLDER,
};

use super::{StepRun, WorkflowEngine};

const GENERATE_SYSTEM_PROMPT: &str = "\
You are an experienced interview coach preparing a candidate for a specific \
role. Generate realistic interview questions tailored to the company, \
position, and difficulty provided. Return only the questions, one per line, \
as a numbered list.";

const ANALYZE_SYSTEM_PROMPT: &str = "\
You are an interview coach evaluating one practice answer. Give short, \
actionable feedback (2-4 sentences), then finish with exactly these two \
lines:\n\
Score: <integer from 1 to 10>\n\
Weak area: <short skill label, or 'none' if the answer had no notable gap>";

/// Questions used when the reasoning service fails or returns nothing
/// usable.
const FALLBACK_QUESTIONS: &[&str] = &[
    "Tell me about yourself and your background.",
    "Why are you interested in this position?",
    "Describe a challenging problem you solved recently and how you approached it.",
    "What do you consider your greatest professional strength?",
    "Where do you see yourself in five years?",
];

/// The generic fallback set, sized to `count`.
pub fn fallback_questions(count: usize) -> Vec<String> {
    FALLBACK_QUESTIONS
        .iter()
        .cycle()
        .take(count)
        .map(|q| q.to_string())
        .collect()
}

/// Pulls question lines out of free text: lines starting with a digit or a
/// dash, with leading ordinal markers (`1.`, `1)`, `1:`, `-`) stripped.
pub fn extract_question_lines(text: &str) -> Vec<String> {
    let mut questions = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        let Some(first) = trimmed.chars().next() else {
            continue;
        };
        let body = if first == '-' {
            trimmed.trim_start_matches('-').trim_start()
        } else if first.is_ascii_digit() {
            let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
            let rest = rest
                .strip_prefix('.')
                .or_else(|| rest.strip_prefix(')'))
                .or_else(|| rest.strip_prefix(':'))
                .unwrap_or(rest);
            rest.trim_start()
        } else {
            continue;
        };
        if !body.is_empty() {
            questions.push(body.to_string());
        }
    }
    questions
}

/// Brings an extracted question list to exactly `count` entries: truncates
/// overlong lists, pads short ones from the fallback set, and substitutes
/// the fallback set verbatim when nothing usable was extracted.
pub fn complete_question_list(extracted: Vec<String>, count: usize) -> Vec<String> {
    if extracted.is_empty() {
        return fallback_questions(count);
    }
    let mut questions = extracted;
    questions.truncate(count);
    for fallback in FALLBACK_QUESTIONS {
        if questions.len() >= count {
            break;
        }
        if !questions.iter().any(|q| q == fallback) {
            questions.push(fallback.to_string());
        }
    }
    questions.truncate(count);
    questions
}

impl<'a> WorkflowEngine<'a> {
    pub(super) fn generate_questions(&mut self, state: &SessionState) -> Result<StepRun> {
        let count = self.settings.question_count;
        let user_context = format!(
            "Company: {}\nPosition: {}\nDifficulty: {}\nGenerate exactly {count} interview questions.",
            state.company,
            state.position,
            state.difficulty.label(),
        );
        let raw = match self.reasoning.generate(GENERATE_SYSTEM_PROMPT, &user_context) {
            Ok(text) => text,
            Err(err) => {
                self.log.record(
                    state.session_id,
                    EventType::ReasoningDegraded,
                    json!({"step": "generate_questions", "error": err.to_string()}),
                )?;
                self.io
                    .notice("Question generation is unavailable; using a generic question set.");
                String::new()
            }
        };
        let extracted = extract_question_lines(&raw);
        let fallback_used = extracted.is_empty();
        let questions = complete_question_list(extracted, count);
        self.log.record(
            state.session_id,
            EventType::QuestionsGenerated,
            json!({"count": questions.len(), "fallback_used": fallback_used}),
        )?;
        Ok(StepRun::Advance(StateUpdate {
            questions: Some(questions),
            current_index: Some(0),
            reset_progress: true,
            user_wants_continue: Some(true),
            ..Default::default()
        }))
    }

    pub(super) fn ask_question(&mut self, state: &SessionState) -> Result<StepRun> {
        let number = state.current_index + 1;
        let total = state.questions.len();
        let question = state
            .questions
            .get(state.current_index)
            .ok_or_else(|| anyhow!("no question at index {}", state.current_index))?
            .clone();
        self.io.present_question(number, total, &question);
        let answer = match self.io.read_answer()? {
            AnswerEvent::Submitted(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    // Blank answers are kept as a sentinel; practice must
                    // not abort on them.
                    NO_ANSWER_PLACEHOLDER.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            AnswerEvent::Interrupted => return Ok(StepRun::Interrupted),
        };
        self.log.record(
            state.session_id,
            EventType::QuestionAsked,
            json!({"question_number": number}),
        )?;
        Ok(StepRun::Advance(StateUpdate {
            new_exchanges: vec![Exchange::new(number, question, answer)],
            ..Default::default()
        }))
    }

    pub(super) fn analyze_answer(&mut self, state: &SessionState) -> Result<StepRun> {
        let exchange = state
            .last_exchange()
            .ok_or_else(|| anyhow!("analysis requested with no exchange recorded"))?;
        let user_context = format!(
            "Question: {}\n\nCandidate answer:\n{}",
            exchange.question, exchange.answer
        );
        let feedback_text = match self.reasoning.generate(ANALYZE_SYSTEM_PROMPT, &user_context) {
            Ok(text) => text,
            Err(err) => {
                self.log.record(
                    state.session_id,
                    EventType::ReasoningDegraded,
                    json!({"step": "analyze_answer", "error": err.to_string()}),
                )?;
                format!("(feedback unavailable: {err})")
            }
        };
        let evaluation = parse_evaluation(&feedback_text);
        let mut new_weak_areas = Vec::new();
        if evaluation.score < self.settings.weak_area_threshold {
            if let Some(area) = evaluation.weak_area {
                new_weak_areas.push(area);
            }
        }
        self.log.record(
            state.session_id,
            EventType::AnswerEvaluated,
            json!({
                "question_number": exchange.question_number,
                "score": evaluation.score,
            }),
        )?;
        Ok(StepRun::Advance(StateUpdate {
            annotate_last_exchange: Some(ExchangeAnnotation {
                score: evaluation.score,
                feedback: feedback_text,
            }),
            new_scores: vec![evaluation.score],
            new_weak_areas,
            ..Default::default()
        }))
    }

    pub(super) fn give_feedback(&mut self, state: &SessionState) -> Result<StepRun> {
        let exchange = state
            .last_exchange()
            .ok_or_else(|| anyhow!("feedback requested with no exchange recorded"))?;
        self.io.show_feedback(exchange);
        let next_index = state.current_index + 1;
        let more_remaining = next_index < state.questions.len();
        let wants_continue = if more_remaining {
            match self.io.confirm("Continue to the next question?", true)? {
                Decision::Yes => true,
                Decision::No => false,
                Decision::Interrupted => return Ok(StepRun::Interrupted),
            }
        } else {
            false
        };
        Ok(StepRun::Advance(StateUpdate {
            current_index: Some(next_index),
            user_wants_continue: Some(wants_continue),
            ..Default::default()
        }))
    }

    pub(super) fn wrap_up(&mut self, state: &SessionState) -> Result<StepRun> {
        // Skew between scores and exchanges means steps ran out of order.
        ensure!(
            state.scores.len() == state.exchanges.len(),
            "scores/exchanges skew at wrap-up: {} scores for {} exchanges",
            state.scores.len(),
            state.exchanges.len()
        );
        let summary = SessionSummary::from_state(state);
        self.io.show_summary(&summary);
        self.log.record(
            state.session_id,
            EventType::SessionCompleted,
            json!({
                "answered": summary.answered,
                "mean_score": summary.mean_score,
                "weak_areas": summary.weak_area_counts.len(),
            }),
        )?;
        Ok(StepRun::Advance(StateUpdate {
            session_complete: Some(true),
            ..Default::default()
        }))
    }
}
