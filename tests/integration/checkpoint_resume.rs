use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use prepbase::checkpoint::{CheckpointLoad, CheckpointStore};
use prepbase::console::Decision;
use prepbase::session::{Difficulty, Exchange, SessionState, NO_ANSWER_PLACEHOLDER};
use prepbase::workflow::{entry_step, SessionOutcome, Step, WorkflowEngine};

use crate::support::{analysis, numbered_questions, settings, temp_log, ScriptedIo, ScriptedReasoning};

fn store_in(dir: &TempDir) -> CheckpointStore {
    CheckpointStore::in_dir(dir.path())
}

/// State mid-session: three questions asked, the third not yet analyzed.
fn mid_session_state() -> SessionState {
    let mut state = SessionState::new("Acme", "Platform Engineer", Difficulty::Medium);
    state.questions = (1..=5).map(|i| format!("Question {i}?")).collect();
    for i in 1..=2 {
        let mut exchange = Exchange::new(i, format!("Question {i}?"), format!("Answer {i}"));
        exchange.score = Some(6);
        exchange.feedback = Some(analysis(6, "none"));
        state.exchanges.push(exchange);
        state.scores.push(6);
    }
    state
        .exchanges
        .push(Exchange::new(3, "Question 3?", NO_ANSWER_PLACEHOLDER));
    state.current_index = 2;
    state
}

#[test]
fn round_trip_preserves_every_field() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_in(&dir);

    let state = mid_session_state();
    store.save(&state)?;
    match store.load()? {
        CheckpointLoad::Restored(restored) => assert_eq!(restored, state),
        other => panic!("expected a restored state, got {other:?}"),
    }
    Ok(())
}

#[test]
fn round_trip_preserves_empty_sequences() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_in(&dir);

    let state = SessionState::new("Acme", "SRE", Difficulty::Hard);
    store.save(&state)?;
    match store.load()? {
        CheckpointLoad::Restored(restored) => {
            assert_eq!(restored, state);
            assert!(restored.questions.is_empty());
            assert!(restored.exchanges.is_empty());
        }
        other => panic!("expected a restored state, got {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_checkpoint_is_absent() -> Result<()> {
    let dir = TempDir::new()?;
    assert!(matches!(store_in(&dir).load()?, CheckpointLoad::Absent));
    Ok(())
}

#[test]
fn corrupt_checkpoint_is_surfaced_not_fatal() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_in(&dir);
    fs::write(store.path(), "{ not json at all")?;
    match store.load()? {
        CheckpointLoad::Corrupt(message) => assert!(!message.is_empty()),
        other => panic!("expected corrupt, got {other:?}"),
    }
    Ok(())
}

#[test]
fn clear_removes_the_snapshot() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_in(&dir);
    store.save(&mid_session_state())?;
    store.clear()?;
    assert!(matches!(store.load()?, CheckpointLoad::Absent));
    // Clearing twice is harmless.
    store.clear()?;
    Ok(())
}

#[test]
fn save_overwrites_prior_snapshot() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_in(&dir);

    let first = mid_session_state();
    store.save(&first)?;
    let mut second = first.clone();
    second.current_index = 3;
    second.exchanges.last_mut().unwrap().score = Some(4);
    second.scores.push(4);
    store.save(&second)?;

    match store.load()? {
        CheckpointLoad::Restored(restored) => assert_eq!(restored, second),
        other => panic!("expected a restored state, got {other:?}"),
    }
    Ok(())
}

#[test]
fn resume_after_interrupted_analysis_reruns_analysis_not_ask() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_in(&dir);
    store.save(&mid_session_state())?;

    let CheckpointLoad::Restored(mut state) = store.load()? else {
        panic!("checkpoint should restore");
    };
    assert_eq!(state.exchanges.len(), 3);
    assert_eq!(state.current_index, 2);
    assert_eq!(entry_step(&state), Step::AnalyzeAnswer);

    // Drive the resumed session: analyze the pending answer, then stop.
    let reasoning = ScriptedReasoning::new();
    reasoning.push_ok(analysis(3, "concrete examples"));
    let mut io = ScriptedIo::new();
    io.decide(Decision::No);

    let (_log_dir, log) = temp_log();
    let mut engine = WorkflowEngine::new(&reasoning, &mut io, log, settings());
    let outcome = engine.run(&mut state)?;

    assert_eq!(outcome, SessionOutcome::Completed);
    // No question was re-asked; the third exchange simply got its score.
    assert_eq!(state.exchanges.len(), 3);
    assert_eq!(state.exchanges[2].score, Some(3));
    assert_eq!(state.scores, vec![6, 6, 3]);
    assert_eq!(state.weak_areas, vec!["concrete examples"]);
    assert!(io.questions_shown.is_empty());
    Ok(())
}

#[test]
fn interrupt_while_answering_reasks_the_same_question() -> Result<()> {
    let reasoning = ScriptedReasoning::new();
    reasoning.push_ok(numbered_questions());
    // No scripted answer: the first read interrupts.
    let mut io = ScriptedIo::new();

    let (_dir, log) = temp_log();
    let mut state = SessionState::new("Acme", "Backend Engineer", Difficulty::Medium);
    let mut engine = WorkflowEngine::new(&reasoning, &mut io, log, settings());
    let outcome = engine.run(&mut state)?;

    assert_eq!(outcome, SessionOutcome::Interrupted);
    assert!(state.exchanges.is_empty());
    assert_eq!(state.current_index, 0);
    // Resume re-enters at AskQuestion for the same question.
    assert_eq!(entry_step(&state), Step::AskQuestion);
    Ok(())
}

#[test]
fn interrupt_at_continue_prompt_resumes_at_feedback() -> Result<()> {
    let reasoning = ScriptedReasoning::new();
    reasoning.push_ok(numbered_questions());
    reasoning.push_ok(analysis(7, "none"));

    let mut io = ScriptedIo::new();
    io.answer("A full answer.");
    io.decide(Decision::Interrupted);

    let (_dir, log) = temp_log();
    let mut state = SessionState::new("Acme", "Backend Engineer", Difficulty::Medium);
    let mut engine = WorkflowEngine::new(&reasoning, &mut io, log, settings());
    let outcome = engine.run(&mut state)?;

    assert_eq!(outcome, SessionOutcome::Interrupted);
    // The feedback step's update was discarded: index unchanged, exchange
    // already analyzed, so resume re-runs GiveFeedback.
    assert_eq!(state.current_index, 0);
    assert_eq!(state.exchanges[0].score, Some(7));
    assert_eq!(entry_step(&state), Step::GiveFeedback);
    Ok(())
}
