use prepbase::session::{Difficulty, Exchange, SessionState};
use prepbase::workflow::{entry_step, route, Step};

fn state_with_questions() -> SessionState {
    let mut state = SessionState::new("Acme", "Data Engineer", Difficulty::Easy);
    state.questions = (1..=5).map(|i| format!("Q{i}?")).collect();
    state
}

#[test]
fn route_returns_wrap_up_when_user_stops_regardless_of_index() {
    for index in [0, 2, 5] {
        let mut state = state_with_questions();
        state.user_wants_continue = false;
        state.current_index = index;
        assert_eq!(route(&state), Step::WrapUp, "index {index}");
    }
}

#[test]
fn route_returns_wrap_up_when_questions_are_exhausted() {
    let mut state = state_with_questions();
    state.user_wants_continue = true;
    state.current_index = 5;
    assert_eq!(route(&state), Step::WrapUp);
}

#[test]
fn route_returns_ask_question_otherwise() {
    let mut state = state_with_questions();
    state.user_wants_continue = true;
    state.current_index = 3;
    assert_eq!(route(&state), Step::AskQuestion);
}

#[test]
fn entry_step_starts_fresh_sessions_at_generation() {
    let state = SessionState::new("Acme", "Data Engineer", Difficulty::Hard);
    assert_eq!(entry_step(&state), Step::GenerateQuestions);
}

#[test]
fn entry_step_asks_next_question_between_cycles() {
    let mut state = state_with_questions();
    let mut exchange = Exchange::new(1, "Q1?", "answer");
    exchange.score = Some(7);
    state.exchanges.push(exchange);
    state.scores.push(7);
    state.current_index = 1;
    assert_eq!(entry_step(&state), Step::AskQuestion);
}

#[test]
fn entry_step_resumes_analysis_for_an_unscored_exchange() {
    let mut state = state_with_questions();
    state.exchanges.push(Exchange::new(1, "Q1?", "answer"));
    state.current_index = 0;
    assert_eq!(entry_step(&state), Step::AnalyzeAnswer);
}

#[test]
fn entry_step_resumes_feedback_for_a_scored_exchange() {
    let mut state = state_with_questions();
    let mut exchange = Exchange::new(1, "Q1?", "answer");
    exchange.score = Some(6);
    exchange.feedback = Some("Score: 6".into());
    state.exchanges.push(exchange);
    state.scores.push(6);
    state.current_index = 0;
    assert_eq!(entry_step(&state), Step::GiveFeedback);
}

#[test]
fn entry_step_wraps_up_exhausted_sessions() {
    let mut state = state_with_questions();
    state.current_index = 5;
    for i in 1..=5 {
        let mut exchange = Exchange::new(i, format!("Q{i}?"), "answer");
        exchange.score = Some(6);
        state.exchanges.push(exchange);
        state.scores.push(6);
    }
    state.user_wants_continue = false;
    assert_eq!(entry_step(&state), Step::WrapUp);
}
