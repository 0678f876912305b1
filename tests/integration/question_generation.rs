use prepbase::workflow::{complete_question_list, extract_question_lines, fallback_questions};

#[test]
fn extracts_numbered_and_dashed_lines() {
    let text = "Here you go:\n\
                1. Tell me about a project you led.\n\
                2) How do you handle disagreement?\n\
                3: What is your debugging process?\n\
                - Why this company?\n\
                Some closing remark.";
    let lines = extract_question_lines(text);
    assert_eq!(
        lines,
        vec![
            "Tell me about a project you led.",
            "How do you handle disagreement?",
            "What is your debugging process?",
            "Why this company?",
        ]
    );
}

#[test]
fn strips_ordinal_markers_only_once() {
    let lines = extract_question_lines("1. 10 ways you test code?");
    assert_eq!(lines, vec!["10 ways you test code?"]);
}

#[test]
fn ignores_blank_and_prose_lines() {
    let text = "\nAs requested, questions below.\n\n1. First?\n\n2. Second?\n";
    assert_eq!(extract_question_lines(text), vec!["First?", "Second?"]);
}

#[test]
fn empty_extraction_yields_fallback_verbatim() {
    let questions = complete_question_list(Vec::new(), 5);
    assert_eq!(questions, fallback_questions(5));
}

#[test]
fn overlong_lists_truncate_to_the_target() {
    let extracted: Vec<String> = (1..=8).map(|i| format!("Q{i}?")).collect();
    let questions = complete_question_list(extracted, 5);
    assert_eq!(questions.len(), 5);
    assert_eq!(questions[4], "Q5?");
}

#[test]
fn short_lists_pad_from_the_fallback_set() {
    let extracted = vec!["Only one real question?".to_string()];
    let questions = complete_question_list(extracted, 5);
    assert_eq!(questions.len(), 5);
    assert_eq!(questions[0], "Only one real question?");
    let fallback = fallback_questions(5);
    assert!(questions[1..].iter().all(|q| fallback.contains(q)));
}

#[test]
fn fallback_set_has_the_requested_size() {
    assert_eq!(fallback_questions(5).len(), 5);
    assert_eq!(fallback_questions(7).len(), 7);
}
