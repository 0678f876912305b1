//! Console protocol for the two blocking input points of a session.
//!
//! The engine talks to the candidate through [`SessionIo`], so tests can
//! script a whole session without a terminal. `quit` (or end of input) at
//! either input point is the interruption signal: the engine stops without
//! applying the in-flight step and the caller writes a checkpoint.

use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::report::SessionSummary;
use crate::session::Exchange;

/// Commands that interrupt the session when typed at an input prompt.
const QUIT_COMMANDS: &[&str] = &["quit", "exit", "q"];

/// Result of reading a multi-line answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerEvent {
    /// Raw answer text; may be empty after trimming.
    Submitted(String),
    Interrupted,
}

/// Result of a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
    Interrupted,
}

/// Blocking console surface the workflow steps depend on.
pub trait SessionIo {
    fn present_question(&mut self, number: usize, total: usize, question: &str);

    /// Collects an answer terminated by one blank line.
    fn read_answer(&mut self) -> Result<AnswerEvent>;

    fn show_feedback(&mut self, exchange: &Exchange);

    /// Yes/no prompt, case-insensitive, empty input takes `default_yes`.
    fn confirm(&mut self, prompt: &str, default_yes: bool) -> Result<Decision>;

    fn show_summary(&mut self, summary: &SessionSummary);

    fn notice(&mut self, message: &str);
}

/// Interprets one line of yes/no input. Shared by every confirm prompt so
/// the accepted spellings stay in one place.
pub fn parse_decision(line: &str, default_yes: bool) -> Decision {
    let trimmed = line.trim().to_ascii_lowercase();
    if QUIT_COMMANDS.contains(&trimmed.as_str()) {
        return Decision::Interrupted;
    }
    match trimmed.as_str() {
        "" => {
            if default_yes {
                Decision::Yes
            } else {
                Decision::No
            }
        }
        "y" | "yes" => Decision::Yes,
        "n" | "no" => Decision::No,
        // Unrecognized input falls back to the designated default.
        _ => {
            if default_yes {
                Decision::Yes
            } else {
                Decision::No
            }
        }
    }
}

/// Standard-stream implementation used by the interactive binary.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }

    fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl SessionIo for StdConsole {
    fn present_question(&mut self, number: usize, total: usize, question: &str) {
        println!("\nQuestion {number}/{total}");
        println!("{question}");
        println!("(answer below, finish with an empty line; type 'quit' to pause)");
        let _ = io::stdout().flush();
    }

    fn read_answer(&mut self) -> Result<AnswerEvent> {
        let mut answer_lines: Vec<String> = Vec::new();
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(AnswerEvent::Interrupted);
            };
            let trimmed = line.trim();
            if answer_lines.is_empty() && QUIT_COMMANDS.contains(&trimmed.to_ascii_lowercase().as_str()) {
                return Ok(AnswerEvent::Interrupted);
            }
            if trimmed.is_empty() {
                break;
            }
            answer_lines.push(line);
        }
        Ok(AnswerEvent::Submitted(answer_lines.join("\n")))
    }

    fn show_feedback(&mut self, exchange: &Exchange) {
        if let Some(score) = exchange.score {
            println!("\nScore: {score}/10");
        }
        if let Some(feedback) = &exchange.feedback {
            println!("{feedback}");
        }
    }

    fn confirm(&mut self, prompt: &str, default_yes: bool) -> Result<Decision> {
        let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
        print!("{prompt} {hint} ");
        let _ = io::stdout().flush();
        match self.read_line()? {
            Some(line) => Ok(parse_decision(&line, default_yes)),
            None => Ok(Decision::Interrupted),
        }
    }

    fn show_summary(&mut self, summary: &SessionSummary) {
        println!("\n{}", summary.render_text());
    }

    fn notice(&mut self, message: &str) {
        println!("{message}");
    }
}
