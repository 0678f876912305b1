//! Interactive interview practice session.
//!
//! Offers to resume an unfinished checkpoint, otherwise collects the
//! company, position, and difficulty and starts fresh. An interruption
//! (`quit` or end of input at any prompt) checkpoints the session; a
//! completed session is reported to a markdown file and the checkpoint is
//! cleared.

use anyhow::Result;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::process;

use prepbase::checkpoint::{CheckpointLoad, CheckpointStore};
use prepbase::config;
use prepbase::console::{parse_decision, Decision, SessionIo, StdConsole};
use prepbase::events::{EventType, SessionLog};
use prepbase::reasoning::OpenAiChatService;
use prepbase::report::{MarkdownReporter, SessionReporter};
use prepbase::session::{Difficulty, SessionState};
use prepbase::workflow::{SessionOutcome, WorkflowEngine};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let app_config = config::load_or_default()?;
    if !config::config_file_path()?.exists() {
        // First run: persist the defaults so they are editable.
        config::save(&app_config)?;
    }
    let paths = config::ensure_workspace_structure()?;
    let store = CheckpointStore::in_dir(&paths.sessions_dir);
    let log = SessionLog::for_dir(&paths.sessions_dir);
    let mut console = StdConsole::new();

    println!("PrepBase interview practice");
    println!("---------------------------");

    let mut state = match resume_or_fresh(&store, &log, &mut console)? {
        Some(state) => state,
        None => return Ok(()),
    };

    let reasoning = OpenAiChatService::from_env(&app_config.reasoning)?;
    let mut engine = WorkflowEngine::new(
        &reasoning,
        &mut console,
        log.clone(),
        app_config.session.clone(),
    );

    match engine.run(&mut state)? {
        SessionOutcome::Completed => {
            let reporter = MarkdownReporter::new(&paths.reports_dir);
            let report_path = reporter.publish(&state)?;
            println!("Report saved to {}", report_path.display());
            store.clear()?;
        }
        SessionOutcome::Interrupted => {
            let checkpoint_path = store.save(&state)?;
            log.record(
                state.session_id,
                EventType::CheckpointSaved,
                json!({"path": checkpoint_path.display().to_string()}),
            )?;
            println!(
                "Session paused. Progress saved to {}; run again to resume.",
                checkpoint_path.display()
            );
        }
    }
    Ok(())
}

/// Returns the state to drive, or `None` when input ended before a session
/// could start.
fn resume_or_fresh(
    store: &CheckpointStore,
    log: &SessionLog,
    console: &mut StdConsole,
) -> Result<Option<SessionState>> {
    match store.load()? {
        CheckpointLoad::Restored(state) if !state.session_complete => {
            println!(
                "Found an unfinished session for {} ({}), {} of {} questions answered.",
                state.company,
                state.position,
                state.exchanges.len(),
                state.questions.len(),
            );
            match console.confirm("Resume it?", true)? {
                Decision::Yes => {
                    log.record(state.session_id, EventType::CheckpointRestored, json!({}))?;
                    return Ok(Some(state));
                }
                Decision::No => store.clear()?,
                Decision::Interrupted => return Ok(None),
            }
        }
        CheckpointLoad::Restored(_) => {
            // A completed session left its checkpoint behind; not worth
            // offering, just drop it.
            store.clear()?;
        }
        CheckpointLoad::Corrupt(message) => {
            eprintln!("Warning: {message}; starting fresh.");
            store.clear()?;
        }
        CheckpointLoad::Absent => {}
    }
    fresh_session()
}

fn fresh_session() -> Result<Option<SessionState>> {
    let Some(company) = prompt_with_default("Company", "Stripe")? else {
        return Ok(None);
    };
    let Some(position) = prompt_with_default("Position", "Software Engineer")? else {
        return Ok(None);
    };
    let Some(difficulty_raw) = prompt_with_default("Difficulty (easy/medium/hard)", "medium")?
    else {
        return Ok(None);
    };
    let difficulty = Difficulty::parse(&difficulty_raw).unwrap_or_default();
    Ok(Some(SessionState::new(company, position, difficulty)))
}

/// Single-line prompt; empty input accepts the default, end of input
/// returns `None`.
fn prompt_with_default(label: &str, default: &str) -> Result<Option<String>> {
    print!("{label} [{default}]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim();
    if matches!(parse_decision(trimmed, true), Decision::Interrupted) {
        return Ok(None);
    }
    if trimmed.is_empty() {
        Ok(Some(default.to_string()))
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
