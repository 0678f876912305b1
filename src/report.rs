//! Summary statistics and report output for a finished session.

use anyhow::{ensure, Result};
use chrono::Utc;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::SessionState;

/// Aggregate view of a terminal session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub company: String,
    pub position: String,
    pub answered: usize,
    /// Omitted when no questions were answered.
    pub mean_score: Option<f64>,
    pub max_score: Option<u8>,
    pub min_score: Option<u8>,
    pub breakdown: Vec<QuestionOutcome>,
    /// Deduplicated weak areas with occurrence counts, first-seen order.
    pub weak_area_counts: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOutcome {
    pub number: usize,
    pub question: String,
    pub answer: String,
    pub score: Option<u8>,
    pub feedback: Option<String>,
}

impl SessionSummary {
    pub fn from_state(state: &SessionState) -> Self {
        let breakdown: Vec<QuestionOutcome> = state
            .exchanges
            .iter()
            .map(|exchange| QuestionOutcome {
                number: exchange.question_number,
                question: exchange.question.clone(),
                answer: exchange.answer.clone(),
                score: exchange.score,
                feedback: exchange.feedback.clone(),
            })
            .collect();

        let scores = &state.scores;
        let mean_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64)
        };

        let mut weak_area_counts: Vec<(String, usize)> = Vec::new();
        for area in &state.weak_areas {
            match weak_area_counts.iter_mut().find(|(label, _)| label == area) {
                Some((_, count)) => *count += 1,
                None => weak_area_counts.push((area.clone(), 1)),
            }
        }

        Self {
            company: state.company.clone(),
            position: state.position.clone(),
            answered: state.exchanges.len(),
            mean_score,
            max_score: scores.iter().copied().max(),
            min_score: scores.iter().copied().min(),
            breakdown,
            weak_area_counts,
        }
    }

    /// Short console rendering used at wrap-up.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Session summary: {} ({})", self.company, self.position);
        let _ = writeln!(out, "Questions answered: {}", self.answered);
        if let Some(mean) = self.mean_score {
            let _ = writeln!(out, "Average score: {mean:.1}/10");
        }
        if let (Some(max), Some(min)) = (self.max_score, self.min_score) {
            let _ = writeln!(out, "Best: {max}/10, lowest: {min}/10");
        }
        if !self.weak_area_counts.is_empty() {
            let _ = writeln!(out, "Areas to work on:");
            for (area, count) in &self.weak_area_counts {
                let _ = writeln!(out, "  - {area} (x{count})");
            }
        }
        out
    }
}

/// Consumer of a terminal session state.
pub trait SessionReporter {
    /// Produces the report and returns where it landed.
    fn publish(&self, state: &SessionState) -> Result<PathBuf>;
}

/// Writes a timestamped markdown report into the reports directory.
#[derive(Debug, Clone)]
pub struct MarkdownReporter {
    output_dir: PathBuf,
}

impl MarkdownReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn report_path(&self, state: &SessionState) -> PathBuf {
        let slug: String = state
            .company
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        self.output_dir.join(format!("{slug}_session_{timestamp}.md"))
    }

    fn render(state: &SessionState, summary: &SessionSummary) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Interview Practice Report: {}", state.company);
        let _ = writeln!(out);
        let _ = writeln!(out, "**Position:** {}", state.position);
        let _ = writeln!(out, "**Difficulty:** {}", state.difficulty.label());
        let _ = writeln!(out, "**Started:** {}", state.started_at.to_rfc3339());
        let _ = writeln!(out);
        let _ = writeln!(out, "## Results");
        let _ = writeln!(out);
        let _ = writeln!(out, "- Questions answered: {}", summary.answered);
        if let Some(mean) = summary.mean_score {
            let _ = writeln!(out, "- Average score: {mean:.1}/10");
        }
        if let (Some(max), Some(min)) = (summary.max_score, summary.min_score) {
            let _ = writeln!(out, "- Best: {max}/10, lowest: {min}/10");
        }
        if !summary.weak_area_counts.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "## Weak areas");
            let _ = writeln!(out);
            for (area, count) in &summary.weak_area_counts {
                let _ = writeln!(out, "- {area} (x{count})");
            }
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "## Question breakdown");
        for outcome in &summary.breakdown {
            let _ = writeln!(out);
            let _ = writeln!(out, "### Q{}: {}", outcome.number, outcome.question);
            let _ = writeln!(out);
            let _ = writeln!(out, "**Answer:**");
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", outcome.answer);
            if let Some(score) = outcome.score {
                let _ = writeln!(out);
                let _ = writeln!(out, "**Score:** {score}/10");
            }
            if let Some(feedback) = &outcome.feedback {
                let _ = writeln!(out);
                let _ = writeln!(out, "**Feedback:**");
                let _ = writeln!(out);
                let _ = writeln!(out, "{feedback}");
            }
        }
        out
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl SessionReporter for MarkdownReporter {
    fn publish(&self, state: &SessionState) -> Result<PathBuf> {
        ensure!(
            state.session_complete,
            "report requested for a session that has not completed"
        );
        let summary = SessionSummary::from_state(state);
        fs::create_dir_all(&self.output_dir)?;
        let path = self.report_path(state);
        fs::write(&path, Self::render(state, &summary))?;
        Ok(path)
    }
}
