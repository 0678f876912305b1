pub mod checkpoint;
pub mod config;
pub mod console;
pub mod events;
pub mod feedback;
pub mod reasoning;
pub mod report;
pub mod session;
pub mod workflow;

// Re-export commonly used types for convenience.
pub use checkpoint::{CheckpointLoad, CheckpointStore};
pub use config::{AppConfig, SessionSettings, WorkspacePaths};
pub use events::{EventType, SessionLog};
pub use feedback::{parse_evaluation, Evaluation};
pub use reasoning::{OpenAiChatService, ReasoningService};
pub use report::{MarkdownReporter, SessionReporter, SessionSummary};
pub use session::{Difficulty, Exchange, SessionState, StateUpdate};
pub use workflow::{entry_step, route, SessionOutcome, Step, WorkflowEngine};
