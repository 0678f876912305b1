//! Configuration primitives for PrepBase.
//!
//! Stored in a machine-readable TOML file located under the workspace root:
//!   %APPDATA%/PrepBase/config.toml on Windows
//!   $XDG_DATA_HOME/PrepBase/config.toml on Linux
//!   ~/Library/Application Support/PrepBase/config.toml on macOS
//!
//! The workspace root also holds the session checkpoint, the append-only
//! event log, and generated report files.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Reasoning-service connection settings.
    #[serde(default)]
    pub reasoning: ReasoningSettings,
    /// Session defaults (question count, weak-area threshold).
    #[serde(default)]
    pub session: SessionSettings,
}

/// Settings for the external reasoning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Base URL of an OpenAI-compatible chat-completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Hard request timeout; the service itself has unbounded latency.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable the API key is read from.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ReasoningSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Per-session tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Number of questions generated per session.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Scores strictly below this record the parsed weak-area label.
    #[serde(default = "default_weak_area_threshold")]
    pub weak_area_threshold: u8,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            weak_area_threshold: default_weak_area_threshold(),
        }
    }
}

const fn default_question_count() -> usize {
    crate::session::QUESTION_COUNT
}

const fn default_weak_area_threshold() -> u8 {
    7
}

/// Returns the root directory where PrepBase stores data.
///
/// Order of precedence:
/// 1. `PREPBASE_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("PREPBASE_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("PrepBase"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(workspace_root()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let root = workspace_root()?;
    fs::create_dir_all(&root)?;
    let data = toml::to_string_pretty(config)?;
    fs::write(root.join(CONFIG_FILE_NAME), data)?;
    Ok(())
}

/// Ensures the workspace structure exists (sessions/ and reports/).
pub fn ensure_workspace_structure() -> Result<WorkspacePaths> {
    let root = workspace_root()?;
    let sessions_dir = root.join("sessions");
    let reports_dir = root.join("reports");
    fs::create_dir_all(&sessions_dir)?;
    fs::create_dir_all(&reports_dir)?;
    Ok(WorkspacePaths {
        root,
        sessions_dir,
        reports_dir,
    })
}

/// Convenience struct exposing important workspace paths.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    /// Holds the checkpoint file and the session event log.
    pub sessions_dir: PathBuf,
    /// Destination for generated markdown reports.
    pub reports_dir: PathBuf,
}
