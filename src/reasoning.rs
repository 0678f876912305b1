//! Abstract interface to the external reasoning capability.
//!
//! The workflow only ever sees [`ReasoningService`]: structured prompt
//! context in, free text out, failable. The bundled implementation talks to
//! any OpenAI-compatible chat-completions endpoint over blocking HTTP with
//! the timeout from [`ReasoningSettings`]; nothing in the engine depends on
//! that transport.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::config::ReasoningSettings;

/// External collaborator that turns prompt context into free text.
pub trait ReasoningService {
    fn generate(&self, system_context: &str, user_context: &str) -> Result<String>;
}

/// Client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiChatService {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl OpenAiChatService {
    pub fn new(settings: &ReasoningSettings, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client for the reasoning service")?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key: api_key.into(),
        })
    }

    /// Builds a client with the API key taken from the environment variable
    /// named in the settings. A missing key is a configuration failure the
    /// caller reports; the engine never sees it.
    pub fn from_env(settings: &ReasoningSettings) -> Result<Self> {
        let api_key = env::var(&settings.api_key_env).with_context(|| {
            format!(
                "Reasoning API key not found; set the {} environment variable",
                settings.api_key_env
            )
        })?;
        Self::new(settings, api_key)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ReasoningService for OpenAiChatService {
    fn generate(&self, system_context: &str, user_context: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_context,
                },
                ChatMessage {
                    role: "user",
                    content: user_context,
                },
            ],
        };
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("Reasoning service request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "Reasoning service returned {status}: {}",
                body.chars().take(200).collect::<String>()
            ));
        }
        let parsed: ChatResponse = response
            .json()
            .context("Reasoning service returned an unreadable response body")?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Reasoning service response carried no text content"))
    }
}
