//! Readings from an OpenAI-compatible chat completion endpoint.

use super::KanjiResolver;
use crate::config::LlmConfig;
use crate::error::ResolverError;
use crate::hepburn::to_hepburn;
use crate::script::{has_japanese, is_kana, is_kanji};
use crate::utils::check_response_status;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Regex to extract the answer from markdown code fences.
static CODE_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").expect("Invalid CODE_FENCE_REGEX")
});

/// Refusal phrases that indicate the model declined to answer.
const REFUSAL_PHRASES: &[&str] = &[
    "i'm sorry",
    "i cannot",
    "i am unable",
    "as an ai",
    "my apologies",
];

/// Request body for the chat completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

/// A message in the conversation.
#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Response from the chat completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

/// A single choice in the response.
#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

/// Message content in a response.
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Asks a language model for the reading of each kanji token.
pub struct LlmResolver {
    /// HTTP client for API requests.
    client: Client,
    /// API configuration.
    config: LlmConfig,
}

impl LlmResolver {
    pub fn new(client: Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.config.prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: 0.0,
        }
    }
}

/// Turns the model's answer into romaji.
///
/// Kana answers are romanized; Latin answers are taken as romaji already.
/// Answers still containing kanji are rejected.
fn parse_reading(raw: &str) -> Result<String, ResolverError> {
    let trimmed = raw.trim();

    // Remove markdown code fence if present
    let unfenced = CODE_FENCE_REGEX
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map_or(trimmed, |m| m.as_str());

    let answer = unfenced.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if answer.is_empty() {
        return Err(ResolverError::Refused("Empty response".to_string()));
    }

    let lower = answer.to_lowercase();
    if let Some(phrase) = REFUSAL_PHRASES.iter().find(|p| lower.starts_with(*p)) {
        return Err(ResolverError::Refused(format!(
            "Response starts with refusal phrase: {}",
            phrase
        )));
    }

    if answer.chars().any(is_kanji) {
        return Err(ResolverError::ParseError(format!(
            "Reading still contains kanji: {}",
            answer
        )));
    }

    if has_japanese(answer) {
        // drop separators like ・ that models put between words
        let kana: String = answer
            .chars()
            .filter(|&c| is_kana(c) && c != '・')
            .collect();
        Ok(to_hepburn(&kana))
    } else {
        Ok(lower)
    }
}

#[async_trait]
impl KanjiResolver for LlmResolver {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn resolve(&self, text: &str) -> Result<String, ResolverError> {
        if !self.config.is_configured() {
            return Err(ResolverError::InvalidConfig(
                "llm.key is not set".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.key))
            .json(&self.build_request(text))
            .send()
            .await?;

        let response_body: ChatResponse = check_response_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ResolverError::ParseError(format!("Failed to parse API response: {}", e)))?;

        let choice = response_body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ResolverError::ParseError("No choices in API response".to_string()))?;

        parse_reading(&choice.message.content)
    }
}
