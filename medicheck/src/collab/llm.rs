//! LLM-backed collaborators over an OpenAI-compatible chat completions API.
//!
//! One shared [`LlmChat`] client (API key from `OPENAI_API_KEY`, optional
//! `OPENAI_BASE_URL` for compatible providers), wrapped by one thin
//! implementation per collaborator trait. Model answers are trimmed to their
//! outermost `{...}` block before parsing; anything unparsable becomes
//! [`CollabError::Malformed`] and takes the stage's normal failure path.

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::prompts::{
    DEFAULT_POLICY, EXAMPLE_SUMMARY, EXTRACTION_PROMPT, GUARDRAIL_PROMPT, POLICY_EVAL_PROMPT,
    SUMMARY_PROMPT, VALIDATOR_PROMPT,
};
use super::{
    CollabError, DocumentExtractor, Extraction, FieldValidator, GuardrailCheck, GuardrailVerdict,
    PolicyEvaluator, PolicyVerdict, SummaryWriter, ValidationVerdict,
};

/// Chat completions client shared by all LLM collaborators.
pub struct LlmChat {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl LlmChat {
    /// Client with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: 0.2,
        }
    }

    /// Client with explicit config (custom key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: 0.2,
        }
    }

    /// Client from the environment: `.env` is loaded if present, model from
    /// `OPENAI_MODEL` (default `gpt-4o-mini`), base URL from `OPENAI_BASE_URL`.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let mut config = OpenAIConfig::new();
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_api_base(base);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config = config.with_api_key(key);
        }
        Self::with_config(config, model)
    }

    /// Sampling temperature (default 0.2).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// One prompt in, assistant text out.
    async fn complete(&self, prompt: &str) -> Result<String, CollabError> {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt),
        )];
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| CollabError::Transport(format!("request build failed: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| CollabError::Transport(format!("chat completions error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CollabError::Malformed("model returned no choices".to_string()))?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Trims a model answer to its outermost `{...}` block and parses it.
fn json_block(response: &str) -> Result<Value, CollabError> {
    let start = response
        .find('{')
        .ok_or_else(|| CollabError::Malformed("no JSON object in model answer".to_string()))?;
    let end = response
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| CollabError::Malformed("unterminated JSON object in model answer".to_string()))?;
    serde_json::from_str(&response[start..=end])
        .map_err(|e| CollabError::Malformed(format!("model answer is not valid JSON: {}", e)))
}

fn parse_verdict<T: DeserializeOwned>(response: &str) -> Result<T, CollabError> {
    let value = json_block(response)?;
    serde_json::from_value(value)
        .map_err(|e| CollabError::Malformed(format!("unexpected verdict shape: {}", e)))
}

fn pretty(document: &Value) -> String {
    serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
}

/// Guardrail collaborator backed by the chat model.
pub struct LlmGuardrail {
    chat: Arc<LlmChat>,
}

impl LlmGuardrail {
    pub fn new(chat: Arc<LlmChat>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl GuardrailCheck for LlmGuardrail {
    async fn check(&self, document: &Value) -> Result<GuardrailVerdict, CollabError> {
        let prompt = GUARDRAIL_PROMPT.replace("{json_data}", &pretty(document));
        let response = self.chat.complete(&prompt).await?;
        parse_verdict(&response)
    }
}

/// Field-validation collaborator backed by the chat model.
pub struct LlmValidator {
    chat: Arc<LlmChat>,
}

impl LlmValidator {
    pub fn new(chat: Arc<LlmChat>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl FieldValidator for LlmValidator {
    async fn validate(&self, document: &Value) -> Result<ValidationVerdict, CollabError> {
        let prompt = VALIDATOR_PROMPT
            .replace("{json_data}", &pretty(document))
            .replace("{example_json}", EXAMPLE_SUMMARY);
        let response = self.chat.complete(&prompt).await?;
        parse_verdict(&response)
    }
}

/// Policy-evaluation collaborator backed by the chat model.
pub struct LlmPolicy {
    chat: Arc<LlmChat>,
    policy_text: String,
}

impl LlmPolicy {
    /// Evaluates against the built-in default policy.
    pub fn new(chat: Arc<LlmChat>) -> Self {
        Self {
            chat,
            policy_text: DEFAULT_POLICY.to_string(),
        }
    }

    /// Evaluates against the given policy text instead of the default.
    pub fn with_policy(mut self, policy_text: impl Into<String>) -> Self {
        self.policy_text = policy_text.into();
        self
    }
}

#[async_trait]
impl PolicyEvaluator for LlmPolicy {
    async fn evaluate(&self, document: &Value) -> Result<PolicyVerdict, CollabError> {
        let prompt = POLICY_EVAL_PROMPT
            .replace("{policy}", &self.policy_text)
            .replace("{json_data}", &pretty(document));
        let response = self.chat.complete(&prompt).await?;
        parse_verdict(&response)
    }
}

/// Extraction collaborator: reads the source as UTF-8 text, then asks the
/// model to structure it. Unreadable sources are transport failures.
pub struct LlmExtractor {
    chat: Arc<LlmChat>,
}

impl LlmExtractor {
    pub fn new(chat: Arc<LlmChat>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl DocumentExtractor for LlmExtractor {
    async fn extract(&self, source_ref: &str) -> Result<Extraction, CollabError> {
        let text = tokio::fs::read_to_string(source_ref)
            .await
            .map_err(|e| CollabError::Transport(format!("cannot read {}: {}", source_ref, e)))?;
        let prompt = EXTRACTION_PROMPT.replace("{source_text}", &text);
        let response = self.chat.complete(&prompt).await?;
        let value = json_block(&response)?;
        if value.get("rejected").and_then(Value::as_bool) == Some(true) {
            let explanation = value
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or("No clinical summary could be extracted from the document.")
                .to_string();
            return Ok(Extraction::Rejected { explanation });
        }
        Ok(Extraction::Document(value))
    }
}

/// Summary collaborator backed by the chat model; returns free text.
pub struct LlmSummarizer {
    chat: Arc<LlmChat>,
}

impl LlmSummarizer {
    pub fn new(chat: Arc<LlmChat>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl SummaryWriter for LlmSummarizer {
    async fn summarize(&self, document: &Value) -> Result<String, CollabError> {
        let prompt = SUMMARY_PROMPT.replace("{json_data}", &pretty(document));
        self.chat.complete(&prompt).await
    }
}
