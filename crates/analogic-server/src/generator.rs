//! Text generation
//!
//! The analogy endpoint talks to a language model through [`TextGenerator`],
//! keeping vendor request/response shapes out of the handlers. The shipped
//! adapter speaks the OpenAI chat-completions protocol, which also covers
//! compatible servers (vLLM, LM Studio, ...).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Errors from a text generation backend.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
	/// No backend is configured (missing API key).
	#[error("text generation is not configured")]
	NotConfigured,

	/// The backend did not answer in time.
	#[error("text generation timed out")]
	Timeout,

	/// Quota exhausted or rate limited.
	#[error("text generation quota exceeded")]
	RateLimited,

	/// The backend rejected our credentials.
	#[error("text generation authentication failed: {0}")]
	Authentication(String),

	/// Transport failure.
	#[error("network error: {0}")]
	Network(String),

	/// The backend answered with an error or an unusable payload.
	#[error("provider error: {0}")]
	Provider(String),
}

/// Sampling options for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
	/// Token budget
	pub max_tokens: u32,
	/// Sampling temperature
	pub temperature: f32,
}

impl Default for GenerationOptions {
	fn default() -> Self {
		Self {
			max_tokens: 400,
			temperature: 0.7,
		}
	}
}

/// A chat prompt: fixed system framing plus the user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
	/// System message
	pub system: String,
	/// User message
	pub user: String,
}

/// A language model that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
	/// Generate a completion for `prompt`.
	async fn generate(
		&self,
		prompt: &ChatPrompt,
		options: &GenerationOptions,
	) -> Result<String, GenerationError>;

	/// Model identifier, for logs and journals.
	fn model(&self) -> &str;
}

// ============================================================================
// OpenAI-compatible adapter
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
	model: &'a str,
	messages: [ChatMessage<'a>; 2],
	max_tokens: u32,
	temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
	role: &'static str,
	content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
	choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
	message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
	#[serde(default)]
	content: Option<String>,
}

/// OpenAI chat-completions client.
pub struct OpenAiGenerator {
	client: reqwest::Client,
	endpoint: String,
	api_key: String,
	model: String,
}

impl OpenAiGenerator {
	/// Build a client for `base_url` (e.g. `https://api.openai.com/v1`).
	///
	/// # Errors
	///
	/// Returns [`GenerationError::Network`] if the HTTP client cannot be built.
	pub fn new(
		base_url: &str,
		api_key: impl Into<String>,
		model: impl Into<String>,
		timeout: Duration,
	) -> Result<Self, GenerationError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| GenerationError::Network(e.to_string()))?;

		Ok(Self {
			client,
			endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
			api_key: api_key.into(),
			model: model.into(),
		})
	}
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
	#[instrument(skip_all, fields(model = %self.model, max_tokens = options.max_tokens))]
	async fn generate(
		&self,
		prompt: &ChatPrompt,
		options: &GenerationOptions,
	) -> Result<String, GenerationError> {
		let request = ChatRequest {
			model: &self.model,
			messages: [
				ChatMessage {
					role: "system",
					content: &prompt.system,
				},
				ChatMessage {
					role: "user",
					content: &prompt.user,
				},
			],
			max_tokens: options.max_tokens,
			temperature: options.temperature,
		};

		let response = self
			.client
			.post(&self.endpoint)
			.bearer_auth(&self.api_key)
			.json(&request)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					GenerationError::Timeout
				} else {
					GenerationError::Network(e.to_string())
				}
			})?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(match status.as_u16() {
				401 | 403 => GenerationError::Authentication(body),
				429 => GenerationError::RateLimited,
				408 | 504 => GenerationError::Timeout,
				_ => GenerationError::Provider(format!("HTTP {status}: {body}")),
			});
		}

		let reply: ChatResponse = response.json().await.map_err(|e| {
			if e.is_timeout() {
				GenerationError::Timeout
			} else {
				GenerationError::Provider(format!("failed to parse response: {e}"))
			}
		})?;

		let text = reply
			.choices
			.into_iter()
			.next()
			.and_then(|choice| choice.message.content)
			.map(|content| content.trim().to_owned())
			.filter(|content| !content.is_empty())
			.ok_or_else(|| GenerationError::Provider("empty completion".to_owned()))?;

		debug!(chars = text.len(), "completion received");
		Ok(text)
	}

	fn model(&self) -> &str {
		&self.model
	}
}
