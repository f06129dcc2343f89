use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use accessibridge_core::{AssistProvider, HeuristicsReport};
use accessibridge_logging::redact_sensitive_data;

use crate::prompts::{report_user_prompt, ALT_TEXT_INSTRUCTION, REPORT_SYSTEM_PROMPT};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-flash-1.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection settings for an OpenRouter-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    /// Either an API base (`.../api/v1`) or the full `/chat/completions` endpoint.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub referer: String,
    pub title: String,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            referer: "http://localhost:5000".to_string(),
            title: "Accessi-Bridge".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base)
        }
    }
}

/// OpenRouter.ai provider for image descriptions and narrative reports.
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterProvider {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build OpenRouter HTTP client")?;
        Ok(Self { client, config })
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let start = Instant::now();
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        debug!(model = %self.config.model, "Sending request to OpenRouter");

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await
            .context("OpenRouter HTTP request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_body = response.text().await.unwrap_or_default();
            let snippet: String = error_body.chars().take(200).collect();
            anyhow::bail!(
                "OpenRouter returned {}: {}",
                status.as_u16(),
                redact_sensitive_data(&snippet)
            );
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenRouter response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .context("OpenRouter response contained no content")?;

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            chars = content.chars().count(),
            "OpenRouter responded"
        );

        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl AssistProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_alt_text(&self, image_url: &str) -> Result<String> {
        let messages = vec![ChatMessage {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text {
                    text: ALT_TEXT_INSTRUCTION.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.to_string(),
                    },
                },
            ]),
        }];
        self.complete(messages, 60, 0.6).await
    }

    async fn generate_report(&self, heuristics: &HeuristicsReport) -> Result<String> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(REPORT_SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Text(report_user_prompt(heuristics)?),
            },
        ];
        self.complete(messages, 900, 0.4).await
    }
}
