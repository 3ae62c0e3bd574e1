//! OpenAI-backed implementation of the model client traits
//!
//! One reqwest client serves the responses, chat-completions, and speech
//! surfaces. No retries: a failed call surfaces the provider's status and
//! body to the handler, which converts it into an error payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::clients::traits::{
    CompletionRequest, LanguageModel, ModelError, SpeechModel, SpeechRequest,
};
use crate::error::EngineError;
use crate::schemas::ChatTurn;

/// Models that reject sampling overrides (`max_output_tokens`, `temperature`).
const REASONING_FAMILY: [&str; 3] = ["gpt-5", "gpt-5-mini", "gpt-5-nano"];

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output: Vec<ResponsesOutputItem>,
}

#[derive(Deserialize)]
struct ResponsesOutputItem {
    #[serde(default)]
    content: Vec<ResponsesContentItem>,
}

#[derive(Deserialize)]
struct ResponsesContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    voice: &'a str,
    instructions: &'a str,
    input: &'a str,
    response_format: &'a str,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout_ms: u64,
    ) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| EngineError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ModelError::Api { status, body })
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, req: CompletionRequest<'_>) -> Result<String, ModelError> {
        debug!(
            "completion request (model={}, input_chars={})",
            req.model,
            req.input.len()
        );

        let reasoning = REASONING_FAMILY.contains(&req.model);
        let body = ResponsesRequest {
            model: req.model,
            instructions: req.instructions,
            input: req.input,
            max_output_tokens: if reasoning { None } else { req.max_output_tokens },
            temperature: if reasoning { None } else { req.temperature },
        };

        let response = self
            .http
            .post(self.url("responses"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let reply: ResponsesReply = Self::check(response).await?.json().await?;

        // The output is a list of message items whose content carries the
        // generated text pieces
        let text: String = reply
            .output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|content| content.kind == "output_text")
            .map(|content| content.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(ModelError::EmptyOutput);
        }
        Ok(text)
    }

    async fn chat(
        &self,
        model: &str,
        system: &str,
        turns: &[ChatTurn],
    ) -> Result<String, ModelError> {
        debug!("chat request (model={}, turns={})", model, turns.len());

        let mut messages = vec![ChatMessage {
            role: "system",
            content: system,
        }];
        messages.extend(turns.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: turn.content.as_str(),
        }));

        let body = ChatRequest { model, messages };
        let response = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let reply: ChatReply = Self::check(response).await?.json().await?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ModelError::EmptyOutput)
    }
}

#[async_trait]
impl SpeechModel for OpenAiClient {
    async fn synthesize(&self, req: SpeechRequest<'_>) -> Result<Vec<u8>, ModelError> {
        debug!(
            "speech request (model={}, voice={}, input_chars={})",
            req.model,
            req.voice,
            req.input.len()
        );

        let body = SpeechBody {
            model: req.model,
            voice: req.voice,
            instructions: req.instructions,
            input: req.input,
            response_format: "mp3",
        };

        let response = self
            .http
            .post(self.url("audio/speech"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let audio = Self::check(response).await?.bytes().await?;
        Ok(audio.to_vec())
    }
}
