//! Google Gemini `generateContent` client

use crate::config::GenerationConfig;
use crate::error::GenerationFailure;
use crate::llm::client::{GenerationBackend, ResponseShape, Segment};
use crate::llm::prompts::GenerationRequest;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationSettings {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl GenerationBackend for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ResponseShape, GenerationFailure> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: &request.prompt }],
            }],
            generation_config: GenerationSettings {
                temperature: request.temperature.value(),
            },
        };

        info!(
            "Calling {} (temperature {:.2}, prompt {} chars)",
            self.model,
            request.temperature.value(),
            request.prompt.chars().count()
        );

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!("Generation service answered {} ({} bytes)", status, text.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(GenerationFailure::Transport {
                message: format!("{}: {}", status, message),
            });
        }

        parse_response(&text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Map a `generateContent` body onto [`ResponseShape`].
pub fn parse_response(body: &str) -> Result<ResponseShape, GenerationFailure> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| GenerationFailure::MalformedResponse {
            raw: body.to_string(),
        })?;
    interpret_response(value)
}

pub fn interpret_response(value: serde_json::Value) -> Result<ResponseShape, GenerationFailure> {
    let response: GenerateContentResponse =
        serde_json::from_value(value.clone()).unwrap_or_default();

    if let Some(reason) = response.prompt_feedback.and_then(|feedback| {
        feedback.block_reason.map(|reason| match feedback.block_reason_message {
            Some(message) => format!("{}: {}", reason, message),
            None => reason,
        })
    }) {
        return Err(GenerationFailure::Blocked { reason });
    }

    let first_parts = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| content.parts.as_slice())
        .unwrap_or_default();

    if first_parts.is_empty() {
        return Ok(ResponseShape::Unrecognized(value));
    }

    // A lone candidate made only of text reads as one block of text
    if response.candidates.len() == 1 && first_parts.iter().all(|part| part.text.is_some()) {
        let text = first_parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>();
        return Ok(ResponseShape::DirectText(text));
    }

    Ok(ResponseShape::Segmented(
        first_parts
            .iter()
            .map(|part| Segment::new(part.text.clone().unwrap_or_default()))
            .collect(),
    ))
}
